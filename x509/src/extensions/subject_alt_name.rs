use std::collections::BTreeSet;

use asn1::Element;
use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};

use super::error::{Error, Kind};
use super::general_name::GeneralName;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames
GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    /// Every non-empty dNSName, deduplicated.
    pub fn dns_names(&self) -> BTreeSet<String> {
        self.names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DnsName(dns) if !dns.is_empty() => Some(dns.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DecodableFrom<Element> for SubjectAltName {}

impl Decoder<Element, SubjectAltName> for Element {
    type Error = Error;

    /// An empty sequence is accepted even though RFC 5280 requires at least
    /// one name; it simply yields no dNSNames.
    fn decode(&self) -> Result<SubjectAltName, Self::Error> {
        match self {
            Element::Sequence(elements) => {
                let names = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<GeneralName>, _>>()?;
                Ok(SubjectAltName { names })
            }
            _ => Err(Error::ExpectedSequence(Kind::SubjectAltName)),
        }
    }
}

impl EncodableTo<SubjectAltName> for Element {}

impl Encoder<SubjectAltName, Element> for SubjectAltName {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let elements = self
            .names
            .iter()
            .map(|name| name.encode())
            .collect::<Result<Vec<Element>, _>>()?;
        Ok(Element::Sequence(elements))
    }
}
