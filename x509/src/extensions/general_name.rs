use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use asn1::{Element, ObjectIdentifier, OctetString};
use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use der::Tlv;

use super::error::{Error, Kind, Result};
use crate::name::Name;

/*
RFC 5280 Section 4.2.1.6
GeneralName ::= CHOICE {
    otherName                 [0] OtherName,
    rfc822Name                [1] IA5String,
    dNSName                   [2] IA5String,
    x400Address               [3] ORAddress,
    directoryName             [4] Name,
    ediPartyName              [5] EDIPartyName,
    uniformResourceIdentifier [6] IA5String,
    iPAddress                 [7] OCTET STRING,
    registeredID              [8] OBJECT IDENTIFIER
}

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id
}

EDIPartyName ::= SEQUENCE {
    nameAssigner [0] DirectoryString OPTIONAL,
    partyName    [1] DirectoryString
}
*/

/// One alternative of a GeneralNames sequence.
///
/// Structures without a typed model here (otherName values, ORAddress,
/// EDIPartyName) are kept as DER bytes. Only the TLV structure of an
/// alternative is checked, plus ASCII for dNSName; rfc822Name and URI text
/// is read lossily and iPAddress keeps its octets whatever their length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    OtherName {
        type_id: ObjectIdentifier,
        /// DER of the value inside the `[0] EXPLICIT` wrapper.
        value: Vec<u8>,
    },
    Rfc822Name(String),
    DnsName(String),
    /// DER of the ORAddress SEQUENCE.
    X400Address(Vec<u8>),
    DirectoryName(Name),
    /// DER of the EDIPartyName SEQUENCE.
    EdiPartyName(Vec<u8>),
    Uri(String),
    /// Four octets for IPv4, sixteen for IPv6. Name constraints carry an
    /// address plus mask here, so other lengths are kept as they are.
    IpAddress(Vec<u8>),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    fn slot(&self) -> u8 {
        match self {
            GeneralName::OtherName { .. } => 0,
            GeneralName::Rfc822Name(_) => 1,
            GeneralName::DnsName(_) => 2,
            GeneralName::X400Address(_) => 3,
            GeneralName::DirectoryName(_) => 4,
            GeneralName::EdiPartyName(_) => 5,
            GeneralName::Uri(_) => 6,
            GeneralName::IpAddress(_) => 7,
            GeneralName::RegisteredId(_) => 8,
        }
    }

    /// The address of an iPAddress alternative, when it has 4 or 16 octets.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        let GeneralName::IpAddress(octets) = self else {
            return None;
        };
        match octets.len() {
            4 => <[u8; 4]>::try_from(octets.as_slice())
                .ok()
                .map(|o| IpAddr::V4(Ipv4Addr::from(o))),
            16 => <[u8; 16]>::try_from(octets.as_slice())
                .ok()
                .map(|o| IpAddr::V6(Ipv6Addr::from(o))),
            _ => None,
        }
    }
}

fn to_der(element: &Element) -> Result<Vec<u8>> {
    let tlv: Tlv = element.encode()?;
    let bytes: Vec<u8> = tlv.encode()?;
    Ok(bytes)
}

fn from_der(bytes: &[u8]) -> Result<Element> {
    let (tlv, rest) = Tlv::parse(bytes)?;
    if !rest.is_empty() {
        return Err(Error::UnexpectedElementType(Kind::GeneralName));
    }
    Ok(Element::try_from(&tlv)?)
}

fn dns_name(bytes: &[u8]) -> Result<String> {
    if !bytes.is_ascii() {
        return Err(Error::GeneralNameInvalidAscii);
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl DecodableFrom<Element> for GeneralName {}

impl Decoder<Element, GeneralName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName> {
        let Element::ContextSpecific {
            slot,
            constructed,
            element,
        } = self
        else {
            return Err(Error::UnexpectedElementType(Kind::GeneralName));
        };
        let slot = *slot;
        let primitive = || self.implicit_bytes().ok_or(Error::GeneralNameInvalidForm(slot));
        let sequence = || match (constructed, element.as_ref()) {
            (true, Element::Sequence(children)) => Ok(children.as_slice()),
            _ => Err(Error::GeneralNameInvalidForm(slot)),
        };

        match slot {
            0 => match sequence()? {
                [Element::ObjectIdentifier(type_id), value @ Element::ContextSpecific { slot: 0, .. }] => {
                    let inner = value.explicit_inner().ok_or(Error::OtherNameInvalidStructure)?;
                    Ok(GeneralName::OtherName {
                        type_id: type_id.clone(),
                        value: to_der(inner)?,
                    })
                }
                _ => Err(Error::OtherNameInvalidStructure),
            },
            1 => primitive().map(lossy).map(GeneralName::Rfc822Name),
            2 => dns_name(primitive()?).map(GeneralName::DnsName),
            3 => to_der(&Element::Sequence(sequence()?.to_vec())).map(GeneralName::X400Address),
            4 => {
                let inner = self
                    .explicit_inner()
                    .ok_or(Error::GeneralNameInvalidForm(slot))?;
                let name: Name = inner.decode()?;
                Ok(GeneralName::DirectoryName(name))
            }
            5 => to_der(&Element::Sequence(sequence()?.to_vec())).map(GeneralName::EdiPartyName),
            6 => primitive().map(lossy).map(GeneralName::Uri),
            7 => primitive().map(|octets| GeneralName::IpAddress(octets.to_vec())),
            8 => Ok(GeneralName::RegisteredId(ObjectIdentifier::try_from(
                primitive()?,
            )?)),
            _ => Err(Error::UnknownGeneralNameTag(slot)),
        }
    }
}

impl EncodableTo<GeneralName> for Element {}

impl Encoder<GeneralName, Element> for GeneralName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let slot = self.slot();
        let implicit = |bytes: Vec<u8>| Element::ContextSpecific {
            slot,
            constructed: false,
            element: Box::new(Element::OctetString(OctetString::from(bytes))),
        };
        let wrapped = |children: Vec<Element>| Element::ContextSpecific {
            slot,
            constructed: true,
            element: Box::new(Element::Sequence(children)),
        };
        let reparsed = |bytes: &[u8]| -> Result<Element> {
            match from_der(bytes)? {
                Element::Sequence(children) => Ok(wrapped(children)),
                _ => Err(Error::ExpectedSequence(Kind::GeneralName)),
            }
        };

        match self {
            GeneralName::OtherName { type_id, value } => {
                let explicit = Element::ContextSpecific {
                    slot: 0,
                    constructed: true,
                    element: Box::new(Element::Sequence(vec![from_der(value)?])),
                };
                Ok(wrapped(vec![
                    Element::ObjectIdentifier(type_id.clone()),
                    explicit,
                ]))
            }
            GeneralName::Rfc822Name(s) | GeneralName::DnsName(s) | GeneralName::Uri(s) => {
                Ok(implicit(s.as_bytes().to_vec()))
            }
            GeneralName::X400Address(bytes) | GeneralName::EdiPartyName(bytes) => reparsed(bytes),
            GeneralName::DirectoryName(name) => {
                let inner: Element = name.encode()?;
                Ok(wrapped(vec![inner]))
            }
            GeneralName::IpAddress(octets) => Ok(implicit(octets.clone())),
            GeneralName::RegisteredId(oid) => Ok(implicit(Vec::try_from(oid)?)),
        }
    }
}
