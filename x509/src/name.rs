use std::collections::BTreeMap;
use std::ops::Index;

use asn1::{Element, ObjectIdentifier};
use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use serde::Serialize;
use tracing::debug;

use crate::directory_string::{DirectoryStringValue, TaggedString, normalize};
use crate::error::{DecodeError, Kind};
use crate::oid::{self, NameStyle};

/*
RFC 5280 Section 4.1.2.4
Name ::= CHOICE { -- only one possibility for now --
    rdnSequence  RDNSequence }

RDNSequence ::= SEQUENCE OF RelativeDistinguishedName

RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue

AttributeTypeAndValue ::= SEQUENCE {
    type     AttributeType,
    value    AttributeValue }

AttributeType ::= OBJECT IDENTIFIER

AttributeValue ::= ANY -- DEFINED BY AttributeType
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Name { rdn_sequence }
    }

    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        RelativeDistinguishedName { attributes }
    }

    pub fn attributes(&self) -> &[AttributeTypeAndValue] {
        &self.attributes
    }
}

/// The value stays undecoded; its string type is only interpreted during
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    attribute_type: ObjectIdentifier,
    value: Element,
}

impl AttributeTypeAndValue {
    pub fn new(attribute_type: ObjectIdentifier, value: Element) -> Self {
        AttributeTypeAndValue {
            attribute_type,
            value,
        }
    }

    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn value(&self) -> &Element {
        &self.value
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<Name, Self::Error> {
        match self {
            Element::Sequence(elements) => {
                let rdn_sequence = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<RelativeDistinguishedName>, _>>()?;
                Ok(Name { rdn_sequence })
            }
            _ => Err(DecodeError::ExpectedSequence(Kind::Name)),
        }
    }
}

impl DecodableFrom<Element> for RelativeDistinguishedName {}

impl Decoder<Element, RelativeDistinguishedName> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<RelativeDistinguishedName, Self::Error> {
        match self {
            Element::Set(elements) => {
                let attributes = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<AttributeTypeAndValue>, _>>()?;
                Ok(RelativeDistinguishedName { attributes })
            }
            _ => Err(DecodeError::ExpectedSet(Kind::RelativeDistinguishedName)),
        }
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<AttributeTypeAndValue, Self::Error> {
        match self {
            Element::Sequence(elements) => match elements.as_slice() {
                [Element::ObjectIdentifier(attribute_type), value] => Ok(AttributeTypeAndValue {
                    attribute_type: attribute_type.clone(),
                    value: value.clone(),
                }),
                [_, _] => Err(DecodeError::ExpectedOid(Kind::AttributeTypeAndValue)),
                _ => Err(DecodeError::InvalidElementCount {
                    kind: Kind::AttributeTypeAndValue,
                    expected: "2",
                    actual: elements.len(),
                }),
            },
            _ => Err(DecodeError::ExpectedSequence(Kind::AttributeTypeAndValue)),
        }
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = asn1::error::Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let rdns = self
            .rdn_sequence
            .iter()
            .map(|rdn| {
                Element::Set(
                    rdn.attributes
                        .iter()
                        .map(|atv| {
                            Element::Sequence(vec![
                                Element::ObjectIdentifier(atv.attribute_type.clone()),
                                atv.value.clone(),
                            ])
                        })
                        .collect(),
                )
            })
            .collect();
        Ok(Element::Sequence(rdns))
    }
}

/// Attribute name (or braced OID when unnamed) to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMap {
    inner: BTreeMap<String, DirectoryStringValue>,
}

impl NameMap {
    pub fn get(&self, key: &str) -> Option<&DirectoryStringValue> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectoryStringValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Index<&str> for NameMap {
    type Output = DirectoryStringValue;

    fn index(&self, key: &str) -> &Self::Output {
        &self.inner[key]
    }
}

/// Flattens an RDN sequence into a [`NameMap`].
///
/// Attributes are visited in encoded order and a repeated name overwrites
/// the earlier value. Values that are not strings are skipped.
pub fn extract_name(name: &Name) -> NameMap {
    let mut inner = BTreeMap::new();
    for atv in name.rdn_sequence.iter().flat_map(|rdn| &rdn.attributes) {
        let braced = atv.attribute_type.braced();
        let key = oid::resolve(&braced, NameStyle::Full)
            .map(str::to_string)
            .unwrap_or(braced);
        let tagged = TaggedString::from(&atv.value);
        match normalize(&tagged) {
            Some(value) => {
                inner.insert(key, value);
            }
            None => {
                debug!(attribute = %key, encoding = %tagged.encoding(), "skipping non-string attribute value");
            }
        }
    }
    NameMap { inner }
}
