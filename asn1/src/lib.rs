use std::{fmt::Display, str::FromStr};

use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use der::{Der, PrimitiveTag, Tag, Tlv};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};

pub mod error;
pub mod format;
mod time;

pub use error::{Error, Result};
pub use time::{GeneralizedTime, UtcTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der> {
        let tlvs = self
            .elements
            .iter()
            .map(Tlv::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Der::new(tlvs))
    }
}

/// A decoded ASN.1 value.
///
/// Character strings keep their raw contents. Interpreting them (and
/// deciding what to do with malformed ones) is left to the consumer.
///
/// `ContextSpecific` holds the contents of a tagged value whose meaning
/// depends on the surrounding schema: a primitive encoding carries its raw
/// contents as an `OctetString`, a constructed one carries the contained
/// elements as a `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(Vec<u8>),
    PrintableString(Vec<u8>),
    TeletexString(Vec<u8>),
    IA5String(Vec<u8>),
    UniversalString(Vec<u8>),
    BMPString(Vec<u8>),
    UTCTime(UtcTime),
    GeneralizedTime(GeneralizedTime),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

impl Element {
    /// The single element wrapped by an EXPLICIT tag.
    pub fn explicit_inner(&self) -> Option<&Element> {
        match self {
            Element::ContextSpecific {
                constructed: true,
                element,
                ..
            } => match element.as_ref() {
                Element::Sequence(inner) if inner.len() == 1 => inner.first(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Raw contents of an IMPLICIT primitive tag.
    pub fn implicit_bytes(&self) -> Option<&[u8]> {
        match self {
            Element::ContextSpecific {
                constructed: false,
                element,
                ..
            } => match element.as_ref() {
                Element::OctetString(os) => Some(os.as_bytes()),
                _ => None,
            },
            _ => None,
        }
    }
}

fn decode_elements(tlvs: &[Tlv]) -> Result<Vec<Element>> {
    tlvs.iter().map(Element::try_from).collect()
}

/// Contents of a primitive, or the concatenated segments of a constructed
/// string encoding (X.690 §8.23.3 permits these under BER and CER).
fn string_contents(tlv: &Tlv, name: &'static str) -> Result<Vec<u8>> {
    if let Some(data) = tlv.data() {
        return Ok(data.to_vec());
    }
    let mut out = Vec::new();
    for segment in tlv.tlvs().unwrap_or_default() {
        if segment.tag() != tlv.tag() && segment.tag() != &primitive_form(tlv.tag()) {
            return Err(Error::InvalidSegment(name));
        }
        out.extend(string_contents(segment, name)?);
    }
    Ok(out)
}

fn primitive_form(tag: &Tag) -> Tag {
    match tag {
        Tag::Universal { tag, .. } => Tag::Universal {
            tag: *tag,
            constructed: false,
        },
        other => *other,
    }
}

fn bit_string_contents(tlv: &Tlv) -> Result<BitString> {
    if let Some(data) = tlv.data() {
        return BitString::try_from(data);
    }
    let mut unused = 0;
    let mut data = Vec::new();
    for segment in tlv.tlvs().unwrap_or_default() {
        let part = bit_string_contents(segment)?;
        unused = part.unused;
        data.extend(part.data);
    }
    Ok(BitString { unused, data })
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        match tlv.tag() {
            Tag::Universal { tag, .. } => match tag {
                PrimitiveTag::Boolean => match tlv.data() {
                    Some([0x00]) => Ok(Element::Boolean(false)),
                    // BER allows any non-zero octet for TRUE
                    Some([_]) => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => match tlv.data() {
                    Some(data) if !data.is_empty() => Ok(Element::Integer(Integer::from(data))),
                    _ => Err(Error::IntegerNoData),
                },
                PrimitiveTag::BitString => bit_string_contents(tlv).map(Element::BitString),
                PrimitiveTag::OctetString => string_contents(tlv, "OCTET STRING")
                    .map(|data| Element::OctetString(OctetString::from(data))),
                PrimitiveTag::Null => match tlv.data() {
                    Some([]) => Ok(Element::Null),
                    _ => Err(Error::NullWithContents),
                },
                PrimitiveTag::ObjectIdentifier => match tlv.data() {
                    Some(data) => ObjectIdentifier::try_from(data).map(Element::ObjectIdentifier),
                    None => Err(Error::ObjectIdentifierNoData),
                },
                PrimitiveTag::UTF8String => {
                    string_contents(tlv, "UTF8String").map(Element::UTF8String)
                }
                PrimitiveTag::PrintableString => {
                    string_contents(tlv, "PrintableString").map(Element::PrintableString)
                }
                PrimitiveTag::TeletexString => {
                    string_contents(tlv, "TeletexString").map(Element::TeletexString)
                }
                PrimitiveTag::IA5String => {
                    string_contents(tlv, "IA5String").map(Element::IA5String)
                }
                PrimitiveTag::UniversalString => {
                    string_contents(tlv, "UniversalString").map(Element::UniversalString)
                }
                PrimitiveTag::BMPString => {
                    string_contents(tlv, "BMPString").map(Element::BMPString)
                }
                PrimitiveTag::UTCTime => string_contents(tlv, "UTCTime")
                    .map(|data| Element::UTCTime(UtcTime::new(String::from_utf8_lossy(&data)))),
                PrimitiveTag::GeneralizedTime => {
                    string_contents(tlv, "GeneralizedTime").map(|data| {
                        Element::GeneralizedTime(GeneralizedTime::new(String::from_utf8_lossy(
                            &data,
                        )))
                    })
                }
                PrimitiveTag::Sequence => {
                    decode_elements(tlv.tlvs().unwrap_or_default()).map(Element::Sequence)
                }
                PrimitiveTag::Set => {
                    decode_elements(tlv.tlvs().unwrap_or_default()).map(Element::Set)
                }
                PrimitiveTag::EndOfContents | PrimitiveTag::Unimplemented(_) => {
                    Ok(Element::Unimplemented(tlv.clone()))
                }
            },
            Tag::ContextSpecific { slot, constructed } => {
                let element = match (tlv.data(), tlv.tlvs()) {
                    (Some(data), _) => Element::OctetString(OctetString::from(data)),
                    (None, Some(tlvs)) => Element::Sequence(decode_elements(tlvs)?),
                    (None, None) => {
                        return Err(Error::InvalidContextSpecific {
                            slot: *slot,
                            msg: "no contents",
                        });
                    }
                };
                Ok(Element::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                    element: Box::new(element),
                })
            }
            Tag::Application { .. } | Tag::Private { .. } => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", String::from_utf8_lossy(s)),
            Element::PrintableString(s) => {
                write!(f, "PrintableString({})", String::from_utf8_lossy(s))
            }
            Element::TeletexString(s) => write!(f, "TeletexString({})", String::from_utf8_lossy(s)),
            Element::IA5String(s) => write!(f, "IA5String({})", String::from_utf8_lossy(s)),
            Element::UniversalString(s) => write!(f, "UniversalString({} bytes)", s.len()),
            Element::BMPString(s) => write!(f, "BMPString({} bytes)", s.len()),
            Element::UTCTime(t) => write!(f, "UTCTime({})", t),
            Element::GeneralizedTime(t) => write!(f, "GeneralizedTime({})", t),
            Element::Sequence(seq) => write!(f, "Sequence({} elem)", seq.len()),
            Element::Set(set) => write!(f, "Set({} elem)", set.len()),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => write!(
                f,
                "ContextSpecific(slot: {}, constructed: {}, element: {})",
                slot, constructed, element
            ),
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv.tag()),
        }
    }
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let primitive = |tag: PrimitiveTag, data: Vec<u8>| Tlv::new_primitive(Tag::universal(tag), data);
        let compound = |tag: PrimitiveTag, elements: &[Element]| -> Result<Tlv> {
            let tlvs = elements
                .iter()
                .map(Tlv::try_from)
                .collect::<Result<Vec<_>>>()?;
            Ok(Tlv::new_constructed(Tag::universal(tag), tlvs))
        };

        match element {
            Element::Boolean(b) => Ok(primitive(
                PrimitiveTag::Boolean,
                vec![if *b { 0xff } else { 0x00 }],
            )),
            Element::Integer(i) => Ok(primitive(PrimitiveTag::Integer, i.to_signed_bytes_be())),
            Element::BitString(bs) => Ok(primitive(PrimitiveTag::BitString, Vec::from(bs.clone()))),
            Element::OctetString(os) => Ok(primitive(PrimitiveTag::OctetString, os.as_bytes().to_vec())),
            Element::Null => Ok(primitive(PrimitiveTag::Null, vec![])),
            Element::ObjectIdentifier(oid) => {
                Ok(primitive(PrimitiveTag::ObjectIdentifier, Vec::try_from(oid)?))
            }
            Element::UTF8String(s) => Ok(primitive(PrimitiveTag::UTF8String, s.clone())),
            Element::PrintableString(s) => Ok(primitive(PrimitiveTag::PrintableString, s.clone())),
            Element::TeletexString(s) => Ok(primitive(PrimitiveTag::TeletexString, s.clone())),
            Element::IA5String(s) => Ok(primitive(PrimitiveTag::IA5String, s.clone())),
            Element::UniversalString(s) => Ok(primitive(PrimitiveTag::UniversalString, s.clone())),
            Element::BMPString(s) => Ok(primitive(PrimitiveTag::BMPString, s.clone())),
            Element::UTCTime(t) => Ok(primitive(PrimitiveTag::UTCTime, t.as_str().as_bytes().to_vec())),
            Element::GeneralizedTime(t) => Ok(primitive(
                PrimitiveTag::GeneralizedTime,
                t.as_str().as_bytes().to_vec(),
            )),
            Element::Sequence(elements) => compound(PrimitiveTag::Sequence, elements),
            Element::Set(elements) => compound(PrimitiveTag::Set, elements),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };
                match (constructed, element.as_ref()) {
                    (true, Element::Sequence(elements)) => {
                        let tlvs = elements
                            .iter()
                            .map(Tlv::try_from)
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Tlv::new_constructed(tag, tlvs))
                    }
                    (false, Element::OctetString(os)) => {
                        Ok(Tlv::new_primitive(tag, os.as_bytes().to_vec()))
                    }
                    _ => Err(Error::ElementCannotEncode("context-specific element")),
                }
            }
            Element::Unimplemented(tlv) => Ok(tlv.clone()),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        Tlv::try_from(self)
    }
}

/// Arbitrary-width signed INTEGER.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Minimal two's-complement big-endian contents octets.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }

    /// The `{ 1.2.3 }` notation used as the OID registry key.
    pub fn braced(&self) -> String {
        format!("{{ {} }}", self)
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        // base-128 subidentifiers, continuation bit set on all but the last octet
        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for &v in value {
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierArcTooLarge);
            }
            val = (val << 7) | u64::from(v & 0x7f);
            pending = v & 0x80 != 0;
            if !pending {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // the first subidentifier packs the first two arcs as 40 * X + Y
        let first = subidentifiers[0];
        let (x, y) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = vec![x, y];
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self> {
        let (x, y) = match oid.inner.as_slice() {
            [x, y, ..] => (*x, *y),
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        if x > 2 || (x < 2 && y >= 40) {
            return Err(Error::ObjectIdentifierInvalidRoot(x, y));
        }
        let first = (x * 40)
            .checked_add(y)
            .ok_or(Error::ObjectIdentifierArcTooLarge)?;

        let mut result = Vec::new();
        for &arc in std::iter::once(&first).chain(&oid.inner[2..]) {
            let mut groups = Vec::new();
            let mut value = arc;
            loop {
                groups.push((value & 0x7f) as u8);
                value >>= 7;
                if value == 0 {
                    break;
                }
            }
            while let Some(group) = groups.pop() {
                result.push(if groups.is_empty() { group } else { group | 0x80 });
            }
        }
        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dotted = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", dotted)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|arc| arc.parse::<u64>().map_err(Error::ObjectIdentifierInvalidComponent))
            .collect::<Result<Vec<u64>>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of significant bits: `8 * bytes - unused`.
    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(usize::from(self.unused))
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            // an empty bit string must not claim unused bits
            [unused] if *unused != 0 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

impl From<BitString> for Vec<u8> {
    fn from(value: BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend(value.data);
        result
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self
            .data
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        write!(f, "{} ({} bits)", hex, self.bit_len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

/// Decodes the contents of an OCTET STRING as a nested DER value, as done for
/// `extnValue`.
impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    fn decode(bytes: &[u8]) -> Result<Element> {
        let der: Der = bytes.decode().map_err(Error::FailedToDecodeDer)?;
        let obj: ASN1Object = der.decode()?;
        Ok(obj.elements()[0].clone())
    }

    fn encode(element: &Element) -> Vec<u8> {
        let obj = ASN1Object::new(vec![element.clone()]);
        let der: Der = obj.encode().unwrap();
        der.encode().unwrap()
    }

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[rstest(input, expected,
        case(&hex!("02 01 01"), "1"),
        case(&hex!("02 01 ff"), "-1"),
        case(&hex!("02 02 00 ff"), "255"),
        case(&hex!("02 12 03 d4 15 31 8e 2c 57 1d 29 05 fc 3e 05 27 68 9d 0d 09"), "333504890676592408951587385614406537514249"),
    )]
    fn test_parse_element_integer(input: &[u8], expected: &str) {
        match decode(input).unwrap() {
            Element::Integer(i) => assert_eq!(expected, i.to_string()),
            other => panic!("expected INTEGER, got {other}"),
        }
    }

    #[rstest(input, expected,
        case(vec![0x2a, 0x03, 0x04], "1.2.3.4"),
        case(vec![0x55, 0x04, 0x03], "2.5.4.3"),
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], "1.2.840.113549.1.1.11"),
        case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x19], "0.9.2342.19200300.100.1.25"),
        // second arc above 39 under joint-iso-itu-t
        case(vec![0x88, 0x37, 0x03], "2.999.3"),
    )]
    fn test_object_identifier_from_bytes(input: Vec<u8>, expected: &str) {
        let actual = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(oid(expected), actual);
        assert_eq!(input, Vec::try_from(&actual).unwrap());
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x2a, 0x86]),
        case(vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]),
    )]
    fn test_object_identifier_from_bytes_rejects(input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, expected,
        case("1.2.840.113549.1.1.1", "{ 1.2.840.113549.1.1.1 }"),
        case("2.5.4.3", "{ 2.5.4.3 }"),
    )]
    fn test_object_identifier_braced(input: &str, expected: &str) {
        assert_eq!(expected, oid(input).braced());
    }

    #[rstest(input, case("1"), case("1..2"), case("1.a"), case(""))]
    fn test_object_identifier_from_str_rejects(input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[test]
    fn test_object_identifier_serialize() {
        let json = serde_json::to_string(&oid("1.2.840.113549.1.1.11")).unwrap();
        assert_eq!(r#""1.2.840.113549.1.1.11""#, json);
    }

    #[rstest(input, unused, data, bit_len,
        case(vec![0x00], 0, vec![], 0),
        case(vec![0x07, 0x80], 7, vec![0x80], 1),
        case(vec![0x03, 0x07, 0x88, 0x80], 3, vec![0x07, 0x88, 0x80], 21),
    )]
    fn test_bit_string_from_bytes(input: Vec<u8>, unused: u8, data: Vec<u8>, bit_len: usize) {
        let bs = BitString::try_from(input.as_slice()).unwrap();
        assert_eq!(unused, bs.unused_bits());
        assert_eq!(data, bs.as_bytes());
        assert_eq!(bit_len, bs.bit_len());
    }

    #[rstest(input, case(vec![]), case(vec![0x08, 0x00]), case(vec![0x01]))]
    fn test_bit_string_from_bytes_rejects(input: Vec<u8>) {
        assert!(BitString::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, expected,
        case(&hex!("01 01 00"), Element::Boolean(false)),
        case(&hex!("01 01 ff"), Element::Boolean(true)),
        case(&hex!("01 01 01"), Element::Boolean(true)),
        case(&hex!("05 00"), Element::Null),
        case(&hex!("13 02 4a 50"), Element::PrintableString(b"JP".to_vec())),
        case(&hex!("0c 02 c3 bc"), Element::UTF8String("ü".as_bytes().to_vec())),
        case(&hex!("14 01 41"), Element::TeletexString(b"A".to_vec())),
        case(&hex!("1c 04 00 00 00 41"), Element::UniversalString(vec![0, 0, 0, 0x41])),
        case(&hex!("1e 02 00 41"), Element::BMPString(vec![0, 0x41])),
        // invalid UTF-8 is kept, not rejected
        case(&hex!("0c 01 ff"), Element::UTF8String(vec![0xff])),
        case(&hex!("17 0d 32 36 31 30 31 36 30 38 34 30 32 33 5a"), Element::UTCTime(UtcTime::new("261016084023Z"))),
        case(&hex!("43 01 00"), Element::Unimplemented(Tlv::new_primitive(Tag::Application { number: 3, constructed: false }, vec![0x00]))),
    )]
    fn test_parse_element(input: &[u8], expected: Element) {
        assert_eq!(expected, decode(input).unwrap());
    }

    #[rstest(input,
        case(&hex!("01 00")),
        case(&hex!("01 02 00 00")),
        case(&hex!("02 00")),
        case(&hex!("05 01 00")),
        case(&hex!("03 00")),
        case(&hex!("24 03 02 01 00")),
    )]
    fn test_parse_element_rejects(input: &[u8]) {
        assert!(decode(input).is_err());
    }

    #[test]
    fn test_parse_constructed_strings() {
        // BER constructed OCTET STRING in two segments
        let input = hex!("24 80 04 02 01 02 04 01 03 00 00");
        assert_eq!(
            Element::OctetString(OctetString::from(vec![1, 2, 3])),
            decode(&input).unwrap()
        );

        let input = hex!("23 08 03 02 00 aa 03 02 04 b0");
        assert_eq!(
            Element::BitString(BitString::new(4, vec![0xaa, 0xb0])),
            decode(&input).unwrap()
        );
    }

    #[test]
    fn test_parse_context_specific() {
        // [0] EXPLICIT INTEGER 2
        let explicit = decode(&hex!("a0 03 02 01 02")).unwrap();
        assert_eq!(
            Some(&Element::Integer(Integer::from(2))),
            explicit.explicit_inner()
        );
        assert_eq!(None, explicit.implicit_bytes());

        // [2] IMPLICIT IA5String
        let implicit = decode(&hex!("82 03 61 2e 62")).unwrap();
        assert_eq!(Some(&b"a.b"[..]), implicit.implicit_bytes());
        assert_eq!(None, implicit.explicit_inner());

        // [0] IMPLICIT SEQUENCE with two components
        let sequence = decode(&hex!("a0 05 06 01 2a 05 00")).unwrap();
        assert_eq!(None, sequence.explicit_inner());
        match sequence {
            Element::ContextSpecific { slot: 0, element, .. } => {
                assert_eq!(
                    Element::Sequence(vec![
                        Element::ObjectIdentifier(ObjectIdentifier::from_str("1.2").unwrap()),
                        Element::Null,
                    ]),
                    *element
                );
            }
            other => panic!("expected [0], got {other}"),
        }
    }

    #[rstest(element,
        case(Element::Sequence(vec![
            Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.29.19").unwrap()),
            Element::Boolean(true),
            Element::OctetString(OctetString::from(vec![0x30, 0x00])),
        ])),
        case(Element::ContextSpecific {
            slot: 3,
            constructed: true,
            element: Box::new(Element::Sequence(vec![Element::Sequence(vec![])])),
        }),
        case(Element::ContextSpecific {
            slot: 2,
            constructed: false,
            element: Box::new(Element::OctetString(OctetString::from(b"example.com".to_vec()))),
        }),
        case(Element::Set(vec![Element::IA5String(b"ops@example.com".to_vec())])),
        case(Element::GeneralizedTime(GeneralizedTime::new("20810719084027Z"))),
    )]
    fn test_encode_then_parse(element: Element) {
        assert_eq!(element, decode(&encode(&element)).unwrap());
    }

    #[test]
    fn test_encode_rejects_mismatched_context_specific() {
        let element = Element::ContextSpecific {
            slot: 0,
            constructed: false,
            element: Box::new(Element::Null),
        };
        assert!(Tlv::try_from(&element).is_err());
    }

    #[test]
    fn test_octet_string_nested_decode() {
        let os = OctetString::from(hex!("30 06 01 01 ff 02 01 03").to_vec());
        let obj = ASN1Object::try_from(&os).unwrap();
        assert_eq!(
            &[Element::Sequence(vec![
                Element::Boolean(true),
                Element::Integer(Integer::from(3)),
            ])],
            obj.elements()
        );
    }
}
