use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use nom::IResult;
use nom::error::ErrorKind;
use pem::Pem;

pub mod error;

use error::{Error, Result};

pub const TAG_CONSTRUCTED: u8 = 0x20;

const CLASS_UNIVERSAL: u8 = 0x00;
const CLASS_APPLICATION: u8 = 0x40;
const CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const CLASS_PRIVATE: u8 = 0xc0;
const HIGH_TAG_NUMBER: u8 = 0x1f;
const INDEFINITE_LENGTH: u8 = 0x80;
const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

/// Maximum nesting of constructed values accepted by the parser.
pub const MAX_DEPTH: usize = 64;

type ParseResult<'a, T> = IResult<&'a [u8], T>;

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        let mut input: &[u8] = self;
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = parse_tlv(input, 0)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        self.as_slice().decode()
    }
}

impl DecodableFrom<Pem> for Der {}

impl Decoder<Pem, Der> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        let bytes = Decoder::<Pem, Vec<u8>>::decode(self)?;
        bytes.decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out);
        }
        Ok(out)
    }
}

/// Universal tag numbers (X.680 §8.4) known to the element model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    EndOfContents,
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    TeletexString,
    IA5String,
    UTCTime,
    GeneralizedTime,
    UniversalString,
    BMPString,
    Unimplemented(u32),
}

impl From<u32> for PrimitiveTag {
    fn from(value: u32) -> Self {
        match value {
            0x00 => Self::EndOfContents,
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x0c => Self::UTF8String,
            0x10 => Self::Sequence,
            0x11 => Self::Set,
            0x13 => Self::PrintableString,
            0x14 => Self::TeletexString,
            0x16 => Self::IA5String,
            0x17 => Self::UTCTime,
            0x18 => Self::GeneralizedTime,
            0x1c => Self::UniversalString,
            0x1e => Self::BMPString,
            n => Self::Unimplemented(n),
        }
    }
}

impl From<PrimitiveTag> for u32 {
    fn from(value: PrimitiveTag) -> Self {
        match value {
            PrimitiveTag::EndOfContents => 0x00,
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::TeletexString => 0x14,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::UniversalString => 0x1c,
            PrimitiveTag::BMPString => 0x1e,
            PrimitiveTag::Unimplemented(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Universal { tag: PrimitiveTag, constructed: bool },
    Application { number: u32, constructed: bool },
    ContextSpecific { slot: u8, constructed: bool },
    Private { number: u32, constructed: bool },
}

impl Tag {
    /// Universal tag with the encoding form X.690 mandates for DER.
    pub fn universal(tag: PrimitiveTag) -> Self {
        let constructed = matches!(tag, PrimitiveTag::Sequence | PrimitiveTag::Set);
        Tag::Universal { tag, constructed }
    }

    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Universal { constructed, .. }
            | Tag::Application { constructed, .. }
            | Tag::ContextSpecific { constructed, .. }
            | Tag::Private { constructed, .. } => *constructed,
        }
    }

    fn class_and_number(&self) -> (u8, u32) {
        match self {
            Tag::Universal { tag, .. } => (CLASS_UNIVERSAL, u32::from(*tag)),
            Tag::Application { number, .. } => (CLASS_APPLICATION, *number),
            Tag::ContextSpecific { slot, .. } => (CLASS_CONTEXT_SPECIFIC, u32::from(*slot)),
            Tag::Private { number, .. } => (CLASS_PRIVATE, *number),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        let (class, number) = self.class_and_number();
        let constructed = if self.is_constructed() {
            TAG_CONSTRUCTED
        } else {
            0
        };
        if number < u32::from(HIGH_TAG_NUMBER) {
            out.push(class | constructed | number as u8);
            return;
        }
        out.push(class | constructed | HIGH_TAG_NUMBER);
        let mut groups = Vec::new();
        let mut n = number;
        loop {
            groups.push((n & 0x7f) as u8);
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        while let Some(group) = groups.pop() {
            out.push(if groups.is_empty() { group } else { group | 0x80 });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlv(tlvs),
        }
    }

    /// Parses one TLV and returns it with the unconsumed remainder.
    pub fn parse(input: &[u8]) -> Result<(Tlv, &[u8])> {
        let (rest, tlv) = parse_tlv(input, 0)?;
        Ok((tlv, rest))
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    fn content_bytes(&self) -> Vec<u8> {
        match &self.value {
            Value::Data(data) => data.clone(),
            Value::Tlv(tlvs) => {
                let mut out = Vec::new();
                for tlv in tlvs {
                    tlv.write(&mut out);
                }
                out
            }
        }
    }

    /// Appends the definite-length encoding of this TLV to `out`.
    fn write(&self, out: &mut Vec<u8>) {
        let content = self.content_bytes();
        self.tag.write(out);
        write_length(content.len(), out);
        out.extend_from_slice(&content);
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out);
        Ok(out)
    }
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Length {
    Definite(usize),
    Indefinite,
}

fn failure<T>(input: &[u8], kind: ErrorKind) -> ParseResult<'_, T> {
    Err(nom::Err::Failure(nom::error::Error::new(input, kind)))
}

fn byte(input: &[u8]) -> ParseResult<'_, u8> {
    nom::number::complete::be_u8(input)
}

fn take_bytes(input: &[u8], count: usize) -> ParseResult<'_, &[u8]> {
    nom::bytes::complete::take(count)(input)
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (mut input, first) = byte(input)?;
    let constructed = first & TAG_CONSTRUCTED != 0;
    let mut number = u32::from(first & HIGH_TAG_NUMBER);
    if number == u32::from(HIGH_TAG_NUMBER) {
        // high tag number form: base-128 groups, MSB set on all but the last
        number = 0;
        loop {
            let (rest, b) = byte(input)?;
            if number > (u32::MAX >> 7) {
                return failure(input, ErrorKind::TooLarge);
            }
            number = (number << 7) | u32::from(b & 0x7f);
            input = rest;
            if b & 0x80 == 0 {
                break;
            }
        }
    }

    let tag = match first & 0xc0 {
        CLASS_UNIVERSAL => Tag::Universal {
            tag: PrimitiveTag::from(number),
            constructed,
        },
        CLASS_APPLICATION => Tag::Application {
            number,
            constructed,
        },
        CLASS_CONTEXT_SPECIFIC => match u8::try_from(number) {
            Ok(slot) => Tag::ContextSpecific { slot, constructed },
            Err(_) => return failure(input, ErrorKind::TooLarge),
        },
        _ => Tag::Private {
            number,
            constructed,
        },
    };
    Ok((input, tag))
}

fn parse_length(input: &[u8]) -> ParseResult<'_, Length> {
    let (input, n) = byte(input)?;
    if n == INDEFINITE_LENGTH {
        return Ok((input, Length::Indefinite));
    }
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((input, Length::Definite(usize::from(n))));
    }
    // long form: the low 7 bits count the length octets that follow
    let count = usize::from(n & 0x7f);
    if count > size_of::<usize>() {
        return failure(input, ErrorKind::TooLarge);
    }
    let (input, bs) = take_bytes(input, count)?;
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | usize::from(b));
    Ok((input, Length::Definite(length)))
}

fn parse_tlv(input: &[u8], depth: usize) -> ParseResult<'_, Tlv> {
    if depth > MAX_DEPTH {
        return failure(input, ErrorKind::TooLarge);
    }
    let (input, tag) = parse_tag(input)?;
    let (input, length) = parse_length(input)?;

    match length {
        Length::Definite(length) => {
            let (input, data) = take_bytes(input, length)?;
            if !tag.is_constructed() {
                return Ok((input, Tlv::new_primitive(tag, data.to_vec())));
            }
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, tlv) = parse_tlv(data, depth + 1)?;
                data = rest;
                tlvs.push(tlv);
            }
            Ok((input, Tlv::new_constructed(tag, tlvs)))
        }
        Length::Indefinite => {
            // X.690 8.1.3.6: only constructed encodings may use the indefinite form
            if !tag.is_constructed() {
                return failure(input, ErrorKind::Verify);
            }
            let mut tlvs = Vec::new();
            let mut input = input;
            loop {
                if let Some(rest) = input.strip_prefix(&END_OF_CONTENTS) {
                    return Ok((rest, Tlv::new_constructed(tag, tlvs)));
                }
                let (rest, tlv) = parse_tlv(input, depth + 1)?;
                input = rest;
                tlvs.push(tlv);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    fn seq(tlvs: Vec<Tlv>) -> Tlv {
        Tlv::new_constructed(Tag::universal(PrimitiveTag::Sequence), tlvs)
    }

    fn int(data: &[u8]) -> Tlv {
        Tlv::new_primitive(Tag::universal(PrimitiveTag::Integer), data.to_vec())
    }

    #[rstest(input, expected,
        case(vec![0x02], Tag::universal(PrimitiveTag::Integer)),
        case(vec![0x30, 0x01], Tag::universal(PrimitiveTag::Sequence)),
        case(vec![0x31], Tag::universal(PrimitiveTag::Set)),
        case(vec![0x1e], Tag::universal(PrimitiveTag::BMPString)),
        case(vec![0x24], Tag::Universal { tag: PrimitiveTag::OctetString, constructed: true }),
        case(vec![0xa0], Tag::ContextSpecific { slot: 0, constructed: true }),
        case(vec![0x82], Tag::ContextSpecific { slot: 2, constructed: false }),
        case(vec![0x5f, 0x81, 0x00], Tag::Application { number: 128, constructed: false }),
        case(vec![0xdf, 0x22], Tag::Private { number: 34, constructed: false }),
    )]
    fn test_parse_tag(input: Vec<u8>, expected: Tag) {
        let (_, actual) = parse_tag(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x02], Length::Definite(0x02)),
        case(vec![0x7f], Length::Definite(0x7f)),
        case(vec![0x81, 0x80], Length::Definite(0x80)),
        case(vec![0x82, 0x02, 0x10], Length::Definite(256 * 0x02 + 0x10)),
        case(vec![0x83, 0x01, 0x00, 0x00], Length::Definite(256 * 256)),
        case(vec![0x80], Length::Indefinite),
    )]
    fn test_parse_length(input: Vec<u8>, expected: Length) {
        let (_, actual) = parse_length(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_parse_nested_definite() {
        let input = hex!("30 06 02 01 01 30 01 05");
        // the inner SEQUENCE claims one byte but only holds a truncated NULL header
        let result: Result<Der> = input.as_slice().decode();
        assert!(result.is_err());

        let input = hex!("30 08 02 01 01 30 03 02 01 02");
        let der: Der = input.as_slice().decode().unwrap();
        let expected = seq(vec![int(&[0x01]), seq(vec![int(&[0x02])])]);
        assert_eq!(&[expected], der.elements());
    }

    #[test]
    fn test_parse_indefinite_matches_definite() {
        let definite = hex!("30 08 02 01 01 30 03 02 01 02");
        let indefinite = hex!("30 80 02 01 01 30 80 02 01 02 00 00 00 00");
        let a: Der = definite.as_slice().decode().unwrap();
        let b: Der = indefinite.as_slice().decode().unwrap();
        assert_eq!(a, b);
    }

    #[rstest(input,
        // indefinite length on a primitive
        case(vec![0x04, 0x80, 0x00, 0x00]),
        // indefinite length never terminated
        case(vec![0x30, 0x80, 0x02, 0x01, 0x01]),
        // length runs past the input
        case(vec![0x04, 0x05, 0x00]),
        // context slot wider than u8
        case(vec![0x9f, 0x82, 0x00, 0x00]),
    )]
    fn test_parse_rejects(input: Vec<u8>) {
        let result: Result<Der> = input.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_deep_nesting() {
        let mut input = Vec::new();
        for _ in 0..=MAX_DEPTH + 1 {
            input.extend_from_slice(&[0x30, 0x80]);
        }
        let result: Result<Der> = input.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_keeps_remainder() {
        let input = hex!("05 00 ff ff");
        let (tlv, rest) = Tlv::parse(&input).unwrap();
        assert_eq!(Some(&[][..]), tlv.data());
        assert_eq!(&[0xff, 0xff], rest);
    }

    #[rstest(tlv, expected,
        case(int(&[0x01]), vec![0x02, 0x01, 0x01]),
        case(seq(vec![]), vec![0x30, 0x00]),
        case(
            Tlv::new_primitive(Tag::universal(PrimitiveTag::OctetString), vec![0xab; 200]),
            [vec![0x04, 0x81, 0xc8], vec![0xab; 200]].concat()
        ),
        case(
            Tlv::new_primitive(Tag::Application { number: 128, constructed: false }, vec![]),
            vec![0x5f, 0x81, 0x00, 0x00]
        ),
    )]
    fn test_encode_tlv(tlv: Tlv, expected: Vec<u8>) {
        let actual: Vec<u8> = tlv.encode().unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_encode_rewrites_indefinite_as_definite() {
        let indefinite = hex!("30 80 02 01 01 00 00");
        let der: Der = indefinite.as_slice().decode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();
        assert_eq!(hex!("30 03 02 01 01").to_vec(), bytes);
    }

    #[test]
    fn test_decode_from_pem() {
        let pem: Pem = "-----BEGIN CERTIFICATE-----\nMAMCAQI=\n-----END CERTIFICATE-----\n"
            .parse()
            .unwrap();
        let der: Der = pem.decode().unwrap();
        assert_eq!(&[seq(vec![int(&[0x02])])], der.elements());
    }
}
