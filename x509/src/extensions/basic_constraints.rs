use asn1::{Element, Integer};
use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use serde::Serialize;
use tracing::debug;

use super::error::{Error, Kind};

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

/// Basic Constraints extension ([RFC 5280 Section 4.2.1.9](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9)).
///
/// `path_len_constraint` is absent both when the field is missing and when
/// the encoded INTEGER does not fit in a `u32`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    #[serde(rename = "cA")]
    pub ca: bool,
    #[serde(rename = "pathLenConstraint", skip_serializing_if = "Option::is_none")]
    pub path_len_constraint: Option<u32>,
}

fn path_len(value: &Integer) -> Option<u32> {
    let converted = value.to_u32();
    if converted.is_none() {
        debug!(path_len = %value, "pathLenConstraint out of range");
    }
    converted
}

impl DecodableFrom<Element> for BasicConstraints {}

impl Decoder<Element, BasicConstraints> for Element {
    type Error = Error;

    fn decode(&self) -> Result<BasicConstraints, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::BasicConstraints));
        };
        let (ca, path_len_constraint) = match elements.as_slice() {
            [] => (false, None),
            [Element::Boolean(ca)] => (*ca, None),
            [Element::Integer(len)] => (false, path_len(len)),
            [Element::Boolean(ca), Element::Integer(len)] => (*ca, path_len(len)),
            _ => return Err(Error::UnexpectedElementType(Kind::BasicConstraints)),
        };
        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }
}

impl EncodableTo<BasicConstraints> for Element {}

impl Encoder<BasicConstraints, Element> for BasicConstraints {
    type Error = Error;

    /// DER form: a FALSE `cA` is left out.
    fn encode(&self) -> Result<Element, Self::Error> {
        let ca = self.ca.then_some(Element::Boolean(true));
        let path_len = self
            .path_len_constraint
            .map(|len| Element::Integer(Integer::from(i64::from(len))));
        Ok(Element::Sequence(ca.into_iter().chain(path_len).collect()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(Element::Sequence(vec![]), BasicConstraints { ca: false, path_len_constraint: None }),
        case(
            Element::Sequence(vec![Element::Boolean(true)]),
            BasicConstraints { ca: true, path_len_constraint: None }
        ),
        case(
            Element::Sequence(vec![Element::Boolean(true), Element::Integer(Integer::from(1))]),
            BasicConstraints { ca: true, path_len_constraint: Some(1) }
        ),
        case(
            Element::Sequence(vec![Element::Integer(Integer::from(0))]),
            BasicConstraints { ca: false, path_len_constraint: Some(0) }
        ),
        case(
            Element::Sequence(vec![Element::Boolean(true), Element::Integer(Integer::from(-1))]),
            BasicConstraints { ca: true, path_len_constraint: None }
        ),
        case(
            Element::Sequence(vec![Element::Boolean(true), Element::Integer(Integer::from(1i64 << 40))]),
            BasicConstraints { ca: true, path_len_constraint: None }
        ),
    )]
    fn test_decode_basic_constraints(input: Element, expected: BasicConstraints) {
        let decoded: BasicConstraints = input.decode().unwrap();
        assert_eq!(expected, decoded);
    }

    #[rstest(input,
        case(Element::Set(vec![])),
        case(Element::Sequence(vec![Element::Null])),
        case(Element::Sequence(vec![Element::Integer(Integer::from(1)), Element::Boolean(true)])),
    )]
    fn test_decode_basic_constraints_rejects(input: Element) {
        let result: Result<BasicConstraints, Error> = input.decode();
        assert!(result.is_err());
    }

    #[rstest(input, expected,
        case(BasicConstraints { ca: false, path_len_constraint: None }, Element::Sequence(vec![])),
        case(
            BasicConstraints { ca: true, path_len_constraint: Some(3) },
            Element::Sequence(vec![Element::Boolean(true), Element::Integer(Integer::from(3))])
        ),
    )]
    fn test_encode_basic_constraints(input: BasicConstraints, expected: Element) {
        let encoded: Element = input.encode().unwrap();
        assert_eq!(expected, encoded);
    }

    #[rstest(input, expected,
        case(BasicConstraints { ca: true, path_len_constraint: Some(1) }, r#"{"cA":true,"pathLenConstraint":1}"#),
        case(BasicConstraints { ca: false, path_len_constraint: None }, r#"{"cA":false}"#),
    )]
    fn test_serialize_basic_constraints(input: BasicConstraints, expected: &str) {
        assert_eq!(expected, serde_json::to_string(&input).unwrap());
    }
}
