//! Certificate extensions: the raw `Extension` structure and the decoder that
//! interprets the well-known ones.

use std::collections::BTreeSet;

use asn1::{ASN1Object, Element, ObjectIdentifier, OctetString};
use certlens::decoder::{DecodableFrom, Decoder};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{DecodeError, Kind};
use crate::oid::{self, NameStyle};

mod basic_constraints;
pub mod error;
mod general_name;
mod key_usage;
mod subject_alt_name;

pub use basic_constraints::BasicConstraints;
pub use general_name::GeneralName;
pub use key_usage::{KeyUsage, KeyUsageFlag};
pub use subject_alt_name::SubjectAltName;

/*
RFC 5280 Section 4.1
Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
                -- contains the DER encoding of an ASN.1 value
                -- corresponding to the extension type identified
                -- by extnID
}
*/

/// An extension as it appears in the certificate, with `extnValue` still
/// encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtension {
    extn_id: ObjectIdentifier,
    critical: Option<bool>,
    extn_value: OctetString,
}

impl RawExtension {
    pub fn new(extn_id: ObjectIdentifier, critical: Option<bool>, extn_value: OctetString) -> Self {
        RawExtension {
            extn_id,
            critical,
            extn_value,
        }
    }

    pub fn extn_id(&self) -> &ObjectIdentifier {
        &self.extn_id
    }

    /// The criticality flag, `false` when it was not encoded.
    pub fn critical(&self) -> bool {
        self.critical.unwrap_or(false)
    }

    pub fn extn_value(&self) -> &OctetString {
        &self.extn_value
    }
}

impl DecodableFrom<Element> for RawExtension {}

impl Decoder<Element, RawExtension> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<RawExtension, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(DecodeError::ExpectedSequence(Kind::Extension));
        };
        let (extn_id, critical, extn_value) = match elements.as_slice() {
            [Element::ObjectIdentifier(id), Element::OctetString(value)] => (id, None, value),
            [
                Element::ObjectIdentifier(id),
                Element::Boolean(critical),
                Element::OctetString(value),
            ] => (id, Some(*critical), value),
            [Element::ObjectIdentifier(_), ..] if (2..=3).contains(&elements.len()) => {
                return Err(DecodeError::ExpectedOctetString(Kind::Extension));
            }
            [_, ..] if (2..=3).contains(&elements.len()) => {
                return Err(DecodeError::ExpectedOid(Kind::Extension));
            }
            _ => {
                return Err(DecodeError::InvalidElementCount {
                    kind: Kind::Extension,
                    expected: "2 or 3",
                    actual: elements.len(),
                });
            }
        };
        Ok(RawExtension {
            extn_id: extn_id.clone(),
            critical,
            extn_value: extn_value.clone(),
        })
    }
}

/// Decoded payload of an extension. `None` means the inner value was absent
/// or failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
    KeyUsage(Option<KeyUsage>),
    /// Non-empty dNSNames; `None` also when there are none.
    SubjectAltName(Option<BTreeSet<String>>),
    BasicConstraints(Option<BasicConstraints>),
    Unknown,
}

/// One entry of [`decode_extensions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRecord {
    oid: ObjectIdentifier,
    name: String,
    critical: bool,
    value: ExtensionValue,
}

impl ExtensionRecord {
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    /// Registry name, or the braced OID when the registry has none.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn value(&self) -> &ExtensionValue {
        &self.value
    }

    pub fn key_usage(&self) -> Option<&KeyUsage> {
        match &self.value {
            ExtensionValue::KeyUsage(key_usage) => key_usage.as_ref(),
            _ => None,
        }
    }

    pub fn dns_names(&self) -> Option<&BTreeSet<String>> {
        match &self.value {
            ExtensionValue::SubjectAltName(names) => names.as_ref(),
            _ => None,
        }
    }

    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        match &self.value {
            ExtensionValue::BasicConstraints(bc) => bc.as_ref(),
            _ => None,
        }
    }
}

impl Serialize for ExtensionRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("oid", &self.oid)?;
        map.serialize_entry("critical", &self.critical)?;
        match &self.value {
            ExtensionValue::KeyUsage(Some(key_usage)) => {
                map.serialize_entry("keyUsage", key_usage)?;
            }
            ExtensionValue::SubjectAltName(Some(names)) => {
                map.serialize_entry("dNSName", names)?;
            }
            ExtensionValue::BasicConstraints(Some(bc)) => {
                map.serialize_entry("cA", &bc.ca)?;
                if let Some(path_len) = bc.path_len_constraint {
                    map.serialize_entry("pathLenConstraint", &path_len)?;
                }
            }
            _ => {}
        }
        map.end()
    }
}

/// Decodes the first element of `extnValue`; bytes after it are ignored.
fn inner_element<T>(value: &OctetString) -> Result<T, error::Error>
where
    T: DecodableFrom<Element>,
    Element: Decoder<Element, T, Error = error::Error>,
{
    let obj = ASN1Object::try_from(value)?;
    match obj.elements() {
        [elem, ..] => Decoder::<Element, T>::decode(elem),
        [] => Err(error::Error::InvalidAsn1(asn1::error::Error::InvalidSegment(
            "extnValue",
        ))),
    }
}

/// Interprets keyUsage, subjectAltName and basicConstraints and passes every
/// other extension through with its name and criticality.
///
/// A payload that fails to decode is logged and left absent; the record is
/// still returned. Output order is the encoded order.
pub fn decode_extensions(extensions: &[RawExtension]) -> Vec<ExtensionRecord> {
    extensions.iter().map(decode_extension).collect()
}

fn decode_extension(raw: &RawExtension) -> ExtensionRecord {
    let braced = raw.extn_id.braced();
    let name = oid::resolve(&braced, NameStyle::Full)
        .map(str::to_string)
        .unwrap_or_else(|| braced.clone());
    let critical = raw.critical();

    let payload = |kind: error::Kind| {
        if raw.extn_value.as_bytes().is_empty() {
            debug!(oid = %braced, critical, extension = %kind, "empty extnValue");
            None
        } else {
            Some(&raw.extn_value)
        }
    };
    let report = |e: error::Error| {
        if critical {
            warn!(oid = %braced, critical, error = %e, "failed to decode critical extension");
        } else {
            debug!(oid = %braced, critical, error = %e, "failed to decode extension");
        }
    };

    let value = match braced.as_str() {
        oid::KEY_USAGE => ExtensionValue::KeyUsage(
            payload(error::Kind::KeyUsage)
                .and_then(|v| inner_element::<KeyUsage>(v).map_err(report).ok()),
        ),
        oid::SUBJECT_ALT_NAME => ExtensionValue::SubjectAltName(
            payload(error::Kind::SubjectAltName)
                .and_then(|v| inner_element::<SubjectAltName>(v).map_err(report).ok())
                .map(|san| san.dns_names())
                .filter(|names| !names.is_empty()),
        ),
        oid::BASIC_CONSTRAINTS => ExtensionValue::BasicConstraints(
            payload(error::Kind::BasicConstraints)
                .and_then(|v| inner_element::<BasicConstraints>(v).map_err(report).ok()),
        ),
        _ => ExtensionValue::Unknown,
    };

    ExtensionRecord {
        oid: raw.extn_id.clone(),
        name,
        critical,
        value,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use certlens::encoder::Encoder;
    use der::Tlv;
    use rstest::rstest;

    use super::*;
    use crate::format::Format;
    use crate::tree;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    /// DER bytes of `element`, wrapped as an extnValue.
    fn extn_value(element: Element) -> OctetString {
        let tlv: Tlv = element.encode().unwrap();
        let bytes: Vec<u8> = tlv.encode().unwrap();
        OctetString::from(bytes)
    }

    fn raw(dotted: &str, critical: Option<bool>, value: Element) -> RawExtension {
        RawExtension::new(oid(dotted), critical, extn_value(value))
    }

    #[test]
    fn test_decode_rsa_ca_extensions() {
        let tree = tree::decode(include_bytes!("../../testdata/rsa_ca.der"), Format::Der).unwrap();
        let records = decode_extensions(tree.tbs_certificate().extensions());
        let names: Vec<&str> = records.iter().map(ExtensionRecord::name).collect();
        assert_eq!(
            vec!["basicConstraints", "keyUsage", "subjectAltName", "subjectKeyIdentifier"],
            names
        );

        let bc = records[0].basic_constraints().unwrap();
        assert!(records[0].critical());
        assert!(bc.ca);
        assert_eq!(Some(1), bc.path_len_constraint);

        assert!(records[1].critical());
        assert_eq!(
            BTreeSet::from(["cRLSign", "digitalSignature", "keyCertSign"]),
            records[1].key_usage().unwrap().names()
        );

        assert!(!records[2].critical());
        assert_eq!(
            &BTreeSet::from([
                "certlens-test.example".to_string(),
                "www.certlens-test.example".to_string(),
            ]),
            records[2].dns_names().unwrap()
        );

        assert_eq!(&ExtensionValue::Unknown, records[3].value());
    }

    #[test]
    fn test_decode_ec_leaf_extensions() {
        let tree = tree::decode(include_bytes!("../../testdata/ec_leaf.der"), Format::Der).unwrap();
        let records = decode_extensions(tree.tbs_certificate().extensions());
        assert_eq!(4, records.len());

        let key_usage = records
            .iter()
            .find_map(ExtensionRecord::key_usage)
            .unwrap();
        assert_eq!(
            BTreeSet::from(["decipherOnly", "digitalSignature", "keyAgreement"]),
            key_usage.names()
        );

        let bc = records
            .iter()
            .find_map(ExtensionRecord::basic_constraints)
            .unwrap();
        assert_eq!(&BasicConstraints::default(), bc);

        let unknown = records.iter().find(|r| r.oid() == &"1.2.3.4").unwrap();
        assert_eq!("{ 1.2.3.4 }", unknown.name());
        assert_eq!(&ExtensionValue::Unknown, unknown.value());
    }

    #[rstest]
    #[case::key_usage_not_a_bit_string(
        raw("2.5.29.15", Some(true), Element::Null),
        ExtensionValue::KeyUsage(None)
    )]
    #[case::basic_constraints_not_a_sequence(
        raw("2.5.29.19", None, Element::Boolean(true)),
        ExtensionValue::BasicConstraints(None)
    )]
    #[case::san_without_dns_names(
        raw("2.5.29.17", None, Element::Sequence(vec![
            GeneralName::Rfc822Name("ops@a.example".to_string()).encode().unwrap(),
        ])),
        ExtensionValue::SubjectAltName(None)
    )]
    #[case::san_with_malformed_alternative(
        raw("2.5.29.17", None, Element::Sequence(vec![
            GeneralName::DnsName("a.example".to_string()).encode().unwrap(),
            Element::ContextSpecific {
                slot: 9,
                constructed: false,
                element: Box::new(Element::OctetString(vec![1, 2, 3].into())),
            },
        ])),
        ExtensionValue::SubjectAltName(None)
    )]
    #[case::san_with_address_and_mask(
        raw("2.5.29.17", None, Element::Sequence(vec![
            GeneralName::DnsName("example.com".to_string()).encode().unwrap(),
            Element::ContextSpecific {
                slot: 7,
                constructed: false,
                element: Box::new(Element::OctetString(vec![10, 0, 0, 0, 255, 0, 0, 0].into())),
            },
        ])),
        ExtensionValue::SubjectAltName(Some(BTreeSet::from(["example.com".to_string()])))
    )]
    #[case::san_with_non_ascii_rfc822_name(
        raw("2.5.29.17", None, Element::Sequence(vec![
            GeneralName::DnsName("example.com".to_string()).encode().unwrap(),
            Element::ContextSpecific {
                slot: 1,
                constructed: false,
                element: Box::new(Element::OctetString(vec![0xc3, 0xa9, 0x40, 0x78].into())),
            },
        ])),
        ExtensionValue::SubjectAltName(Some(BTreeSet::from(["example.com".to_string()])))
    )]
    #[case::san_mixed(
        raw("2.5.29.17", None, Element::Sequence(vec![
            GeneralName::DnsName("example.com".to_string()).encode().unwrap(),
            GeneralName::Uri("https://example.com/".to_string()).encode().unwrap(),
        ])),
        ExtensionValue::SubjectAltName(Some(BTreeSet::from(["example.com".to_string()])))
    )]
    #[case::basic_constraints_path_len(
        raw("2.5.29.19", Some(true), BasicConstraints { ca: true, path_len_constraint: Some(3) }.encode().unwrap()),
        ExtensionValue::BasicConstraints(Some(BasicConstraints { ca: true, path_len_constraint: Some(3) }))
    )]
    #[case::key_usage_flags(
        raw("2.5.29.15", None, KeyUsage::new([KeyUsageFlag::DigitalSignature, KeyUsageFlag::KeyCertSign]).encode().unwrap()),
        ExtensionValue::KeyUsage(Some(KeyUsage::new([KeyUsageFlag::DigitalSignature, KeyUsageFlag::KeyCertSign])))
    )]
    #[case::empty_extn_value(
        RawExtension::new(oid("2.5.29.15"), None, OctetString::from(vec![])),
        ExtensionValue::KeyUsage(None)
    )]
    #[case::truncated_extn_value(
        RawExtension::new(oid("2.5.29.19"), None, OctetString::from(vec![0x30, 0x03, 0x01])),
        ExtensionValue::BasicConstraints(None)
    )]
    fn test_decode_extension_payloads(#[case] input: RawExtension, #[case] expected: ExtensionValue) {
        let records = decode_extensions(std::slice::from_ref(&input));
        assert_eq!(1, records.len());
        assert_eq!(&expected, records[0].value());
        assert_eq!(input.critical(), records[0].critical());
    }

    #[test]
    fn test_decode_extensions_keeps_order_and_failures() {
        let input = vec![
            raw("1.3.6.1.4.1.11129.2.4.2", None, Element::OctetString(vec![0].into())),
            raw("2.5.29.15", Some(true), Element::Null),
            raw("2.5.29.19", None, BasicConstraints::default().encode().unwrap()),
        ];
        let records = decode_extensions(&input);
        let names: Vec<&str> = records.iter().map(ExtensionRecord::name).collect();
        assert_eq!(
            vec!["signedCertificateTimestampList", "keyUsage", "basicConstraints"],
            names
        );
    }

    #[rstest(input,
        case(Element::Sequence(vec![Element::ObjectIdentifier(oid("2.5.29.15"))])),
        case(Element::Sequence(vec![Element::Null, Element::OctetString(vec![].into())])),
        case(Element::Sequence(vec![Element::ObjectIdentifier(oid("2.5.29.15")), Element::Boolean(true)])),
        case(Element::Set(vec![])),
    )]
    fn test_decode_raw_extension_rejects(input: Element) {
        let result: Result<RawExtension, DecodeError> = input.decode();
        assert!(result.is_err());
    }

    #[rstest(input, expected,
        case(
            raw("2.5.29.19", Some(true), BasicConstraints { ca: true, path_len_constraint: Some(0) }.encode().unwrap()),
            r#"{"name":"basicConstraints","oid":"2.5.29.19","critical":true,"cA":true,"pathLenConstraint":0}"#
        ),
        case(
            raw("2.5.29.15", None, KeyUsage::new([KeyUsageFlag::CRLSign]).encode().unwrap()),
            r#"{"name":"keyUsage","oid":"2.5.29.15","critical":false,"keyUsage":["cRLSign"]}"#
        ),
        case(
            raw("1.2.3.4", None, Element::Null),
            r#"{"name":"{ 1.2.3.4 }","oid":"1.2.3.4","critical":false}"#
        ),
    )]
    fn test_serialize_extension_record(input: RawExtension, expected: &str) {
        let records = decode_extensions(&[input]);
        assert_eq!(expected, serde_json::to_string(&records[0]).unwrap());
    }
}
