use asn1::{ASN1Object, BitString, Element, Integer};
use certlens::decoder::{DecodableFrom, Decoder};
use der::Der;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{DecodeError, Kind};
use crate::oid::{self, NameStyle};
use crate::tree::AlgorithmIdentifier;

/*
RFC 5280 Section 4.1
SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING
}

RFC 8017 Appendix A.1.1
RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<SubjectPublicKeyInfo, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(DecodeError::ExpectedSequence(Kind::SubjectPublicKeyInfo));
        };
        match elements.as_slice() {
            [algorithm, Element::BitString(key)] => {
                let algorithm: AlgorithmIdentifier = algorithm.decode()?;
                Ok(SubjectPublicKeyInfo {
                    algorithm,
                    subject_public_key: key.clone(),
                })
            }
            [_, _] => Err(DecodeError::ExpectedBitString(Kind::SubjectPublicKeyInfo)),
            _ => Err(DecodeError::InvalidElementCount {
                kind: Kind::SubjectPublicKeyInfo,
                expected: "2",
                actual: elements.len(),
            }),
        }
    }
}

/// Modulus and exponent as carried in the INTEGER contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub modulus: Integer,
    pub public_exponent: Integer,
}

impl DecodableFrom<Element> for RsaPublicKey {}

impl Decoder<Element, RsaPublicKey> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<RsaPublicKey, Self::Error> {
        match self {
            Element::Sequence(elements) => match elements.as_slice() {
                [Element::Integer(modulus), Element::Integer(public_exponent)] => {
                    Ok(RsaPublicKey {
                        modulus: modulus.clone(),
                        public_exponent: public_exponent.clone(),
                    })
                }
                [_, _] => Err(DecodeError::ExpectedInteger(Kind::RsaPublicKey)),
                _ => Err(DecodeError::InvalidElementCount {
                    kind: Kind::RsaPublicKey,
                    expected: "2",
                    actual: elements.len(),
                }),
            },
            _ => Err(DecodeError::ExpectedSequence(Kind::RsaPublicKey)),
        }
    }
}

impl RsaPublicKey {
    /// Decodes the DER carried in a `subjectPublicKey` bit string.
    pub fn from_der(bytes: &[u8]) -> Result<Self, DecodeError> {
        let der: Der = bytes.decode()?;
        let obj: ASN1Object = der.decode()?;
        match obj.elements() {
            [elem, ..] => elem.decode(),
            [] => Err(DecodeError::Empty),
        }
    }
}

/// Upper-case hex, most significant nybble of each byte first.
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Reads INTEGER contents as an unsigned magnitude by way of their hex text.
pub fn biguint_from_hex(bytes: &[u8]) -> Option<BigUint> {
    if bytes.is_empty() {
        return None;
    }
    BigUint::parse_bytes(to_hex(bytes).as_bytes(), 16)
}

fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    serializer.serialize_str(&hex)
}

fn serialize_decimal<S>(value: &Option<BigUint>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&v.to_str_radix(10)),
        None => serializer.serialize_none(),
    }
}

/// Public key fields for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyInfo {
    /// Braced form, e.g. `{ 1.2.840.113549.1.1.1 }`.
    pub algorithm_oid: String,
    pub algorithm_name: Option<&'static str>,
    #[serde(serialize_with = "serialize_hex")]
    pub key: Vec<u8>,
    pub bit_length: usize,
    #[serde(serialize_with = "serialize_decimal", skip_serializing_if = "Option::is_none")]
    pub rsa_modulus: Option<BigUint>,
    #[serde(serialize_with = "serialize_decimal", skip_serializing_if = "Option::is_none")]
    pub rsa_public_exponent: Option<BigUint>,
}

impl PublicKeyInfo {
    /// Size of the RSA modulus. `bit_length` counts the whole encoded
    /// RSAPublicKey instead.
    pub fn modulus_bits(&self) -> Option<u64> {
        self.rsa_modulus.as_ref().map(BigUint::bits)
    }
}

/// Builds a [`PublicKeyInfo`]. For rsaEncryption the key is decoded further;
/// if that fails the RSA fields stay `None`.
pub fn extract_public_key(spki: &SubjectPublicKeyInfo) -> PublicKeyInfo {
    let algorithm_oid = spki.algorithm.algorithm().braced();
    let key = spki.subject_public_key.as_bytes();

    let mut info = PublicKeyInfo {
        algorithm_name: oid::resolve(&algorithm_oid, NameStyle::Full),
        key: key.to_vec(),
        bit_length: spki.subject_public_key.bit_len(),
        rsa_modulus: None,
        rsa_public_exponent: None,
        algorithm_oid,
    };

    if info.algorithm_oid == oid::RSA_ENCRYPTION {
        match RsaPublicKey::from_der(key) {
            Ok(rsa) => {
                info.rsa_modulus = biguint_from_hex(&rsa.modulus.to_signed_bytes_be());
                info.rsa_public_exponent =
                    biguint_from_hex(&rsa.public_exponent.to_signed_bytes_be());
            }
            Err(e) => {
                warn!(oid = %info.algorithm_oid, error = %e, "failed to decode RSA public key");
            }
        }
    } else {
        debug!(oid = %info.algorithm_oid, "no further decoding for key algorithm");
    }
    info
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use asn1::ObjectIdentifier;
    use certlens::encoder::Encoder;
    use der::Tlv;
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::format::Format;
    use crate::tree;

    const RSA_MODULUS: &str = "963F784CCA0E8C897F739B133C7771D65B2C09E577EE69A591C91B5AFD7338C3766DE4CDF6B8F4931575B1E2EA3D9FD32C2069C6469888E25899829C073905396835E9587F198153C7E43DC110C33E32F867AEB7DC483C8387C37DB2BEC5DF0594EC5B1E2DFCC9D721E8D2EFECAB2F8E51A6BC27C8EC7856CD89E10F8D804C3B9997440A7621772FF85A7B9A99B1A06B5E06495A97E2E17EB0693C64DDEAD1DF4E556904C44F63F584C7BFC12D6A1412D1F1A0BD5710D5DFED3DC3F3B1EF682F380B77DE4627923C2AD2973D774B7732503787974786087E0B59D301FBF2656AE64BD4E9F2EA6747BDA23B3955305990528DA16F82C003661493DCE4684AABE3";

    fn spki(algorithm: &str, key: BitString) -> SubjectPublicKeyInfo {
        SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifier {
                algorithm: ObjectIdentifier::from_str(algorithm).unwrap(),
                parameters: Some(Element::Null),
            },
            subject_public_key: key,
        }
    }

    fn encode_der(element: Element) -> Vec<u8> {
        let tlv: Tlv = element.encode().unwrap();
        tlv.encode().unwrap()
    }

    #[rstest(input,
        case(&hex!("00 c3 5a 7f 01")),
        case(&hex!("01 00 01")),
        case(&hex!("ff")),
        case(&hex!("00 00 00 01")),
    )]
    fn test_biguint_from_hex_matches_big_endian(input: &[u8]) {
        assert_eq!(Some(BigUint::from_bytes_be(input)), biguint_from_hex(input));
    }

    #[test]
    fn test_biguint_from_hex_empty() {
        assert_eq!(None, biguint_from_hex(&[]));
    }

    #[test]
    fn test_extract_rsa_ca() {
        let tree = tree::decode(include_bytes!("../testdata/rsa_ca.der"), Format::Der).unwrap();
        let info = extract_public_key(&tree.tbs_certificate().subject_public_key_info);
        assert_eq!("{ 1.2.840.113549.1.1.1 }", info.algorithm_oid);
        assert_eq!(Some("rsaEncryption"), info.algorithm_name);
        assert_eq!(270 * 8, info.bit_length);
        assert_eq!(
            BigUint::parse_bytes(RSA_MODULUS.as_bytes(), 16),
            info.rsa_modulus
        );
        assert_eq!(Some(2048), info.modulus_bits());
        assert_eq!(Some(BigUint::from(65537u32)), info.rsa_public_exponent);
    }

    #[test]
    fn test_extract_ec_leaf() {
        let tree = tree::decode(include_bytes!("../testdata/ec_leaf.der"), Format::Der).unwrap();
        let info = extract_public_key(&tree.tbs_certificate().subject_public_key_info);
        assert_eq!(Some("id-ecPublicKey"), info.algorithm_name);
        assert_eq!(520, info.bit_length);
        assert_eq!(Some(&0x04), info.key.first());
        assert_eq!(None, info.rsa_modulus);
        assert_eq!(None, info.rsa_public_exponent);
        assert_eq!(None, info.modulus_bits());
    }

    #[test]
    fn test_extract_rsa_round_trip() {
        let modulus = hex!("00 c3 5a 7f 01 9e 22 41");
        let exponent = hex!("01 00 01");
        let key = encode_der(Element::Sequence(vec![
            Element::Integer(Integer::from(&modulus[..])),
            Element::Integer(Integer::from(&exponent[..])),
        ]));
        let info = extract_public_key(&spki("1.2.840.113549.1.1.1", BitString::new(0, key)));
        assert_eq!(Some(BigUint::from_bytes_be(&modulus)), info.rsa_modulus);
        assert_eq!(Some(BigUint::from_bytes_be(&exponent)), info.rsa_public_exponent);
    }

    #[rstest(key,
        case(BitString::new(0, vec![])),
        case(BitString::new(0, hex!("30 03 02 01 05").to_vec())),
        case(BitString::new(0, hex!("04 02 01 01").to_vec())),
        case(BitString::new(0, hex!("30 06 02 01").to_vec())),
    )]
    fn test_extract_rsa_malformed_key(key: BitString) {
        let info = extract_public_key(&spki("1.2.840.113549.1.1.1", key.clone()));
        assert_eq!(None, info.rsa_modulus);
        assert_eq!(None, info.rsa_public_exponent);
        assert_eq!(key.bit_len(), info.bit_length);
    }

    #[rstest(input, expected,
        case(&hex!("30 03 02 01 05"), "RSAPublicKey: expected 2 elements, got 1"),
        case(&hex!("30 05 02 01 05 05 00"), "RSAPublicKey: expected INTEGER"),
        case(&hex!("04 02 01 01"), "RSAPublicKey: expected SEQUENCE"),
    )]
    fn test_rsa_public_key_errors(input: &[u8], expected: &str) {
        let err = RsaPublicKey::from_der(input).unwrap_err();
        assert_eq!(expected, err.to_string());
    }

    #[test]
    fn test_bit_length_subtracts_unused_bits() {
        let info = extract_public_key(&spki("1.3.101.112", BitString::new(3, vec![0xff, 0xf8])));
        assert_eq!(13, info.bit_length);
        assert_eq!(None, info.rsa_modulus);
    }

    #[test]
    fn test_serialize_public_key_info() {
        let key = encode_der(Element::Sequence(vec![
            Element::Integer(Integer::from(&hex!("00 ff 01")[..])),
            Element::Integer(Integer::from(3)),
        ]));
        let info = extract_public_key(&spki("1.2.840.113549.1.1.1", BitString::new(0, key)));
        assert_eq!(
            r#"{"algorithmOid":"{ 1.2.840.113549.1.1.1 }","algorithmName":"rsaEncryption","key":"3008020300ff01020103","bitLength":80,"rsaModulus":"65281","rsaPublicExponent":"3"}"#,
            serde_json::to_string(&info).unwrap()
        );
    }

    #[rstest(input,
        case(Element::Sequence(vec![])),
        case(Element::Sequence(vec![Element::Null, Element::Null])),
        case(Element::Set(vec![])),
    )]
    fn test_decode_spki_rejects(input: Element) {
        let result: Result<SubjectPublicKeyInfo, DecodeError> = input.decode();
        assert!(result.is_err());
    }
}
