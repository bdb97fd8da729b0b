//! The decoded certificate structure handed to the extraction layer.

use std::fmt;

use asn1::{ASN1Object, BitString, Element, GeneralizedTime, Integer, ObjectIdentifier, UtcTime};
use certlens::decoder::{DecodableFrom, Decoder};
use der::Tlv;
use tracing::debug;

use crate::error::{DecodeError, Kind};
use crate::extensions::RawExtension;
use crate::format::Format;
use crate::name::Name;
use crate::public_key::SubjectPublicKeyInfo;

/*
RFC 5280 Section 4.1
Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}

TBSCertificate  ::=  SEQUENCE  {
    version         [0]  EXPLICIT Version DEFAULT v1,
    serialNumber         CertificateSerialNumber,
    signature            AlgorithmIdentifier,
    issuer               Name,
    validity             Validity,
    subject              Name,
    subjectPublicKeyInfo SubjectPublicKeyInfo,
    issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
    subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
    extensions      [3]  EXPLICIT Extensions OPTIONAL
}
*/

/// A decoded certificate. The full element tree is kept alongside the typed
/// view for the structure printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateTree {
    pub(crate) tbs_certificate: TbsCertificate,
    pub(crate) signature_algorithm: AlgorithmIdentifier,
    pub(crate) signature_value: BitString,
    pub(crate) raw: ASN1Object,
}

impl CertificateTree {
    pub fn tbs_certificate(&self) -> &TbsCertificate {
        &self.tbs_certificate
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> &BitString {
        &self.signature_value
    }

    pub fn raw(&self) -> &ASN1Object {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertificate {
    pub(crate) version: Option<Integer>,
    pub(crate) serial_number: Integer,
    pub(crate) signature: AlgorithmIdentifier,
    pub(crate) issuer: Name,
    pub(crate) validity: Validity,
    pub(crate) subject: Name,
    pub(crate) subject_public_key_info: SubjectPublicKeyInfo,
    pub(crate) issuer_unique_id: Option<BitString>,
    pub(crate) subject_unique_id: Option<BitString>,
    pub(crate) extensions: Vec<RawExtension>,
}

impl TbsCertificate {
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    pub fn subject(&self) -> &Name {
        &self.subject
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.subject_public_key_info
    }

    pub fn extensions(&self) -> &[RawExtension] {
        &self.extensions
    }
}

/*
AlgorithmIdentifier  ::=  SEQUENCE  {
    algorithm               OBJECT IDENTIFIER,
    parameters              ANY DEFINED BY algorithm OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub(crate) algorithm: ObjectIdentifier,
    pub(crate) parameters: Option<Element>,
}

impl AlgorithmIdentifier {
    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&Element> {
        self.parameters.as_ref()
    }
}

/*
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time
}

Time ::= CHOICE {
    utcTime        UTCTime,
    generalTime    GeneralizedTime
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Time {
    Utc(UtcTime),
    Generalized(GeneralizedTime),
}

impl Time {
    /// Seconds since the Unix epoch, or `None` when the text is malformed.
    pub fn to_epoch(&self) -> Option<i64> {
        let converted = match self {
            Time::Utc(t) => t.to_datetime(),
            Time::Generalized(t) => t.to_datetime(),
        };
        match converted {
            Ok(datetime) => Some(datetime.timestamp()),
            Err(e) => {
                debug!(time = %self, error = %e, "cannot convert time");
                None
            }
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Time::Utc(t) => write!(f, "{}", t),
            Time::Generalized(t) => write!(f, "{}", t),
        }
    }
}

/// Either side is `None` when it holds something other than a `Time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validity {
    pub(crate) not_before: Option<Time>,
    pub(crate) not_after: Option<Time>,
}

impl Validity {
    pub fn not_before(&self) -> Option<&Time> {
        self.not_before.as_ref()
    }

    pub fn not_after(&self) -> Option<&Time> {
        self.not_after.as_ref()
    }
}

/// Decodes `bytes` into a certificate tree.
///
/// Only the first complete element is read; anything after it is ignored.
pub fn decode(bytes: &[u8], format: Format) -> Result<CertificateTree, DecodeError> {
    if !format.is_ber_family() {
        return Err(DecodeError::XerUnsupported);
    }
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let (tlv, rest) = Tlv::parse(bytes)?;
    if !rest.is_empty() {
        debug!(trailing = rest.len(), "ignoring bytes after the certificate");
    }
    let element = Element::try_from(&tlv)?;
    element.decode()
}

impl DecodableFrom<Element> for CertificateTree {}

impl Decoder<Element, CertificateTree> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<CertificateTree, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(DecodeError::ExpectedSequence(Kind::Certificate));
        };
        let [tbs, algorithm, signature] = elements.as_slice() else {
            return Err(DecodeError::InvalidElementCount {
                kind: Kind::Certificate,
                expected: "3",
                actual: elements.len(),
            });
        };
        let Element::BitString(signature_value) = signature else {
            return Err(DecodeError::ExpectedBitString(Kind::Certificate));
        };

        let tbs_certificate: TbsCertificate = tbs.decode()?;
        let signature_algorithm: AlgorithmIdentifier = algorithm.decode()?;
        Ok(CertificateTree {
            tbs_certificate,
            signature_algorithm,
            signature_value: signature_value.clone(),
            raw: ASN1Object::new(vec![self.clone()]),
        })
    }
}

impl DecodableFrom<Element> for TbsCertificate {}

impl Decoder<Element, TbsCertificate> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<TbsCertificate, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(DecodeError::ExpectedSequence(Kind::TbsCertificate));
        };
        let mut iter = elements.iter();
        let mut next = || {
            iter.next().ok_or(DecodeError::InvalidElementCount {
                kind: Kind::TbsCertificate,
                expected: "at least 6",
                actual: elements.len(),
            })
        };

        let mut first = next()?;
        let version = match first {
            Element::ContextSpecific { slot: 0, .. } => {
                let version = match first.explicit_inner() {
                    Some(Element::Integer(v)) => v.clone(),
                    _ => return Err(DecodeError::ExpectedInteger(Kind::Version)),
                };
                first = next()?;
                Some(version)
            }
            _ => None,
        };
        let serial_number = match first {
            Element::Integer(serial) => serial.clone(),
            _ => return Err(DecodeError::ExpectedInteger(Kind::TbsCertificate)),
        };
        let signature: AlgorithmIdentifier = next()?.decode()?;
        let issuer: Name = next()?.decode()?;
        let validity: Validity = next()?.decode()?;
        let subject: Name = next()?.decode()?;
        let subject_public_key_info: SubjectPublicKeyInfo = next()?.decode()?;

        let mut issuer_unique_id = None;
        let mut subject_unique_id = None;
        let mut extensions = Vec::new();
        for elem in iter {
            match elem {
                Element::ContextSpecific { slot: 1, .. } => {
                    issuer_unique_id = Some(unique_identifier(elem)?);
                }
                Element::ContextSpecific { slot: 2, .. } => {
                    subject_unique_id = Some(unique_identifier(elem)?);
                }
                Element::ContextSpecific { slot: 3, .. } => match elem.explicit_inner() {
                    Some(Element::Sequence(raw)) => {
                        extensions = raw
                            .iter()
                            .map(|ext| ext.decode())
                            .collect::<Result<Vec<RawExtension>, _>>()?;
                    }
                    _ => return Err(DecodeError::ExpectedSequence(Kind::Extensions)),
                },
                _ => return Err(DecodeError::UnexpectedElement(Kind::TbsCertificate)),
            }
        }

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id,
            subject_unique_id,
            extensions,
        })
    }
}

fn unique_identifier(elem: &Element) -> Result<BitString, DecodeError> {
    let bytes = elem
        .implicit_bytes()
        .ok_or(DecodeError::ExpectedBitString(Kind::TbsCertificate))?;
    Ok(BitString::try_from(bytes)?)
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<AlgorithmIdentifier, Self::Error> {
        match self {
            Element::Sequence(elements) => match elements.as_slice() {
                [Element::ObjectIdentifier(algorithm)] => Ok(AlgorithmIdentifier {
                    algorithm: algorithm.clone(),
                    parameters: None,
                }),
                [Element::ObjectIdentifier(algorithm), parameters] => Ok(AlgorithmIdentifier {
                    algorithm: algorithm.clone(),
                    parameters: Some(parameters.clone()),
                }),
                [_] | [_, _] => Err(DecodeError::ExpectedOid(Kind::AlgorithmIdentifier)),
                _ => Err(DecodeError::InvalidElementCount {
                    kind: Kind::AlgorithmIdentifier,
                    expected: "1 or 2",
                    actual: elements.len(),
                }),
            },
            _ => Err(DecodeError::ExpectedSequence(Kind::AlgorithmIdentifier)),
        }
    }
}

fn time(elem: &Element) -> Option<Time> {
    match elem {
        Element::UTCTime(t) => Some(Time::Utc(t.clone())),
        Element::GeneralizedTime(t) => Some(Time::Generalized(t.clone())),
        other => {
            debug!(element = %other, "validity holds a non-time element");
            None
        }
    }
}

impl DecodableFrom<Element> for Validity {}

impl Decoder<Element, Validity> for Element {
    type Error = DecodeError;

    fn decode(&self) -> Result<Validity, Self::Error> {
        match self {
            Element::Sequence(elements) => match elements.as_slice() {
                [not_before, not_after] => Ok(Validity {
                    not_before: time(not_before),
                    not_after: time(not_after),
                }),
                _ => Err(DecodeError::InvalidElementCount {
                    kind: Kind::Validity,
                    expected: "2",
                    actual: elements.len(),
                }),
            },
            _ => Err(DecodeError::ExpectedSequence(Kind::Validity)),
        }
    }
}
