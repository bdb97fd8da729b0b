use std::fmt;

use num_bigint::TryFromBigIntError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which part of the certificate structure a [`DecodeError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Certificate,
    TbsCertificate,
    Version,
    AlgorithmIdentifier,
    Name,
    RelativeDistinguishedName,
    AttributeTypeAndValue,
    Validity,
    SubjectPublicKeyInfo,
    RsaPublicKey,
    Extensions,
    Extension,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Certificate => write!(f, "Certificate"),
            Self::TbsCertificate => write!(f, "TBSCertificate"),
            Self::Version => write!(f, "Version"),
            Self::AlgorithmIdentifier => write!(f, "AlgorithmIdentifier"),
            Self::Name => write!(f, "Name"),
            Self::RelativeDistinguishedName => write!(f, "RelativeDistinguishedName"),
            Self::AttributeTypeAndValue => write!(f, "AttributeTypeAndValue"),
            Self::Validity => write!(f, "Validity"),
            Self::SubjectPublicKeyInfo => write!(f, "SubjectPublicKeyInfo"),
            Self::RsaPublicKey => write!(f, "RSAPublicKey"),
            Self::Extensions => write!(f, "Extensions"),
            Self::Extension => write!(f, "Extension"),
        }
    }
}

/// Failure to turn bytes into a [`CertificateTree`](crate::tree::CertificateTree).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("DER: {0}")]
    Der(#[from] der::error::Error),

    #[error("ASN.1: {0}")]
    Asn1(#[from] asn1::error::Error),

    #[error("no data")]
    Empty,

    #[error("XER input is not supported by this decoder")]
    XerUnsupported,

    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: expected SET")]
    ExpectedSet(Kind),

    #[error("{0}: expected OBJECT IDENTIFIER")]
    ExpectedOid(Kind),

    #[error("{0}: expected INTEGER")]
    ExpectedInteger(Kind),

    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),

    #[error("{0}: expected OCTET STRING")]
    ExpectedOctetString(Kind),

    #[error("{0}: expected UTCTime or GeneralizedTime")]
    ExpectedTime(Kind),

    #[error("{kind}: expected {expected} elements, got {actual}")]
    InvalidElementCount {
        kind: Kind,
        expected: &'static str,
        actual: usize,
    },

    #[error("{0}: unexpected element")]
    UnexpectedElement(Kind),
}

/// Errors surfaced to callers of [`X509Certificate`](crate::X509Certificate).
#[derive(Debug, Error)]
pub enum Error {
    #[error("empty certificate")]
    EmptyCertificate,

    #[error("decode failure: {0}")]
    DecodeFailure(#[from] DecodeError),

    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("{field}: {source}")]
    NumericConversionFailure {
        field: &'static str,
        #[source]
        source: TryFromBigIntError<()>,
    },

    #[error("PEM: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
}
