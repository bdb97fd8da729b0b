//! Errors raised while decoding extension payloads.
//!
//! These stay inside the extraction layer: a failure here only makes the
//! affected field absent.

use thiserror::Error;

/// Context for where an extension error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    KeyUsage,
    SubjectAltName,
    BasicConstraints,
    GeneralName,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::GeneralName => write!(f, "GeneralName"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: no value")]
    Empty(Kind),

    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),

    #[error("{0}: expected INTEGER")]
    ExpectedInteger(Kind),

    #[error("{0}: unexpected element")]
    UnexpectedElementType(Kind),

    #[error("GeneralName: unknown context-specific tag [{0}]")]
    UnknownGeneralNameTag(u8),

    #[error("GeneralName: tag [{0}] has the wrong encoding form")]
    GeneralNameInvalidForm(u8),

    #[error("GeneralName: dNSName must be valid ASCII")]
    GeneralNameInvalidAscii,

    #[error("GeneralName: otherName must be SEQUENCE {{ type-id, [0] value }}")]
    OtherNameInvalidStructure,

    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[from] asn1::error::Error),

    #[error("invalid DER: {0}")]
    InvalidDer(#[from] der::error::Error),

    #[error("invalid name: {0}")]
    InvalidName(#[from] crate::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
