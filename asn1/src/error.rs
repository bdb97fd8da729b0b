//! Error types for ASN.1 element decoding and encoding.

use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid boolean")]
    InvalidBoolean,

    #[error("INTEGER: no data")]
    IntegerNoData,

    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: arc does not fit 64 bits")]
    ObjectIdentifierArcTooLarge,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid first arcs {0}.{1}")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component: {0}")]
    ObjectIdentifierInvalidComponent(#[source] ParseIntError),

    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    #[error("NULL: must have empty contents")]
    NullWithContents,

    #[error("{0}: constructed encoding holds a segment of another type")]
    InvalidSegment(&'static str),

    #[error("UTCTime: invalid format '{0}'")]
    UtcTimeInvalidFormat(String),
    #[error("GeneralizedTime: invalid format '{0}'")]
    GeneralizedTimeInvalidFormat(String),

    #[error("invalid context-specific value: [{slot}], {msg}")]
    InvalidContextSpecific { slot: u8, msg: &'static str },

    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[source] der::error::Error),

    #[error("element: cannot encode {0}")]
    ElementCannotEncode(&'static str),
}
