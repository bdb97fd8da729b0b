use base64::DecodeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading PEM armor (RFC 7468).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN ...-----` line was found.
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// The block was opened but never closed.
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    #[error("missing PEM data")]
    MissingData,

    /// The label is not one of the certificate labels.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// BEGIN and END carry different labels.
    #[error("label doesn't match: BEGIN {begin}, END {end}")]
    LabelMismatch { begin: String, end: String },

    #[error("invalid base64 line: {0}")]
    InvalidBase64Line(String),

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}
