use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Input encoding accepted by [`X509Certificate::parse`](crate::X509Certificate::parse).
///
/// BER, CER and DER all go through the same BER parser, since CER and DER
/// are restrictions of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Ber,
    Cer,
    Der,
    Xer,
}

impl Format {
    pub fn is_ber_family(&self) -> bool {
        matches!(self, Format::Ber | Format::Cer | Format::Der)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ber" => Ok(Format::Ber),
            "cer" => Ok(Format::Cer),
            "der" => Ok(Format::Der),
            "xer" => Ok(Format::Xer),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Ber => write!(f, "ber"),
            Format::Cer => write!(f, "cer"),
            Format::Der => write!(f, "der"),
            Format::Xer => write!(f, "xer"),
        }
    }
}
