use std::str::FromStr;

use pem::Pem;
use tracing::debug;
use x509::{Format, X509Certificate};

use crate::error::{Error, Result};
use crate::output::InputFormat;

/// Decode a certificate from raw input.
///
/// Without an explicit format, text that parses as PEM goes through the PEM
/// path and anything else is read as DER.
pub(crate) fn load_certificate(bytes: &[u8], format: Option<InputFormat>) -> Result<X509Certificate> {
    let format = match format {
        Some(format) => format,
        None if looks_like_pem(bytes) => InputFormat::Pem,
        None => InputFormat::Der,
    };
    debug!(?format, len = bytes.len(), "decoding certificate");

    let cert = match format {
        InputFormat::Pem => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| Error::InvalidInput(format!("PEM input is not UTF-8: {e}")))?;
            X509Certificate::from_pem(text)?
        }
        InputFormat::Ber => parse(bytes, Format::Ber)?,
        InputFormat::Cer => parse(bytes, Format::Cer)?,
        InputFormat::Der => parse(bytes, Format::Der)?,
        InputFormat::Xer => parse(bytes, Format::Xer)?,
    };
    Ok(cert)
}

fn parse(bytes: &[u8], format: Format) -> Result<X509Certificate> {
    let mut cert = X509Certificate::default();
    cert.parse_with(bytes, format)?;
    Ok(cert)
}

fn looks_like_pem(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => Pem::from_str(text).is_ok(),
        Err(_) => false,
    }
}
