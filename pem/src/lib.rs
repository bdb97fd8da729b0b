pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use certlens::decoder::{DecodableFrom, Decoder};
use error::{Error, Result};
use regex::Regex;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const X509_CERTIFICATE_LABEL: &str = "X509 CERTIFICATE";
const TRUSTED_CERTIFICATE_LABEL: &str = "TRUSTED CERTIFICATE";

static BOUNDARY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----\s*$").ok());

static BASE64_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]*=?=?$").ok());

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-5.1
The "X509 CERTIFICATE" label is legacy, "TRUSTED CERTIFICATE" is the
OpenSSL trust-annotated form. Both carry a DER Certificate.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Certificate,
    X509Certificate,
    TrustedCertificate,
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Certificate => write!(f, "{}", CERTIFICATE_LABEL),
            Label::X509Certificate => write!(f, "{}", X509_CERTIFICATE_LABEL),
            Label::TrustedCertificate => write!(f, "{}", TRUSTED_CERTIFICATE_LABEL),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CERTIFICATE_LABEL => Ok(Label::Certificate),
            X509_CERTIFICATE_LABEL => Ok(Label::X509Certificate),
            TRUSTED_CERTIFICATE_LABEL => Ok(Label::TrustedCertificate),
            _ => Err(Error::InvalidLabel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin,
    End,
}

/// Splits an encapsulation boundary line into its kind and raw label.
fn boundary(line: &str) -> Option<(Boundary, &str)> {
    let re = BOUNDARY.as_ref()?;
    let captured = re.captures(line)?;
    let kind = match captured.get(1)?.as_str() {
        "BEGIN" => Boundary::Begin,
        _ => Boundary::End,
    };
    Some((kind, captured.get(2)?.as_str()))
}

fn is_base64_line(line: &str) -> bool {
    BASE64_LINE
        .as_ref()
        .is_some_and(|re| !line.is_empty() && re.is_match(line))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String,
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem {
            label,
            base64_data: STANDARD.encode(data),
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        for chunk in self.base64_data.as_bytes().chunks(64) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>> {
        STANDARD.decode(self.data()).map_err(Error::Base64Decode)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem> {
        Pem::from_str(self)
    }
}

/// Reads one block starting at the BEGIN line already consumed from `lines`.
fn read_block<'a>(begin: &str, lines: &mut impl Iterator<Item = &'a str>) -> Result<String> {
    let mut base64_data = String::new();
    for line in lines {
        let line = line.trim();
        if let Some((Boundary::End, end)) = boundary(line) {
            if end != begin {
                return Err(Error::LabelMismatch {
                    begin: begin.to_string(),
                    end: end.to_string(),
                });
            }
            if base64_data.is_empty() {
                return Err(Error::MissingData);
            }
            return Ok(base64_data);
        }
        if line.is_empty() {
            continue;
        }
        if !is_base64_line(line) {
            return Err(Error::InvalidBase64Line(line.to_string()));
        }
        base64_data.push_str(line);
    }
    Err(Error::MissingPostEncapsulationBoundary)
}

impl FromStr for Pem {
    type Err = Error;

    /// Parses the first certificate block; explanatory text before it is skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.lines();
        while let Some(line) = lines.next() {
            if let Some((Boundary::Begin, raw_label)) = boundary(line.trim()) {
                let label = Label::from_str(raw_label)?;
                let base64_data = read_block(raw_label, &mut lines)?;
                return Ok(Pem { label, base64_data });
            }
        }
        Err(Error::MissingPreEncapsulationBoundary)
    }
}

/// Parses every certificate block in `s`, skipping blocks with other labels
/// (private keys in a combined bundle, for instance).
pub fn parse_many(s: &str) -> Result<Vec<Pem>> {
    let mut pems = Vec::new();
    let mut lines = s.lines();
    while let Some(line) = lines.next() {
        let Some((Boundary::Begin, raw_label)) = boundary(line.trim()) else {
            continue;
        };
        let base64_data = read_block(raw_label, &mut lines)?;
        if let Ok(label) = Label::from_str(raw_label) {
            pems.push(Pem { label, base64_data });
        }
    }

    if pems.is_empty() {
        return Err(Error::MissingPreEncapsulationBoundary);
    }
    Ok(pems)
}
