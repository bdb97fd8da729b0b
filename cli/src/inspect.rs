use std::fmt::Write;

use chrono::{DateTime, SecondsFormat};
use clap::Args;
use serde::Serialize;
use x509::{ExtensionRecord, ExtensionValue, NameMap, PublicKeyInfo, X509Certificate};

use crate::error::Result;
use crate::input::load_certificate;
use crate::output::{InputFormat, OutputFormat};
use crate::utils::{format_hex_colon, read_input};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file. If not specified, reads from stdin
    file: Option<String>,

    /// Input encoding. Detected as PEM or DER when omitted
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show only subject
    #[arg(long)]
    show_subject: bool,

    /// Show only issuer
    #[arg(long)]
    show_issuer: bool,

    /// Show only validity dates
    #[arg(long)]
    show_dates: bool,

    /// Show only extensions
    #[arg(long)]
    show_extensions: bool,

    /// Show only the subject public key
    #[arg(long)]
    show_public_key: bool,
}

impl Config {
    fn should_show_specific_fields(&self) -> bool {
        self.show_subject
            || self.show_issuer
            || self.show_dates
            || self.show_extensions
            || self.show_public_key
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_algorithm: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer: Option<NameMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validity: Option<Validity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<NameMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key: Option<PublicKeyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<Vec<ExtensionRecord>>,
}

#[derive(Debug, Serialize)]
struct Algorithm {
    oid: String,
    name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Validity {
    not_before: Option<Timestamp>,
    not_after: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
struct Timestamp {
    epoch: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rfc3339: Option<String>,
}

impl Timestamp {
    fn new(epoch: i64) -> Self {
        let rfc3339 =
            DateTime::from_timestamp(epoch, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true));
        Timestamp { epoch, rfc3339 }
    }
}

impl Report {
    fn build(cert: &X509Certificate, config: &Config) -> Result<Self> {
        let all = !config.should_show_specific_fields();
        let mut report = Report::default();

        if all {
            report.version = Some(cert.version()?);
            report.serial_number =
                Some(format_hex_colon(&cert.serial_number()?.to_signed_bytes_be()));
            report.signature_algorithm = Some(Algorithm {
                oid: cert.signature_algorithm_oid()?,
                name: cert.signature_algorithm_name()?,
            });
        }
        if all || config.show_issuer {
            report.issuer = Some(cert.issuer()?);
        }
        if all || config.show_dates {
            let (not_before, not_after) = cert.validity()?;
            report.validity = Some(Validity {
                not_before: not_before.map(Timestamp::new),
                not_after: not_after.map(Timestamp::new),
            });
        }
        if all || config.show_subject {
            report.subject = Some(cert.subject()?);
        }
        if all || config.show_public_key {
            report.public_key = Some(cert.public_key()?);
        }
        if all || config.show_extensions {
            report.extensions = Some(cert.extensions()?);
        }
        Ok(report)
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input_bytes = read_input(config.file.as_deref())?;
    let cert = load_certificate(&input_bytes, config.format)?;
    let report = Report::build(&cert, &config)?;

    match config.output {
        OutputFormat::Text => {
            print!("{}", render_text(&report)?);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn render_text(report: &Report) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Certificate:")?;

    if let Some(version) = report.version {
        writeln!(out, "    Version: {} ({:#x})", version + 1, version)?;
    }
    if let Some(serial) = &report.serial_number {
        writeln!(out, "    Serial Number: {serial}")?;
    }
    if let Some(alg) = &report.signature_algorithm {
        writeln!(out, "    Signature Algorithm: {}", algorithm_label(alg.name, &alg.oid))?;
    }
    if let Some(issuer) = &report.issuer {
        writeln!(out, "    Issuer:")?;
        write_name(&mut out, issuer)?;
    }
    if let Some(validity) = &report.validity {
        writeln!(out, "    Validity:")?;
        write_time(&mut out, "Not Before", validity.not_before.as_ref())?;
        write_time(&mut out, "Not After ", validity.not_after.as_ref())?;
    }
    if let Some(subject) = &report.subject {
        writeln!(out, "    Subject:")?;
        write_name(&mut out, subject)?;
    }
    if let Some(key) = &report.public_key {
        write_public_key(&mut out, key)?;
    }
    if let Some(extensions) = &report.extensions {
        write_extensions(&mut out, extensions)?;
    }
    Ok(out)
}

fn algorithm_label(name: Option<&str>, oid: &str) -> String {
    match name {
        Some(name) => format!("{name} {oid}"),
        None => oid.to_string(),
    }
}

fn write_name(out: &mut String, name: &NameMap) -> Result<()> {
    if name.is_empty() {
        writeln!(out, "        <empty>")?;
    }
    for (key, value) in name.iter() {
        writeln!(out, "        {key}={value}")?;
    }
    Ok(())
}

fn write_time(out: &mut String, label: &str, time: Option<&Timestamp>) -> Result<()> {
    match time {
        Some(Timestamp {
            epoch,
            rfc3339: Some(rfc3339),
        }) => writeln!(out, "        {label}: {epoch} ({rfc3339})")?,
        Some(Timestamp { epoch, rfc3339: None }) => writeln!(out, "        {label}: {epoch}")?,
        None => writeln!(out, "        {label}: <unavailable>")?,
    }
    Ok(())
}

fn write_public_key(out: &mut String, key: &PublicKeyInfo) -> Result<()> {
    writeln!(out, "    Subject Public Key Info:")?;
    writeln!(
        out,
        "        Algorithm: {}",
        algorithm_label(key.algorithm_name, &key.algorithm_oid)
    )?;
    writeln!(out, "        Bit Length: {}", key.bit_length)?;
    match (&key.rsa_modulus, &key.rsa_public_exponent) {
        (Some(modulus), Some(exponent)) => {
            if let Some(bits) = key.modulus_bits() {
                writeln!(out, "        Modulus ({bits} bit): {modulus}")?;
            }
            writeln!(out, "        Exponent: {exponent}")?;
        }
        _ => {
            writeln!(out, "        Key:")?;
            for chunk in key.key.chunks(15) {
                writeln!(out, "            {}", format_hex_colon(chunk))?;
            }
        }
    }
    Ok(())
}

fn write_extensions(out: &mut String, extensions: &[ExtensionRecord]) -> Result<()> {
    writeln!(out, "    Extensions:")?;
    if extensions.is_empty() {
        writeln!(out, "        <none>")?;
    }
    for ext in extensions {
        let critical = if ext.critical() { " (critical)" } else { "" };
        writeln!(out, "        {} [{}]{}", ext.name(), ext.oid(), critical)?;
        let detail = match ext.value() {
            ExtensionValue::KeyUsage(Some(key_usage)) => Some(
                key_usage
                    .flags()
                    .iter()
                    .map(|flag| flag.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ExtensionValue::SubjectAltName(Some(names)) => Some(
                names
                    .iter()
                    .map(|name| format!("DNS:{name}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ExtensionValue::BasicConstraints(Some(bc)) => Some(match bc.path_len_constraint {
                Some(path_len) => format!("CA:{}, pathlen:{}", bc.ca, path_len),
                None => format!("CA:{}", bc.ca),
            }),
            ExtensionValue::KeyUsage(None)
            | ExtensionValue::SubjectAltName(None)
            | ExtensionValue::BasicConstraints(None) => Some("<absent>".to_string()),
            ExtensionValue::Unknown => None,
        };
        if let Some(detail) = detail {
            writeln!(out, "            {detail}")?;
        }
    }
    Ok(())
}
