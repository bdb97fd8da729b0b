use std::fmt;
use std::str::FromStr;

use certlens::decoder::Decoder;
use num_bigint::BigInt;
use pem::Pem;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extensions::{ExtensionRecord, decode_extensions};
use crate::format::Format;
use crate::name::{NameMap, extract_name};
use crate::oid::{self, NameStyle};
use crate::public_key::{PublicKeyInfo, extract_public_key};
use crate::tree::{self, CertificateTree, Time};

/// A certificate and the fields extracted from it.
///
/// The value owns at most one decoded tree. Parsing again replaces it, and a
/// failed parse leaves the value empty, so no field from an earlier
/// certificate is ever reported.
///
/// # Example
/// ```no_run
/// use x509::X509Certificate;
///
/// let der = std::fs::read("cert.der").unwrap();
/// let cert = X509Certificate::new(&der, Some("der")).unwrap();
/// let subject = cert.subject().unwrap();
/// if let Some(cn) = subject.get("commonName") {
///     println!("CN={}", cn.to_string_lossy());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct X509Certificate {
    tree: Option<CertificateTree>,
}

impl X509Certificate {
    /// Decodes `data`. `format` is one of `ber`, `cer`, `der` or `xer`
    /// (any case); `None` selects BER.
    pub fn new(data: &[u8], format: Option<&str>) -> Result<Self> {
        let mut cert = Self::default();
        cert.parse(data, format)?;
        Ok(cert)
    }

    /// Decodes the first CERTIFICATE block of a PEM document.
    pub fn from_pem(text: &str) -> Result<Self> {
        let pem = Pem::from_str(text)?;
        let der = Decoder::<Pem, Vec<u8>>::decode(&pem)?;
        let mut cert = Self::default();
        cert.parse_with(&der, Format::Der)?;
        Ok(cert)
    }

    /// Replaces the held tree with one decoded from `data`.
    pub fn parse(&mut self, data: &[u8], format: Option<&str>) -> Result<()> {
        self.clear();
        let format = format
            .map(Format::from_str)
            .transpose()?
            .unwrap_or_default();
        self.parse_with(data, format)
    }

    pub fn parse_with(&mut self, data: &[u8], format: Format) -> Result<()> {
        self.clear();
        let tree = tree::decode(data, format)?;
        debug!(%format, bytes = data.len(), "installed certificate tree");
        self.tree = Some(tree);
        Ok(())
    }

    /// Drops the held tree, if any.
    pub fn clear(&mut self) {
        if self.tree.take().is_some() {
            debug!("dropped certificate tree");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    pub fn tree(&self) -> Result<&CertificateTree> {
        self.tree.as_ref().ok_or(Error::EmptyCertificate)
    }

    /// The encoded version number: 0 for v1 (also when absent), 2 for v3.
    pub fn version(&self) -> Result<i64> {
        match &self.tree()?.tbs_certificate.version {
            Some(version) => i64::try_from(version.as_bigint()).map_err(|source| {
                Error::NumericConversionFailure {
                    field: "version",
                    source,
                }
            }),
            None => Ok(0),
        }
    }

    pub fn serial_number(&self) -> Result<BigInt> {
        Ok(self
            .tree()?
            .tbs_certificate
            .serial_number
            .as_bigint()
            .clone())
    }

    /// `(notBefore, notAfter)` in seconds since the Unix epoch.
    pub fn validity(&self) -> Result<(Option<i64>, Option<i64>)> {
        let validity = &self.tree()?.tbs_certificate.validity;
        Ok((
            validity.not_before().and_then(Time::to_epoch),
            validity.not_after().and_then(Time::to_epoch),
        ))
    }

    pub fn issuer(&self) -> Result<NameMap> {
        Ok(extract_name(&self.tree()?.tbs_certificate.issuer))
    }

    pub fn subject(&self) -> Result<NameMap> {
        Ok(extract_name(&self.tree()?.tbs_certificate.subject))
    }

    pub fn public_key(&self) -> Result<PublicKeyInfo> {
        Ok(extract_public_key(
            &self.tree()?.tbs_certificate.subject_public_key_info,
        ))
    }

    /// Braced OID of the outer `signatureAlgorithm`.
    pub fn signature_algorithm_oid(&self) -> Result<String> {
        Ok(self.tree()?.signature_algorithm.algorithm().braced())
    }

    pub fn signature_algorithm_name(&self) -> Result<Option<&'static str>> {
        let oid = self.tree()?.signature_algorithm.algorithm();
        Ok(oid::name_of(oid, NameStyle::Full))
    }

    pub fn extensions(&self) -> Result<Vec<ExtensionRecord>> {
        Ok(decode_extensions(&self.tree()?.tbs_certificate.extensions))
    }

    /// Not provided by this layer.
    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        self.tree()?;
        Err(Error::Unimplemented("signatureBytes"))
    }

    /// Not provided by this layer.
    pub fn digest_info(&self) -> Result<Vec<u8>> {
        self.tree()?;
        Err(Error::Unimplemented("digestInfo"))
    }
}

/// The structure tree of the whole certificate, with OIDs annotated by name.
impl fmt::Display for X509Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(
                f,
                "{}",
                asn1::format::format_asn1(tree.raw(), |oid| oid::name_of(oid, NameStyle::Full))
            ),
            None => write!(f, "<absent>"),
        }
    }
}
