//! # x509
//!
//! Field extraction for X.509 certificates (RFC 5280).
//!
//! [`X509Certificate`] owns a decoded certificate tree and turns it into
//! values an application can use directly: issuer and subject as
//! attribute-name maps, the validity window as epoch seconds, public key
//! material, and the keyUsage, subjectAltName and basicConstraints
//! extensions. It does not verify signatures or chains.
//!
//! ```no_run
//! use x509::X509Certificate;
//!
//! let pem = std::fs::read_to_string("cert.pem").unwrap();
//! let cert = X509Certificate::from_pem(&pem).unwrap();
//! for ext in cert.extensions().unwrap() {
//!     println!("{} critical={}", ext.name(), ext.critical());
//! }
//! ```

pub mod certificate;
pub mod directory_string;
pub mod error;
pub mod extensions;
pub mod format;
pub mod name;
pub mod oid;
pub mod public_key;
pub mod tree;

pub use certificate::X509Certificate;
pub use directory_string::{DirectoryStringValue, StringEncoding};
pub use error::{DecodeError, Error, Result};
pub use extensions::{ExtensionRecord, ExtensionValue, KeyUsageFlag};
pub use format::Format;
pub use name::NameMap;
pub use oid::NameStyle;
pub use public_key::PublicKeyInfo;
