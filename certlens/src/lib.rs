//! # certlens
//!
//! Conversion traits shared by every layer of the certlens workspace.
//!
//! A certificate travels through a chain of representations, and every hop
//! is a `Decoder` implementation on the source type:
//!
//! ```text
//! PEM text → Vec<u8> → Der → ASN1Object → CertificateTree
//! ```
//!
//! The reverse hops (`Element → Tlv → Der → Vec<u8>`) are `Encoder`
//! implementations. They are used to re-emit fragments of a certificate as
//! DER, for example the opaque value of an `otherName`.
//!
//! The marker traits `DecodableFrom` and `EncodableTo` pin each destination
//! type to the sources it accepts, so a conversion that makes no sense is a
//! compile error instead of a runtime one.
//!
//! ```ignore
//! use certlens::decoder::Decoder;
//! use asn1::ASN1Object;
//! use der::Der;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode()?;
//! let asn1: ASN1Object = der.decode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
