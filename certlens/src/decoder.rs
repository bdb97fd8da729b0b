//! Decoder trait for type-safe conversions.
//!
//! To make a type decodable, mark the destination and implement the
//! conversion on the source:
//!
//! ```no_run
//! use certlens::decoder::{DecodableFrom, Decoder};
//!
//! struct Raw(Vec<u8>);
//! struct Label(String);
//!
//! #[derive(Debug)]
//! struct LabelError;
//!
//! impl DecodableFrom<Raw> for Label {}
//!
//! impl Decoder<Raw, Label> for Raw {
//!     type Error = LabelError;
//!
//!     fn decode(&self) -> Result<Label, Self::Error> {
//!         String::from_utf8(self.0.clone())
//!             .map(Label)
//!             .map_err(|_| LabelError)
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into a `D`.
///
/// `D` must opt in through [`DecodableFrom<T>`], which keeps the set of
/// valid conversions closed and visible at each type definition.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
pub trait DecodableFrom<T> {}
