//! Attribute value strings and the RFC 3280 comparison folding for
//! PrintableString.

use std::borrow::Cow;
use std::fmt;

use asn1::Element;
use serde::{Serialize, Serializer};

/*
RFC 5280 Section 4.1.2.4
DirectoryString ::= CHOICE {
    teletexString       TeletexString (SIZE (1..MAX)),
    printableString     PrintableString (SIZE (1..MAX)),
    universalString     UniversalString (SIZE (1..MAX)),
    utf8String          UTF8String (SIZE (1..MAX)),
    bmpString           BMPString (SIZE (1..MAX))
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryString {
    PrintableString(Vec<u8>),
    Utf8String(Vec<u8>),
    TeletexString(Vec<u8>),
    UniversalString(Vec<u8>),
    BmpString(Vec<u8>),
}

/// An attribute value as found in a name: one of the DirectoryString
/// alternatives, an IA5String (emailAddress, domainComponent), or anything
/// else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedString {
    Directory(DirectoryString),
    Ia5(Vec<u8>),
    Other,
}

impl From<&Element> for TaggedString {
    fn from(element: &Element) -> Self {
        match element {
            Element::PrintableString(s) => {
                TaggedString::Directory(DirectoryString::PrintableString(s.clone()))
            }
            Element::UTF8String(s) => TaggedString::Directory(DirectoryString::Utf8String(s.clone())),
            Element::TeletexString(s) => {
                TaggedString::Directory(DirectoryString::TeletexString(s.clone()))
            }
            Element::UniversalString(s) => {
                TaggedString::Directory(DirectoryString::UniversalString(s.clone()))
            }
            Element::BMPString(s) => TaggedString::Directory(DirectoryString::BmpString(s.clone())),
            Element::IA5String(s) => TaggedString::Ia5(s.clone()),
            _ => TaggedString::Other,
        }
    }
}

impl TaggedString {
    pub fn encoding(&self) -> StringEncoding {
        match self {
            TaggedString::Directory(DirectoryString::PrintableString(_)) => StringEncoding::Ascii,
            TaggedString::Directory(DirectoryString::Utf8String(_)) => StringEncoding::Utf8,
            TaggedString::Directory(DirectoryString::TeletexString(_)) => {
                StringEncoding::X500Teletex
            }
            TaggedString::Directory(DirectoryString::UniversalString(_)) => {
                StringEncoding::X500Universal
            }
            TaggedString::Directory(DirectoryString::BmpString(_)) => StringEncoding::X500Bmp,
            TaggedString::Ia5(_) => StringEncoding::Ia5,
            TaggedString::Other => StringEncoding::X500Unknown,
        }
    }
}

/// The encoding a value was carried in. Values in different encodings compare
/// differently (RFC 3280 Section 4.1.2.4), so it travels with the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    Ascii,
    Utf8,
    X500Teletex,
    X500Universal,
    X500Bmp,
    X500Unknown,
    Ia5,
}

impl StringEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringEncoding::Ascii => "ascii",
            StringEncoding::Utf8 => "utf8",
            StringEncoding::X500Teletex => "x500-teletex",
            StringEncoding::X500Universal => "x500-universal",
            StringEncoding::X500Bmp => "x500-bmp",
            StringEncoding::X500Unknown => "x500-unknown",
            StringEncoding::Ia5 => "ia5",
        }
    }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for StringEncoding {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One attribute value and the encoding it was carried in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStringValue {
    #[serde(rename = "value", serialize_with = "serialize_lossy")]
    text: Vec<u8>,
    encoding: StringEncoding,
}

fn serialize_lossy<S>(text: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(text))
}

impl DirectoryStringValue {
    pub fn new(text: impl Into<Vec<u8>>, encoding: StringEncoding) -> Self {
        DirectoryStringValue {
            text: text.into(),
            encoding,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// The text, when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.text).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    pub fn encoding(&self) -> StringEncoding {
        self.encoding
    }
}

impl fmt::Display for DirectoryStringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_string_lossy(), self.encoding)
    }
}

/// Converts a tagged value into its text and encoding.
///
/// PrintableString is folded with [`normalize_printable`]; every other
/// string type passes through byte for byte. Returns `None` when the value
/// is not a string type at all.
pub fn normalize(value: &TaggedString) -> Option<DirectoryStringValue> {
    let encoding = value.encoding();
    let text = match value {
        TaggedString::Directory(DirectoryString::PrintableString(s)) => normalize_printable(s),
        TaggedString::Directory(
            DirectoryString::Utf8String(s)
            | DirectoryString::TeletexString(s)
            | DirectoryString::UniversalString(s)
            | DirectoryString::BmpString(s),
        )
        | TaggedString::Ia5(s) => s.clone(),
        TaggedString::Other => return None,
    };
    Some(DirectoryStringValue { text, encoding })
}

// what C isspace() accepts
fn is_leading_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn is_inner_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b',' | b'.' | b'=' | b'/' | b':' | b'?' | b'-' | b'@'
        )
}

/// Folds a PrintableString for comparison (RFC 3280 Section 4.1.2.4 (d)).
///
/// Leading whitespace is dropped, each run of space/tab/CR/LF becomes one
/// space, and a trailing space is removed. The PrintableString repertoire
/// (RFC 4517) and `@` pass through unchanged; any other byte becomes `*`.
/// Case is kept.
pub fn normalize_printable(input: &[u8]) -> Vec<u8> {
    let start = input
        .iter()
        .position(|&b| !is_leading_space(b))
        .unwrap_or(input.len());

    let mut out = Vec::with_capacity(input.len() - start);
    let mut in_space = false;
    for &b in &input[start..] {
        if is_inner_space(b) {
            if !in_space {
                out.push(b' ');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        out.push(if is_printable(b) { b } else { b'*' });
    }
    if out.last() == Some(&b' ') {
        out.pop();
    }
    out
}
