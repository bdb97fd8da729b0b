//! Indented tree rendering of decoded ASN.1 values.

use std::fmt::{self, Display};

use crate::{ASN1Object, Element, ObjectIdentifier, OctetString};

/// Octet strings longer than this print their size instead of their bytes.
const MAX_INLINE_OCTETS: usize = 32;

/// Renders `obj` one element per line, two spaces per nesting level.
///
/// `name_of` supplies a human readable name printed after each OBJECT
/// IDENTIFIER. OCTET STRING contents that decode completely as ASN.1 are
/// expanded underneath, which is how extension values become visible.
pub fn format_asn1<F>(obj: &ASN1Object, name_of: F) -> String
where
    F: Fn(&ObjectIdentifier) -> Option<&'static str>,
{
    let mut output = String::new();
    for element in obj.elements() {
        format_element(element, 0, &name_of, &mut output);
    }
    output
}

fn nested(octets: &OctetString) -> Option<ASN1Object> {
    ASN1Object::try_from(octets).ok()
}

fn push_octets(octets: &OctetString, prefix: &str, output: &mut String) {
    let len = octets.as_bytes().len();
    if len > MAX_INLINE_OCTETS {
        output.push_str(&format!("{}OCTET STRING ({} bytes)\n", prefix, len));
    } else {
        output.push_str(&format!("{}OCTET STRING {}\n", prefix, octets));
    }
}

fn format_element<F>(element: &Element, depth: usize, name_of: &F, output: &mut String)
where
    F: Fn(&ObjectIdentifier) -> Option<&'static str>,
{
    let prefix = "  ".repeat(depth);

    match element {
        Element::Boolean(b) => output.push_str(&format!("{}BOOLEAN {}\n", prefix, b)),
        Element::Integer(int) => {
            let text = int.to_string();
            if text.len() > 20 {
                output.push_str(&format!(
                    "{}INTEGER ({} bytes)\n",
                    prefix,
                    int.to_signed_bytes_be().len()
                ));
            } else {
                output.push_str(&format!("{}INTEGER {}\n", prefix, text));
            }
        }
        Element::BitString(bits) => {
            output.push_str(&format!("{}BIT STRING ({} bits)\n", prefix, bits.bit_len()));
        }
        Element::OctetString(octets) => {
            push_octets(octets, &prefix, output);
            if let Some(obj) = nested(octets) {
                for elem in obj.elements() {
                    format_element(elem, depth + 1, name_of, output);
                }
            }
        }
        Element::Null => output.push_str(&format!("{}NULL\n", prefix)),
        Element::ObjectIdentifier(oid) => match name_of(oid) {
            Some(name) => {
                output.push_str(&format!("{}OBJECT IDENTIFIER {} ({})\n", prefix, oid, name))
            }
            None => output.push_str(&format!("{}OBJECT IDENTIFIER {}\n", prefix, oid)),
        },
        Element::UTF8String(s) => output.push_str(&format!(
            "{}UTF8String '{}'\n",
            prefix,
            String::from_utf8_lossy(s)
        )),
        Element::PrintableString(s) => output.push_str(&format!(
            "{}PrintableString '{}'\n",
            prefix,
            String::from_utf8_lossy(s)
        )),
        Element::TeletexString(s) => output.push_str(&format!(
            "{}TeletexString '{}'\n",
            prefix,
            String::from_utf8_lossy(s)
        )),
        Element::IA5String(s) => output.push_str(&format!(
            "{}IA5String '{}'\n",
            prefix,
            String::from_utf8_lossy(s)
        )),
        Element::UniversalString(s) => {
            output.push_str(&format!("{}UniversalString ({} bytes)\n", prefix, s.len()))
        }
        Element::BMPString(s) => {
            output.push_str(&format!("{}BMPString ({} bytes)\n", prefix, s.len()))
        }
        Element::UTCTime(t) => output.push_str(&format!("{}UTCTime {}\n", prefix, t)),
        Element::GeneralizedTime(t) => {
            output.push_str(&format!("{}GeneralizedTime {}\n", prefix, t))
        }
        Element::Sequence(elements) => {
            output.push_str(&format!("{}SEQUENCE ({} elem)\n", prefix, elements.len()));
            for elem in elements {
                format_element(elem, depth + 1, name_of, output);
            }
        }
        Element::Set(elements) => {
            output.push_str(&format!("{}SET ({} elem)\n", prefix, elements.len()));
            for elem in elements {
                format_element(elem, depth + 1, name_of, output);
            }
        }
        Element::ContextSpecific {
            slot,
            constructed: false,
            element,
        } => {
            output.push_str(&format!("{}[{}] (implicit)\n", prefix, slot));
            if let Element::OctetString(octets) = element.as_ref() {
                push_octets(octets, &"  ".repeat(depth + 1), output);
            }
        }
        Element::ContextSpecific {
            slot,
            constructed: true,
            element,
        } => {
            output.push_str(&format!("{}[{}]\n", prefix, slot));
            if let Element::Sequence(elements) = element.as_ref() {
                for elem in elements {
                    format_element(elem, depth + 1, name_of, output);
                }
            }
        }
        Element::Unimplemented(tlv) => {
            output.push_str(&format!("{}(unimplemented {:?})\n", prefix, tlv.tag()))
        }
    }
}

impl Display for ASN1Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_asn1(self, |_| None))
    }
}
