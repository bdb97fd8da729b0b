use std::collections::BTreeSet;
use std::fmt;

use asn1::{BitString, Element};
use certlens::decoder::{DecodableFrom, Decoder};
use certlens::encoder::{EncodableTo, Encoder};
use serde::{Serialize, Serializer};

use super::error::{Error, Kind};

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- recent editions of X.509 have
                                 -- renamed this bit to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8) }
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyUsageFlag {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CRLSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsageFlag {
    /// In bit order.
    pub const ALL: [KeyUsageFlag; 9] = [
        KeyUsageFlag::DigitalSignature,
        KeyUsageFlag::NonRepudiation,
        KeyUsageFlag::KeyEncipherment,
        KeyUsageFlag::DataEncipherment,
        KeyUsageFlag::KeyAgreement,
        KeyUsageFlag::KeyCertSign,
        KeyUsageFlag::CRLSign,
        KeyUsageFlag::EncipherOnly,
        KeyUsageFlag::DecipherOnly,
    ];

    /// Bit number, counted from the most significant bit of the first byte.
    pub fn bit(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyUsageFlag::DigitalSignature => "digitalSignature",
            KeyUsageFlag::NonRepudiation => "nonRepudiation",
            KeyUsageFlag::KeyEncipherment => "keyEncipherment",
            KeyUsageFlag::DataEncipherment => "dataEncipherment",
            KeyUsageFlag::KeyAgreement => "keyAgreement",
            KeyUsageFlag::KeyCertSign => "keyCertSign",
            KeyUsageFlag::CRLSign => "cRLSign",
            KeyUsageFlag::EncipherOnly => "encipherOnly",
            KeyUsageFlag::DecipherOnly => "decipherOnly",
        }
    }
}

impl fmt::Display for KeyUsageFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for KeyUsageFlag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// The set of asserted key usage bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyUsage {
    flags: BTreeSet<KeyUsageFlag>,
}

impl KeyUsage {
    pub fn new(flags: impl IntoIterator<Item = KeyUsageFlag>) -> Self {
        KeyUsage {
            flags: flags.into_iter().collect(),
        }
    }

    pub fn flags(&self) -> &BTreeSet<KeyUsageFlag> {
        &self.flags
    }

    pub fn contains(&self, flag: KeyUsageFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn names(&self) -> BTreeSet<&'static str> {
        self.flags.iter().map(KeyUsageFlag::name).collect()
    }
}

impl DecodableFrom<Element> for KeyUsage {}

impl Decoder<Element, KeyUsage> for Element {
    type Error = Error;

    /// Reads the bits from the content bytes. A bit beyond the last byte is
    /// clear, so decipherOnly needs a second byte.
    fn decode(&self) -> Result<KeyUsage, Self::Error> {
        let Element::BitString(bits) = self else {
            return Err(Error::ExpectedBitString(Kind::KeyUsage));
        };
        let bytes = bits.as_bytes();
        let is_set = |bit: usize| {
            bytes
                .get(bit / 8)
                .is_some_and(|byte| byte & (0x80 >> (bit % 8)) != 0)
        };
        Ok(KeyUsage {
            flags: KeyUsageFlag::ALL
                .into_iter()
                .filter(|flag| is_set(flag.bit()))
                .collect(),
        })
    }
}

impl EncodableTo<KeyUsage> for Element {}

impl Encoder<KeyUsage, Element> for KeyUsage {
    type Error = Error;

    /// DER form: trailing zero bits are dropped and counted as unused.
    fn encode(&self) -> Result<Element, Self::Error> {
        let Some(last) = self.flags.iter().map(KeyUsageFlag::bit).max() else {
            return Ok(Element::BitString(BitString::new(0, vec![])));
        };
        let len = last / 8 + 1;
        let mut bytes = vec![0u8; len];
        for flag in &self.flags {
            bytes[flag.bit() / 8] |= 0x80 >> (flag.bit() % 8);
        }
        let unused = (7 - last % 8) as u8;
        Ok(Element::BitString(BitString::new(unused, bytes)))
    }
}
