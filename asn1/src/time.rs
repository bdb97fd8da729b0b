//! UTCTime and GeneralizedTime values.
//!
//! Both keep the text exactly as encoded. Conversion to an instant happens on
//! demand, so a malformed time never prevents the surrounding structure from
//! decoding.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/*
X.680 §47 UTCTime:        YYMMDDhhmm[ss](Z|+hhmm|-hhmm)
X.680 §46 GeneralizedTime: YYYYMMDDhh[mm[ss[.fff]]][Z|+hh[mm]|-hh[mm]]
RFC 5280 §4.1.2.5.1: UTCTime years 50-99 are 19xx, 00-49 are 20xx.
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcTime {
    text: String,
}

impl UtcTime {
    pub fn new(text: impl Into<String>) -> Self {
        UtcTime { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.parse()
            .ok_or_else(|| Error::UtcTimeInvalidFormat(self.text.clone()))
    }

    fn parse(&self) -> Option<DateTime<Utc>> {
        let b = self.text.as_bytes();
        let yy = digits(b, 0, 2)?;
        let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
        let (second, zone) = match digits(b, 10, 2) {
            Some(second) => (second, b.get(12..)?),
            None => (0, b.get(10..)?),
        };
        to_utc(
            year,
            digits(b, 2, 2)?,
            digits(b, 4, 2)?,
            digits(b, 6, 2)?,
            digits(b, 8, 2)?,
            second,
            0,
            parse_zone(zone)?,
        )
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralizedTime {
    text: String,
}

impl GeneralizedTime {
    pub fn new(text: impl Into<String>) -> Self {
        GeneralizedTime { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// A value without a zone designator is read as UTC.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.parse()
            .ok_or_else(|| Error::GeneralizedTimeInvalidFormat(self.text.clone()))
    }

    fn parse(&self) -> Option<DateTime<Utc>> {
        let b = self.text.as_bytes();
        let year = digits(b, 0, 4)?;
        let month = digits(b, 4, 2)?;
        let day = digits(b, 6, 2)?;
        let hour = digits(b, 8, 2)?;

        let mut pos = 10;
        let mut minute = 0;
        let mut second = 0;
        let mut nanos = 0;
        if let Some(m) = digits(b, pos, 2) {
            minute = m;
            pos += 2;
            if let Some(s) = digits(b, pos, 2) {
                second = s;
                pos += 2;
            }
        }
        if matches!(b.get(pos), Some(b'.' | b',')) {
            let fraction: Vec<u8> = b[pos + 1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .copied()
                .collect();
            if fraction.is_empty() {
                return None;
            }
            pos += 1 + fraction.len();
            nanos = fraction
                .iter()
                .chain(std::iter::repeat(&b'0'))
                .take(9)
                .fold(0u32, |n, c| n * 10 + u32::from(c - b'0'));
        }

        let zone = b.get(pos..)?;
        let offset = if zone.is_empty() {
            0
        } else {
            parse_zone(zone)?
        };
        to_utc(year, month, day, hour, minute, second, nanos, offset)
    }
}

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn digits(b: &[u8], start: usize, len: usize) -> Option<u32> {
    b.get(start..start + len)?.iter().try_fold(0u32, |n, c| {
        c.is_ascii_digit().then(|| n * 10 + u32::from(c - b'0'))
    })
}

/// `Z`, `±hh` or `±hhmm`, as seconds east of UTC.
fn parse_zone(b: &[u8]) -> Option<i32> {
    let (sign, rest) = match b {
        [b'Z'] => return Some(0),
        [b'+', rest @ ..] => (1, rest),
        [b'-', rest @ ..] => (-1, rest),
        _ => return None,
    };
    let (hours, minutes) = match rest.len() {
        2 => (digits(rest, 0, 2)?, 0),
        4 => (digits(rest, 0, 2)?, digits(rest, 2, 2)?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    i32::try_from(hours * 3600 + minutes * 60)
        .ok()
        .map(|secs| sign * secs)
}

#[allow(clippy::too_many_arguments)]
fn to_utc(
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    offset: i32,
) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?
        .and_hms_nano_opt(hour, minute, second, nanos)?;
    FixedOffset::east_opt(offset)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case("261016084023Z", 1792140023),
        case("5001010000Z", -631152000),
        case("491231235959Z", 2524607999),
        case("261016084023+0900", 1792107623),
        case("261016084023-0030", 1792141823),
    )]
    fn test_utc_time_to_epoch(input: &str, expected: i64) {
        let actual = UtcTime::new(input).to_datetime().unwrap();
        assert_eq!(expected, actual.timestamp());
    }

    #[rstest(input,
        case(""),
        case("2610160840"),
        case("261316084023Z"),
        case("261016084023"),
        case("261016084023Z1"),
        case("26101608402aZ"),
        case("261016084023+2400"),
    )]
    fn test_utc_time_rejects(input: &str) {
        assert!(UtcTime::new(input).to_datetime().is_err());
    }

    #[rstest(input, expected,
        case("20810719084027Z", 3520140027),
        case("20810719084027.5Z", 3520140027),
        case("20810719084027,125Z", 3520140027),
        case("2081071908Z", 3520137600),
        case("20810719084027", 3520140027),
        case("20810719084027-0130", 3520145427),
        case("20810719084027+01", 3520136427),
        case("19500101000000Z", -631152000),
    )]
    fn test_generalized_time_to_epoch(input: &str, expected: i64) {
        let actual = GeneralizedTime::new(input).to_datetime().unwrap();
        assert_eq!(expected, actual.timestamp());
    }

    #[test]
    fn test_generalized_time_keeps_fraction() {
        let actual = GeneralizedTime::new("20810719084027.125Z")
            .to_datetime()
            .unwrap();
        assert_eq!(125_000_000, actual.timestamp_subsec_nanos());
    }

    #[rstest(input,
        case("2081"),
        case("20810719084027."),
        case("20810231000000Z"),
        case("20810719084027Q"),
    )]
    fn test_generalized_time_rejects(input: &str) {
        assert!(GeneralizedTime::new(input).to_datetime().is_err());
    }
}
