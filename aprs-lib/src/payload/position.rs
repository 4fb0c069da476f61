use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::base91;

static UNCOMPRESSED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(\d{4}\.\d{2})([NS])(.)(\d{5}\.\d{2})([EW])(.)(.*)$")
        .expect("regex to compile")
});

/// Physical encoding of a position report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Encoding {
    /// Coordinates are packed degree-minute values, i.e., `DDMM.mm` and `DDDMM.mm`
    /// read as single decimal numbers, negative for south and west.
    Uncompressed,
    /// Coordinates are base-91 decoded decimal degrees.
    Compressed,
}

/// A position report body.
///
/// The meaning of `latitude` and `longitude` depends on `encoding`; the two
/// representations are not interchangeable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub symbol_table: char,
    pub symbol_code: char,
    pub comment: String,
    pub encoding: Encoding,
}

impl Position {
    /// Minimum compressed body length
    const COMPRESSED_LEN: usize = 11;

    /// Parse the position body that follows the type indicator and any timestamp.
    ///
    /// The uncompressed grammar is tried first, then the compressed layout.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        Self::parse_uncompressed(body).or_else(|| Self::parse_compressed(body))
    }

    fn parse_uncompressed(body: &str) -> Option<Self> {
        let cap = UNCOMPRESSED.captures(body)?;
        let mut latitude: f64 = cap[1].parse().ok()?;
        if &cap[2] == "S" {
            latitude = -latitude;
        }
        let mut longitude: f64 = cap[4].parse().ok()?;
        if &cap[5] == "W" {
            longitude = -longitude;
        }

        Some(Position {
            latitude,
            longitude,
            symbol_table: cap[3].chars().next()?,
            symbol_code: cap[6].chars().next()?,
            comment: cap[7].to_string(),
            encoding: Encoding::Uncompressed,
        })
    }

    // Latitude and longitude occupy two 5 character windows, the first of which
    // starts with the symbol table. The symbol code is the final character.
    fn parse_compressed(body: &str) -> Option<Self> {
        if !body.is_ascii() || body.len() < Self::COMPRESSED_LEN {
            return None;
        }
        let symbol_table = char::from(body.as_bytes()[0]);
        if !matches!(symbol_table, '/' | '\\' | 'A'..='Z' | 'a'..='j') {
            return None;
        }
        let end = body.len() - 1;

        Some(Position {
            latitude: base91::decode(&body[0..5])?,
            longitude: base91::decode(&body[5..10])?,
            symbol_table,
            symbol_code: char::from(body.as_bytes()[end]),
            comment: body[10..end].to_string(),
            encoding: Encoding::Compressed,
        })
    }
}

/// Wire form of the body. Exact for uncompressed positions, best effort for
/// compressed.
impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.encoding {
            Encoding::Uncompressed => write!(
                f,
                "{:07.2}{}{}{:08.2}{}{}{}",
                self.latitude.abs(),
                if self.latitude.is_sign_negative() { 'S' } else { 'N' },
                self.symbol_table,
                self.longitude.abs(),
                if self.longitude.is_sign_negative() { 'W' } else { 'E' },
                self.symbol_code,
                self.comment,
            ),
            Encoding::Compressed => write!(
                f,
                "{}{}{}{}{}",
                self.symbol_table,
                base91::encode(self.latitude).unwrap_or_default(),
                base91::encode(self.longitude).unwrap_or_default(),
                self.comment,
                self.symbol_code,
            ),
        }
    }
}
