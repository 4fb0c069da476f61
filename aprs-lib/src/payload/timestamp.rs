use std::fmt::Display;

use chrono::{NaiveTime, Timelike};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report timestamp following a position type indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Timestamp {
    /// `HHMMSSz`
    Utc(NaiveTime),
    /// `HHMMSS/`
    Local(NaiveTime),
    /// `MMDDHHMM\`, 8 digits where the clock forms take 6
    MonthDayHourMinute {
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
    },
}

fn digits(s: &str) -> Option<Vec<u8>> {
    s.bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

fn pair(d: &[u8]) -> u8 {
    d[0] * 10 + d[1]
}

impl Timestamp {
    /// Parse a timestamp from the start of `s`, returning it along with the rest of
    /// `s`, or `None` if `s` does not start with a valid timestamp.
    #[must_use]
    pub fn parse_prefix(s: &str) -> Option<(Self, &str)> {
        if let (Some(field), Some(mode)) = (s.get(..6), s.get(6..7)) {
            if mode == "z" || mode == "/" {
                let d = digits(field)?;
                let time = NaiveTime::from_hms_opt(
                    pair(&d[0..2]).into(),
                    pair(&d[2..4]).into(),
                    pair(&d[4..6]).into(),
                )?;
                let ts = if mode == "z" {
                    Timestamp::Utc(time)
                } else {
                    Timestamp::Local(time)
                };
                return Some((ts, &s[7..]));
            }
        }

        let (field, mode) = (s.get(..8)?, s.get(8..9)?);
        if mode != "\\" {
            return None;
        }
        let d = digits(field)?;
        let (month, day, hour, minute) = (
            pair(&d[0..2]),
            pair(&d[2..4]),
            pair(&d[4..6]),
            pair(&d[6..8]),
        );
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 {
            return None;
        }
        Some((
            Timestamp::MonthDayHourMinute {
                month,
                day,
                hour,
                minute,
            },
            &s[9..],
        ))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Utc(t) => write!(f, "{:02}{:02}{:02}z", t.hour(), t.minute(), t.second()),
            Timestamp::Local(t) => {
                write!(f, "{:02}{:02}{:02}/", t.hour(), t.minute(), t.second())
            }
            Timestamp::MonthDayHourMinute {
                month,
                day,
                hour,
                minute,
            } => write!(f, "{month:02}{day:02}{hour:02}{minute:02}\\"),
        }
    }
}
