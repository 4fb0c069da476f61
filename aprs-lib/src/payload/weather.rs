use std::fmt::{Display, Write};

use once_cell::sync::Lazy;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([csgtrpPhb])(-?\d+)").expect("regex to compile"));

/// Positionless weather report, `_` followed by an optional timestamp and
/// letter-prefixed fields.
///
/// Fields missing from the report are `None`. A parsed report displays exactly as
/// received, including fields it does not decode.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weather {
    /// Leading timestamp digits, verbatim
    pub timestamp: Option<String>,
    /// Degrees, `c`
    pub wind_direction: Option<i32>,
    /// Sustained one-minute wind speed in mph, `s`
    pub wind_speed: Option<i32>,
    /// Peak wind speed in the last 5 minutes in mph, `g`
    pub wind_gust: Option<i32>,
    /// Degrees Fahrenheit, `t`
    pub temperature: Option<i32>,
    /// Hundredths of an inch, `r`
    pub rainfall_last_hour: Option<f64>,
    /// Hundredths of an inch, `p`
    pub rainfall_last_24h: Option<f64>,
    /// Hundredths of an inch, `P`
    pub rainfall_since_midnight: Option<f64>,
    /// Percent, `h`
    pub humidity: Option<i32>,
    /// Tenths of hPa, `b`
    pub pressure: Option<f64>,
    /// Body as received
    #[cfg_attr(feature = "serde", serde(skip))]
    wire: Option<String>,
}

impl Weather {
    /// Parse the report body following the `_` type indicator.
    ///
    /// Fields may appear in any order. The first occurrence of each field is used
    /// and only temperature may be negative.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let split = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        let (timestamp, fields) = body.split_at(split);

        let mut wx = Weather {
            timestamp: (!timestamp.is_empty()).then(|| timestamp.to_string()),
            wire: Some(body.to_string()),
            ..Default::default()
        };

        for cap in FIELD.captures_iter(fields) {
            let value = &cap[2];
            if value.starts_with('-') && &cap[1] != "t" {
                continue;
            }
            let int = || value.parse::<i32>().ok();
            let float = || value.parse::<f64>().ok();
            match &cap[1] {
                "c" => wx.wind_direction = wx.wind_direction.or_else(int),
                "s" => wx.wind_speed = wx.wind_speed.or_else(int),
                "g" => wx.wind_gust = wx.wind_gust.or_else(int),
                "t" => wx.temperature = wx.temperature.or_else(int),
                "r" => wx.rainfall_last_hour = wx.rainfall_last_hour.or_else(float),
                "p" => wx.rainfall_last_24h = wx.rainfall_last_24h.or_else(float),
                "P" => wx.rainfall_since_midnight = wx.rainfall_since_midnight.or_else(float),
                "h" => wx.humidity = wx.humidity.or_else(int),
                "b" => wx.pressure = wx.pressure.or_else(float),
                _ => {}
            }
        }

        wx
    }
}

/// Body as received, or for a report built by hand the standard field order and
/// widths.
impl Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref wire) = self.wire {
            return f.write_str(wire);
        }
        let mut s = String::new();
        if let Some(ref ts) = self.timestamp {
            s.push_str(ts);
        }
        let ints = [
            ('c', self.wind_direction),
            ('s', self.wind_speed),
            ('g', self.wind_gust),
            ('t', self.temperature),
        ];
        for (marker, value) in ints {
            if let Some(v) = value {
                write!(s, "{marker}{v:03}")?;
            }
        }
        let rain = [
            ('r', self.rainfall_last_hour),
            ('p', self.rainfall_last_24h),
            ('P', self.rainfall_since_midnight),
        ];
        for (marker, value) in rain {
            if let Some(v) = value {
                write!(s, "{marker}{v:03.0}")?;
            }
        }
        if let Some(v) = self.humidity {
            write!(s, "h{v:02}")?;
        }
        if let Some(v) = self.pressure {
            write!(s, "b{v:05.0}")?;
        }
        f.write_str(&s)
    }
}
