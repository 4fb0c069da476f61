use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Telemetry report, `T#seq,a1,a2,a3,a4,a5,dddddddd`.
///
/// A parsed report displays exactly as received. Reports built by hand display as
/// `#seq,a1,...,bits` with the sequence zero padded to 3 digits.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// Sequence number, 0 if the field is not numeric
    pub sequence: u32,
    /// Analog channel values that parsed as numbers
    pub analog: Vec<f64>,
    /// Digital channel bits, most significant first
    pub digital: Vec<bool>,
    /// Body as received
    #[cfg_attr(feature = "serde", serde(skip))]
    wire: Option<String>,
}

impl Telemetry {
    /// Parse the telemetry body following the `T` type indicator.
    ///
    /// Fields follow the last `#`, or start the body if there is none. A report
    /// with a single field carries only the sequence number.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let fields: Vec<&str> = body.rsplit('#').next()?.split(',').collect();
        let (first, rest) = fields.split_first()?;

        let mut zult = Telemetry {
            sequence: first.trim().parse().unwrap_or(0),
            wire: Some(body.to_string()),
            ..Default::default()
        };
        if let Some((bits, analog)) = rest.split_last() {
            zult.analog = analog
                .iter()
                .filter_map(|v| v.trim().parse::<f64>().ok())
                .collect();
            zult.digital = bits.trim_end().chars().map(|c| c == '1').collect();
        }

        Some(zult)
    }
}

impl Display for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref wire) = self.wire {
            return f.write_str(wire);
        }
        write!(f, "#{:03}", self.sequence)?;
        for v in &self.analog {
            write!(f, ",{v}")?;
        }
        if !self.digital.is_empty() {
            let bits: String = self
                .digital
                .iter()
                .map(|b| if *b { '1' } else { '0' })
                .collect();
            write!(f, ",{bits}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let tlm = Telemetry::parse("#123,456,789,123,456,789,01101001").unwrap();

        assert_eq!(tlm.sequence, 123);
        assert_eq!(tlm.analog, vec![456.0, 789.0, 123.0, 456.0, 789.0]);
        assert_eq!(
            tlm.digital,
            vec![false, true, true, false, true, false, false, true]
        );
        assert_eq!(tlm.to_string(), "#123,456,789,123,456,789,01101001");
    }

    #[test]
    fn non_numeric_analog_values_are_dropped() {
        let tlm = Telemetry::parse("#005,1.5,xx,200,,3,10000000").unwrap();

        assert_eq!(tlm.sequence, 5);
        assert_eq!(tlm.analog, vec![1.5, 200.0, 3.0]);
        assert_eq!(tlm.digital.len(), 8);
        assert!(tlm.digital[0]);
    }

    #[test]
    fn non_numeric_sequence_is_zero() {
        let tlm = Telemetry::parse("#MIC,1,2,3,4,5,00000000").unwrap();
        assert_eq!(tlm.sequence, 0);
        assert_eq!(tlm.analog.len(), 5);
    }

    #[test]
    fn parse_without_marker() {
        let tlm = Telemetry::parse("123,456,789,123,456,789,01101001").unwrap();

        assert_eq!(tlm.sequence, 123);
        assert_eq!(tlm.analog, vec![456.0, 789.0, 123.0, 456.0, 789.0]);
        assert_eq!(tlm.digital.len(), 8);
        assert_eq!(tlm.to_string(), "123,456,789,123,456,789,01101001");

        let tlm = Telemetry::parse("").unwrap();
        assert_eq!(tlm.sequence, 0);
        assert!(tlm.analog.is_empty());
    }

    #[test]
    fn display_keeps_field_text() {
        let body = "#005,045,000,255,012,100,00000000";
        let tlm = Telemetry::parse(body).unwrap();
        assert_eq!(tlm.analog, vec![45.0, 0.0, 255.0, 12.0, 100.0]);
        assert_eq!(tlm.to_string(), body);

        let body = "#123,1.50,2.25,3,4,5,01101001";
        let tlm = Telemetry::parse(body).unwrap();
        assert_eq!(tlm.analog[0], 1.5);
        assert_eq!(tlm.to_string(), body);
    }

    #[test]
    fn display_built_report() {
        let tlm = Telemetry {
            sequence: 7,
            analog: vec![1.5, 200.0],
            digital: vec![true, false],
            ..Default::default()
        };
        assert_eq!(tlm.to_string(), "#007,1.5,200,10");
    }

    #[test]
    fn sequence_only() {
        let tlm = Telemetry::parse("#042").unwrap();

        assert_eq!(tlm.sequence, 42);
        assert!(tlm.analog.is_empty());
        assert!(tlm.digital.is_empty());
        assert_eq!(tlm.to_string(), "#042");
    }
}
