use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::payload::PacketType;
use crate::pipeline::Decoded;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationSummary {
    pub count: usize,
    /// Total information field bytes
    pub bytes: usize,
}

/// Tracks stats on decoded packets.
///
/// # Example
/// ```
/// use aprs::{pipeline::{decode_reader, PipelineOpts}, Summary};
/// let dat: &[u8] = &[0xc0, 0x00, 0xc0];
///
/// let mut summary = Summary::default();
/// for zult in decode_reader(dat, PipelineOpts::new()) {
///     match zult {
///         Ok(decoded) => summary.add(&decoded),
///         Err(_) => summary.add_error(),
///     }
/// }
/// assert_eq!(summary.frames, 0);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    /// Successfully decoded frames
    pub frames: usize,
    /// Frames that failed to decode
    pub errors: usize,
    /// Packet counts by type
    pub packet_types: BTreeMap<PacketType, usize>,
    /// Packet stats by source station, e.g., `N0CALL-9`
    pub stations: BTreeMap<String, StationSummary>,
}

impl Summary {
    pub fn add(&mut self, decoded: &Decoded) {
        self.frames += 1;
        *self
            .packet_types
            .entry(decoded.packet.packet_type())
            .or_default() += 1;

        let station = self
            .stations
            .entry(decoded.frame.source.to_string())
            .or_default();
        station.count += 1;
        station.bytes += decoded.frame.info.len();
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ax25::{Address, Frame};
    use crate::payload;

    fn decoded(src: &str, ssid: u8, info: &[u8]) -> Decoded {
        Decoded {
            port: 0,
            frame: Frame {
                destination: Address::new("APRS", 0).unwrap(),
                source: Address::new(src, ssid).unwrap(),
                digipeaters: vec![],
                control: 0x03,
                pid: 0xf0,
                info: info.to_vec(),
            },
            packet: payload::decode(info),
        }
    }

    #[test]
    fn summary() {
        let mut summary = Summary::default();
        summary.add(&decoded("N0CALL", 9, b"!4903.50N/07201.75W-"));
        summary.add(&decoded("N0CALL", 9, b">status"));
        summary.add(&decoded("W2ASM", 0, b">status"));
        summary.add(&decoded("W2ASM", 0, b"bogus"));
        summary.add_error();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.packet_types.len(), 3);
        assert_eq!(summary.packet_types[&PacketType::Status], 2);
        assert_eq!(summary.packet_types[&PacketType::PositionNoTimestamp], 1);
        assert_eq!(summary.packet_types[&PacketType::Unknown], 1);

        assert_eq!(summary.stations.len(), 2);
        let station = &summary.stations["N0CALL-9"];
        assert_eq!(station.count, 2);
        assert_eq!(station.bytes, 27);
        assert_eq!(summary.stations["W2ASM"].count, 2);
    }
}
