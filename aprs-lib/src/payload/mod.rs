//! APRS information field decoding.
//!
//! The first character of the information field selects a packet type, and the
//! rest of the field is handed to that type's grammar. Decoding never fails; a
//! payload that is not ASCII, has an unrecognized indicator, or does not match its
//! grammar decodes to [Packet::Unknown].
mod message;
mod position;
mod telemetry;
mod timestamp;
mod weather;

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use message::Message;
pub use position::{Encoding, Position};
pub use telemetry::Telemetry;
pub use timestamp::Timestamp;
pub use weather::Weather;

/// Packet classification by type indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PacketType {
    PositionNoTimestamp,
    PositionWithTimestamp,
    Message,
    Weather,
    Telemetry,
    Object,
    Item,
    Query,
    Status,
    Unknown,
}

impl PacketType {
    /// Classify a type indicator. `=` is a position with timestamp and messaging.
    #[must_use]
    pub fn from_indicator(c: char) -> Self {
        match c {
            '!' => PacketType::PositionNoTimestamp,
            '@' | '=' => PacketType::PositionWithTimestamp,
            ':' => PacketType::Message,
            '_' => PacketType::Weather,
            'T' => PacketType::Telemetry,
            ';' => PacketType::Object,
            ')' => PacketType::Item,
            '?' => PacketType::Query,
            '>' => PacketType::Status,
            _ => PacketType::Unknown,
        }
    }

    /// The canonical type indicator, `None` for [PacketType::Unknown].
    #[must_use]
    pub fn indicator(&self) -> Option<char> {
        match self {
            PacketType::PositionNoTimestamp => Some('!'),
            PacketType::PositionWithTimestamp => Some('@'),
            PacketType::Message => Some(':'),
            PacketType::Weather => Some('_'),
            PacketType::Telemetry => Some('T'),
            PacketType::Object => Some(';'),
            PacketType::Item => Some(')'),
            PacketType::Query => Some('?'),
            PacketType::Status => Some('>'),
            PacketType::Unknown => None,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            PacketType::PositionNoTimestamp => "Position (no timestamp)",
            PacketType::PositionWithTimestamp => "Position (with timestamp)",
            PacketType::Message => "Message",
            PacketType::Weather => "Weather Report",
            PacketType::Telemetry => "Telemetry",
            PacketType::Object => "Object",
            PacketType::Item => "Item",
            PacketType::Query => "Query",
            PacketType::Status => "Status",
            PacketType::Unknown => "Unknown",
        }
    }
}

impl Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A decoded APRS information field.
///
/// Object, item, query and status packets are classified only; they carry the
/// content following the type indicator verbatim. [Packet::Unknown] carries the
/// entire information field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Packet {
    PositionNoTimestamp(Position),
    PositionWithTimestamp {
        timestamp: Option<Timestamp>,
        messaging: bool,
        position: Position,
    },
    Message(Message),
    Weather(Weather),
    Telemetry(Telemetry),
    Object(String),
    Item(String),
    Query(String),
    Status(String),
    Unknown(String),
}

/// Decode an APRS information field.
#[must_use]
pub fn decode(info: &[u8]) -> Packet {
    let Ok(text) = std::str::from_utf8(info) else {
        return Packet::Unknown(String::from_utf8_lossy(info).into_owned());
    };
    if !text.is_ascii() {
        return Packet::Unknown(text.to_string());
    }
    let Some(indicator) = text.chars().next() else {
        return Packet::Unknown(String::new());
    };
    let body = &text[1..];

    let typ = PacketType::from_indicator(indicator);
    let zult = match typ {
        PacketType::PositionNoTimestamp => Position::parse(body).map(Packet::PositionNoTimestamp),
        PacketType::PositionWithTimestamp => decode_timestamped(body, indicator == '='),
        PacketType::Message => Message::parse(body).map(Packet::Message),
        PacketType::Weather => Some(Packet::Weather(Weather::parse(body))),
        PacketType::Telemetry => Telemetry::parse(body).map(Packet::Telemetry),
        PacketType::Object => Some(Packet::Object(body.to_string())),
        PacketType::Item => Some(Packet::Item(body.to_string())),
        PacketType::Query => Some(Packet::Query(body.to_string())),
        PacketType::Status => Some(Packet::Status(body.to_string())),
        PacketType::Unknown => None,
    };

    zult.unwrap_or_else(|| {
        if typ != PacketType::Unknown {
            debug!(%indicator, packet_type = %typ, "payload does not match grammar");
        }
        Packet::Unknown(text.to_string())
    })
}

// The timestamp is required for `@` and optional for `=`.
fn decode_timestamped(body: &str, messaging: bool) -> Option<Packet> {
    let (timestamp, rest) = match Timestamp::parse_prefix(body) {
        Some((ts, rest)) => (Some(ts), rest),
        None if messaging => (None, body),
        None => return None,
    };
    Some(Packet::PositionWithTimestamp {
        timestamp,
        messaging,
        position: Position::parse(rest)?,
    })
}

impl Packet {
    #[must_use]
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::PositionNoTimestamp(_) => PacketType::PositionNoTimestamp,
            Packet::PositionWithTimestamp { .. } => PacketType::PositionWithTimestamp,
            Packet::Message(_) => PacketType::Message,
            Packet::Weather(_) => PacketType::Weather,
            Packet::Telemetry(_) => PacketType::Telemetry,
            Packet::Object(_) => PacketType::Object,
            Packet::Item(_) => PacketType::Item,
            Packet::Query(_) => PacketType::Query,
            Packet::Status(_) => PacketType::Status,
            Packet::Unknown(_) => PacketType::Unknown,
        }
    }

    /// The reported position, if this is a position packet.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match self {
            Packet::PositionNoTimestamp(position)
            | Packet::PositionWithTimestamp { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Wire text form of the packet, including the type indicator.
    ///
    /// Exact for uncompressed positions, messages, weather and telemetry.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Packet::PositionNoTimestamp(pos) => format!("!{pos}"),
            Packet::PositionWithTimestamp {
                timestamp,
                messaging,
                position,
            } => {
                let indicator = if *messaging { '=' } else { '@' };
                let ts = timestamp.map(|t| t.to_string()).unwrap_or_default();
                format!("{indicator}{ts}{position}")
            }
            Packet::Message(msg) => format!(":{msg}"),
            Packet::Weather(wx) => format!("_{wx}"),
            Packet::Telemetry(tlm) => format!("T{tlm}"),
            Packet::Object(s) => format!(";{s}"),
            Packet::Item(s) => format!("){s}"),
            Packet::Query(s) => format!("?{s}"),
            Packet::Status(s) => format!(">{s}"),
            Packet::Unknown(s) => s.clone(),
        }
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}
