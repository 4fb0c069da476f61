//! AX.25 link-layer frame decoding.
//!
//! Only decoding is supported, along with encoding of individual addresses. This
//! crate never participates in the AX.25 link as a peer.
//!
//! Reference: [AX.25 Link Access Protocol v2.2](https://www.tapr.org/pdf/AX25.2.2.pdf)
use std::borrow::Cow;
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Error, Result};

/// Unnumbered information frame control field
pub const CONTROL_UI: u8 = 0x03;
/// Protocol identifier indicating no layer 3 protocol
pub const PID_NO_L3: u8 = 0xF0;

/// A station address, i.e., callsign and SSID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    /// Up to 6 characters with fill trimmed
    pub callsign: String,
    /// Secondary station identifier, 0-15
    pub ssid: u8,
    /// Set by a digipeater once it has repeated the frame
    pub has_been_repeated: bool,
}

impl Address {
    /// Length of an encoded address block
    pub const LEN: usize = 7;

    const EXTENSION: u8 = 0x01;
    const REPEATED: u8 = 0x20;

    /// Create a new address with the repeated flag unset.
    ///
    /// # Errors
    /// [Error::InvalidCallsign] if `callsign` is empty, longer than 6 characters or
    /// contains non-alphanumeric characters, and [Error::InvalidSsid] if `ssid` is
    /// greater than 15.
    pub fn new(callsign: &str, ssid: u8) -> Result<Self> {
        let callsign = callsign.trim().to_uppercase();
        if callsign.is_empty()
            || callsign.len() > 6
            || !callsign.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::InvalidCallsign(callsign));
        }
        if ssid > 15 {
            return Err(Error::InvalidSsid(ssid));
        }
        Ok(Address {
            callsign,
            ssid,
            has_been_repeated: false,
        })
    }

    /// Decode an address from the first [Address::LEN] bytes of `dat`, or `None` if
    /// there are not enough bytes.
    ///
    /// Each callsign byte is an ASCII character shifted left 1 bit. Trailing fill,
    /// spaces or zero bytes, is trimmed.
    #[must_use]
    pub fn decode(dat: &[u8]) -> Option<Self> {
        if dat.len() < Self::LEN {
            return None;
        }
        let callsign: String = dat[..6]
            .iter()
            .map(|b| match b >> 1 {
                // some TNCs fill with 0x80 rather than a shifted space
                0x00 | 0x40 => ' ',
                c => char::from(c),
            })
            .collect();

        Some(Address {
            callsign: callsign.trim().to_string(),
            ssid: (dat[6] >> 1) & 0x0f,
            has_been_repeated: dat[6] & Self::REPEATED != 0,
        })
    }

    /// Encode to an address block with the extension bit set, i.e., as the last
    /// address in the address field.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut buf = [b' ' << 1; Self::LEN];
        for (i, b) in self.callsign.to_uppercase().bytes().take(6).enumerate() {
            buf[i] = b << 1;
        }
        buf[6] = (self.ssid & 0x0f) << 1 | Self::EXTENSION;
        if self.has_been_repeated {
            buf[6] |= Self::REPEATED;
        }
        buf
    }

    fn is_last(block: &[u8]) -> bool {
        block[Self::LEN - 1] & Self::EXTENSION != 0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ssid > 0 {
            write!(f, "{}-{}", self.callsign, self.ssid)
        } else {
            write!(f, "{}", self.callsign)
        }
    }
}

/// A decoded AX.25 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    pub destination: Address,
    pub source: Address,
    /// Digipeater path, in order
    pub digipeaters: Vec<Address>,
    pub control: u8,
    pub pid: u8,
    /// Information field, i.e., everything following the PID
    pub info: Vec<u8>,
}

impl Frame {
    /// Minimum frame length, enough for destination, source, control, and PID.
    pub const MIN_LEN: usize = 2 * Address::LEN + 2;

    /// Decode a frame from the contents of a KISS data frame.
    ///
    /// Digipeater addresses are decoded until an address with the extension bit set.
    /// If the data ends before such an address the digipeater path ends with the last
    /// complete address.
    ///
    /// # Errors
    /// [Error::FrameTooShort] if there are fewer than [Frame::MIN_LEN] bytes, or
    /// [Error::MissingControl] if no bytes remain for control and PID after the
    /// address field.
    pub fn decode(dat: &[u8]) -> Result<Self> {
        let too_short = || Error::FrameTooShort {
            actual: dat.len(),
            minimum: Self::MIN_LEN,
        };
        if dat.len() < Self::MIN_LEN {
            return Err(too_short());
        }
        let destination = Address::decode(dat).ok_or_else(too_short)?;
        let source = Address::decode(&dat[Address::LEN..]).ok_or_else(too_short)?;

        let mut offset = 2 * Address::LEN;
        let mut digipeaters = Vec::default();
        let mut last = Address::is_last(&dat[Address::LEN..offset]);
        while !last {
            let Some(block) = dat.get(offset..offset + Address::LEN) else {
                trace!(offset, len = dat.len(), "address field ends without extension bit");
                break;
            };
            // block is exactly Address::LEN bytes
            if let Some(addr) = Address::decode(block) {
                digipeaters.push(addr);
            }
            last = Address::is_last(block);
            offset += Address::LEN;
        }

        if dat.len() < offset + 2 {
            return Err(Error::MissingControl {
                offset,
                actual: dat.len(),
            });
        }

        Ok(Frame {
            destination,
            source,
            digipeaters,
            control: dat[offset],
            pid: dat[offset + 1],
            info: dat[offset + 2..].to_vec(),
        })
    }

    /// True if this is a UI frame with no layer 3 protocol, as used by APRS.
    #[must_use]
    pub fn is_ui(&self) -> bool {
        self.control == CONTROL_UI && self.pid == PID_NO_L3
    }

    /// Information field as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn info_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.info)
    }
}

/// TNC2 monitor format, e.g., `N0CALL-9>APRS,WIDE1-1*:info`
impl Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)?;
        for digi in &self.digipeaters {
            write!(f, ",{digi}")?;
            if digi.has_been_repeated {
                write!(f, "*")?;
            }
        }
        write!(f, ":{}", self.info_str().trim_end_matches(['\r', '\n']))
    }
}
