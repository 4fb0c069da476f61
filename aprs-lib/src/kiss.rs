//! KISS TNC framing.
//!
//! Reference: [KISS protocol](http://www.ax25.net/kiss.aspx)
use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Frame end
pub const FEND: u8 = 0xC0;
/// Frame escape
pub const FESC: u8 = 0xDB;
/// Transposed frame end
pub const TFEND: u8 = 0xDC;
/// Transposed frame escape
pub const TFESC: u8 = 0xDD;

pub const CMD_DATA: u8 = 0x00;
pub const CMD_TXDELAY: u8 = 0x01;
pub const CMD_P: u8 = 0x02;
pub const CMD_SLOTTIME: u8 = 0x03;
pub const CMD_TXTAIL: u8 = 0x04;
pub const CMD_FULLDUPLEX: u8 = 0x05;
pub const CMD_SETHARDWARE: u8 = 0x06;
pub const CMD_RETURN: u8 = 0xFF;

/// A de-escaped KISS data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KissFrame {
    /// TNC port from the high nibble of the command byte.
    pub port: u8,
    /// Frame contents following the command byte, typically an AX.25 frame.
    pub data: Vec<u8>,
}

/// Framer recovers KISS frames from a byte stream delivered in arbitrarily sized
/// chunks.
///
/// State carries over between calls to [Framer::feed], so a frame may be split
/// across any number of chunks. Only data frames (command `0x00`) are produced;
/// frames carrying other commands, frames of 1 byte or less, and bytes following
/// an invalid escape are dropped.
///
/// # Example
/// ```
/// use aprs::kiss::{Framer, KissFrame};
///
/// let mut framer = Framer::new();
/// assert!(framer.feed(&[0xc0, 0x00, 0x01, 0xdb]).is_empty());
/// let frames = framer.feed(&[0xdc, 0x02, 0xc0]);
/// assert_eq!(frames, vec![KissFrame { port: 0, data: vec![0x01, 0xc0, 0x02] }]);
/// ```
#[derive(Debug, Default)]
pub struct Framer {
    buf: Vec<u8>,
    escaping: bool,
}

impl Framer {
    pub fn new() -> Self {
        Framer::default()
    }

    /// Consume `dat` and return any frames completed by it, in stream order.
    pub fn feed(&mut self, dat: &[u8]) -> Vec<KissFrame> {
        let mut frames = Vec::new();
        self.feed_with(dat, |frame| frames.push(frame));
        frames
    }

    /// Consume `dat` handing each completed frame to `sink` before returning.
    pub fn feed_with<F>(&mut self, dat: &[u8], mut sink: F)
    where
        F: FnMut(KissFrame),
    {
        for &b in dat {
            if self.escaping {
                match b {
                    TFEND => self.buf.push(FEND),
                    TFESC => self.buf.push(FESC),
                    _ => trace!(byte = b, "dropping invalid escaped byte"),
                }
                self.escaping = false;
            } else if b == FESC {
                self.escaping = true;
            } else if b == FEND {
                if let Some(frame) = self.complete() {
                    sink(frame);
                }
            } else {
                self.buf.push(b);
            }
        }
    }

    /// Drop any partially accumulated frame.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.escaping = false;
    }

    /// Number of bytes accumulated toward the current frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn complete(&mut self) -> Option<KissFrame> {
        if self.buf.len() <= 1 {
            if !self.buf.is_empty() {
                trace!(len = self.buf.len(), "dropping short frame");
            }
            self.buf.clear();
            return None;
        }
        let buf = mem::take(&mut self.buf);
        let command = buf[0] & 0x0f;
        if command != CMD_DATA {
            trace!(command, len = buf.len(), "dropping non-data frame");
            return None;
        }
        Some(KissFrame {
            port: buf[0] >> 4,
            data: buf[1..].to_vec(),
        })
    }
}

/// Escape `FEND` and `FESC` occurrences in `dat`.
#[must_use]
pub fn escape(dat: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(dat.len());
    for &b in dat {
        match b {
            FEND => out.extend_from_slice(&[FESC, TFEND]),
            FESC => out.extend_from_slice(&[FESC, TFESC]),
            _ => out.push(b),
        }
    }
    out
}

/// Wrap `dat` as a complete KISS data frame for `port`, i.e.,
/// `FEND, port<<4, escaped dat, FEND`.
#[must_use]
pub fn encode(port: u8, dat: &[u8]) -> Vec<u8> {
    let escaped = escape(dat);
    let mut out = Vec::with_capacity(escaped.len() + 3);
    out.push(FEND);
    out.push((port & 0x0f) << 4 | CMD_DATA);
    out.extend_from_slice(&escaped);
    out.push(FEND);
    out
}
