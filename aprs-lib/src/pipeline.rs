//! Byte stream to APRS packet decoding.
//!
//! # Example
//! ```
//! use aprs::{kiss, pipeline::{Pipeline, PipelineOpts}};
//!
//! // A KISS frame holding `N0CALL>APRS:>status`
//! let mut frame = Vec::new();
//! frame.extend(aprs::ax25::Address::new("APRS", 0).unwrap().encode());
//! frame.extend(aprs::ax25::Address::new("N0CALL", 0).unwrap().encode());
//! frame.extend([0x03, 0xf0]);
//! frame.extend(b">status");
//! frame[6] &= !0x01; // destination is not the last address
//!
//! let mut pipeline = Pipeline::new(PipelineOpts::new());
//! let decoded = pipeline.feed(&kiss::encode(0, &frame));
//!
//! assert_eq!(decoded.len(), 1);
//! let decoded = decoded[0].as_ref().unwrap();
//! assert_eq!(decoded.frame.source.callsign, "N0CALL");
//! assert_eq!(decoded.packet.description(), ">status");
//! ```
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ax25::Frame;
use crate::kiss::{Framer, KissFrame};
use crate::payload::{self, Packet};
use crate::Result;

/// Options for filtering frames entering a [Pipeline].
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOpts {
    port: Option<u8>,
    ui_only: bool,
}

impl PipelineOpts {
    /// Options that accept all frames on all ports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only decode frames received on TNC `port`.
    pub fn with_port(mut self, port: u8) -> Self {
        self.port = Some(port);
        self
    }

    /// Only decode UI frames without a layer 3 protocol, i.e., frames that can
    /// carry APRS.
    pub fn with_ui_only(mut self, enabled: bool) -> Self {
        self.ui_only = enabled;
        self
    }
}

/// A fully decoded APRS frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decoded {
    /// TNC port the frame was received on
    pub port: u8,
    pub frame: Frame,
    pub packet: Packet,
}

/// Decodes APRS packets from a KISS byte stream delivered in arbitrary chunks.
///
/// Frame level decode errors are returned in place of the frame and do not affect
/// decoding of subsequent frames.
#[derive(Debug, Default)]
pub struct Pipeline {
    framer: Framer,
    opts: PipelineOpts,
}

impl Pipeline {
    pub fn new(opts: PipelineOpts) -> Self {
        Pipeline {
            framer: Framer::new(),
            opts,
        }
    }

    /// Feed bytes, returning the results for all frames completed by `dat` in order.
    pub fn feed(&mut self, dat: &[u8]) -> Vec<Result<Decoded>> {
        let mut zult = Vec::default();
        self.feed_with(dat, |d| zult.push(d));
        zult
    }

    /// Feed bytes, calling `sink` with the result for each frame completed by `dat`
    /// before returning.
    pub fn feed_with<F>(&mut self, dat: &[u8], mut sink: F)
    where
        F: FnMut(Result<Decoded>),
    {
        let opts = &self.opts;
        self.framer.feed_with(dat, |kf| {
            if let Some(zult) = process(opts, kf) {
                sink(zult);
            }
        });
    }

    /// Drop any partially received frame.
    pub fn reset(&mut self) {
        self.framer.reset();
    }
}

fn process(opts: &PipelineOpts, kf: KissFrame) -> Option<Result<Decoded>> {
    if opts.port.is_some_and(|p| p != kf.port) {
        trace!(port = kf.port, "dropping frame for other port");
        return None;
    }
    let frame = match Frame::decode(&kf.data) {
        Ok(frame) => frame,
        Err(err) => {
            debug!(len = kf.data.len(), error = %err, "ax.25 decode failed");
            return Some(Err(err));
        }
    };
    if opts.ui_only && !frame.is_ui() {
        trace!(
            control = frame.control,
            pid = frame.pid,
            "dropping non-ui frame"
        );
        return None;
    }

    let packet = payload::decode(&frame.info);
    Some(Ok(Decoded {
        port: kf.port,
        frame,
        packet,
    }))
}

struct ReaderIter<R> {
    reader: R,
    pipeline: Pipeline,
    pending: VecDeque<Result<Decoded>>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> Iterator for ReaderIter<R> {
    type Item = Result<Decoded>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(zult) = self.pending.pop_front() {
                return Some(zult);
            }
            if self.done {
                return None;
            }
            match self.reader.read(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(n) => {
                    let pending = &mut self.pending;
                    self.pipeline
                        .feed_with(&self.buf[..n], |d| pending.push_back(d));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

/// Decode all packets in a KISS byte stream.
///
/// Iteration ends at EOF, or after the first read error, which is yielded as
/// [Error::Io](crate::Error::Io). A partial frame at EOF is discarded.
pub fn decode_reader<R>(reader: R, opts: PipelineOpts) -> impl Iterator<Item = Result<Decoded>>
where
    R: Read,
{
    ReaderIter {
        reader,
        pipeline: Pipeline::new(opts),
        pending: VecDeque::default(),
        buf: vec![0u8; 4096],
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ax25::Address;
    use crate::kiss;
    use crate::payload::PacketType;
    use crate::Error;

    fn ui_frame(src: &str, dst: &str, info: &[u8]) -> Vec<u8> {
        let mut dat = Vec::new();
        let mut dest = Address::new(dst, 0).unwrap().encode();
        dest[6] &= !0x01;
        dat.extend(dest);
        dat.extend(Address::new(src, 0).unwrap().encode());
        dat.extend([0x03, 0xf0]);
        dat.extend(info);
        dat
    }

    #[test]
    fn feed_decodes_all_stages() {
        let dat = kiss::encode(0, &ui_frame("N0CALL", "APRS", b"!4903.50N/07201.75W-"));
        let mut pipeline = Pipeline::default();

        let zult = pipeline.feed(&dat);

        assert_eq!(zult.len(), 1);
        let decoded = zult[0].as_ref().unwrap();
        assert_eq!(decoded.port, 0);
        assert_eq!(decoded.frame.source.callsign, "N0CALL");
        assert_eq!(decoded.frame.destination.callsign, "APRS");
        assert_eq!(
            decoded.packet.packet_type(),
            PacketType::PositionNoTimestamp
        );
    }

    #[test]
    fn feed_across_chunks() {
        let mut dat = kiss::encode(0, &ui_frame("N0CALL", "APRS", b">one"));
        dat.extend(kiss::encode(0, &ui_frame("N1CALL", "APRS", b">two")));
        let mut pipeline = Pipeline::default();

        let mut zult = Vec::new();
        for chunk in dat.chunks(5) {
            pipeline.feed_with(chunk, |d| zult.push(d.unwrap()));
        }

        assert_eq!(zult.len(), 2);
        assert_eq!(zult[0].packet, Packet::Status("one".to_string()));
        assert_eq!(zult[1].packet, Packet::Status("two".to_string()));
    }

    #[test]
    fn bad_frame_does_not_affect_next() {
        let mut dat = kiss::encode(0, &[0x82, 0xa0, 0xa4]);
        dat.extend(kiss::encode(0, &ui_frame("N0CALL", "APRS", b">ok")));
        let mut pipeline = Pipeline::default();

        let zult = pipeline.feed(&dat);

        assert_eq!(zult.len(), 2);
        assert!(matches!(
            zult[0],
            Err(Error::FrameTooShort {
                actual: 3,
                minimum: 16
            })
        ));
        assert!(zult[1].is_ok());
    }

    #[test]
    fn port_filter() {
        let mut dat = kiss::encode(1, &ui_frame("N0CALL", "APRS", b">one"));
        dat.extend(kiss::encode(2, &ui_frame("N0CALL", "APRS", b">two")));
        let mut pipeline = Pipeline::new(PipelineOpts::new().with_port(2));

        let zult = pipeline.feed(&dat);

        assert_eq!(zult.len(), 1);
        let decoded = zult[0].as_ref().unwrap();
        assert_eq!(decoded.port, 2);
        assert_eq!(decoded.packet, Packet::Status("two".to_string()));
    }

    #[test]
    fn ui_only_filter() {
        let mut frame = ui_frame("N0CALL", "APRS", b">one");
        frame[14] = 0x3f; // SABM
        let dat = kiss::encode(0, &frame);

        assert_eq!(Pipeline::default().feed(&dat).len(), 1);
        let mut pipeline = Pipeline::new(PipelineOpts::new().with_ui_only(true));
        assert!(pipeline.feed(&dat).is_empty());
    }

    #[test]
    fn decode_reader_reads_to_eof() {
        let mut dat = Vec::new();
        for i in 0..10 {
            let info = format!(">status {i}");
            dat.extend(kiss::encode(0, &ui_frame("N0CALL", "APRS", info.as_bytes())));
        }
        // trailing partial frame is discarded
        dat.extend([kiss::FEND, 0x00, 0x82]);

        let zult: Vec<Decoded> = decode_reader(dat.as_slice(), PipelineOpts::new())
            .map(|d| d.unwrap())
            .collect();

        assert_eq!(zult.len(), 10);
        assert_eq!(zult[9].packet, Packet::Status("status 9".to_string()));
    }

    struct FailingReader {
        dat: Vec<u8>,
        reads: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads += 1;
            if self.reads > 1 {
                return Err(std::io::Error::other("boom"));
            }
            let n = self.dat.len().min(buf.len());
            buf[..n].copy_from_slice(&self.dat[..n]);
            Ok(n)
        }
    }

    #[test]
    fn decode_reader_stops_after_error() {
        let reader = FailingReader {
            dat: kiss::encode(0, &ui_frame("N0CALL", "APRS", b">one")),
            reads: 0,
        };

        let zult: Vec<Result<Decoded>> = decode_reader(reader, PipelineOpts::new()).collect();

        assert_eq!(zult.len(), 2);
        assert!(zult[0].is_ok());
        assert!(matches!(zult[1], Err(Error::Io(_))));
    }
}
