use std::io::{stdout, BufWriter, Read, Write};

use anyhow::{Context, Result};
use aprs::payload::{Encoding, Packet, Position};
use aprs::pipeline::{decode_reader, Decoded, PipelineOpts};
use aprs::Error;
use tracing::{info, warn};

use crate::info::Format;

fn render_position(pos: &Position) -> String {
    let units = match pos.encoding {
        Encoding::Uncompressed => "ddmm.mm",
        Encoding::Compressed => "deg",
    };
    format!(
        "lat={} lon={} ({units}) symbol={}{} comment={:?}",
        pos.latitude, pos.longitude, pos.symbol_table, pos.symbol_code, pos.comment
    )
}

fn render_packet(packet: &Packet) -> String {
    let detail = match packet {
        Packet::PositionNoTimestamp(pos) => render_position(pos),
        Packet::PositionWithTimestamp {
            timestamp,
            messaging,
            position,
        } => {
            let ts = timestamp.map(|t| t.to_string()).unwrap_or_default();
            format!(
                "time={ts:?} messaging={messaging} {}",
                render_position(position)
            )
        }
        Packet::Message(msg) => {
            let kind = if msg.is_bulletin() { "bulletin" } else { "to" };
            match msg.ack_id() {
                Some(id) => format!("{kind}={} text={:?} ack={id}", msg.addressee, msg.text),
                None => format!("{kind}={} text={:?}", msg.addressee, msg.text),
            }
        }
        Packet::Weather(wx) => format!("{wx:?}"),
        Packet::Telemetry(tlm) => format!(
            "seq={} analog={:?} digital={}",
            tlm.sequence,
            tlm.analog,
            tlm.digital
                .iter()
                .map(|b| if *b { '1' } else { '0' })
                .collect::<String>()
        ),
        Packet::Object(s)
        | Packet::Item(s)
        | Packet::Query(s)
        | Packet::Status(s)
        | Packet::Unknown(s) => format!("{s:?}"),
    };
    format!("{}: {detail}", packet.packet_type())
}

fn write_decoded<W: Write>(out: &mut W, decoded: &Decoded, format: &Format) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, decoded).context("serializing to json")?;
            writeln!(out)?;
        }
        Format::Text => {
            writeln!(out, "[{}] {}", decoded.port, decoded.frame)?;
            writeln!(out, "    {}", render_packet(&decoded.packet))?;
        }
    }
    Ok(())
}

pub fn decode<R: Read>(reader: R, format: &Format, opts: PipelineOpts) -> Result<()> {
    let mut out = BufWriter::new(stdout().lock());
    let (mut count, mut errors) = (0usize, 0usize);

    for zult in decode_reader(reader, opts) {
        match zult {
            Ok(decoded) => {
                count += 1;
                write_decoded(&mut out, &decoded, format).context("writing output")?;
            }
            Err(Error::Io(err)) => return Err(err).context("reading input"),
            Err(err) => {
                errors += 1;
                warn!("skipping frame: {err}");
            }
        }
    }
    out.flush().context("writing output")?;

    info!("decoded {count} packets, {errors} bad frames");
    Ok(())
}
