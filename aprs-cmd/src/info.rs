use anyhow::{Context, Result};
use aprs::pipeline::{decode_reader, PipelineOpts};
use aprs::{Error, StationSummary, Summary};
use handlebars::handlebars_helper;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io::{stdout, Read, Write},
    path::Path,
};

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Text,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
            Self::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Info {
    filename: String,
    frames: usize,
    errors: usize,
    /// Packet counts keyed by type description
    packet_types: BTreeMap<String, usize>,
    stations: BTreeMap<String, StationSummary>,
}

impl Info {
    fn new(filename: &str, summary: Summary) -> Self {
        Info {
            filename: filename.to_string(),
            frames: summary.frames,
            errors: summary.errors,
            packet_types: summary
                .packet_types
                .into_iter()
                .map(|(typ, count)| (typ.description().to_string(), count))
                .collect(),
            stations: summary.stations,
        }
    }
}

fn summarize<R: Read>(reader: R) -> Result<Summary> {
    let mut summary = Summary::default();
    for zult in decode_reader(reader, PipelineOpts::new()) {
        match zult {
            Ok(decoded) => summary.add(&decoded),
            Err(Error::Io(err)) => return Err(err).context("reading input"),
            Err(_) => summary.add_error(),
        }
    }
    Ok(summary)
}

pub fn info<R: Read>(fpath: &Path, reader: R, format: &Format) -> Result<()> {
    let info = Info::new(&fpath.to_string_lossy(), summarize(reader)?);

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(stdout(), &info).context("serializing to json")
        }
        Format::Text => {
            let data = render_text(&info).context("serializing info")?;
            stdout()
                .write_all(str::as_bytes(&data))
                .context("writing to stdout")
        }
    }
}

fn render_text(info: &Info) -> Result<String> {
    handlebars_helper!(left_pad: |num: u64, v: Json| {
        let v = match v {
            serde_json::Value::String(s) => s.to_owned(),
            serde_json::Value::Null => String::new(),
            _ => v.to_string()
        };
        let num = usize::try_from(num).unwrap_or_default().max(v.len());
        format!("{v:>num$}")
    });
    let mut hb = handlebars::Handlebars::new();
    hb.register_helper("lpad", Box::new(left_pad));
    hb.register_template_string("info", TEXT_TEMPLATE)
        .context("compiling template")?;

    hb.render("info", &info).context("rendering text")
}

const TEXT_TEMPLATE: &str = r"{{ filename }}
===============================================================
Frames:   {{ frames }}
Errors:   {{ errors }}
---------------------------------------------------------------
Type                                                      Count
---------------------------------------------------------------
{{ #each packet_types }}{{ lpad 25 @key }}  {{ lpad 30 this }}
{{/each }}---------------------------------------------------------------
Station                                         Count     Bytes
---------------------------------------------------------------
{{ #each stations }}{{ lpad 9 @key }}  {{ lpad 40 count }}  {{ lpad 8 bytes }}
{{/each }}";
