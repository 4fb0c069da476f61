mod decode;
mod info;

use std::fs::File;
use std::io::{stderr, stdin, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aprs::pipeline::PipelineOpts;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode APRS packets from a KISS stream.
    ///
    /// Each packet is written as its TNC2 monitor line followed by the decoded packet,
    /// or as one JSON object per line. Frames that fail to decode are logged and
    /// skipped.
    Decode {
        /// Input KISS stream file, or - for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: info::Format,

        /// Only decode frames received on this TNC port.
        #[arg(short, long)]
        port: Option<u8>,

        /// Only decode UI frames without a layer 3 protocol.
        #[arg(short, long, action)]
        ui_only: bool,
    },
    /// Show information about a KISS stream
    Info {
        /// Input KISS stream file, or - for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: info::Format,
    },
}

fn open(input: &Path) -> Result<Box<dyn Read>> {
    if input == Path::new("-") {
        return Ok(Box::new(stdin().lock()));
    }
    let file = File::open(input).with_context(|| format!("opening input {input:?}"))?;
    Ok(Box::new(file))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("APRS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Decode {
            input,
            format,
            port,
            ui_only,
        } => {
            let mut opts = PipelineOpts::new().with_ui_only(*ui_only);
            if let Some(port) = port {
                opts = opts.with_port(*port);
            }
            decode::decode(open(input)?, format, opts)
        }
        Commands::Info { input, format } => info::info(input, open(input)?, format),
    }
}
