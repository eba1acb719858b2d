//! asterix-flat: Flatten a saved query result into a tab-separated table
//!
//! Usage:
//!   # Read from file, output to stdout
//!   asterix-flat result.json
//!
//!   # Read from stdin with a custom path separator
//!   echo '[{"a": {"b": 1}}]' | asterix-flat --separator /

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use asterix_interpreter::{flatten_stream, FlattenConfig, TableWriter};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "asterix-flat")]
#[command(about = "Flatten a JSON array of tuples into a tab-separated table", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Separator between a parent path and an object key (default: ".", must not be empty)
    #[arg(long)]
    separator: Option<String>,

    /// Maximum nesting depth below each tuple (default: 100)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Build config
    let mut config = FlattenConfig::default();
    if let Some(sep) = args.separator {
        config.separator = sep;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    config.validate()?;

    let reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open file: {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    debug!(?config, "Flattening input");
    let stdout = std::io::stdout();
    let mut writer = TableWriter::new(stdout.lock());
    flatten_stream(reader, &mut writer, config)?;
    writer.flush()?;

    Ok(())
}
