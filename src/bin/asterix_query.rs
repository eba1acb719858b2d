//! asterix-query: Run an AQL or SQL++ query the way a notebook paragraph would
//!
//! Usage:
//!   # Read the query from a file, print the HTML tree view
//!   asterix-query query.aql
//!
//!   # SQL++ from stdin, flattened into a table
//!   echo 'SELECT VALUE u FROM Users u;' | asterix-query --sqlpp --flat
//!
//!   # Only check that the cluster answers
//!   asterix-query --probe --host cc.example.org

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use asterix_interpreter::interpreter::FLAT_DIRECTIVE;
use asterix_interpreter::{AsterixClient, ClientConfig, Dialect, Interpreter};
use clap::Parser;
use std::fs;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "asterix-query")]
#[command(about = "Send a query to AsterixDB and render the result", long_about = None)]
struct Args {
    /// Query file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Host of the AsterixDB HTTP API (default: localhost)
    #[arg(long)]
    host: Option<String>,

    /// Port of the AsterixDB HTTP API (default: 19002)
    #[arg(long)]
    port: Option<u16>,

    /// Request timeout in seconds (default: 30)
    #[arg(long)]
    timeout: Option<u64>,

    /// Treat the query as SQL++ instead of AQL
    #[arg(long)]
    sqlpp: bool,

    /// Flatten the result into a tab-separated table
    #[arg(long)]
    flat: bool,

    /// Paragraph id used for the HTML element id
    #[arg(long, default_value = "cli")]
    paragraph_id: String,

    /// Only run the connection check
    #[arg(long)]
    probe: bool,
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
    let mut config = ClientConfig::default();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    let dialect = if args.sqlpp { Dialect::SqlPp } else { Dialect::Aql };
    let interpreter = Interpreter::new(dialect, AsterixClient::new(config)?);

    if args.probe {
        interpreter.open()?;
        println!("AsterixDB is reachable");
        return Ok(());
    }

    let query = read_query(args.input.as_deref())?;
    let paragraph = if args.flat {
        format!("{}{}", FLAT_DIRECTIVE, query)
    } else {
        query
    };

    let result = interpreter.interpret(&paragraph, &args.paragraph_id);
    interpreter.close();

    if !result.is_success() {
        bail!("{}", result.body);
    }

    print!("{}", result.body);
    Ok(())
}

fn read_query(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read query file: {}", path)),
        None => {
            let mut query = String::new();
            std::io::stdin()
                .read_to_string(&mut query)
                .context("Failed to read query from stdin")?;
            Ok(query)
        }
    }
}
