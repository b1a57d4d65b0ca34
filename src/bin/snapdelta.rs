//! snapdelta CLI
//!
//! Generates an incremental-load SQL script from two full TSV dumps of a
//! table.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use snapdelta::{pipeline, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// snapdelta
#[derive(Parser, Debug)]
#[command(name = "snapdelta")]
#[command(about = "Generate an incremental SQL load script from two TSV table dumps")]
#[command(version)]
struct Args {
    /// Old snapshot dump (TSV)
    old: PathBuf,

    /// New snapshot dump (TSV)
    new: PathBuf,

    /// Output path for the generated SQL script
    #[arg(short, long)]
    output: PathBuf,

    /// Ordered field names of the dumps, comma-separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    fields: Vec<String>,

    /// Key field names identifying a record, comma-separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    key_fields: Vec<String>,

    /// Table name used in generated statements
    #[arg(short, long)]
    table: String,

    /// Add the IGNORE keyword to INSERT and UPDATE statements
    #[arg(long)]
    ignore: bool,

    /// Allow non-numeric key values (compared lexicographically)
    #[arg(long)]
    relaxed_keys: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,snapdelta=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("snapdelta v{}", snapdelta::VERSION);

    let config = Config::builder()
        .fields(args.fields)
        .key_fields(args.key_fields)
        .enforce_numeric_keys(!args.relaxed_keys)
        .table(args.table)
        .use_ignore(args.ignore)
        .build();

    if let Err(e) = pipeline::generate(&args.old, &args.new, &args.output, &config) {
        tracing::error!("delta generation failed: {}", e);
        process::exit(1);
    }
}
