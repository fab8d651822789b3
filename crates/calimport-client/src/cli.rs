//! Command-line interface definition.

use std::path::PathBuf;

use calimport_core::TracingOutputFormat;
use clap::Parser;

/// calimport - Import events from a YAML file into Google Calendar
#[derive(Debug, Parser)]
#[command(name = "calimport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML events file [default: ./events.yaml]
    #[arg(long, short, env = "CALIMPORT_EVENTS")]
    pub events: Option<PathBuf>,

    /// Path to the OAuth client secrets JSON file [default: credentials.json]
    #[arg(long, env = "CALIMPORT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Path to the token cache [default: token.json]
    #[arg(long, env = "CALIMPORT_TOKEN")]
    pub token: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, env = "CALIMPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Validate the file and print the request bodies without contacting Google
    #[arg(long)]
    pub dry_run: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log output on stderr: compact, pretty or json [default: compact]
    #[arg(long, env = "CALIMPORT_LOG_FORMAT")]
    pub log_format: Option<TracingOutputFormat>,
}
