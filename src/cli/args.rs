//! Command line argument parsing for the nearword CLI using clap.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::server::DEFAULT_PORT;

/// Nearword - a durable word store answering nearest-fingerprint queries
#[derive(Parser, Debug, Clone)]
#[command(name = "nearword")]
#[command(about = "A durable word store answering nearest-fingerprint queries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct NearwordArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(long, env = "NEARWORD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the log (overrides the config file)
    #[arg(long, env = "NEARWORD_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log file name inside the data directory (overrides the config file)
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl NearwordArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve match requests over HTTP
    Serve(ServeArgs),

    /// Match words against the store, storing each one
    Query(WordsArgs),

    /// Store words without matching
    Insert(WordsArgs),

    /// Look up the nearest stored word for a raw fingerprint
    Nearest(NearestArgs),

    /// Show store statistics
    Stats,

    /// Measure match throughput over random words
    Bench(BenchArgs),
}

/// Arguments for the HTTP server
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, default_value_t = SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)))]
    pub bind: SocketAddr,
}

/// Arguments carrying one or more words
#[derive(Args, Debug, Clone)]
pub struct WordsArgs {
    /// Lowercase ASCII words
    #[arg(value_name = "WORD", required = true)]
    pub words: Vec<String>,
}

/// Arguments for a raw fingerprint lookup
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct NearestArgs {
    /// Value fingerprint to look up
    #[arg(long)]
    pub value: Option<u64>,

    /// Lexical fingerprint to look up
    #[arg(long)]
    pub lexical: Option<f64>,
}

/// Arguments for benchmarking
#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Number of random words to match
    #[arg(short, long, default_value = "100000")]
    pub count: usize,

    /// Seed for the word generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run against an in-memory log instead of the configured one
    #[arg(long)]
    pub memory: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
