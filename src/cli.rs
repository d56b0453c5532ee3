//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nsqtop")]
#[command(about = "Live terminal dashboard for nsqd topic and channel queue depths")]
#[command(version, disable_version_flag = true)]
pub struct Args {
    /// nsqd HTTP address (host:port); repeat to watch several nodes
    /// [default: 0.0.0.0:4151]
    #[arg(short = 'a', long = "nsqd-http-address", value_name = "ADDR")]
    pub nsqd_http_address: Vec<String>,

    /// Refresh interval (e.g. "1s", "500ms", "1m30s") [default: 1s]
    #[arg(short, long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Per-request timeout for each stats fetch [default: 10s]
    #[arg(short, long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Keep polling the other nodes when one fails instead of exiting
    #[arg(long, overrides_with = "no_keep_going")]
    pub keep_going: bool,

    /// Exit on the first failed node, even if settings say keep_going
    #[arg(long, overrides_with = "keep_going")]
    pub no_keep_going: bool,

    /// Poll every node once, print the tables and exit
    #[arg(long)]
    pub once: bool,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}
