//! # CLI Argument Definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "perfkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Bootstrap and deploy tooling for the QUIC speed test harness")]
pub struct Cli {
    /// Extra configuration file layered over perfkit.toml and perfkit.local.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Prepare the current directory: certificates, server configs and helper scripts
    Setup {
        /// Source tree of the native networking library (its `src` directory)
        native_src_dir: PathBuf,
        /// Profiler helper scripts directory
        profiler_scripts_dir: PathBuf,
    },
    /// Build the native library for every architecture and copy it into the destination tree
    Build {},
    /// Render a single template
    Render {
        template: PathBuf,
        output: PathBuf,

        /// Placeholder binding, repeatable
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_binding)]
        set: Vec<(String, String)>,

        /// Match keys as bare substrings instead of {{KEY}}
        #[arg(long)]
        literal: bool,

        /// Set the execute bits on the output
        #[arg(short = 'x', long)]
        executable: bool,
    },
    /// Print the effective configuration as TOML
    Config {},
}

fn parse_binding(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in `{raw}`")),
        Some((key, value)) => Ok((key.to_owned(), value.to_owned())),
        None => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
