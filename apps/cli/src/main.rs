#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{build, config, render, setup};
use crate::models::args::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use perfkit_logger::{Logger, level_for};
use perfkit_toolchain::ToolError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = Logger::builder(env!("CARGO_BIN_NAME")).level(level_for(cli.verbose, cli.quiet));
    if let Some(dir) = &cli.log_dir {
        logger = logger.path(dir);
    }
    let _logger = match logger.init() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("perfkit: failed to initialize logging: {err}");
            return ExitCode::FAILURE;
        },
    };

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        },
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let extra = cli.config.as_deref();
    match cli.command {
        Commands::Setup { native_src_dir, profiler_scripts_dir } => {
            setup::run_setup(extra, native_src_dir, profiler_scripts_dir)
        },
        Commands::Build {} => build::run_build(extra),
        Commands::Render { template, output, set, literal, executable } => {
            render::run_render(&template, &output, set, literal, executable)
        },
        Commands::Config {} => config::show_config(extra),
    }
}

/// Exit status for a failed run.
///
/// A failing external command passes its own code through; signals and
/// every other error map to 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ToolError>())
        .and_then(ToolError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
