use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod engine;
mod error;
mod install;
mod paths;
mod registry;
mod resolve;
mod theme;
mod workflow;

use cli::{Command, RootArgs};
use error::PdfxError;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    initialize_tracing(args.global.verbose);

    let result = match &args.command {
        Command::List(list) => workflow::run_list(&args.global, list),
        Command::Add(add) => workflow::run_add(&args.global, add),
        Command::Diff(diff) => workflow::run_diff(&args.global, diff),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries command output only.
fn initialize_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<PdfxError>() {
        Some(pdfx) => {
            eprintln!("{}: {pdfx}", pdfx.kind());
            if let Some(hint) = pdfx.suggestion() {
                eprintln!("hint: {hint}");
            }
        }
        None => eprintln!("error: {err:#}"),
    }
}
