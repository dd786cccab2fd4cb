//! The kala Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Failures propagate as miette reports so the
//! fancy handler renders them with source snippets and help text.

use clap::Parser;
use miette::IntoDiagnostic;

use crate::cli::args::{Command, KalaArgs};
use crate::datetime::DateTime;
use crate::syntax::Kind;

pub mod args;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = KalaArgs::parse();

    match args.command {
        Command::Parse { input, kind, json } => handle_parse(&input, kind, json),
        Command::Utc { input, kind } => handle_utc(&input, kind),
    }
}

/// Handles the `parse` subcommand.
fn handle_parse(input: &str, kind: Kind, json: bool) -> miette::Result<()> {
    let value = DateTime::parse(input, kind)?;

    if json {
        let payload = serde_json::json!({
            "kind": kind,
            "year": value.year(),
            "month": value.month(),
            "day": value.day(),
            "hours": value.hours(),
            "minutes": value.minutes(),
            "seconds": value.seconds(),
            "milliseconds": value.milliseconds(),
            "timezone": value.timezone(),
            "date": value.to_date_string(),
            "time": value.to_time_string(),
            "datetime": value.to_datetime_string(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).into_diagnostic()?
        );
    } else {
        println!("{value}");
    }

    Ok(())
}

/// Handles the `utc` subcommand.
fn handle_utc(input: &str, kind: Kind) -> miette::Result<()> {
    let value = DateTime::parse(input, kind)?;
    let utc = value.to_utc_string().into_diagnostic()?;
    println!("{utc}");
    Ok(())
}
