//! Defines the command-line arguments and subcommands for the kala CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};

use crate::syntax::Kind;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "kala",
    version,
    about = "Strict parsing and canonical rendering of ISO-8601-style dates, times, and datetimes."
)]
pub struct KalaArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse an input and print its canonical rendering.
    Parse {
        /// The text to parse.
        #[arg(required = true)]
        input: String,
        /// The start rule to parse against: date, time, or datetime.
        #[arg(long, default_value = "datetime")]
        kind: Kind,
        /// Emit the parsed fields and renderings as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Parse an input and print the equivalent UTC instant.
    Utc {
        /// The text to parse.
        #[arg(required = true)]
        input: String,
        /// The start rule to parse against: date, time, or datetime.
        #[arg(long, default_value = "datetime")]
        kind: Kind,
    },
}
