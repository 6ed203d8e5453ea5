//! Command-line interface for sample-sheet.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **validate**: Parse a sample sheet and report its design
//! - **json**: Print the sheet as JSON
//! - **write**: Re-emit the sheet as canonical, padded text
//! - **design**: Print the experimental design table
//! - **picard**: Write Picard basecalling parameter files
//!
//! ## Usage
//!
//! ```text
//! # Validate a sample sheet
//! sample-sheet validate SampleSheet.csv
//!
//! # Read from stdin and print compact JSON
//! cat SampleSheet.csv | sample-sheet json - --compact
//!
//! # Canonicalize with two blank lines between sections
//! sample-sheet write SampleSheet.csv --output Canonical.csv --blank-lines 2
//!
//! # Picard parameters for lanes 1 to 4
//! sample-sheet picard SampleSheet.csv --directory params --bam-prefix bams --lane 1 --lane 2 --lane 3 --lane 4
//! ```

use std::io;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::core::options::{IndexValidation, ParseOptions};
use crate::sheet::SampleSheet;

pub mod design;
pub mod json;
pub mod picard;
pub mod validate;
pub mod write;

#[derive(Parser)]
#[command(name = "sample-sheet")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Read, validate, and write Illumina sample sheets")]
#[command(
    long_about = "sample-sheet parses Illumina sample sheets and checks that their samples are consistent.\n\nIt validates:\n- Index sequences and read structures\n- Agreement between samples and the [Reads] section\n- Unique sample identities and index combinations per lane"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Truncate mismatched data rows and warn on duplicate samples instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Accept index kit well names (e.g. SI-GA-H1) as index values
    #[arg(long, global = true)]
    pub allow_kit_names: bool,
}

impl Cli {
    /// Parse options selected by the global flags.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        let options = if self.lenient {
            ParseOptions::lenient()
        } else {
            ParseOptions::default()
        };
        if self.allow_kit_names {
            options.with_index_validation(IndexValidation::AllowKitNames)
        } else {
            options
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate a sample sheet
    Validate(validate::ValidateArgs),

    /// Print a sample sheet as JSON
    Json(json::JsonArgs),

    /// Write a sample sheet in canonical form
    Write(write::WriteArgs),

    /// Print the experimental design of a sample sheet
    Design(design::DesignArgs),

    /// Write Picard basecalling parameter files
    Picard(picard::PicardArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Parse a sample sheet from a path, or from stdin when the path is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a valid sample sheet.
pub fn read_sheet(input: &Path, options: ParseOptions) -> anyhow::Result<SampleSheet> {
    if input.as_os_str() == "-" {
        SampleSheet::from_reader(io::stdin().lock(), options)
            .context("Failed to parse sample sheet from stdin")
    } else {
        SampleSheet::from_path_with_options(input, options)
            .with_context(|| format!("Failed to parse sample sheet: {}", input.display()))
    }
}
