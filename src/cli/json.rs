use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sheet, OutputFormat};
use crate::core::options::ParseOptions;

#[derive(Args)]
pub struct JsonArgs {
    /// Input sample sheet. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print on a single line instead of pretty-printing
    #[arg(long)]
    pub compact: bool,
}

/// Execute json subcommand. The output is JSON whatever `--format` says.
///
/// # Errors
///
/// Returns an error if the input cannot be read or fails validation.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: JsonArgs,
    options: ParseOptions,
    _format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.input, options)?;

    if verbose {
        eprintln!("Parsed {} samples", sheet.len());
    }

    let value = sheet.to_json();
    if args.compact {
        println!("{}", serde_json::to_string(&value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}
