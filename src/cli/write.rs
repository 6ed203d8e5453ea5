use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{read_sheet, OutputFormat};
use crate::core::options::ParseOptions;

#[derive(Args)]
pub struct WriteArgs {
    /// Input sample sheet. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of blank rows written after each section
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub blank_lines: u64,
}

/// Execute write subcommand
///
/// # Errors
///
/// Returns an error if the input is invalid or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: WriteArgs,
    options: ParseOptions,
    _format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.input, options)?;
    let blank_lines = usize::try_from(args.blank_lines)?;

    if verbose {
        eprintln!("Parsed {} samples", sheet.len());
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        sheet.write(&mut writer, blank_lines)?;
        writer.flush()?;
        info!(path = %path.display(), samples = sheet.len(), "Wrote sample sheet");
    } else {
        let stdout = io::stdout();
        sheet.write(stdout.lock(), blank_lines)?;
    }

    Ok(())
}
