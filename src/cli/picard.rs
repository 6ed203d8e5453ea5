use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sheet, OutputFormat};
use crate::core::options::ParseOptions;

#[derive(Args)]
pub struct PicardArgs {
    /// Input sample sheet. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory to write the parameter files to (created if missing)
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Directory prefix for the demultiplexed BAM paths
    #[arg(short, long)]
    pub bam_prefix: PathBuf,

    /// Lane to write parameters for; repeat for several lanes
    #[arg(short, long = "lane", required = true, num_args = 1..)]
    pub lanes: Vec<u32>,
}

/// Execute picard subcommand
///
/// # Errors
///
/// Returns an error if the input is invalid, does not meet the parameter file
/// requirements, or the files cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: PicardArgs,
    options: ParseOptions,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.input, options)?;
    let written = sheet.to_picard_basecalling_params(&args.directory, &args.bam_prefix, &args.lanes)?;

    if verbose {
        eprintln!("Wrote {} files for {} lanes", written.len(), args.lanes.len());
    }

    match format {
        OutputFormat::Json => {
            let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            for path in &written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
