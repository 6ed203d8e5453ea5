use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sheet, OutputFormat};
use crate::core::options::ParseOptions;
use crate::sheet::SampleSheet;

#[derive(Args)]
pub struct ValidateArgs {
    /// Input sample sheet. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or fails validation.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ValidateArgs,
    options: ParseOptions,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.input, options)?;

    if verbose {
        eprintln!(
            "Parsed {} samples across {} custom sections",
            sheet.len(),
            sheet.section_names().count()
        );
    }

    match format {
        OutputFormat::Text => print_text_summary(&args, &sheet),
        OutputFormat::Json => print_json_summary(&args, &sheet)?,
        OutputFormat::Tsv => print_tsv_summary(&sheet),
    }

    Ok(())
}

fn index_design(sheet: &SampleSheet) -> &'static str {
    match (sheet.samples_have_index(), sheet.samples_have_index2()) {
        (Some(true), Some(true)) => "dual",
        (Some(true), Some(false)) | (Some(false), Some(true)) => "single",
        (Some(false), Some(false)) => "none",
        _ => "unknown",
    }
}

fn pairing(sheet: &SampleSheet) -> &'static str {
    match (sheet.is_single_end(), sheet.is_paired_end()) {
        (Some(true), _) => "single-end",
        (_, Some(true)) => "paired-end",
        (Some(false), Some(false)) => "other",
        _ => "unknown",
    }
}

fn print_text_summary(args: &ValidateArgs, sheet: &SampleSheet) {
    println!("Sample sheet is valid: {}", args.input.display());
    println!("{}", "=".repeat(60));
    println!("  Samples: {}", sheet.len());
    println!("  Reads: {:?} ({})", sheet.reads(), pairing(sheet));
    println!(
        "  Read structure: {}",
        sheet.read_structure().map_or_else(|| "none".to_string(), ToString::to_string)
    );
    println!("  Index design: {}", index_design(sheet));

    let sections: Vec<&str> = sheet.section_names().collect();
    if !sections.is_empty() {
        println!("  Custom sections: {}", sections.join(", "));
    }
}

fn print_json_summary(args: &ValidateArgs, sheet: &SampleSheet) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "path": args.input.display().to_string(),
        "valid": true,
        "samples": sheet.len(),
        "reads": sheet.reads(),
        "pairing": pairing(sheet),
        "read_structure": sheet.read_structure().map(ToString::to_string),
        "index_design": index_design(sheet),
        "custom_sections": sheet.section_names().collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(sheet: &SampleSheet) {
    println!("samples\treads\tread_structure\tindex_design");
    println!(
        "{}\t{}\t{}\t{}",
        sheet.len(),
        sheet
            .reads()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        sheet.read_structure().map_or("", |rs| rs.as_str()),
        index_design(sheet),
    );
}
