use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_sheet, OutputFormat};
use crate::core::options::ParseOptions;
use crate::sheet::design::ExperimentalDesign;

#[derive(Args)]
pub struct DesignArgs {
    /// Input sample sheet. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute design subcommand
///
/// # Errors
///
/// Returns an error if the input is invalid or has no samples.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: DesignArgs,
    options: ParseOptions,
    format: OutputFormat,
    _verbose: bool,
) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.input, options)?;
    let design = sheet.experimental_design()?;

    match format {
        OutputFormat::Text => print!("{design}"),
        OutputFormat::Json => print_json_design(&design)?,
        OutputFormat::Tsv => print_tsv_design(&design),
    }

    Ok(())
}

fn print_json_design(design: &ExperimentalDesign) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = design
        .rows
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = design
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| (column.clone(), serde_json::Value::String(value.clone())))
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_tsv_design(design: &ExperimentalDesign) {
    println!("{}", design.columns.join("\t"));
    for row in &design.rows {
        println!("{}", row.join("\t"));
    }
}
