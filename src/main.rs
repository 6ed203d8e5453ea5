use clap::Parser;
use tracing_subscriber::EnvFilter;

use sample_sheet::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("sample_sheet=debug,info")
    } else {
        EnvFilter::new("sample_sheet=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let options = cli.parse_options();

    match cli.command {
        cli::Commands::Validate(args) => {
            cli::validate::run(args, options, cli.format, cli.verbose)?;
        }
        cli::Commands::Json(args) => {
            cli::json::run(args, options, cli.format, cli.verbose)?;
        }
        cli::Commands::Write(args) => {
            cli::write::run(args, options, cli.format, cli.verbose)?;
        }
        cli::Commands::Design(args) => {
            cli::design::run(args, options, cli.format, cli.verbose)?;
        }
        cli::Commands::Picard(args) => {
            cli::picard::run(args, options, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
