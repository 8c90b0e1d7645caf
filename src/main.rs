use clap::Parser;
use tracing_subscriber::EnvFilter;

use seqrun_meta::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("seqrun_meta=debug,info")
    } else {
        EnvFilter::new("seqrun_meta=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::RunParameters(args) => {
            cli::run_parameters::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::SampleSheet(args) => {
            cli::sample_sheet::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
