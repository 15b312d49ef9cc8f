use clap::Parser;
use tracing_subscriber::EnvFilter;

use duv_resolver::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("duv_resolver=debug,info")
    } else {
        EnvFilter::new("duv_resolver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Import(args) => cli::import::run(args, &cli.db_path)?,
        Commands::Match(args) => cli::match_cmd::run(args, &cli.db_path)?,
        Commands::Review(args) => cli::review::run(args, &cli.db_path)?,
        Commands::List(args) => cli::list::run(args, &cli.db_path)?,
    }

    Ok(())
}
