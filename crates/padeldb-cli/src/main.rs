use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "padeldb-cli")]
#[command(about = "Offline price resolution for padel racket catalog dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a JSON array of raw rackets into the unified catalog shape
    Normalize(InputArgs),
    /// Print only the resolved best price of each racket
    BestPrice(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON file holding an array of raw rackets (`-` reads stdin)
    path: PathBuf,

    /// Comma-separated retail sources, in tie-break order
    #[arg(long, env = "PADELDB_RETAIL_SOURCES")]
    sources: Option<String>,

    /// Timestamp (RFC 3339) stamped on rackets without a scrape time
    #[arg(long)]
    now: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Normalize(args) => commands::run_normalize(&args.options()?)?,
        Commands::BestPrice(args) => commands::run_best_price(&args.options()?)?,
    };
    println!("{output}");

    Ok(())
}

impl InputArgs {
    fn options(&self) -> anyhow::Result<commands::RunOptions> {
        commands::RunOptions::new(
            self.path.clone(),
            self.sources.as_deref(),
            self.now.as_deref(),
            self.pretty,
        )
    }
}

#[cfg(test)]
mod tests;
