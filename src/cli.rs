//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about = "Scrape media metadata with declarative regex rules", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON), layered over the defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Increase logging verbosity (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}
impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepare every scraper and report which are valid.
    Check,
    /// List scrapers with their media types.
    List,
    /// Scrape one item and print its record as JSON.
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Location (path) of the item.
    pub location: String,
    /// Only try this scraper instead of every scraper in name order.
    #[arg(long)]
    pub scraper: Option<String>,
    /// Import images instead of linking them.
    #[arg(long)]
    pub import: bool,
    /// Ask before choosing between ambiguous matches.
    #[arg(long)]
    pub ask_user: bool,
    /// Scrape this containing item first and inherit details from it.
    #[arg(long)]
    pub parent: Option<String>,
}
