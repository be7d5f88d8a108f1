mod cli;
mod error;
mod prompt;

use crate::cli::{Cli, Command, ScrapeArgs};
use crate::error::{ErrorKind, Result};
use crate::prompt::TerminalPrompter;
use clap::Parser;
use exn::ResultExt;
use sift_config::{Catalog, Config, build_reader};
use sift_engine::{MetadataRecord, Outcome, Record, Report, ScrapeOptions, Scraper, Warning};
use sift_source::SourceReader;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const EXIT_INCOMPLETE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let catalog = Catalog::load(&config.types, &config.scrapers).or_raise(|| ErrorKind::Config)?;
    match &cli.command {
        Command::Check => check(&config, &catalog),
        Command::List => list(&catalog),
        Command::Scrape(args) => scrape(&config, &catalog, args),
    }
}

/// Every scraper in the catalog, prepared, in name order. Invalid scrapers
/// are included so callers can report on them.
fn prepare_all(config: &Config, catalog: &Catalog) -> Result<Vec<Scraper>> {
    let reader: Arc<dyn SourceReader> = Arc::new(build_reader(config).or_raise(|| ErrorKind::Config)?);
    let scrapers = catalog
        .scrapers()
        .map(|definition| {
            let mut scraper = Scraper::new(definition.clone(), Arc::clone(&reader)).with_prompter(TerminalPrompter);
            if let Err(err) = scraper.prepare(catalog) {
                tracing::debug!(scraper = scraper.name(), "{err:?}");
            }
            scraper
        })
        .collect();
    Ok(scrapers)
}

fn check(config: &Config, catalog: &Catalog) -> Result<ExitCode> {
    let scrapers = prepare_all(config, catalog)?;
    let mut stdout = io::stdout().lock();
    let mut invalid = 0;
    for scraper in &scrapers {
        let status = if scraper.is_valid() { "ok" } else { "invalid" };
        invalid += usize::from(!scraper.is_valid());
        writeln!(stdout, "{status:<8}{} ({})", scraper.name(), scraper.target_type()).or_raise(|| ErrorKind::Output)?;
    }
    Ok(if invalid == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn list(catalog: &Catalog) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    for definition in catalog.scrapers() {
        writeln!(stdout, "{}\t{}\t{}", definition.name, definition.target_type, definition.file_name_pattern)
            .or_raise(|| ErrorKind::Output)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn scrape(config: &Config, catalog: &Catalog, args: &ScrapeArgs) -> Result<ExitCode> {
    let mut scrapers = prepare_all(config, catalog)?;
    if let Some(name) = &args.scraper {
        scrapers.retain(|scraper| scraper.name() == name.as_str());
        match scrapers.first() {
            None => exn::bail!(ErrorKind::UnknownScraper(name.clone())),
            Some(scraper) if !scraper.is_valid() => exn::bail!(ErrorKind::InvalidScraper(name.clone())),
            Some(_) => {},
        }
    }
    let defaults = ScrapeOptions {
        ask_user: args.ask_user || config.ask_user,
        import: args.import || config.import,
        inherit: false,
        parent: None,
    };
    let parent = match &args.parent {
        Some(location) => Some(first_match(&mut scrapers, location, &defaults)?.1),
        None => None,
    };
    let options = ScrapeOptions {
        inherit: config.inherit || parent.is_some(),
        parent: parent.as_ref().map(|record| record as &dyn MetadataRecord),
        ..defaults
    };

    let (name, record, report) = first_match(&mut scrapers, &args.location, &options)?;
    tracing::info!(scraper = name, outcome = %report.outcome, "scraped");
    let json = serde_json::to_string_pretty(&record).or_raise(|| ErrorKind::Output)?;
    writeln!(io::stdout().lock(), "{json}").or_raise(|| ErrorKind::Output)?;
    for warning in &report.warnings {
        eprintln!("{}: {warning}", warning_label(warning));
    }
    Ok(match report.outcome {
        Outcome::Complete => ExitCode::SUCCESS,
        Outcome::Incomplete => ExitCode::from(EXIT_INCOMPLETE),
        Outcome::Mismatch => ExitCode::FAILURE,
    })
}

/// Failed procedures are told apart from single rejected writes.
fn warning_label(warning: &Warning) -> &'static str {
    if warning.is_node_failure() { "failed" } else { "warning" }
}

/// Tries each valid scraper in turn until one recognises `location`.
fn first_match(scrapers: &mut [Scraper], location: &str, options: &ScrapeOptions<'_>) -> Result<(String, Record, Report)> {
    for scraper in scrapers.iter_mut().filter(|scraper| scraper.is_valid()) {
        let mut record = Record::new(location);
        let report = scraper.scrape(&mut record, options);
        scraper.deactivate();
        let Ok(report) = report else { continue };
        if report.is_match() {
            return Ok((scraper.name().to_string(), record, report));
        }
        tracing::debug!(scraper = scraper.name(), "no match, trying next scraper");
    }
    exn::bail!(ErrorKind::NoMatch(location.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_engine::ValueKind;

    #[test]
    fn test_warning_labels() {
        let failed = Warning::NoMatches {
            pattern: "Title: (.+)".to_string(),
            reference: "movie.nfo".to_string(),
        };
        let rejected = Warning::CoercionRejected {
            field: "year".to_string(),
            expected: ValueKind::Number,
            found: ValueKind::String,
        };
        assert_eq!(warning_label(&failed), "failed");
        assert_eq!(warning_label(&rejected), "warning");
    }
}
