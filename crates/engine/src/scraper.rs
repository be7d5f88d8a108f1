//! A prepared scraper: a definition bound to a reader, ready to scrape items.

use crate::cache::SourceCache;
use crate::context::MatchContext;
use crate::definition::ScraperDefinition;
use crate::error::{ErrorKind, Result};
use crate::executor::Executor;
use crate::prompt::{PromptRequest, Prompter};
use crate::record::{Details, MetadataRecord};
use crate::report::Report;
use crate::setter::Inheritance;
use exn::OptionExt;
use regex::Regex;
use sift_source::SourceReader;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::instrument;

/// Looks up the declared defaults of a media type.
pub trait TypeRegistry {
    fn defaults(&self, type_name: &str) -> Option<&Details>;
}
impl<S: BuildHasher> TypeRegistry for HashMap<String, Details, S> {
    fn defaults(&self, type_name: &str) -> Option<&Details> {
        self.get(type_name)
    }
}
impl TypeRegistry for BTreeMap<String, Details> {
    fn defaults(&self, type_name: &str) -> Option<&Details> {
        self.get(type_name)
    }
}

/// Caller policy for a single scrape.
#[derive(Clone, Copy, Default)]
pub struct ScrapeOptions<'a> {
    /// Consult the prompter for `askUser` procedures and for ambiguous
    /// file-name matches.
    pub ask_user: bool,
    /// Import images rather than linking them.
    pub import: bool,
    /// Copy inherited details from `parent`.
    pub inherit: bool,
    /// The record of the containing item, if any.
    pub parent: Option<&'a dyn MetadataRecord>,
}

enum State {
    Unprepared,
    Invalid,
    Ready { file_name: Regex, defaults: Details },
}

/// A [`ScraperDefinition`] together with the reader it pulls sources from
/// and the cache of what it has read for the current item.
///
/// A scraper must be [prepared](Self::prepare) before use. Preparation is
/// done once; a definition that fails it stays invalid and every later
/// scrape call fails without touching the record.
pub struct Scraper {
    definition: ScraperDefinition,
    reader: Box<dyn SourceReader>,
    prompter: Option<Box<dyn Prompter>>,
    state: State,
    cache: SourceCache,
}
impl Scraper {
    pub fn new(definition: ScraperDefinition, reader: impl SourceReader + 'static) -> Self {
        Self {
            definition,
            reader: Box::new(reader),
            prompter: None,
            state: State::Unprepared,
            cache: SourceCache::default(),
        }
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Some(Box::new(prompter));
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn target_type(&self) -> &str {
        &self.definition.target_type
    }

    pub fn definition(&self) -> &ScraperDefinition {
        &self.definition
    }

    /// Whether [`prepare`](Self::prepare) has succeeded.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// Validates the definition and looks up the target type's defaults.
    ///
    /// The outcome is remembered: calling this again on a prepared scraper
    /// is a no-op, and on a scraper that failed it is an error.
    #[instrument(skip_all, fields(scraper = %self.definition.name))]
    pub fn prepare(&mut self, types: &dyn TypeRegistry) -> Result<()> {
        match self.state {
            State::Ready { .. } => return Ok(()),
            State::Invalid => exn::bail!(self.refusal()),
            State::Unprepared => {},
        }
        let prepared = self.definition.validate().and_then(|file_name| {
            let defaults = types
                .defaults(&self.definition.target_type)
                .ok_or_raise(|| ErrorKind::UnknownType(self.definition.target_type.clone()))?;
            Ok(State::Ready {
                file_name,
                defaults: defaults.clone(),
            })
        });
        match prepared {
            Ok(state) => {
                tracing::debug!("scraper prepared");
                self.state = state;
                Ok(())
            },
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(reason, "scraper definition rejected");
                self.state = State::Invalid;
                Err(err)
            },
        }
    }

    /// Scrapes a single item into `record`.
    ///
    /// The record is reset to the type's defaults first. An item whose
    /// location does not match the file-name pattern yields a
    /// [`Mismatch`](crate::Outcome::Mismatch) report, not an error; errors
    /// are reserved for scrapers that aren't ready.
    #[instrument(skip_all, fields(scraper = %self.definition.name, location = record.location()))]
    pub fn scrape(&mut self, record: &mut dyn MetadataRecord, options: &ScrapeOptions<'_>) -> Result<Report> {
        let (file_name, defaults) = self.ready()?;
        record.reset(defaults);
        let location = record.location().to_string();
        let seeds = self.seeds(file_name, &location);
        let Some(seed) = self.choose_seed(seeds, &location, options) else {
            tracing::debug!("location does not match");
            return Ok(Report::mismatch());
        };
        Ok(self.execute(&seed, record, options))
    }

    /// Scrapes every item a location holds, creating each record through
    /// `factory`.
    ///
    /// Only definitions with `multipleItemsPerFile` produce more than one
    /// item. Each item gets its own seed and a fresh source cache. A
    /// location that does not match yields no items.
    #[instrument(skip_all, fields(scraper = %self.definition.name, location = %location))]
    pub fn scrape_each<R, F>(&mut self, location: &str, mut factory: F, options: &ScrapeOptions<'_>) -> Result<Vec<(R, Report)>>
    where
        R: MetadataRecord,
        F: FnMut(&MatchContext) -> R,
    {
        let (file_name, defaults) = self.ready()?;
        let defaults = defaults.clone();
        let seeds = self.seeds(file_name, location);
        tracing::debug!(items = seeds.len(), "scraping items");
        let mut scraped = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let mut record = factory(&seed);
            record.reset(&defaults);
            let report = self.execute(&seed, &mut record, options);
            scraped.push((record, report));
        }
        Ok(scraped)
    }

    /// Releases the source cache. The scraper stays prepared and can scrape
    /// again.
    pub fn deactivate(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!(scraper = %self.definition.name, sources = self.cache.len(), "releasing source cache");
        }
        self.cache.clear();
    }

    /// Sources currently held for the last scraped item.
    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }

    fn ready(&self) -> Result<(&Regex, &Details)> {
        match &self.state {
            State::Ready { file_name, defaults } => Ok((file_name, defaults)),
            State::Unprepared => exn::bail!(ErrorKind::InvalidDefinition(format!(
                "scraper {:?} has not been prepared",
                self.definition.name
            ))),
            State::Invalid => exn::bail!(self.refusal()),
        }
    }

    fn refusal(&self) -> ErrorKind {
        ErrorKind::InvalidDefinition(format!("scraper {:?} failed validation", self.definition.name))
    }

    fn seeds(&self, file_name: &Regex, location: &str) -> Vec<MatchContext> {
        if self.definition.multiple_items_per_file {
            MatchContext::all(file_name, location)
        } else {
            MatchContext::first(file_name, location).into_iter().collect()
        }
    }

    /// The first seed, unless prompting is on and the operator picks another.
    fn choose_seed(&self, mut seeds: Vec<MatchContext>, location: &str, options: &ScrapeOptions<'_>) -> Option<MatchContext> {
        if seeds.len() > 1
            && options.ask_user
            && let Some(prompter) = &self.prompter
        {
            let request = PromptRequest {
                scraper: &self.definition.name,
                source: location,
                pattern: &self.definition.file_name_pattern,
                candidates: &seeds,
                repeat: false,
            };
            if let Some(chosen) = prompter.choose(&request) {
                return chosen.into_iter().next();
            }
        }
        if seeds.is_empty() { None } else { Some(seeds.swap_remove(0)) }
    }

    fn execute(&mut self, seed: &MatchContext, record: &mut dyn MetadataRecord, options: &ScrapeOptions<'_>) -> Report {
        self.cache.clear();
        let inheritance = match options.parent {
            Some(parent) if options.inherit && !self.definition.inherited_metadata.is_empty() => Some(Inheritance {
                keys: &self.definition.inherited_metadata,
                parent,
            }),
            _ => None,
        };
        let mut executor = Executor {
            scraper: &self.definition.name,
            reader: self.reader.as_ref(),
            cache: &mut self.cache,
            prompter: self.prompter.as_deref().filter(|_| options.ask_user),
            import: options.import,
            inheritance,
            warnings: Vec::new(),
        };
        let complete = executor.run(&self.definition.procedures, seed, record);
        let warnings = executor.warnings;
        if !complete {
            tracing::warn!(warnings = warnings.len(), "scrape incomplete");
        }
        Report::new(complete, warnings)
    }
}
