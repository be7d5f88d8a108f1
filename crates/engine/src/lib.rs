//! Declarative metadata scraping.
//!
//! A [`ScraperDefinition`] describes how to find information about a media
//! item: a file-name pattern that recognises the item, and a tree of
//! [`ProcedureNode`]s that each search a source with a regular expression
//! and write the captured groups into a [`MetadataRecord`]. Wrap a
//! definition in a [`Scraper`], [prepare](Scraper::prepare) it, and call
//! [`Scraper::scrape`] for each item.
//!
//! ```
//! use sift_engine::{Details, ProcedureNode, Record, ScrapeOptions, Scraper, ScraperDefinition};
//! use sift_source::MockReader;
//! use std::collections::BTreeMap;
//!
//! let definition = ScraperDefinition::new("nfo", "movie", r"(.*)\.mkv$")
//!     .procedure(ProcedureNode::new("$0.nfo", "Title: (.+)").set("name", "$1"));
//! let reader = MockReader::with_files([("movie.mkv.nfo", "Title: Inception")]);
//! let types = BTreeMap::from([("movie".to_string(), Details::new())]);
//!
//! let mut scraper = Scraper::new(definition, reader);
//! scraper.prepare(&types)?;
//! let mut record = Record::new("movie.mkv");
//! let report = scraper.scrape(&mut record, &ScrapeOptions::default())?;
//! assert!(report.is_complete());
//! assert_eq!(record.name.as_deref(), Some("Inception"));
//! # Ok::<(), sift_engine::error::Error>(())
//! ```

pub mod backref;
mod cache;
mod context;
mod definition;
pub mod error;
mod executor;
mod procedure;
mod prompt;
mod record;
mod report;
mod scraper;
mod setter;
mod value;

pub use crate::backref::{Expansion, expand};
pub use crate::cache::SourceCache;
pub use crate::context::MatchContext;
pub use crate::definition::ScraperDefinition;
pub use crate::procedure::{Assignment, Field, ProcedureNode};
pub use crate::prompt::{PromptRequest, Prompter};
pub use crate::record::{Details, Image, MetadataRecord, Record};
pub use crate::report::{Outcome, Report, Warning};
pub use crate::scraper::{ScrapeOptions, Scraper, TypeRegistry};
pub use crate::value::{Rejection, Value, ValueKind};
