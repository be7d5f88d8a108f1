//! Settings and definition catalogs for sift.

mod catalog;
pub mod document;
pub mod error;
mod reader;
mod settings;

pub use crate::catalog::{Catalog, MediaType};
pub use crate::reader::build_reader;
pub use crate::settings::{Config, HttpConfig};
