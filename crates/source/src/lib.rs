pub mod compression;
pub mod error;
pub mod reader;
mod reference;

#[cfg(feature = "http")]
pub use crate::reader::HttpReader;
#[cfg(feature = "mock")]
pub use crate::reader::MockReader;
pub use crate::reader::{DispatchReader, LocalReader, SourceReader};
pub use crate::reference::{Reference, is_remote};
