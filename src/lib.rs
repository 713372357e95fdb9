//! Builds supervised voice-conversion training tables from paired vocoder
//! parameter files and precomputed DTW frame matchings.

pub mod align;
pub mod cli;
pub mod config;
pub mod datatable;
pub mod error;
pub mod reader;
pub mod types;

pub use align::UtteranceAligner;
pub use config::{CorpusLayout, TableConfig};
pub use datatable::DatatableBuilder;
pub use error::{DatatableError, ErrorKind, Result};
pub use types::{Datatable, FeatureStream, Side, StreamKind, UtteranceSpan};
