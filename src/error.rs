//! Error taxonomy for datatable construction.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the library.
pub type Result<T> = std::result::Result<T, DatatableError>;

/// Every failure is a deterministic data problem; none are retried.
#[derive(Debug, Error)]
pub enum DatatableError {
    #[error("input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed line {line} in {}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error(
        "correspondence row {row} of {} maps {side} frame {index}, \
         but the {side} stream has {frames} frames",
        .path.display()
    )]
    Index {
        path: PathBuf,
        row: usize,
        side: &'static str,
        index: f64,
        frames: usize,
    },

    #[error("utterance row width {found} does not match table width {expected}")]
    TableShape { expected: usize, found: usize },

    #[error("identifier list {} contains no utterances", .path.display())]
    EmptyIdList { path: PathBuf },

    #[error("failed to start alignment workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("utterance '{id}': {source}")]
    Utterance {
        id: String,
        #[source]
        source: Box<DatatableError>,
    },
}

/// Coarse category of a [`DatatableError`], independent of utterance context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    Format,
    ShapeMismatch,
    Index,
    TableShape,
    EmptyIdList,
    WorkerPool,
}

impl DatatableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
            Self::Format { .. } => ErrorKind::Format,
            Self::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            Self::Index { .. } => ErrorKind::Index,
            Self::TableShape { .. } => ErrorKind::TableShape,
            Self::EmptyIdList { .. } => ErrorKind::EmptyIdList,
            Self::WorkerPool(_) => ErrorKind::WorkerPool,
            Self::Utterance { source, .. } => source.kind(),
        }
    }

    /// Identifier of the utterance that failed, when the error carries one.
    pub fn utterance(&self) -> Option<&str> {
        match self {
            Self::Utterance { id, .. } => Some(id),
            _ => None,
        }
    }

    pub(crate) fn in_utterance(self, id: &str) -> Self {
        match self {
            wrapped @ Self::Utterance { .. } => wrapped,
            other => Self::Utterance {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
