//! DTW frame correspondences and their resolution to frame numbers.

use std::path::Path;

use crate::error::{DatatableError, Result};
use crate::types::{FeatureStream, Side, CORRESPONDENCE_WIDTH};

/// One DTW match: source frame `source` lines up with target frame `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePair {
    pub source: usize,
    pub target: usize,
}

/// Two-column frame matching as written by the DTW step.
///
/// Rows are kept verbatim, so duplicates and non-monotonic runs survive.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceTable {
    stream: FeatureStream,
}

impl CorrespondenceTable {
    pub fn new(stream: FeatureStream) -> Result<Self> {
        if stream.width() != CORRESPONDENCE_WIDTH {
            return Err(DatatableError::ShapeMismatch(format!(
                "correspondence table has {} columns, expected {CORRESPONDENCE_WIDTH}",
                stream.width()
            )));
        }
        Ok(Self { stream })
    }

    pub fn len(&self) -> usize {
        self.stream.frames()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Truncates every index to a frame number and checks it against both streams.
    pub fn resolve(&self, source_frames: usize, target_frames: usize) -> Result<Vec<FramePair>> {
        let path = self
            .stream
            .origin()
            .unwrap_or_else(|| Path::new("<memory>"));
        self.stream
            .values()
            .outer_iter()
            .enumerate()
            .map(|(row, pair)| -> Result<FramePair> {
                Ok(FramePair {
                    source: frame_index(path, row, pair[0], Side::Source, source_frames)?,
                    target: frame_index(path, row, pair[1], Side::Target, target_frames)?,
                })
            })
            .collect()
    }
}

/// Indices are stored as numeric text; the fractional part is dropped.
pub fn frame_index(
    path: &Path,
    row: usize,
    value: f64,
    side: Side,
    frames: usize,
) -> Result<usize> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated >= frames as f64 {
        return Err(DatatableError::Index {
            path: path.to_path_buf(),
            row,
            side: side.label(),
            index: value,
            frames,
        });
    }
    Ok(truncated as usize)
}
