//! Voiced/unvoiced decision from the raw voicing stream.

use crate::error::{DatatableError, Result};
use crate::types::{FeatureStream, Side};

/// Unvoiced frames carry a raw voicing value of exactly zero; no tolerance is applied.
pub fn is_unvoiced(value: f64) -> bool {
    value == 0.0
}

/// 1 for voiced frames, 0 for unvoiced ones: one minus the unvoiced indicator.
pub fn voiced_flag(value: f64) -> f64 {
    1.0 - indicator(is_unvoiced(value))
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Derives the voiced-flag stream from the raw voicing stream.
///
/// The raw pitch stream only takes part as a shape check: both raw streams
/// come out of the same analysis pass and must cover the same frames.
pub fn derive_voiced_flags(
    side: Side,
    pitch: &FeatureStream,
    voicing: &FeatureStream,
) -> Result<FeatureStream> {
    if pitch.frames() != voicing.frames() || pitch.width() != voicing.width() {
        return Err(DatatableError::ShapeMismatch(format!(
            "{} raw voicing stream {} is {}x{} but raw pitch stream {} is {}x{}",
            side.label(),
            voicing.describe(),
            voicing.frames(),
            voicing.width(),
            pitch.describe(),
            pitch.frames(),
            pitch.width()
        )));
    }
    Ok(FeatureStream::new(voicing.values().mapv(voiced_flag)))
}
