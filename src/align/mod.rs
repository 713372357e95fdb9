//! Per-utterance fusion of vocoder streams and DTW frame realignment.

pub mod correspondence;
pub mod voicing;

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use tracing::debug;

use crate::config::{CorpusLayout, TableConfig};
use crate::error::{DatatableError, Result};
use crate::reader::{parse_file, parse_file_inferred};
use crate::types::{FeatureStream, Side, StreamKind, CORRESPONDENCE_WIDTH, SCALAR_WIDTH};

pub use correspondence::{CorrespondenceTable, FramePair};
pub use voicing::{derive_voiced_flags, is_unvoiced, voiced_flag};

/// All vocoder streams of one side of one utterance.
#[derive(Debug, Clone)]
pub struct SideStreams {
    pub side: Side,
    pub spectral: FeatureStream,
    pub pitch: FeatureStream,
    pub pitch_interpolated: FeatureStream,
    pub voicing: FeatureStream,
    pub voicing_interpolated: FeatureStream,
}

impl SideStreams {
    pub fn load(
        layout: &CorpusLayout,
        side: Side,
        id: &str,
        spectral_width: Option<usize>,
    ) -> Result<Self> {
        let spectral_path = layout.feature_path(side, id, StreamKind::Spectral);
        let spectral = match spectral_width {
            Some(width) => parse_file(width, &spectral_path)?,
            None => parse_file_inferred(&spectral_path)?,
        };
        let scalar =
            |kind: StreamKind| parse_file(SCALAR_WIDTH, &layout.feature_path(side, id, kind));
        Ok(Self {
            side,
            spectral,
            pitch: scalar(StreamKind::Pitch)?,
            pitch_interpolated: scalar(StreamKind::PitchInterpolated)?,
            voicing: scalar(StreamKind::Voicing)?,
            voicing_interpolated: scalar(StreamKind::VoicingInterpolated)?,
        })
    }

    /// Concatenates `[spectral, interpolated pitch, interpolated voicing, voiced flag]`.
    pub fn fuse(&self) -> Result<FeatureStream> {
        let voiced = derive_voiced_flags(self.side, &self.pitch, &self.voicing)?;
        fuse_streams(
            self.side,
            &[
                (StreamKind::Spectral.label(), &self.spectral),
                (StreamKind::PitchInterpolated.label(), &self.pitch_interpolated),
                (StreamKind::VoicingInterpolated.label(), &self.voicing_interpolated),
                ("voiced flag", &voiced),
            ],
        )
    }
}

/// Horizontally stacks streams that cover the same frames.
pub fn fuse_streams(side: Side, parts: &[(&str, &FeatureStream)]) -> Result<FeatureStream> {
    let Some((first_label, first)) = parts.first() else {
        return Err(DatatableError::ShapeMismatch(format!(
            "no {} streams to fuse",
            side.label()
        )));
    };
    if let Some((label, stream)) = parts
        .iter()
        .find(|(_, stream)| stream.frames() != first.frames())
    {
        return Err(DatatableError::ShapeMismatch(format!(
            "{} {label} stream has {} frames but {first_label} stream has {}",
            side.label(),
            stream.frames(),
            first.frames()
        )));
    }
    let views: Vec<ArrayView2<'_, f64>> = parts.iter().map(|(_, stream)| stream.view()).collect();
    let fused = concatenate(Axis(1), &views)
        .map_err(|err| DatatableError::ShapeMismatch(format!("{}: {err}", side.label())))?;
    Ok(FeatureStream::new(fused))
}

/// Emits `source[i] ++ target[j]` for every correspondence row `(i, j)`, in row order.
pub fn align_frames(
    correspondence: &CorrespondenceTable,
    source: &FeatureStream,
    target: &FeatureStream,
) -> Result<FeatureStream> {
    if source.width() != target.width() {
        return Err(DatatableError::ShapeMismatch(format!(
            "source fused width {} differs from target fused width {}",
            source.width(),
            target.width()
        )));
    }
    let pairs = correspondence.resolve(source.frames(), target.frames())?;
    let split = source.width();
    let mut aligned = Array2::zeros((pairs.len(), split + target.width()));
    for (mut row, pair) in aligned.outer_iter_mut().zip(&pairs) {
        row.slice_mut(s![..split]).assign(&source.row(pair.source));
        row.slice_mut(s![split..]).assign(&target.row(pair.target));
    }
    Ok(FeatureStream::new(aligned))
}

/// Stateless per-utterance aligner; safe to share across worker threads.
#[derive(Debug, Clone)]
pub struct UtteranceAligner {
    layout: CorpusLayout,
    spectral_width: Option<usize>,
}

impl UtteranceAligner {
    pub fn new(layout: CorpusLayout, config: &TableConfig) -> Self {
        Self {
            layout,
            spectral_width: config.spectral_width,
        }
    }

    /// Aligned rows for one utterance; errors carry the utterance id.
    pub fn align(&self, id: &str) -> Result<FeatureStream> {
        self.align_utterance(id)
            .map_err(|err| err.in_utterance(id))
    }

    fn align_utterance(&self, id: &str) -> Result<FeatureStream> {
        let source = SideStreams::load(&self.layout, Side::Source, id, self.spectral_width)?;
        let target = SideStreams::load(&self.layout, Side::Target, id, self.spectral_width)?;
        let source_fused = source.fuse()?;
        let target_fused = target.fuse()?;

        let frames_path = self.layout.frames_path(id);
        let correspondence =
            CorrespondenceTable::new(parse_file(CORRESPONDENCE_WIDTH, &frames_path)?)?;

        let aligned = align_frames(&correspondence, &source_fused, &target_fused)?;
        debug!(
            utterance = id,
            source_frames = source_fused.frames(),
            target_frames = target_fused.frames(),
            dtw_rows = correspondence.len(),
            width = aligned.width(),
            "aligned utterance"
        );
        Ok(aligned)
    }
}
