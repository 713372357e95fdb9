//! Core types for the datatable pipeline

use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Mel-cepstral coefficients per frame in `mcp.dat` files.
pub const SPECTRAL_WIDTH: usize = 40;

/// Width of every pitch and voicing stream.
pub const SCALAR_WIDTH: usize = 1;

/// Width of a DTW correspondence file.
pub const CORRESPONDENCE_WIDTH: usize = 2;

/// Per-utterance feature files produced by the vocoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Spectral,
    Pitch,
    PitchInterpolated,
    Voicing,
    VoicingInterpolated,
}

impl StreamKind {
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Spectral,
        StreamKind::Pitch,
        StreamKind::PitchInterpolated,
        StreamKind::Voicing,
        StreamKind::VoicingInterpolated,
    ];

    /// File-name infix between the utterance id and `.dat`.
    pub fn suffix(self) -> &'static str {
        match self {
            StreamKind::Spectral => "mcp",
            StreamKind::Pitch => "lf0",
            StreamKind::PitchInterpolated => "lf0.i",
            StreamKind::Voicing => "vf",
            StreamKind::VoicingInterpolated => "vf.i",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Spectral => "spectral",
            StreamKind::Pitch => "pitch",
            StreamKind::PitchInterpolated => "interpolated pitch",
            StreamKind::Voicing => "voicing",
            StreamKind::VoicingInterpolated => "interpolated voicing",
        }
    }
}

/// Which speaker of a parallel pair a stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

/// Frame-major numeric table: one row per frame, fixed column count.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStream {
    values: Array2<f64>,
    origin: Option<PathBuf>,
}

impl FeatureStream {
    pub fn new(values: Array2<f64>) -> Self {
        Self {
            values,
            origin: None,
        }
    }

    /// Records the file the frames were read from, for error messages.
    pub fn with_origin(mut self, path: &Path) -> Self {
        self.origin = Some(path.to_path_buf());
        self
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Origin path for messages, or `<memory>` for derived streams.
    pub fn describe(&self) -> String {
        self.origin
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |path| path.display().to_string())
    }

    pub fn frames(&self) -> usize {
        self.values.nrows()
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, frame: usize) -> ArrayView1<'_, f64> {
        self.values.row(frame)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

/// Rows of the final table contributed by one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceSpan {
    pub id: String,
    pub start_row: usize,
    pub rows: usize,
}

/// Aligned source/target rows for every utterance, stacked in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Datatable {
    values: Array2<f64>,
    spans: Vec<UtteranceSpan>,
}

impl Datatable {
    pub(crate) fn new(values: Array2<f64>, spans: Vec<UtteranceSpan>) -> Self {
        Self { values, spans }
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn spans(&self) -> &[UtteranceSpan] {
        &self.spans
    }

    /// Finds the utterance a table row was produced from.
    pub fn span_of(&self, row: usize) -> Option<&UtteranceSpan> {
        self.spans
            .iter()
            .find(|span| row >= span.start_row && row < span.start_row + span.rows)
    }
}
