use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use serde::Deserialize;

use crate::types::{Side, StreamKind, SCALAR_WIDTH, SPECTRAL_WIDTH};

/// Settings that shape the table, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Columns per spectral frame; `None` reads the width from each file.
    #[serde(alias = "mcp_width")]
    pub spectral_width: Option<usize>,
    /// Field separator used when the table is written out.
    pub delimiter: char,
    /// Worker threads for alignment; 1 keeps everything on the calling thread.
    #[serde(alias = "workers")]
    pub jobs: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            spectral_width: Some(SPECTRAL_WIDTH),
            delimiter: ',',
            jobs: 1,
        }
    }
}

impl TableConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        Self::from_json(&data).with_context(|| format!("invalid config file {:?}", path))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("failed to parse config JSON")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.spectral_width != Some(0),
            "spectral_width must be positive"
        );
        ensure!(self.jobs > 0, "jobs must be at least 1");
        ensure!(
            !self.delimiter.is_ascii_digit() && !matches!(self.delimiter, '.' | '-' | '+' | '\n'),
            "delimiter {:?} would be ambiguous with numeric values",
            self.delimiter
        );
        Ok(())
    }

    /// Width of one side's fused vector, when the spectral width is fixed.
    pub fn fused_width(&self) -> Option<usize> {
        self.spectral_width.map(|spectral| spectral + 3 * SCALAR_WIDTH)
    }

    /// Width of an aligned source/target row, when the spectral width is fixed.
    pub fn table_width(&self) -> Option<usize> {
        self.fused_width().map(|fused| 2 * fused)
    }
}

/// Directory layout of a parallel corpus and its DTW frame matchings.
#[derive(Debug, Clone)]
pub struct CorpusLayout {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub dtw_dir: PathBuf,
}

impl CorpusLayout {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        dtw_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            dtw_dir: dtw_dir.into(),
        }
    }

    pub fn side_dir(&self, side: Side) -> &Path {
        match side {
            Side::Source => &self.source_dir,
            Side::Target => &self.target_dir,
        }
    }

    /// `{dir}/{id}.{suffix}.dat`
    pub fn feature_path(&self, side: Side, id: &str, kind: StreamKind) -> PathBuf {
        self.side_dir(side).join(format!("{id}.{}.dat", kind.suffix()))
    }

    /// `{dtw_dir}/{id}.frames.txt`
    pub fn frames_path(&self, id: &str) -> PathBuf {
        self.dtw_dir.join(format!("{id}.frames.txt"))
    }

    pub fn validate(&self) -> Result<()> {
        for (label, dir) in [
            ("source", &self.source_dir),
            ("target", &self.target_dir),
            ("DTW", &self.dtw_dir),
        ] {
            if !dir.is_dir() {
                return Err(anyhow!("{label} directory {:?} does not exist", dir));
            }
        }
        Ok(())
    }
}
