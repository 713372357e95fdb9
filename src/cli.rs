use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::{CorpusLayout, TableConfig};

/// vcdatatable - DTW-aligned training table builder
///
/// Reads paired source/target vocoder parameter files, realigns them with
/// precomputed DTW frame matchings, and stacks every utterance into one table.
#[derive(Parser, Debug)]
#[command(name = "vcdatatable")]
#[command(version)]
#[command(about = "Build a voice-conversion datatable from DTW-aligned vocoder frames", long_about = None)]
pub struct Cli {
    /// File listing utterance basenames, one per line
    #[arg(long, value_name = "PATH")]
    pub ids: PathBuf,

    /// Directory holding the source speaker's vocoder files
    #[arg(long, value_name = "DIR")]
    pub source: PathBuf,

    /// Directory holding the target speaker's vocoder files
    #[arg(long, value_name = "DIR")]
    pub target: PathBuf,

    /// Directory holding `{id}.frames.txt` DTW matchings
    #[arg(long, value_name = "DIR")]
    pub frames: PathBuf,

    /// Output path; `.gz` compresses. Writes to stdout when omitted
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSON file with table settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Spectral columns per frame, or `auto` to read them from each file
    #[arg(long, value_name = "N|auto", value_parser = parse_spectral_width)]
    pub spectral_width: Option<SpectralWidth>,

    /// Field delimiter for the written table
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Alignment worker threads
    #[arg(long, short, value_name = "N")]
    pub jobs: Option<usize>,

    /// Log per-utterance progress
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralWidth {
    Fixed(usize),
    Auto,
}

fn parse_spectral_width(raw: &str) -> std::result::Result<SpectralWidth, String> {
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(SpectralWidth::Auto);
    }
    raw.parse::<usize>()
        .map(SpectralWidth::Fixed)
        .map_err(|_| format!("expected a column count or 'auto', got '{raw}'"))
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if !self.ids.is_file() {
            bail!("Identifier list does not exist: {:?}", self.ids);
        }
        self.layout().validate()?;
        if let Some(output) = &self.output {
            if output.is_dir() {
                bail!("Output path is a directory: {:?}", output);
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> CorpusLayout {
        CorpusLayout::new(&self.source, &self.target, &self.frames)
    }

    /// Config file values with command-line overrides applied.
    pub fn table_config(&self) -> Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => TableConfig::from_file(path)?,
            None => TableConfig::default(),
        };
        match self.spectral_width {
            Some(SpectralWidth::Fixed(width)) => config.spectral_width = Some(width),
            Some(SpectralWidth::Auto) => config.spectral_width = None,
            None => {}
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config.validate()?;
        Ok(config)
    }
}
