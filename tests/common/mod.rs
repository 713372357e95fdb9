#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use vcdatatable::CorpusLayout;

/// Vocoder streams for one side of one utterance.
#[derive(Debug, Clone)]
pub struct SideFrames {
    pub spectral: Vec<Vec<f64>>,
    pub lf0: Vec<f64>,
    pub lf0_i: Vec<f64>,
    pub vf: Vec<f64>,
    pub vf_i: Vec<f64>,
}

impl SideFrames {
    /// Recognisable values: spectral[t][k] = base + 100t + k, every third frame unvoiced.
    pub fn synthetic(frames: usize, spectral_width: usize, base: f64) -> Self {
        let spectral = (0..frames)
            .map(|t| {
                (0..spectral_width)
                    .map(|k| base + 100.0 * t as f64 + k as f64)
                    .collect()
            })
            .collect();
        let vf: Vec<f64> = (0..frames)
            .map(|t| if t % 3 == 1 { 0.0 } else { 0.25 + t as f64 / 10.0 })
            .collect();
        let lf0: Vec<f64> = vf
            .iter()
            .enumerate()
            .map(|(t, v)| if *v == 0.0 { -1e10 } else { 4.5 + t as f64 / 100.0 })
            .collect();
        Self {
            spectral,
            lf0_i: (0..frames).map(|t| 4.5 + t as f64 / 100.0).collect(),
            vf_i: vf.iter().map(|v| v + 0.05).collect(),
            lf0,
            vf,
        }
    }

    /// Expected fused vector: spectral, lf0.i, vf.i, voiced flag.
    pub fn fused(&self, frame: usize) -> Vec<f64> {
        let mut row = self.spectral[frame].clone();
        row.push(self.lf0_i[frame]);
        row.push(self.vf_i[frame]);
        row.push(if self.vf[frame] == 0.0 { 0.0 } else { 1.0 });
        row
    }
}

pub struct Corpus {
    root: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let root = tempdir().expect("temp dir");
        for dir in ["source", "target", "frames"] {
            fs::create_dir_all(root.path().join(dir)).expect("corpus dir");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.root().join("target")
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.root().join("frames")
    }

    pub fn layout(&self) -> CorpusLayout {
        CorpusLayout::new(self.source_dir(), self.target_dir(), self.frames_dir())
    }

    pub fn write_side(&self, dir: &Path, id: &str, side: &SideFrames) {
        write_rows(&dir.join(format!("{id}.mcp.dat")), &side.spectral);
        write_column(&dir.join(format!("{id}.lf0.dat")), &side.lf0);
        write_column(&dir.join(format!("{id}.lf0.i.dat")), &side.lf0_i);
        write_column(&dir.join(format!("{id}.vf.dat")), &side.vf);
        write_column(&dir.join(format!("{id}.vf.i.dat")), &side.vf_i);
    }

    pub fn write_pairs(&self, id: &str, pairs: &[(f64, f64)]) {
        let rows: Vec<Vec<f64>> = pairs.iter().map(|(i, j)| vec![*i, *j]).collect();
        write_rows(&self.frames_dir().join(format!("{id}.frames.txt")), &rows);
    }

    /// Writes a complete utterance with 40-wide spectra and returns both sides.
    pub fn add_utterance(
        &self,
        id: &str,
        source_frames: usize,
        target_frames: usize,
        pairs: &[(f64, f64)],
    ) -> (SideFrames, SideFrames) {
        self.add_utterance_with_width(id, 40, source_frames, target_frames, pairs)
    }

    pub fn add_utterance_with_width(
        &self,
        id: &str,
        spectral_width: usize,
        source_frames: usize,
        target_frames: usize,
        pairs: &[(f64, f64)],
    ) -> (SideFrames, SideFrames) {
        let source = SideFrames::synthetic(source_frames, spectral_width, 0.0);
        let target = SideFrames::synthetic(target_frames, spectral_width, 10_000.0);
        self.write_side(&self.source_dir(), id, &source);
        self.write_side(&self.target_dir(), id, &target);
        self.write_pairs(id, pairs);
        (source, target)
    }

    pub fn write_ids(&self, ids: &[&str]) -> PathBuf {
        let path = self.root().join("basenames.list");
        let mut text = ids.join("\n");
        text.push('\n');
        fs::write(&path, text).expect("write id list");
        path
    }
}

pub fn write_rows(path: &Path, rows: &[Vec<f64>]) {
    let mut text = String::new();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&fields.join("\t"));
        text.push('\n');
    }
    fs::write(path, text).unwrap_or_else(|err| panic!("failed to write {:?}: {}", path, err));
}

pub fn write_column(path: &Path, values: &[f64]) {
    let rows: Vec<Vec<f64>> = values.iter().map(|v| vec![*v]).collect();
    write_rows(path, &rows);
}

pub fn aligned_row(source: &SideFrames, target: &SideFrames, i: usize, j: usize) -> Vec<f64> {
    let mut row = source.fused(i);
    row.extend(target.fused(j));
    row
}
