//! Stacking of aligned utterances into one training table.

pub mod writer;

use std::path::Path;

use ndarray::{concatenate, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::align::UtteranceAligner;
use crate::config::{CorpusLayout, TableConfig};
use crate::error::{DatatableError, Result};
use crate::reader::read_id_list;
use crate::types::{Datatable, FeatureStream, UtteranceSpan};

/// Runs the aligner over an utterance list and stacks the results in list order.
#[derive(Debug, Clone)]
pub struct DatatableBuilder {
    aligner: UtteranceAligner,
    jobs: usize,
}

impl DatatableBuilder {
    pub fn new(layout: CorpusLayout, config: &TableConfig) -> Self {
        Self {
            aligner: UtteranceAligner::new(layout, config),
            jobs: config.jobs.max(1),
        }
    }

    /// Number of alignment workers; 1 keeps the build on the calling thread.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn build(&self, id_list_path: &Path) -> Result<Datatable> {
        let ids = read_id_list(id_list_path)?;
        if ids.is_empty() {
            return Err(DatatableError::EmptyIdList {
                path: id_list_path.to_path_buf(),
            });
        }
        info!(
            list = %id_list_path.display(),
            utterances = ids.len(),
            jobs = self.jobs,
            "building datatable"
        );
        self.build_from_ids(ids.as_slice())
    }

    /// Any utterance failure aborts the whole build; no partial table is returned.
    pub fn build_from_ids<S>(&self, ids: &[S]) -> Result<Datatable>
    where
        S: AsRef<str> + Sync,
    {
        let table = if self.jobs > 1 {
            self.build_parallel(ids)?
        } else {
            self.build_sequential(ids)?
        };
        info!(
            rows = table.rows(),
            width = table.width(),
            utterances = table.spans().len(),
            "datatable complete"
        );
        Ok(table)
    }

    fn build_sequential<S: AsRef<str>>(&self, ids: &[S]) -> Result<Datatable> {
        let mut stack = TableStack::default();
        for id in ids {
            let id = id.as_ref();
            let aligned = self.aligner.align(id)?;
            stack.push(id, aligned)?;
        }
        stack.finish()
    }

    fn build_parallel<S>(&self, ids: &[S]) -> Result<Datatable>
    where
        S: AsRef<str> + Sync,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|index| format!("align-worker-{index}"))
            .build()?;
        // indexed collect keeps list order whatever order workers finish in
        let aligned = pool.install(|| {
            ids.par_iter()
                .map(|id| self.aligner.align(id.as_ref()))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut stack = TableStack::default();
        for (id, block) in ids.iter().zip(aligned) {
            stack.push(id.as_ref(), block)?;
        }
        stack.finish()
    }
}

#[derive(Debug, Default)]
struct TableStack {
    width: Option<usize>,
    rows: usize,
    blocks: Vec<FeatureStream>,
    spans: Vec<UtteranceSpan>,
}

impl TableStack {
    fn push(&mut self, id: &str, block: FeatureStream) -> Result<()> {
        let expected = *self.width.get_or_insert(block.width());
        if block.width() != expected {
            return Err(DatatableError::TableShape {
                expected,
                found: block.width(),
            }
            .in_utterance(id));
        }
        debug!(utterance = id, rows = block.frames(), start_row = self.rows, "stacked utterance");
        self.spans.push(UtteranceSpan {
            id: id.to_string(),
            start_row: self.rows,
            rows: block.frames(),
        });
        self.rows += block.frames();
        self.blocks.push(block);
        Ok(())
    }

    fn finish(self) -> Result<Datatable> {
        if self.blocks.is_empty() {
            return Ok(Datatable::new(Array2::zeros((0, 0)), self.spans));
        }
        let views: Vec<ArrayView2<'_, f64>> = self.blocks.iter().map(FeatureStream::view).collect();
        let values = concatenate(Axis(0), &views)
            .map_err(|err| DatatableError::ShapeMismatch(format!("stacking failed: {err}")))?;
        Ok(Datatable::new(values, self.spans))
    }
}
