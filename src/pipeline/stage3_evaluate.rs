use thiserror::Error;

use crate::input::inference::{InferenceBackend, InferenceError, Verbosity};
use crate::model::labels::LabelLayout;
use crate::model::record::ResultCollection;
use crate::pipeline::stage2_extract::{EventOutcome, ExtractError, extract_event};

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("entry {entry}: {source}")]
    Inference {
        entry: usize,
        #[source]
        source: InferenceError,
    },
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Clone)]
pub struct Stage3Input<'a> {
    pub layout: &'a LabelLayout,
    pub file: String,
    pub checkpoint: String,
    pub verbosity: Verbosity,
}

/// Runs every entry of `backend` once, in order.
pub fn run_stage3(
    backend: &mut dyn InferenceBackend,
    input: &Stage3Input<'_>,
) -> Result<ResultCollection, EvaluateError> {
    let n_entries = backend.n_entries();
    let mut out = ResultCollection::default();

    for entry in 0..n_entries {
        tracing::info!(entry, n_entries, "running on entry");
        let bundle = backend
            .forward(input.verbosity)
            .map_err(|source| EvaluateError::Inference { entry, source })?;
        tracing::info!(
            entry,
            index = bundle.index,
            voxels = bundle.data.input_data.len(),
            "forward done"
        );

        match extract_event(&bundle, input.layout, &input.file, &input.checkpoint)? {
            EventOutcome::Kept(record) => out.events.push(record),
            EventOutcome::Dropped(dropped) => out.dropped.push(dropped),
        }
    }

    tracing::info!(
        kept = out.events.len(),
        dropped = out.dropped.len(),
        "evaluation finished"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_evaluate.rs"]
mod tests;
