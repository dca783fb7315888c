use thiserror::Error;

use crate::input::inference::InferenceBundle;
use crate::model::confusion::{ConfusionMatrix, MatrixError};
use crate::model::labels::{LabelLayout, VoxelOrigin};
use crate::model::record::{ConfusionMatrices, DropReason, DroppedEvent, EventRecord};

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("event {index}: malformed {tensor} row {row}: {detail}")]
    MalformedRow {
        index: u64,
        tensor: &'static str,
        row: usize,
        detail: String,
    },
    #[error("event {index}: {source}")]
    Matrix {
        index: u64,
        #[source]
        source: MatrixError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Kept(EventRecord),
    Dropped(DroppedEvent),
}

/// Per-voxel labels derived from one bundle, before any length checks.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelLabels {
    pub truth: Vec<i64>,
    pub predicted: Vec<i64>,
    pub origin: Vec<VoxelOrigin>,
    pub n_ghost: usize,
}

pub fn extract_event(
    bundle: &InferenceBundle,
    layout: &LabelLayout,
    file: &str,
    checkpoint: &str,
) -> Result<EventOutcome, ExtractError> {
    let index = bundle.index;
    let labels = derive_labels(bundle, layout)?;

    // A ghost head longer than the segmentation head is harmless; a shorter
    // one leaves trailing predictions unresolved.
    let n = labels.origin.len();
    if labels.truth.len() != n
        || labels.predicted.len() != n
        || labels.n_ghost < labels.predicted.len()
    {
        let reason = DropReason::LengthMismatch {
            true_labels: labels.truth.len(),
            cosmic_origin: n,
            predicted_labels: labels.predicted.len(),
            ghost: labels.n_ghost,
        };
        tracing::warn!(index, "{reason}; dropping event");
        return Ok(EventOutcome::Dropped(DroppedEvent {
            index,
            file: file.to_string(),
            checkpoint: checkpoint.to_string(),
            reason,
        }));
    }

    let matrix_err = |source| ExtractError::Matrix { index, source };
    let cosmics = masked_matrix(&labels, VoxelOrigin::Cosmic, layout).map_err(matrix_err)?;
    let non_cosmics =
        masked_matrix(&labels, VoxelOrigin::NonCosmic, layout).map_err(matrix_err)?;

    Ok(EventOutcome::Kept(EventRecord {
        index,
        file: file.to_string(),
        checkpoint: checkpoint.to_string(),
        metrics: bundle.output.scalar_metrics(),
        confusion_matrices: ConfusionMatrices {
            bins: layout.bins.clone(),
            labels: layout.names.clone(),
            cosmics,
            non_cosmics,
        },
    }))
}

pub fn derive_labels(
    bundle: &InferenceBundle,
    layout: &LabelLayout,
) -> Result<VoxelLabels, ExtractError> {
    let index = bundle.index;

    let mut truth = Vec::with_capacity(bundle.data.segment_label.len());
    for (row, values) in bundle.data.segment_label.iter().enumerate() {
        let last = values.last().copied().ok_or_else(|| ExtractError::MalformedRow {
            index,
            tensor: "segment_label",
            row,
            detail: "empty row".to_string(),
        })?;
        truth.push(integral_label(last).ok_or_else(|| ExtractError::MalformedRow {
            index,
            tensor: "segment_label",
            row,
            detail: format!("non-integral label {last}"),
        })?);
    }

    let mut origin = Vec::with_capacity(bundle.data.cosmic_origin.len());
    for (row, values) in bundle.data.cosmic_origin.iter().enumerate() {
        let flag = values
            .get(layout.cosmic_column)
            .copied()
            .ok_or_else(|| ExtractError::MalformedRow {
                index,
                tensor: "cosmic_origin",
                row,
                detail: format!(
                    "{} columns, need column {}",
                    values.len(),
                    layout.cosmic_column
                ),
            })?;
        origin.push(layout.origin_of(flag));
    }

    let ghost = argmax_rows(&bundle.output.ghost, index, "ghost")?;
    let segment = argmax_rows(&bundle.output.segmentation, index, "segmentation")?;

    // Predictions past the end of the ghost head cannot be resolved; they
    // surface as a length mismatch instead.
    let predicted = segment
        .iter()
        .zip(&ghost)
        .map(|(&seg, &g)| layout.full_prediction(seg as i64, g))
        .chain(segment.iter().skip(ghost.len()).map(|&seg| seg as i64))
        .collect();

    Ok(VoxelLabels {
        truth,
        predicted,
        origin,
        n_ghost: ghost.len(),
    })
}

fn masked_matrix(
    labels: &VoxelLabels,
    keep: VoxelOrigin,
    layout: &LabelLayout,
) -> Result<ConfusionMatrix, MatrixError> {
    let mut truth = Vec::new();
    let mut predicted = Vec::new();
    for ((&t, &p), &o) in labels
        .truth
        .iter()
        .zip(&labels.predicted)
        .zip(&labels.origin)
    {
        if o == keep {
            truth.push(t);
            predicted.push(p);
        }
    }
    ConfusionMatrix::build(&truth, &predicted, &layout.bins, layout.unknown_labels)
}

/// Index of the first maximum in each row. NaN compares above every
/// number, so a row holding NaN resolves to its first NaN.
pub fn argmax_rows(
    rows: &[Vec<f64>],
    index: u64,
    tensor: &'static str,
) -> Result<Vec<usize>, ExtractError> {
    let mut out = Vec::with_capacity(rows.len());
    for (row, values) in rows.iter().enumerate() {
        if values.is_empty() {
            return Err(ExtractError::MalformedRow {
                index,
                tensor,
                row,
                detail: "empty score row".to_string(),
            });
        }
        let best = match values.iter().position(|v| v.is_nan()) {
            Some(i) => {
                tracing::warn!(index, tensor, row, "NaN score; taking first NaN as argmax");
                i
            }
            None => {
                let mut best = 0;
                for (i, &v) in values.iter().enumerate().skip(1) {
                    if v > values[best] {
                        best = i;
                    }
                }
                best
            }
        };
        out.push(best);
    }
    Ok(out)
}

fn integral_label(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_extract.rs"]
mod tests;
