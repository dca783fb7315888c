pub mod text;

use thiserror::Error;

use crate::model::confusion::{ConfusionMatrix, MatrixError};
use crate::model::record::EventRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no data: the result collection contains no events ({dropped} dropped)")]
    Empty { dropped: usize },
    #[error("event {index}: {source}")]
    Shape {
        index: u64,
        #[source]
        source: MatrixError,
    },
    #[error("event {index}: bins {found:?} differ from {expected:?}")]
    Bins {
        index: u64,
        expected: Vec<i64>,
        found: Vec<i64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalSummary {
    pub n_events: usize,
    pub file: String,
    pub checkpoint: String,
    pub cosmics: ConfusionMatrix,
    pub non_cosmics: ConfusionMatrix,
    pub total: ConfusionMatrix,
}

/// Sums the cosmic and non-cosmic matrices over every record. File,
/// checkpoint and bin order are taken from the first record.
pub fn aggregate(records: &[EventRecord]) -> Result<TotalSummary, AggregateError> {
    let first = records
        .first()
        .ok_or(AggregateError::Empty { dropped: 0 })?;
    let bins = &first.confusion_matrices.bins;
    let k = first.confusion_matrices.cosmics.k();
    let mut cosmics = ConfusionMatrix::zeros(k);
    let mut non_cosmics = ConfusionMatrix::zeros(k);

    for record in records {
        let shape = |source| AggregateError::Shape {
            index: record.index,
            source,
        };
        cosmics
            .try_add_assign(&record.confusion_matrices.cosmics)
            .map_err(shape)?;
        non_cosmics
            .try_add_assign(&record.confusion_matrices.non_cosmics)
            .map_err(shape)?;
        if record.confusion_matrices.bins != *bins {
            return Err(AggregateError::Bins {
                index: record.index,
                expected: bins.clone(),
                found: record.confusion_matrices.bins.clone(),
            });
        }
    }

    let total = cosmics
        .checked_add(&non_cosmics)
        .map_err(|source| AggregateError::Shape {
            index: first.index,
            source,
        })?;

    Ok(TotalSummary {
        n_events: records.len(),
        file: first.file.clone(),
        checkpoint: first.checkpoint.clone(),
        cosmics,
        non_cosmics,
        total,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
