use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("label length mismatch: truth={truth}, predicted={predicted}")]
    LengthMismatch { truth: usize, predicted: usize },
    #[error("label {0} is not in the declared label set")]
    UnknownLabel(i64),
    #[error("label {0} appears more than once in the declared label set")]
    DuplicateLabel(i64),
    #[error("matrix shape mismatch: {left}x{left} vs {right}x{right}")]
    ShapeMismatch { left: usize, right: usize },
    #[error("matrix rows are not square ({rows} rows, row {row} has {len} cells)")]
    NotSquare { rows: usize, row: usize, len: usize },
}

/// What to do with a (truth, predicted) pair that has a label outside the
/// declared set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownLabelPolicy {
    #[default]
    Ignore,
    Reject,
}

/// K×K count table; cell (i, j) counts truth == labels[i], predicted == labels[j].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct ConfusionMatrix {
    k: usize,
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    pub fn zeros(k: usize) -> Self {
        Self {
            k,
            counts: vec![0; k * k],
        }
    }

    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let k = rows.len();
        let mut counts = Vec::with_capacity(k * k);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != k {
                return Err(MatrixError::NotSquare {
                    rows: k,
                    row,
                    len: values.len(),
                });
            }
            counts.extend(values);
        }
        Ok(Self { k, counts })
    }

    pub fn build(
        truth: &[i64],
        predicted: &[i64],
        labels: &[i64],
        policy: UnknownLabelPolicy,
    ) -> Result<Self, MatrixError> {
        if truth.len() != predicted.len() {
            return Err(MatrixError::LengthMismatch {
                truth: truth.len(),
                predicted: predicted.len(),
            });
        }

        let mut index_of: HashMap<i64, usize> = HashMap::with_capacity(labels.len());
        for (idx, &label) in labels.iter().enumerate() {
            if index_of.insert(label, idx).is_some() {
                return Err(MatrixError::DuplicateLabel(label));
            }
        }

        let mut out = Self::zeros(labels.len());
        for (&t, &p) in truth.iter().zip(predicted) {
            let (Some(&i), Some(&j)) = (index_of.get(&t), index_of.get(&p)) else {
                match policy {
                    UnknownLabelPolicy::Ignore => continue,
                    UnknownLabelPolicy::Reject => {
                        let bad = if index_of.contains_key(&t) { p } else { t };
                        return Err(MatrixError::UnknownLabel(bad));
                    }
                }
            };
            out.counts[i * out.k + j] += 1;
        }
        Ok(out)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.k + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        // chunks(0) panics; an empty matrix has no rows anyway.
        self.counts.chunks(self.k.max(1))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn trace(&self) -> u64 {
        (0..self.k).map(|i| self.get(i, i)).sum()
    }

    /// Fraction of voxels on the diagonal; `None` for an empty matrix.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.trace() as f64 / total as f64)
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, MatrixError> {
        let mut out = self.clone();
        out.try_add_assign(other)?;
        Ok(out)
    }

    pub fn try_add_assign(&mut self, other: &Self) -> Result<(), MatrixError> {
        if self.k != other.k {
            return Err(MatrixError::ShapeMismatch {
                left: self.k,
                right: other.k,
            });
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += *b;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u64>>> for ConfusionMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ConfusionMatrix> for Vec<Vec<u64>> {
    fn from(m: ConfusionMatrix) -> Self {
        m.rows().map(<[u64]>::to_vec).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/confusion.rs"]
mod tests;
