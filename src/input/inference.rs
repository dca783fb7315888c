use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("data not found at {0}")]
    NotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode inference bundles from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid inference data: {0}")]
    InvalidInput(String),
    #[error("data iterator exhausted after {0} entries")]
    Exhausted(usize),
}

/// Tensors the network's data loader produced for one entry (batch size 1).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleData {
    pub input_data: Vec<Vec<f64>>,
    pub segment_label: Vec<Vec<f64>>,
    pub cosmic_origin: Vec<Vec<f64>>,
}

/// Network outputs for one entry. Anything besides the two score heads is
/// kept verbatim; numeric ones become per-event metrics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleOutput {
    pub ghost: Vec<Vec<f64>>,
    pub segmentation: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BundleOutput {
    pub fn scalar_metrics(&self) -> BTreeMap<String, f64> {
        self.extra
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|x| (k.clone(), x)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceBundle {
    pub index: u64,
    pub data: BundleData,
    pub output: BundleOutput,
}

/// One forward pass per call over a sequential data iterator.
pub trait InferenceBackend {
    fn n_entries(&self) -> usize;

    fn forward(&mut self, verbosity: Verbosity) -> Result<InferenceBundle, InferenceError>;
}
