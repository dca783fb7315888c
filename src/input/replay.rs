use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::input::compress::{is_gz, read_maybe_gz};
use crate::input::inference::{InferenceBackend, InferenceBundle, InferenceError, Verbosity};

/// Replays inference bundles that the external framework dumped to disk,
/// as a JSON array (optionally gzip-compressed).
#[derive(Debug)]
pub struct ReplayBackend {
    path: PathBuf,
    n_entries: usize,
    served: usize,
    pending: VecDeque<InferenceBundle>,
}

impl ReplayBackend {
    pub fn open(path: &Path) -> Result<Self, InferenceError> {
        if !path.is_file() {
            return Err(InferenceError::NotFound(path.to_path_buf()));
        }
        let io_err = |source| InferenceError::Io {
            path: path.to_path_buf(),
            source,
        };

        let bundles: Vec<InferenceBundle> = if is_gz(path) {
            let bytes = read_maybe_gz(path).map_err(io_err)?;
            decode(path, &bytes)?
        } else {
            let file = File::open(path).map_err(io_err)?;
            if file.metadata().map_err(io_err)?.len() == 0 {
                return Err(InferenceError::InvalidInput(format!(
                    "{} is empty",
                    path.display()
                )));
            }
            let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };
            decode(path, &mmap[..])?
        };

        tracing::info!(
            path = %path.display(),
            entries = bundles.len(),
            "loaded inference bundles"
        );
        Ok(Self::from_bundles(path, bundles))
    }

    pub fn from_bundles(path: &Path, bundles: Vec<InferenceBundle>) -> Self {
        Self {
            path: path.to_path_buf(),
            n_entries: bundles.len(),
            served: 0,
            pending: bundles.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Result<Vec<InferenceBundle>, InferenceError> {
    serde_json::from_slice(bytes).map_err(|source| InferenceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

impl InferenceBackend for ReplayBackend {
    fn n_entries(&self) -> usize {
        self.n_entries
    }

    fn forward(&mut self, verbosity: Verbosity) -> Result<InferenceBundle, InferenceError> {
        let bundle = self
            .pending
            .pop_front()
            .ok_or(InferenceError::Exhausted(self.served))?;
        self.served += 1;
        if verbosity.is_verbose() {
            tracing::debug!(
                index = bundle.index,
                input_data = bundle.data.input_data.len(),
                segment_label = bundle.data.segment_label.len(),
                cosmic_origin = bundle.data.cosmic_origin.len(),
                ghost = bundle.output.ghost.len(),
                segmentation = bundle.output.segmentation.len(),
                "forward"
            );
        }
        Ok(bundle)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/replay.rs"]
mod tests;
