use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::input::compress::{read_maybe_gz, write_maybe_gz};
use crate::model::record::{ResultCollection, StoredCollection};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode results: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode results from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn write_collection(path: &Path, collection: &ResultCollection) -> Result<(), PersistError> {
    let json = serde_json::to_vec(collection).map_err(PersistError::Encode)?;
    write_maybe_gz(path, &json).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        bytes = json.len(),
        "wrote result collection"
    );
    Ok(())
}

/// Reads either the `{events, dropped}` form or a bare array of records.
pub fn read_collection(path: &Path) -> Result<ResultCollection, PersistError> {
    let bytes = read_maybe_gz(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stored: StoredCollection =
        serde_json::from_slice(&bytes).map_err(|source| PersistError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(stored.into())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_persist.rs"]
mod tests;
