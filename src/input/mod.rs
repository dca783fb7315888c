use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod compress;
pub mod config;
pub mod inference;
pub mod replay;

#[derive(Debug, Error)]
#[error("{what} not found at {}", .path.display())]
pub struct MissingInput {
    pub what: &'static str,
    pub path: PathBuf,
}

/// Checks that each `(what, path)` names an existing file, in order.
pub fn require_files(inputs: &[(&'static str, &Path)]) -> Result<(), MissingInput> {
    for &(what, path) in inputs {
        if !path.is_file() {
            return Err(MissingInput {
                what,
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
