use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::input::config::{ConfigError, NetworkConfig};
use crate::input::{MissingInput, require_files};
use crate::model::labels::LabelLayout;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Missing(#[from] MissingInput),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub config: NetworkConfig,
    pub checkpoint: PathBuf,
    pub data_path: PathBuf,
    pub layout: LabelLayout,
}

impl EvaluationContext {
    pub fn file_label(&self) -> String {
        self.data_path.display().to_string()
    }

    pub fn checkpoint_label(&self) -> String {
        self.checkpoint.display().to_string()
    }
}

pub fn run_stage1(
    cfg_path: &Path,
    checkpoint: &Path,
    data_path: &Path,
) -> Result<EvaluationContext, PrepareError> {
    require_files(&[
        ("Config", cfg_path),
        ("Checkpoint", checkpoint),
        ("Data", data_path),
    ])?;

    tracing::debug!(path = %cfg_path.display(), "loading network config file");
    let mut config = NetworkConfig::load(cfg_path)?;
    config.prepare(checkpoint, data_path)?;
    config.validate_schema()?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        match config.to_yaml_string() {
            Ok(text) => tracing::debug!("prepared config:\n{text}"),
            Err(err) => tracing::debug!(%err, "prepared config could not be rendered"),
        }
    }

    Ok(EvaluationContext {
        config,
        checkpoint: checkpoint.to_path_buf(),
        data_path: data_path.to_path_buf(),
        layout: LabelLayout::mlreco_v1(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_prepare.rs"]
mod tests;
