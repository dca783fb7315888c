use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub const REQUIRED_SCHEMA_KEYS: &[&str] = &["input_data", "segment_label"];
pub const NVOXEL_LIMIT: u64 = 1_000_000;
pub const SEQUENTIAL_SAMPLER: &str = "SequentialBatchSampler";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("error in config: {0} does not exist")]
    MissingSchemaKey(String),
    #[error("error in config: {0} is not a mapping")]
    NotAMapping(String),
}

/// The network configuration document, kept as an untyped YAML tree since
/// only a handful of keys are read or overridden.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub path: PathBuf,
    pub doc: Value,
}

impl NetworkConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(path, &text)
    }

    pub fn from_yaml_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !doc.is_mapping() {
            return Err(ConfigError::NotAMapping("<root>".to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    pub fn schema(&self) -> Option<&Mapping> {
        self.doc
            .get("iotool")?
            .get("dataset")?
            .get("schema")?
            .as_mapping()
    }

    pub fn validate_schema(&self) -> Result<(), ConfigError> {
        for key in REQUIRED_SCHEMA_KEYS {
            let present = self
                .schema()
                .is_some_and(|schema| schema.contains_key(*key));
            if !present {
                return Err(ConfigError::MissingSchemaKey(format!(
                    "iotool->dataset->schema->{key}"
                )));
            }
        }
        Ok(())
    }

    /// Applies the overrides that turn a training config into a sequential,
    /// single-entry inference pass over `data_path` with `checkpoint` loaded.
    pub fn prepare(&mut self, checkpoint: &Path, data_path: &Path) -> Result<(), ConfigError> {
        let root = self
            .doc
            .as_mapping_mut()
            .ok_or_else(|| ConfigError::NotAMapping("<root>".to_string()))?;

        let trainval = child_mapping(root, "trainval")?;
        set(trainval, "train", Value::Bool(false));
        set(
            trainval,
            "model_path",
            Value::String(checkpoint.display().to_string()),
        );
        set(
            trainval,
            "gpus",
            Value::Sequence(vec![Value::Number(0.into())]),
        );

        let iotool = child_mapping(root, "iotool")?;
        set(iotool, "batchsize", Value::Number(1.into()));
        let sampler = child_mapping(iotool, "sampler")?;
        set(sampler, "name", Value::String(SEQUENTIAL_SAMPLER.to_string()));

        let dataset = child_mapping(iotool, "dataset")?;
        set(dataset, "nvoxel_limit", Value::Number(NVOXEL_LIMIT.into()));
        set(
            dataset,
            "data_keys",
            Value::Sequence(vec![Value::String(data_path.display().to_string())]),
        );

        let schema = child_mapping(dataset, "schema")?;
        set(schema, "cosmic_origin", cosmic_origin_parser());
        Ok(())
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.doc)
    }
}

fn cosmic_origin_parser() -> Value {
    let mut args = Mapping::new();
    set(
        &mut args,
        "sparse_event_list",
        Value::Sequence(vec![Value::String("sparse3d_cosmic_origin".to_string())]),
    );
    let mut parser = Mapping::new();
    set(&mut parser, "parser", Value::String("parse_sparse3d".to_string()));
    set(&mut parser, "args", Value::Mapping(args));
    Value::Mapping(parser)
}

fn set(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::String(key.to_string()), value);
}

fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping, ConfigError> {
    parent
        .entry(Value::String(key.to_string()))
        .or_insert(Value::Mapping(Mapping::new()))
        .as_mapping_mut()
        .ok_or_else(|| ConfigError::NotAMapping(key.to_string()))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/config.rs"]
mod tests;
