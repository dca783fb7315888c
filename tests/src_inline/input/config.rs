use super::*;

const CFG: &str = r#"
iotool:
  batch_size: 4
  dataset:
    name: LArCVDataset
    schema:
      input_data:
        parser: parse_sparse3d
      segment_label:
        parser: parse_sparse3d
  sampler:
    name: RandomSequenceSampler
trainval:
  train: true
  gpus: []
"#;

fn cfg(text: &str) -> NetworkConfig {
    NetworkConfig::from_yaml_str(Path::new("test.cfg"), text).unwrap()
}

#[test]
fn test_validate_schema_ok() {
    cfg(CFG).validate_schema().unwrap();
}

#[test]
fn test_validate_schema_missing_segment_label() {
    let text = CFG.replace("segment_label", "cluster_label");
    let err = cfg(&text).validate_schema().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSchemaKey(ref k) if k.ends_with("segment_label")));
}

#[test]
fn test_validate_schema_missing_schema() {
    let err = cfg("trainval:\n  train: true\n").validate_schema().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSchemaKey(ref k) if k.ends_with("input_data")));
}

#[test]
fn test_root_must_be_mapping() {
    let err = NetworkConfig::from_yaml_str(Path::new("x"), "- 1\n- 2\n").unwrap_err();
    assert!(matches!(err, ConfigError::NotAMapping(_)));
}

#[test]
fn test_load_missing_file() {
    let err = NetworkConfig::load(Path::new("/nonexistent/mlreco.cfg")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_prepare_applies_overrides() {
    let mut c = cfg(CFG);
    c.prepare(Path::new("/ckpt/snapshot-9999.ckpt"), Path::new("/data/valid.root"))
        .unwrap();
    let doc = &c.doc;

    assert_eq!(doc["trainval"]["train"], Value::Bool(false));
    assert_eq!(
        doc["trainval"]["model_path"].as_str(),
        Some("/ckpt/snapshot-9999.ckpt")
    );
    assert_eq!(doc["trainval"]["gpus"][0].as_u64(), Some(0));
    assert_eq!(doc["iotool"]["batchsize"].as_u64(), Some(1));
    assert_eq!(
        doc["iotool"]["sampler"]["name"].as_str(),
        Some(SEQUENTIAL_SAMPLER)
    );
    assert_eq!(
        doc["iotool"]["dataset"]["nvoxel_limit"].as_u64(),
        Some(NVOXEL_LIMIT)
    );
    assert_eq!(
        doc["iotool"]["dataset"]["data_keys"][0].as_str(),
        Some("/data/valid.root")
    );
    let cosmic = &doc["iotool"]["dataset"]["schema"]["cosmic_origin"];
    assert_eq!(cosmic["parser"].as_str(), Some("parse_sparse3d"));
    assert_eq!(
        cosmic["args"]["sparse_event_list"][0].as_str(),
        Some("sparse3d_cosmic_origin")
    );
    // untouched keys survive
    assert_eq!(
        doc["iotool"]["dataset"]["name"].as_str(),
        Some("LArCVDataset")
    );
    c.validate_schema().unwrap();
}

#[test]
fn test_prepare_creates_missing_sections() {
    let mut c = cfg("model:\n  name: full_chain\n");
    c.prepare(Path::new("a.ckpt"), Path::new("b.root")).unwrap();
    assert_eq!(c.doc["iotool"]["batchsize"].as_u64(), Some(1));
    assert!(c.to_yaml_string().unwrap().contains("SequentialBatchSampler"));
}

#[test]
fn test_prepare_rejects_scalar_section() {
    let mut c = cfg("iotool: 3\n");
    let err = c
        .prepare(Path::new("a.ckpt"), Path::new("b.root"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotAMapping(ref k) if k == "iotool"));
}
