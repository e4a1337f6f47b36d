//! 配置单元测试

use crate::data::config::DEFAULT_BUFFER_CAPACITY;
use crate::data::{DataError, MnistLabelDataset, ReaderConfig};

#[test]
fn test_default_config() {
    let config = ReaderConfig::default();
    assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
    assert_eq!(config.prefetch, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_setters() {
    let config = ReaderConfig::default().buffer_capacity(4096).prefetch(8);
    assert_eq!(config.buffer_capacity, 4096);
    assert_eq!(config.prefetch, Some(8));
}

#[test]
fn test_from_json() {
    let config = ReaderConfig::from_json(r#"{"prefetch": 16}"#).unwrap();
    assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
    assert_eq!(config.prefetch, Some(16));

    let config = ReaderConfig::from_json("{}").unwrap();
    assert_eq!(config, ReaderConfig::default());
}

#[test]
fn test_from_json_rejects_bad_input() {
    for text in [
        r#"{"buffer_capacity": 0}"#,
        r#"{"prefetch": 0}"#,
        r#"{"unknown": 1}"#,
        "not json",
    ] {
        let err = ReaderConfig::from_json(text).unwrap_err();
        assert!(matches!(err, DataError::ConfigError(_)), "{text}: {err:?}");
    }
}

#[test]
fn test_config_json_roundtrip() {
    let config = ReaderConfig::default().prefetch(3);
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(ReaderConfig::from_json(&text).unwrap(), config);
}

#[test]
fn test_dataset_rejects_invalid_config() {
    let dataset = MnistLabelDataset::new(["x"], "").unwrap();
    let err = dataset
        .with_config(ReaderConfig::default().buffer_capacity(0))
        .unwrap_err();
    assert!(matches!(err, DataError::ConfigError(_)));
}
