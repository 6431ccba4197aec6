//! Tests for Config

use std::path::PathBuf;
use std::time::Duration;

use kvstash::{Config, KvError};

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.path, PathBuf::from("./kvstash.db"));
    assert_eq!(config.container, "kvs");
    assert_eq!(config.lock_timeout, Some(Duration::from_millis(50)));
    assert_eq!(config.file_mode, 0o640);
    assert_eq!(config.max_key_size, 32 * 1024);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .path("/tmp/data.db")
        .container("sessions")
        .lock_timeout(None)
        .lock_poll_interval(Duration::from_millis(1))
        .max_key_size(64)
        .max_value_size(1024)
        .file_mode(0o600)
        .build();

    assert_eq!(config.path, PathBuf::from("/tmp/data.db"));
    assert_eq!(config.container, "sessions");
    assert_eq!(config.lock_timeout, None);
    assert_eq!(config.lock_poll_interval, Duration::from_millis(1));
    assert_eq!(config.max_key_size, 64);
    assert_eq!(config.max_value_size, 1024);
    assert_eq!(config.file_mode, 0o600);
}

#[test]
fn test_config_validate_rejects_empty_container() {
    let config = Config::builder().container("").build();

    assert!(matches!(config.validate(), Err(KvError::Config(_))));
}

#[test]
fn test_config_validate_rejects_zero_poll_interval() {
    let config = Config::builder().lock_poll_interval(Duration::ZERO).build();

    assert!(matches!(config.validate(), Err(KvError::Config(_))));
}

#[test]
fn test_config_validate_rejects_zero_key_size() {
    let config = Config::builder().max_key_size(0).build();

    assert!(matches!(config.validate(), Err(KvError::Config(_))));
}
