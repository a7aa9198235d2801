//! Tests for error types

use std::path::PathBuf;

use listkit_core::{ConfigError, TracingError};

// ============================================================================
// ConfigError Tests
// ============================================================================

#[test]
fn config_error_parse_has_message() {
    let err = ConfigError::Parse("expected `]`".to_string());
    let msg = err.to_string();
    assert!(msg.contains("parse"));
    assert!(msg.contains("expected `]`"));
}

#[test]
fn config_error_validation_has_field_and_reason() {
    let err = ConfigError::invalid("drag.row_height", "must be a positive number");
    let msg = err.to_string();
    assert!(msg.contains("drag.row_height"));
    assert!(msg.contains("must be a positive number"));
}

#[test]
fn config_error_not_found_has_path() {
    let err = ConfigError::NotFound(PathBuf::from("/etc/listkit/settings.toml"));
    let msg = err.to_string();
    assert!(msg.contains("not found"));
    assert!(msg.contains("settings.toml"));
}

#[test]
fn config_error_read_keeps_source() {
    let err = ConfigError::Read {
        path: PathBuf::from("settings.toml"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(err.to_string().contains("denied"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn config_error_write_and_serialize_have_message() {
    assert!(ConfigError::Write("disk full".into()).to_string().contains("write"));
    assert!(ConfigError::Serialize("bad float".into()).to_string().contains("serialize"));
}

// ============================================================================
// TracingError Tests
// ============================================================================

#[test]
fn tracing_error_messages() {
    assert!(
        TracingError::AlreadyInitialized
            .to_string()
            .contains("already been initialized")
    );
    assert!(
        TracingError::InvalidFilter("bogus".into())
            .to_string()
            .contains("bogus")
    );
    assert!(
        TracingError::FileCreationFailed("/nope".into())
            .to_string()
            .contains("log file")
    );
}
