// crates/audit-rollup-config/tests/config_loading.rs
// ============================================================================
// Module: Configuration Loading Tests
// Description: Validate TOML loading, defaults, and fail-closed validation.
// Purpose: Ensure invalid configuration is rejected before any store opens.
// Dependencies: audit-rollup-config, audit-rollup-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Covers the config resolution and validation surface: defaults for omitted
//! sections, strict rejection of inconsistent record-store settings, parse
//! failures, and conversion into the `SQLite` store configuration.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::PathBuf;

use audit_rollup_config::AuditRollupConfig;
use audit_rollup_config::ConfigError;
use audit_rollup_config::RecordStoreConfig;
use audit_rollup_config::RecordStoreType;
use audit_rollup_store_sqlite::SqliteStoreMode;
use audit_rollup_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("audit-rollup.toml");
    fs::write(&path, content).expect("config write");
    path
}

#[test]
fn empty_config_uses_memory_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "");
    let config = AuditRollupConfig::load(Some(&path)).unwrap();
    assert_eq!(config.record_store.store_type, RecordStoreType::Memory);
    assert_eq!(config.record_store.path, None);
    assert_eq!(config.record_store.busy_timeout_ms, 5_000);
    assert_eq!(config.record_store.journal_mode, SqliteStoreMode::Wal);
    assert_eq!(config.record_store.sync_mode, SqliteSyncMode::Full);
}

#[test]
fn sqlite_section_parses_with_overrides() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "[record_store]\n\
         type = \"sqlite\"\n\
         path = \"records.sqlite\"\n\
         busy_timeout_ms = 250\n\
         journal_mode = \"delete\"\n\
         sync_mode = \"normal\"\n",
    );
    let config = AuditRollupConfig::load(Some(&path)).unwrap();
    assert_eq!(config.record_store.store_type, RecordStoreType::Sqlite);
    assert_eq!(config.record_store.path, Some(PathBuf::from("records.sqlite")));
    assert_eq!(config.record_store.busy_timeout_ms, 250);
    assert_eq!(config.record_store.journal_mode, SqliteStoreMode::Delete);
    assert_eq!(config.record_store.sync_mode, SqliteSyncMode::Normal);

    let store_config = config.record_store.to_sqlite_config().unwrap();
    assert_eq!(store_config.path, PathBuf::from("records.sqlite"));
    assert_eq!(store_config.busy_timeout_ms, 250);
}

#[test]
fn sqlite_without_path_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[record_store]\ntype = \"sqlite\"\n");
    let error = AuditRollupConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn memory_with_path_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "[record_store]\ntype = \"memory\"\npath = \"records.sqlite\"\n",
    );
    let error = AuditRollupConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn oversized_busy_timeout_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "[record_store]\n\
         type = \"sqlite\"\n\
         path = \"records.sqlite\"\n\
         busy_timeout_ms = 600000\n",
    );
    let error = AuditRollupConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[record_store\ntype = \"sqlite\"");
    let error = AuditRollupConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");
    let error = AuditRollupConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Io(_)));
}

#[test]
fn memory_section_does_not_convert_to_sqlite() {
    let section = RecordStoreConfig::default();
    let error = section.to_sqlite_config().unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}
