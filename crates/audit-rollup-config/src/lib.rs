// crates/audit-rollup-config/src/lib.rs
// ============================================================================
// Module: Audit Rollup Configuration Library
// Description: Configuration loading and validation for the audit rollup tool.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: audit-rollup-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits
//! and validated fail-closed before any store is opened. The record store
//! section selects between the in-memory backend and the durable `SQLite`
//! backend.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuditRollupConfig;
pub use config::ConfigError;
pub use config::RecordStoreConfig;
pub use config::RecordStoreType;
