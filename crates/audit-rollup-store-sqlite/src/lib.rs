// crates/audit-rollup-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backend using SQLite WAL.
// Purpose: Provide production-grade persistence for audit rollup records.
// Dependencies: audit-rollup-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`RecordStore`] implementation holding
//! audit programs, risk register entries, control tests, and procedures in
//! normalized tables. Status columns are stored as stable snake_case TEXT and
//! decoded fail-closed: unknown text surfaces as corruption rather than a
//! silent default.
//!
//! [`RecordStore`]: audit_rollup_core::RecordStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
