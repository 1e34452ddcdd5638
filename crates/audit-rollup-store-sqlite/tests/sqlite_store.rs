// crates/audit-rollup-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Record Store Tests
// Description: Validate SQLite RecordStore behavior.
// Purpose: Ensure durable persistence, fail-closed decoding, and batch atomicity.
// Dependencies: audit-rollup-store-sqlite, audit-rollup-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed record store. Exercises reopen
//! durability, fail-closed status decoding, schema version gating, batch
//! write atomicity, and the sibling join used by the rollup engine.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use audit_rollup_core::AuditId;
use audit_rollup_core::AuditProgram;
use audit_rollup_core::ControlStatus;
use audit_rollup_core::ControlTest;
use audit_rollup_core::Procedure;
use audit_rollup_core::ProcedureId;
use audit_rollup_core::ProcedureStatus;
use audit_rollup_core::ProgramId;
use audit_rollup_core::RecordStore;
use audit_rollup_core::RiskRegisterEntry;
use audit_rollup_core::RiskRegisterId;
use audit_rollup_core::RiskStatus;
use audit_rollup_core::RiskTitle;
use audit_rollup_core::RollupEngine;
use audit_rollup_core::StoreError;
use audit_rollup_core::TestId;
use audit_rollup_store_sqlite::SqliteRecordStore;
use audit_rollup_store_sqlite::SqliteStoreConfig;
use audit_rollup_store_sqlite::SqliteStoreError;
use audit_rollup_store_sqlite::SqliteStoreMode;
use audit_rollup_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_for(path: &std::path::Path) -> SqliteRecordStore {
    let config = SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    };
    SqliteRecordStore::new(config).expect("store init")
}

fn seed_program(store: &SqliteRecordStore, program_id: &str) -> ProgramId {
    let program_id = ProgramId::new(program_id);
    store
        .upsert_program(&AuditProgram {
            program_id: program_id.clone(),
            audit_id: AuditId::new("audit-1"),
            status: "In Progress".to_string(),
        })
        .expect("program upsert");
    program_id
}

fn seed_risk(store: &SqliteRecordStore, risk_id: &str, title: Option<&str>) -> RiskRegisterId {
    let risk_register_id = RiskRegisterId::new(risk_id);
    store
        .upsert_risk_entry(&RiskRegisterEntry {
            risk_register_id: risk_register_id.clone(),
            risk_title: title.map(RiskTitle::new),
            description: None,
        })
        .expect("risk upsert");
    risk_register_id
}

fn seed_test(
    store: &SqliteRecordStore,
    test_id: &str,
    program_id: &ProgramId,
    risk_register_id: &RiskRegisterId,
) -> TestId {
    let test_id = TestId::new(test_id);
    store
        .upsert_test(&ControlTest {
            test_id: test_id.clone(),
            program_id: program_id.clone(),
            risk_register_id: risk_register_id.clone(),
            issue_observation: false,
            control_status: ControlStatus::NotImplemented,
            risk_status: RiskStatus::NotMitigated,
        })
        .expect("test upsert");
    test_id
}

fn seed_procedure(
    store: &SqliteRecordStore,
    procedure_id: &str,
    test_id: &TestId,
    status: ProcedureStatus,
) -> ProcedureId {
    let procedure_id = ProcedureId::new(procedure_id);
    store
        .upsert_procedure(&Procedure {
            procedure_id: procedure_id.clone(),
            test_id: test_id.clone(),
            title: format!("step {procedure_id}"),
            status,
        })
        .expect("procedure upsert");
    procedure_id
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn records_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    {
        let store = store_for(&path);
        let program_id = seed_program(&store, "prog-1");
        let risk_id = seed_risk(&store, "risk-1", Some("Access control"));
        let test_id = seed_test(&store, "t1", &program_id, &risk_id);
        let procedure_id = seed_procedure(&store, "p1", &test_id, ProcedureStatus::Pending);
        store.write_procedure_status(&procedure_id, ProcedureStatus::Passed).unwrap();
        store.write_control_status(&test_id, ControlStatus::Implemented).unwrap();
        store.write_risk_status_batch(&[test_id], RiskStatus::Mitigated).unwrap();
    }

    let store = store_for(&path);
    let snapshot = store.program_snapshot(&ProgramId::new("prog-1")).unwrap();
    assert_eq!(snapshot.program.audit_id.as_str(), "audit-1");
    assert_eq!(snapshot.tests.len(), 1);
    let test = &snapshot.tests[0];
    assert_eq!(test.test.control_status, ControlStatus::Implemented);
    assert_eq!(test.test.risk_status, RiskStatus::Mitigated);
    assert_eq!(test.risk_title, Some(RiskTitle::new("Access control")));
    assert_eq!(test.procedures.len(), 1);
    assert_eq!(test.procedures[0].status, ProcedureStatus::Passed);
}

#[test]
fn writes_to_missing_rows_fail_closed() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));

    let procedure_error = store
        .write_procedure_status(&ProcedureId::new("ghost"), ProcedureStatus::Passed)
        .unwrap_err();
    assert!(matches!(procedure_error, StoreError::NotFound(_)));

    let control_error = store
        .write_control_status(&TestId::new("ghost"), ControlStatus::Implemented)
        .unwrap_err();
    assert!(matches!(control_error, StoreError::NotFound(_)));

    let context_error = store.test_risk_context(&TestId::new("ghost")).unwrap_err();
    assert!(matches!(context_error, StoreError::NotFound(_)));
}

#[test]
fn undecodable_status_text_is_corruption() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    let program_id = seed_program(&store, "prog-1");
    let risk_id = seed_risk(&store, "risk-1", Some("Access control"));
    let test_id = seed_test(&store, "t1", &program_id, &risk_id);

    let connection = Connection::open(&path).unwrap();
    connection
        .execute(
            "UPDATE control_tests SET control_status = ?1 WHERE test_id = ?2",
            params!["Implemented", test_id.as_str()],
        )
        .unwrap();
    drop(connection);

    let error = store.get_test(&test_id).unwrap_err();
    assert!(matches!(error, SqliteStoreError::Corrupt(_)));
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    drop(store_for(&path));

    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", params![]).unwrap();
    drop(connection);

    let config = SqliteStoreConfig {
        path,
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    };
    let error = SqliteRecordStore::new(config).unwrap_err();
    assert!(matches!(error, SqliteStoreError::VersionMismatch(_)));
}

#[test]
fn directory_store_path_is_invalid() {
    let temp = TempDir::new().unwrap();
    let config = SqliteStoreConfig {
        path: temp.path().to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    };
    let error = SqliteRecordStore::new(config).unwrap_err();
    assert!(matches!(error, SqliteStoreError::Invalid(_)));
}

#[test]
fn batch_write_rolls_back_on_missing_row() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let program_id = seed_program(&store, "prog-1");
    let risk_id = seed_risk(&store, "risk-1", Some("Access control"));
    let test_id = seed_test(&store, "t1", &program_id, &risk_id);

    let error = store
        .write_risk_status_batch(
            &[test_id.clone(), TestId::new("ghost")],
            RiskStatus::Mitigated,
        )
        .unwrap_err();
    assert!(matches!(error, StoreError::NotFound(_)));

    // The existing row keeps its prior status: the batch is all or nothing.
    let test = store.get_test(&test_id).unwrap().unwrap();
    assert_eq!(test.risk_status, RiskStatus::NotMitigated);
}

#[test]
fn sibling_query_joins_risk_titles() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let program_id = seed_program(&store, "prog-1");
    let titled = seed_risk(&store, "risk-1", Some("Access control"));
    let untitled = seed_risk(&store, "risk-2", None);
    seed_test(&store, "t1", &program_id, &titled);
    seed_test(&store, "t2", &program_id, &untitled);
    // Dangling register reference resolves to no title rather than an error.
    seed_test(&store, "t3", &program_id, &RiskRegisterId::new("missing"));

    let siblings = store.tests_for_program(&program_id).unwrap();
    assert_eq!(siblings.len(), 3);
    assert_eq!(siblings[0].test_id, TestId::new("t1"));
    assert_eq!(siblings[0].risk_title, Some(RiskTitle::new("Access control")));
    assert_eq!(siblings[1].risk_title, None);
    assert_eq!(siblings[2].risk_title, None);
}

#[test]
fn rollup_engine_runs_against_sqlite() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let program_id = seed_program(&store, "prog-1");
    let risk_id = seed_risk(&store, "risk-1", Some("Access control"));
    let test_id = seed_test(&store, "t1", &program_id, &risk_id);
    let procedure_id = seed_procedure(&store, "p1", &test_id, ProcedureStatus::Pending);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine
        .recompute_after_procedure_change(Some(&procedure_id), ProcedureStatus::Passed, &test_id)
        .unwrap();
    assert_eq!(outcome.control_status, ControlStatus::Implemented);

    let test = store.get_test(&test_id).unwrap().unwrap();
    assert_eq!(test.control_status, ControlStatus::Implemented);
    assert_eq!(test.risk_status, RiskStatus::Mitigated);

    // A recompute-only pass over unchanged data keeps the derived fields.
    engine.recompute_for_test(&test_id).unwrap();
    let test = store.get_test(&test_id).unwrap().unwrap();
    assert_eq!(test.control_status, ControlStatus::Implemented);
    assert_eq!(test.risk_status, RiskStatus::Mitigated);
}
