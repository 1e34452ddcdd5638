// crates/audit-rollup-core/tests/engine_rollup.rs
// ============================================================================
// Module: Rollup Engine Scenario Tests
// Description: End-to-end rollup scenarios over the in-memory store.
// Purpose: Validate the two-level cascade, sibling grouping, and idempotence.
// Dependencies: audit-rollup-core
// ============================================================================

//! ## Overview
//! Drives the rollup engine through the canonical scenarios: single-control
//! mitigation, mixed sibling groups, late-joining siblings with no evidence,
//! orphaned risk links, title-equality grouping quirks, idempotent
//! recomputation, and batch-write completeness.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use audit_rollup_core::AuditId;
use audit_rollup_core::AuditProgram;
use audit_rollup_core::ControlStatus;
use audit_rollup_core::ControlTest;
use audit_rollup_core::InMemoryRecordStore;
use audit_rollup_core::Procedure;
use audit_rollup_core::ProcedureId;
use audit_rollup_core::ProcedureStatus;
use audit_rollup_core::ProgramId;
use audit_rollup_core::RiskRegisterEntry;
use audit_rollup_core::RiskRegisterId;
use audit_rollup_core::RiskResolution;
use audit_rollup_core::RiskStatus;
use audit_rollup_core::RiskTitle;
use audit_rollup_core::RollupEngine;
use audit_rollup_core::TestId;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Seeds a program row and returns its id.
fn seed_program(store: &InMemoryRecordStore, program_id: &str) -> ProgramId {
    let program_id = ProgramId::new(program_id);
    store
        .upsert_program(AuditProgram {
            program_id: program_id.clone(),
            audit_id: AuditId::new("audit-1"),
            status: "In Progress".to_string(),
        })
        .unwrap();
    program_id
}

/// Seeds a risk register row with an optional title.
fn seed_risk(store: &InMemoryRecordStore, risk_id: &str, title: Option<&str>) -> RiskRegisterId {
    let risk_register_id = RiskRegisterId::new(risk_id);
    store
        .upsert_risk_entry(RiskRegisterEntry {
            risk_register_id: risk_register_id.clone(),
            risk_title: title.map(RiskTitle::new),
            description: None,
        })
        .unwrap();
    risk_register_id
}

/// Seeds a control test row with default derived statuses.
fn seed_test(
    store: &InMemoryRecordStore,
    test_id: &str,
    program_id: &ProgramId,
    risk_register_id: &RiskRegisterId,
) -> TestId {
    let test_id = TestId::new(test_id);
    store
        .upsert_test(ControlTest {
            test_id: test_id.clone(),
            program_id: program_id.clone(),
            risk_register_id: risk_register_id.clone(),
            issue_observation: false,
            control_status: ControlStatus::NotImplemented,
            risk_status: RiskStatus::NotMitigated,
        })
        .unwrap();
    test_id
}

/// Seeds a procedure row with the given status.
fn seed_procedure(
    store: &InMemoryRecordStore,
    procedure_id: &str,
    test_id: &TestId,
    status: ProcedureStatus,
) -> ProcedureId {
    let procedure_id = ProcedureId::new(procedure_id);
    store
        .upsert_procedure(Procedure {
            procedure_id: procedure_id.clone(),
            test_id: test_id.clone(),
            title: format!("step {procedure_id}"),
            status,
        })
        .unwrap();
    procedure_id
}

/// Reads back the derived statuses for a test.
fn derived(store: &InMemoryRecordStore, test_id: &TestId) -> (ControlStatus, RiskStatus) {
    let test = store.get_test(test_id).unwrap().unwrap();
    (test.control_status, test.risk_status)
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Scenario 1: a fully passed single control mitigates its risk.
#[test]
fn single_implemented_control_mitigates_risk() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Access control"));
    let test = seed_test(&store, "t1", &program, &risk);
    seed_procedure(&store, "p1", &test, ProcedureStatus::Passed);
    let procedure = seed_procedure(&store, "p2", &test, ProcedureStatus::Pending);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine
        .recompute_after_procedure_change(Some(&procedure), ProcedureStatus::Passed, &test)
        .unwrap();

    assert_eq!(outcome.control_status, ControlStatus::Implemented);
    assert_eq!(outcome.stale_program, Some(program.clone()));
    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.risk_status, RiskStatus::Mitigated);
    assert_eq!(rollup.sibling_count, 1);
    assert_eq!(rollup.implemented_count, 1);
    assert_eq!(derived(&store, &test), (ControlStatus::Implemented, RiskStatus::Mitigated));
}

/// Scenario 2: a partial control plus an untested sibling is not mitigated.
#[test]
fn partial_and_untested_siblings_are_not_mitigated() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk_a = seed_risk(&store, "risk-1", Some("Change management"));
    let risk_b = seed_risk(&store, "risk-2", Some("Change management"));
    let t1 = seed_test(&store, "t1", &program, &risk_a);
    let t2 = seed_test(&store, "t2", &program, &risk_b);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);
    seed_procedure(&store, "p2", &t1, ProcedureStatus::Failed);
    seed_procedure(&store, "p3", &t2, ProcedureStatus::Pending);

    let engine = RollupEngine::new(store.clone());
    engine.recompute_for_test(&t2).unwrap();
    let outcome = engine.recompute_for_test(&t1).unwrap();

    assert_eq!(outcome.control_status, ControlStatus::PartiallyImplemented);
    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.risk_status, RiskStatus::NotMitigated);
    assert_eq!(rollup.sibling_count, 2);
    assert_eq!(rollup.implemented_count, 0);
    assert_eq!(
        derived(&store, &t1),
        (ControlStatus::PartiallyImplemented, RiskStatus::NotMitigated)
    );
    assert_eq!(derived(&store, &t2), (ControlStatus::NotImplemented, RiskStatus::NotMitigated));
}

/// Scenario 3: two fully passed siblings mitigate the shared risk.
#[test]
fn two_implemented_siblings_mitigate_risk() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Backup and recovery"));
    let t1 = seed_test(&store, "t1", &program, &risk);
    let t2 = seed_test(&store, "t2", &program, &risk);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);
    seed_procedure(&store, "p2", &t2, ProcedureStatus::Passed);
    seed_procedure(&store, "p3", &t2, ProcedureStatus::Passed);

    let engine = RollupEngine::new(store.clone());
    engine.recompute_for_test(&t1).unwrap();
    let outcome = engine.recompute_for_test(&t2).unwrap();

    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.risk_status, RiskStatus::Mitigated);
    assert_eq!(rollup.implemented_count, 2);
    assert_eq!(derived(&store, &t1), (ControlStatus::Implemented, RiskStatus::Mitigated));
    assert_eq!(derived(&store, &t2), (ControlStatus::Implemented, RiskStatus::Mitigated));
}

/// Scenario 4: a new evidence-free sibling downgrades the group to partial.
#[test]
fn new_sibling_without_procedures_downgrades_group() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Backup and recovery"));
    let t1 = seed_test(&store, "t1", &program, &risk);
    let t2 = seed_test(&store, "t2", &program, &risk);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);
    seed_procedure(&store, "p2", &t2, ProcedureStatus::Passed);

    let engine = RollupEngine::new(store.clone());
    engine.recompute_for_test(&t1).unwrap();
    engine.recompute_for_test(&t2).unwrap();
    assert_eq!(derived(&store, &t1), (ControlStatus::Implemented, RiskStatus::Mitigated));

    // Linking a third test with zero procedures re-triggers the rollup.
    let t3 = seed_test(&store, "t3", &program, &risk);
    let outcome = engine.recompute_for_test(&t3).unwrap();

    assert_eq!(outcome.control_status, ControlStatus::NotImplemented);
    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.risk_status, RiskStatus::PartiallyMitigated);
    assert_eq!(rollup.sibling_count, 3);
    assert_eq!(rollup.implemented_count, 2);
    for test in [&t1, &t2, &t3] {
        let (_, risk_status) = derived(&store, test);
        assert_eq!(risk_status, RiskStatus::PartiallyMitigated);
    }
}

/// Scenario 5: an orphaned risk link updates the control but not the risk.
#[test]
fn missing_risk_title_short_circuits_sibling_rollup() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", None);
    let test = seed_test(&store, "t1", &program, &risk);
    let procedure = seed_procedure(&store, "p1", &test, ProcedureStatus::Pending);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine
        .recompute_after_procedure_change(Some(&procedure), ProcedureStatus::Passed, &test)
        .unwrap();

    assert_eq!(outcome.control_status, ControlStatus::Implemented);
    assert_eq!(outcome.resolution, RiskResolution::MissingRiskTitle);
    assert!(outcome.risk_rollup.is_none());
    assert_eq!(outcome.stale_program, Some(program));
    // Own risk status is untouched by the short-circuited rollup.
    assert_eq!(derived(&store, &test), (ControlStatus::Implemented, RiskStatus::NotMitigated));
}

// ============================================================================
// SECTION: Grouping Edge Cases
// ============================================================================

/// Verifies grouping is scoped to one program even when titles match.
#[test]
fn sibling_groups_do_not_cross_programs() {
    let store = InMemoryRecordStore::new();
    let prog_a = seed_program(&store, "prog-a");
    let prog_b = seed_program(&store, "prog-b");
    let risk = seed_risk(&store, "risk-1", Some("Vendor management"));
    let t1 = seed_test(&store, "t1", &prog_a, &risk);
    let t2 = seed_test(&store, "t2", &prog_b, &risk);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine.recompute_for_test(&t1).unwrap();

    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.sibling_count, 1);
    assert_eq!(derived(&store, &t1), (ControlStatus::Implemented, RiskStatus::Mitigated));
    // The other program's test is untouched.
    assert_eq!(derived(&store, &t2), (ControlStatus::NotImplemented, RiskStatus::NotMitigated));
}

/// Verifies retitling a register entry moves tests out of their old group.
#[test]
fn retitled_risk_entry_leaves_former_sibling_group() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk_a = seed_risk(&store, "risk-1", Some("Logging"));
    let risk_b = seed_risk(&store, "risk-2", Some("Logging"));
    let t1 = seed_test(&store, "t1", &program, &risk_a);
    let t2 = seed_test(&store, "t2", &program, &risk_b);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);
    seed_procedure(&store, "p2", &t2, ProcedureStatus::Passed);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine.recompute_for_test(&t1).unwrap();
    assert_eq!(outcome.risk_rollup.unwrap().sibling_count, 2);

    // Retitle risk-2: t2 silently leaves the "Logging" group.
    seed_risk(&store, "risk-2", Some("Monitoring"));
    let outcome = engine.recompute_for_test(&t1).unwrap();
    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.sibling_count, 1);
    assert_eq!(rollup.sibling_test_ids, vec![t1.clone()]);
}

// ============================================================================
// SECTION: Invariants
// ============================================================================

/// Verifies recompute-only rollups are idempotent on unchanged data.
#[test]
fn recompute_without_change_is_idempotent() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Access control"));
    let t1 = seed_test(&store, "t1", &program, &risk);
    let t2 = seed_test(&store, "t2", &program, &risk);
    seed_procedure(&store, "p1", &t1, ProcedureStatus::Passed);
    seed_procedure(&store, "p2", &t2, ProcedureStatus::Failed);

    let engine = RollupEngine::new(store.clone());
    let first = engine.recompute_for_test(&t1).unwrap();
    let before = (derived(&store, &t1), derived(&store, &t2));
    let second = engine.recompute_for_test(&t1).unwrap();
    let after = (derived(&store, &t1), derived(&store, &t2));

    assert_eq!(first, second);
    assert_eq!(before, after);
}

/// Verifies every sibling carries the identical risk status after a rollup.
#[test]
fn batch_write_covers_every_sibling() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Key management"));
    let tests: Vec<TestId> = (1..=5)
        .map(|index| seed_test(&store, &format!("t{index}"), &program, &risk))
        .collect();
    seed_procedure(&store, "p1", &tests[0], ProcedureStatus::Passed);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine.recompute_for_test(&tests[0]).unwrap();

    let rollup = outcome.risk_rollup.unwrap();
    assert_eq!(rollup.sibling_count, 5);
    let statuses: Vec<RiskStatus> =
        tests.iter().map(|test| derived(&store, test).1).collect();
    assert!(statuses.iter().all(|status| *status == RiskStatus::PartiallyMitigated));
}

/// Verifies the snapshot read model reflects freshly derived statuses.
#[test]
fn program_snapshot_observes_rollup_writes() {
    let store = InMemoryRecordStore::new();
    let program = seed_program(&store, "prog-1");
    let risk = seed_risk(&store, "risk-1", Some("Access control"));
    let test = seed_test(&store, "t1", &program, &risk);
    let procedure = seed_procedure(&store, "p1", &test, ProcedureStatus::Pending);

    let engine = RollupEngine::new(store.clone());
    let outcome = engine
        .recompute_after_procedure_change(Some(&procedure), ProcedureStatus::Passed, &test)
        .unwrap();

    let snapshot = store.program_snapshot(&outcome.stale_program.unwrap()).unwrap();
    assert_eq!(snapshot.tests.len(), 1);
    assert_eq!(snapshot.tests[0].test.control_status, ControlStatus::Implemented);
    assert_eq!(snapshot.tests[0].test.risk_status, RiskStatus::Mitigated);
    assert_eq!(snapshot.tests[0].procedures[0].status, ProcedureStatus::Passed);
}
