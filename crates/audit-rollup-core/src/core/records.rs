// crates/audit-rollup-core/src/core/records.rs
// ============================================================================
// Module: Audit Rollup Records
// Description: Program, control-test, procedure, and risk-register records.
// Purpose: Provide stable, serializable record types for the rollup engine.
// Dependencies: crate::core::{identifiers, status}, serde
// ============================================================================

//! ## Overview
//! Records mirror the rows held by the backing record store. The rollup
//! engine only ever writes the two derived status fields on [`ControlTest`]
//! and the status field on [`Procedure`]; every other field is owned by the
//! surrounding application and treated as opaque here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AuditId;
use crate::core::identifiers::ProcedureId;
use crate::core::identifiers::ProgramId;
use crate::core::identifiers::RiskRegisterId;
use crate::core::identifiers::RiskTitle;
use crate::core::identifiers::TestId;
use crate::core::status::ControlStatus;
use crate::core::status::ProcedureStatus;
use crate::core::status::RiskStatus;

// ============================================================================
// SECTION: Program Record
// ============================================================================

/// Audit program record owned by one engagement.
///
/// # Invariants
/// - `status` is a free-form lifecycle label set externally; the rollup
///   engine never writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditProgram {
    /// Program identifier.
    pub program_id: ProgramId,
    /// Owning audit engagement identifier.
    pub audit_id: AuditId,
    /// Free-form lifecycle label (e.g. Draft, In Progress, Completed).
    pub status: String,
}

// ============================================================================
// SECTION: Control Test Record
// ============================================================================

/// Control test record pairing one risk-register entry into a program.
///
/// # Invariants
/// - `control_status` and `risk_status` are derived fields written only by
///   the rollup engine.
/// - `issue_observation` is user-settable and independent of rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTest {
    /// Control test identifier.
    pub test_id: TestId,
    /// Owning program identifier.
    pub program_id: ProgramId,
    /// Referenced risk register entry.
    pub risk_register_id: RiskRegisterId,
    /// Whether the user flagged an issue observation on this test.
    pub issue_observation: bool,
    /// Derived implementation status.
    pub control_status: ControlStatus,
    /// Derived mitigation status shared across the sibling group.
    pub risk_status: RiskStatus,
}

// ============================================================================
// SECTION: Procedure Record
// ============================================================================

/// Test procedure record belonging to one control test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    /// Procedure identifier.
    pub procedure_id: ProcedureId,
    /// Owning control test identifier.
    pub test_id: TestId,
    /// Human-readable step title.
    pub title: String,
    /// Procedure outcome, `Pending` on creation.
    pub status: ProcedureStatus,
}

// ============================================================================
// SECTION: Risk Register Record
// ============================================================================

/// Risk register entry referenced by control tests.
///
/// # Invariants
/// - `risk_title` is the cross-control grouping key; entries with equal
///   titles are the same risk for rollup purposes (see [`RiskTitle`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRegisterEntry {
    /// Risk register identifier.
    pub risk_register_id: RiskRegisterId,
    /// Risk title used for sibling grouping; absent titles never group.
    pub risk_title: Option<RiskTitle>,
    /// Optional risk description.
    pub description: Option<String>,
}

// ============================================================================
// SECTION: Program Snapshot
// ============================================================================

/// Read model for one control test and its procedures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSnapshot {
    /// Control test record.
    pub test: ControlTest,
    /// Resolved risk title at snapshot time, if any.
    pub risk_title: Option<RiskTitle>,
    /// Procedures belonging to the test.
    pub procedures: Vec<Procedure>,
}

/// Read model for a whole program: program → tests → procedures.
///
/// Snapshots are rebuilt from the store after a rollup settles so readers
/// observe the freshly derived statuses; they are a convenience view, not a
/// consistency mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    /// Program record.
    pub program: AuditProgram,
    /// Tests belonging to the program.
    pub tests: Vec<TestSnapshot>,
}
