// crates/audit-rollup-core/src/interfaces/mod.rs
// ============================================================================
// Module: Audit Rollup Interfaces
// Description: Backend-agnostic record store contract for the rollup engine.
// Purpose: Define the persistence surface the rollup pipeline depends on.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The rollup engine talks to persistence exclusively through [`RecordStore`].
//! Each operation must be atomic at the row level; no cross-call transactional
//! isolation is required or assumed. Concurrent rollups from two callers can
//! interleave, and the later risk-status batch write wins; the sibling
//! group, not the individual row, is the unit of consistency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ControlStatus;
use crate::core::Procedure;
use crate::core::ProcedureId;
use crate::core::ProcedureStatus;
use crate::core::ProgramId;
use crate::core::RiskStatus;
use crate::core::RiskTitle;
use crate::core::TestId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Store I/O error.
    #[error("record store io error: {0}")]
    Io(String),
    /// No row matched the targeted identifier.
    #[error("record store row not found: {0}")]
    NotFound(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("record store corruption: {0}")]
    Corrupt(String),
    /// Store data is invalid.
    #[error("record store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("record store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Read Projections
// ============================================================================

/// Risk-identity projection for one control test.
///
/// # Invariants
/// - `risk_title` is the joined `risk_register.risk_title` for the test's
///   referenced register entry, `None` when the entry or title is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRiskContext {
    /// Owning program identifier, if any.
    pub program_id: Option<ProgramId>,
    /// Resolved risk title, if any.
    pub risk_title: Option<RiskTitle>,
}

/// Sibling-candidate projection for one control test within a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingTest {
    /// Control test identifier.
    pub test_id: TestId,
    /// Current derived implementation status.
    pub control_status: ControlStatus,
    /// Resolved risk title for grouping, if any.
    pub risk_title: Option<RiskTitle>,
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Backend-agnostic record store used by the rollup engine.
///
/// Implementations must be deterministic and fail closed: a write that finds
/// no matching row returns [`StoreError::NotFound`] rather than succeeding
/// silently.
pub trait RecordStore {
    /// Loads the full current procedure set for a control test.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn procedures_for_test(&self, test_id: &TestId) -> Result<Vec<Procedure>, StoreError>;

    /// Loads the risk-identity projection for a control test.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the test row does not exist, or
    /// another [`StoreError`] when the read fails.
    fn test_risk_context(&self, test_id: &TestId) -> Result<TestRiskContext, StoreError>;

    /// Loads every control test in a program with its resolved risk title.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn tests_for_program(&self, program_id: &ProgramId) -> Result<Vec<SiblingTest>, StoreError>;

    /// Writes a procedure's status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no procedure row matches, or
    /// another [`StoreError`] when the write fails.
    fn write_procedure_status(
        &self,
        procedure_id: &ProcedureId,
        status: ProcedureStatus,
    ) -> Result<(), StoreError>;

    /// Writes a control test's derived implementation status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no test row matches, or another
    /// [`StoreError`] when the write fails.
    fn write_control_status(
        &self,
        test_id: &TestId,
        status: ControlStatus,
    ) -> Result<(), StoreError>;

    /// Batch-writes a risk status onto every listed control test.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when any listed test row is missing,
    /// or another [`StoreError`] when the write fails.
    fn write_risk_status_batch(
        &self,
        test_ids: &[TestId],
        status: RiskStatus,
    ) -> Result<(), StoreError>;
}
