// crates/audit-rollup-core/src/runtime/engine.rs
// ============================================================================
// Module: Audit Rollup Engine
// Description: Two-level status rollup triggered by procedure changes.
// Purpose: Keep control and risk statuses consistent with procedure truth.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The rollup engine is the single canonical recomputation path for derived
//! statuses. Every trigger (a pass/fail click, an added procedure, a freshly
//! linked risk) converges on [`RollupEngine::recompute_after_procedure_change`],
//! which runs an ordered pipeline of row-level store operations:
//!
//! procedure write → procedure read-back → control write → risk resolve →
//! sibling read → risk batch write.
//!
//! There is no transaction wrapping the pipeline. A persistence failure at
//! any step aborts the remaining steps and surfaces the failing step to the
//! caller; writes committed by earlier steps are retained, leaving later
//! derived fields stale until the next trigger. There is no retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ControlStatus;
use crate::core::ProcedureId;
use crate::core::ProcedureStatus;
use crate::core::ProgramId;
use crate::core::RiskStatus;
use crate::core::RiskTitle;
use crate::core::TestId;
use crate::core::control_status_for;
use crate::core::risk_status_for;
use crate::interfaces::RecordStore;
use crate::interfaces::SiblingTest;
use crate::interfaces::StoreError;
use crate::interfaces::TestRiskContext;

// ============================================================================
// SECTION: Pipeline Steps
// ============================================================================

/// Ordered pipeline steps executed by one rollup call-chain.
///
/// # Invariants
/// - Variants are stable for serialization and failure reporting; tests
///   assert partial-commit behavior per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStep {
    /// Writing the triggering procedure's new status.
    ProcedureWrite,
    /// Reading back the test's full procedure set.
    ProcedureReadBack,
    /// Writing the derived control status onto the test.
    ControlWrite,
    /// Resolving the test's risk identity (program + risk title join).
    RiskResolve,
    /// Reading the program's tests to build the sibling set.
    SiblingRead,
    /// Batch-writing the derived risk status onto every sibling.
    RiskBatchWrite,
}

impl RollupStep {
    /// Returns the stable snake_case string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProcedureWrite => "procedure_write",
            Self::ProcedureReadBack => "procedure_read_back",
            Self::ControlWrite => "control_write",
            Self::RiskResolve => "risk_resolve",
            Self::SiblingRead => "sibling_read",
            Self::RiskBatchWrite => "risk_batch_write",
        }
    }
}

impl std::fmt::Display for RollupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rollup engine errors.
///
/// # Invariants
/// - Every failure names the pipeline step that was executing; earlier
///   committed writes are never rolled back.
#[derive(Debug, Error)]
pub enum RollupError {
    /// A store operation failed, aborting the remaining pipeline steps.
    #[error("rollup persistence failure during {step}: {source}")]
    Persistence {
        /// Pipeline step that was executing when the store failed.
        step: RollupStep,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

impl RollupError {
    /// Tags a store error with the pipeline step it interrupted.
    const fn at(step: RollupStep, source: StoreError) -> Self {
        Self::Persistence {
            step,
            source,
        }
    }
}

// ============================================================================
// SECTION: Risk Identity
// ============================================================================

/// Resolved grouping identity for a risk within one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskIdentity {
    /// Program scoping the sibling group.
    pub program_id: ProgramId,
    /// Title key shared by every sibling.
    pub risk_title: RiskTitle,
}

/// Outcome of resolving a test's risk identity.
///
/// Unresolved identities are not errors: they short-circuit the cross-control
/// half of the rollup while the control-level half still applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskResolution {
    /// Identity resolved; a sibling rollup ran.
    Resolved(RiskIdentity),
    /// The test references no program; no sibling group exists.
    MissingProgram,
    /// The referenced register entry has no title; the test never groups.
    MissingRiskTitle,
}

/// Resolves the risk identity for a test's store projection.
///
/// This function is the single seam for the grouping policy: siblings are
/// matched by exact title-string equality, not by register id. Two register
/// rows with identical titles resolve to the same identity, and retitling an
/// entry silently moves its tests out of their former group.
#[must_use]
pub fn resolve_risk_identity(context: &TestRiskContext) -> RiskResolution {
    match (&context.program_id, &context.risk_title) {
        (Some(program_id), Some(risk_title)) => RiskResolution::Resolved(RiskIdentity {
            program_id: program_id.clone(),
            risk_title: risk_title.clone(),
        }),
        (None, _) => RiskResolution::MissingProgram,
        (Some(_), None) => RiskResolution::MissingRiskTitle,
    }
}

// ============================================================================
// SECTION: Rollup Outcome
// ============================================================================

/// Sibling-level result of a settled rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRollup {
    /// Program scoping the sibling group.
    pub program_id: ProgramId,
    /// Title key shared by the sibling group.
    pub risk_title: RiskTitle,
    /// Risk status batch-written to every sibling.
    pub risk_status: RiskStatus,
    /// Every sibling test the batch write targeted (includes the trigger).
    pub sibling_test_ids: Vec<TestId>,
    /// Number of siblings whose control status is `Implemented`.
    pub implemented_count: usize,
    /// Total sibling count.
    pub sibling_count: usize,
}

/// Result of one settled rollup call-chain.
///
/// `stale_program` replaces the upstream ambient "currently open program"
/// refresh: the caller decides whether and when to refetch a program view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupOutcome {
    /// Control test that triggered the rollup.
    pub test_id: TestId,
    /// Derived implementation status written to the test.
    pub control_status: ControlStatus,
    /// How the risk identity resolved.
    pub resolution: RiskResolution,
    /// Sibling rollup result, present only when the identity resolved.
    pub risk_rollup: Option<RiskRollup>,
    /// Program whose read views are now stale, if known.
    pub stale_program: Option<ProgramId>,
}

// ============================================================================
// SECTION: Rollup Engine
// ============================================================================

/// Two-level status rollup engine over a generic record store.
#[derive(Debug, Clone)]
pub struct RollupEngine<S> {
    /// Record store implementation.
    store: S,
}

impl<S> RollupEngine<S>
where
    S: RecordStore,
{
    /// Creates a new rollup engine over a record store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Recomputes derived statuses after a procedure status change.
    ///
    /// When `procedure_id` is `None` no procedure is written; the pipeline
    /// still recomputes both derived levels so freshly created procedures or
    /// test links never leave stale statuses behind. `new_status` is ignored
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::Persistence`] when any store operation fails;
    /// the error names the interrupted pipeline step and earlier committed
    /// writes are retained.
    pub fn recompute_after_procedure_change(
        &self,
        procedure_id: Option<&ProcedureId>,
        new_status: ProcedureStatus,
        test_id: &TestId,
    ) -> Result<RollupOutcome, RollupError> {
        if let Some(procedure_id) = procedure_id {
            self.store
                .write_procedure_status(procedure_id, new_status)
                .map_err(|err| RollupError::at(RollupStep::ProcedureWrite, err))?;
        }

        let procedures = self
            .store
            .procedures_for_test(test_id)
            .map_err(|err| RollupError::at(RollupStep::ProcedureReadBack, err))?;
        let statuses: Vec<ProcedureStatus> =
            procedures.iter().map(|procedure| procedure.status).collect();
        let control_status = control_status_for(&statuses);
        self.store
            .write_control_status(test_id, control_status)
            .map_err(|err| RollupError::at(RollupStep::ControlWrite, err))?;

        let context = self
            .store
            .test_risk_context(test_id)
            .map_err(|err| RollupError::at(RollupStep::RiskResolve, err))?;
        let resolution = resolve_risk_identity(&context);
        let RiskResolution::Resolved(identity) = &resolution else {
            // Unresolved identity: own risk_status stays untouched and no
            // sibling batch write runs. The control write above still made
            // any known program view stale.
            return Ok(RollupOutcome {
                test_id: test_id.clone(),
                control_status,
                stale_program: context.program_id.clone(),
                resolution,
                risk_rollup: None,
            });
        };

        let candidates = self
            .store
            .tests_for_program(&identity.program_id)
            .map_err(|err| RollupError::at(RollupStep::SiblingRead, err))?;
        let siblings: Vec<SiblingTest> = candidates
            .into_iter()
            .filter(|candidate| candidate.risk_title.as_ref() == Some(&identity.risk_title))
            .collect();

        let sibling_statuses: Vec<ControlStatus> =
            siblings.iter().map(|sibling| sibling.control_status).collect();
        let risk_status = risk_status_for(&sibling_statuses);
        let sibling_test_ids: Vec<TestId> =
            siblings.iter().map(|sibling| sibling.test_id.clone()).collect();
        self.store
            .write_risk_status_batch(&sibling_test_ids, risk_status)
            .map_err(|err| RollupError::at(RollupStep::RiskBatchWrite, err))?;

        let implemented_count = sibling_statuses
            .iter()
            .filter(|status| **status == ControlStatus::Implemented)
            .count();
        let risk_rollup = RiskRollup {
            program_id: identity.program_id.clone(),
            risk_title: identity.risk_title.clone(),
            risk_status,
            sibling_test_ids,
            implemented_count,
            sibling_count: sibling_statuses.len(),
        };

        Ok(RollupOutcome {
            test_id: test_id.clone(),
            control_status,
            stale_program: Some(identity.program_id.clone()),
            resolution,
            risk_rollup: Some(risk_rollup),
        })
    }

    /// Recomputes derived statuses without writing any procedure.
    ///
    /// Used after add-step and link-risk triggers where no pass/fail has
    /// happened yet but the derived statuses must not stay stale.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::Persistence`] when any store operation fails.
    pub fn recompute_for_test(&self, test_id: &TestId) -> Result<RollupOutcome, RollupError> {
        self.recompute_after_procedure_change(None, ProcedureStatus::Pending, test_id)
    }
}
