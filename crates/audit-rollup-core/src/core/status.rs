// crates/audit-rollup-core/src/core/status.rs
// ============================================================================
// Module: Audit Rollup Status Types
// Description: Procedure, control, and risk status enums plus rollup math.
// Purpose: Provide the deterministic status-derivation functions for rollups.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Status enums are the vocabulary of the rollup engine. The two pure
//! functions in this module are the entire rollup policy: a control's
//! implementation status is derived from its procedure outcomes, and a risk's
//! mitigation status is derived from the implementation statuses of every
//! control sharing the risk within a program. Everything the engine persists
//! is computed here, so these functions must stay total and deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Procedure Status
// ============================================================================

/// Outcome of a single test procedure.
///
/// # Invariants
/// - Variants are stable for serialization and store TEXT columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureStatus {
    /// Procedure has not been performed yet (creation default).
    #[default]
    Pending,
    /// Procedure was performed and passed.
    Passed,
    /// Procedure was performed and failed.
    Failed,
}

impl ProcedureStatus {
    /// Returns the stable snake_case string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Parses the stable string form, returning `None` for unknown text.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ProcedureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Control Status
// ============================================================================

/// Derived implementation status of a control test.
///
/// # Invariants
/// - Written only by the rollup engine, never by direct user edit.
/// - Variants are stable for serialization and store TEXT columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    /// No procedure evidence supports the control.
    #[default]
    NotImplemented,
    /// Some, but not all, procedure evidence supports the control.
    PartiallyImplemented,
    /// Every procedure passed and at least one exists.
    Implemented,
}

impl ControlStatus {
    /// Returns the stable snake_case string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotImplemented => "not_implemented",
            Self::PartiallyImplemented => "partially_implemented",
            Self::Implemented => "implemented",
        }
    }

    /// Parses the stable string form, returning `None` for unknown text.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_implemented" => Some(Self::NotImplemented),
            "partially_implemented" => Some(Self::PartiallyImplemented),
            "implemented" => Some(Self::Implemented),
            _ => None,
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Risk Status
// ============================================================================

/// Derived mitigation status of a risk within one program.
///
/// # Invariants
/// - Written only by the rollup engine, and always batch-written so every
///   sibling test carries the identical value after a rollup settles.
/// - Variants are stable for serialization and store TEXT columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    /// No sibling control is implemented.
    #[default]
    NotMitigated,
    /// Some, but not all, sibling controls are implemented.
    PartiallyMitigated,
    /// Every sibling control is implemented.
    Mitigated,
}

impl RiskStatus {
    /// Returns the stable snake_case string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotMitigated => "not_mitigated",
            Self::PartiallyMitigated => "partially_mitigated",
            Self::Mitigated => "mitigated",
        }
    }

    /// Parses the stable string form, returning `None` for unknown text.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_mitigated" => Some(Self::NotMitigated),
            "partially_mitigated" => Some(Self::PartiallyMitigated),
            "mitigated" => Some(Self::Mitigated),
            _ => None,
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Rollup Functions
// ============================================================================

/// Derives a control's implementation status from its procedure outcomes.
///
/// Classification policy:
/// - an empty procedure set is `NotImplemented`;
/// - every procedure passed is `Implemented`;
/// - at least one pass short of all is `PartiallyImplemented`; a mix of
///   passed and pending with zero failures still counts as partial, which is
///   the preserved upstream behavior;
/// - zero passes is `NotImplemented` regardless of the failed/pending split.
#[must_use]
pub fn control_status_for(procedures: &[ProcedureStatus]) -> ControlStatus {
    let total = procedures.len();
    if total == 0 {
        return ControlStatus::NotImplemented;
    }
    let passed = procedures.iter().filter(|status| **status == ProcedureStatus::Passed).count();
    if passed == total {
        ControlStatus::Implemented
    } else if passed > 0 {
        ControlStatus::PartiallyImplemented
    } else {
        ControlStatus::NotImplemented
    }
}

/// Derives a risk's mitigation status from its sibling control statuses.
///
/// Classification policy:
/// - an empty sibling set is `NotMitigated`;
/// - every sibling implemented is `Mitigated`;
/// - at least one implemented short of all is `PartiallyMitigated`;
/// - zero implemented is `NotMitigated`.
#[must_use]
pub fn risk_status_for(controls: &[ControlStatus]) -> RiskStatus {
    let total = controls.len();
    if total == 0 {
        return RiskStatus::NotMitigated;
    }
    let implemented = controls.iter().filter(|status| **status == ControlStatus::Implemented).count();
    if implemented == total {
        RiskStatus::Mitigated
    } else if implemented > 0 {
        RiskStatus::PartiallyMitigated
    } else {
        RiskStatus::NotMitigated
    }
}
