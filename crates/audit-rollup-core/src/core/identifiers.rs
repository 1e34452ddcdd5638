// crates/audit-rollup-core/src/core/identifiers.rs
// ============================================================================
// Module: Audit Rollup Identifiers
// Description: Canonical opaque identifiers for audit programs, tests, and risks.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical string-based identifiers used throughout
//! Audit Rollup. Identifiers are opaque and serialize as strings. Validation
//! is handled at store or engine boundaries rather than within these simple
//! wrappers.
//!
//! [`RiskTitle`] is deliberately an identifier-like newtype even though it
//! wraps free text: it is the cross-control grouping key for risk rollups,
//! and keeping it behind one type isolates the title-string-equality grouping
//! behavior so a future switch to a stable key touches a single seam.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Audit engagement identifier owning one or more programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(String);

impl AuditId {
    /// Creates a new audit identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AuditId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AuditId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Audit program identifier scoped to one engagement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(String);

impl ProgramId {
    /// Creates a new program identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProgramId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProgramId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Control test identifier scoped to one program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    /// Creates a new control test identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TestId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Procedure identifier scoped to one control test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcedureId(String);

impl ProcedureId {
    /// Creates a new procedure identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcedureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProcedureId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProcedureId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Risk register entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskRegisterId(String);

impl RiskRegisterId {
    /// Creates a new risk register identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiskRegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RiskRegisterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RiskRegisterId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Risk Grouping Key
// ============================================================================

/// Risk title used as the cross-control grouping key within a program.
///
/// # Invariants
/// - Grouping is by exact string equality of the wrapped title, not by
///   `RiskRegisterId`. Two register rows with identical title text are the
///   same risk for rollup purposes; retitling an entry moves its tests out of
///   their former sibling group on the next rollup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTitle(String);

impl RiskTitle {
    /// Creates a new risk title key.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RiskTitle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RiskTitle {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
