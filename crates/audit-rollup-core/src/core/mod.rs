// crates/audit-rollup-core/src/core/mod.rs
// ============================================================================
// Module: Audit Rollup Core Types
// Description: Canonical record, identifier, and status types.
// Purpose: Provide stable, serializable types for the rollup engine and stores.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the records the rollup engine operates on and the
//! deterministic status-derivation functions. These types are the canonical
//! source of truth for any store backend or API surface built on top.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod records;
pub mod status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::AuditId;
pub use identifiers::ProcedureId;
pub use identifiers::ProgramId;
pub use identifiers::RiskRegisterId;
pub use identifiers::RiskTitle;
pub use identifiers::TestId;
pub use records::AuditProgram;
pub use records::ControlTest;
pub use records::Procedure;
pub use records::ProgramSnapshot;
pub use records::RiskRegisterEntry;
pub use records::TestSnapshot;
pub use status::ControlStatus;
pub use status::ProcedureStatus;
pub use status::RiskStatus;
pub use status::control_status_for;
pub use status::risk_status_for;
