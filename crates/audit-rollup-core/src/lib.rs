// crates/audit-rollup-core/src/lib.rs
// ============================================================================
// Module: Audit Rollup Core Library
// Description: Public API surface for the Audit Rollup core.
// Purpose: Expose core types, interfaces, and the rollup engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Audit Rollup core provides the deterministic two-level status rollup for
//! audit test programs: procedure outcomes roll up to a control's
//! implementation status, and sibling controls sharing a risk title roll up
//! to the risk's mitigation status. It is backend-agnostic and integrates
//! through an explicit record-store interface rather than embedding into any
//! particular database client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::RecordStore;
pub use interfaces::SiblingTest;
pub use interfaces::StoreError;
pub use interfaces::TestRiskContext;
pub use runtime::InMemoryRecordStore;
pub use runtime::RiskIdentity;
pub use runtime::RiskResolution;
pub use runtime::RiskRollup;
pub use runtime::RollupEngine;
pub use runtime::RollupError;
pub use runtime::RollupOutcome;
pub use runtime::RollupStep;
pub use runtime::resolve_risk_identity;
