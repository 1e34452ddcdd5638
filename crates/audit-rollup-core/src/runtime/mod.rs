// crates/audit-rollup-core/src/runtime/mod.rs
// ============================================================================
// Module: Audit Rollup Runtime
// Description: Rollup engine and in-memory store implementation.
// Purpose: Execute status rollups against any record store backend.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the rollup pipeline and a deterministic
//! in-memory store. All triggering surfaces must call into the same engine
//! logic to preserve the rollup invariants.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::RiskIdentity;
pub use engine::RiskResolution;
pub use engine::RiskRollup;
pub use engine::RollupEngine;
pub use engine::RollupError;
pub use engine::RollupOutcome;
pub use engine::RollupStep;
pub use engine::resolve_risk_identity;
pub use store::InMemoryRecordStore;
