// crates/audit-rollup-core/src/runtime/store.rs
// ============================================================================
// Module: Audit Rollup In-Memory Store
// Description: Simple in-memory record store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RecordStore`]
//! for tests and local demos. It is not intended for production use. All
//! record maps live behind one mutex; each trait operation is therefore
//! atomic at the row level, matching the contract the engine relies on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::AuditProgram;
use crate::core::ControlStatus;
use crate::core::ControlTest;
use crate::core::Procedure;
use crate::core::ProcedureId;
use crate::core::ProcedureStatus;
use crate::core::ProgramId;
use crate::core::ProgramSnapshot;
use crate::core::RiskRegisterEntry;
use crate::core::RiskRegisterId;
use crate::core::RiskStatus;
use crate::core::RiskTitle;
use crate::core::TestId;
use crate::core::TestSnapshot;
use crate::interfaces::RecordStore;
use crate::interfaces::SiblingTest;
use crate::interfaces::StoreError;
use crate::interfaces::TestRiskContext;

// ============================================================================
// SECTION: Record Maps
// ============================================================================

/// Record maps guarded together by the store mutex.
#[derive(Debug, Default)]
struct Records {
    /// Program rows keyed by program id.
    programs: BTreeMap<ProgramId, AuditProgram>,
    /// Risk register rows keyed by register id.
    risk_entries: BTreeMap<RiskRegisterId, RiskRegisterEntry>,
    /// Control test rows keyed by test id.
    tests: BTreeMap<TestId, ControlTest>,
    /// Procedure rows keyed by procedure id.
    procedures: BTreeMap<ProcedureId, Procedure>,
}

impl Records {
    /// Resolves the risk title for a register id, if present.
    fn risk_title_of(&self, risk_register_id: &RiskRegisterId) -> Option<RiskTitle> {
        self.risk_entries.get(risk_register_id).and_then(|entry| entry.risk_title.clone())
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    /// Record maps protected by a mutex.
    records: Arc<Mutex<Records>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory record store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Records::default())),
        }
    }

    /// Locks the record maps, mapping mutex poisoning to a store error.
    fn lock(&self) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Store("record store mutex poisoned".to_string()))
    }

    /// Inserts or replaces a program row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn upsert_program(&self, program: AuditProgram) -> Result<(), StoreError> {
        self.lock()?.programs.insert(program.program_id.clone(), program);
        Ok(())
    }

    /// Inserts or replaces a risk register row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn upsert_risk_entry(&self, entry: RiskRegisterEntry) -> Result<(), StoreError> {
        self.lock()?.risk_entries.insert(entry.risk_register_id.clone(), entry);
        Ok(())
    }

    /// Inserts or replaces a control test row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn upsert_test(&self, test: ControlTest) -> Result<(), StoreError> {
        self.lock()?.tests.insert(test.test_id.clone(), test);
        Ok(())
    }

    /// Inserts or replaces a procedure row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn upsert_procedure(&self, procedure: Procedure) -> Result<(), StoreError> {
        self.lock()?.procedures.insert(procedure.procedure_id.clone(), procedure);
        Ok(())
    }

    /// Loads a control test row by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn get_test(&self, test_id: &TestId) -> Result<Option<ControlTest>, StoreError> {
        Ok(self.lock()?.tests.get(test_id).cloned())
    }

    /// Loads a procedure row by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn get_procedure(
        &self,
        procedure_id: &ProcedureId,
    ) -> Result<Option<Procedure>, StoreError> {
        Ok(self.lock()?.procedures.get(procedure_id).cloned())
    }

    /// Builds the program → tests → procedures read model for a program.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the program row is missing, or
    /// another [`StoreError`] when the store is unavailable.
    pub fn program_snapshot(&self, program_id: &ProgramId) -> Result<ProgramSnapshot, StoreError> {
        let records = self.lock()?;
        let program = records
            .programs
            .get(program_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("program not found: {program_id}")))?;
        let tests = records
            .tests
            .values()
            .filter(|test| &test.program_id == program_id)
            .map(|test| TestSnapshot {
                risk_title: records.risk_title_of(&test.risk_register_id),
                procedures: records
                    .procedures
                    .values()
                    .filter(|procedure| procedure.test_id == test.test_id)
                    .cloned()
                    .collect(),
                test: test.clone(),
            })
            .collect();
        Ok(ProgramSnapshot {
            program,
            tests,
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn procedures_for_test(&self, test_id: &TestId) -> Result<Vec<Procedure>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .procedures
            .values()
            .filter(|procedure| &procedure.test_id == test_id)
            .cloned()
            .collect())
    }

    fn test_risk_context(&self, test_id: &TestId) -> Result<TestRiskContext, StoreError> {
        let records = self.lock()?;
        let test = records
            .tests
            .get(test_id)
            .ok_or_else(|| StoreError::NotFound(format!("control test not found: {test_id}")))?;
        Ok(TestRiskContext {
            program_id: Some(test.program_id.clone()),
            risk_title: records.risk_title_of(&test.risk_register_id),
        })
    }

    fn tests_for_program(&self, program_id: &ProgramId) -> Result<Vec<SiblingTest>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .tests
            .values()
            .filter(|test| &test.program_id == program_id)
            .map(|test| SiblingTest {
                test_id: test.test_id.clone(),
                control_status: test.control_status,
                risk_title: records.risk_title_of(&test.risk_register_id),
            })
            .collect())
    }

    fn write_procedure_status(
        &self,
        procedure_id: &ProcedureId,
        status: ProcedureStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        let procedure = records.procedures.get_mut(procedure_id).ok_or_else(|| {
            StoreError::NotFound(format!("procedure not found: {procedure_id}"))
        })?;
        procedure.status = status;
        Ok(())
    }

    fn write_control_status(
        &self,
        test_id: &TestId,
        status: ControlStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        let test = records
            .tests
            .get_mut(test_id)
            .ok_or_else(|| StoreError::NotFound(format!("control test not found: {test_id}")))?;
        test.control_status = status;
        Ok(())
    }

    fn write_risk_status_batch(
        &self,
        test_ids: &[TestId],
        status: RiskStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        for test_id in test_ids {
            let test = records.tests.get_mut(test_id).ok_or_else(|| {
                StoreError::NotFound(format!("control test not found: {test_id}"))
            })?;
            test.risk_status = status;
        }
        Ok(())
    }
}
