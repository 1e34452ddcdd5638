// crates/audit-rollup-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backed by SQLite WAL.
// Purpose: Persist audit rollup records in normalized, fail-closed tables.
// Dependencies: audit-rollup-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`RecordStore`] using `SQLite`. Records
//! live in four normalized tables mirroring the core record types. Status
//! columns hold the stable snake_case forms and are decoded fail-closed on
//! read; writes targeting missing rows return not-found instead of succeeding
//! silently, and the risk-status batch write runs inside one transaction so a
//! sibling group is never half-written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use audit_rollup_core::AuditId;
use audit_rollup_core::AuditProgram;
use audit_rollup_core::ControlStatus;
use audit_rollup_core::ControlTest;
use audit_rollup_core::Procedure;
use audit_rollup_core::ProcedureId;
use audit_rollup_core::ProcedureStatus;
use audit_rollup_core::ProgramId;
use audit_rollup_core::ProgramSnapshot;
use audit_rollup_core::RecordStore;
use audit_rollup_core::RiskRegisterEntry;
use audit_rollup_core::RiskRegisterId;
use audit_rollup_core::RiskStatus;
use audit_rollup_core::RiskTitle;
use audit_rollup_core::SiblingTest;
use audit_rollup_core::StoreError;
use audit_rollup_core::TestId;
use audit_rollup_core::TestRiskContext;
use audit_rollup_core::TestSnapshot;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` record store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// No row matched the targeted identifier.
    #[error("sqlite store row not found: {0}")]
    NotFound(String),
    /// Store corruption, including undecodable status text.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::NotFound(message) => Self::NotFound(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => {
                Self::Corrupt(format!("schema version mismatch: {message}"))
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error to a store error.
fn db_error(error: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(error.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed record store with WAL support.
#[derive(Clone, Debug)]
pub struct SqliteRecordStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens an `SQLite`-backed record store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or when an existing database carries an unsupported
    /// schema version.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the connection, mapping mutex poisoning to a store error.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Inserts or replaces a program row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn upsert_program(&self, program: &AuditProgram) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO programs (program_id, audit_id, status) VALUES (?1, ?2, ?3) ON \
                 CONFLICT(program_id) DO UPDATE SET audit_id = excluded.audit_id, status = \
                 excluded.status",
                params![program.program_id.as_str(), program.audit_id.as_str(), program.status],
            )
            .map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Inserts or replaces a risk register row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn upsert_risk_entry(&self, entry: &RiskRegisterEntry) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO risk_register (risk_register_id, risk_title, description) VALUES \
                 (?1, ?2, ?3) ON CONFLICT(risk_register_id) DO UPDATE SET risk_title = \
                 excluded.risk_title, description = excluded.description",
                params![
                    entry.risk_register_id.as_str(),
                    entry.risk_title.as_ref().map(RiskTitle::as_str),
                    entry.description
                ],
            )
            .map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Inserts or replaces a control test row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn upsert_test(&self, test: &ControlTest) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO control_tests (test_id, program_id, risk_register_id, \
                 issue_observation, control_status, risk_status) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT(test_id) DO UPDATE SET program_id = excluded.program_id, \
                 risk_register_id = excluded.risk_register_id, issue_observation = \
                 excluded.issue_observation, control_status = excluded.control_status, \
                 risk_status = excluded.risk_status",
                params![
                    test.test_id.as_str(),
                    test.program_id.as_str(),
                    test.risk_register_id.as_str(),
                    test.issue_observation,
                    test.control_status.as_str(),
                    test.risk_status.as_str()
                ],
            )
            .map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Inserts or replaces a procedure row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn upsert_procedure(&self, procedure: &Procedure) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO procedures (procedure_id, test_id, title, status) VALUES (?1, ?2, \
                 ?3, ?4) ON CONFLICT(procedure_id) DO UPDATE SET test_id = excluded.test_id, \
                 title = excluded.title, status = excluded.status",
                params![
                    procedure.procedure_id.as_str(),
                    procedure.test_id.as_str(),
                    procedure.title,
                    procedure.status.as_str()
                ],
            )
            .map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Loads a control test row by id.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the read fails or a status column
    /// does not decode.
    pub fn get_test(&self, test_id: &TestId) -> Result<Option<ControlTest>, SqliteStoreError> {
        let guard = self.lock()?;
        let row = guard
            .query_row(
                "SELECT test_id, program_id, risk_register_id, issue_observation, \
                 control_status, risk_status FROM control_tests WHERE test_id = ?1",
                params![test_id.as_str()],
                test_row,
            )
            .optional()
            .map_err(|err| db_error(&err))?;
        row.map(decode_test).transpose()
    }

    /// Loads a procedure row by id.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the read fails or the status column
    /// does not decode.
    pub fn get_procedure(
        &self,
        procedure_id: &ProcedureId,
    ) -> Result<Option<Procedure>, SqliteStoreError> {
        let guard = self.lock()?;
        let row = guard
            .query_row(
                "SELECT procedure_id, test_id, title, status FROM procedures WHERE procedure_id \
                 = ?1",
                params![procedure_id.as_str()],
                procedure_row,
            )
            .optional()
            .map_err(|err| db_error(&err))?;
        row.map(decode_procedure).transpose()
    }

    /// Builds the program, tests, and procedures read model for a program.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::NotFound`] when the program row is
    /// missing, or another [`SqliteStoreError`] when the read fails.
    pub fn program_snapshot(
        &self,
        program_id: &ProgramId,
    ) -> Result<ProgramSnapshot, SqliteStoreError> {
        let guard = self.lock()?;
        let program = guard
            .query_row(
                "SELECT program_id, audit_id, status FROM programs WHERE program_id = ?1",
                params![program_id.as_str()],
                |row| {
                    Ok(AuditProgram {
                        program_id: ProgramId::new(row.get::<_, String>(0)?),
                        audit_id: AuditId::new(row.get::<_, String>(1)?),
                        status: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| db_error(&err))?
            .ok_or_else(|| {
                SqliteStoreError::NotFound(format!("program not found: {program_id}"))
            })?;
        let tests = load_test_rows(&guard, program_id)?;
        let mut snapshots = Vec::with_capacity(tests.len());
        for (test, risk_title) in tests {
            let procedures = load_procedure_rows(&guard, &test.test_id)?;
            snapshots.push(TestSnapshot {
                test,
                risk_title,
                procedures,
            });
        }
        Ok(ProgramSnapshot {
            program,
            tests: snapshots,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn procedures_for_test(&self, test_id: &TestId) -> Result<Vec<Procedure>, StoreError> {
        let guard = self.lock().map_err(StoreError::from)?;
        load_procedure_rows(&guard, test_id).map_err(StoreError::from)
    }

    fn test_risk_context(&self, test_id: &TestId) -> Result<TestRiskContext, StoreError> {
        let guard = self.lock().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT t.program_id, r.risk_title FROM control_tests t LEFT JOIN risk_register \
                 r ON r.risk_register_id = t.risk_register_id WHERE t.test_id = ?1",
                params![test_id.as_str()],
                |row| {
                    let program_id: Option<String> = row.get(0)?;
                    let risk_title: Option<String> = row.get(1)?;
                    Ok((program_id, risk_title))
                },
            )
            .optional()
            .map_err(|err| StoreError::from(db_error(&err)))?;
        let Some((program_id, risk_title)) = row else {
            return Err(StoreError::NotFound(format!("control test not found: {test_id}")));
        };
        Ok(TestRiskContext {
            program_id: program_id.map(ProgramId::new),
            risk_title: risk_title.map(RiskTitle::new),
        })
    }

    fn tests_for_program(&self, program_id: &ProgramId) -> Result<Vec<SiblingTest>, StoreError> {
        let guard = self.lock().map_err(StoreError::from)?;
        let rows = load_test_rows(&guard, program_id).map_err(StoreError::from)?;
        Ok(rows
            .into_iter()
            .map(|(test, risk_title)| SiblingTest {
                test_id: test.test_id,
                control_status: test.control_status,
                risk_title,
            })
            .collect())
    }

    fn write_procedure_status(
        &self,
        procedure_id: &ProcedureId,
        status: ProcedureStatus,
    ) -> Result<(), StoreError> {
        let guard = self.lock().map_err(StoreError::from)?;
        let changed = guard
            .execute(
                "UPDATE procedures SET status = ?1 WHERE procedure_id = ?2",
                params![status.as_str(), procedure_id.as_str()],
            )
            .map_err(|err| StoreError::from(db_error(&err)))?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("procedure not found: {procedure_id}")));
        }
        Ok(())
    }

    fn write_control_status(
        &self,
        test_id: &TestId,
        status: ControlStatus,
    ) -> Result<(), StoreError> {
        let guard = self.lock().map_err(StoreError::from)?;
        let changed = guard
            .execute(
                "UPDATE control_tests SET control_status = ?1 WHERE test_id = ?2",
                params![status.as_str(), test_id.as_str()],
            )
            .map_err(|err| StoreError::from(db_error(&err)))?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("control test not found: {test_id}")));
        }
        Ok(())
    }

    fn write_risk_status_batch(
        &self,
        test_ids: &[TestId],
        status: RiskStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock().map_err(StoreError::from)?;
        let tx = guard.transaction().map_err(|err| StoreError::from(db_error(&err)))?;
        for test_id in test_ids {
            let changed = tx
                .execute(
                    "UPDATE control_tests SET risk_status = ?1 WHERE test_id = ?2",
                    params![status.as_str(), test_id.as_str()],
                )
                .map_err(|err| StoreError::from(db_error(&err)))?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("control test not found: {test_id}")));
            }
        }
        tx.commit().map_err(|err| StoreError::from(db_error(&err)))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Raw control test row before status decoding.
type RawTestRow = (String, String, String, bool, String, String);

/// Raw procedure row before status decoding.
type RawProcedureRow = (String, String, String, String);

/// Maps a control test result row to its raw column tuple.
fn test_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTestRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
}

/// Maps a procedure result row to its raw column tuple.
fn procedure_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProcedureRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

/// Decodes a raw control test row, failing closed on unknown status text.
fn decode_test(raw: RawTestRow) -> Result<ControlTest, SqliteStoreError> {
    let (test_id, program_id, risk_register_id, issue_observation, control_status, risk_status) =
        raw;
    let control_status = ControlStatus::parse(&control_status).ok_or_else(|| {
        SqliteStoreError::Corrupt(format!(
            "undecodable control_status '{control_status}' for test {test_id}"
        ))
    })?;
    let risk_status = RiskStatus::parse(&risk_status).ok_or_else(|| {
        SqliteStoreError::Corrupt(format!(
            "undecodable risk_status '{risk_status}' for test {test_id}"
        ))
    })?;
    Ok(ControlTest {
        test_id: TestId::new(test_id),
        program_id: ProgramId::new(program_id),
        risk_register_id: RiskRegisterId::new(risk_register_id),
        issue_observation,
        control_status,
        risk_status,
    })
}

/// Decodes a raw procedure row, failing closed on unknown status text.
fn decode_procedure(raw: RawProcedureRow) -> Result<Procedure, SqliteStoreError> {
    let (procedure_id, test_id, title, status) = raw;
    let status = ProcedureStatus::parse(&status).ok_or_else(|| {
        SqliteStoreError::Corrupt(format!(
            "undecodable procedure status '{status}' for procedure {procedure_id}"
        ))
    })?;
    Ok(Procedure {
        procedure_id: ProcedureId::new(procedure_id),
        test_id: TestId::new(test_id),
        title,
        status,
    })
}

/// Loads every control test in a program with its resolved risk title.
fn load_test_rows(
    connection: &Connection,
    program_id: &ProgramId,
) -> Result<Vec<(ControlTest, Option<RiskTitle>)>, SqliteStoreError> {
    let mut statement = connection
        .prepare(
            "SELECT t.test_id, t.program_id, t.risk_register_id, t.issue_observation, \
             t.control_status, t.risk_status, r.risk_title FROM control_tests t LEFT JOIN \
             risk_register r ON r.risk_register_id = t.risk_register_id WHERE t.program_id = ?1 \
             ORDER BY t.test_id",
        )
        .map_err(|err| db_error(&err))?;
    let rows = statement
        .query_map(params![program_id.as_str()], |row| {
            let raw = test_row(row)?;
            let risk_title: Option<String> = row.get(6)?;
            Ok((raw, risk_title))
        })
        .map_err(|err| db_error(&err))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| db_error(&err))?;
    rows.into_iter()
        .map(|(raw, risk_title)| Ok((decode_test(raw)?, risk_title.map(RiskTitle::new))))
        .collect()
}

/// Loads the full procedure set for a control test in id order.
fn load_procedure_rows(
    connection: &Connection,
    test_id: &TestId,
) -> Result<Vec<Procedure>, SqliteStoreError> {
    let mut statement = connection
        .prepare(
            "SELECT procedure_id, test_id, title, status FROM procedures WHERE test_id = ?1 \
             ORDER BY procedure_id",
        )
        .map_err(|err| db_error(&err))?;
    let rows = statement
        .query_map(params![test_id.as_str()], procedure_row)
        .map_err(|err| db_error(&err))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| db_error(&err))?;
    rows.into_iter().map(decode_procedure).collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
///
/// A bare relative filename has an empty parent component and needs no
/// directory creation.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
        }
        _ => Ok(()),
    }
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
            create_tables(&tx)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}

/// Creates the record tables and indexes.
fn create_tables(tx: &Transaction<'_>) -> Result<(), SqliteStoreError> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS programs (
            program_id TEXT PRIMARY KEY,
            audit_id TEXT NOT NULL,
            status TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS risk_register (
            risk_register_id TEXT PRIMARY KEY,
            risk_title TEXT,
            description TEXT
        );
        CREATE TABLE IF NOT EXISTS control_tests (
            test_id TEXT PRIMARY KEY,
            program_id TEXT NOT NULL,
            risk_register_id TEXT NOT NULL,
            issue_observation INTEGER NOT NULL,
            control_status TEXT NOT NULL,
            risk_status TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_control_tests_program_id
            ON control_tests (program_id);
        CREATE TABLE IF NOT EXISTS procedures (
            procedure_id TEXT PRIMARY KEY,
            test_id TEXT NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_procedures_test_id
            ON procedures (test_id);",
    )
    .map_err(|err| db_error(&err))
}
