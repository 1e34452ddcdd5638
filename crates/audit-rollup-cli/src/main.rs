// crates/audit-rollup-cli/src/main.rs
// ============================================================================
// Module: Audit Rollup CLI Entry Point
// Description: Command dispatcher for audit program and rollup workflows.
// Purpose: Provide a safe CLI for record upkeep and status recomputation.
// Dependencies: audit-rollup-config, audit-rollup-core, audit-rollup-store-sqlite, clap, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The audit rollup CLI maintains audit programs, risk register entries,
//! control tests, and procedures in a durable record store, and runs the
//! rollup engine after every mutation that can move a derived status. Command
//! results are emitted as JSON on stdout so callers can script against stable
//! shapes.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use audit_rollup_config::AuditRollupConfig;
use audit_rollup_core::AuditId;
use audit_rollup_core::AuditProgram;
use audit_rollup_core::ControlStatus;
use audit_rollup_core::ControlTest;
use audit_rollup_core::Procedure;
use audit_rollup_core::ProcedureId;
use audit_rollup_core::ProcedureStatus;
use audit_rollup_core::ProgramId;
use audit_rollup_core::RiskRegisterEntry;
use audit_rollup_core::RiskRegisterId;
use audit_rollup_core::RiskStatus;
use audit_rollup_core::RiskTitle;
use audit_rollup_core::RollupEngine;
use audit_rollup_core::RollupOutcome;
use audit_rollup_core::TestId;
use audit_rollup_store_sqlite::SqliteRecordStore;
use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "audit-rollup", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit program record operations.
    Program {
        /// Selected program subcommand.
        #[command(subcommand)]
        command: ProgramCommand,
    },
    /// Risk register record operations.
    Risk {
        /// Selected risk subcommand.
        #[command(subcommand)]
        command: RiskCommand,
    },
    /// Control test record operations.
    Test {
        /// Selected test subcommand.
        #[command(subcommand)]
        command: TestCommand,
    },
    /// Procedure step operations.
    Step {
        /// Selected step subcommand.
        #[command(subcommand)]
        command: StepCommand,
    },
    /// Recompute derived statuses for a control test.
    Recompute(RecomputeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Program subcommands.
#[derive(Subcommand, Debug)]
enum ProgramCommand {
    /// Create or replace an audit program record.
    Create(ProgramCreateCommand),
    /// Print the program's tests and procedures with derived statuses.
    Status(ProgramStatusCommand),
}

/// Risk register subcommands.
#[derive(Subcommand, Debug)]
enum RiskCommand {
    /// Create or replace a risk register entry.
    Add(RiskAddCommand),
}

/// Control test subcommands.
#[derive(Subcommand, Debug)]
enum TestCommand {
    /// Link a control test to a program and risk register entry.
    Link(TestLinkCommand),
}

/// Procedure step subcommands.
#[derive(Subcommand, Debug)]
enum StepCommand {
    /// Add a procedure step to a control test.
    Add(StepAddCommand),
    /// Mark a procedure step as passed and roll up.
    Pass(StepOutcomeCommand),
    /// Mark a procedure step as failed and roll up.
    Fail(StepOutcomeCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an audit rollup configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `program create`.
#[derive(clap::Args, Debug)]
struct ProgramCreateCommand {
    /// Program identifier.
    #[arg(long = "program-id", value_name = "PROGRAM_ID")]
    program_id: String,
    /// Owning audit identifier.
    #[arg(long = "audit-id", value_name = "AUDIT_ID")]
    audit_id: String,
    /// Free-form workflow status label.
    #[arg(long, value_name = "STATUS", default_value = "In Progress")]
    status: String,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `program status`.
#[derive(clap::Args, Debug)]
struct ProgramStatusCommand {
    /// Program identifier.
    #[arg(long = "program-id", value_name = "PROGRAM_ID")]
    program_id: String,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `risk add`.
#[derive(clap::Args, Debug)]
struct RiskAddCommand {
    /// Risk register entry identifier.
    #[arg(long = "risk-id", value_name = "RISK_ID")]
    risk_id: String,
    /// Risk title used for sibling grouping (omit for an untitled entry).
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,
    /// Optional free-form description.
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `test link`.
#[derive(clap::Args, Debug)]
struct TestLinkCommand {
    /// Control test identifier.
    #[arg(long = "test-id", value_name = "TEST_ID")]
    test_id: String,
    /// Owning program identifier.
    #[arg(long = "program-id", value_name = "PROGRAM_ID")]
    program_id: String,
    /// Referenced risk register entry identifier.
    #[arg(long = "risk-id", value_name = "RISK_ID")]
    risk_id: String,
    /// Flag the test as carrying an issue observation.
    #[arg(long = "issue-observation", action = ArgAction::SetTrue)]
    issue_observation: bool,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `step add`.
#[derive(clap::Args, Debug)]
struct StepAddCommand {
    /// Procedure step identifier.
    #[arg(long = "step-id", value_name = "STEP_ID")]
    step_id: String,
    /// Owning control test identifier.
    #[arg(long = "test-id", value_name = "TEST_ID")]
    test_id: String,
    /// Procedure title.
    #[arg(long, value_name = "TITLE")]
    title: String,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `step pass` and `step fail`.
#[derive(clap::Args, Debug)]
struct StepOutcomeCommand {
    /// Procedure step identifier.
    #[arg(long = "step-id", value_name = "STEP_ID")]
    step_id: String,
    /// Owning control test identifier.
    #[arg(long = "test-id", value_name = "TEST_ID")]
    test_id: String,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `recompute`.
#[derive(clap::Args, Debug)]
struct RecomputeCommand {
    /// Control test identifier.
    #[arg(long = "test-id", value_name = "TEST_ID")]
    test_id: String,
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `config validate`.
#[derive(clap::Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to audit-rollup.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("audit-rollup {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Program {
            command,
        } => command_program(command),
        Commands::Risk {
            command,
        } => command_risk(command),
        Commands::Test {
            command,
        } => command_test(command),
        Commands::Step {
            command,
        } => command_step(command),
        Commands::Recompute(command) => command_recompute(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    let rendered = command.render_long_help().to_string();
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Program Commands
// ============================================================================

/// Dispatches program subcommands.
fn command_program(command: ProgramCommand) -> CliResult<ExitCode> {
    match command {
        ProgramCommand::Create(command) => command_program_create(&command),
        ProgramCommand::Status(command) => command_program_status(&command),
    }
}

/// Executes `program create`.
fn command_program_create(command: &ProgramCreateCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let program = AuditProgram {
        program_id: ProgramId::new(command.program_id.clone()),
        audit_id: AuditId::new(command.audit_id.clone()),
        status: command.status.clone(),
    };
    store
        .upsert_program(&program)
        .map_err(|err| CliError::new(format!("program create failed: {err}")))?;
    write_json(&program)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `program status`.
fn command_program_status(command: &ProgramStatusCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let snapshot = store
        .program_snapshot(&ProgramId::new(command.program_id.clone()))
        .map_err(|err| CliError::new(format!("program status failed: {err}")))?;
    write_json(&snapshot)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Risk Commands
// ============================================================================

/// Dispatches risk subcommands.
fn command_risk(command: RiskCommand) -> CliResult<ExitCode> {
    match command {
        RiskCommand::Add(command) => command_risk_add(&command),
    }
}

/// Executes `risk add`.
fn command_risk_add(command: &RiskAddCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let entry = RiskRegisterEntry {
        risk_register_id: RiskRegisterId::new(command.risk_id.clone()),
        risk_title: command.title.clone().map(RiskTitle::new),
        description: command.description.clone(),
    };
    store
        .upsert_risk_entry(&entry)
        .map_err(|err| CliError::new(format!("risk add failed: {err}")))?;
    write_json(&entry)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Test Commands
// ============================================================================

/// Dispatches test subcommands.
fn command_test(command: TestCommand) -> CliResult<ExitCode> {
    match command {
        TestCommand::Link(command) => command_test_link(&command),
    }
}

/// Executes `test link`.
///
/// Linking a test changes the sibling set for its risk group, so the rollup
/// runs immediately; an evidence-free link downgrades the group.
fn command_test_link(command: &TestLinkCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let test_id = TestId::new(command.test_id.clone());
    let test = ControlTest {
        test_id: test_id.clone(),
        program_id: ProgramId::new(command.program_id.clone()),
        risk_register_id: RiskRegisterId::new(command.risk_id.clone()),
        issue_observation: command.issue_observation,
        control_status: ControlStatus::NotImplemented,
        risk_status: RiskStatus::NotMitigated,
    };
    store
        .upsert_test(&test)
        .map_err(|err| CliError::new(format!("test link failed: {err}")))?;
    let outcome = recompute(&store, &test_id)?;
    write_json(&outcome)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Step Commands
// ============================================================================

/// Dispatches step subcommands.
fn command_step(command: StepCommand) -> CliResult<ExitCode> {
    match command {
        StepCommand::Add(command) => command_step_add(&command),
        StepCommand::Pass(command) => command_step_outcome(&command, ProcedureStatus::Passed),
        StepCommand::Fail(command) => command_step_outcome(&command, ProcedureStatus::Failed),
    }
}

/// Executes `step add`.
///
/// A new pending step can demote a fully implemented control, so the rollup
/// runs immediately after the insert.
fn command_step_add(command: &StepAddCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let test_id = TestId::new(command.test_id.clone());
    let procedure = Procedure {
        procedure_id: ProcedureId::new(command.step_id.clone()),
        test_id: test_id.clone(),
        title: command.title.clone(),
        status: ProcedureStatus::Pending,
    };
    store
        .upsert_procedure(&procedure)
        .map_err(|err| CliError::new(format!("step add failed: {err}")))?;
    let outcome = recompute(&store, &test_id)?;
    write_json(&outcome)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `step pass` or `step fail`.
fn command_step_outcome(
    command: &StepOutcomeCommand,
    status: ProcedureStatus,
) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let engine = RollupEngine::new(store);
    let procedure_id = ProcedureId::new(command.step_id.clone());
    let test_id = TestId::new(command.test_id.clone());
    let outcome = engine
        .recompute_after_procedure_change(Some(&procedure_id), status, &test_id)
        .map_err(|err| CliError::new(format!("step outcome ({status}) failed: {err}")))?;
    write_json(&outcome)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Recompute Command
// ============================================================================

/// Executes `recompute`.
fn command_recompute(command: &RecomputeCommand) -> CliResult<ExitCode> {
    let store = open_store(command.config.as_deref())?;
    let outcome = recompute(&store, &TestId::new(command.test_id.clone()))?;
    write_json(&outcome)?;
    Ok(ExitCode::SUCCESS)
}

/// Runs the procedure-free rollup for a test.
fn recompute(store: &SqliteRecordStore, test_id: &TestId) -> CliResult<RollupOutcome> {
    let engine = RollupEngine::new(store.clone());
    engine
        .recompute_for_test(test_id)
        .map_err(|err| CliError::new(format!("recompute failed: {err}")))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    AuditRollupConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config validation failed: {err}")))?;
    write_stdout_line("configuration valid")
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Store Helpers
// ============================================================================

/// Opens the configured durable record store.
fn open_store(config_path: Option<&Path>) -> CliResult<SqliteRecordStore> {
    let config = AuditRollupConfig::load(config_path)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let store_config = config
        .record_store
        .to_sqlite_config()
        .map_err(|err| CliError::new(format!("record store config invalid: {err}")))?;
    SqliteRecordStore::new(store_config)
        .map_err(|err| CliError::new(format!("record store open failed: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes a value as a single JSON line on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string(value)
        .map_err(|err| CliError::new(format!("json serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
