// crates/simulator-cli/src/main.rs
// ============================================================================
// Module: Simulator CLI Entry Point
// Description: Command dispatcher for step, plan, and interpreter workflows.
// Purpose: Drive the plan engine from the command line or a stdin pipe.
// Dependencies: clap, serde_json, simulator-config, simulator-core,
//               simulator-store-sqlite, thiserror
// ============================================================================

//! ## Overview
//! The `simulator` binary wires the plan engine to a configured state store
//! and audit sink. `run` executes a single step, `plan` executes a whole plan
//! document, and `interpreter` keeps one ledger alive across stdin lines so
//! a client process can stream steps and read one JSON response per line.
//! No program runtime is linked in; program calls fail with an interpreter
//! error while key and program-creation steps work end to end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use simulator_cli::line::parse_line;
use simulator_cli::t;
use simulator_config::AuditSinkType;
use simulator_config::SimulatorConfig;
use simulator_core::AuditLevel;
use simulator_core::Ed25519KeyStore;
use simulator_core::FileAuditSink;
use simulator_core::FileProgramLoader;
use simulator_core::FilteredAuditSink;
use simulator_core::InMemoryStateStore;
use simulator_core::NoopAuditSink;
use simulator_core::Plan;
use simulator_core::PlanRunner;
use simulator_core::PlanSource;
use simulator_core::Response;
use simulator_core::StateStore;
use simulator_core::StderrAuditSink;
use simulator_core::StepAuditSink;
use simulator_core::StepError;
use simulator_core::UnavailableInterpreter;
use simulator_store_sqlite::SqliteStateStore;
use simulator_store_sqlite::remove_database_files;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "simulator", disable_help_subcommand = true, disable_version_flag = true)]
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
    /// Run a single step and print its report.
    Run(RunCommand),
    /// Run every step of a plan document in order.
    Plan(PlanCommand),
    /// Read `run` commands from stdin and answer each with a JSON line.
    Interpreter(InterpreterCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Inline step JSON.
    #[arg(long, value_name = "JSON")]
    step: Option<String>,
    /// Path to a step JSON file.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Optional config file path (defaults to simulator.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
struct PlanCommand {
    /// Path to the plan document.
    #[arg(long, value_name = "PATH")]
    file: PathBuf,
    /// Print one JSON response per line instead of text reports.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    /// Optional config file path (defaults to simulator.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `interpreter` command.
#[derive(Args, Debug)]
struct InterpreterCommand {
    /// Remove the `SQLite` database files when input ends.
    #[arg(long, action = ArgAction::SetTrue)]
    cleanup: bool,
    /// Minimum audit level (overrides `[audit].level`).
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,
    /// Optional config file path (defaults to simulator.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a simulator configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to simulator.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Audit level accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevelArg {
    /// Diagnostic detail.
    Debug,
    /// Routine step lifecycle.
    Info,
    /// Failed or rejected steps only.
    Error,
}

impl From<LogLevelArg> for AuditLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Error => Self::Error,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
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
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(command),
        Commands::Plan(command) => command_plan(command),
        Commands::Interpreter(command) => command_interpreter(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints CLI help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Runner type used by the CLI.
type CliRunner = PlanRunner<Ed25519KeyStore, FileProgramLoader, UnavailableInterpreter>;

/// Runner plus the state store it operates on.
struct Session {
    /// Plan runner holding the ledger.
    runner: CliRunner,
    /// Configured state store.
    store: Box<dyn StateStore>,
    /// Database path when the store is `SQLite`-backed.
    sqlite_path: Option<PathBuf>,
}

impl Session {
    /// Builds a session from configuration.
    fn open(config: &SimulatorConfig) -> CliResult<Self> {
        let (store, sqlite_path): (Box<dyn StateStore>, Option<PathBuf>) =
            match config.state_store.sqlite_config() {
                Some(sqlite) => {
                    let path = sqlite.path.clone();
                    let store = SqliteStateStore::new(sqlite)
                        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))?;
                    (Box::new(store), Some(path))
                }
                None => (Box::new(InMemoryStateStore::new()), None),
            };
        let runner = PlanRunner::new(
            Ed25519KeyStore::new(),
            FileProgramLoader::new(config.limits.max_program_bytes),
            UnavailableInterpreter,
            config.runner_config(),
        )
        .with_audit_sink(build_audit_sink(config)?);
        Ok(Self {
            runner,
            store,
            sqlite_path,
        })
    }
}

/// Builds the configured audit sink, filtered to the configured level.
fn build_audit_sink(config: &SimulatorConfig) -> CliResult<Box<dyn StepAuditSink>> {
    let inner: Box<dyn StepAuditSink> = match (config.audit.sink, &config.audit.path) {
        (AuditSinkType::None, _) => return Ok(Box::new(NoopAuditSink)),
        (AuditSinkType::Stderr, _) | (AuditSinkType::File, None) => Box::new(StderrAuditSink),
        (AuditSinkType::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Box::new(sink)
        }
    };
    Ok(Box::new(FilteredAuditSink::new(inner, config.audit.level)))
}

/// Loads configuration for a command.
fn load_config(path: Option<&std::path::Path>) -> CliResult<SimulatorConfig> {
    SimulatorConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Step Commands
// ============================================================================

/// Executes the `run` command.
fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let mut session = Session::open(&config)?;
    let step = session.runner.ledger().next_step();
    let response = PlanSource::from_options(command.step, command.file)
        .and_then(|source| session.runner.run(session.store.as_mut(), &source))
        .map_err(|err| CliError::new(t!("run.rejected", step = step, error = err)))?;
    write_stdout_line(&response.render_report())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(exit_code(response.is_success()))
}

/// Executes the `plan` command.
fn command_plan(command: PlanCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let plan = Plan::load(&PlanSource::File(command.file), config.limits.max_plan_bytes)
        .map_err(|err| CliError::new(t!("plan.load_failed", error = err)))?;
    let mut session = Session::open(&config)?;
    let outcome = session.runner.run_plan(session.store.as_mut(), plan);

    for (position, response) in outcome.responses.iter().enumerate() {
        if command.json {
            write_response_json(response)?;
        } else {
            if position > 0 {
                write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
            write_stdout_line(&response.render_report())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    if let Some(rejection) = &outcome.rejection {
        return Err(CliError::new(t!(
            "plan.halted",
            step = rejection.step,
            error = rejection.error
        )));
    }
    Ok(exit_code(outcome.responses.iter().all(Response::is_success)))
}

// ============================================================================
// SECTION: Interpreter Command
// ============================================================================

/// Executes the `interpreter` command.
fn command_interpreter(command: InterpreterCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(level) = command.log_level {
        config.audit.level = level.into();
    }
    let mut session = Session::open(&config)?;
    let served = serve_lines(&mut session, &mut std::io::stdin().lock());

    let Session {
        store,
        sqlite_path,
        ..
    } = session;
    drop(store);
    let cleaned = match sqlite_path {
        Some(path) if command.cleanup => remove_database_files(&path)
            .map_err(|err| CliError::new(t!("interpreter.cleanup_failed", error = err))),
        _ => Ok(()),
    };
    served?;
    cleaned?;
    Ok(ExitCode::SUCCESS)
}

/// Answers every input line with one JSON response until input ends.
///
/// Blank lines are skipped. Lines that are not UTF-8 or do not parse are
/// answered with a malformed-plan rejection and the session continues.
fn serve_lines(session: &mut Session, input: &mut impl BufRead) -> CliResult<()> {
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = input
            .read_until(b'\n', &mut buffer)
            .map_err(|err| CliError::new(t!("interpreter.read_failed", error = err)))?;
        if read == 0 {
            return Ok(());
        }
        let response = match std::str::from_utf8(&buffer) {
            Ok(line) => match parse_line(line.trim_end_matches(['\n', '\r'])) {
                Ok(None) => continue,
                Ok(Some(run)) => match PlanSource::from_options(run.step, run.file) {
                    Ok(source) => session.runner.respond(session.store.as_mut(), &source),
                    Err(err) => session.runner.reject(&err),
                },
                Err(err) => session.runner.reject(&StepError::MalformedPlan(err.to_string())),
            },
            Err(err) => session.runner.reject(&StepError::MalformedPlan(format!(
                "input line is not valid utf-8: {err}"
            ))),
        };
        write_response_json(&response)?;
    }
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

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Maps a step outcome to a process exit code.
fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Writes a response as a single JSON line to stdout.
fn write_response_json(response: &Response) -> CliResult<()> {
    let payload = serde_json::to_string(response)
        .map_err(|err| CliError::new(t!("response.serialize_failed", error = err)))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")?;
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
