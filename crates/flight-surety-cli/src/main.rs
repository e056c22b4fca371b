// crates/flight-surety-cli/src/main.rs
// ============================================================================
// Module: Flight Surety CLI Entry Point
// Description: Command dispatcher for the flight surety ledger.
// Purpose: Drive ledger operations against a configured store from the shell.
// Dependencies: clap, flight-surety-config, flight-surety-core, serde, thiserror
// ============================================================================

//! ## Overview
//! The flight surety CLI opens the ledger described by `flight-surety.toml`
//! and executes one operation per invocation. Administrative calls go
//! straight to the storage component as the given caller; airline and flight
//! calls are relayed through the app-logic component configured as
//! `ledger.app_id`. Results are printed as canonical JSON on stdout; errors
//! go to stderr with a failure exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use flight_surety_config::AuditConfig;
use flight_surety_config::AuditSinkKind;
use flight_surety_config::DEFAULT_CONFIG_NAME;
use flight_surety_config::LedgerStoreConfig;
use flight_surety_config::MAX_ACCOUNT_ID_LENGTH;
use flight_surety_config::SuretyConfig;
use flight_surety_config::config_toml_example;
use flight_surety_core::AccountId;
use flight_surety_core::Airline;
use flight_surety_core::FileAuditSink;
use flight_surety_core::FlightId;
use flight_surety_core::FlightStatus;
use flight_surety_core::InMemoryLedgerStore;
use flight_surety_core::LedgerAuditSink;
use flight_surety_core::NoopAuditSink;
use flight_surety_core::SharedLedgerStore;
use flight_surety_core::StderrAuditSink;
use flight_surety_core::SuretyApp;
use flight_surety_core::SuretyData;
use flight_surety_core::SuretyError;
use flight_surety_core::Wei;
use flight_surety_store_sqlite::SqliteLedgerStore;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "flight-surety", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to flight-surety.toml or `FLIGHT_SURETY_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the ledger (creating genesis if empty) and authorize the app component.
    Init,
    /// Print the ledger summary.
    Status,
    /// Toggle the operational kill-switch (owner only).
    SetOperating(ToggleCommand),
    /// Add an identity to the storage allow-list (owner only).
    AuthorizeCaller(AuthorizeCallerCommand),
    /// Register an airline directly as the contract owner.
    RegisterAirlineAsOwner(RegisterAirlineCommand),
    /// Register an airline as a funded airline, optionally attaching a payment.
    RegisterAirline(RegisterAirlineWithValueCommand),
    /// Contribute funds toward the caller's funding threshold.
    Fund(FundCommand),
    /// Register a flight owned by the calling airline.
    RegisterFlight(RegisterFlightCommand),
    /// Overwrite a flight status through the app component.
    UpdateFlightStatus(UpdateFlightStatusCommand),
    /// Toggle testing mode (owner only).
    SetTestingMode(ToggleCommand),
    /// Fetch a flight by identifier.
    Flight(FlightQueryCommand),
    /// Fetch an airline record by address.
    Airline(AirlineQueryCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a flight surety configuration file.
    Validate,
    /// Print the canonical example configuration.
    Example(ConfigExampleCommand),
}

/// Arguments for owner-gated boolean toggles.
#[derive(Args, Debug)]
struct ToggleCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// New flag value.
    #[arg(value_name = "BOOL", action = ArgAction::Set)]
    enabled: bool,
}

/// Arguments for `authorize-caller`.
#[derive(Args, Debug)]
struct AuthorizeCallerCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// Identity to add to the allow-list.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    identity: AccountId,
}

/// Arguments for `register-airline-as-owner`.
#[derive(Args, Debug)]
struct RegisterAirlineCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// Airline address to register.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    airline: AccountId,
}

/// Arguments for `register-airline`.
#[derive(Args, Debug)]
struct RegisterAirlineWithValueCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// Airline address to register.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    airline: AccountId,
    /// Attached payment in wei, credited to the caller.
    #[arg(long, value_name = "WEI", default_value = "0", value_parser = parse_wei)]
    value: Wei,
}

/// Arguments for `fund`.
#[derive(Args, Debug)]
struct FundCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// Contribution in wei.
    #[arg(long, value_name = "WEI", value_parser = parse_wei)]
    value: Wei,
}

/// Arguments for `register-flight`.
#[derive(Args, Debug)]
struct RegisterFlightCommand {
    /// Calling identity.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    caller: AccountId,
    /// Scheduled departure (unix seconds).
    #[arg(long, value_name = "UNIX_SECONDS")]
    timestamp: u64,
}

/// Arguments for `update-flight-status`.
#[derive(Args, Debug)]
struct UpdateFlightStatusCommand {
    /// Flight identifier.
    #[arg(long, value_name = "ID")]
    flight: u64,
    /// Status code (0, 10, 20, 30, 40, 50).
    #[arg(long, value_name = "CODE", value_parser = parse_flight_status)]
    status: FlightStatus,
}

/// Arguments for `flight`.
#[derive(Args, Debug)]
struct FlightQueryCommand {
    /// Flight identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
}

/// Arguments for `airline`.
#[derive(Args, Debug)]
struct AirlineQueryCommand {
    /// Airline address.
    #[arg(long, value_name = "ACCOUNT", value_parser = parse_account_id)]
    address: AccountId,
}

/// Arguments for `config example`.
#[derive(Args, Debug)]
struct ConfigExampleCommand {
    /// Write the example to this path instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Overwrite an existing output file.
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,
}

/// Ledger summary printed by `status` and `init`.
#[derive(Debug, Serialize)]
struct LedgerStatus {
    /// Contract owner.
    owner: AccountId,
    /// App-logic component identity.
    app_id: AccountId,
    /// Whether the app component is on the allow-list.
    app_authorized: bool,
    /// Operational kill-switch.
    operational: bool,
    /// Testing mode flag.
    testing_mode: bool,
    /// Funding threshold.
    min_funding_wei: Wei,
    /// Number of registered airlines.
    registered_airlines: usize,
    /// Number of registered flights.
    flights: u64,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
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

/// Ledger handle used by the command handlers.
type Ledger = SuretyApp<SharedLedgerStore>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Config {
            command,
        } => command_config(config_path, command),
        Commands::Init => with_ledger(config_path, command_init),
        Commands::Status => with_ledger(config_path, command_status),
        Commands::SetOperating(command) => {
            with_ledger(config_path, |ledger| command_set_operating(ledger, &command))
        }
        Commands::AuthorizeCaller(command) => {
            with_ledger(config_path, |ledger| command_authorize_caller(ledger, &command))
        }
        Commands::RegisterAirlineAsOwner(command) => {
            with_ledger(config_path, |ledger| command_register_airline_as_owner(ledger, &command))
        }
        Commands::RegisterAirline(command) => {
            with_ledger(config_path, |ledger| command_register_airline(ledger, &command))
        }
        Commands::Fund(command) => with_ledger(config_path, |ledger| command_fund(ledger, &command)),
        Commands::RegisterFlight(command) => {
            with_ledger(config_path, |ledger| command_register_flight(ledger, &command))
        }
        Commands::UpdateFlightStatus(command) => {
            with_ledger(config_path, |ledger| command_update_flight_status(ledger, &command))
        }
        Commands::SetTestingMode(command) => {
            with_ledger(config_path, |ledger| command_set_testing_mode(ledger, &command))
        }
        Commands::Flight(command) => {
            with_ledger(config_path, |ledger| command_flight(ledger, &command))
        }
        Commands::Airline(command) => {
            with_ledger(config_path, |ledger| command_airline(ledger, &command))
        }
    }
}

/// Loads configuration, opens the ledger, and runs `command` against it.
fn with_ledger<F>(config_path: Option<&Path>, command: F) -> CliResult<ExitCode>
where
    F: FnOnce(&Ledger) -> CliResult<()>,
{
    let config = load_config(config_path)?;
    let ledger = open_ledger(&config)?;
    command(&ledger)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(config_path: Option<&Path>, command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            load_config(config_path)?;
            write_stdout_line("config valid")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Example(command) => command_config_example(&command),
    }
}

/// Executes `config example`.
fn command_config_example(command: &ConfigExampleCommand) -> CliResult<ExitCode> {
    let example = config_toml_example();
    let Some(output) = &command.output else {
        write_stdout_bytes(example.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };
    if output.exists() && !command.force {
        return Err(CliError::new(format!(
            "refusing to overwrite {} (use --force)",
            output.display()
        )));
    }
    fs::write(output, example)
        .map_err(|err| CliError::new(format!("failed to write {}: {err}", output.display())))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Ledger Commands
// ============================================================================

/// Executes `init`: authorizes the app component as the owner.
fn command_init(ledger: &Ledger) -> CliResult<()> {
    let data = ledger.data();
    data.add_authorized_caller(&data.owner(), ledger.app_id()).map_err(ledger_error)?;
    write_json(&ledger_status(ledger))
}

/// Executes `status`.
fn command_status(ledger: &Ledger) -> CliResult<()> {
    write_json(&ledger_status(ledger))
}

/// Executes `set-operating`.
fn command_set_operating(ledger: &Ledger, command: &ToggleCommand) -> CliResult<()> {
    ledger.data().set_operating_status(&command.caller, command.enabled).map_err(ledger_error)?;
    write_json(&json!({ "operational": ledger.is_operational() }))
}

/// Executes `authorize-caller`.
fn command_authorize_caller(ledger: &Ledger, command: &AuthorizeCallerCommand) -> CliResult<()> {
    ledger.data().add_authorized_caller(&command.caller, &command.identity).map_err(ledger_error)?;
    write_json(&json!({ "authorized": command.identity }))
}

/// Executes `register-airline-as-owner`.
fn command_register_airline_as_owner(
    ledger: &Ledger,
    command: &RegisterAirlineCommand,
) -> CliResult<()> {
    ledger.register_airline_as_owner(&command.caller, &command.airline).map_err(ledger_error)?;
    write_json(&airline_record(ledger, &command.airline))
}

/// Executes `register-airline`.
fn command_register_airline(
    ledger: &Ledger,
    command: &RegisterAirlineWithValueCommand,
) -> CliResult<()> {
    ledger
        .register_airline(&command.caller, &command.airline, command.value)
        .map_err(ledger_error)?;
    write_json(&airline_record(ledger, &command.airline))
}

/// Executes `fund`.
fn command_fund(ledger: &Ledger, command: &FundCommand) -> CliResult<()> {
    let record = ledger.fund(&command.caller, command.value).map_err(ledger_error)?;
    write_json(&record)
}

/// Executes `register-flight`.
fn command_register_flight(ledger: &Ledger, command: &RegisterFlightCommand) -> CliResult<()> {
    let id = ledger.register_flight(&command.caller, command.timestamp).map_err(ledger_error)?;
    write_json(&ledger.get_flight(id).map_err(ledger_error)?)
}

/// Executes `update-flight-status` through the app component's storage channel.
fn command_update_flight_status(
    ledger: &Ledger,
    command: &UpdateFlightStatusCommand,
) -> CliResult<()> {
    let id = FlightId::new(command.flight);
    ledger
        .data()
        .update_flight_status(ledger.app_id(), id, command.status)
        .map_err(ledger_error)?;
    write_json(&ledger.get_flight(id).map_err(ledger_error)?)
}

/// Executes `set-testing-mode`.
fn command_set_testing_mode(ledger: &Ledger, command: &ToggleCommand) -> CliResult<()> {
    ledger.set_testing_mode(&command.caller, command.enabled).map_err(ledger_error)?;
    write_json(&json!({ "testing_mode": ledger.is_testing_mode() }))
}

/// Executes `flight`.
fn command_flight(ledger: &Ledger, command: &FlightQueryCommand) -> CliResult<()> {
    write_json(&ledger.get_flight(FlightId::new(command.id)).map_err(ledger_error)?)
}

/// Executes `airline`.
fn command_airline(ledger: &Ledger, command: &AirlineQueryCommand) -> CliResult<()> {
    write_json(&airline_record(ledger, &command.address))
}

/// Builds the ledger summary.
fn ledger_status(ledger: &Ledger) -> LedgerStatus {
    let data = ledger.data();
    LedgerStatus {
        owner: data.owner(),
        app_id: ledger.app_id().clone(),
        app_authorized: data.is_authorized_caller(ledger.app_id()),
        operational: data.is_operational(),
        testing_mode: data.is_testing_mode(),
        min_funding_wei: data.config().min_funding,
        registered_airlines: data.registered_airline_count(),
        flights: data.flight_count(),
    }
}

/// Returns the airline record, or an unregistered placeholder for unknown addresses.
fn airline_record(ledger: &Ledger, address: &AccountId) -> Airline {
    ledger.data().airline(address).unwrap_or_else(|| Airline::new(address.clone()))
}

// ============================================================================
// SECTION: Ledger Wiring
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<SuretyConfig> {
    SuretyConfig::load(path).map_err(|err| {
        let shown =
            path.map_or_else(|| DEFAULT_CONFIG_NAME.to_string(), |p| p.display().to_string());
        CliError::new(format!("failed to load config {shown}: {err}"))
    })
}

/// Opens the ledger described by `config`.
fn open_ledger(config: &SuretyConfig) -> CliResult<Ledger> {
    let store = open_store(&config.store)?;
    let audit = open_audit_sink(&config.audit)?;
    let data = SuretyData::open(store, config.ledger_config(), audit).map_err(ledger_error)?;
    Ok(SuretyApp::new(config.ledger.app_id.clone(), Arc::new(data)))
}

/// Opens the configured ledger store.
fn open_store(config: &LedgerStoreConfig) -> CliResult<SharedLedgerStore> {
    match config.sqlite_config() {
        Some(sqlite) => SqliteLedgerStore::new(sqlite)
            .map(SharedLedgerStore::from_store)
            .map_err(|err| CliError::new(format!("failed to open ledger store: {err}"))),
        None => Ok(SharedLedgerStore::from_store(InMemoryLedgerStore::new())),
    }
}

/// Builds the configured audit sink.
fn open_audit_sink(config: &AuditConfig) -> CliResult<Arc<dyn LedgerAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::File, Some(path)) => FileAuditSink::new(Path::new(path.trim()))
            .map(|sink| Arc::new(sink) as Arc<dyn LedgerAuditSink>)
            .map_err(|err| CliError::new(format!("failed to open audit log {path}: {err}"))),
        (AuditSinkKind::File, None) => {
            Err(CliError::new("file audit sink requires audit.path".to_string()))
        }
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::Disabled, _) => Ok(Arc::new(NoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Argument Parsers
// ============================================================================

/// Parses a non-empty account identifier within the configured length limit.
fn parse_account_id(value: &str) -> Result<AccountId, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("account identifier must be non-empty".to_string());
    }
    if trimmed.len() > MAX_ACCOUNT_ID_LENGTH {
        return Err(format!(
            "account identifier exceeds max length of {MAX_ACCOUNT_ID_LENGTH} bytes"
        ));
    }
    Ok(AccountId::new(trimmed))
}

/// Parses a decimal wei amount.
fn parse_wei(value: &str) -> Result<Wei, String> {
    value.parse::<Wei>().map_err(|err| format!("invalid wei amount '{value}': {err}"))
}

/// Parses a numeric flight status code.
fn parse_flight_status(value: &str) -> Result<FlightStatus, String> {
    let code = value
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("invalid status code '{value}': {err}"))?;
    FlightStatus::from_code(code)
        .ok_or_else(|| format!("unknown status code {code} (expected 0, 10, 20, 30, 40, 50)"))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Formats a ledger error with its stable kind label.
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err adapter.")]
fn ledger_error(err: SuretyError) -> CliError {
    CliError::new(format!("{} ({})", err, err.kind()))
}

/// Writes a value to stdout as canonical JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to encode output: {err}")))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
