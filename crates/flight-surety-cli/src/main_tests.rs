// crates/flight-surety-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and ledger wiring.
// Purpose: Ensure CLI inputs fail closed and commands reach the ledger.
// Dependencies: flight-surety-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the argument parsers, clap wiring, and the config-to-ledger
//! plumbing used by every ledger command.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use flight_surety_config::MAX_ACCOUNT_ID_LENGTH;
use flight_surety_config::SuretyConfig;
use flight_surety_core::AccountId;
use flight_surety_core::FlightId;
use flight_surety_core::FlightStatus;
use flight_surety_core::Wei;
use tempfile::TempDir;

use super::Cli;
use super::Commands;
use super::load_config;
use super::open_ledger;
use super::parse_account_id;
use super::parse_flight_status;
use super::parse_wei;
use super::run;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn write_sqlite_config(root: &Path) -> PathBuf {
    let config_path = root.join("flight-surety.toml");
    let db_path = root.join("ledger.db");
    let contents = format!(
        "[ledger]\nowner = \"0xowner\"\napp_id = \"0xapp\"\n\n[store]\ntype = \"sqlite\"\npath = \
         \"{}\"\n\n[audit]\nsink = \"none\"\n",
        db_path.display()
    );
    fs::write(&config_path, contents).expect("write config");
    config_path
}

fn run_args(config_path: &Path, args: &[&str]) -> Result<(), String> {
    let config = config_path.to_string_lossy().to_string();
    let mut argv = vec!["flight-surety", "--config", config.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).map_err(|err| err.to_string())?;
    run(cli).map(|_| ()).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Parser Tests
// ============================================================================

#[test]
fn parse_account_id_trims_and_rejects_empty() {
    assert_eq!(parse_account_id(" 0xa1 ").unwrap(), AccountId::new("0xa1"));
    assert!(parse_account_id("   ").is_err());
}

#[test]
fn parse_account_id_enforces_config_length_limit() {
    let longest = "a".repeat(MAX_ACCOUNT_ID_LENGTH);
    let parsed = parse_account_id(&longest).unwrap();
    assert_eq!(parsed, AccountId::new(longest));
    let err = parse_account_id(&"a".repeat(MAX_ACCOUNT_ID_LENGTH + 1)).unwrap_err();
    assert!(err.contains("exceeds max length"));

    let overlong = "a".repeat(MAX_ACCOUNT_ID_LENGTH + 1);
    let result = Cli::try_parse_from([
        "flight-surety",
        "authorize-caller",
        "--caller",
        "0xowner",
        "--identity",
        overlong.as_str(),
    ]);
    assert!(result.is_err());
}

#[test]
fn parse_wei_accepts_full_u128_range() {
    assert_eq!(parse_wei("0").unwrap(), Wei::new(0));
    assert_eq!(parse_wei(&u128::MAX.to_string()).unwrap(), Wei::new(u128::MAX));
    assert!(parse_wei("-1").is_err());
    assert!(parse_wei("1.5").is_err());
}

#[test]
fn parse_flight_status_maps_known_codes() {
    assert_eq!(parse_flight_status("0").unwrap(), FlightStatus::Unknown);
    assert_eq!(parse_flight_status("30").unwrap(), FlightStatus::LateWeather);
    let err = parse_flight_status("15").unwrap_err();
    assert!(err.contains("unknown status code 15"));
    assert!(parse_flight_status("256").is_err());
}

#[test]
fn cli_parses_toggle_value() {
    let cli = Cli::try_parse_from(["flight-surety", "set-operating", "--caller", "0xowner", "false"])
        .unwrap();
    match cli.command {
        Commands::SetOperating(command) => {
            assert_eq!(command.caller, AccountId::new("0xowner"));
            assert!(!command.enabled);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cli_register_airline_value_defaults_to_zero() {
    let cli = Cli::try_parse_from([
        "flight-surety",
        "register-airline",
        "--caller",
        "0xa1",
        "--airline",
        "0xa2",
    ])
    .unwrap();
    match cli.command {
        Commands::RegisterAirline(command) => assert_eq!(command.value, Wei::new(0)),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cli_rejects_unknown_status_code() {
    let result = Cli::try_parse_from([
        "flight-surety",
        "update-flight-status",
        "--flight",
        "0",
        "--status",
        "15",
    ]);
    assert!(result.is_err());
}

// ============================================================================
// SECTION: Wiring Tests
// ============================================================================

#[test]
fn load_config_reports_path_on_failure() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.toml");
    let err = load_config(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn open_ledger_uses_memory_store_by_default() {
    let config = SuretyConfig::from_toml_str(
        "[ledger]\nowner = \"0xowner\"\n\n[audit]\nsink = \"none\"\n",
    )
    .unwrap();
    let ledger = open_ledger(&config).unwrap();
    assert!(ledger.is_operational());
    assert_eq!(ledger.app_id(), &AccountId::new("flight-surety-app"));
    assert!(!ledger.data().is_authorized_caller(ledger.app_id()));
}

#[test]
fn commands_persist_through_sqlite_store() {
    let temp = TempDir::new().unwrap();
    let config_path = write_sqlite_config(temp.path());

    run_args(&config_path, &["init"]).unwrap();
    run_args(&config_path, &["register-airline-as-owner", "--caller", "0xowner", "--airline", "0xa1"])
        .unwrap();
    run_args(&config_path, &["fund", "--caller", "0xa1", "--value", "2000000000000000000"]).unwrap();
    run_args(&config_path, &["register-flight", "--caller", "0xa1", "--timestamp", "1900000000"])
        .unwrap();
    run_args(&config_path, &["update-flight-status", "--flight", "0", "--status", "20"]).unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    let ledger = open_ledger(&config).unwrap();
    assert!(ledger.data().is_funded_airline(&AccountId::new("0xa1")));
    let flight = ledger.get_flight(FlightId::new(0)).unwrap();
    assert_eq!(flight.status, FlightStatus::LateAirline);
}

#[test]
fn rejected_command_reports_error_kind() {
    let temp = TempDir::new().unwrap();
    let config_path = write_sqlite_config(temp.path());

    run_args(&config_path, &["init"]).unwrap();
    let err = run_args(&config_path, &["set-operating", "--caller", "0xa1", "false"]).unwrap_err();
    assert!(err.contains("(unauthorized)"));

    let err = run_args(&config_path, &["flight", "--id", "3"]).unwrap_err();
    assert!(err.contains("(flight_not_found)"));
}

#[test]
fn storage_channel_requires_init() {
    let temp = TempDir::new().unwrap();
    let config_path = write_sqlite_config(temp.path());

    let err = run_args(
        &config_path,
        &["register-airline-as-owner", "--caller", "0xowner", "--airline", "0xa1"],
    )
    .unwrap_err();
    assert!(err.contains("(not_authorized)"));
}

#[test]
fn config_example_refuses_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("flight-surety.toml");
    let output_arg = output.to_string_lossy().to_string();

    let args = ["flight-surety", "config", "example", "--output", output_arg.as_str()];
    run(Cli::try_parse_from(args).unwrap()).unwrap();
    SuretyConfig::load(Some(&output)).unwrap();

    assert!(run(Cli::try_parse_from(args).unwrap()).is_err());
    let forced = ["flight-surety", "config", "example", "--output", output_arg.as_str(), "--force"];
    run(Cli::try_parse_from(forced).unwrap()).unwrap();
}
