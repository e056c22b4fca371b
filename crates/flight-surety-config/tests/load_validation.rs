//! Config load validation tests for flight-surety-config.
// crates/flight-surety-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, parse).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use flight_surety_config::ConfigError;
use flight_surety_config::LedgerStoreType;
use flight_surety_config::SuretyConfig;
use tempfile::NamedTempFile;

mod common;

type TestResult = Result<(), String>;

fn write_config(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_accepts_minimal_file() -> TestResult {
    let file = write_config(common::MINIMAL_TOML.as_bytes())?;
    let config = SuretyConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.ledger.owner.as_str() != "0xowner" {
        return Err("owner not loaded".to_string());
    }
    if config.store.store_type != LedgerStoreType::Memory {
        return Err("store should default to memory".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("absent.toml");
    match SuretyConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected io error".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    common::assert_invalid(SuretyConfig::load(Some(path)), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    common::assert_invalid(SuretyConfig::load(Some(path)), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    common::assert_invalid(SuretyConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    common::assert_invalid(SuretyConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_missing_ledger_section() -> TestResult {
    let file = write_config(b"[store]\ntype = \"memory\"\n")?;
    match SuretyConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected parse error".to_string()),
    }
}

#[test]
fn load_rejects_malformed_wei_amount() -> TestResult {
    let file = write_config(b"[ledger]\nowner = \"0xowner\"\nmin_funding_wei = \"two\"\n")?;
    common::assert_invalid(SuretyConfig::load(Some(file.path())), "invalid wei amount")
}

#[test]
fn load_runs_validation() -> TestResult {
    let file = write_config(b"[ledger]\nowner = \"0xowner\"\n\n[store]\ntype = \"sqlite\"\n")?;
    common::assert_invalid(SuretyConfig::load(Some(file.path())), "sqlite store requires path")
}
