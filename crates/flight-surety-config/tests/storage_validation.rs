//! Store and audit config validation tests for flight-surety-config.
// crates/flight-surety-config/tests/storage_validation.rs
// =============================================================================
// Module: Storage Config Validation Tests
// Description: Validate ledger store and audit sink constraints.
// Purpose: Ensure storage configuration remains secure and deterministic.
// =============================================================================

use std::path::PathBuf;

use flight_surety_config::AuditSinkKind;
use flight_surety_config::LedgerStoreType;
use flight_surety_store_sqlite::SqliteStoreMode;
use flight_surety_store_sqlite::SqliteSyncMode;

mod common;

type TestResult = Result<(), String>;

#[test]
fn memory_store_rejects_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.path = Some(PathBuf::from("ledger.db"));
    common::assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn memory_store_has_no_sqlite_config() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.store.sqlite_config().is_some() {
        return Err("memory store must not yield sqlite config".to_string());
    }
    Ok(())
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = LedgerStoreType::Sqlite;
    common::assert_invalid(config.validate(), "sqlite store requires path")
}

#[test]
fn sqlite_store_rejects_long_component() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = LedgerStoreType::Sqlite;
    config.store.path = Some(PathBuf::from("a".repeat(256)));
    common::assert_invalid(config.validate(), "store path component too long")
}

#[test]
fn sqlite_store_rejects_zero_busy_timeout() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = LedgerStoreType::Sqlite;
    config.store.path = Some(PathBuf::from("ledger.db"));
    config.store.busy_timeout_ms = 0;
    common::assert_invalid(config.validate(), "store busy_timeout_ms must be greater than zero")
}

#[test]
fn sqlite_store_settings_parse() -> TestResult {
    let config = common::config_from_toml(
        "[ledger]\nowner = \"0xowner\"\n\n[store]\ntype = \"sqlite\"\npath = \"data/ledger.db\"\n\
         journal_mode = \"delete\"\nsync_mode = \"normal\"\nbusy_timeout_ms = 250\n",
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite_config().ok_or("expected sqlite config")?;
    if sqlite.path != PathBuf::from("data/ledger.db") || sqlite.busy_timeout_ms != 250 {
        return Err("sqlite path or timeout not carried".to_string());
    }
    if sqlite.journal_mode != SqliteStoreMode::Delete || sqlite.sync_mode != SqliteSyncMode::Normal
    {
        return Err("sqlite pragmas not carried".to_string());
    }
    Ok(())
}

#[test]
fn unknown_store_type_fails_parse() -> TestResult {
    let result =
        common::config_from_toml("[ledger]\nowner = \"0xowner\"\n\n[store]\ntype = \"postgres\"\n");
    if result.is_ok() {
        return Err("unknown store type should not parse".to_string());
    }
    Ok(())
}

#[test]
fn audit_defaults_to_stderr() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("audit sink should default to stderr".to_string());
    }
    Ok(())
}

#[test]
fn file_audit_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    common::assert_invalid(config.validate(), "file audit sink requires audit.path")
}

#[test]
fn file_audit_rejects_blank_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    config.audit.path = Some("  ".to_string());
    common::assert_invalid(config.validate(), "audit.path must be non-empty")
}

#[test]
fn non_file_audit_rejects_path() -> TestResult {
    let config = common::config_from_toml(
        "[ledger]\nowner = \"0xowner\"\n\n[audit]\nsink = \"none\"\npath = \"audit.jsonl\"\n",
    )
    .map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::Disabled {
        return Err("sink none should parse as disabled".to_string());
    }
    common::assert_invalid(config.validate(), "audit.path is only valid with the file sink")
}
