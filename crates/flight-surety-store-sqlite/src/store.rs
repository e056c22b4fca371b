// crates/flight-surety-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable LedgerStore backed by SQLite WAL.
// Purpose: Persist ledger tables with a verified canonical snapshot hash.
// Dependencies: flight-surety-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`LedgerStore`] using `SQLite`. Each save
//! rewrites the ledger tables inside one transaction and records the SHA-256
//! hash of the canonical JSON snapshot in `ledger_meta`. Loads rebuild the
//! snapshot from the tables, recompute the hash, and fail closed on mismatch
//! or on any row that does not decode.
//!
//! Database contents are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use flight_surety_core::AccountId;
use flight_surety_core::Airline;
use flight_surety_core::Flight;
use flight_surety_core::FlightId;
use flight_surety_core::FlightStatus;
use flight_surety_core::LedgerState;
use flight_surety_core::LedgerStore;
use flight_surety_core::StoreError;
use flight_surety_core::Wei;
use flight_surety_core::hashing::DEFAULT_HASH_ALGORITHM;
use flight_surety_core::hashing::HashAlgorithm;
use flight_surety_core::hashing::hash_canonical_json;
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
/// Primary key of the singleton metadata row.
const LEDGER_META_ROW: i64 = 1;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
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
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
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

/// Configuration for the `SQLite` ledger store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
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

impl SqliteStoreConfig {
    /// Creates a configuration for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err adapter.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Metadata recorded with the latest saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerMetadata {
    /// Contract owner stored at genesis.
    pub owner: AccountId,
    /// Hex digest of the canonical snapshot.
    pub state_hash: String,
    /// Algorithm used for `state_hash`.
    pub hash_algorithm: HashAlgorithm,
    /// Unix milliseconds of the last save.
    pub saved_at: i64,
}

/// `SQLite`-backed ledger store with WAL support.
///
/// # Invariants
/// - Loads verify the stored snapshot hash before returning state.
/// - `SQLite` connection access is serialized through a mutex.
#[derive(Clone)]
pub struct SqliteLedgerStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLedgerStore {
    /// Opens an `SQLite`-backed ledger store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns metadata for the saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or the row is invalid.
    pub fn metadata(&self) -> Result<Option<LedgerMetadata>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
        let row = guard
            .query_row(
                "SELECT owner, state_hash, hash_algorithm, saved_at FROM ledger_meta WHERE id = ?1",
                params![LEDGER_META_ROW],
                |row| {
                    let owner: String = row.get(0)?;
                    let hash: String = row.get(1)?;
                    let algorithm: String = row.get(2)?;
                    let saved_at: i64 = row.get(3)?;
                    Ok((owner, hash, algorithm, saved_at))
                },
            )
            .optional()
            .map_err(db_error)?;
        drop(guard);
        let Some((owner, state_hash, algorithm, saved_at)) = row else {
            return Ok(None);
        };
        Ok(Some(LedgerMetadata {
            owner: AccountId::new(owner),
            state_hash,
            hash_algorithm: parse_hash_algorithm(&algorithm)?,
            saved_at,
        }))
    }

    /// Loads and verifies the saved ledger snapshot.
    fn load_state(&self) -> Result<Option<LedgerState>, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
        let loaded = {
            let tx = guard.transaction().map_err(db_error)?;
            let loaded = read_snapshot(&tx)?;
            tx.commit().map_err(db_error)?;
            loaded
        };
        drop(guard);
        let Some((state, stored_hash, algorithm)) = loaded else {
            return Ok(None);
        };
        let expected = hash_canonical_json(algorithm, &state)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if expected.value != stored_hash {
            return Err(SqliteStoreError::Corrupt("ledger state hash mismatch".to_string()));
        }
        state.validate().map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        Ok(Some(state))
    }

    /// Rewrites the ledger tables with `state` in one transaction.
    fn save_state(&self, state: &LedgerState) -> Result<(), SqliteStoreError> {
        state.validate().map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let digest = hash_canonical_json(DEFAULT_HASH_ALGORITHM, state)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
        {
            let tx = guard.transaction().map_err(db_error)?;
            write_snapshot(&tx, state, &digest.value, digest.algorithm)?;
            tx.commit().map_err(db_error)?;
        }
        drop(guard);
        Ok(())
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        self.load_state().map_err(StoreError::from)
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        self.save_state(state).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Snapshot IO
// ============================================================================

/// Raw metadata row.
struct MetaRow {
    /// Stored owner identity.
    owner: String,
    /// Stored operational flag.
    operational: bool,
    /// Stored testing mode flag.
    testing_mode: bool,
    /// Stored snapshot hash.
    state_hash: String,
    /// Stored hash algorithm label.
    hash_algorithm: String,
}

/// Reads the snapshot and its stored hash inside `tx`.
fn read_snapshot(
    tx: &Transaction<'_>,
) -> Result<Option<(LedgerState, String, HashAlgorithm)>, SqliteStoreError> {
    let meta = tx
        .query_row(
            "SELECT owner, operational, testing_mode, state_hash, hash_algorithm FROM ledger_meta \
             WHERE id = ?1",
            params![LEDGER_META_ROW],
            |row| {
                Ok(MetaRow {
                    owner: row.get(0)?,
                    operational: row.get(1)?,
                    testing_mode: row.get(2)?,
                    state_hash: row.get(3)?,
                    hash_algorithm: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(db_error)?;
    let Some(meta) = meta else {
        let orphaned: i64 = tx
            .query_row(
                "SELECT (SELECT COUNT(1) FROM authorized_callers) + (SELECT COUNT(1) FROM \
                 airlines) + (SELECT COUNT(1) FROM flights)",
                params![],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        if orphaned > 0 {
            return Err(SqliteStoreError::Corrupt(
                "ledger rows present without metadata".to_string(),
            ));
        }
        return Ok(None);
    };
    let algorithm = parse_hash_algorithm(&meta.hash_algorithm)?;
    let mut state = LedgerState::genesis(AccountId::new(meta.owner));
    state.operational = meta.operational;
    state.testing_mode = meta.testing_mode;

    {
        let mut stmt = tx
            .prepare_cached("SELECT identity FROM authorized_callers ORDER BY identity")
            .map_err(db_error)?;
        let rows = stmt.query_map(params![], |row| row.get::<_, String>(0)).map_err(db_error)?;
        for identity in rows {
            state.authorized_callers.insert(AccountId::new(identity.map_err(db_error)?));
        }
    }
    {
        let mut stmt = tx
            .prepare_cached(
                "SELECT address, registered, funded, balance FROM airlines ORDER BY address",
            )
            .map_err(db_error)?;
        let rows = stmt
            .query_map(params![], |row| {
                let address: String = row.get(0)?;
                let registered: bool = row.get(1)?;
                let funded: bool = row.get(2)?;
                let balance: String = row.get(3)?;
                Ok((address, registered, funded, balance))
            })
            .map_err(db_error)?;
        for row in rows {
            let (address, registered, funded, balance) = row.map_err(db_error)?;
            let balance = balance.parse::<Wei>().map_err(|err| {
                SqliteStoreError::Invalid(format!("invalid balance for airline {address}: {err}"))
            })?;
            let address = AccountId::new(address);
            state.airlines.insert(address.clone(), Airline {
                address,
                registered,
                funded,
                balance,
            });
        }
    }
    {
        let mut stmt = tx
            .prepare_cached("SELECT id, airline, departure, status FROM flights ORDER BY id")
            .map_err(db_error)?;
        let rows = stmt
            .query_map(params![], |row| {
                let id: i64 = row.get(0)?;
                let airline: String = row.get(1)?;
                let departure: i64 = row.get(2)?;
                let status: i64 = row.get(3)?;
                Ok((id, airline, departure, status))
            })
            .map_err(db_error)?;
        for row in rows {
            let (id, airline, departure, status) = row.map_err(db_error)?;
            state.flights.push(decode_flight(id, airline, departure, status)?);
        }
    }
    Ok(Some((state, meta.state_hash, algorithm)))
}

/// Replaces the ledger tables with `state` inside `tx`.
fn write_snapshot(
    tx: &Transaction<'_>,
    state: &LedgerState,
    state_hash: &str,
    algorithm: HashAlgorithm,
) -> Result<(), SqliteStoreError> {
    tx.execute(
        "INSERT INTO ledger_meta (id, owner, operational, testing_mode, state_hash, \
         hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT(id) DO UPDATE \
         SET owner = excluded.owner, operational = excluded.operational, testing_mode = \
         excluded.testing_mode, state_hash = excluded.state_hash, hash_algorithm = \
         excluded.hash_algorithm, saved_at = excluded.saved_at",
        params![
            LEDGER_META_ROW,
            state.owner.as_str(),
            state.operational,
            state.testing_mode,
            state_hash,
            algorithm.label(),
            unix_millis()
        ],
    )
    .map_err(db_error)?;
    tx.execute_batch(
        "DELETE FROM flights;
         DELETE FROM airlines;
         DELETE FROM authorized_callers;",
    )
    .map_err(db_error)?;
    {
        let mut stmt = tx
            .prepare_cached("INSERT INTO authorized_callers (identity) VALUES (?1)")
            .map_err(db_error)?;
        for identity in &state.authorized_callers {
            stmt.execute(params![identity.as_str()]).map_err(db_error)?;
        }
    }
    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO airlines (address, registered, funded, balance) VALUES (?1, ?2, ?3, \
                 ?4)",
            )
            .map_err(db_error)?;
        for airline in state.airlines.values() {
            stmt.execute(params![
                airline.address.as_str(),
                airline.registered,
                airline.funded,
                airline.balance.to_string()
            ])
            .map_err(db_error)?;
        }
    }
    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO flights (id, airline, departure, status) VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(db_error)?;
        for flight in &state.flights {
            let id = i64::try_from(flight.id.get()).map_err(|_| {
                SqliteStoreError::Invalid(format!("flight id {} exceeds storage range", flight.id))
            })?;
            let departure = i64::try_from(flight.timestamp).map_err(|_| {
                SqliteStoreError::Invalid(format!(
                    "departure timestamp of flight {} exceeds storage range",
                    flight.id
                ))
            })?;
            stmt.execute(params![
                id,
                flight.airline.as_str(),
                departure,
                i64::from(flight.status.code())
            ])
            .map_err(db_error)?;
        }
    }
    Ok(())
}

/// Decodes a stored flight row.
fn decode_flight(
    id: i64,
    airline: String,
    departure: i64,
    status: i64,
) -> Result<Flight, SqliteStoreError> {
    let id = u64::try_from(id)
        .map_err(|_| SqliteStoreError::Invalid(format!("negative flight id {id}")))?;
    let timestamp = u64::try_from(departure).map_err(|_| {
        SqliteStoreError::Invalid(format!("negative departure timestamp for flight {id}"))
    })?;
    let status = u8::try_from(status)
        .ok()
        .and_then(FlightStatus::from_code)
        .ok_or_else(|| {
            SqliteStoreError::Invalid(format!("unknown status code {status} for flight {id}"))
        })?;
    Ok(Flight {
        id: FlightId::new(id),
        airline: AccountId::new(airline),
        timestamp,
        status,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
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
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms)).map_err(db_error)?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS ledger_meta (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    owner TEXT NOT NULL,
                    operational INTEGER NOT NULL,
                    testing_mode INTEGER NOT NULL,
                    state_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS authorized_callers (
                    identity TEXT PRIMARY KEY
                );
                CREATE TABLE IF NOT EXISTS airlines (
                    address TEXT PRIMARY KEY,
                    registered INTEGER NOT NULL,
                    funded INTEGER NOT NULL,
                    balance TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS flights (
                    id INTEGER PRIMARY KEY,
                    airline TEXT NOT NULL REFERENCES airlines(address),
                    departure INTEGER NOT NULL,
                    status INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_flights_airline ON flights (airline);",
            )
            .map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parses a stored hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    HashAlgorithm::from_label(label)
        .ok_or_else(|| SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
}
