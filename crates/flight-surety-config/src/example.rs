// crates/flight-surety-config/src/example.rs
// ============================================================================
// Module: Config Example
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for `init` and docs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `flight-surety.toml`. The output is static and must
//! always pass [`SuretyConfig::validate`](crate::SuretyConfig::validate).

/// Returns a canonical example `flight-surety.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[ledger]
owner = "0x0000000000000000000000000000000000000001"
app_id = "flight-surety-app"
# Wei amounts are decimal strings (2 ether).
min_funding_wei = "2000000000000000000"

[store]
type = "sqlite"
path = "flight-surety.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[audit]
sink = "file"
path = "flight-surety-audit.jsonl"
"#,
    )
}
