// crates/flight-surety-core/src/runtime/store.rs
// ============================================================================
// Module: Flight Surety In-Memory Store
// Description: Simple in-memory ledger store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory [`LedgerStore`] for tests and one-shot
//! runs, plus a clonable wrapper around any shared store implementation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use crate::core::LedgerState;
use crate::interfaces::LedgerStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory ledger store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    /// Saved snapshot protected by a mutex.
    state: Arc<Mutex<Option<LedgerState>>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("ledger store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        *self
            .state
            .lock()
            .map_err(|_| StoreError::Store("ledger store mutex poisoned".to_string()))? =
            Some(state.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared ledger store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedLedgerStore {
    /// Inner store implementation.
    inner: Arc<dyn LedgerStore + Send + Sync>,
}

impl SharedLedgerStore {
    /// Wraps a ledger store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl LedgerStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn LedgerStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl LedgerStore for SharedLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        self.inner.load()
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        self.inner.save(state)
    }
}
