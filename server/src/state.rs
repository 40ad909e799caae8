//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the inventory context, which in turn owns the store adapter
//! (`PgStore` or `MemoryStore`), the clock and the id source.

use std::sync::Arc;

use labstock::{Inventory, Store};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the inventory is `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub inventory: Inventory,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { inventory: Inventory::new(store) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
