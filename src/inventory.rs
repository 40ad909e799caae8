//! Shared inventory context.
//!
//! DESIGN
//! ======
//! `Inventory` bundles the three collaborators every operation needs: the
//! store adapter, a clock and an id source. Operations live as free async
//! functions in the registry, ledger, maintenance, tabular, backup and
//! project modules and take `&Inventory`, mirroring how route handlers pass
//! shared state into services.

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::error::InventoryError;
use crate::model::Component;
use crate::store::Store;

/// Clone is cheap; every field is `Arc`-wrapped.
#[derive(Clone)]
pub struct Inventory {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Inventory {
    /// Inventory on the system clock with random v4 ids.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), Arc::new(RandomIds))
    }

    #[must_use]
    pub fn with_parts(store: Arc<dyn Store>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, clock, ids }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub(crate) fn next_id(&self) -> Uuid {
        self.ids.next_id()
    }

    /// Load one component or fail with `NotFound`.
    pub(crate) async fn load(&self, id: Uuid) -> Result<Component, InventoryError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::component_not_found(id))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
