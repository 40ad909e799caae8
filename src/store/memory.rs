//! In-memory store. The default backend for tests and for a server started
//! without `DATABASE_URL`.
//!
//! DESIGN
//! ======
//! All collections sit behind one `RwLock`. `batch_replace` stages every
//! replacement collection outside the guarded state, then swaps them in while
//! holding the write lock, so readers observe either the old or the new
//! snapshot and never a mix.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Replacement, Store, StoreError};
use crate::model::{Component, Project};

#[derive(Default)]
struct Collections {
    components: HashMap<Uuid, Component>,
    projects: HashMap<Uuid, Project>,
    analytics: Option<serde_json::Value>,
    image_library: Vec<serde_json::Value>,
}

/// Cheap to clone; clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write with a backend error until switched back. Reads
    /// keep working.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store is read-only".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Component>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.components.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Component>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.components.get(&id).cloned())
    }

    async fn put(&self, component: &Component) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.inner.write().await;
        state.components.insert(component.id, component.clone());
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut state = self.inner.write().await;
        Ok(state.components.remove(&id).is_some())
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.projects.values().cloned().collect())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.projects.get(&id).cloned())
    }

    async fn put_project(&self, project: &Project) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.inner.write().await;
        state.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut state = self.inner.write().await;
        Ok(state.projects.remove(&id).is_some())
    }

    async fn analytics(&self) -> Result<Option<serde_json::Value>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.analytics.clone())
    }

    async fn image_library(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.image_library.clone())
    }

    async fn batch_replace(&self, batch: Vec<Replacement>) -> Result<(), StoreError> {
        self.check_writable()?;

        // Stage outside the lock; nothing below can fail.
        let mut components = None;
        let mut projects = None;
        let mut analytics = None;
        let mut image_library = None;
        for replacement in batch {
            match replacement {
                Replacement::Components(items) => {
                    components = Some(items.into_iter().map(|c| (c.id, c)).collect::<HashMap<_, _>>());
                }
                Replacement::Projects(items) => {
                    projects = Some(items.into_iter().map(|p| (p.id, p)).collect::<HashMap<_, _>>());
                }
                Replacement::Analytics(value) => analytics = Some(value),
                Replacement::ImageLibrary(items) => image_library = Some(items),
            }
        }

        let mut state = self.inner.write().await;
        if let Some(components) = components {
            state.components = components;
        }
        if let Some(projects) = projects {
            state.projects = projects;
        }
        if let Some(analytics) = analytics {
            state.analytics = Some(analytics);
        }
        if let Some(image_library) = image_library {
            state.image_library = image_library;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
