//! Store adapter seam.
//!
//! ARCHITECTURE
//! ============
//! The inventory never talks to a storage engine directly. Any key/document
//! store can back it as long as it implements [`Store`], and in particular
//! offers an atomic [`Store::batch_replace`]: `clear_all`, tabular import and
//! backup restore all commit through that single call, so either every
//! affected collection changes or none does.

pub mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::model::{Component, Project};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Full replacement of one persisted collection.
#[derive(Debug, Clone)]
pub enum Replacement {
    Components(Vec<Component>),
    Projects(Vec<Project>),
    Analytics(serde_json::Value),
    ImageLibrary(Vec<serde_json::Value>),
}

impl Replacement {
    /// Collection name, for logs.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Components(_) => "components",
            Self::Projects(_) => "projects",
            Self::Analytics(_) => "analytics",
            Self::ImageLibrary(_) => "custom_image_library",
        }
    }
}

/// Persistence adapter. Single-record writes are keyed by id; multi-record
/// writes go through `batch_replace`, which must be all-or-nothing.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Component>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Component>, StoreError>;

    /// Insert or overwrite by `component.id`.
    async fn put(&self, component: &Component) -> Result<(), StoreError>;

    /// Returns `false` when nothing was stored under `id`.
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn projects(&self) -> Result<Vec<Project>, StoreError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    async fn put_project(&self, project: &Project) -> Result<(), StoreError>;

    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Collaborator-owned analytics document, if one was ever stored.
    async fn analytics(&self) -> Result<Option<serde_json::Value>, StoreError>;

    /// Collaborator-owned image library entries.
    async fn image_library(&self) -> Result<Vec<serde_json::Value>, StoreError>;

    /// Replace every listed collection atomically. Collections not listed are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// On error no listed collection may have changed.
    async fn batch_replace(&self, batch: Vec<Replacement>) -> Result<(), StoreError>;
}
