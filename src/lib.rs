//! Shared lab component inventory.
//!
//! ARCHITECTURE
//! ============
//! Students check physical components in and out of a pool under an
//! admin-controlled catalog. This crate owns the consistency-critical part:
//!
//! - [`registry`]: component CRUD and the manual availability switch
//! - [`ledger`]: issue/return with quantity conservation
//! - [`maintenance`]: lockout flag and append-only history
//! - [`low_stock`]: derived low-stock view and dashboard report
//! - [`tabular`]: CSV import (validate-then-commit) and export
//! - [`backup`]: full snapshot export and all-or-nothing restore
//! - [`projects`]: informational project → component links
//!
//! Storage is behind the [`store::Store`] trait. Operations are async free
//! functions taking an [`Inventory`], which bundles the store with a clock
//! and an id source.
//!
//! INVARIANT
//! =========
//! For every component, at every point in time, the units issued never
//! exceed `total_quantity`. Available quantity and low-stock status are
//! derived on read and never stored.

pub mod backup;
pub mod clock;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod low_stock;
pub mod maintenance;
pub mod model;
pub mod projects;
pub mod registry;
pub mod store;
pub mod tabular;

pub use error::{CapacityError, ErrorCode, InventoryError};
pub use inventory::Inventory;
pub use model::{Category, Component, ComponentInput, IssueRecord, Link, MaintenanceRecord, Project, RequiredComponent};
pub use store::{MemoryStore, Store, StoreError};
