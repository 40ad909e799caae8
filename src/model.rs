//! Inventory records: components, their embedded ledger and log entries,
//! and the external project shape.
//!
//! DESIGN
//! ======
//! Issue and maintenance records are owned child collections of their
//! component. They are never shared or moved between components, so deleting
//! a component needs no cascade. Derived values (available quantity, low
//! stock) are computed from these records on read and never stored here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CATEGORY
// =============================================================================

/// Closed catalog category. Import matches the display string exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Microcontrollers,
    Sensors,
    Actuators,
    Displays,
    Communication,
    Power,
    #[serde(rename = "Passive Components")]
    PassiveComponents,
    Tools,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Microcontrollers,
        Self::Sensors,
        Self::Actuators,
        Self::Displays,
        Self::Communication,
        Self::Power,
        Self::PassiveComponents,
        Self::Tools,
        Self::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Microcontrollers => "Microcontrollers",
            Self::Sensors => "Sensors",
            Self::Actuators => "Actuators",
            Self::Displays => "Displays",
            Self::Communication => "Communication",
            Self::Power => "Power",
            Self::PassiveComponents => "Passive Components",
            Self::Tools => "Tools",
            Self::Other => "Other",
        }
    }

    /// Exact, case-sensitive match against the display strings.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CHILD RECORDS
// =============================================================================

/// One active checkout. Removed wholesale on return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: Uuid,
    pub student_name: String,
    /// Milliseconds since Unix epoch.
    pub issued_date: i64,
    pub quantity: u32,
}

/// Maintenance history entry. Never touches quantity bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    /// Milliseconds since Unix epoch.
    pub date: i64,
    pub notes: String,
}

/// Reference link (datasheet, tutorial, vendor page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

// =============================================================================
// COMPONENT
// =============================================================================

fn default_true() -> bool {
    true
}

/// A catalog entry and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub total_quantity: u32,
    #[serde(default)]
    pub issued_to: Vec<IssueRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Manual catalog switch, independent of quantity and maintenance.
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub is_under_maintenance: bool,
    #[serde(default)]
    pub maintenance_log: Vec<MaintenanceRecord>,
    /// Milliseconds since Unix epoch.
    pub created_at: i64,
}

impl Component {
    /// Units currently checked out. Summed in `u64` so corrupt input cannot overflow.
    #[must_use]
    pub fn issued_units(&self) -> u64 {
        self.issued_to.iter().map(|issue| u64::from(issue.quantity)).sum()
    }

    /// `total_quantity - issued`, clamped at zero.
    #[must_use]
    pub fn available_quantity(&self) -> u32 {
        let available = u64::from(self.total_quantity).saturating_sub(self.issued_units());
        u32::try_from(available).unwrap_or(u32::MAX)
    }

    /// Whether a new checkout could be accepted at all right now.
    #[must_use]
    pub fn is_issuable(&self) -> bool {
        self.is_available && !self.is_under_maintenance && self.available_quantity() > 0
    }
}

/// Caller-supplied fields for a new component. Identity, timestamps and the
/// embedded lists are assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub total_quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
    #[serde(default)]
    pub links: Vec<Link>,
}

// =============================================================================
// PROJECT
// =============================================================================

/// Denormalized, non-reserving pointer from a project into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredComponent {
    pub component_id: Uuid,
    /// Name at link time. Not refreshed on rename.
    pub component_name: String,
    pub quantity: u32,
}

/// Project owned by an external collaborator. Only `required_components` is
/// interpreted here; every other field rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required_components: Vec<RequiredComponent>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
