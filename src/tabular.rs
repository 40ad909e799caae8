//! Tabular (CSV) import and export of the registry.
//!
//! FORMAT
//! ======
//! One header row, then one component per record. Header names match
//! case-insensitively and may appear in any order; unknown columns are
//! ignored. `links` and `maintenanceLog` cells carry JSON arrays.
//!
//! ```text
//! name,description,category,totalQuantity,imageUrl,lowStockThreshold,links,isUnderMaintenance,maintenanceLog
//! Arduino Uno,,Microcontrollers,12,,3,"[{""title"":""Pinout"",""url"":""https://…""}]",false,[]
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Import is validate-then-commit. Every row is parsed before anything is
//! written; the first bad row aborts the whole import with its 1-based row
//! number (the header is row 1). Accepted rows are appended to the registry
//! in one atomic batch.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use tracing::{info, warn};

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::model::{Category, Component, ComponentInput, Link, MaintenanceRecord};
use crate::registry;
use crate::store::Replacement;

/// Export column order. Import accepts the same names in any order and case.
pub const COLUMNS: [&str; 9] = [
    "name",
    "description",
    "category",
    "totalQuantity",
    "imageUrl",
    "lowStockThreshold",
    "links",
    "isUnderMaintenance",
    "maintenanceLog",
];

const HEADER_ROW: usize = 1;

// =============================================================================
// PARSE
// =============================================================================

/// Column positions resolved from the header row.
struct ColumnMap {
    name: usize,
    category: usize,
    total_quantity: usize,
    description: Option<usize>,
    image_url: Option<usize>,
    low_stock_threshold: Option<usize>,
    links: Option<usize>,
    is_under_maintenance: Option<usize>,
    maintenance_log: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, InventoryError> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|cell| cell.trim().eq_ignore_ascii_case(wanted))
        };
        let required = |wanted: &str| {
            find(wanted).ok_or_else(|| InventoryError::row(HEADER_ROW, format!("missing required column `{wanted}`")))
        };

        Ok(Self {
            name: required("name")?,
            category: required("category")?,
            total_quantity: required("totalQuantity")?,
            description: find("description"),
            image_url: find("imageUrl"),
            low_stock_threshold: find("lowStockThreshold"),
            links: find("links"),
            is_under_maintenance: find("isUnderMaintenance"),
            maintenance_log: find("maintenanceLog"),
        })
    }
}

/// One validated data row, not yet turned into a stored component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based row number in the source (header = 1).
    pub row: usize,
    pub input: ComponentInput,
    pub is_under_maintenance: bool,
    pub maintenance_log: Vec<MaintenanceRecord>,
}

/// A validated cell, with surrounding whitespace removed.
fn cell<'r>(record: &'r StringRecord, index: Option<usize>) -> &'r str {
    raw_cell(record, index).trim()
}

/// A free-text cell exactly as written.
fn raw_cell<'r>(record: &'r StringRecord, index: Option<usize>) -> &'r str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

fn parse_count(row: usize, column: &str, raw: &str) -> Result<u32, InventoryError> {
    raw.parse::<u32>()
        .map_err(|_| InventoryError::row(row, format!("{column} must be a non-negative integer, got \"{raw}\"")))
}

fn parse_bool(row: usize, column: &str, raw: &str) -> Result<bool, InventoryError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else {
        Err(InventoryError::row(row, format!("{column} must be true or false, got \"{raw}\"")))
    }
}

fn parse_links(row: usize, raw: &str) -> Result<Vec<Link>, InventoryError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let links: Vec<Link> =
        serde_json::from_str(raw).map_err(|e| InventoryError::row(row, format!("links is not a valid link array: {e}")))?;
    if links.iter().any(|link| link.url.trim().is_empty()) {
        return Err(InventoryError::row(row, "links entry has an empty url"));
    }
    Ok(links)
}

fn parse_maintenance_log(row: usize, raw: &str) -> Result<Vec<MaintenanceRecord>, InventoryError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let log: Vec<MaintenanceRecord> = serde_json::from_str(raw)
        .map_err(|e| InventoryError::row(row, format!("maintenanceLog is not a valid log array: {e}")))?;
    if log.iter().any(|entry| entry.notes.trim().is_empty()) {
        return Err(InventoryError::row(row, "maintenanceLog entry has empty notes"));
    }
    Ok(log)
}

fn parse_row(row: usize, record: &StringRecord, columns: &ColumnMap) -> Result<TableRow, InventoryError> {
    let name = cell(record, Some(columns.name));
    if name.is_empty() {
        return Err(InventoryError::row(row, "missing name"));
    }

    let raw_category = cell(record, Some(columns.category));
    if raw_category.is_empty() {
        return Err(InventoryError::row(row, "missing category"));
    }
    let Some(category) = Category::parse(raw_category) else {
        return Err(InventoryError::row(row, format!("unknown category \"{raw_category}\"")));
    };

    let raw_total = cell(record, Some(columns.total_quantity));
    if raw_total.is_empty() {
        return Err(InventoryError::row(row, "missing totalQuantity"));
    }
    let total_quantity = parse_count(row, "totalQuantity", raw_total)?;

    let raw_threshold = cell(record, columns.low_stock_threshold);
    let low_stock_threshold = if raw_threshold.is_empty() {
        None
    } else {
        Some(parse_count(row, "lowStockThreshold", raw_threshold)?)
    };

    let image_url = cell(record, columns.image_url);

    Ok(TableRow {
        row,
        input: ComponentInput {
            name: name.to_owned(),
            description: raw_cell(record, columns.description).to_owned(),
            category,
            total_quantity,
            image_url: (!image_url.is_empty()).then(|| image_url.to_owned()),
            is_available: true,
            low_stock_threshold,
            links: parse_links(row, cell(record, columns.links))?,
        },
        is_under_maintenance: parse_bool(row, "isUnderMaintenance", cell(record, columns.is_under_maintenance))?,
        maintenance_log: parse_maintenance_log(row, cell(record, columns.maintenance_log))?,
    })
}

/// Validate a whole table without touching the store. Stops at the first bad
/// row.
///
/// # Errors
///
/// Returns `Row` with the 1-based row number of the first failure.
pub fn parse_table(raw: &str) -> Result<Vec<TableRow>, InventoryError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if raw.trim().is_empty() {
        return Err(InventoryError::row(HEADER_ROW, "missing header row"));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(raw.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| InventoryError::row(HEADER_ROW, format!("unreadable header: {e}")))?
        .clone();
    let columns = ColumnMap::from_header(&header)?;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + HEADER_ROW + 1;
        let record = result.map_err(|e| InventoryError::row(row, format!("malformed record: {e}")))?;
        rows.push(parse_row(row, &record, &columns)?);
    }
    Ok(rows)
}

// =============================================================================
// IMPORT
// =============================================================================

/// Parse, validate and append every row as a new component. Nothing is
/// written unless every row is valid.
///
/// # Errors
///
/// Returns `Row` for the first invalid row, or `Store` if the batch commit
/// fails (in which case nothing was committed either).
pub async fn import_from_table(inventory: &Inventory, raw: &str) -> Result<Vec<Component>, InventoryError> {
    let rows = match parse_table(raw) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "tabular import rejected");
            return Err(e);
        }
    };
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut accepted = Vec::with_capacity(rows.len());
    for row in rows {
        let mut component = registry::build_component(inventory, row.input)
            .map_err(|e| InventoryError::row(row.row, e.to_string()))?;
        component.is_under_maintenance = row.is_under_maintenance;
        component.maintenance_log = row
            .maintenance_log
            .into_iter()
            .map(|entry| MaintenanceRecord { id: inventory.next_id(), ..entry })
            .collect();
        accepted.push(component);
    }

    let mut registry_items = inventory.store().get_all().await?;
    registry_items.extend(accepted.iter().cloned());
    inventory
        .store()
        .batch_replace(vec![Replacement::Components(registry_items)])
        .await?;

    info!(count = accepted.len(), "imported components from table");
    Ok(accepted)
}

// =============================================================================
// EXPORT
// =============================================================================

fn encode_err(e: impl std::fmt::Display) -> InventoryError {
    InventoryError::Encoding(e.to_string())
}

/// Serialize components to the tabular layout in [`COLUMNS`] order. Fields
/// containing a quote, comma or newline are quoted, with embedded quotes
/// doubled.
///
/// # Errors
///
/// Returns `Encoding` if a nested payload cannot be serialized.
pub fn export_to_table(components: &[Component]) -> Result<String, InventoryError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS).map_err(encode_err)?;
    for component in components {
        let links = serde_json::to_string(&component.links).map_err(encode_err)?;
        let log = serde_json::to_string(&component.maintenance_log).map_err(encode_err)?;
        let total = component.total_quantity.to_string();
        let threshold = component.low_stock_threshold.map(|t| t.to_string()).unwrap_or_default();
        let under_maintenance = component.is_under_maintenance.to_string();
        writer
            .write_record([
                component.name.as_str(),
                component.description.as_str(),
                component.category.as_str(),
                total.as_str(),
                component.image_url.as_deref().unwrap_or(""),
                threshold.as_str(),
                links.as_str(),
                under_maintenance.as_str(),
                log.as_str(),
            ])
            .map_err(encode_err)?;
    }

    let bytes = writer.into_inner().map_err(encode_err)?;
    String::from_utf8(bytes).map_err(encode_err)
}

#[cfg(test)]
#[path = "tabular_test.rs"]
mod tests;
