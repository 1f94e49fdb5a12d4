//! Comma-separated export of an estimate, one row per item.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::calculator::{bug_fixing_allowance, compute_item_effort, days_with_allowance};
use crate::catalog::RuleCatalog;
use crate::models::EstimateItem;
use crate::store::ProjectStore;

/// Extension of exported tables.
pub const EXPORT_EXTENSION: &str = "csv";

pub const HEADERS: [&str; 13] = [
    "Component Title",
    "Type",
    "Pattern",
    "Role",
    "Complexity",
    "Dependencies Multiplier",
    "Integrations Multiplier",
    "Metrics",
    "Assumptions",
    "Risks",
    "Total Effort (Man Days)",
    "Bug Fixing (20%)",
    "Total Effort with Bug Fixing (Man Days)",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export to {}: {source}", .path.display())]
    InvalidExport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render the header row and one row per item, joined by `\n`.
pub fn export_table(store: &ProjectStore, catalog: &RuleCatalog) -> String {
    let mut lines = Vec::with_capacity(store.len() + 1);
    lines.push(HEADERS.join(","));
    lines.extend(store.items().iter().map(|item| export_row(item, catalog)));
    lines.join("\n")
}

/// One item as a delimited row. Text columns are quoted; numbers are bare.
pub fn export_row(item: &EstimateItem, catalog: &RuleCatalog) -> String {
    let days = compute_item_effort(item, catalog).days;

    let metrics = item
        .metrics
        .iter()
        .map(|(id, value)| format!("{}: {}", id, value))
        .collect::<Vec<_>>()
        .join("; ");

    [
        quote(item.display_title()),
        quote(&item.category),
        quote(&item.pattern),
        quote(item.role.as_deref().unwrap_or_default()),
        quote(item.complexity.as_str()),
        item.complexity_factors.get("dependencies").to_string(),
        item.complexity_factors.get("integrations").to_string(),
        quote(&metrics),
        quote(&item.assumptions),
        quote(&item.risks),
        days.to_string(),
        bug_fixing_allowance(days).to_string(),
        days_with_allowance(days).to_string(),
    ]
    .join(",")
}

/// Wrap a field in double quotes, doubling any quote inside it.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Write the export to `path`. The store is only read.
pub fn write_export(
    store: &ProjectStore,
    catalog: &RuleCatalog,
    path: &Path,
) -> Result<(), ExportError> {
    fs::write(path, export_table(store, catalog)).map_err(|source| {
        tracing::error!(path = %path.display(), "Export failed: {}", source);
        ExportError::InvalidExport {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(path = %path.display(), rows = store.len(), "Exported estimate");
    Ok(())
}
