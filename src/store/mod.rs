//! Ordered, in-memory collection of the items of one estimate.

use crate::catalog::{CatalogError, RuleCatalog};
use crate::models::*;

/// The items of one estimate, in display order.
///
/// Ids are unique within the store and never handed out twice, even after the
/// item holding one was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStore {
    items: Vec<EstimateItem>,
    next_id: u64,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// A store holding a single default item, the starting point of a new estimate.
    pub fn with_default_item(catalog: &RuleCatalog) -> Self {
        let mut store = Self::new();
        store.add(catalog);
        store
    }

    /// Wrap items that were loaded from elsewhere. Ids must already be unique.
    pub fn from_items(items: Vec<EstimateItem>) -> Self {
        let next_id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Self { items, next_id }
    }

    pub fn items(&self) -> &[EstimateItem] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&EstimateItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ============================================================
    // Item lifecycle
    // ============================================================

    /// Append an item in the catalog's default category with a fresh id.
    pub fn add(&mut self, catalog: &RuleCatalog) -> EstimateItem {
        let id = self.issue_id();
        let role = catalog.default_role().map(|r| r.id.clone());
        let item = EstimateItem::new(id, catalog.default_category(), role);

        tracing::debug!(item_id = id, category = %item.category, "Added item");
        self.items.push(item.clone());
        item
    }

    /// Remove the item with `id`. Returns whether anything was removed; an
    /// absent id is not an error.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        let removed = self.items.len() != before;
        if removed {
            tracing::debug!(item_id = id, "Removed item");
        }
        removed
    }

    /// Apply a partial update to the item with `id`.
    ///
    /// The new state is computed in full before it replaces the old one, so a
    /// failed lookup leaves the item untouched. Returns `Ok(None)` when no item
    /// has `id`.
    pub fn update(
        &mut self,
        id: u64,
        input: UpdateItemInput,
        catalog: &RuleCatalog,
    ) -> Result<Option<EstimateItem>, CatalogError> {
        let Some(slot) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        let updated = apply_update(slot, input, catalog)?;
        *slot = updated.clone();

        tracing::debug!(item_id = id, "Updated item");
        Ok(Some(updated))
    }

    /// Set one metric count. Negative counts are clamped to zero; the metric
    /// must belong to the item's category.
    pub fn set_metric(
        &mut self,
        id: u64,
        metric: &str,
        value: i64,
        catalog: &RuleCatalog,
    ) -> Result<Option<EstimateItem>, CatalogError> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        catalog.metric(&item.category, metric)?;
        let count = u32::try_from(value.max(0)).unwrap_or(u32::MAX);
        if i64::from(count) != value {
            tracing::warn!(item_id = id, metric, value, "Clamped metric count to {}", count);
        }
        item.metrics.insert(metric.to_string(), count);

        Ok(Some(item.clone()))
    }

    /// Set one secondary multiplier. Values that are not strictly positive are
    /// rejected and stored as 1.0.
    pub fn set_complexity_factor(
        &mut self,
        id: u64,
        name: &str,
        value: f64,
    ) -> Option<EstimateItem> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;

        if !item.complexity_factors.set(name, value) {
            tracing::warn!(
                item_id = id,
                factor = name,
                value,
                "Rejected non-positive multiplier, using 1.0"
            );
        }

        Some(item.clone())
    }

    fn issue_id(&mut self) -> u64 {
        let highest = self.items.iter().map(|i| i.id).max().unwrap_or(0);
        let id = self.next_id.max(highest + 1);
        self.next_id = id + 1;
        id
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_update(
    current: &EstimateItem,
    input: UpdateItemInput,
    catalog: &RuleCatalog,
) -> Result<EstimateItem, CatalogError> {
    let mut next = current.clone();

    match input.category {
        Some(category_id) if category_id != current.category => {
            let category = catalog.category(&category_id)?;
            if input.pattern.is_some() {
                tracing::debug!(
                    item_id = current.id,
                    "Ignoring pattern in update that changes category"
                );
            }
            next.category = category.id().to_string();
            next.pattern = category.default_pattern().id.clone();
            next.metrics = category.initial_metrics();
        }
        _ => {
            if let Some(pattern) = input.pattern {
                catalog.pattern(&current.category, &pattern)?;
                next.pattern = pattern;
            }
        }
    }

    if let Some(role) = input.role {
        catalog.role(&role)?;
        next.role = Some(role);
    }
    if let Some(complexity) = input.complexity {
        next.complexity = complexity;
    }
    if let Some(title) = input.title {
        next.title = title;
    }
    if let Some(assumptions) = input.assumptions {
        next.assumptions = assumptions;
    }
    if let Some(risks) = input.risks {
        next.risks = risks;
    }

    Ok(next)
}
