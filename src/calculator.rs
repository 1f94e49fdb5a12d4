//! Effort calculation.
//!
//! For one item:
//!
//! ```text
//! base  = Σ metric count × hours per unit   (metrics of the item's category only)
//! hours = round(base × pattern × complexity × Π secondary factors)
//! days  = round(hours / 8, 1 decimal)
//! ```
//!
//! Rounding is half-up throughout. All functions here are pure and total: a
//! loaded item whose category or pattern the catalog no longer knows still
//! gets an estimate, computed with neutral values, plus a [`StaleReference`]
//! warning for display.

use crate::catalog::RuleCatalog;
use crate::models::{Effort, EstimateItem, ItemEstimate, StaleReference};

/// Length of a person-day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Share of the estimate added for bug fixing in exports.
pub const BUG_FIXING_RATIO: f64 = 0.2;

/// Round to the nearest integer, halves going up.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place, halves going up.
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Person-days for a whole number of hours, to one decimal.
pub fn hours_to_days(hours: u64) -> f64 {
    round_to_tenth(hours as f64 / HOURS_PER_DAY)
}

/// Bug-fixing allowance for an estimate in days, to one decimal.
pub fn bug_fixing_allowance(days: f64) -> f64 {
    round_to_tenth(days * BUG_FIXING_RATIO)
}

/// Days plus the bug-fixing allowance, to one decimal.
pub fn days_with_allowance(days: f64) -> f64 {
    round_to_tenth(days + bug_fixing_allowance(days))
}

/// Hours and person-days for one item.
pub fn compute_item_effort(item: &EstimateItem, catalog: &RuleCatalog) -> Effort {
    evaluate_item(item, catalog).effort
}

/// Hours and person-days for one item, with any unresolved catalog references.
///
/// An unknown category contributes no base hours. An unknown pattern in a
/// known category uses a multiplier of 1.0. Metric ids the category does not
/// define are skipped.
pub fn evaluate_item(item: &EstimateItem, catalog: &RuleCatalog) -> ItemEstimate {
    let warnings = stale_references(item, catalog);
    for warning in &warnings {
        tracing::warn!(item_id = item.id, "{}", warning);
    }

    let (base_hours, pattern_multiplier) = match catalog.category(&item.category) {
        Ok(category) => {
            let base: f64 = item
                .metrics
                .iter()
                .filter_map(|(id, count)| {
                    category
                        .metric(id)
                        .map(|metric| f64::from(*count) * metric.hours_per_unit)
                })
                .sum();
            let multiplier = category
                .pattern(&item.pattern)
                .map(|p| p.multiplier)
                .unwrap_or(1.0);
            (base, multiplier)
        }
        Err(_) => (0.0, 1.0),
    };

    let complexity_multiplier = catalog.complexity_multiplier(item.complexity);
    let secondary_factor = item.complexity_factors.product();

    let raw = base_hours * pattern_multiplier * complexity_multiplier * secondary_factor;
    let hours = round_half_up(raw.max(0.0)) as u64;

    ItemEstimate {
        effort: Effort {
            hours,
            days: hours_to_days(hours),
        },
        warnings,
    }
}

/// Catalog references of `item` that the catalog cannot resolve.
pub fn stale_references(item: &EstimateItem, catalog: &RuleCatalog) -> Vec<StaleReference> {
    let mut stale = Vec::new();

    match catalog.category(&item.category) {
        Ok(category) => {
            if category.pattern(&item.pattern).is_none() {
                stale.push(StaleReference::Pattern {
                    category: item.category.clone(),
                    pattern: item.pattern.clone(),
                });
            }
        }
        Err(_) => stale.push(StaleReference::Category(item.category.clone())),
    }

    if let Some(role) = &item.role {
        if catalog.role(role).is_err() {
            stale.push(StaleReference::Role(role.clone()));
        }
    }

    stale
}

/// Project total.
///
/// Hours are summed directly. Days are the sum of every item's already
/// rounded days, which can differ from `hours_to_days(total hours)`: two items
/// of 5 hours give 0.6 + 0.6 = 1.2 days, not 1.3. Saved exports depend on this.
/// Hours saturate at `u64::MAX` instead of overflowing.
pub fn compute_total<'a, I>(items: I, catalog: &RuleCatalog) -> Effort
where
    I: IntoIterator<Item = &'a EstimateItem>,
{
    let (hours, days) = items
        .into_iter()
        .map(|item| compute_item_effort(item, catalog))
        .fold((0u64, 0.0f64), |(hours, days), effort| {
            (hours.saturating_add(effort.hours), days + effort.days)
        });

    // Each addend has one decimal; this only strips float noise from the sum.
    Effort {
        hours,
        days: round_to_tenth(days),
    }
}

/// Flat labour cost of an item: hours × the role's hourly rate.
///
/// `None` when the item has no role or the role is not in the catalog.
pub fn compute_item_cost(item: &EstimateItem, catalog: &RuleCatalog) -> Option<f64> {
    let rate = catalog.hourly_rate(item.role.as_deref()?).ok()?;
    Some(compute_item_effort(item, catalog).hours as f64 * rate)
}
