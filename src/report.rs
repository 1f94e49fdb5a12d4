//! Plain-text summary of an estimate for terminal output.

use crate::calculator::{compute_total, evaluate_item};
use crate::catalog::RuleCatalog;
use crate::models::EstimateItem;
use crate::store::ProjectStore;

const STALE: char = '!';

/// Render one line per item followed by the project total.
///
/// Example output:
/// ```text
/// #1 Orders [Domain Model & Business Logic / Event Sourced, medium] 25h 3.1d
/// #2 Untitled [Integration & APIs / REST API, low] 0h 0d
///    ! unknown pattern 'soap' for category 'integration'
/// Total: 25h 3.1d
/// ```
pub fn render_summary(store: &ProjectStore, catalog: &RuleCatalog) -> String {
    let mut output = String::new();
    for item in store.items() {
        render_item(&mut output, item, catalog);
    }

    let total = compute_total(store.items(), catalog);
    output.push_str(&format!("Total: {}h {}d\n", total.hours, total.days));
    output
}

fn render_item(output: &mut String, item: &EstimateItem, catalog: &RuleCatalog) {
    let estimate = evaluate_item(item, catalog);

    // Stale ids are shown as-is.
    let (category, pattern) = match catalog.category(&item.category) {
        Ok(c) => (
            c.name(),
            c.pattern(&item.pattern)
                .map(|p| p.name.as_str())
                .unwrap_or(item.pattern.as_str()),
        ),
        Err(_) => (item.category.as_str(), item.pattern.as_str()),
    };

    output.push_str(&format!(
        "#{} {} [{} / {}, {}] {}h {}d\n",
        item.id,
        item.display_title(),
        category,
        pattern,
        item.complexity,
        estimate.effort.hours,
        estimate.effort.days,
    ));

    for warning in &estimate.warnings {
        output.push_str(&format!("   {} {}\n", STALE, warning));
    }
}
