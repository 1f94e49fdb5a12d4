//! The rule table that turns raw metric counts into hours.
//!
//! A [`RuleCatalog`] maps each category to its metrics (hours per unit) and
//! its implementation patterns (effort multipliers), and holds the complexity
//! tier multipliers and the role/rate table. It is read-only once built; the
//! built-in table is constructed on first use by [`RuleCatalog::builtin`].

mod builtin;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::models::{ComplexityTier, MetricValues};

/// Lookup failures against the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown pattern '{pattern}' for category '{category}'")]
    UnknownPattern { category: String, pattern: String },

    #[error("Unknown metric '{metric}' for category '{category}'")]
    UnknownMetric { category: String, metric: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Category '{0}' declares no patterns")]
    NoPatterns(String),

    #[error("Catalog declares no categories")]
    NoCategories,
}

/// A countable unit of work within a category, e.g. "Entities".
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDef {
    pub id: String,
    pub name: String,
    pub hours_per_unit: f64,
}

/// An architectural approach for a category, e.g. "CQRS".
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDef {
    pub id: String,
    pub name: String,
    pub multiplier: f64,
}

/// Who does the work, with a flat hourly rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDef {
    pub id: String,
    pub name: String,
    pub hourly_rate: f64,
}

/// A kind of component with its metrics and patterns.
///
/// Always has at least one pattern; the first declared one is the default.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    id: String,
    name: String,
    metrics: Vec<MetricDef>,
    patterns: Vec<PatternDef>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        metrics: Vec<MetricDef>,
        patterns: Vec<PatternDef>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        if patterns.is_empty() {
            return Err(CatalogError::NoPatterns(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            metrics,
            patterns,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &[MetricDef] {
        &self.metrics
    }

    pub fn patterns(&self) -> &[PatternDef] {
        &self.patterns
    }

    pub fn default_pattern(&self) -> &PatternDef {
        &self.patterns[0]
    }

    pub fn metric(&self, id: &str) -> Option<&MetricDef> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn pattern(&self, id: &str) -> Option<&PatternDef> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// Every metric of this category set to zero, in declaration order.
    pub fn initial_metrics(&self) -> MetricValues {
        self.metrics.iter().map(|m| (m.id.clone(), 0)).collect()
    }
}

static BUILTIN: Lazy<RuleCatalog> = Lazy::new(builtin::catalog);

/// Immutable rule table: categories, complexity multipliers and roles.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalog {
    categories: Vec<Category>,
    roles: Vec<RoleDef>,
}

impl RuleCatalog {
    pub fn new(categories: Vec<Category>, roles: Vec<RoleDef>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::NoCategories);
        }
        Ok(Self { categories, roles })
    }

    /// The built-in .NET rule table, shared for the lifetime of the process.
    pub fn builtin() -> &'static RuleCatalog {
        &BUILTIN
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category new items are created in.
    pub fn default_category(&self) -> &Category {
        &self.categories[0]
    }

    pub fn category(&self, id: &str) -> Result<&Category, CatalogError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::UnknownCategory(id.to_string()))
    }

    pub fn metrics_for(&self, category: &str) -> Result<&[MetricDef], CatalogError> {
        Ok(self.category(category)?.metrics())
    }

    pub fn patterns_for(&self, category: &str) -> Result<&[PatternDef], CatalogError> {
        Ok(self.category(category)?.patterns())
    }

    pub fn default_pattern(&self, category: &str) -> Result<&PatternDef, CatalogError> {
        Ok(self.category(category)?.default_pattern())
    }

    pub fn pattern(&self, category: &str, pattern: &str) -> Result<&PatternDef, CatalogError> {
        self.category(category)?
            .pattern(pattern)
            .ok_or_else(|| CatalogError::UnknownPattern {
                category: category.to_string(),
                pattern: pattern.to_string(),
            })
    }

    pub fn metric(&self, category: &str, metric: &str) -> Result<&MetricDef, CatalogError> {
        self.category(category)?
            .metric(metric)
            .ok_or_else(|| CatalogError::UnknownMetric {
                category: category.to_string(),
                metric: metric.to_string(),
            })
    }

    pub fn complexity_multiplier(&self, tier: ComplexityTier) -> f64 {
        match tier {
            ComplexityTier::Low => 0.8,
            ComplexityTier::Medium => 1.0,
            ComplexityTier::High => 1.3,
        }
    }

    pub fn roles(&self) -> &[RoleDef] {
        &self.roles
    }

    /// Role new items are assigned, if the catalog has any.
    pub fn default_role(&self) -> Option<&RoleDef> {
        self.roles.first()
    }

    pub fn role(&self, id: &str) -> Result<&RoleDef, CatalogError> {
        self.roles
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CatalogError::UnknownRole(id.to_string()))
    }

    pub fn hourly_rate(&self, role: &str) -> Result<f64, CatalogError> {
        Ok(self.role(role)?.hourly_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories_in_declaration_order() {
        let ids: Vec<&str> = RuleCatalog::builtin()
            .categories()
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(ids, vec!["domainModel", "dataAccess", "integration"]);
    }

    #[test]
    fn test_default_pattern_is_first_declared() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.default_pattern("domainModel").unwrap().id, "simple");
        assert_eq!(catalog.default_pattern("dataAccess").unwrap().id, "repository");
        assert_eq!(catalog.default_pattern("integration").unwrap().id, "rest");
    }

    #[test]
    fn test_metrics_for_domain_model() {
        let metrics = RuleCatalog::builtin().metrics_for("domainModel").unwrap();
        let rates: Vec<(&str, f64)> = metrics
            .iter()
            .map(|m| (m.id.as_str(), m.hours_per_unit))
            .collect();
        assert_eq!(
            rates,
            vec![("entities", 4.0), ("businessRules", 6.0), ("validations", 3.0)]
        );
    }

    #[test]
    fn test_pattern_multiplier_lookup() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(
            catalog.pattern("domainModel", "eventSourced").unwrap().multiplier,
            1.8
        );
        assert_eq!(catalog.pattern("integration", "graphql").unwrap().multiplier, 1.3);
    }

    #[test]
    fn test_complexity_multipliers() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.complexity_multiplier(ComplexityTier::Low), 0.8);
        assert_eq!(catalog.complexity_multiplier(ComplexityTier::Medium), 1.0);
        assert_eq!(catalog.complexity_multiplier(ComplexityTier::High), 1.3);
    }

    #[test]
    fn test_unknown_lookups() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(
            catalog.category("frontend"),
            Err(CatalogError::UnknownCategory("frontend".to_string()))
        );
        assert!(matches!(
            catalog.pattern("domainModel", "rest"),
            Err(CatalogError::UnknownPattern { .. })
        ));
        assert!(matches!(
            catalog.metric("integration", "entities"),
            Err(CatalogError::UnknownMetric { .. })
        ));
        assert!(matches!(
            catalog.hourly_rate("architect"),
            Err(CatalogError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_roles_and_rates() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.default_role().unwrap().id, "developer");
        assert_eq!(catalog.hourly_rate("developer").unwrap(), 50.0);
        assert_eq!(catalog.role("designer").unwrap().name, "Senior Developer");
        assert_eq!(catalog.hourly_rate("tester").unwrap(), 30.0);
    }

    #[test]
    fn test_category_requires_a_pattern() {
        let result = Category::new("empty", "Empty", vec![], vec![]);
        assert_eq!(result, Err(CatalogError::NoPatterns("empty".to_string())));
    }

    #[test]
    fn test_catalog_requires_a_category() {
        assert_eq!(
            RuleCatalog::new(vec![], vec![]),
            Err(CatalogError::NoCategories)
        );
    }

    #[test]
    fn test_initial_metrics_are_zeroed() {
        let category = RuleCatalog::builtin().category("dataAccess").unwrap();
        let metrics = category.initial_metrics();
        let keys: Vec<&str> = metrics.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["repositories", "dbContexts", "migrations"]);
        assert!(metrics.values().all(|v| *v == 0));
    }
}
