use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Category;

/// Raw metric counts keyed by metric id, in the category's declaration order.
pub type MetricValues = IndexMap<String, u32>;

/// Secondary multipliers present on every freshly created item.
pub const DEFAULT_FACTORS: [&str; 2] = ["dependencies", "integrations"];

/// One component of software work being estimated.
///
/// Field names on the wire follow the saved-project format (`type`, `pattern`,
/// `complexity`, `complexityFactors`, `metrics`); the descriptive names
/// (`categoryId`, `patternId`, ...) are accepted as aliases when loading.
///
/// # Invariant
/// `pattern` always belongs to `category`. Only
/// [`ProjectStore::update`](crate::store::ProjectStore::update) may change the
/// category, and it resets `pattern` and `metrics` in the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateItem {
    pub id: u64,
    #[serde(rename = "type", alias = "categoryId")]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "patternId")]
    pub pattern: String,
    /// Role doing the work, used for the flat hourly rate lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(alias = "complexityTier")]
    pub complexity: ComplexityTier,
    #[serde(default, alias = "secondaryMultipliers")]
    pub complexity_factors: ComplexityFactors,
    #[serde(default, alias = "metricValues", deserialize_with = "deserialize_metrics")]
    pub metrics: MetricValues,
    #[serde(default)]
    pub assumptions: String,
    #[serde(default)]
    pub risks: String,
    /// Fields written by newer versions of the format. Kept so a load/save
    /// cycle does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EstimateItem {
    /// Create an item in `category` with its default pattern, medium complexity,
    /// neutral secondary multipliers and every metric zeroed.
    pub fn new(id: u64, category: &Category, role: Option<String>) -> Self {
        Self {
            id,
            category: category.id().to_string(),
            title: String::new(),
            pattern: category.default_pattern().id.clone(),
            role,
            complexity: ComplexityTier::default(),
            complexity_factors: ComplexityFactors::default(),
            metrics: category.initial_metrics(),
            assumptions: String::new(),
            risks: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Title shown in listings and exports.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

/// Coarse complexity scaling applied regardless of category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Complexity",
            Self::Medium => "Medium Complexity",
            Self::High => "High Complexity",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown complexity '{}', expected low, medium or high",
                other
            )),
        }
    }
}

/// Counts as saved by the form, which kept negative input as typed. Loaded
/// counts are clamped into `0..=u32::MAX`.
fn deserialize_metrics<'de, D>(deserializer: D) -> Result<MetricValues, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, i64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(id, count)| {
            let clamped = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
            (id, clamped)
        })
        .collect())
}

/// Secondary multipliers keyed by name, multiplied together at calculation time.
///
/// Every stored value is finite and strictly positive. Snapshots written before
/// these existed have no `complexityFactors` field at all; those load with the
/// two neutral defaults. A cleared input is saved as `null` and loads as 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComplexityFactors(IndexMap<String, f64>);

impl<'de> Deserialize<'de> for ComplexityFactors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Option<f64>>::deserialize(deserializer)?;
        let mut factors = Self::empty();
        for (name, value) in raw {
            factors.set(name, value.unwrap_or(1.0));
        }
        Ok(factors)
    }
}

impl Default for ComplexityFactors {
    fn default() -> Self {
        Self(
            DEFAULT_FACTORS
                .iter()
                .map(|name| (name.to_string(), 1.0))
                .collect(),
        )
    }
}

impl ComplexityFactors {
    /// No factors at all; the product is 1.0.
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// Value of `name`, or the neutral 1.0 when it is not set.
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(1.0)
    }

    /// Store `value` for `name`. Values that are not finite and strictly
    /// positive are replaced by 1.0; returns whether the value was accepted.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> bool {
        let accepted = is_valid_factor(value);
        self.0.insert(name.into(), if accepted { value } else { 1.0 });
        accepted
    }

    pub fn product(&self) -> f64 {
        self.0.values().product()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn is_valid_factor(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Patch for an existing item. All fields are optional for partial updates.
///
/// Changing `category` also resets the pattern to the new category's default
/// and zeroes its metrics; a `pattern` given alongside a category change is
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItemInput {
    pub category: Option<String>,
    pub pattern: Option<String>,
    pub role: Option<String>,
    pub complexity: Option<ComplexityTier>,
    pub title: Option<String>,
    pub assumptions: Option<String>,
    pub risks: Option<String>,
}
