use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived effort for one item or a whole project.
///
/// `days` is person-days of 8 hours, rounded to one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Effort {
    pub hours: u64,
    pub days: f64,
}

/// Effort of one item together with the catalog references that could not be
/// resolved while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEstimate {
    pub effort: Effort,
    pub warnings: Vec<StaleReference>,
}

impl ItemEstimate {
    pub fn is_stale(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A reference from a loaded item to something the current catalog no longer
/// has. Display-only: the calculation carries on with neutral values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReference {
    Category(String),
    Pattern { category: String, pattern: String },
    Role(String),
}

impl fmt::Display for StaleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(id) => write!(f, "unknown category '{}'", id),
            Self::Pattern { category, pattern } => {
                write!(f, "unknown pattern '{}' for category '{}'", pattern, category)
            }
            Self::Role(id) => write!(f, "unknown role '{}'", id),
        }
    }
}
