//! Domain models for estimate-forge.
//!
//! # Core Concepts
//!
//! - [`EstimateItem`]: One component of software work being estimated. It points at a
//!   category and pattern in the [`RuleCatalog`](crate::catalog::RuleCatalog) and carries
//!   raw metric counts plus free-text notes.
//! - [`ComplexityTier`]: Coarse low/medium/high scaling applied to every category alike.
//! - [`ComplexityFactors`]: User-supplied secondary multipliers (dependencies, integrations)
//!   layered on top of the pattern and complexity multipliers.
//! - [`Effort`]: Derived hours and person-days. Never stored, always recomputed.

mod effort;
mod item;

pub use effort::*;
pub use item::*;
