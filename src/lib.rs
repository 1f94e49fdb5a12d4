//! Effort estimation for .NET project components.
//!
//! A [`store::ProjectStore`] holds the components being estimated; the
//! [`calculator`] reduces each one to hours and person-days using the rule
//! table in [`catalog`]; [`snapshot`] and [`export`] move estimates in and out.

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod export;
pub mod models;
pub mod report;
pub mod snapshot;
pub mod store;
