//! Pips Challenge Library
//!
//! 30-level capital-growth challenge tracker: level ladder, trade log,
//! analytics and session persistence.

pub mod analytics;
pub mod challenge;
pub mod config;
pub mod notes;
pub mod persistence;
pub mod types;
