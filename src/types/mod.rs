//! Type definitions for the scenario builder
//!
//! Identifiers, activity records with their per-kind content, and the fixed
//! competency list shared by every store.

mod activity;
mod competency;
mod ids;

pub use activity::*;
pub use competency::*;
pub use ids::*;
