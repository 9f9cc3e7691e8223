//! Scenario builder core
//!
//! - Activity store: ordered canvas plus selection
//! - Dependency graph: gating edges between activities
//! - Reorder engine: drag gestures committing a single move
//! - Scenario: the aggregate applying cascades across stores

mod activities;
mod builder;
mod dependencies;
mod events;
mod reorder;
mod summary;

pub use builder::*;
pub use dependencies::*;
pub use events::*;
pub use summary::*;
