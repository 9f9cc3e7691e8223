//! Persistence: scenario snapshots, the local flag store, navigation params.

pub mod local;
pub mod nav;
pub mod snapshot;

pub use local::{LocalStore, INBOX_READ_KEY};
pub use nav::NavParams;
