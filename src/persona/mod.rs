//! Persona system: reusable simulated actors for chat and conference activities.
//!
//! Personas live in a registry independent of the activities that use them.
//! They are only ever added or removed; removal cascades into every activity
//! through the scenario aggregate.

pub mod registry;
pub mod types;

pub use registry::PersonaRegistry;
pub use types::NewPersona;
