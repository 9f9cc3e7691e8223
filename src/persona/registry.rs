//! Persona registry: owns the list of available personas.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::{NewPersona, Persona};
use crate::error::Result;
use crate::types::PersonaId;

/// Registry of personas available to a scenario.
///
/// Ids come from a monotonic counter that survives removals, so an id is
/// never handed out twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    #[serde(default)]
    last_seq: u64,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a profile and register it under a fresh id.
    pub fn add(&mut self, profile: NewPersona) -> Result<&Persona> {
        let id = PersonaId::from_seq(self.last_seq + 1);
        let persona = profile.into_persona(id)?;
        self.last_seq += 1;

        info!(persona = %persona.id, name = %persona.name, role = %persona.role, "Persona created");
        self.personas.push(persona);
        Ok(&self.personas[self.personas.len() - 1])
    }

    /// Remove a persona. Cascading into activities is the caller's job.
    pub fn remove(&mut self, id: &PersonaId) -> Option<Persona> {
        let index = self.personas.iter().position(|p| &p.id == id)?;
        let removed = self.personas.remove(index);
        debug!(persona = %id, "Persona removed from registry");
        Some(removed)
    }

    pub fn get(&self, id: &PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PersonaId) -> bool {
        self.get(id).is_some()
    }

    /// All personas in creation order.
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut registry = PersonaRegistry::new();
        let a = registry.add(NewPersona::new("Sarah", "Manager")).unwrap().id.clone();
        let b = registry.add(NewPersona::new("Tom", "Developer")).unwrap().id.clone();
        assert_eq!(a.as_str(), "persona-1");
        assert_eq!(b.as_str(), "persona-2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut registry = PersonaRegistry::new();
        let a = registry.add(NewPersona::new("Sarah", "Manager")).unwrap().id.clone();
        registry.remove(&a).unwrap();
        let b = registry.add(NewPersona::new("Tom", "Developer")).unwrap().id.clone();
        assert_ne!(a, b);
        assert!(!registry.contains(&a));
    }

    #[test]
    fn test_invalid_profile_does_not_consume_id() {
        let mut registry = PersonaRegistry::new();
        assert!(registry.add(NewPersona::new("", "Manager")).is_err());
        let id = registry.add(NewPersona::new("Sarah", "Manager")).unwrap().id.clone();
        assert_eq!(id.as_str(), "persona-1");
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut registry = PersonaRegistry::new();
        assert!(registry.remove(&PersonaId::from_seq(4)).is_none());
        assert!(registry.is_empty());
    }
}
