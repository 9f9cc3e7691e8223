//! Core types for the persona system.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::PersonaId;

/// Trait assigned when a profile leaves every trait slot blank
pub const DEFAULT_TRAIT: &str = "Professional";

/// Image shown for personas created without one
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Number of trait slots offered by the create-persona form
pub const TRAIT_SLOTS: usize = 3;

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A reusable actor profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,

    /// Display name (e.g. "Sarah Chen").
    pub name: String,

    /// Job role shown under the name (e.g. "Account Manager").
    pub role: String,

    /// Avatar path or URL.
    pub image: String,

    /// Up to three personality traits, in form order.
    pub traits: Vec<String>,

    /// Guidance for how the persona should behave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Default opening message when this persona starts a conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Create-persona profile
// ─────────────────────────────────────────────────────────────────

/// Fields submitted by the create-persona action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPersona {
    pub name: String,
    pub role: String,
    pub image: Option<String>,
    pub traits: Vec<String>,
    pub instructions: Option<String>,
    pub initial_message: Option<String>,
}

impl NewPersona {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the profile and turn it into a persona with the given id
    pub fn into_persona(self, id: PersonaId) -> Result<Persona> {
        let name = self.name.trim().to_string();
        let role = self.role.trim().to_string();
        if name.is_empty() {
            return Err(Error::persona_invalid("name must not be empty"));
        }
        if role.is_empty() {
            return Err(Error::persona_invalid("role must not be empty"));
        }

        let mut traits: Vec<String> = self
            .traits
            .iter()
            .take(TRAIT_SLOTS)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if traits.is_empty() {
            traits.push(DEFAULT_TRAIT.to_string());
        }

        Ok(Persona {
            id,
            name,
            role,
            image: non_blank(self.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            traits,
            instructions: non_blank(self.instructions),
            initial_message: non_blank(self.initial_message),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_name_and_role() {
        let id = PersonaId::from_seq(1);
        assert!(NewPersona::new("  ", "Manager").into_persona(id.clone()).is_err());
        assert!(NewPersona::new("Sarah", "").into_persona(id.clone()).is_err());
        assert!(NewPersona::new("Sarah", "Manager").into_persona(id).is_ok());
    }

    #[test]
    fn test_default_trait_when_slots_blank() {
        let p = NewPersona::new("Sarah", "Manager")
            .with_traits(["  ", "", "\t"])
            .into_persona(PersonaId::from_seq(1))
            .unwrap();
        assert_eq!(p.traits, vec![DEFAULT_TRAIT.to_string()]);
        assert_eq!(p.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_traits_trimmed_and_capped() {
        let p = NewPersona::new("Sarah", "Manager")
            .with_traits([" Direct ", "", "Impatient", "Ignored"])
            .into_persona(PersonaId::from_seq(1))
            .unwrap();
        assert_eq!(p.traits, vec!["Direct".to_string(), "Impatient".to_string()]);
    }

    #[test]
    fn test_optional_fields_blank_become_none() {
        let mut profile = NewPersona::new("Sarah", "Manager");
        profile.instructions = Some("   ".into());
        profile.initial_message = Some("Hi, got a minute?".into());
        let p = profile.into_persona(PersonaId::from_seq(1)).unwrap();
        assert!(p.instructions.is_none());
        assert_eq!(p.initial_message.as_deref(), Some("Hi, got a minute?"));
    }
}
