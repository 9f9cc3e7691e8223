//! Typed identifiers for activities and personas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of an activity on the scenario canvas (`act-<n>`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

/// Identifier of a persona in the registry (`persona-<n>`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaId(String);

impl ActivityId {
    const PREFIX: &'static str = "act";

    /// Build the id for the given sequence number
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("{}-{}", Self::PREFIX, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PersonaId {
    const PREFIX: &'static str = "persona";

    /// Build the id for the given sequence number
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("{}-{}", Self::PREFIX, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActivityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Activity id cannot be empty".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

impl FromStr for PersonaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Persona id cannot be empty".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids() {
        assert_eq!(ActivityId::from_seq(3).as_str(), "act-3");
        assert_eq!(PersonaId::from_seq(12).to_string(), "persona-12");
    }

    #[test]
    fn test_parse_trims() {
        let id: ActivityId = "  act-7 ".parse().unwrap();
        assert_eq!(id, ActivityId::from_seq(7));
        assert!("   ".parse::<PersonaId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&PersonaId::from_seq(1)).unwrap();
        assert_eq!(json, "\"persona-1\"");
    }
}
