//! Fixed competency list an activity can be tagged with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Competency
// ─────────────────────────────────────────────────────────────────

/// Skill dimensions an activity is said to assess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Competency {
    Communication,
    ProblemSolving,
    Leadership,
    Teamwork,
    Adaptability,
    TimeManagement,
    DecisionMaking,
    CustomerFocus,
}

impl Competency {
    /// Competency used when a navigation parameter is missing or unknown
    pub const DEFAULT: Competency = Competency::Communication;

    /// Slug used in query parameters and CLI args.
    pub fn slug(&self) -> &'static str {
        match self {
            Competency::Communication => "communication",
            Competency::ProblemSolving => "problem-solving",
            Competency::Leadership => "leadership",
            Competency::Teamwork => "teamwork",
            Competency::Adaptability => "adaptability",
            Competency::TimeManagement => "time-management",
            Competency::DecisionMaking => "decision-making",
            Competency::CustomerFocus => "customer-focus",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Competency::Communication => "Communication",
            Competency::ProblemSolving => "Problem Solving",
            Competency::Leadership => "Leadership",
            Competency::Teamwork => "Teamwork",
            Competency::Adaptability => "Adaptability",
            Competency::TimeManagement => "Time Management",
            Competency::DecisionMaking => "Decision Making",
            Competency::CustomerFocus => "Customer Focus",
        }
    }

    /// All competencies in catalogue order.
    pub fn all() -> &'static [Competency] {
        &[
            Competency::Communication,
            Competency::ProblemSolving,
            Competency::Leadership,
            Competency::Teamwork,
            Competency::Adaptability,
            Competency::TimeManagement,
            Competency::DecisionMaking,
            Competency::CustomerFocus,
        ]
    }
}

impl Default for Competency {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Competency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Competency::all()
            .iter()
            .find(|c| c.slug() == normalized)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<&str> = Competency::all().iter().map(|c| c.slug()).collect();
                format!("Unknown competency '{}'. Valid: {}", s, valid.join(", "))
            })
    }
}
