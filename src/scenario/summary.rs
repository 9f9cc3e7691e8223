//! Derived overview of a scenario.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::Scenario;
use crate::types::{ActivityType, Competency};

/// Totals shown at the top of the builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub activity_count: usize,
    /// Sum of estimated minutes across all activities
    pub total_minutes: u64,
    /// Non-zero counts, in canonical type order
    pub by_type: Vec<(ActivityType, usize)>,
    pub competencies: Vec<Competency>,
    pub persona_count: usize,
    pub dependency_count: usize,
}

impl ScenarioSummary {
    pub fn of(scenario: &Scenario) -> Self {
        let activities = scenario.activities();

        let by_type = ActivityType::all()
            .iter()
            .map(|kind| (*kind, activities.iter().filter(|a| a.kind == *kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        let competencies: BTreeSet<Competency> = activities
            .iter()
            .flat_map(|a| a.competencies.iter().copied())
            .collect();

        Self {
            name: scenario.name.clone(),
            activity_count: activities.len(),
            total_minutes: activities.iter().map(|a| u64::from(a.estimated_time)).sum(),
            by_type,
            competencies: competencies.into_iter().collect(),
            persona_count: scenario.personas().len(),
            dependency_count: scenario.dependencies().len(),
        }
    }
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario: {}", self.name)?;
        writeln!(
            f,
            "  Activities:   {} ({} min)",
            self.activity_count, self.total_minutes
        )?;
        for (kind, count) in &self.by_type {
            writeln!(f, "    {:<12}{}", kind.label(), count)?;
        }
        let competencies: Vec<&str> = self.competencies.iter().map(|c| c.display_name()).collect();
        writeln!(
            f,
            "  Competencies: {}",
            if competencies.is_empty() {
                "-".to_string()
            } else {
                competencies.join(", ")
            }
        )?;
        writeln!(f, "  Personas:     {}", self.persona_count)?;
        write!(f, "  Dependencies: {}", self.dependency_count)
    }
}
