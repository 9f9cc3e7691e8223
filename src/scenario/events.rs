//! Change events returned by scenario mutations.

use std::fmt;

use serde::Serialize;

use super::dependencies::DependencyKind;
use crate::types::{ActivityId, ActivityType, PersonaId};

/// What a successful mutation changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    ActivityAdded {
        id: ActivityId,
        kind: ActivityType,
    },
    ActivityUpdated {
        id: ActivityId,
    },
    ActivityRemoved {
        id: ActivityId,
        /// Dependencies dropped along with the activity
        dependencies_removed: usize,
        was_selected: bool,
    },
    ActivitiesReordered {
        from: usize,
        to: usize,
    },
    SelectionChanged {
        id: Option<ActivityId>,
    },
    PersonaAdded {
        id: PersonaId,
    },
    PersonaRemoved {
        id: PersonaId,
        /// Activities that referenced the persona
        activities_updated: Vec<ActivityId>,
    },
    DependencySet {
        source_id: ActivityId,
        target_id: ActivityId,
        kind: DependencyKind,
        replaced: bool,
    },
    DependencyRemoved {
        source_id: ActivityId,
        target_id: ActivityId,
    },
}

impl fmt::Display for ScenarioEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioEvent::ActivityAdded { id, kind } => {
                write!(f, "Added {} activity {}", kind, id)
            }
            ScenarioEvent::ActivityUpdated { id } => write!(f, "Updated activity {}", id),
            ScenarioEvent::ActivityRemoved {
                id,
                dependencies_removed,
                ..
            } => write!(
                f,
                "Removed activity {} ({} dependencies removed)",
                id, dependencies_removed
            ),
            ScenarioEvent::ActivitiesReordered { from, to } => {
                write!(f, "Moved activity from position {} to {}", from, to)
            }
            ScenarioEvent::SelectionChanged { id: Some(id) } => write!(f, "Selected {}", id),
            ScenarioEvent::SelectionChanged { id: None } => write!(f, "Selection cleared"),
            ScenarioEvent::PersonaAdded { id } => write!(f, "Added persona {}", id),
            ScenarioEvent::PersonaRemoved {
                id,
                activities_updated,
            } => write!(
                f,
                "Removed persona {} ({} activities updated)",
                id,
                activities_updated.len()
            ),
            ScenarioEvent::DependencySet {
                source_id,
                target_id,
                kind,
                replaced,
            } => write!(
                f,
                "{} {} dependency {} -> {}",
                if *replaced { "Replaced" } else { "Added" },
                kind,
                source_id,
                target_id
            ),
            ScenarioEvent::DependencyRemoved {
                source_id,
                target_id,
            } => write!(f, "Removed dependency {} -> {}", source_id, target_id),
        }
    }
}
