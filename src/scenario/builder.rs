//! Scenario aggregate: owns the stores and performs every cascade between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::activities::ActivityStore;
use super::dependencies::{DependencyBadge, DependencyGraph, DependencyKind, EdgeChange};
use super::events::ScenarioEvent;
use super::reorder::{DragPayload, DragState, ReorderEngine};
use crate::error::{Error, Result};
use crate::panel::PersonaDialog;
use crate::persona::{NewPersona, PersonaRegistry};
use crate::types::{Activity, ActivityId, ActivityPatch, ActivityType, PersonaId};

/// An assessment scenario: activities, personas and the gating between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    activities: ActivityStore,

    #[serde(default)]
    personas: PersonaRegistry,

    #[serde(default)]
    dependencies: DependencyGraph,

    /// Drag gestures never outlive the process
    #[serde(skip)]
    drag: ReorderEngine,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            activities: ActivityStore::new(),
            personas: PersonaRegistry::new(),
            dependencies: DependencyGraph::new(),
            drag: ReorderEngine::new(),
        }
    }

    pub fn activities(&self) -> &ActivityStore {
        &self.activities
    }

    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ─────────────────────────────────────────────────────────────
    // Activities
    // ─────────────────────────────────────────────────────────────

    /// Append an activity of `kind` lasting `minutes` and select it
    pub fn add_activity(&mut self, kind: ActivityType, minutes: u32) -> ScenarioEvent {
        let id = self.activities.add(kind, minutes).id.clone();
        self.touch();
        ScenarioEvent::ActivityAdded { id, kind }
    }

    /// Merge `patch` into activity `id`.
    ///
    /// Unknown activity ids are a no-op (`Ok(None)`). Persona ids in the
    /// patch must exist in the registry.
    pub fn update_activity(
        &mut self,
        id: &ActivityId,
        patch: ActivityPatch,
    ) -> Result<Option<ScenarioEvent>> {
        if let Some(missing) = patch
            .referenced_personas()
            .into_iter()
            .find(|p| !self.personas.contains(p))
        {
            return Err(Error::persona_not_found(missing));
        }

        if !self.activities.update(id, patch)? {
            return Ok(None);
        }
        self.touch();
        Ok(Some(ScenarioEvent::ActivityUpdated { id: id.clone() }))
    }

    /// Remove an activity together with every dependency touching it
    pub fn remove_activity(&mut self, id: &ActivityId) -> Option<ScenarioEvent> {
        let was_selected = self.activities.selected_id() == Some(id);
        self.activities.remove(id)?;
        let removed = self.dependencies.remove_touching(id);
        self.drag.cancel();
        self.touch();
        Some(ScenarioEvent::ActivityRemoved {
            id: id.clone(),
            dependencies_removed: removed.len(),
            was_selected,
        })
    }

    /// Move the activity at `from` to `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Option<ScenarioEvent> {
        if !self.activities.reorder(from, to) {
            return None;
        }
        self.touch();
        debug!(order = ?self.activities.ids(), "Canvas order updated");
        Some(ScenarioEvent::ActivitiesReordered { from, to })
    }

    pub fn select(&mut self, id: &ActivityId) -> Result<ScenarioEvent> {
        if !self.activities.select(id) {
            return Err(Error::activity_not_found(id));
        }
        Ok(ScenarioEvent::SelectionChanged {
            id: Some(id.clone()),
        })
    }

    pub fn clear_selection(&mut self) -> ScenarioEvent {
        self.activities.clear_selection();
        ScenarioEvent::SelectionChanged { id: None }
    }

    pub fn selected(&self) -> Option<&Activity> {
        self.activities.selected()
    }

    pub fn activity(&self, id: &ActivityId) -> Result<&Activity> {
        self.activities
            .get(id)
            .ok_or_else(|| Error::activity_not_found(id))
    }

    // ─────────────────────────────────────────────────────────────
    // Personas
    // ─────────────────────────────────────────────────────────────

    pub fn add_persona(&mut self, profile: NewPersona) -> Result<ScenarioEvent> {
        let id = self.personas.add(profile)?.id.clone();
        self.touch();
        Ok(ScenarioEvent::PersonaAdded { id })
    }

    /// Remove a persona, stripping it from every activity and from an open
    /// persona dialog's working state.
    pub fn remove_persona(
        &mut self,
        id: &PersonaId,
        open_dialog: Option<&mut PersonaDialog>,
    ) -> Option<ScenarioEvent> {
        self.personas.remove(id)?;
        let activities_updated = self.activities.update_each(|a| a.remove_persona(id));
        if let Some(dialog) = open_dialog {
            dialog.forget_persona(id);
        }
        self.touch();
        info!(
            persona = %id,
            activities = activities_updated.len(),
            "Persona removed"
        );
        Some(ScenarioEvent::PersonaRemoved {
            id: id.clone(),
            activities_updated,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Dependencies
    // ─────────────────────────────────────────────────────────────

    pub fn add_or_replace_dependency(
        &mut self,
        source_id: &ActivityId,
        target_id: &ActivityId,
        kind: DependencyKind,
        condition: &str,
    ) -> Result<ScenarioEvent> {
        if source_id == target_id {
            return Err(Error::SelfDependency {
                id: source_id.to_string(),
            });
        }
        for id in [source_id, target_id] {
            if !self.activities.contains(id) {
                return Err(Error::activity_not_found(id));
            }
        }

        let change = self
            .dependencies
            .add_or_replace(source_id, target_id, kind, condition)?;
        self.touch();
        Ok(ScenarioEvent::DependencySet {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            kind,
            replaced: change == EdgeChange::Replaced,
        })
    }

    pub fn remove_dependency(
        &mut self,
        source_id: &ActivityId,
        target_id: &ActivityId,
    ) -> Option<ScenarioEvent> {
        if !self.dependencies.remove(source_id, target_id) {
            return None;
        }
        self.touch();
        Some(ScenarioEvent::DependencyRemoved {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
        })
    }

    /// "Depends on" badges for an activity, named after the current sources
    pub fn incoming_badges(&self, id: &ActivityId) -> Vec<DependencyBadge> {
        self.dependencies
            .incoming(id)
            .into_iter()
            .map(|edge| DependencyBadge {
                source_id: edge.source_id.clone(),
                source_name: self
                    .activities
                    .get(&edge.source_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| edge.source_id.to_string()),
                kind: edge.kind,
                condition: match edge.kind {
                    DependencyKind::Score => Some(edge.condition.clone()),
                    DependencyKind::Completion => None,
                },
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Drag and drop
    // ─────────────────────────────────────────────────────────────

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn start_drag(&mut self, from: usize) -> bool {
        let rows = self.activities.len();
        self.drag.start(from, rows)
    }

    /// Start from a drag-transfer payload. Malformed payloads are logged and ignored.
    pub fn start_drag_from_payload(&mut self, raw: &str) -> bool {
        match DragPayload::parse(raw) {
            Ok(payload) => self.start_drag(payload.index),
            Err(e) => {
                warn!(error = %e, payload = raw, "Ignoring drag payload");
                false
            }
        }
    }

    pub fn drag_enter(&mut self, index: usize) {
        let rows = self.activities.len();
        self.drag.enter(index, rows);
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    /// Finish the gesture, committing at most one reorder
    pub fn end_drag(&mut self) -> Option<ScenarioEvent> {
        let Some(step) = self.drag.end() else {
            debug!("Drag ended without a move");
            return None;
        };
        self.reorder(step.from, step.to)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
