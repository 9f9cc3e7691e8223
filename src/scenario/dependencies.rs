//! Dependency graph: directed gating edges between activities.
//!
//! The graph only stores and renders edges. It does not evaluate them and
//! does not reject cycles; self-loops are the one shape it refuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::ActivityId;

// ─────────────────────────────────────────────────────────────────
// Dependency
// ─────────────────────────────────────────────────────────────────

/// What unlocks the target activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Target opens once the source is finished
    #[default]
    Completion,
    /// Target opens once the source reaches a score threshold
    Score,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Completion => write!(f, "completion"),
            DependencyKind::Score => write!(f, "score"),
        }
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completion" => Ok(DependencyKind::Completion),
            "score" => Ok(DependencyKind::Score),
            _ => Err(format!("Unknown dependency type '{}'. Valid: completion, score", s)),
        }
    }
}

/// Directed edge `source_id -> target_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub source_id: ActivityId,
    pub target_id: ActivityId,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    /// Threshold expression for score edges, empty otherwise
    #[serde(default)]
    pub condition: String,
}

/// Outcome of [`DependencyGraph::add_or_replace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    Inserted,
    Replaced,
}

// ─────────────────────────────────────────────────────────────────
// Badge
// ─────────────────────────────────────────────────────────────────

/// "Depends on" annotation rendered on a target activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyBadge {
    pub source_id: ActivityId,
    /// Current name of the source activity
    pub source_name: String,
    pub kind: DependencyKind,
    pub condition: Option<String>,
}

impl fmt::Display for DependencyBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Depends on: {}", self.source_name)?;
        if let Some(ref condition) = self.condition {
            write!(f, " ({})", condition)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Graph
// ─────────────────────────────────────────────────────────────────

/// Edge set, at most one edge per ordered pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    edges: Vec<Dependency>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge, or replace kind and condition of the existing edge
    /// for the same pair. Existence of both endpoints is checked by the caller.
    pub fn add_or_replace(
        &mut self,
        source_id: &ActivityId,
        target_id: &ActivityId,
        kind: DependencyKind,
        condition: &str,
    ) -> Result<EdgeChange> {
        if source_id == target_id {
            return Err(Error::SelfDependency {
                id: source_id.to_string(),
            });
        }

        let condition = match kind {
            DependencyKind::Score => {
                let trimmed = condition.trim();
                if trimmed.is_empty() {
                    return Err(Error::MissingCondition {
                        source_id: source_id.to_string(),
                        target_id: target_id.to_string(),
                    });
                }
                trimmed.to_string()
            }
            DependencyKind::Completion => String::new(),
        };

        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|e| &e.source_id == source_id && &e.target_id == target_id)
        {
            edge.kind = kind;
            edge.condition = condition;
            debug!(source = %source_id, target = %target_id, kind = %kind, "Dependency replaced");
            return Ok(EdgeChange::Replaced);
        }

        self.edges.push(Dependency {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            kind,
            condition,
        });
        info!(source = %source_id, target = %target_id, kind = %kind, "Dependency added");
        Ok(EdgeChange::Inserted)
    }

    /// Remove the edge for the pair. Returns `false` if there was none.
    pub fn remove(&mut self, source_id: &ActivityId, target_id: &ActivityId) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(&e.source_id == source_id && &e.target_id == target_id));
        self.edges.len() != before
    }

    /// Drop every edge that starts or ends at `id`
    pub fn remove_touching(&mut self, id: &ActivityId) -> Vec<Dependency> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .edges
            .drain(..)
            .partition(|e| &e.source_id == id || &e.target_id == id);
        self.edges = kept;
        if !removed.is_empty() {
            debug!(activity = %id, count = removed.len(), "Dependencies cascaded");
        }
        removed
    }

    /// Edges gating `id`
    pub fn incoming(&self, id: &ActivityId) -> Vec<&Dependency> {
        self.edges.iter().filter(|e| &e.target_id == id).collect()
    }

    /// Edges gated by `id`
    pub fn outgoing(&self, id: &ActivityId) -> Vec<&Dependency> {
        self.edges.iter().filter(|e| &e.source_id == id).collect()
    }

    pub fn get(&self, source_id: &ActivityId, target_id: &ActivityId) -> Option<&Dependency> {
        self.edges
            .iter()
            .find(|e| &e.source_id == source_id && &e.target_id == target_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
