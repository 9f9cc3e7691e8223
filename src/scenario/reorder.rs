//! Reorder engine: drag-and-drop as an explicit state machine.
//!
//! Hovering over rows only moves the transient target; the activity order is
//! touched once, when the drag ends over a valid row.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Drag State
// ─────────────────────────────────────────────────────────────────

/// State of a drag gesture over the activity list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// A row was picked up but the pointer is not over a valid row
    Picked { from: usize },
    /// A row was picked up and the pointer is over row `over`
    Hovering { from: usize, over: usize },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    /// Source row of the drag, if one is in progress
    pub fn source(&self) -> Option<usize> {
        match *self {
            DragState::Idle => None,
            DragState::Picked { from } | DragState::Hovering { from, .. } => Some(from),
        }
    }
}

/// Data carried by a drag-transfer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DragPayload {
    pub index: usize,
}

impl DragPayload {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::DragPayload {
            message: e.to_string(),
        })
    }
}

/// A committed move, as handed to the activity store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

// ─────────────────────────────────────────────────────────────────
// Reorder Engine
// ─────────────────────────────────────────────────────────────────

/// Translates drag events into at most one move per gesture
#[derive(Debug, Clone, Default)]
pub struct ReorderEngine {
    state: DragState,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Pick up row `from`. Ignored while another drag is in flight or when
    /// `from` is not a row.
    pub fn start(&mut self, from: usize, rows: usize) -> bool {
        if !self.state.is_idle() {
            debug!(from, state = ?self.state, "Drag start ignored, drag already in progress");
            return false;
        }
        if from >= rows {
            debug!(from, rows, "Drag start ignored, not a row");
            return false;
        }
        self.state = DragState::Picked { from };
        true
    }

    /// Pointer entered row `index`. An index outside the list clears the target.
    pub fn enter(&mut self, index: usize, rows: usize) {
        let Some(from) = self.state.source() else {
            return;
        };
        self.state = if index < rows {
            DragState::Hovering { from, over: index }
        } else {
            DragState::Picked { from }
        };
    }

    /// Pointer left the list
    pub fn leave(&mut self) {
        if let Some(from) = self.state.source() {
            self.state = DragState::Picked { from };
        }
    }

    /// Drop. Returns the move to commit, if any, and always returns to idle.
    pub fn end(&mut self) -> Option<Move> {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Hovering { from, over } if from != over => Some(Move { from, to: over }),
            _ => None,
        }
    }

    /// Abandon the drag without moving anything
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture_commits_once() {
        let mut engine = ReorderEngine::new();
        assert!(engine.start(0, 4));
        engine.enter(1, 4);
        engine.enter(2, 4);
        assert_eq!(engine.state(), DragState::Hovering { from: 0, over: 2 });
        assert_eq!(engine.end(), Some(Move { from: 0, to: 2 }));
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_drop_on_origin_is_noop() {
        let mut engine = ReorderEngine::new();
        engine.start(1, 3);
        engine.enter(2, 3);
        engine.enter(1, 3);
        assert_eq!(engine.end(), None);
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_drop_outside_rows_is_noop() {
        let mut engine = ReorderEngine::new();
        engine.start(0, 3);
        engine.enter(2, 3);
        engine.enter(7, 3);
        assert_eq!(engine.state(), DragState::Picked { from: 0 });
        assert_eq!(engine.end(), None);

        engine.start(0, 3);
        engine.enter(2, 3);
        engine.leave();
        assert_eq!(engine.end(), None);
    }

    #[test]
    fn test_second_start_ignored_while_dragging() {
        let mut engine = ReorderEngine::new();
        assert!(engine.start(0, 3));
        assert!(!engine.start(2, 3));
        assert_eq!(engine.state().source(), Some(0));
    }

    #[test]
    fn test_enter_without_start_ignored() {
        let mut engine = ReorderEngine::new();
        engine.enter(1, 3);
        assert!(engine.state().is_idle());
        assert_eq!(engine.end(), None);
    }

    #[test]
    fn test_start_outside_rows_ignored() {
        let mut engine = ReorderEngine::new();
        assert!(!engine.start(3, 3));
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut engine = ReorderEngine::new();
        engine.start(0, 3);
        engine.enter(2, 3);
        engine.cancel();
        assert_eq!(engine.end(), None);
    }

    #[test]
    fn test_payload_parsing() {
        assert_eq!(DragPayload::parse(r#"{"index": 2}"#).unwrap().index, 2);
        assert!(matches!(
            DragPayload::parse("row-2").unwrap_err(),
            Error::DragPayload { .. }
        ));
    }
}
