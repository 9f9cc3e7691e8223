//! Activity store: the ordered canvas and the current selection.
//!
//! Selection is held as an id only and always resolved through the store,
//! so the selected activity and its canvas entry are the same value.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{Activity, ActivityId, ActivityPatch, ActivityType};

/// Ordered collection of activities plus the selected one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStore {
    activities: Vec<Activity>,

    #[serde(default)]
    selected: Option<ActivityId>,

    /// Highest sequence number handed out so far
    #[serde(default)]
    last_seq: u64,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────

    /// Append a new activity with defaults for `kind` and select it
    pub fn add(&mut self, kind: ActivityType, estimated_time: u32) -> &Activity {
        self.last_seq += 1;
        let id = ActivityId::from_seq(self.last_seq);
        let activity = Activity::new(id.clone(), kind, estimated_time);

        info!(activity = %id, kind = %kind, position = self.activities.len(), "Activity added");
        self.activities.push(activity);
        self.selected = Some(id);
        &self.activities[self.activities.len() - 1]
    }

    /// Merge a patch into an activity. `Ok(false)` if the id is unknown.
    pub fn update(&mut self, id: &ActivityId, patch: ActivityPatch) -> Result<bool> {
        let Some(activity) = self.activities.iter_mut().find(|a| &a.id == id) else {
            debug!(activity = %id, "Update ignored, activity not found");
            return Ok(false);
        };
        activity.apply(patch)?;
        debug!(activity = %id, "Activity updated");
        Ok(true)
    }

    /// Remove an activity, clearing the selection if it pointed at it
    pub fn remove(&mut self, id: &ActivityId) -> Option<Activity> {
        let index = self.position(id)?;
        let removed = self.activities.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        info!(activity = %id, "Activity removed");
        Some(removed)
    }

    /// Move the activity at `from` to `to`, shifting the ones in between.
    /// Returns `false` without touching the order when the move is a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.activities.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let moved = self.activities.remove(from);
        self.activities.insert(to, moved);
        debug!(from, to, "Activities reordered");
        true
    }

    /// Apply a mutation to every activity, returning the ids it changed
    pub(crate) fn update_each<F>(&mut self, mut f: F) -> Vec<ActivityId>
    where
        F: FnMut(&mut Activity) -> bool,
    {
        self.activities
            .iter_mut()
            .filter_map(|a| if f(a) { Some(a.id.clone()) } else { None })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────

    /// Select an activity. Returns `false` if the id is unknown.
    pub fn select(&mut self, id: &ActivityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&ActivityId> {
        self.selected.as_ref()
    }

    /// The selected activity, looked up in the canvas
    pub fn selected(&self) -> Option<&Activity> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    // ─────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────

    pub fn get(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &ActivityId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &ActivityId) -> Option<usize> {
        self.activities.iter().position(|a| &a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn ids(&self) -> Vec<ActivityId> {
        self.activities.iter().map(|a| a.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_ESTIMATED_TIME;

    fn store_with(n: usize) -> ActivityStore {
        let mut store = ActivityStore::new();
        for _ in 0..n {
            store.add(ActivityType::Email, DEFAULT_ESTIMATED_TIME);
        }
        store
    }

    #[test]
    fn test_add_selects_new_activity() {
        let mut store = ActivityStore::new();
        let id = store.add(ActivityType::Chat, 20).id.clone();
        assert_eq!(store.selected_id(), Some(&id));
        assert_eq!(store.selected().unwrap().name, "New Chat");
        assert_eq!(store.selected().unwrap().estimated_time, 20);
    }

    #[test]
    fn test_update_is_visible_through_selection() {
        let mut store = store_with(1);
        let id = store.ids()[0].clone();
        let patch = ActivityPatch {
            name: Some("Inbox triage".into()),
            ..Default::default()
        };
        assert!(store.update(&id, patch).unwrap());
        assert_eq!(store.selected().unwrap().name, "Inbox triage");
        assert_eq!(store.get(&id).unwrap().name, "Inbox triage");
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = store_with(1);
        let patch = ActivityPatch {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(!store.update(&ActivityId::from_seq(99), patch).unwrap());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = store_with(2);
        let ids = store.ids();
        assert_eq!(store.selected_id(), Some(&ids[1]));

        store.remove(&ids[0]).unwrap();
        assert_eq!(store.selected_id(), Some(&ids[1]));

        store.remove(&ids[1]).unwrap();
        assert!(store.selected_id().is_none());
        assert!(store.remove(&ids[1]).is_none());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = store_with(3);
        let last = store.ids()[2].clone();
        store.remove(&last);
        let next = store.add(ActivityType::Chat, 10).id.clone();
        assert_ne!(next, last);
        assert_eq!(next.as_str(), "act-4");
    }

    #[test]
    fn test_reorder_moves_element() {
        let mut store = store_with(4);
        let ids = store.ids();
        assert!(store.reorder(0, 2));
        assert_eq!(store.ids(), vec![ids[1].clone(), ids[2].clone(), ids[0].clone(), ids[3].clone()]);
        assert!(store.reorder(3, 0));
        assert_eq!(store.ids()[0], ids[3]);
    }

    #[test]
    fn test_reorder_noop_cases() {
        let mut store = store_with(3);
        let ids = store.ids();
        assert!(!store.reorder(1, 1));
        assert!(!store.reorder(0, 3));
        assert!(!store.reorder(5, 0));
        assert_eq!(store.ids(), ids);
    }

    proptest::proptest! {
        #[test]
        fn prop_reorder_is_single_move(len in 1usize..12, from in 0usize..12, to in 0usize..12) {
            let mut store = store_with(len);
            let before = store.ids();
            let moved = store.reorder(from, to);
            let after = store.ids();

            let mut sorted_before = before.clone();
            let mut sorted_after = after.clone();
            sorted_before.sort();
            sorted_after.sort();
            proptest::prop_assert_eq!(sorted_before, sorted_after);

            if from < len && to < len && from != to {
                proptest::prop_assert!(moved);
                proptest::prop_assert_eq!(&after[to], &before[from]);
                let mut expected = before.clone();
                let item = expected.remove(from);
                expected.insert(to, item);
                proptest::prop_assert_eq!(after, expected);
            } else {
                proptest::prop_assert!(!moved);
                proptest::prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn test_select_unknown_rejected() {
        let mut store = store_with(1);
        assert!(!store.select(&ActivityId::from_seq(42)));
        store.clear_selection();
        assert!(store.selected().is_none());
    }
}
