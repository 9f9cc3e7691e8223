//! Persona sub-dialog for chat and conference activities.
//!
//! Edits accumulate in a working copy and reach the activity in one
//! update when applied. Dropping the dialog discards them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Activity, ActivityId, ActivityPatch, ConversationType, PersonaId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDialog {
    activity_id: ActivityId,
    selected_personas: Vec<PersonaId>,
    conversation_type: ConversationType,
    initial_message_persona: Option<PersonaId>,
    persona_initial_messages: BTreeMap<PersonaId, String>,
}

impl PersonaDialog {
    /// Open the dialog on an activity, seeded from its current persona setup
    pub fn open(activity: &Activity) -> Result<Self> {
        if !activity.kind.supports_personas() {
            return Err(Error::DialogNotApplicable {
                kind: activity.kind.to_string(),
            });
        }
        debug!(activity = %activity.id, "Persona dialog opened");
        Ok(Self {
            activity_id: activity.id.clone(),
            selected_personas: activity.personas.clone(),
            conversation_type: activity.conversation_type,
            initial_message_persona: activity.initial_message_persona.clone(),
            persona_initial_messages: activity.persona_initial_messages.clone(),
        })
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    pub fn selected_personas(&self) -> &[PersonaId] {
        &self.selected_personas
    }

    pub fn conversation_type(&self) -> ConversationType {
        self.conversation_type
    }

    pub fn initial_message_persona(&self) -> Option<&PersonaId> {
        self.initial_message_persona.as_ref()
    }

    pub fn message_for(&self, persona: &PersonaId) -> Option<&str> {
        self.persona_initial_messages.get(persona).map(String::as_str)
    }

    pub fn is_selected(&self, persona: &PersonaId) -> bool {
        self.selected_personas.contains(persona)
    }

    /// Flip membership of `persona`. Returns whether it is now selected.
    pub fn toggle(&mut self, persona: &PersonaId) -> bool {
        let selected = if self.is_selected(persona) {
            self.drop_member(persona);
            false
        } else {
            self.selected_personas.push(persona.clone());
            true
        };
        self.resolve_starter();
        selected
    }

    pub fn set_conversation_type(&mut self, conversation_type: ConversationType) {
        self.conversation_type = conversation_type;
        match conversation_type {
            ConversationType::Personal => self.initial_message_persona = None,
            ConversationType::Group => self.resolve_starter(),
        }
    }

    /// Choose who opens a group conversation
    pub fn set_starter(&mut self, persona: &PersonaId) -> Result<()> {
        if !self.is_selected(persona) {
            return Err(Error::persona_invalid(format!(
                "{} must be selected before it can start the conversation",
                persona
            )));
        }
        self.initial_message_persona = Some(persona.clone());
        Ok(())
    }

    /// Set the opening message of a selected persona. A blank message clears it.
    pub fn set_message(&mut self, persona: &PersonaId, message: &str) -> Result<()> {
        if !self.is_selected(persona) {
            return Err(Error::persona_invalid(format!(
                "{} must be selected before it can have an opening message",
                persona
            )));
        }
        if message.trim().is_empty() {
            self.persona_initial_messages.remove(persona);
        } else {
            self.persona_initial_messages
                .insert(persona.clone(), message.to_string());
        }
        Ok(())
    }

    /// Drop a persona that no longer exists
    pub fn forget_persona(&mut self, persona: &PersonaId) {
        if self.is_selected(persona) {
            debug!(persona = %persona, "Persona dropped from open dialog");
        }
        self.drop_member(persona);
        self.resolve_starter();
    }

    /// Commit the working state as a single activity patch
    pub fn into_patch(self) -> ActivityPatch {
        ActivityPatch {
            personas: Some(self.selected_personas),
            conversation_type: Some(self.conversation_type),
            initial_message_persona: Some(self.initial_message_persona),
            persona_initial_messages: Some(self.persona_initial_messages),
            ..Default::default()
        }
    }

    /// Discard the working state
    pub fn cancel(self) {
        debug!(activity = %self.activity_id, "Persona dialog cancelled");
    }

    fn drop_member(&mut self, persona: &PersonaId) {
        self.selected_personas.retain(|p| p != persona);
        self.persona_initial_messages.remove(persona);
    }

    fn resolve_starter(&mut self) {
        if self.conversation_type == ConversationType::Personal {
            return;
        }
        let valid = self
            .initial_message_persona
            .as_ref()
            .is_some_and(|starter| self.selected_personas.contains(starter));
        if !valid {
            self.initial_message_persona = self.selected_personas.first().cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityType, DEFAULT_ESTIMATED_TIME};

    fn pid(n: u64) -> PersonaId {
        PersonaId::from_seq(n)
    }

    fn conference() -> Activity {
        Activity::new(ActivityId::from_seq(1), ActivityType::Conference, DEFAULT_ESTIMATED_TIME)
    }

    #[test]
    fn test_open_rejects_non_persona_kinds() {
        let email = Activity::new(ActivityId::from_seq(2), ActivityType::Email, 10);
        assert!(matches!(
            PersonaDialog::open(&email).unwrap_err(),
            Error::DialogNotApplicable { .. }
        ));
    }

    #[test]
    fn test_group_switch_defaults_starter_to_first_selected() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        dialog.toggle(&pid(2));
        assert_eq!(dialog.initial_message_persona(), None);

        dialog.set_conversation_type(ConversationType::Group);
        assert_eq!(dialog.initial_message_persona(), Some(&pid(1)));

        dialog.set_starter(&pid(2)).unwrap();
        dialog.set_conversation_type(ConversationType::Personal);
        assert_eq!(dialog.initial_message_persona(), None);
    }

    #[test]
    fn test_starter_re_resolved_after_personal_round_trip() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        dialog.set_conversation_type(ConversationType::Group);
        assert_eq!(dialog.initial_message_persona(), Some(&pid(1)));

        dialog.set_conversation_type(ConversationType::Personal);
        assert_eq!(dialog.initial_message_persona(), None);

        dialog.toggle(&pid(1));
        dialog.toggle(&pid(2));
        dialog.toggle(&pid(3));
        assert_eq!(dialog.selected_personas(), &[pid(2), pid(3)]);

        dialog.set_conversation_type(ConversationType::Group);
        assert_eq!(dialog.initial_message_persona(), Some(&pid(2)));

        let patch = dialog.into_patch();
        assert_eq!(patch.initial_message_persona, Some(Some(pid(2))));
        assert_eq!(patch.personas, Some(vec![pid(2), pid(3)]));
    }

    #[test]
    fn test_starter_must_be_selected() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        assert!(dialog.set_starter(&pid(3)).is_err());
        assert!(dialog.set_message(&pid(3), "Hi").is_err());
    }

    #[test]
    fn test_untoggling_starter_moves_it() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        dialog.toggle(&pid(2));
        dialog.set_conversation_type(ConversationType::Group);
        dialog.set_message(&pid(1), "Morning all").unwrap();

        assert!(!dialog.toggle(&pid(1)));
        assert_eq!(dialog.initial_message_persona(), Some(&pid(2)));
        assert_eq!(dialog.message_for(&pid(1)), None);
    }

    #[test]
    fn test_into_patch_carries_everything() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        dialog.set_conversation_type(ConversationType::Group);
        dialog.set_message(&pid(1), "Welcome").unwrap();

        let mut activity = conference();
        activity.apply(dialog.into_patch()).unwrap();
        assert_eq!(activity.personas, vec![pid(1)]);
        assert_eq!(activity.conversation_type, ConversationType::Group);
        assert_eq!(activity.initial_message_persona, Some(pid(1)));
        assert_eq!(activity.persona_initial_messages[&pid(1)], "Welcome");
    }

    #[test]
    fn test_blank_message_clears() {
        let mut dialog = PersonaDialog::open(&conference()).unwrap();
        dialog.toggle(&pid(1));
        dialog.set_message(&pid(1), "Hello").unwrap();
        dialog.set_message(&pid(1), "   ").unwrap();
        assert_eq!(dialog.message_for(&pid(1)), None);
    }
}
