//! Configuration panel for a single activity.
//!
//! Every setter writes straight through [`Scenario::update_activity`], so the
//! panel never holds a copy that could drift from the canvas.

mod fields;
mod persona_dialog;

pub use fields::*;
pub use persona_dialog::*;

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::scenario::{DependencyBadge, Scenario, ScenarioEvent};
use crate::types::{Activity, ActivityId, ActivityPatch, Competency};

/// Editing session bound to one activity of a scenario
#[derive(Debug)]
pub struct ConfigPanel<'a> {
    scenario: &'a mut Scenario,
    activity_id: ActivityId,
}

impl<'a> ConfigPanel<'a> {
    /// Panel for the currently selected activity
    pub fn for_selection(scenario: &'a mut Scenario) -> Result<Self> {
        let activity_id = scenario
            .activities()
            .selected_id()
            .cloned()
            .ok_or(Error::NothingSelected)?;
        Ok(Self {
            scenario,
            activity_id,
        })
    }

    pub fn for_activity(scenario: &'a mut Scenario, id: &ActivityId) -> Result<Self> {
        scenario.activity(id)?;
        Ok(Self {
            scenario,
            activity_id: id.clone(),
        })
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    pub fn activity(&self) -> Result<&Activity> {
        self.scenario.activity(&self.activity_id)
    }

    /// Content fields with their current values
    pub fn fields(&self) -> Result<Vec<FieldView>> {
        Ok(FieldView::for_content(&self.activity()?.content))
    }

    pub fn dependency_badges(&self) -> Vec<DependencyBadge> {
        self.scenario.incoming_badges(&self.activity_id)
    }

    // ─────────────────────────────────────────────────────────────
    // Write-through edits
    // ─────────────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<Option<ScenarioEvent>> {
        self.write(ActivityPatch {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    pub fn set_estimated_time(&mut self, minutes: u32) -> Result<Option<ScenarioEvent>> {
        self.write(ActivityPatch {
            estimated_time: Some(minutes),
            ..Default::default()
        })
    }

    pub fn set_competencies(
        &mut self,
        competencies: BTreeSet<Competency>,
    ) -> Result<Option<ScenarioEvent>> {
        self.write(ActivityPatch {
            competencies: Some(competencies),
            ..Default::default()
        })
    }

    /// Overwrite one content field of the activity
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<Option<ScenarioEvent>> {
        let mut content = self.activity()?.content.clone();
        content.set_field(key, value)?;
        debug!(activity = %self.activity_id, field = key, "Field edited");
        self.write(ActivityPatch {
            content: Some(content),
            ..Default::default()
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Persona dialog
    // ─────────────────────────────────────────────────────────────

    pub fn open_persona_dialog(&self) -> Result<PersonaDialog> {
        PersonaDialog::open(self.activity()?)
    }

    /// Commit a dialog opened on this panel's activity
    pub fn apply_dialog(&mut self, dialog: PersonaDialog) -> Result<Option<ScenarioEvent>> {
        if dialog.activity_id() != &self.activity_id {
            return Err(Error::Internal(format!(
                "persona dialog for {} applied to {}",
                dialog.activity_id(),
                self.activity_id
            )));
        }
        self.write(dialog.into_patch())
    }

    fn write(&mut self, patch: ActivityPatch) -> Result<Option<ScenarioEvent>> {
        self.scenario.update_activity(&self.activity_id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::NewPersona;
    use crate::scenario::DependencyKind;
    use crate::types::{ActivityType, ConversationType, PersonaId, DEFAULT_ESTIMATED_TIME};

    fn scenario_with(kind: ActivityType) -> Scenario {
        let mut scenario = Scenario::new("Panel");
        scenario.add_activity(kind, DEFAULT_ESTIMATED_TIME);
        scenario
    }

    #[test]
    fn test_panel_requires_selection() {
        let mut scenario = scenario_with(ActivityType::Email);
        scenario.clear_selection();
        assert!(matches!(
            ConfigPanel::for_selection(&mut scenario).unwrap_err(),
            Error::NothingSelected
        ));
    }

    #[test]
    fn test_edits_write_through() {
        let mut scenario = scenario_with(ActivityType::Email);
        {
            let mut panel = ConfigPanel::for_selection(&mut scenario).unwrap();
            panel.set_name("Quarterly numbers").unwrap();
            panel.set_field("subject", "Q3 results").unwrap();
            panel.set_estimated_time(0).unwrap();
        }

        let selected = scenario.selected().unwrap();
        assert_eq!(selected.name, "Quarterly numbers");
        assert_eq!(selected.content.field("subject"), Some("Q3 results"));
        assert_eq!(selected.estimated_time, 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut scenario = scenario_with(ActivityType::Calendar);
        let mut panel = ConfigPanel::for_selection(&mut scenario).unwrap();
        assert!(matches!(
            panel.set_field("agenda", "x").unwrap_err(),
            Error::UnknownField { .. }
        ));
        assert!(panel.fields().unwrap().iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_dialog_round_trip() {
        let mut scenario = scenario_with(ActivityType::Chat);
        scenario
            .add_persona(NewPersona::new("Sarah", "Manager"))
            .unwrap();
        scenario.add_persona(NewPersona::new("Tom", "Client")).unwrap();
        let (p1, p2) = (PersonaId::from_seq(1), PersonaId::from_seq(2));

        let mut panel = ConfigPanel::for_selection(&mut scenario).unwrap();
        let mut dialog = panel.open_persona_dialog().unwrap();
        dialog.toggle(&p1);
        dialog.toggle(&p2);
        dialog.set_conversation_type(ConversationType::Group);
        dialog.set_starter(&p2).unwrap();
        panel.apply_dialog(dialog).unwrap();

        let activity = panel.activity().unwrap();
        assert_eq!(activity.personas, vec![p1, p2.clone()]);
        assert_eq!(activity.initial_message_persona, Some(p2));
    }

    #[test]
    fn test_cancelled_dialog_changes_nothing() {
        let mut scenario = scenario_with(ActivityType::Conference);
        scenario.add_persona(NewPersona::new("Ana", "Lead")).unwrap();

        let panel = ConfigPanel::for_selection(&mut scenario).unwrap();
        let mut dialog = panel.open_persona_dialog().unwrap();
        dialog.toggle(&PersonaId::from_seq(1));
        dialog.cancel();

        assert!(panel.activity().unwrap().personas.is_empty());
    }

    #[test]
    fn test_dialog_not_applicable_for_document() {
        let mut scenario = scenario_with(ActivityType::Document);
        let panel = ConfigPanel::for_selection(&mut scenario).unwrap();
        assert!(matches!(
            panel.open_persona_dialog().unwrap_err(),
            Error::DialogNotApplicable { .. }
        ));
    }

    #[test]
    fn test_badges_follow_source_name() {
        let mut scenario = scenario_with(ActivityType::Email);
        scenario.add_activity(ActivityType::Chat, DEFAULT_ESTIMATED_TIME);
        let (email, chat) = (ActivityId::from_seq(1), ActivityId::from_seq(2));
        scenario
            .add_or_replace_dependency(&email, &chat, DependencyKind::Completion, "")
            .unwrap();

        let mut panel = ConfigPanel::for_activity(&mut scenario, &email).unwrap();
        panel.set_name("Kickoff").unwrap();
        assert!(panel.dependency_badges().is_empty());

        let panel = ConfigPanel::for_activity(&mut scenario, &chat).unwrap();
        let badges: Vec<String> = panel
            .dependency_badges()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(badges, vec!["Depends on: Kickoff".to_string()]);
    }
}
