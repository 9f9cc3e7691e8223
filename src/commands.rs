//! Command handlers: one load, mutate, save cycle per invocation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{
    ActivitySubcommand, DependencySubcommand, FieldSubcommand, InboxSubcommand, NavSubcommand,
    PersonaSubcommand,
};
use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use crate::panel::ConfigPanel;
use crate::persona::NewPersona;
use crate::scenario::{Scenario, ScenarioEvent, ScenarioSummary};
use crate::storage::{snapshot, LocalStore, NavParams, INBOX_READ_KEY};
use crate::types::{ActivityId, ConversationType, PersonaId};

/// Everything a command needs besides its own arguments
#[derive(Debug)]
pub struct Context {
    pub config: BuilderConfig,
    pub scenario_path: PathBuf,
    pub json: bool,
}

impl Context {
    fn load(&self) -> Result<Scenario> {
        snapshot::load(&self.scenario_path)
    }

    /// Apply `f` to the stored scenario and save it if anything changed
    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Scenario) -> Result<Vec<ScenarioEvent>>,
    {
        let mut scenario = self.load()?;
        let events = f(&mut scenario)?;
        if events.is_empty() {
            debug!("Nothing changed, scenario not saved");
        } else {
            snapshot::save(&self.scenario_path, &scenario)?;
        }
        self.report(&events)
    }

    fn report(&self, events: &[ScenarioEvent]) -> Result<()> {
        if self.json {
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
        } else if events.is_empty() {
            println!("No changes");
        } else {
            for event in events {
                println!("{}", event);
            }
        }
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Scenario
// ─────────────────────────────────────────────────────────────────

pub fn init(ctx: &Context, name: Option<String>, force: bool) -> Result<()> {
    if snapshot::exists(&ctx.scenario_path) && !force {
        return Err(Error::Config(format!(
            "Scenario already exists: {}. Use --force to overwrite.",
            ctx.scenario_path.display()
        )));
    }

    let name = name.unwrap_or_else(|| ctx.config.builder.scenario_name.clone());
    let scenario = Scenario::new(name);
    snapshot::save(&ctx.scenario_path, &scenario)?;
    info!(scenario = %scenario.id, path = %ctx.scenario_path.display(), "Scenario created");

    if ctx.json {
        ctx.print_json(&scenario)
    } else {
        println!(
            "Created scenario '{}' at {}",
            scenario.name,
            ctx.scenario_path.display()
        );
        Ok(())
    }
}

pub fn show(ctx: &Context) -> Result<()> {
    let scenario = ctx.load()?;
    let summary = ScenarioSummary::of(&scenario);
    if ctx.json {
        ctx.print_json(&summary)
    } else {
        println!("{}", summary);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Activities
// ─────────────────────────────────────────────────────────────────

pub fn activity(ctx: &Context, subcommand: ActivitySubcommand) -> Result<()> {
    match subcommand {
        ActivitySubcommand::Add { kind, minutes } => {
            let minutes = minutes.unwrap_or(ctx.config.builder.default_estimated_time);
            ctx.mutate(|s| Ok(vec![s.add_activity(kind, minutes)]))
        }
        ActivitySubcommand::Update {
            id,
            name,
            minutes,
            competencies,
            clear_competencies,
        } => {
            let competencies = if clear_competencies {
                Some(BTreeSet::new())
            } else if competencies.is_empty() {
                None
            } else {
                Some(competencies.into_iter().collect())
            };
            ctx.mutate(|s| {
                let mut panel = ConfigPanel::for_activity(s, &id)?;
                let mut events = Vec::new();
                if let Some(name) = name {
                    events.extend(panel.set_name(name)?);
                }
                if let Some(minutes) = minutes {
                    events.extend(panel.set_estimated_time(minutes)?);
                }
                if let Some(competencies) = competencies {
                    events.extend(panel.set_competencies(competencies)?);
                }
                events.dedup();
                Ok(events)
            })
        }
        ActivitySubcommand::Remove { id } => ctx.mutate(|s| {
            let event = s
                .remove_activity(&id)
                .ok_or_else(|| Error::activity_not_found(&id))?;
            Ok(vec![event])
        }),
        ActivitySubcommand::Move { from, to } => {
            ctx.mutate(|s| Ok(s.reorder(from, to).into_iter().collect()))
        }
        ActivitySubcommand::Drag {
            payload,
            over,
            leave,
            cancel,
        } => ctx.mutate(|s| {
            if !s.start_drag_from_payload(&payload) {
                return Ok(Vec::new());
            }
            for index in over {
                s.drag_enter(index);
            }
            if leave {
                s.drag_leave();
            }
            debug!(state = ?s.drag_state(), "Drag released");
            if cancel {
                s.cancel_drag();
                return Ok(Vec::new());
            }
            Ok(s.end_drag().into_iter().collect())
        }),
        ActivitySubcommand::Select { id, clear } => ctx.mutate(|s| match id {
            Some(id) if !clear => Ok(vec![s.select(&id)?]),
            _ => Ok(vec![s.clear_selection()]),
        }),
        ActivitySubcommand::List => list_activities(ctx),
    }
}

fn list_activities(ctx: &Context) -> Result<()> {
    let scenario = ctx.load()?;
    let activities: Vec<_> = scenario.activities().iter().collect();
    if ctx.json {
        return ctx.print_json(&activities);
    }

    if scenario.activities().is_empty() {
        println!("No activities");
        return Ok(());
    }

    let selected = scenario.selected().map(|a| &a.id);
    for (index, activity) in activities.iter().enumerate() {
        let marker = if selected == Some(&activity.id) { "*" } else { " " };
        println!(
            "{} {:>2}  {:<8} {:<11} {:>3} min  {}",
            marker,
            index,
            activity.id,
            activity.kind,
            activity.estimated_time,
            activity.name
        );
        for badge in scenario.incoming_badges(&activity.id) {
            println!("                {}", badge);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Personas
// ─────────────────────────────────────────────────────────────────

pub fn persona(ctx: &Context, subcommand: PersonaSubcommand) -> Result<()> {
    match subcommand {
        PersonaSubcommand::Add {
            name,
            role,
            image,
            traits,
            instructions,
            initial_message,
        } => {
            let profile = NewPersona {
                image,
                instructions,
                initial_message,
                ..NewPersona::new(name, role).with_traits(traits)
            };
            ctx.mutate(|s| Ok(vec![s.add_persona(profile)?]))
        }
        PersonaSubcommand::Remove { id } => ctx.mutate(|s| {
            let event = s
                .remove_persona(&id, None)
                .ok_or_else(|| Error::persona_not_found(&id))?;
            Ok(vec![event])
        }),
        PersonaSubcommand::List => {
            let scenario = ctx.load()?;
            let personas = scenario.personas().list();
            if ctx.json {
                return ctx.print_json(personas);
            }
            if scenario.personas().is_empty() {
                println!("No personas");
            }
            for persona in personas {
                println!(
                    "{:<11} {} ({})  [{}]",
                    persona.id,
                    persona.name,
                    persona.role,
                    persona.traits.join(", ")
                );
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Dependencies
// ─────────────────────────────────────────────────────────────────

pub fn dependency(ctx: &Context, subcommand: DependencySubcommand) -> Result<()> {
    match subcommand {
        DependencySubcommand::Add {
            source,
            target,
            kind,
            condition,
        } => ctx.mutate(|s| {
            let condition = condition.unwrap_or_default();
            Ok(vec![s.add_or_replace_dependency(
                &source, &target, kind, &condition,
            )?])
        }),
        DependencySubcommand::Remove { source, target } => {
            ctx.mutate(|s| Ok(s.remove_dependency(&source, &target).into_iter().collect()))
        }
        DependencySubcommand::List { activity: Some(id) } => {
            let scenario = ctx.load()?;
            scenario.activity(&id)?;
            let badges = scenario.incoming_badges(&id);
            if ctx.json {
                return ctx.print_json(&badges);
            }
            for badge in badges {
                println!("{}", badge);
            }
            for edge in scenario.dependencies().outgoing(&id) {
                println!("Unlocks: {} ({})", edge.target_id, edge.kind);
            }
            Ok(())
        }
        DependencySubcommand::List { activity: None } => {
            let scenario = ctx.load()?;
            let edges: Vec<_> = scenario.dependencies().iter().collect();
            if ctx.json {
                return ctx.print_json(&edges);
            }
            if scenario.dependencies().is_empty() {
                println!("No dependencies");
            }
            for edge in edges {
                if edge.condition.is_empty() {
                    println!("{} -> {}  {}", edge.source_id, edge.target_id, edge.kind);
                } else {
                    println!(
                        "{} -> {}  {} ({})",
                        edge.source_id, edge.target_id, edge.kind, edge.condition
                    );
                }
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Configuration panel
// ─────────────────────────────────────────────────────────────────

fn open_panel<'a>(scenario: &'a mut Scenario, id: Option<&ActivityId>) -> Result<ConfigPanel<'a>> {
    match id {
        Some(id) => ConfigPanel::for_activity(scenario, id),
        None => ConfigPanel::for_selection(scenario),
    }
}

/// Persona dialog edits, applied in the order a user would click them
#[derive(Debug, Default)]
pub struct DialogEdits {
    pub toggle: Vec<PersonaId>,
    pub conversation: Option<ConversationType>,
    pub starter: Option<PersonaId>,
    pub messages: Vec<(PersonaId, String)>,
}

pub fn dialog(ctx: &Context, activity: Option<ActivityId>, edits: DialogEdits) -> Result<()> {
    ctx.mutate(|s| {
        let mut panel = open_panel(s, activity.as_ref())?;
        let mut dialog = panel.open_persona_dialog()?;

        for persona in &edits.toggle {
            dialog.toggle(persona);
        }
        if let Some(conversation_type) = edits.conversation {
            dialog.set_conversation_type(conversation_type);
        }
        if let Some(ref starter) = edits.starter {
            dialog.set_starter(starter)?;
        }
        for (persona, message) in &edits.messages {
            dialog.set_message(persona, message)?;
            debug!(
                persona = %persona,
                set = dialog.message_for(persona).is_some(),
                "Opening message edited"
            );
        }
        debug!(
            personas = ?dialog.selected_personas(),
            conversation = %dialog.conversation_type(),
            starter = ?dialog.initial_message_persona(),
            "Applying persona dialog"
        );

        Ok(panel.apply_dialog(dialog)?.into_iter().collect())
    })
}

pub fn field(ctx: &Context, subcommand: FieldSubcommand) -> Result<()> {
    match subcommand {
        FieldSubcommand::Set {
            key,
            value,
            activity,
        } => ctx.mutate(|s| {
            let mut panel = open_panel(s, activity.as_ref())?;
            Ok(panel.set_field(&key, &value)?.into_iter().collect())
        }),
        FieldSubcommand::List { activity } => {
            let mut scenario = ctx.load()?;
            let panel = open_panel(&mut scenario, activity.as_ref())?;
            let fields = panel.fields()?;
            if ctx.json {
                return ctx.print_json(&fields);
            }
            for field in fields {
                println!("{}", field);
            }
            for badge in panel.dependency_badges() {
                println!("{}", badge);
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Local store and navigation
// ─────────────────────────────────────────────────────────────────

pub fn inbox(ctx: &Context, subcommand: InboxSubcommand) -> Result<()> {
    let mut store = LocalStore::open(ctx.config.local_store_path())?;
    debug!(path = %store.path().display(), "Local store opened");
    match subcommand {
        InboxSubcommand::MarkRead { id } => {
            if store.mark_read(INBOX_READ_KEY, &id)? {
                println!("Marked {} as read", id);
            } else {
                println!("{} was already read", id);
            }
        }
        InboxSubcommand::List => {
            let ids = store.read_ids(INBOX_READ_KEY);
            if ctx.json {
                return ctx.print_json(&ids);
            }
            for id in ids {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

pub fn nav(ctx: &Context, subcommand: NavSubcommand) -> Result<()> {
    match subcommand {
        NavSubcommand::Competency { query } => {
            let params = NavParams::parse_with_default(
                query.as_deref().unwrap_or_default(),
                ctx.config.builder.default_competency,
            );
            if ctx.json {
                ctx.print_json(&serde_json::json!({ "competency": params.competency }))
            } else {
                println!("{}", params.competency.slug());
                Ok(())
            }
        }
    }
}
