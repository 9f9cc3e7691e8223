//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the scenario builder.

use clap::{Parser, Subcommand};

use crate::scenario::DependencyKind;
use crate::types::{ActivityId, ActivityType, Competency, ConversationType, PersonaId};

/// Scenario Builder - assessment scenario authoring
///
/// Builds a scenario of timed activities, assigns personas to conversations
/// and gates activities behind each other. Every command loads the scenario
/// file, applies one change and saves it back.
#[derive(Parser, Debug)]
#[command(name = "scenario-builder")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "SCENARIO_CONFIG", global = true)]
    pub config: Option<String>,

    /// Scenario file to operate on (overrides the configured location)
    #[arg(short, long, env = "SCENARIO_FILE", global = true)]
    pub scenario: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty scenario
    Init {
        /// Scenario name (defaults to the configured name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing scenario
        #[arg(short, long)]
        force: bool,
    },

    /// Show the scenario summary
    Show,

    /// Activities on the canvas
    Activity {
        #[command(subcommand)]
        subcommand: ActivitySubcommand,
    },

    /// Persona registry
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Gating between activities
    Dependency {
        #[command(subcommand)]
        subcommand: DependencySubcommand,
    },

    /// Edit the personas of a chat or conference activity in one step
    Dialog {
        /// Activity to edit (defaults to the selected one)
        #[arg(short, long)]
        activity: Option<ActivityId>,

        /// Toggle a persona's membership (repeatable)
        #[arg(long = "toggle", value_name = "PERSONA")]
        toggle: Vec<PersonaId>,

        /// Conversation type: personal, group
        #[arg(long)]
        conversation: Option<ConversationType>,

        /// Persona that opens a group conversation
        #[arg(long, value_name = "PERSONA")]
        starter: Option<PersonaId>,

        /// Opening message as PERSONA=TEXT (repeatable)
        #[arg(long = "message", value_name = "PERSONA=TEXT", value_parser = parse_persona_message)]
        messages: Vec<(PersonaId, String)>,
    },

    /// Content fields of an activity
    Field {
        #[command(subcommand)]
        subcommand: FieldSubcommand,
    },

    /// Inbox read-state flags
    Inbox {
        #[command(subcommand)]
        subcommand: InboxSubcommand,
    },

    /// Navigation parameter helpers
    Nav {
        #[command(subcommand)]
        subcommand: NavSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version information
    Version,
}

/// Activity subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ActivitySubcommand {
    /// Append an activity and select it
    Add {
        /// Activity type: chat, email, calendar, document, conference
        kind: ActivityType,

        /// Estimated minutes (defaults to the configured value)
        #[arg(short, long)]
        minutes: Option<u32>,
    },

    /// Change name, duration or competencies
    Update {
        id: ActivityId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        minutes: Option<u32>,

        /// Competency to cover (repeatable, replaces the current set)
        #[arg(long = "competency", value_name = "COMPETENCY")]
        competencies: Vec<Competency>,

        /// Remove every competency
        #[arg(long, conflicts_with = "competencies")]
        clear_competencies: bool,
    },

    /// Remove an activity and every dependency touching it
    Remove { id: ActivityId },

    /// Move the activity at FROM to position TO (zero-based)
    Move { from: usize, to: usize },

    /// Replay a drag gesture over the activity list
    Drag {
        /// Drag-transfer payload, e.g. '{"index":0}'
        payload: String,

        /// Rows entered during the drag, in order (repeatable)
        #[arg(long = "over", value_name = "INDEX")]
        over: Vec<usize>,

        /// The pointer left the list before the drop
        #[arg(long)]
        leave: bool,

        /// The drop landed outside the list; abandon the gesture
        #[arg(long)]
        cancel: bool,
    },

    /// Select an activity for editing
    Select {
        #[arg(required_unless_present = "clear")]
        id: Option<ActivityId>,

        /// Clear the selection instead
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },

    /// List activities in canvas order
    List,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// Create a persona
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        role: String,

        /// Image URL (placeholder when omitted)
        #[arg(long)]
        image: Option<String>,

        /// Personality trait (repeatable, first three are kept)
        #[arg(long = "trait", value_name = "TRAIT")]
        traits: Vec<String>,

        #[arg(long)]
        instructions: Option<String>,

        #[arg(long)]
        initial_message: Option<String>,
    },

    /// Remove a persona from the registry and from every activity
    Remove { id: PersonaId },

    /// List personas
    List,
}

/// Dependency subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DependencySubcommand {
    /// Gate TARGET behind SOURCE, replacing any existing edge for the pair
    Add {
        source: ActivityId,
        target: ActivityId,

        /// Dependency type: completion, score
        #[arg(short = 't', long = "type", default_value = "completion")]
        kind: DependencyKind,

        /// Score threshold, required for score dependencies
        #[arg(long)]
        condition: Option<String>,
    },

    /// Remove the edge SOURCE -> TARGET
    Remove { source: ActivityId, target: ActivityId },

    /// List edges, or the badges of one activity
    List {
        /// Only the dependencies gating this activity
        #[arg(short, long)]
        activity: Option<ActivityId>,
    },
}

/// Field subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FieldSubcommand {
    /// Set a content field
    Set {
        key: String,
        value: String,

        /// Activity to edit (defaults to the selected one)
        #[arg(short, long)]
        activity: Option<ActivityId>,
    },

    /// List content fields with their values
    List {
        /// Activity to show (defaults to the selected one)
        #[arg(short, long)]
        activity: Option<ActivityId>,
    },
}

/// Inbox subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum InboxSubcommand {
    /// Flag a message as read
    MarkRead { id: String },

    /// List read message ids
    List,
}

/// Navigation subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum NavSubcommand {
    /// Resolve the competency parameter of a query string or URL
    Competency {
        /// e.g. '?competency=problem-solving' (empty for the default)
        query: Option<String>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}

/// Parse `persona-1=Hello there`
fn parse_persona_message(s: &str) -> Result<(PersonaId, String), String> {
    let (persona, text) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected PERSONA=TEXT, got '{}'", s))?;
    Ok((persona.parse()?, text.to_string()))
}
