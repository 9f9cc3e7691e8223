//! Activity records and their per-kind content.
//!
//! An activity is one schedulable unit of a scenario. Its content is a tagged
//! union keyed by the activity kind, so every kind carries exactly the fields
//! it defines.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ActivityId, Competency, PersonaId};
use crate::error::{Error, Result};

/// Default duration for new activities, in minutes
pub const DEFAULT_ESTIMATED_TIME: u32 = 15;

/// Shortest allowed duration, in minutes
pub const MIN_ESTIMATED_TIME: u32 = 1;

// ─────────────────────────────────────────────────────────────────
// Activity Type
// ─────────────────────────────────────────────────────────────────

/// Kinds of activity that can be placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Chat,
    Email,
    Calendar,
    Document,
    Conference,
}

impl ActivityType {
    /// Get all activity types
    pub fn all() -> &'static [ActivityType] {
        &[
            ActivityType::Chat,
            ActivityType::Email,
            ActivityType::Calendar,
            ActivityType::Document,
            ActivityType::Conference,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ActivityType::Chat => "chat",
            ActivityType::Email => "email",
            ActivityType::Calendar => "calendar",
            ActivityType::Document => "document",
            ActivityType::Conference => "conference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Chat => "Chat",
            ActivityType::Email => "Email",
            ActivityType::Calendar => "Calendar",
            ActivityType::Document => "Document",
            ActivityType::Conference => "Conference",
        }
    }

    /// Whether personas can take part in this kind of activity
    pub fn supports_personas(&self) -> bool {
        matches!(self, ActivityType::Chat | ActivityType::Conference)
    }

    /// Display name given to freshly created activities
    pub fn default_name(&self) -> String {
        format!("New {}", self.label())
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(ActivityType::Chat),
            "email" => Ok(ActivityType::Email),
            "calendar" => Ok(ActivityType::Calendar),
            "document" => Ok(ActivityType::Document),
            "conference" | "meeting" => Ok(ActivityType::Conference),
            _ => Err(format!(
                "Unknown activity type '{}'. Valid: chat, email, calendar, document, conference",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Conversation Type
// ─────────────────────────────────────────────────────────────────

/// How personas talk to the participant in chat/conference activities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    /// Each persona holds its own one-to-one conversation
    #[default]
    Personal,
    /// All personas share one conversation opened by a single starter
    Group,
}

impl fmt::Display for ConversationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationType::Personal => write!(f, "personal"),
            ConversationType::Group => write!(f, "group"),
        }
    }
}

impl FromStr for ConversationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(ConversationType::Personal),
            "group" => Ok(ConversationType::Group),
            _ => Err(format!("Unknown conversation type '{}'. Valid: personal, group", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Content
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatContent {
    pub topic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailContent {
    pub subject: String,
    pub sender: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarContent {
    pub event_type: String,
    pub event_title: String,
    pub event_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentContent {
    pub document_type: String,
    pub template: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceContent {
    pub meeting_topic: String,
    pub meeting_type: String,
    pub agenda: String,
}

/// Kind-specific content of an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityContent {
    Chat(ChatContent),
    Email(EmailContent),
    Calendar(CalendarContent),
    Document(DocumentContent),
    Conference(ConferenceContent),
}

impl ActivityContent {
    /// Empty content record for the given kind
    pub fn empty(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Chat => ActivityContent::Chat(ChatContent::default()),
            ActivityType::Email => ActivityContent::Email(EmailContent::default()),
            ActivityType::Calendar => ActivityContent::Calendar(CalendarContent::default()),
            ActivityType::Document => ActivityContent::Document(DocumentContent::default()),
            ActivityType::Conference => ActivityContent::Conference(ConferenceContent::default()),
        }
    }

    pub fn kind(&self) -> ActivityType {
        match self {
            ActivityContent::Chat(_) => ActivityType::Chat,
            ActivityContent::Email(_) => ActivityType::Email,
            ActivityContent::Calendar(_) => ActivityType::Calendar,
            ActivityContent::Document(_) => ActivityType::Document,
            ActivityContent::Conference(_) => ActivityType::Conference,
        }
    }

    /// Look up a field by its key. `None` if the kind has no such field.
    pub fn field(&self, key: &str) -> Option<&str> {
        let value = match (self, key) {
            (ActivityContent::Chat(c), "topic") => &c.topic,
            (ActivityContent::Email(c), "subject") => &c.subject,
            (ActivityContent::Email(c), "sender") => &c.sender,
            (ActivityContent::Email(c), "body") => &c.body,
            (ActivityContent::Calendar(c), "event_type") => &c.event_type,
            (ActivityContent::Calendar(c), "event_title") => &c.event_title,
            (ActivityContent::Calendar(c), "event_description") => &c.event_description,
            (ActivityContent::Document(c), "document_type") => &c.document_type,
            (ActivityContent::Document(c), "template") => &c.template,
            (ActivityContent::Conference(c), "meeting_topic") => &c.meeting_topic,
            (ActivityContent::Conference(c), "meeting_type") => &c.meeting_type,
            (ActivityContent::Conference(c), "agenda") => &c.agenda,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Overwrite a field by its key
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let kind = self.kind();
        let slot = match (self, key) {
            (ActivityContent::Chat(c), "topic") => &mut c.topic,
            (ActivityContent::Email(c), "subject") => &mut c.subject,
            (ActivityContent::Email(c), "sender") => &mut c.sender,
            (ActivityContent::Email(c), "body") => &mut c.body,
            (ActivityContent::Calendar(c), "event_type") => &mut c.event_type,
            (ActivityContent::Calendar(c), "event_title") => &mut c.event_title,
            (ActivityContent::Calendar(c), "event_description") => &mut c.event_description,
            (ActivityContent::Document(c), "document_type") => &mut c.document_type,
            (ActivityContent::Document(c), "template") => &mut c.template,
            (ActivityContent::Conference(c), "meeting_topic") => &mut c.meeting_topic,
            (ActivityContent::Conference(c), "meeting_type") => &mut c.meeting_type,
            (ActivityContent::Conference(c), "agenda") => &mut c.agenda,
            _ => {
                return Err(Error::UnknownField {
                    kind: kind.to_string(),
                    field: key.to_string(),
                })
            }
        };
        *slot = value.into();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Activity
// ─────────────────────────────────────────────────────────────────

/// One activity on the scenario canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    #[serde(rename = "type")]
    pub kind: ActivityType,

    pub name: String,

    /// Minutes, never below [`MIN_ESTIMATED_TIME`]
    pub estimated_time: u32,

    #[serde(default)]
    pub competencies: BTreeSet<Competency>,

    #[serde(default)]
    pub personas: Vec<PersonaId>,

    #[serde(default)]
    pub conversation_type: ConversationType,

    /// Starter of a group conversation; always a member of `personas`
    #[serde(default)]
    pub initial_message_persona: Option<PersonaId>,

    #[serde(default)]
    pub persona_initial_messages: BTreeMap<PersonaId, String>,

    pub content: ActivityContent,
}

impl Activity {
    /// Create an activity with the defaults for its kind
    pub fn new(id: ActivityId, kind: ActivityType, estimated_time: u32) -> Self {
        Self {
            id,
            kind,
            name: kind.default_name(),
            estimated_time: estimated_time.max(MIN_ESTIMATED_TIME),
            competencies: BTreeSet::new(),
            personas: Vec::new(),
            conversation_type: ConversationType::default(),
            initial_message_persona: None,
            persona_initial_messages: BTreeMap::new(),
            content: ActivityContent::empty(kind),
        }
    }

    /// Strip a persona and re-resolve the starter. Returns whether anything changed.
    pub fn remove_persona(&mut self, persona: &PersonaId) -> bool {
        let before = self.personas.len();
        self.personas.retain(|p| p != persona);
        let removed_message = self.persona_initial_messages.remove(persona).is_some();
        let removed = self.personas.len() != before;
        if removed {
            self.resolve_initial_message_persona();
        }
        removed || removed_message
    }

    /// Reassign a starter that no longer belongs to `personas`
    pub fn resolve_initial_message_persona(&mut self) {
        let valid = self
            .initial_message_persona
            .as_ref()
            .map_or(true, |starter| self.personas.contains(starter));
        if !valid {
            self.initial_message_persona = self.personas.first().cloned();
        }
    }

    /// Merge a patch into this activity.
    ///
    /// The patch is checked before anything is written, so a rejected patch
    /// leaves the activity untouched.
    pub fn apply(&mut self, patch: ActivityPatch) -> Result<()> {
        if let Some(ref content) = patch.content {
            if content.kind() != self.kind {
                return Err(Error::ContentMismatch {
                    expected: self.kind.to_string(),
                    given: content.kind().to_string(),
                });
            }
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(minutes) = patch.estimated_time {
            self.estimated_time = minutes.max(MIN_ESTIMATED_TIME);
        }
        if let Some(competencies) = patch.competencies {
            self.competencies = competencies;
        }
        if let Some(personas) = patch.personas {
            let mut unique = Vec::with_capacity(personas.len());
            for p in personas {
                if !unique.contains(&p) {
                    unique.push(p);
                }
            }
            self.personas = unique;
        }
        if let Some(conversation_type) = patch.conversation_type {
            self.conversation_type = conversation_type;
        }
        if let Some(starter) = patch.initial_message_persona {
            self.initial_message_persona = starter;
        }
        if let Some(messages) = patch.persona_initial_messages {
            self.persona_initial_messages = messages;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }

        let personas = &self.personas;
        self.persona_initial_messages.retain(|p, _| personas.contains(p));
        self.resolve_initial_message_persona();
        Ok(())
    }
}

/// Partial update for an activity. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub estimated_time: Option<u32>,
    pub competencies: Option<BTreeSet<Competency>>,
    pub personas: Option<Vec<PersonaId>>,
    pub conversation_type: Option<ConversationType>,
    pub initial_message_persona: Option<Option<PersonaId>>,
    pub persona_initial_messages: Option<BTreeMap<PersonaId, String>>,
    pub content: Option<ActivityContent>,
}

impl ActivityPatch {
    /// Persona ids the patch refers to
    pub fn referenced_personas(&self) -> Vec<&PersonaId> {
        let mut ids: Vec<&PersonaId> = Vec::new();
        if let Some(ref personas) = self.personas {
            ids.extend(personas.iter());
        }
        if let Some(Some(ref starter)) = self.initial_message_persona {
            ids.push(starter);
        }
        if let Some(ref messages) = self.persona_initial_messages {
            ids.extend(messages.keys());
        }
        ids
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
