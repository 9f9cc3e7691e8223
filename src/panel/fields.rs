//! Per-kind field layout of the configuration panel.

use std::fmt;

use serde::Serialize;

use crate::types::{ActivityContent, ActivityType};

/// One editable content field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Key used by [`ActivityContent::field`]
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    /// Rendered as a text area rather than a single line
    pub multiline: bool,
}

const fn field(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        placeholder,
        multiline: false,
    }
}

const fn text_area(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        placeholder,
        multiline: true,
    }
}

const CHAT_FIELDS: &[FieldSpec] = &[field(
    "topic",
    "Conversation topic",
    "What the personas will talk about",
)];

const EMAIL_FIELDS: &[FieldSpec] = &[
    field("subject", "Subject", "Enter email subject"),
    field("sender", "Sender", "e.g. manager@company.com"),
    text_area("body", "Body", "Write the email the participant receives"),
];

const CALENDAR_FIELDS: &[FieldSpec] = &[
    field("event_type", "Event type", "e.g. meeting, deadline, reminder"),
    field("event_title", "Event title", "Enter event title"),
    text_area("event_description", "Event description", "Describe the event"),
];

const DOCUMENT_FIELDS: &[FieldSpec] = &[
    field("document_type", "Document type", "e.g. report, proposal, memo"),
    text_area("template", "Template", "Starting content for the document"),
];

const CONFERENCE_FIELDS: &[FieldSpec] = &[
    field("meeting_topic", "Meeting topic", "Enter meeting topic"),
    field("meeting_type", "Meeting type", "e.g. one-on-one, team sync, client call"),
    text_area("agenda", "Agenda", "List the agenda items"),
];

/// Ordered field list for an activity kind
pub fn fields_for(kind: ActivityType) -> &'static [FieldSpec] {
    match kind {
        ActivityType::Chat => CHAT_FIELDS,
        ActivityType::Email => EMAIL_FIELDS,
        ActivityType::Calendar => CALENDAR_FIELDS,
        ActivityType::Document => DOCUMENT_FIELDS,
        ActivityType::Conference => CONFERENCE_FIELDS,
    }
}

/// A field paired with the activity's current value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: String,
}

impl FieldView {
    /// Lay out every field of `content`, empty values included
    pub fn for_content(content: &ActivityContent) -> Vec<FieldView> {
        fields_for(content.kind())
            .iter()
            .map(|spec| FieldView {
                spec: *spec,
                value: content.field(spec.key).unwrap_or_default().to_string(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl fmt::Display for FieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{:<20} ({})", self.spec.label, self.spec.placeholder)
        } else {
            write!(f, "{:<20} {}", self.spec.label, self.value)
        }
    }
}
