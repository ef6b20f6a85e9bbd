//! Request elements, notes, and users.
//!
//! A request element is a project, work, or process: a flat record of
//! primitive field values plus an optional server-assigned `Id`. Values are
//! kept loose on purpose so views can describe arbitrary subtypes
//! ("Music", "Book", ...) without a schema change.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FIELD_STEP: &str = "step";
pub const FIELD_WORK_ID: &str = "workId";
pub const FIELD_PROJECT_ID: &str = "projectId";
pub const FIELD_SUBMITTER_ID: &str = "submitterId";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_TITLE: &str = "Title";

/// Work subtypes a client can request.
pub const WORK_TYPES: &[&str] = &[
    "Music",
    "Book",
    "Article",
    "Book Chapter",
    "Image",
    "Video",
    "Website",
    "Other",
];

/// Project subtypes a client can open.
pub const PROJECT_TYPES: &[&str] = &[
    "Synch",
    "Arranging",
    "Masters",
    "Grand",
    "Theatrical",
    "Movies",
    "Images",
];

/// A primitive form value: either text or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(number) => write!(f, "{number}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Which list a request element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Project,
    Work,
    Process,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Project => "project",
            ElementKind::Work => "work",
            ElementKind::Process => "process",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project, work, or process record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestElement {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldValue>,
}

impl RequestElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: u32) -> Self {
        Self {
            id: Some(id),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment, mostly for fixtures and new requests.
    pub fn field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Field rendered as text, with blank values treated as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|value| !value.is_blank())
            .map(ToString::to_string)
    }

    pub fn cache_key(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    pub fn step(&self) -> Option<String> {
        self.text(FIELD_STEP)
    }

    pub fn work_id(&self) -> Option<String> {
        self.text(FIELD_WORK_ID)
    }

    pub fn project_id(&self) -> Option<String> {
        self.text(FIELD_PROJECT_ID)
    }

    pub fn submitter_id(&self) -> Option<String> {
        self.text(FIELD_SUBMITTER_ID)
    }

    pub fn element_type(&self) -> Option<String> {
        self.text(FIELD_TYPE)
    }

    pub fn title(&self) -> Option<String> {
        self.text(FIELD_TITLE)
    }
}

/// Who may read a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteScope {
    Client,
    Employee,
}

/// Which entity a note is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    Project,
    Work,
}

impl NoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSource::Project => "project",
            NoteSource::Work => "work",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub date_submitted: String,
    #[serde(default)]
    pub submitter: String,
    pub scope: NoteScope,
    pub source: NoteSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_client_id: Option<String>,
    pub text: String,
}

impl Note {
    /// A note that has not been persisted yet.
    pub fn draft(scope: NoteScope, source: NoteSource, text: &str) -> Self {
        Self {
            id: None,
            date_submitted: String::new(),
            submitter: String::new(),
            scope,
            source,
            project_id: None,
            work_id: None,
            attached_client_id: None,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permitted_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// Step names across all roles, deduplicated in role order.
    pub fn permitted_steps(&self) -> Vec<String> {
        let mut steps: Vec<String> = Vec::new();
        for step in self.roles.iter().flat_map(|role| role.permitted_steps.iter()) {
            if !steps.contains(step) {
                steps.push(step.clone());
            }
        }
        steps
    }

    pub fn is_employee(&self) -> bool {
        self.roles.iter().any(|role| !role.permitted_steps.is_empty())
    }
}
