use crate::error::ServiceError;
use crate::model::{
    ElementKind, Note, NoteScope, NoteSource, RequestElement, User, FIELD_SUBMITTER_ID,
};
use serde::{Deserialize, Serialize};

pub const DATASET_SCHEMA_VERSION: u32 = 1;

/// Everything a backend stores, as one serializable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub next_id: u32,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<RequestElement>,
    #[serde(default)]
    pub works: Vec<RequestElement>,
    #[serde(default)]
    pub processes: Vec<RequestElement>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

fn default_schema_version() -> u32 {
    DATASET_SCHEMA_VERSION
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            schema_version: DATASET_SCHEMA_VERSION,
            next_id: 0,
            users: Vec::new(),
            projects: Vec::new(),
            works: Vec::new(),
            processes: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn list(&self, kind: ElementKind) -> &[RequestElement] {
        match kind {
            ElementKind::Project => &self.projects,
            ElementKind::Work => &self.works,
            ElementKind::Process => &self.processes,
        }
    }

    fn list_mut(&mut self, kind: ElementKind) -> &mut Vec<RequestElement> {
        match kind {
            ElementKind::Project => &mut self.projects,
            ElementKind::Work => &mut self.works,
            ElementKind::Process => &mut self.processes,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let used = self
            .projects
            .iter()
            .chain(&self.works)
            .chain(&self.processes)
            .filter_map(|element| element.id)
            .chain(self.notes.iter().filter_map(|note| note.id))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(used) + 1;
        self.next_id
    }

    pub fn user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                what: format!("user {user_id}"),
            })
    }

    pub fn active_processes(&self, user: &User) -> Vec<RequestElement> {
        let permitted = user.permitted_steps();
        self.processes
            .iter()
            .filter(|process| {
                process
                    .step()
                    .is_some_and(|step| permitted.contains(&step))
            })
            .cloned()
            .collect()
    }

    pub fn by_id(&self, ids: &[u32], kind: ElementKind) -> Vec<RequestElement> {
        self.list(kind)
            .iter()
            .filter(|element| element.id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect()
    }

    pub fn create_element(&mut self, element: &RequestElement, kind: ElementKind) -> u32 {
        let id = self.allocate_id();
        let mut stored = element.clone();
        stored.id = Some(id);
        self.list_mut(kind).push(stored);
        id
    }

    pub fn update_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<(), ServiceError> {
        let id = element.id.ok_or_else(|| ServiceError::Rejected {
            kind: kind.to_string(),
            id: "<none>".to_string(),
            reason: "element has no Id".to_string(),
        })?;
        let slot = self
            .list_mut(kind)
            .iter_mut()
            .find(|stored| stored.id == Some(id))
            .ok_or_else(|| ServiceError::Rejected {
                kind: kind.to_string(),
                id: id.to_string(),
                reason: "no such element".to_string(),
            })?;
        *slot = element.clone();
        Ok(())
    }

    /// Case-insensitive title match across every process, past or present.
    pub fn search_processes(&self, term: &str) -> Vec<RequestElement> {
        let needle = term.trim().to_lowercase();
        self.processes
            .iter()
            .filter(|process| {
                process
                    .title()
                    .is_some_and(|title| title.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Notes for one project or work, newest first.
    ///
    /// Employees see every note on the entity; clients only see client-scoped
    /// notes addressed to them.
    pub fn notes_for(
        &self,
        source: NoteSource,
        scope: NoteScope,
        entity_id: &str,
        submitter_id: &str,
    ) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.source == source)
            .filter(|note| {
                let linked = match source {
                    NoteSource::Project => note.project_id.as_deref(),
                    NoteSource::Work => note.work_id.as_deref(),
                };
                linked == Some(entity_id)
            })
            .filter(|note| match scope {
                NoteScope::Employee => true,
                NoteScope::Client => {
                    note.scope == NoteScope::Client
                        && note.attached_client_id.as_deref() == Some(submitter_id)
                }
            })
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.id.cmp(&a.id));
        notes
    }

    pub fn create_note(&mut self, note: &Note) -> u32 {
        let id = self.allocate_id();
        let mut stored = note.clone();
        stored.id = Some(id);
        self.notes.push(stored);
        id
    }

    pub fn update_note(&mut self, note: &Note) -> Result<(), ServiceError> {
        let slot = self
            .notes
            .iter_mut()
            .find(|stored| note.id.is_some() && stored.id == note.id)
            .ok_or_else(|| ServiceError::Rejected {
                kind: "note".to_string(),
                id: note.id.map(|id| id.to_string()).unwrap_or_default(),
                reason: "no such note".to_string(),
            })?;
        *slot = note.clone();
        Ok(())
    }

    pub fn delete_note(&mut self, id: u32) -> Result<(), ServiceError> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == Some(id))
            .ok_or_else(|| ServiceError::NotFound {
                what: format!("note {id}"),
            })?;
        self.notes.remove(index);
        Ok(())
    }

    pub fn submitted_by(&self, kind: ElementKind, client_id: &str) -> Vec<RequestElement> {
        self.list(kind)
            .iter()
            .filter(|element| element.text(FIELD_SUBMITTER_ID).as_deref() == Some(client_id))
            .cloned()
            .collect()
    }
}
