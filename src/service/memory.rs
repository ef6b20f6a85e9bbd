use super::{DataService, Dataset};
use crate::error::ServiceError;
use crate::model::{ElementKind, Note, NoteScope, NoteSource, RequestElement, User};

/// A mutating call the service received.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    CreateElement(ElementKind),
    UpdateElement(ElementKind, Option<u32>),
    CreateNote,
    UpdateNote(Option<u32>),
    DeleteNote(u32),
}

/// In-memory service with a call log and switchable failure.
#[derive(Debug, Default)]
pub struct MemoryService {
    data: Dataset,
    calls: Vec<ServiceCall>,
    failing: bool,
}

impl MemoryService {
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            calls: Vec::new(),
            failing: false,
        }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Mutating calls received so far, in order.
    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    /// Make every following call fail as if the backend were unreachable.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.failing {
            return Err(ServiceError::Unavailable("memory service offline".to_string()));
        }
        Ok(())
    }
}

impl DataService for MemoryService {
    fn fetch_user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.check()?;
        self.data.user(user_id)
    }

    fn fetch_active_processes(&self, user: &User) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.active_processes(user))
    }

    fn fetch_by_id(
        &self,
        ids: &[u32],
        kind: ElementKind,
    ) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.by_id(ids, kind))
    }

    fn create_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<u32, ServiceError> {
        self.calls.push(ServiceCall::CreateElement(kind));
        self.check()?;
        Ok(self.data.create_element(element, kind))
    }

    fn update_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<(), ServiceError> {
        self.calls.push(ServiceCall::UpdateElement(kind, element.id));
        self.check()?;
        self.data.update_element(element, kind)
    }

    fn search_processes_by_title(&self, term: &str) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.search_processes(term))
    }

    fn fetch_notes(
        &self,
        source: NoteSource,
        scope: NoteScope,
        entity_id: &str,
        submitter_id: &str,
    ) -> Result<Vec<Note>, ServiceError> {
        self.check()?;
        Ok(self.data.notes_for(source, scope, entity_id, submitter_id))
    }

    fn create_note(&mut self, note: &Note) -> Result<u32, ServiceError> {
        self.calls.push(ServiceCall::CreateNote);
        self.check()?;
        Ok(self.data.create_note(note))
    }

    fn update_note(&mut self, note: &Note) -> Result<(), ServiceError> {
        self.calls.push(ServiceCall::UpdateNote(note.id));
        self.check()?;
        self.data.update_note(note)
    }

    fn delete_note(&mut self, id: u32) -> Result<(), ServiceError> {
        self.calls.push(ServiceCall::DeleteNote(id));
        self.check()?;
        self.data.delete_note(id)
    }

    fn fetch_client_processes(
        &self,
        client_id: &str,
    ) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.submitted_by(ElementKind::Process, client_id))
    }

    fn fetch_client_projects(&self, client_id: &str) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.submitted_by(ElementKind::Project, client_id))
    }

    fn fetch_works(&self) -> Result<Vec<RequestElement>, ServiceError> {
        self.check()?;
        Ok(self.data.works.clone())
    }
}
