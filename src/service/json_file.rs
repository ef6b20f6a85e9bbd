use super::dataset::DATASET_SCHEMA_VERSION;
use super::{DataService, Dataset};
use crate::error::ServiceError;
use crate::model::{ElementKind, Note, NoteScope, NoteSource, RequestElement, User};
use std::fs;
use std::path::{Path, PathBuf};

/// A service backed by one JSON document, read and rewritten per call.
#[derive(Debug, Clone)]
pub struct JsonFileService {
    path: PathBuf,
}

impl JsonFileService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `data` as the initial document, creating parent directories.
    pub fn init(&self, data: &Dataset) -> Result<(), ServiceError> {
        self.save(data)
    }

    pub fn load(&self) -> Result<Dataset, ServiceError> {
        let bytes = fs::read(&self.path).map_err(|err| {
            ServiceError::Unavailable(format!("read {}: {err}", self.path.display()))
        })?;
        let data: Dataset = serde_json::from_slice(&bytes)?;
        if data.schema_version != DATASET_SCHEMA_VERSION {
            return Err(ServiceError::Unavailable(format!(
                "unsupported store schema_version {}",
                data.schema_version
            )));
        }
        Ok(data)
    }

    fn save(&self, data: &Dataset) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, text.as_bytes())?;
        Ok(())
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Dataset) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut data = self.load()?;
        let value = change(&mut data)?;
        self.save(&data)?;
        Ok(value)
    }
}

impl DataService for JsonFileService {
    fn fetch_user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.load()?.user(user_id)
    }

    fn fetch_active_processes(&self, user: &User) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.active_processes(user))
    }

    fn fetch_by_id(
        &self,
        ids: &[u32],
        kind: ElementKind,
    ) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.by_id(ids, kind))
    }

    fn create_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<u32, ServiceError> {
        self.modify(|data| Ok(data.create_element(element, kind)))
    }

    fn update_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<(), ServiceError> {
        self.modify(|data| data.update_element(element, kind))
    }

    fn search_processes_by_title(&self, term: &str) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.search_processes(term))
    }

    fn fetch_notes(
        &self,
        source: NoteSource,
        scope: NoteScope,
        entity_id: &str,
        submitter_id: &str,
    ) -> Result<Vec<Note>, ServiceError> {
        Ok(self
            .load()?
            .notes_for(source, scope, entity_id, submitter_id))
    }

    fn create_note(&mut self, note: &Note) -> Result<u32, ServiceError> {
        self.modify(|data| Ok(data.create_note(note)))
    }

    fn update_note(&mut self, note: &Note) -> Result<(), ServiceError> {
        self.modify(|data| data.update_note(note))
    }

    fn delete_note(&mut self, id: u32) -> Result<(), ServiceError> {
        self.modify(|data| data.delete_note(id))
    }

    fn fetch_client_processes(
        &self,
        client_id: &str,
    ) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.submitted_by(ElementKind::Process, client_id))
    }

    fn fetch_client_projects(&self, client_id: &str) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.submitted_by(ElementKind::Project, client_id))
    }

    fn fetch_works(&self) -> Result<Vec<RequestElement>, ServiceError> {
        Ok(self.load()?.works)
    }
}
