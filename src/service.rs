//! The data-service boundary the workflow core talks to.
//!
//! Calls are at-most-once: implementations never retry, and callers re-invoke
//! on failure. Two implementations ship with the crate: [`JsonFileService`]
//! persists a single JSON document on disk for the CLI, and [`MemoryService`]
//! keeps everything in memory and records mutating calls for tests.
use crate::error::ServiceError;
use crate::model::{ElementKind, Note, NoteScope, NoteSource, RequestElement, User};

mod dataset;
mod json_file;
mod memory;

pub use dataset::Dataset;
pub use json_file::JsonFileService;
pub use memory::{MemoryService, ServiceCall};

pub trait DataService {
    fn fetch_user(&self, user_id: &str) -> Result<User, ServiceError>;

    /// Processes sitting at any step the user's roles permit.
    fn fetch_active_processes(&self, user: &User) -> Result<Vec<RequestElement>, ServiceError>;

    fn fetch_by_id(
        &self,
        ids: &[u32],
        kind: ElementKind,
    ) -> Result<Vec<RequestElement>, ServiceError>;

    /// Persist a new element and return the id the backend assigned.
    fn create_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<u32, ServiceError>;

    fn update_element(
        &mut self,
        element: &RequestElement,
        kind: ElementKind,
    ) -> Result<(), ServiceError>;

    fn search_processes_by_title(&self, term: &str) -> Result<Vec<RequestElement>, ServiceError>;

    fn fetch_notes(
        &self,
        source: NoteSource,
        scope: NoteScope,
        entity_id: &str,
        submitter_id: &str,
    ) -> Result<Vec<Note>, ServiceError>;

    fn create_note(&mut self, note: &Note) -> Result<u32, ServiceError>;

    fn update_note(&mut self, note: &Note) -> Result<(), ServiceError>;

    fn delete_note(&mut self, id: u32) -> Result<(), ServiceError>;

    fn fetch_client_processes(&self, client_id: &str)
        -> Result<Vec<RequestElement>, ServiceError>;

    fn fetch_client_projects(&self, client_id: &str) -> Result<Vec<RequestElement>, ServiceError>;

    fn fetch_works(&self) -> Result<Vec<RequestElement>, ServiceError>;
}
