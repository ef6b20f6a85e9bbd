//! Notes attached to the selected project and work.
//!
//! Local lists are updated only after the service accepts a change, so a
//! failed call leaves them as they were.
use crate::error::WorkflowError;
use crate::model::{Note, NoteScope, NoteSource};
use crate::service::DataService;

/// Who is writing, and which entities a new note should link to.
#[derive(Debug, Clone, Default)]
pub struct NoteContext {
    pub submitter: String,
    pub date: String,
    pub client_id: Option<String>,
    pub project_id: Option<String>,
    pub work_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NotesManager {
    project_notes: Vec<Note>,
    work_notes: Vec<Note>,
}

impl NotesManager {
    pub fn notes(&self, source: NoteSource) -> &[Note] {
        match source {
            NoteSource::Project => &self.project_notes,
            NoteSource::Work => &self.work_notes,
        }
    }

    fn notes_mut(&mut self, source: NoteSource) -> &mut Vec<Note> {
        match source {
            NoteSource::Project => &mut self.project_notes,
            NoteSource::Work => &mut self.work_notes,
        }
    }

    /// Publish freshly fetched lists for both sources at once.
    pub fn load(&mut self, project_notes: Vec<Note>, work_notes: Vec<Note>) {
        self.project_notes = project_notes;
        self.work_notes = work_notes;
    }

    pub fn clear(&mut self) {
        self.project_notes.clear();
        self.work_notes.clear();
    }

    /// Stamp, persist, and prepend a new note. Returns the stored note.
    pub fn create<S: DataService + ?Sized>(
        &mut self,
        service: &mut S,
        mut note: Note,
        source: NoteSource,
        context: &NoteContext,
    ) -> Result<Note, WorkflowError> {
        note.date_submitted = context.date.clone();
        note.submitter = context.submitter.clone();
        note.source = source;
        if note.scope == NoteScope::Client {
            note.attached_client_id = context.client_id.clone();
        }
        match source {
            NoteSource::Project => note.project_id = context.project_id.clone(),
            NoteSource::Work => note.work_id = context.work_id.clone(),
        }

        let id = service.create_note(&note)?;
        note.id = Some(id);
        self.notes_mut(source).insert(0, note.clone());
        Ok(note)
    }

    /// Persist an edited note and swap it into the local list by `Id`.
    pub fn update<S: DataService + ?Sized>(
        &mut self,
        service: &mut S,
        mut note: Note,
        source: NoteSource,
        context: &NoteContext,
    ) -> Result<Note, WorkflowError> {
        note.date_submitted = context.date.clone();
        service.update_note(&note)?;
        let list = self.notes_mut(source);
        match list.iter_mut().find(|stale| stale.id == note.id) {
            Some(stale) => *stale = note.clone(),
            None => tracing::warn!(note = ?note.id, "updated note is not in the local list"),
        }
        Ok(note)
    }

    /// Delete remotely, then drop the note whose `Id` matches the target.
    pub fn delete<S: DataService + ?Sized>(
        &mut self,
        service: &mut S,
        note: &Note,
        source: NoteSource,
    ) -> Result<(), WorkflowError> {
        let id = note.id.ok_or(WorkflowError::UnsavedNote)?;
        service.delete_note(id)?;
        self.notes_mut(source).retain(|existing| existing.id != Some(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Dataset, MemoryService, ServiceCall};

    fn context() -> NoteContext {
        NoteContext {
            submitter: "Ada".to_string(),
            date: "03/14/2024".to_string(),
            client_id: Some("c1".to_string()),
            project_id: Some("100".to_string()),
            work_id: Some("10".to_string()),
        }
    }

    #[test]
    fn create_stamps_links_and_prepends() {
        let mut service = MemoryService::new(Dataset::default());
        let mut notes = NotesManager::default();
        notes
            .create(
                &mut service,
                Note::draft(NoteScope::Employee, NoteSource::Work, "first"),
                NoteSource::Work,
                &context(),
            )
            .expect("create first");
        let second = notes
            .create(
                &mut service,
                Note::draft(NoteScope::Client, NoteSource::Work, "second"),
                NoteSource::Work,
                &context(),
            )
            .expect("create second");

        assert_eq!(second.submitter, "Ada");
        assert_eq!(second.date_submitted, "03/14/2024");
        assert_eq!(second.work_id.as_deref(), Some("10"));
        assert_eq!(second.attached_client_id.as_deref(), Some("c1"));
        assert!(second.project_id.is_none());
        let texts: Vec<&str> = notes
            .notes(NoteSource::Work)
            .iter()
            .map(|note| note.text.as_str())
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert!(notes.notes(NoteSource::Project).is_empty());
        assert_eq!(service.data().notes.len(), 2);
    }

    #[test]
    fn delete_removes_the_target_note_not_the_first() {
        let mut service = MemoryService::new(Dataset::default());
        let mut notes = NotesManager::default();
        for text in ["a", "b", "c"] {
            notes
                .create(
                    &mut service,
                    Note::draft(NoteScope::Employee, NoteSource::Project, text),
                    NoteSource::Project,
                    &context(),
                )
                .expect("create note");
        }
        let target = notes.notes(NoteSource::Project)[1].clone();
        assert_eq!(target.text, "b");
        notes
            .delete(&mut service, &target, NoteSource::Project)
            .expect("delete");
        let texts: Vec<&str> = notes
            .notes(NoteSource::Project)
            .iter()
            .map(|note| note.text.as_str())
            .collect();
        assert_eq!(texts, vec!["c", "a"]);
    }

    #[test]
    fn update_replaces_matching_entry_and_failures_leave_lists_alone() {
        let mut service = MemoryService::new(Dataset::default());
        let mut notes = NotesManager::default();
        let created = notes
            .create(
                &mut service,
                Note::draft(NoteScope::Employee, NoteSource::Work, "draft"),
                NoteSource::Work,
                &context(),
            )
            .expect("create");
        let mut edited = created.clone();
        edited.text = "final".to_string();
        let later = NoteContext {
            date: "03/15/2024".to_string(),
            ..context()
        };
        notes
            .update(&mut service, edited, NoteSource::Work, &later)
            .expect("update");
        assert_eq!(notes.notes(NoteSource::Work)[0].text, "final");
        assert_eq!(notes.notes(NoteSource::Work)[0].date_submitted, "03/15/2024");

        service.set_failing(true);
        let err = notes
            .delete(&mut service, &created, NoteSource::Work)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Service(_)));
        assert_eq!(notes.notes(NoteSource::Work).len(), 1);
        assert_eq!(service.calls().last(), Some(&ServiceCall::DeleteNote(1)));
    }
}
