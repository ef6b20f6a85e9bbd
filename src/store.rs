//! The processor-side workflow store.
//!
//! The store owns the session: the active and searched cache sets, the focused
//! step, scratch copies of the selected process and its work and project, the
//! notes for that selection, and the page stack. Commands are plain methods
//! that mutate the store and emit [`StoreEvent`]s to subscribers.
//!
//! # Pending lockout
//!
//! Every mutating command that reaches the data service sets `pending` before
//! the call and clears it afterwards, success or failure. Validation failures
//! return before the lock is taken, so they never touch the service.
//!
//! # Failures
//!
//! Service errors are logged with their detail and replaced by a generic
//! transient message. The command returns the error to the caller and leaves
//! cached state as it was.
use crate::brief::{self, Brief};
use crate::cache::{linked_ids, CacheSet};
use crate::config::COMPLETE_VIEW;
use crate::error::WorkflowError;
use crate::form::{validate_group, FormState, Validation, View, ViewSet};
use crate::message::{Message, MessageBoard};
use crate::model::{
    ElementKind, Note, NoteScope, NoteSource, RequestElement, User, FIELD_PROJECT_ID, FIELD_STEP,
    FIELD_TYPE, FIELD_WORK_ID,
};
use crate::navigator::{Breadcrumb, Navigator, ViewKey};
use crate::notes::{NoteContext, NotesManager};
use crate::service::DataService;
use crate::steps::StepGraph;
use crate::util::formatted_date;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

mod events;

pub use events::{ListenerId, StoreEvent};
use events::Listeners;

const FIX_ERRORS: &str = "please fix all form errors";

/// Where the selected process was picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    Active,
    Searched,
}

/// The two editable records hanging off a selected process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    Work,
    Project,
}

impl Detail {
    pub fn kind(&self) -> ElementKind {
        match self {
            Detail::Work => ElementKind::Work,
            Detail::Project => ElementKind::Project,
        }
    }

    fn link_field(&self) -> &'static str {
        match self {
            Detail::Work => FIELD_WORK_ID,
            Detail::Project => FIELD_PROJECT_ID,
        }
    }
}

/// Scratch copies for the selected request plus their editing state.
#[derive(Debug, Clone)]
pub struct Selection {
    pub process: RequestElement,
    pub work: RequestElement,
    pub project: RequestElement,
    pub origin: SelectionOrigin,
    editing_work: bool,
    editing_project: bool,
    process_form: FormState,
    work_form: FormState,
    project_form: FormState,
}

impl Selection {
    fn new(
        process: RequestElement,
        work: RequestElement,
        project: RequestElement,
        origin: SelectionOrigin,
    ) -> Self {
        Self {
            process,
            work,
            project,
            origin,
            editing_work: false,
            editing_project: false,
            process_form: FormState::default(),
            work_form: FormState::default(),
            project_form: FormState::default(),
        }
    }

    pub fn detail(&self, detail: Detail) -> &RequestElement {
        match detail {
            Detail::Work => &self.work,
            Detail::Project => &self.project,
        }
    }

    fn detail_mut(&mut self, detail: Detail) -> &mut RequestElement {
        match detail {
            Detail::Work => &mut self.work,
            Detail::Project => &mut self.project,
        }
    }

    pub fn is_editing(&self, detail: Detail) -> bool {
        match detail {
            Detail::Work => self.editing_work,
            Detail::Project => self.editing_project,
        }
    }

    fn set_editing(&mut self, detail: Detail, editing: bool) {
        match detail {
            Detail::Work => self.editing_work = editing,
            Detail::Project => self.editing_project = editing,
        }
    }

    pub fn process_form(&self) -> &FormState {
        &self.process_form
    }

    pub fn detail_form(&self, detail: Detail) -> &FormState {
        match detail {
            Detail::Work => &self.work_form,
            Detail::Project => &self.project_form,
        }
    }

    fn detail_form_mut(&mut self, detail: Detail) -> &mut FormState {
        match detail {
            Detail::Work => &mut self.work_form,
            Detail::Project => &mut self.project_form,
        }
    }
}

pub struct WorkflowStore<S: DataService> {
    service: S,
    steps: StepGraph,
    views: ViewSet,
    user: User,
    active: Option<CacheSet>,
    searched: Option<CacheSet>,
    focus_step: Option<String>,
    selection: Option<Selection>,
    notes: NotesManager,
    navigator: Navigator,
    pending: bool,
    messages: MessageBoard,
    pivot: Detail,
    client_mode: bool,
    listeners: Listeners,
}

impl<S: DataService> WorkflowStore<S> {
    pub fn new(
        service: S,
        steps: StepGraph,
        views: ViewSet,
        user: User,
        message_display: Duration,
    ) -> Self {
        Self {
            service,
            steps,
            views,
            user,
            active: None,
            searched: None,
            focus_step: None,
            selection: None,
            notes: NotesManager::default(),
            navigator: Navigator::new(ViewKey::Dashboard),
            pending: false,
            messages: MessageBoard::new(message_display),
            pivot: Detail::Work,
            client_mode: false,
            listeners: Listeners::default(),
        }
    }

    // ------------------------------------------------------------------
    // session

    /// Load the active cache set for the current user.
    pub fn init(&mut self) -> Result<(), WorkflowError> {
        let loaded = match self.fetch_active_set() {
            Ok(loaded) => loaded,
            Err(err) => {
                return Err(self.report(err, "there was a problem loading your processes, try again"))
            }
        };
        tracing::debug!(
            processes = loaded.processes.len(),
            works = loaded.works.len(),
            projects = loaded.projects.len(),
            "active caches loaded"
        );
        self.active = Some(loaded);
        self.clear_selection();
        self.set_pending(false);
        self.emit(StoreEvent::CachesLoaded);
        Ok(())
    }

    fn fetch_active_set(&self) -> Result<CacheSet, WorkflowError> {
        let processes = self.service.fetch_active_processes(&self.user)?;
        let projects = self.service.fetch_by_id(
            &linked_ids(&processes, FIELD_PROJECT_ID),
            ElementKind::Project,
        )?;
        let works = self
            .service
            .fetch_by_id(&linked_ids(&processes, FIELD_WORK_ID), ElementKind::Work)?;
        Ok(CacheSet::new(processes, works, projects))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn emit(&mut self, event: StoreEvent) {
        self.listeners.notify(&event);
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn steps(&self) -> &StepGraph {
        &self.steps
    }

    pub fn active(&self) -> Option<&CacheSet> {
        self.active.as_ref()
    }

    pub fn searched(&self) -> Option<&CacheSet> {
        self.searched.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn set_pending(&mut self, pending: bool) {
        if self.pending != pending {
            self.pending = pending;
            self.emit(StoreEvent::PendingChanged(pending));
        }
    }

    /// Run `op` with the pending lockout held; it is released on every path.
    fn with_lockout<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        self.set_pending(true);
        let result = op(self);
        self.set_pending(false);
        result
    }

    /// The message still within its display time.
    pub fn message(&self) -> Option<&Message> {
        self.messages.current()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn post(&mut self, message: Message) {
        self.messages.post(message.clone());
        self.emit(StoreEvent::MessagePosted(message));
    }

    /// Log the failure and show the user a generic message instead.
    fn report(&mut self, err: WorkflowError, user_text: &str) -> WorkflowError {
        tracing::warn!(error = %err, "{user_text}");
        self.post(Message::error(user_text));
        err
    }

    // ------------------------------------------------------------------
    // steps

    pub fn focus_step(&self) -> Option<&str> {
        self.focus_step.as_deref()
    }

    /// Focus a step's queue; any search results are dropped, and so is a
    /// selection that is not waiting at the new step.
    pub fn select_focus_step(&mut self, name: &str) -> Result<(), WorkflowError> {
        self.steps.step_by_name(name)?;
        self.searched = None;
        self.focus_step = Some(name.to_string());
        let stale = self
            .selection
            .as_ref()
            .is_some_and(|selection| selection.process.step().as_deref() != Some(name));
        if stale {
            self.clear_selection();
            self.navigator.reduce_to(ViewKey::Dashboard)?;
            self.emit(StoreEvent::NavigationChanged);
        }
        self.emit(StoreEvent::FocusChanged);
        Ok(())
    }

    pub fn is_focus_step(&self) -> bool {
        self.focus_step.is_some()
    }

    /// Active process counts keyed by step name.
    pub fn process_counts_by_step(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        if let Some(active) = &self.active {
            for process in active.processes.values() {
                if let Some(step) = process.step() {
                    *counts.entry(step).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Briefs for active processes waiting at the focused step.
    pub fn focus_step_briefs(&self) -> Option<Vec<Brief>> {
        let focus = self.focus_step.as_deref()?;
        let active = self.active.as_ref()?;
        let at_step = active
            .processes
            .filter(|process| process.step().as_deref() == Some(focus));
        brief::project(
            Some(&at_step),
            Some(&active.works),
            Some(&active.projects),
            &self.steps,
        )
    }

    // ------------------------------------------------------------------
    // search

    pub fn is_focus_search(&self) -> bool {
        self.searched.is_some()
    }

    /// Search past and present processes by title and publish the results as
    /// one cache set. Returns the number of matching processes.
    pub fn search_processes(&mut self, term: &str) -> Result<usize, WorkflowError> {
        let found = match self.fetch_search_set(term) {
            Ok(found) => found,
            Err(err) => return Err(self.report(err, "there was a problem searching, try again")),
        };
        let count = found.processes.len();
        tracing::info!(term, count, "search published");
        self.focus_step = None;
        self.searched = Some(found);
        self.emit(StoreEvent::SearchPublished);
        Ok(count)
    }

    fn fetch_search_set(&self, term: &str) -> Result<CacheSet, WorkflowError> {
        let processes = self.service.search_processes_by_title(term)?;
        let works = self
            .service
            .fetch_by_id(&linked_ids(&processes, FIELD_WORK_ID), ElementKind::Work)?;
        let projects = self.service.fetch_by_id(
            &linked_ids(&processes, FIELD_PROJECT_ID),
            ElementKind::Project,
        )?;
        Ok(CacheSet::new(processes, works, projects))
    }

    pub fn clear_search(&mut self) {
        if self.searched.take().is_some() {
            self.emit(StoreEvent::SearchPublished);
        }
    }

    pub fn searched_briefs(&self) -> Option<Vec<Brief>> {
        let searched = self.searched.as_ref()?;
        brief::project(
            Some(&searched.processes),
            Some(&searched.works),
            Some(&searched.projects),
            &self.steps,
        )
    }

    // ------------------------------------------------------------------
    // selection

    pub fn select_active_process(&mut self, brief: &Brief) -> Result<(), WorkflowError> {
        self.select_process(brief.id, SelectionOrigin::Active)
    }

    pub fn select_searched_process(&mut self, brief: &Brief) -> Result<(), WorkflowError> {
        self.select_process(brief.id, SelectionOrigin::Searched)
    }

    /// Copy the process and its work and project out of the cache set it was
    /// listed from, open the detail page, and load notes for both.
    pub fn select_process(
        &mut self,
        process_id: u32,
        origin: SelectionOrigin,
    ) -> Result<(), WorkflowError> {
        let resolved = self.resolve_selection(process_id, origin);
        let selection = match resolved {
            Ok(selection) => selection,
            Err(err) => return Err(self.report(err, "that process could not be opened")),
        };
        self.selection = Some(selection);
        self.notes.clear();
        self.pivot = Detail::Work;
        if self.navigator.current() != Some(ViewKey::ProcessDetail) {
            self.navigator.push(ViewKey::ProcessDetail);
        }
        self.emit(StoreEvent::SelectionChanged);
        self.emit(StoreEvent::NavigationChanged);

        match self.fetch_selection_notes() {
            Ok((project_notes, work_notes)) => {
                self.notes.load(project_notes, work_notes);
                self.emit(StoreEvent::NotesChanged(NoteSource::Work));
                self.emit(StoreEvent::NotesChanged(NoteSource::Project));
                Ok(())
            }
            Err(err) => Err(self.report(err, "there was a problem loading notes, try again")),
        }
    }

    fn cache_set(&self, origin: SelectionOrigin) -> Option<&CacheSet> {
        match origin {
            SelectionOrigin::Active => self.active.as_ref(),
            SelectionOrigin::Searched => self.searched.as_ref(),
        }
    }

    fn resolve_selection(
        &self,
        process_id: u32,
        origin: SelectionOrigin,
    ) -> Result<Selection, WorkflowError> {
        let caches = self.cache_set(origin).ok_or(WorkflowError::NotLoaded)?;
        let (process, work, project) = caches.resolve(&process_id.to_string())?;
        Ok(Selection::new(
            process.clone(),
            work.clone(),
            project.clone(),
            origin,
        ))
    }

    /// Both lists are fetched before either is published.
    fn fetch_selection_notes(&self) -> Result<(Vec<Note>, Vec<Note>), WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        let submitter = selection.process.submitter_id().unwrap_or_default();
        let work_id = selection.work.cache_key().unwrap_or_default();
        let project_id = selection.project.cache_key().unwrap_or_default();
        let work_notes = self.service.fetch_notes(
            NoteSource::Work,
            NoteScope::Employee,
            &work_id,
            &submitter,
        )?;
        let project_notes = self.service.fetch_notes(
            NoteSource::Project,
            NoteScope::Employee,
            &project_id,
            &submitter,
        )?;
        Ok((project_notes, work_notes))
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.notes.clear();
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    /// Only a process picked from the focused step's queue can be acted on;
    /// search results are history.
    pub fn is_selected_request_active(&self) -> bool {
        let Some(focus) = self.focus_step.as_deref() else {
            return false;
        };
        self.selection.as_ref().is_some_and(|selection| {
            selection.origin == SelectionOrigin::Active
                && selection.process.step().as_deref() == Some(focus)
        })
    }

    fn selection_mut(&mut self) -> Result<&mut Selection, WorkflowError> {
        self.selection.as_mut().ok_or(WorkflowError::NothingSelected)
    }

    /// "submitted by X on D" for the step that owns `field_name`.
    pub fn submission_metadata(&self, field_name: &str) -> Option<String> {
        let process = &self.selection.as_ref()?.process;
        let step = self.steps.step_for_field_name(field_name).ok()?;
        let submitter = process.text(&step.submitter_field_name)?;
        let date = process.text(&step.submission_date_field_name)?;
        Some(format!("submitted by {submitter} on {date}"))
    }

    // ------------------------------------------------------------------
    // process form

    /// The focused step's form, or the read-only summary for search results.
    pub fn process_view(&self) -> Result<View, WorkflowError> {
        match self.focus_step.as_deref() {
            Some(focus) => {
                let step = self.steps.step_by_name(focus)?;
                Ok(self.views.get(&step.view)?.clone())
            }
            None => self.views.get_readonly(COMPLETE_VIEW),
        }
    }

    pub fn process_validation(&self) -> Result<Validation, WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        Ok(validate_group(&self.process_view()?, &selection.process))
    }

    pub fn can_submit_process(&self) -> bool {
        !self.pending
            && self.is_selected_request_active()
            && self
                .process_validation()
                .is_ok_and(|validation| validation.is_valid())
    }

    pub fn update_selected_process(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<(), WorkflowError> {
        if !self.is_selected_request_active() {
            return Err(WorkflowError::NotActionable);
        }
        let selection = self.selection_mut()?;
        selection.process.set(field, value);
        selection.process_form.touch(field);
        self.emit(StoreEvent::SelectionEdited(ElementKind::Process));
        Ok(())
    }

    /// Advance the selected process to the next step.
    ///
    /// Stamps the submitter and date fields of the step being completed,
    /// persists, replaces the cached process, returns to the dashboard, and
    /// drops the selection.
    pub fn submit_selected_process(&mut self) -> Result<(), WorkflowError> {
        let view = self.process_view()?;
        self.selection_mut()?.process_form.touch_all_required(&view);
        let validation = self.process_validation()?;
        self.check_submittable(validation)?;

        let updated = match self.advanced_process() {
            Ok(updated) => updated,
            Err(err) => return Err(self.report(err, "this process cannot be advanced")),
        };
        let result = self.with_lockout(|store| {
            store
                .service
                .update_element(&updated, ElementKind::Process)?;
            let active = store.active.as_mut().ok_or(WorkflowError::NotLoaded)?;
            active.processes.replace(updated.clone())
        });
        if let Err(err) = result {
            return Err(self.report(
                err,
                "there was a problem submitting your process, try again",
            ));
        }

        let step = updated.step().unwrap_or_default();
        tracing::info!(process = ?updated.id, %step, "process advanced");
        self.navigator.reduce_to(ViewKey::Dashboard)?;
        self.emit(StoreEvent::NavigationChanged);
        self.emit(StoreEvent::Submitted {
            kind: ElementKind::Process,
            id: updated.id,
        });
        self.clear_selection();
        self.post(Message::success("process successfully submitted"));
        Ok(())
    }

    fn check_submittable(&mut self, validation: Validation) -> Result<(), WorkflowError> {
        if self.pending {
            return Err(self.report(WorkflowError::Pending, "please wait, another change is saving"));
        }
        if !self.is_selected_request_active() {
            return Err(self.report(
                WorkflowError::NotActionable,
                "this process cannot be submitted from here",
            ));
        }
        if !validation.is_valid() {
            let err = WorkflowError::Validation {
                count: validation.error_count(),
            };
            return Err(self.report(err, FIX_ERRORS));
        }
        Ok(())
    }

    fn advanced_process(&self) -> Result<RequestElement, WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        let current_name = selection
            .process
            .step()
            .ok_or_else(|| WorkflowError::MissingField {
                kind: ElementKind::Process,
                field: FIELD_STEP.to_string(),
            })?;
        let current = self.steps.step_by_name(&current_name)?;
        let next = self.steps.next_step(&current_name)?;

        let mut updated = selection.process.clone();
        updated.set(FIELD_STEP, next.name.as_str());
        updated.set(&current.submission_date_field_name, formatted_date());
        updated.set(&current.submitter_field_name, self.user.name.as_str());
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // work and project forms

    /// The form for a detail record's type, read-only unless editing.
    pub fn detail_view(&self, detail: Detail) -> Result<View, WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        let record = selection.detail(detail);
        let type_name = record
            .element_type()
            .ok_or_else(|| WorkflowError::MissingField {
                kind: detail.kind(),
                field: FIELD_TYPE.to_string(),
            })?;
        if selection.is_editing(detail) {
            Ok(self.views.get(&type_name)?.clone())
        } else {
            self.views.get_readonly(&type_name)
        }
    }

    pub fn detail_validation(&self, detail: Detail) -> Result<Validation, WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        Ok(validate_group(
            &self.detail_view(detail)?,
            selection.detail(detail),
        ))
    }

    pub fn can_submit_detail(&self, detail: Detail) -> bool {
        !self.pending
            && self.is_selected_request_active()
            && self
                .selection
                .as_ref()
                .is_some_and(|selection| selection.is_editing(detail))
            && self
                .detail_validation(detail)
                .is_ok_and(|validation| validation.is_valid())
    }

    pub fn start_editing(&mut self, detail: Detail) -> Result<(), WorkflowError> {
        if !self.is_selected_request_active() {
            return Err(WorkflowError::NotActionable);
        }
        self.selection_mut()?.set_editing(detail, true);
        self.emit(StoreEvent::EditingChanged(detail.kind()));
        Ok(())
    }

    /// Leave editing and throw away unsaved changes.
    pub fn stop_editing(&mut self, detail: Detail) -> Result<(), WorkflowError> {
        self.selection_mut()?.set_editing(detail, false);
        self.reset_detail(detail)?;
        self.emit(StoreEvent::EditingChanged(detail.kind()));
        Ok(())
    }

    /// Restore the scratch copy from the cache it was selected from.
    pub fn reset_detail(&mut self, detail: Detail) -> Result<(), WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        let id = selection
            .process
            .text(detail.link_field())
            .ok_or_else(|| WorkflowError::MissingField {
                kind: ElementKind::Process,
                field: detail.link_field().to_string(),
            })?;
        let caches = self
            .cache_set(selection.origin)
            .ok_or(WorkflowError::NotLoaded)?;
        let cached = caches
            .cache(detail.kind())
            .get(&id)
            .cloned()
            .ok_or(WorkflowError::MissingEntity {
                kind: detail.kind(),
                id,
            })?;
        let selection = self.selection_mut()?;
        *selection.detail_mut(detail) = cached;
        selection.detail_form_mut(detail).reset();
        self.emit(StoreEvent::SelectionEdited(detail.kind()));
        Ok(())
    }

    pub fn update_selected_detail(
        &mut self,
        detail: Detail,
        field: &str,
        value: &str,
    ) -> Result<(), WorkflowError> {
        let selection = self.selection_mut()?;
        if !selection.is_editing(detail) {
            return Err(WorkflowError::NotEditing(detail.kind()));
        }
        selection.detail_mut(detail).set(field, value);
        selection.detail_form_mut(detail).touch(field);
        self.emit(StoreEvent::SelectionEdited(detail.kind()));
        Ok(())
    }

    /// Persist the edited work or project and replace its cached copy.
    pub fn submit_selected_detail(&mut self, detail: Detail) -> Result<(), WorkflowError> {
        let view = self.detail_view(detail)?;
        let selection = self.selection_mut()?;
        if !selection.is_editing(detail) {
            return Err(WorkflowError::NotEditing(detail.kind()));
        }
        selection.detail_form_mut(detail).touch_all_required(&view);
        let validation = self.detail_validation(detail)?;
        self.check_submittable(validation)?;

        let updated = self
            .selection
            .as_ref()
            .map(|selection| selection.detail(detail).clone())
            .ok_or(WorkflowError::NothingSelected)?;
        let kind = detail.kind();
        let result = self.with_lockout(|store| {
            store.service.update_element(&updated, kind)?;
            let active = store.active.as_mut().ok_or(WorkflowError::NotLoaded)?;
            active.cache_mut(kind).replace(updated.clone())
        });
        if let Err(err) = result {
            let text = format!("there was a problem submitting your {kind}, try again");
            return Err(self.report(err, &text));
        }

        tracing::info!(%kind, id = ?updated.id, "request detail updated");
        self.selection_mut()?.set_editing(detail, false);
        self.emit(StoreEvent::Submitted {
            kind,
            id: updated.id,
        });
        self.post(Message::success(&format!("{kind} successfully submitted")));
        Ok(())
    }

    pub fn pivot(&self) -> Detail {
        self.pivot
    }

    /// Switch between the work and project panes. The pane being left is
    /// reset and taken out of editing.
    pub fn set_pivot(&mut self, pivot: Detail) -> Result<(), WorkflowError> {
        let leaving = match pivot {
            Detail::Work => Detail::Project,
            Detail::Project => Detail::Work,
        };
        self.pivot = pivot;
        if self.selection.is_some() {
            self.selection_mut()?.set_editing(leaving, false);
            self.reset_detail(leaving)?;
        }
        self.emit(StoreEvent::PivotChanged);
        Ok(())
    }

    pub fn client_mode(&self) -> bool {
        self.client_mode
    }

    pub fn toggle_client_mode(&mut self) {
        self.client_mode = !self.client_mode;
        self.emit(StoreEvent::ClientModeChanged);
    }

    // ------------------------------------------------------------------
    // navigation

    pub fn view_hierarchy(&self) -> &[ViewKey] {
        self.navigator.stack()
    }

    pub fn current_view(&self) -> Option<ViewKey> {
        self.navigator.current()
    }

    pub fn reduce_view_hierarchy(&mut self, key: ViewKey) -> Result<(), WorkflowError> {
        self.navigator.reduce_to(key)?;
        self.emit(StoreEvent::NavigationChanged);
        Ok(())
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let process = self.selection.as_ref().map(|selection| &selection.process);
        self.navigator.breadcrumbs(|key| match key {
            ViewKey::Dashboard => "Processor Dashboard".to_string(),
            ViewKey::ProcessDetail => {
                let type_name = process
                    .and_then(RequestElement::element_type)
                    .unwrap_or_default();
                let id = process
                    .and_then(RequestElement::cache_key)
                    .unwrap_or_default();
                format!("{type_name} Process {id} Detail").trim().to_string()
            }
        })
    }

    pub fn follow_breadcrumb(&mut self, crumb: &Breadcrumb) -> Result<(), WorkflowError> {
        self.navigator.follow(crumb)?;
        self.emit(StoreEvent::NavigationChanged);
        Ok(())
    }

    // ------------------------------------------------------------------
    // notes

    pub fn notes(&self, source: NoteSource) -> &[Note] {
        self.notes.notes(source)
    }

    fn note_context(&self) -> Result<NoteContext, WorkflowError> {
        let selection = self.selection.as_ref().ok_or(WorkflowError::NothingSelected)?;
        Ok(NoteContext {
            submitter: self.user.name.clone(),
            date: formatted_date(),
            client_id: selection.process.submitter_id(),
            project_id: selection.project.cache_key(),
            work_id: selection.work.cache_key(),
        })
    }

    pub fn submit_new_note(
        &mut self,
        note: Note,
        source: NoteSource,
    ) -> Result<Note, WorkflowError> {
        let context = self.note_context()?;
        let result = self.with_lockout(|store| {
            store
                .notes
                .create(&mut store.service, note, source, &context)
        });
        self.finish_note(result, source, "note successfully submitted", "submitting")
    }

    pub fn update_note(&mut self, note: Note, source: NoteSource) -> Result<Note, WorkflowError> {
        let context = self.note_context()?;
        let result = self.with_lockout(|store| {
            store
                .notes
                .update(&mut store.service, note, source, &context)
        });
        self.finish_note(result, source, "note successfully updated", "updating")
    }

    pub fn delete_note(&mut self, note: &Note, source: NoteSource) -> Result<(), WorkflowError> {
        let result =
            self.with_lockout(|store| store.notes.delete(&mut store.service, note, source));
        self.finish_note(result, source, "note successfully deleted", "deleting")
    }

    fn finish_note<T>(
        &mut self,
        result: Result<T, WorkflowError>,
        source: NoteSource,
        success: &str,
        verb: &str,
    ) -> Result<T, WorkflowError> {
        match result {
            Ok(value) => {
                self.emit(StoreEvent::NotesChanged(source));
                self.post(Message::success(success));
                Ok(value)
            }
            Err(err) => {
                let text = format!("there was a problem {verb} your note, try again");
                Err(self.report(err, &text))
            }
        }
    }
}
