//! The client side: a client's own requests and new submissions.
use crate::error::WorkflowError;
use crate::form::{validate_group, ViewSet};
use crate::message::{Message, MessageBoard};
use crate::model::{
    ElementKind, RequestElement, User, FIELD_PROJECT_ID, FIELD_STEP, FIELD_SUBMITTER_ID,
    FIELD_TITLE, FIELD_TYPE, FIELD_WORK_ID,
};
use crate::service::DataService;
use crate::steps::StepGraph;
use serde::Serialize;
use std::time::Duration;

/// One of the client's processes with its place in the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientProcessRow {
    pub id: Option<u32>,
    pub project_id: String,
    pub title: String,
    /// e.g. "Clearance - 2 out of 5".
    pub progress: String,
}

/// A project with the number of processes filed under it.
///
/// Rows are listed project by project, so `start_index` is where this
/// project's processes begin in [`ClientStore::processes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectGroup {
    pub project_id: String,
    pub title: String,
    pub count: usize,
    pub start_index: usize,
}

/// Which work a new request is about.
#[derive(Debug, Clone)]
pub enum WorkChoice {
    Existing(u32),
    New {
        work_type: String,
        work: RequestElement,
    },
}

#[derive(Debug, Clone)]
pub struct NewRequest {
    pub project_id: u32,
    pub work: WorkChoice,
    /// Extra process fields supplied by the client.
    pub process: RequestElement,
}

pub struct ClientStore<S: DataService> {
    service: S,
    steps: StepGraph,
    views: ViewSet,
    user: User,
    processes: Vec<RequestElement>,
    projects: Vec<RequestElement>,
    works: Vec<RequestElement>,
    pending: bool,
    messages: MessageBoard,
}

impl<S: DataService> ClientStore<S> {
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
            processes: Vec::new(),
            projects: Vec::new(),
            works: Vec::new(),
            pending: false,
            messages: MessageBoard::new(message_display),
        }
    }

    pub fn init(&mut self) -> Result<(), WorkflowError> {
        let loaded = self.fetch_all();
        match loaded {
            Ok((processes, projects, works)) => {
                tracing::debug!(
                    client = %self.user.id,
                    processes = processes.len(),
                    projects = projects.len(),
                    "client requests loaded"
                );
                self.processes = processes;
                self.projects = projects;
                self.works = works;
                Ok(())
            }
            Err(err) => Err(self.report(err, "there was a problem loading your requests, try again")),
        }
    }

    #[allow(clippy::type_complexity)]
    fn fetch_all(
        &self,
    ) -> Result<(Vec<RequestElement>, Vec<RequestElement>, Vec<RequestElement>), WorkflowError>
    {
        let mut processes = self.service.fetch_client_processes(&self.user.id)?;
        processes.sort_by_key(project_order);
        let mut projects = self.service.fetch_client_projects(&self.user.id)?;
        projects.sort_by_key(|project| project.id);
        let works = self.service.fetch_works()?;
        Ok((processes, projects, works))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn message(&self) -> Option<&Message> {
        self.messages.current()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn report(&mut self, err: WorkflowError, user_text: &str) -> WorkflowError {
        tracing::warn!(error = %err, "{user_text}");
        self.messages.post(Message::error(user_text));
        err
    }

    pub fn works(&self) -> &[RequestElement] {
        &self.works
    }

    pub fn projects(&self) -> &[RequestElement] {
        &self.projects
    }

    /// The client's processes ordered by project.
    pub fn processes(&self) -> Vec<ClientProcessRow> {
        let total = self.steps.steps().len();
        self.processes
            .iter()
            .map(|process| {
                let step = process.step().unwrap_or_default();
                let progress = match self.steps.position(&step) {
                    Ok((position, _)) => format!("{step} - {position} out of {total}"),
                    Err(_) => step,
                };
                ClientProcessRow {
                    id: process.id,
                    project_id: process.project_id().unwrap_or_default(),
                    title: process.title().unwrap_or_default(),
                    progress,
                }
            })
            .collect()
    }

    pub fn project_groups(&self) -> Vec<ProjectGroup> {
        let mut start_index = 0;
        self.projects
            .iter()
            .map(|project| {
                let project_id = project.cache_key().unwrap_or_default();
                let count = self
                    .processes
                    .iter()
                    .filter(|process| process.project_id().as_deref() == Some(project_id.as_str()))
                    .count();
                let group = ProjectGroup {
                    title: project.title().unwrap_or_default(),
                    project_id,
                    count,
                    start_index,
                };
                start_index += count;
                group
            })
            .collect()
    }

    /// Validate a draft against the form for `type_name`.
    fn check_draft(&mut self, type_name: &str, draft: &RequestElement) -> Result<(), WorkflowError> {
        let view = self.views.get(type_name)?;
        let validation = validate_group(view, draft);
        if !validation.is_valid() {
            let err = WorkflowError::Validation {
                count: validation.error_count(),
            };
            return Err(self.report(err, "please fix all form errors"));
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<(), WorkflowError> {
        if self.pending {
            return Err(WorkflowError::Pending);
        }
        self.pending = true;
        Ok(())
    }

    /// Open a new project of `project_type` owned by this client.
    pub fn create_project(
        &mut self,
        project_type: &str,
        mut project: RequestElement,
    ) -> Result<u32, WorkflowError> {
        project.set(FIELD_TYPE, project_type);
        project.set(FIELD_SUBMITTER_ID, self.user.id.as_str());
        self.check_draft(project_type, &project)?;

        self.begin()?;
        let result = self.service.create_element(&project, ElementKind::Project);
        self.pending = false;
        let id = match result {
            Ok(id) => id,
            Err(err) => {
                return Err(self.report(
                    err.into(),
                    "there was a problem creating your new Project, try again",
                ))
            }
        };

        project.id = Some(id);
        tracing::info!(project = id, %project_type, "project created");
        self.projects.push(project);
        self.messages
            .post(Message::success("project successfully created"));
        Ok(id)
    }

    /// File a request: create the work if it is new, then a process at the
    /// first step titled after the work. Returns the new process id.
    pub fn create_request(&mut self, request: NewRequest) -> Result<u32, WorkflowError> {
        let project_key = request.project_id.to_string();
        if !self
            .projects
            .iter()
            .any(|project| project.cache_key().as_deref() == Some(project_key.as_str()))
        {
            return Err(self.report(
                WorkflowError::MissingEntity {
                    kind: ElementKind::Project,
                    id: project_key,
                },
                "that project could not be found",
            ));
        }
        let first_step = match self.steps.first_step() {
            Some(step) => step.name.clone(),
            None => return Err(WorkflowError::UnknownStepOrder(1)),
        };

        let new_work = match &request.work {
            WorkChoice::New { work_type, work } => {
                let mut work = work.clone();
                work.set(FIELD_TYPE, work_type.as_str());
                work.set(FIELD_SUBMITTER_ID, self.user.id.as_str());
                self.check_draft(work_type, &work)?;
                Some(work)
            }
            WorkChoice::Existing(_) => None,
        };
        let existing = match request.work {
            WorkChoice::Existing(id) => {
                let key = id.to_string();
                let found = self
                    .works
                    .iter()
                    .find(|work| work.cache_key().as_deref() == Some(key.as_str()))
                    .cloned();
                match found {
                    Some(work) => Some(work),
                    None => {
                        return Err(self.report(
                            WorkflowError::MissingEntity {
                                kind: ElementKind::Work,
                                id: key,
                            },
                            "that work could not be found",
                        ))
                    }
                }
            }
            WorkChoice::New { .. } => None,
        };

        self.begin()?;
        let result = self.file_request(
            new_work,
            existing,
            request.process,
            request.project_id,
            &first_step,
        );
        self.pending = false;
        match result {
            Ok(id) => {
                self.messages.post(Message::success(
                    "the new Process request was submitted successfully",
                ));
                Ok(id)
            }
            Err(err) => Err(self.report(
                err,
                "there was a problem submitting your new Process request, try again",
            )),
        }
    }

    /// The service calls behind [`Self::create_request`]; a failed work
    /// creation stops before any process is filed.
    fn file_request(
        &mut self,
        new_work: Option<RequestElement>,
        existing: Option<RequestElement>,
        mut process: RequestElement,
        project_id: u32,
        first_step: &str,
    ) -> Result<u32, WorkflowError> {
        let work = match (new_work, existing) {
            (Some(mut work), _) => {
                let id = self.service.create_element(&work, ElementKind::Work)?;
                work.id = Some(id);
                tracing::info!(work = id, "work created");
                self.works.push(work.clone());
                work
            }
            (None, Some(work)) => work,
            (None, None) => return Err(WorkflowError::MissingId { kind: ElementKind::Work }),
        };
        let work_id = work.id.ok_or(WorkflowError::MissingId {
            kind: ElementKind::Work,
        })?;

        process.set(FIELD_STEP, first_step);
        process.set(FIELD_TITLE, work.title().unwrap_or_default());
        process.set(FIELD_WORK_ID, work_id);
        process.set(FIELD_PROJECT_ID, project_id);
        process.set(FIELD_SUBMITTER_ID, self.user.id.as_str());
        if let Some(work_type) = work.element_type() {
            process.set(FIELD_TYPE, work_type);
        }
        let id = self.service.create_element(&process, ElementKind::Process)?;
        process.id = Some(id);
        tracing::info!(process = id, work = work_id, project = project_id, "request filed");
        self.processes.push(process);
        self.processes.sort_by_key(project_order);
        Ok(id)
    }
}

fn project_order(process: &RequestElement) -> u32 {
    process
        .project_id()
        .and_then(|id| id.parse().ok())
        .unwrap_or(u32::MAX)
}
