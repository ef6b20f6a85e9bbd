//! Printable views of store state.
use crate::brief::Brief;
use crate::client::{ClientProcessRow, ProjectGroup};
use crate::model::{Note, NoteSource, RequestElement};
use crate::navigator::Breadcrumb;
use crate::service::DataService;
use crate::store::WorkflowStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct StepCount {
    pub(crate) step: String,
    pub(crate) order_id: u32,
    pub(crate) count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardReport {
    pub(crate) user: String,
    pub(crate) steps: Vec<StepCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) focus_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) briefs: Option<Vec<Brief>>,
}

impl DashboardReport {
    pub(crate) fn from_store<S: DataService>(store: &WorkflowStore<S>) -> Self {
        let counts = store.process_counts_by_step();
        let permitted = store.user().permitted_steps();
        let steps = store
            .steps()
            .steps()
            .iter()
            .filter(|step| permitted.contains(&step.name))
            .map(|step| StepCount {
                step: step.name.clone(),
                order_id: step.order_id,
                count: counts.get(&step.name).copied().unwrap_or(0),
            })
            .collect();
        Self {
            user: store.user().name.clone(),
            steps,
            focus_step: store.focus_step().map(str::to_string),
            briefs: store.focus_step_briefs(),
        }
    }

    pub(crate) fn print(&self) {
        println!("{}", self.user);
        for step in &self.steps {
            println!("  {:<12} {}", step.step, step.count);
        }
        if let (Some(focus), Some(briefs)) = (&self.focus_step, &self.briefs) {
            println!();
            println!("{focus}:");
            print_briefs(briefs);
        }
    }
}

pub(crate) fn print_briefs(briefs: &[Brief]) {
    if briefs.is_empty() {
        println!("  (none)");
    }
    for brief in briefs {
        let marker = if brief.selectable { "" } else { " (incomplete)" };
        println!("  #{} {}{marker}", brief.id, brief.header);
        println!("      {}", brief.subheader);
        println!("      {}", brief.body);
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldError {
    pub(crate) field: String,
    pub(crate) error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessReport {
    pub(crate) breadcrumbs: Vec<Breadcrumb>,
    pub(crate) view: String,
    pub(crate) actionable: bool,
    pub(crate) process: RequestElement,
    pub(crate) work: RequestElement,
    pub(crate) project: RequestElement,
    pub(crate) errors: Vec<FieldError>,
    pub(crate) history: Vec<String>,
    pub(crate) work_notes: Vec<Note>,
    pub(crate) project_notes: Vec<Note>,
}

impl ProcessReport {
    /// Snapshot the selected process; `None` when nothing is selected.
    pub(crate) fn from_store<S: DataService>(store: &WorkflowStore<S>) -> Option<Self> {
        let selection = store.selection()?;
        let view = store.process_view().ok()?;
        let errors = store
            .process_validation()
            .map(|validation| {
                validation
                    .errors()
                    .map(|(field, error)| FieldError {
                        field: field.to_string(),
                        error: error.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let history = store
            .steps()
            .steps()
            .iter()
            .filter_map(|step| {
                store
                    .submission_metadata(&step.submitter_field_name)
                    .map(|meta| format!("{}: {meta}", step.name))
            })
            .collect();
        Some(Self {
            breadcrumbs: store.breadcrumbs(),
            view: view.name,
            actionable: store.is_selected_request_active(),
            process: selection.process.clone(),
            work: selection.work.clone(),
            project: selection.project.clone(),
            errors,
            history,
            work_notes: store.notes(NoteSource::Work).to_vec(),
            project_notes: store.notes(NoteSource::Project).to_vec(),
        })
    }

    pub(crate) fn print(&self) {
        let trail: Vec<&str> = self
            .breadcrumbs
            .iter()
            .map(|crumb| crumb.text.as_str())
            .collect();
        println!("{}", trail.join(" > "));
        let state = if self.actionable {
            "actionable"
        } else {
            "read-only"
        };
        println!("view: {} ({state})", self.view);
        print_element("process", &self.process);
        print_element("work", &self.work);
        print_element("project", &self.project);
        if !self.history.is_empty() {
            println!("history:");
            for line in &self.history {
                println!("  {line}");
            }
        }
        if self.actionable && !self.errors.is_empty() {
            println!("to submit:");
            for error in &self.errors {
                println!("  {}: {}", error.field, error.error);
            }
        }
        print_notes("work notes", &self.work_notes);
        print_notes("project notes", &self.project_notes);
    }
}

pub(crate) fn print_element(label: &str, element: &RequestElement) {
    let id = element.cache_key().unwrap_or_else(|| "-".to_string());
    println!("{label} {id}");
    for (field, value) in &element.fields {
        println!("  {field}: {value}");
    }
}

fn print_notes(label: &str, notes: &[Note]) {
    if notes.is_empty() {
        return;
    }
    println!("{label}:");
    for note in notes {
        let id = note.id.map(|id| id.to_string()).unwrap_or_default();
        println!(
            "  [{id}] {} {} ({:?}): {}",
            note.date_submitted, note.submitter, note.scope, note.text
        );
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ClientReport {
    pub(crate) user: String,
    pub(crate) projects: Vec<ProjectGroup>,
    pub(crate) processes: Vec<ClientProcessRow>,
}

impl ClientReport {
    pub(crate) fn print(&self) {
        println!("{}", self.user);
        for group in &self.projects {
            println!(
                "  project {} {} ({} requests)",
                group.project_id, group.title, group.count
            );
            let rows = self
                .processes
                .iter()
                .skip(group.start_index)
                .take(group.count);
            for row in rows {
                let id = row.id.map(|id| id.to_string()).unwrap_or_default();
                println!("    #{id} {}: {}", row.title, row.progress);
            }
        }
    }
}
