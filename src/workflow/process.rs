//! Commands that change a selected process or its work and project.
use super::context::open_process;
use super::report::print_element;
use super::{parse_assignments, print_json, surfaced, SessionContext};
use crate::cli::{EditArgs, SubmitArgs, Target};
use crate::error::WorkflowError;
use crate::form::Validation;
use crate::service::JsonFileService;
use crate::store::{Detail, WorkflowStore};
use anyhow::{anyhow, Context, Result};

impl From<Target> for Detail {
    fn from(target: Target) -> Self {
        match target {
            Target::Work => Detail::Work,
            Target::Project => Detail::Project,
        }
    }
}

pub fn run_submit(args: SubmitArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.processor(&args.session.user)?;
    open_process(&mut store, args.process)?;
    for (field, value) in parse_assignments(&args.assignments)? {
        let result = store.update_selected_process(&field, &value);
        surfaced(result, None).with_context(|| format!("set {field}"))?;
    }

    let result = store.submit_selected_process();
    if let Err(err) = result {
        let validation = store.process_validation().ok();
        return Err(submit_failure(err, &store, validation));
    }

    let key = args.process.to_string();
    let process = store
        .active()
        .and_then(|active| active.processes.get(&key))
        .cloned()
        .ok_or_else(|| anyhow!("process {key} missing after submit"))?;
    if args.json {
        return print_json(&process);
    }
    if let Some(message) = store.message() {
        println!("{}", message.text);
    }
    println!(
        "process {key} is now at {}",
        process.step().unwrap_or_default()
    );
    Ok(())
}

pub fn run_edit(args: EditArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.processor(&args.session.user)?;
    open_process(&mut store, args.process)?;
    let detail = Detail::from(args.target);

    let result = store
        .set_pivot(detail)
        .and_then(|()| store.start_editing(detail));
    surfaced(result, None)
        .with_context(|| format!("process {} is not at one of your steps", args.process))?;
    for (field, value) in parse_assignments(&args.assignments)? {
        let result = store.update_selected_detail(detail, &field, &value);
        surfaced(result, None).with_context(|| format!("set {field}"))?;
    }

    let result = store.submit_selected_detail(detail);
    if let Err(err) = result {
        let validation = store.detail_validation(detail).ok();
        return Err(submit_failure(err, &store, validation));
    }

    let record = store
        .selection()
        .map(|selection| selection.detail(detail).clone())
        .ok_or_else(|| anyhow!("selection lost after edit"))?;
    if args.json {
        return print_json(&record);
    }
    if let Some(message) = store.message() {
        println!("{}", message.text);
    }
    print_element(detail.kind().as_str(), &record);
    Ok(())
}

/// The store's message, plus the field errors when validation blocked it.
fn submit_failure(
    err: WorkflowError,
    store: &WorkflowStore<JsonFileService>,
    validation: Option<Validation>,
) -> anyhow::Error {
    let mut text = store
        .last_message()
        .map(|message| message.text.clone())
        .unwrap_or_else(|| err.to_string());
    if let (WorkflowError::Validation { .. }, Some(validation)) = (&err, validation) {
        for (field, error) in validation.errors() {
            text.push_str(&format!("\n  {field}: {error}"));
        }
    }
    anyhow::Error::new(err).context(text)
}
