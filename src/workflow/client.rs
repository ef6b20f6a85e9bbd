//! Client commands: status, new project, new request.
use super::report::ClientReport;
use super::{element_from_assignments, print_json, surfaced, SessionContext};
use crate::cli::{ClientStatusArgs, NewProjectArgs, NewRequestArgs};
use crate::client::{ClientStore, NewRequest, WorkChoice};
use crate::model::RequestElement;
use crate::service::JsonFileService;
use anyhow::{anyhow, Result};
use serde::Serialize;

fn report(store: &ClientStore<JsonFileService>) -> ClientReport {
    ClientReport {
        user: store.user().name.clone(),
        projects: store.project_groups(),
        processes: store.processes(),
    }
}

#[derive(Debug, Serialize)]
struct Created {
    id: u32,
    message: Option<String>,
}

fn print_created(store: &ClientStore<JsonFileService>, id: u32, json: bool) -> Result<()> {
    let message = store.message().map(|message| message.text.clone());
    if json {
        return print_json(&Created { id, message });
    }
    if let Some(message) = message {
        println!("{message}");
    }
    println!("id: {id}");
    Ok(())
}

pub fn run_client_status(args: ClientStatusArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let store = ctx.client(&args.session.user)?;
    let report = report(&store);
    if args.json {
        print_json(&report)
    } else {
        report.print();
        Ok(())
    }
}

pub fn run_client_new_project(args: NewProjectArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.client(&args.session.user)?;
    let project = element_from_assignments(&args.assignments)?;
    let result = store.create_project(&args.project_type, project);
    let id = surfaced(result, store.last_message())?;
    print_created(&store, id, args.json)
}

pub fn run_client_new_request(args: NewRequestArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.client(&args.session.user)?;
    let work = match (args.work, args.work_type) {
        (Some(id), _) => WorkChoice::Existing(id),
        (None, Some(work_type)) => WorkChoice::New {
            work_type,
            work: element_from_assignments(&args.assignments)?,
        },
        (None, None) => return Err(anyhow!("pass --work or --work-type")),
    };
    let result = store.create_request(NewRequest {
        project_id: args.project,
        work,
        process: RequestElement::new(),
    });
    let id = surfaced(result, store.last_message())?;
    print_created(&store, id, args.json)
}
