//! Read-only commands: dashboard, search, show.
use super::context::open_process;
use super::report::{print_briefs, DashboardReport, ProcessReport};
use super::{print_json, surfaced, SessionContext};
use crate::brief::Brief;
use crate::cli::{DashboardArgs, SearchArgs, ShowArgs};
use anyhow::{anyhow, Result};
use serde::Serialize;

pub fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.processor(&args.session.user)?;
    if let Some(step) = args.step.as_deref() {
        let result = store.select_focus_step(step);
        surfaced(result, None)?;
    }
    let report = DashboardReport::from_store(&store);
    if args.json {
        print_json(&report)
    } else {
        report.print();
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SearchReport {
    term: String,
    briefs: Vec<Brief>,
}

pub fn run_search(args: SearchArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.processor(&args.session.user)?;
    let result = store.search_processes(&args.term);
    let count = surfaced(result, store.last_message())?;
    tracing::debug!(count, "search finished");
    let report = SearchReport {
        term: args.term,
        briefs: store.searched_briefs().unwrap_or_default(),
    };
    if args.json {
        print_json(&report)
    } else {
        println!("{} result(s) for {:?}", report.briefs.len(), report.term);
        print_briefs(&report.briefs);
        Ok(())
    }
}

pub fn run_show(args: ShowArgs) -> Result<()> {
    let ctx = SessionContext::load(&args.session.data)?;
    let mut store = ctx.processor(&args.session.user)?;
    open_process(&mut store, args.process)?;
    let report = ProcessReport::from_store(&store)
        .ok_or_else(|| anyhow!("process {} could not be shown", args.process))?;
    if args.json {
        print_json(&report)
    } else {
        report.print();
        Ok(())
    }
}
