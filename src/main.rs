use anyhow::Result;
use clap::Parser;
use clo_workflow::cli::{ClientCommand, Command, NoteCommand, RootArgs};
use clo_workflow::workflow;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log filter directives, e.g. `CLO_LOG=clo_workflow=debug`.
const LOG_ENV: &str = "CLO_LOG";

fn main() -> Result<()> {
    init_logging();
    let args = RootArgs::parse();

    match args.command {
        Command::Init(args) => workflow::run_init(args),
        Command::Dashboard(args) => workflow::run_dashboard(args),
        Command::Search(args) => workflow::run_search(args),
        Command::Show(args) => workflow::run_show(args),
        Command::Submit(args) => workflow::run_submit(args),
        Command::Edit(args) => workflow::run_edit(args),
        Command::Note(NoteCommand::Add(args)) => workflow::run_note_add(args),
        Command::Note(NoteCommand::Edit(args)) => workflow::run_note_edit(args),
        Command::Note(NoteCommand::Delete(args)) => workflow::run_note_delete(args),
        Command::Client(ClientCommand::Status(args)) => workflow::run_client_status(args),
        Command::Client(ClientCommand::NewProject(args)) => workflow::run_client_new_project(args),
        Command::Client(ClientCommand::NewRequest(args)) => workflow::run_client_new_request(args),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
