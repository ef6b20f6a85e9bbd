//! Command runners behind the CLI.
//!
//! Each runner loads one session from the data directory, drives a store
//! command, and prints the result as text or JSON. Store failures keep their
//! user-facing message as the top-level error context.
mod client;
mod context;
mod dashboard;
mod init;
mod notes;
mod process;
mod report;

pub use client::{run_client_new_project, run_client_new_request, run_client_status};
pub(crate) use context::SessionContext;
pub use dashboard::{run_dashboard, run_search, run_show};
pub use init::run_init;
pub use notes::{run_note_add, run_note_delete, run_note_edit};
pub use process::{run_edit, run_submit};

use crate::error::WorkflowError;
use crate::message::Message;
use crate::model::RequestElement;
use crate::util::parse_assignment;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;

/// Convert a store result, putting the store's message on top of the error.
pub(crate) fn surfaced<T>(
    result: std::result::Result<T, WorkflowError>,
    message: Option<&Message>,
) -> Result<T> {
    result.map_err(|err| match message {
        Some(message) => anyhow::Error::new(err).context(message.text.clone()),
        None => anyhow::Error::new(err),
    })
}

/// Parse repeated `--set field=value` flags in order.
pub(crate) fn parse_assignments(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| {
            parse_assignment(entry)
                .ok_or_else(|| anyhow!("invalid assignment {entry:?} (expected FIELD=VALUE)"))
        })
        .collect()
}

pub(crate) fn element_from_assignments(raw: &[String]) -> Result<RequestElement> {
    let mut element = RequestElement::new();
    for (field, value) in parse_assignments(raw)? {
        element.set(&field, value);
    }
    Ok(element)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
