use super::context::open_process;
use super::{print_json, surfaced, SessionContext};
use crate::cli::{NoteAddArgs, NoteDeleteArgs, NoteEditArgs, NoteTargetArgs, Target, Visibility};
use crate::model::{Note, NoteScope, NoteSource};
use crate::service::JsonFileService;
use crate::store::WorkflowStore;
use anyhow::{anyhow, Result};

fn note_source(target: Target) -> NoteSource {
    match target {
        Target::Work => NoteSource::Work,
        Target::Project => NoteSource::Project,
    }
}

fn open(target: &NoteTargetArgs) -> Result<WorkflowStore<JsonFileService>> {
    let ctx = SessionContext::load(&target.session.data)?;
    let mut store = ctx.processor(&target.session.user)?;
    open_process(&mut store, target.process)?;
    Ok(store)
}

fn find_note(
    store: &WorkflowStore<JsonFileService>,
    source: NoteSource,
    id: u32,
) -> Result<Note> {
    store
        .notes(source)
        .iter()
        .find(|note| note.id == Some(id))
        .cloned()
        .ok_or_else(|| anyhow!("note {id} not found on this {}", source.as_str()))
}

fn print_outcome(store: &WorkflowStore<JsonFileService>, note: Option<&Note>, json: bool) -> Result<()> {
    if json {
        if let Some(note) = note {
            return print_json(note);
        }
    }
    if let Some(message) = store.message() {
        println!("{}", message.text);
    }
    Ok(())
}

pub fn run_note_add(args: NoteAddArgs) -> Result<()> {
    let mut store = open(&args.target)?;
    let source = note_source(args.target.target);
    let scope = match args.scope {
        Visibility::Client => NoteScope::Client,
        Visibility::Employee => NoteScope::Employee,
    };
    let result = store.submit_new_note(Note::draft(scope, source, &args.text), source);
    let note = surfaced(result, store.last_message())?;
    print_outcome(&store, Some(&note), args.json)
}

pub fn run_note_edit(args: NoteEditArgs) -> Result<()> {
    let mut store = open(&args.target)?;
    let source = note_source(args.target.target);
    let mut note = find_note(&store, source, args.id)?;
    note.text = args.text;
    let result = store.update_note(note, source);
    let note = surfaced(result, store.last_message())?;
    print_outcome(&store, Some(&note), args.json)
}

pub fn run_note_delete(args: NoteDeleteArgs) -> Result<()> {
    let mut store = open(&args.target)?;
    let source = note_source(args.target.target);
    let note = find_note(&store, source, args.id)?;
    let result = store.delete_note(&note, source);
    surfaced(result, store.last_message())?;
    print_outcome(&store, None, false)
}
