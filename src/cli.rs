//! CLI argument parsing for the clearance workflow.
//!
//! Each invocation is one session: load the data directory, run a single
//! store command, print the outcome, exit.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "clo",
    version,
    about = "Copyright clearance workflow: processor dashboard and client requests",
    after_help = "Examples:\n  clo init\n  clo client new-project --user c1 --type Synch --set Title=\"Night Train\" --set department=Film\n  clo client new-request --user c1 --project 1 --work-type Music --set Title=\"Song A\"\n  clo dashboard --user e1 --step Intake\n  clo submit --user e1 --process 3 --set intakeNotes=\"label contacted\"\n  clo search --user e1 song --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Dashboard(DashboardArgs),
    Search(SearchArgs),
    Show(ShowArgs),
    Submit(SubmitArgs),
    Edit(EditArgs),
    #[command(subcommand)]
    Note(NoteCommand),
    #[command(subcommand)]
    Client(ClientCommand),
}

/// Location of the data directory.
#[derive(Args, Debug, Clone)]
pub struct DataDirArgs {
    /// Directory holding config.json and store.json (default: $CLO_DATA_DIR,
    /// then the platform data dir)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Who is acting, and where their data lives.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Id of the acting user
    #[arg(long, value_name = "ID")]
    pub user: String,
}

#[derive(Parser, Debug)]
#[command(about = "Write the default config and an empty store")]
pub struct InitArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Overwrite an existing config.json and store.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Process counts per step, or one step's queue")]
pub struct DashboardArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Show the queue for this step
    #[arg(long, value_name = "STEP")]
    pub step: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Search past and present processes by title")]
pub struct SearchArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Case-insensitive title fragment
    pub term: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show a process with its work, project, and notes")]
pub struct ShowArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Process id
    #[arg(long, value_name = "ID")]
    pub process: u32,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Fill in step fields and advance a process to its next step")]
pub struct SubmitArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Process id
    #[arg(long, value_name = "ID")]
    pub process: u32,

    /// Field assignment applied before submitting (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Work,
    Project,
}

#[derive(Parser, Debug)]
#[command(about = "Edit the work or project behind an active process")]
pub struct EditArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Process id
    #[arg(long, value_name = "ID")]
    pub process: u32,

    /// Which record to edit
    #[arg(long, value_enum)]
    pub target: Target,

    /// Field assignment (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    pub assignments: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Client,
    Employee,
}

#[derive(Subcommand, Debug)]
#[command(about = "Add, edit, or delete notes on a process's work or project")]
pub enum NoteCommand {
    Add(NoteAddArgs),
    Edit(NoteEditArgs),
    Delete(NoteDeleteArgs),
}

/// The process and record a note belongs to.
#[derive(Args, Debug, Clone)]
pub struct NoteTargetArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Process id
    #[arg(long, value_name = "ID")]
    pub process: u32,

    /// Record the note is attached to
    #[arg(long, value_enum)]
    pub target: Target,
}

#[derive(Parser, Debug)]
#[command(about = "Add a note")]
pub struct NoteAddArgs {
    #[command(flatten)]
    pub target: NoteTargetArgs,

    /// Who may read the note
    #[arg(long, value_enum, default_value = "employee")]
    pub scope: Visibility,

    pub text: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Replace a note's text")]
pub struct NoteEditArgs {
    #[command(flatten)]
    pub target: NoteTargetArgs,

    /// Note id
    #[arg(long, value_name = "ID")]
    pub id: u32,

    pub text: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Delete a note")]
pub struct NoteDeleteArgs {
    #[command(flatten)]
    pub target: NoteTargetArgs,

    /// Note id
    #[arg(long, value_name = "ID")]
    pub id: u32,
}

#[derive(Subcommand, Debug)]
#[command(about = "Client requests")]
pub enum ClientCommand {
    Status(ClientStatusArgs),
    NewProject(NewProjectArgs),
    NewRequest(NewRequestArgs),
}

#[derive(Parser, Debug)]
#[command(about = "List the client's projects and processes")]
pub struct ClientStatusArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Open a new project")]
pub struct NewProjectArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Project type (Synch, Arranging, ...)
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: String,

    /// Field assignment (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Request clearance for a work under one of your projects")]
pub struct NewRequestArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Project id the request is filed under
    #[arg(long, value_name = "ID")]
    pub project: u32,

    /// Existing work id
    #[arg(long, value_name = "ID", conflicts_with = "work_type")]
    pub work: Option<u32>,

    /// Type of a new work to create (Music, Book, ...)
    #[arg(long, value_name = "TYPE", required_unless_present = "work")]
    pub work_type: Option<String>,

    /// Field assignment for the new work (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", requires = "work_type")]
    pub assignments: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
