//! End-to-end runs of the `clo` binary against a temp data directory.

mod common;

use common::DataDir;

#[test]
fn request_moves_from_intake_to_clearance() {
    let data = DataDir::init();
    let process_id = data.seed_request("Song A");
    let process = process_id.to_string();

    let dashboard = data.run_json(&["dashboard", "--user", "e1", "--step", "Intake"]);
    let steps = dashboard["steps"].as_array().expect("steps");
    let intake = steps
        .iter()
        .find(|step| step["step"] == "Intake")
        .expect("intake count");
    assert_eq!(intake["count"], 1);
    let briefs = dashboard["briefs"].as_array().expect("briefs");
    assert_eq!(briefs.len(), 1);
    assert_eq!(briefs[0]["id"].as_u64(), Some(process_id));
    assert_eq!(briefs[0]["header"], "Film Music Process");
    assert_eq!(briefs[0]["body"], "Song A - R. Roe");

    let stderr = data.run_err(&["submit", "--user", "e1", "--process", &process]);
    assert!(stderr.contains("please fix all form errors"), "{stderr}");
    assert!(stderr.contains("intakeNotes"), "{stderr}");

    let submitted = data.run_json(&[
        "submit",
        "--user",
        "e1",
        "--process",
        &process,
        "--set",
        "intakeNotes=label contacted",
    ]);
    assert_eq!(submitted["step"], "Clearance");
    assert_eq!(submitted["intakeSubmitter"], "Pat Coordinator");
    assert!(submitted["intakeSubmissionDate"].is_string());

    let dashboard = data.run_json(&["dashboard", "--user", "e1", "--step", "Intake"]);
    assert_eq!(dashboard["briefs"].as_array().map(Vec::len), Some(0));

    let clearance = data.run_json(&["dashboard", "--user", "e2", "--step", "Clearance"]);
    let briefs = clearance["briefs"].as_array().expect("briefs");
    assert_eq!(briefs.len(), 1);
    assert!(briefs[0]["subheader"]
        .as_str()
        .expect("subheader")
        .starts_with("submitted to Clearance on "));
}

#[test]
fn show_reports_history_and_read_only_search_results() {
    let data = DataDir::init();
    let process = data.seed_request("Song A").to_string();
    data.run_ok(&[
        "submit",
        "--user",
        "e1",
        "--process",
        &process,
        "--set",
        "intakeNotes=ok",
    ]);

    // e1 cannot act at Clearance, so the process opens as history.
    let shown = data.run_json(&["show", "--user", "e1", "--process", &process]);
    assert_eq!(shown["actionable"], false);
    assert_eq!(shown["view"], "Complete");
    let history = shown["history"].as_array().expect("history");
    assert_eq!(history.len(), 1);
    assert!(history[0]
        .as_str()
        .expect("history line")
        .starts_with("Intake: submitted by Pat Coordinator on "));

    let shown = data.run_json(&["show", "--user", "e2", "--process", &process]);
    assert_eq!(shown["actionable"], true);
    assert_eq!(shown["view"], "Clearance");
    let crumbs: Vec<&str> = shown["breadcrumbs"]
        .as_array()
        .expect("breadcrumbs")
        .iter()
        .filter_map(|crumb| crumb["text"].as_str())
        .collect();
    assert_eq!(
        crumbs,
        vec![
            "Processor Dashboard",
            &format!("Music Process {process} Detail")
        ]
    );

    let stderr = data.run_err(&[
        "submit",
        "--user",
        "e1",
        "--process",
        &process,
        "--set",
        "rightsHolder=Label",
    ]);
    assert!(stderr.contains("not actionable"), "{stderr}");
}

#[test]
fn search_matches_titles_case_insensitively() {
    let data = DataDir::init();
    data.seed_request("Song A");
    data.seed_request("Another Tune");

    let found = data.run_json(&["search", "--user", "e1", "SONG"]);
    let briefs = found["briefs"].as_array().expect("briefs");
    assert_eq!(briefs.len(), 1);
    assert_eq!(briefs[0]["body"], "Song A - R. Roe");
}

#[test]
fn work_edits_and_notes_round_trip_through_the_store() {
    let data = DataDir::init();
    let process = data.seed_request("Song A").to_string();

    let work = data.run_json(&[
        "edit",
        "--user",
        "e1",
        "--process",
        &process,
        "--target",
        "work",
        "--set",
        "Title=Song A (Remastered)",
    ]);
    assert_eq!(work["Title"], "Song A (Remastered)");

    let stderr = data.run_err(&[
        "edit",
        "--user",
        "e1",
        "--process",
        &process,
        "--target",
        "project",
        "--set",
        "department=",
    ]);
    assert!(stderr.contains("department"), "{stderr}");

    let note = data.run_json(&[
        "note",
        "add",
        "--user",
        "e1",
        "--process",
        &process,
        "--target",
        "work",
        "--scope",
        "client",
        "label asked for a cue sheet",
    ]);
    assert_eq!(note["submitter"], "Pat Coordinator");
    assert_eq!(note["attachedClientId"], "c1");
    let note_id = note["Id"].as_u64().expect("note id").to_string();

    let edited = data.run_json(&[
        "note",
        "edit",
        "--user",
        "e1",
        "--process",
        &process,
        "--target",
        "work",
        "--id",
        &note_id,
        "cue sheet received",
    ]);
    assert_eq!(edited["text"], "cue sheet received");

    let shown = data.run_json(&["show", "--user", "e1", "--process", &process]);
    assert_eq!(shown["work"]["Title"], "Song A (Remastered)");
    assert_eq!(shown["work_notes"][0]["text"], "cue sheet received");

    data.run_ok(&[
        "note",
        "delete",
        "--user",
        "e1",
        "--process",
        &process,
        "--target",
        "work",
        "--id",
        &note_id,
    ]);
    let shown = data.run_json(&["show", "--user", "e1", "--process", &process]);
    assert_eq!(shown["work_notes"].as_array().map(Vec::len), Some(0));
}

#[test]
fn commands_need_an_initialized_data_dir() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_clo"))
        .args(["dashboard", "--user", "e1", "--data-dir"])
        .arg(dir.path())
        .env_remove("CLO_DATA_DIR")
        .output()
        .expect("run clo");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clo init"), "{stderr}");
}
