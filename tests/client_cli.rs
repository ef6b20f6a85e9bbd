mod common;

use common::DataDir;

#[test]
fn client_status_groups_requests_by_project() {
    let data = DataDir::init();
    let first = data.seed_request("Song A");
    let project_id = data.run_json(&["client", "status", "--user", "c1"])["projects"][0]
        ["project_id"]
        .as_str()
        .expect("project id")
        .to_string();

    let work_id = data.run_json(&["show", "--user", "e1", "--process", &first.to_string()])
        ["work"]["Id"]
        .as_u64()
        .expect("work id")
        .to_string();
    data.run_ok(&[
        "client",
        "new-request",
        "--user",
        "c1",
        "--project",
        &project_id,
        "--work",
        &work_id,
    ]);

    let status = data.run_json(&["client", "status", "--user", "c1"]);
    let projects = status["projects"].as_array().expect("projects");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["count"], 2);
    let processes = status["processes"].as_array().expect("processes");
    assert_eq!(processes.len(), 2);
    for process in processes {
        assert_eq!(process["title"], "Song A");
        assert_eq!(process["progress"], "Intake - 1 out of 5");
    }
}

#[test]
fn invalid_new_project_is_rejected_before_saving() {
    let data = DataDir::init();
    let stderr = data.run_err(&[
        "client",
        "new-project",
        "--user",
        "c1",
        "--type",
        "Synch",
        "--set",
        "Title=Night Train",
    ]);
    assert!(stderr.contains("please fix all form errors"), "{stderr}");
    let status = data.run_json(&["client", "status", "--user", "c1"]);
    assert_eq!(status["projects"].as_array().map(Vec::len), Some(0));
}

#[test]
fn sessions_are_split_by_role() {
    let data = DataDir::init();
    let stderr = data.run_err(&["client", "status", "--user", "e1"]);
    assert!(stderr.contains("processor"), "{stderr}");
    let stderr = data.run_err(&["dashboard", "--user", "c1"]);
    assert!(stderr.contains("no workflow steps"), "{stderr}");
    let stderr = data.run_err(&["dashboard", "--user", "nobody"]);
    assert!(stderr.contains("load user nobody"), "{stderr}");
}
