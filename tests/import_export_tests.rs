use controls_core::{
    CpmEngine, LinkType, PersistenceError, load_tasks_from_csv, load_tasks_from_json,
    save_result_to_json,
};
use std::fs;

#[test]
fn json_task_list_round_trips_into_a_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
            {"id": 1, "name": "Design", "wbsCode": "1.1", "daysRequired": 2},
            {"id": 2, "name": "Build", "wbsCode": "1.2", "daysRequired": 3,
             "predecessors": [{"taskId": 1}]},
            {"id": 3, "name": "Verify", "wbsCode": "1.3", "daysRequired": 4,
             "predecessors": [2]}
        ]"#,
    )
    .unwrap();

    let tasks = load_tasks_from_json(&path).unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[1].predecessors[0].task_id, "1");

    let result = CpmEngine::with_tasks(tasks).calculate();
    assert_eq!(result.project_duration(), 9.0);
    assert_eq!(result.stats.critical_path, vec!["1", "2", "3"]);
}

#[test]
fn csv_task_list_parses_leniently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    fs::write(
        &path,
        "id,name,wbs_code,duration_days,predecessors,is_critical,percent_complete\n\
         eng,Engineering,1.1,5,,true,0.25\n\
         fab,Fabrication,1.2,,eng,false,\n\
         fit,Fit-out,1.3,2.5,\"eng,fab:SS\",,\n",
    )
    .unwrap();

    let tasks = load_tasks_from_csv(&path).unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].is_critical, Some(true));
    assert_eq!(tasks[0].percent_complete, Some(0.25));
    // Empty duration cell defers to the builder default.
    assert_eq!(tasks[1].duration_days, None);
    assert_eq!(tasks[2].predecessors.len(), 2);
    assert_eq!(tasks[2].predecessors[1].task_id, "fab");
    assert_eq!(tasks[2].predecessors[1].link, LinkType::StartToStart);
}

#[test]
fn csv_row_without_id_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    fs::write(
        &path,
        "id,name,wbs_code,duration_days,predecessors,is_critical,percent_complete\n\
         ,Nameless,,,,,\n",
    )
    .unwrap();

    match load_tasks_from_csv(&path) {
        Err(PersistenceError::InvalidData(msg)) => assert!(msg.contains("missing id")),
        other => panic!("expected InvalidData, got {other:?}"),
    }
}

#[test]
fn empty_csv_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    fs::write(
        &path,
        "id,name,wbs_code,duration_days,predecessors,is_critical,percent_complete\n",
    )
    .unwrap();

    assert!(matches!(
        load_tasks_from_csv(&path),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn malformed_json_surfaces_as_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        load_tasks_from_json(&path),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn missing_file_surfaces_as_io_error() {
    assert!(matches!(
        load_tasks_from_json("/nonexistent/tasks.json"),
        Err(PersistenceError::Io(_))
    ));
}

#[test]
fn saved_result_is_valid_json_with_stats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");

    let mut engine = CpmEngine::new();
    let mut second = controls_core::TaskInput::new("b", "B", 2.0);
    second.predecessors = vec![controls_core::PredecessorRef::new("a")];
    engine.load_tasks(vec![controls_core::TaskInput::new("a", "A", 1.0), second]);
    let result = engine.calculate();

    save_result_to_json(&result, &path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["stats"]["total_tasks"], 2);
    assert_eq!(value["stats"]["project_duration"], 3.0);
    assert_eq!(value["tasks"][1]["early_start"], 1.0);
    assert_eq!(value["tasks"][1]["is_critical"], true);
}
