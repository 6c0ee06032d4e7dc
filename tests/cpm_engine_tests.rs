use controls_core::{CpmEngine, PredecessorRef, TaskInput};

fn task(id: &str, duration: f64, preds: &[&str]) -> TaskInput {
    let mut task = TaskInput::new(id, format!("Task {id}"), duration);
    task.predecessors = preds.iter().map(|p| PredecessorRef::new(*p)).collect();
    task
}

fn chain() -> Vec<TaskInput> {
    vec![
        task("a", 2.0, &[]),
        task("b", 3.0, &["a"]),
        task("c", 4.0, &["b"]),
    ]
}

#[test]
fn linear_chain_is_fully_critical() {
    let result = CpmEngine::with_tasks(chain()).calculate();

    assert_eq!(result.project_duration(), 9.0);
    assert_eq!(result.stats.critical_tasks_count, 3);
    assert_eq!(result.stats.critical_path, vec!["a", "b", "c"]);
    for scheduled in &result.tasks {
        assert!(scheduled.is_critical, "task {}", scheduled.id);
        assert_eq!(scheduled.total_float, Some(0.0));
    }

    let c = result.find_task("c").unwrap();
    assert_eq!(c.early_start, Some(5.0));
    assert_eq!(c.early_finish, Some(9.0));
    assert_eq!(c.late_finish, Some(9.0));
}

#[test]
fn isolated_task_is_dangling_and_off_the_critical_path() {
    let mut tasks = chain();
    tasks.push(task("d", 1.0, &[]));
    let result = CpmEngine::with_tasks(tasks).calculate();

    assert_eq!(result.project_duration(), 9.0);
    assert_eq!(result.stats.dangling_tasks, vec!["d"]);
    assert_eq!(result.stats.critical_path, vec!["a", "b", "c"]);

    let d = result.find_task("d").unwrap();
    assert!(d.is_dangling);
    assert!(!d.is_critical);
    // Dates rest solely on its own duration.
    assert_eq!(d.early_start, Some(0.0));
    assert_eq!(d.early_finish, Some(1.0));
    assert_eq!(d.total_float, Some(8.0));

    // (0 + 0 + 0 + 8) / 4
    assert_eq!(result.stats.average_float, Some(2.0));
}

#[test]
fn entry_tasks_start_at_day_zero() {
    let result = CpmEngine::with_tasks(vec![
        task("x", 5.0, &[]),
        task("y", 2.0, &[]),
        task("z", 1.0, &["x", "y"]),
    ])
    .calculate();

    assert_eq!(result.find_task("x").unwrap().early_start, Some(0.0));
    assert_eq!(result.find_task("y").unwrap().early_start, Some(0.0));
    assert_eq!(result.find_task("z").unwrap().early_start, Some(5.0));
}

#[test]
fn diamond_network_floats_and_bounds() {
    // a -> {b(3), c(2)} -> d; the b leg drives the finish.
    let result = CpmEngine::with_tasks(vec![
        task("a", 1.0, &[]),
        task("b", 3.0, &["a"]),
        task("c", 2.0, &["a"]),
        task("d", 1.0, &["b", "c"]),
    ])
    .calculate();

    assert_eq!(result.project_duration(), 5.0);
    for scheduled in &result.tasks {
        let early_finish = scheduled.early_finish.unwrap();
        let late_finish = scheduled.late_finish.unwrap();
        assert!(
            early_finish <= late_finish + 1e-9,
            "task {} finishes late",
            scheduled.id
        );
    }

    let c = result.find_task("c").unwrap();
    assert_eq!(c.total_float, Some(1.0));
    assert!(!c.is_critical);
    assert_eq!(result.stats.critical_path, vec!["a", "b", "d"]);

    // A critical path exists whenever the network is non-empty and acyclic.
    assert!(result.tasks.iter().any(|t| t.total_float == Some(0.0)));
}

#[test]
fn project_duration_matches_latest_early_finish() {
    let result = CpmEngine::with_tasks(vec![
        task("a", 2.5, &[]),
        task("b", 1.25, &["a"]),
        task("c", 4.0, &[]),
    ])
    .calculate();

    let latest = result
        .tasks
        .iter()
        .filter_map(|t| t.early_finish)
        .fold(0.0_f64, f64::max);
    assert_eq!(result.project_duration(), latest);
    assert_eq!(latest, 4.0);
}

#[test]
fn cycles_are_flagged_and_the_remainder_still_computes() {
    let result = CpmEngine::with_tasks(vec![
        task("x", 2.0, &["y"]),
        task("y", 3.0, &["x"]),
        task("z", 1.0, &["y"]),
        task("solo", 4.0, &[]),
    ])
    .calculate();

    // Cycle members and their downstream are unscheduled, distinct from dangling.
    assert_eq!(result.stats.cyclic_tasks, vec!["x", "y", "z"]);
    assert!(result.stats.dangling_tasks.is_empty());
    for id in ["x", "y", "z"] {
        let scheduled = result.find_task(id).unwrap();
        assert!(scheduled.unscheduled);
        assert!(!scheduled.is_critical);
        assert_eq!(scheduled.early_start, None);
        assert_eq!(scheduled.total_float, None);
    }

    let solo = result.find_task("solo").unwrap();
    assert!(!solo.unscheduled);
    assert_eq!(solo.early_finish, Some(4.0));
    assert_eq!(result.project_duration(), 4.0);
}

#[test]
fn unlinked_predecessor_schedules_as_if_absent() {
    let result = CpmEngine::with_tasks(vec![
        task("a", 2.0, &[]),
        task("b", 3.0, &["missing"]),
    ])
    .calculate();

    let b = result.find_task("b").unwrap();
    assert_eq!(b.early_start, Some(0.0));
    assert!(b.is_dangling);
    assert_eq!(result.stats.unlinked_predecessors.len(), 1);
    assert_eq!(result.stats.unlinked_predecessors[0].missing_predecessor, "missing");
}

#[test]
fn calculate_twice_is_byte_identical() {
    let mut engine = CpmEngine::new();
    engine.load_tasks(vec![
        task("a", 1.0, &[]),
        task("b", 2.0, &["a"]),
        task("c", 3.0, &["a"]),
        task("d", 1.5, &["b", "c"]),
        task("loner", 2.0, &[]),
    ]);

    let first = serde_json::to_string(&engine.calculate()).unwrap();
    let second = serde_json::to_string(&engine.calculate()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn load_tasks_replaces_previous_input() {
    let mut engine = CpmEngine::with_tasks(chain());
    assert_eq!(engine.calculate().stats.total_tasks, 3);

    engine.load_tasks(vec![task("solo", 7.0, &[])]);
    let result = engine.calculate();
    assert_eq!(result.stats.total_tasks, 1);
    assert_eq!(result.project_duration(), 7.0);
}
