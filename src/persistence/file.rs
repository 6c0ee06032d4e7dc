use super::{PersistenceError, PersistenceResult};
use crate::schedule::CpmResult;
use crate::task::{LinkType, PredecessorRef, TaskInput};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// Load a flat task list from a JSON array. Key casing may be camelCase
/// or snake_case; normalization happens during deserialization.
pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskInput>> {
    let file = File::open(path)?;
    let tasks: Vec<TaskInput> = serde_json::from_reader(file)?;
    Ok(tasks)
}

/// Write a calculation result as pretty JSON, the shape the rendering
/// layer consumes.
pub fn save_result_to_json<P: AsRef<Path>>(result: &CpmResult, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct TaskCsvRecord {
    id: String,
    name: String,
    #[serde(default)]
    wbs_code: String,
    #[serde(default)]
    duration_days: String,
    #[serde(default)]
    predecessors: String,
    #[serde(default)]
    is_critical: String,
    #[serde(default)]
    percent_complete: String,
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<TaskInput> {
        if self.id.trim().is_empty() {
            return Err(PersistenceError::InvalidData("task row missing id".into()));
        }
        let mut task = TaskInput::default();
        task.id = self.id.trim().to_string();
        task.name = self.name;
        task.wbs_code = parse_string_option(self.wbs_code);
        task.duration_days = parse_f64(&self.duration_days)?;
        task.predecessors = split_predecessors(&self.predecessors);
        task.is_critical = parse_bool(&self.is_critical)?;
        task.percent_complete = parse_f64(&self.percent_complete)?;
        Ok(task)
    }
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskInput>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }
    Ok(tasks)
}

/// Predecessor cells are comma-separated ids, each optionally suffixed
/// with a link code: `12,design:SS`.
fn split_predecessors(input: &str) -> Vec<PredecessorRef> {
    input
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            Some(match part.rsplit_once(':') {
                Some((id, code)) if !id.trim().is_empty() => {
                    PredecessorRef::with_link(id.trim(), LinkType::from_code(code))
                }
                _ => PredecessorRef::new(part),
            })
        })
        .collect()
}

fn parse_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid float '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
