use crate::task::{PredecessorRef, TaskInput};
use serde::Serialize;
use std::collections::HashMap;

/// Applied when a task arrives with no duration or an unusable one.
pub const DEFAULT_DURATION_DAYS: f64 = 1.0;

/// A task after boundary normalization. Durations are always finite and
/// non-negative here; defaulting happened during the build.
#[derive(Debug, Clone)]
pub struct NetworkTask {
    pub id: String,
    pub name: String,
    pub wbs_code: Option<String>,
    pub duration_days: f64,
    pub predecessors: Vec<PredecessorRef>,
    pub is_critical: bool,
    pub percent_complete: Option<f64>,
}

/// A predecessor reference that did not resolve to any task in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlinkedPredecessor {
    pub task_id: String,
    pub missing_predecessor: String,
}

/// Data-quality findings collected while building the network. These are
/// warnings for the caller to render, never errors: a schedule must still
/// compute from imperfect input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkDiagnostics {
    pub unlinked_predecessors: Vec<UnlinkedPredecessor>,
    pub duplicate_ids: Vec<String>,
    pub defaulted_durations: Vec<String>,
}

impl NetworkDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unlinked_predecessors.is_empty()
            && self.duplicate_ids.is_empty()
            && self.defaulted_durations.is_empty()
    }
}

/// The directed graph formed by tasks and their resolved predecessor
/// edges, with an adjacency index in both directions built once and shared
/// by every engine that walks the network.
pub struct TaskNetwork {
    tasks: Vec<NetworkTask>,
    index_of: HashMap<String, usize>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    diagnostics: NetworkDiagnostics,
}

impl TaskNetwork {
    /// Normalize a flat task list into a validated network. Never fails:
    /// malformed rows degrade into diagnostics instead.
    pub fn build(inputs: &[TaskInput]) -> Self {
        let mut tasks: Vec<NetworkTask> = Vec::with_capacity(inputs.len());
        let mut index_of: HashMap<String, usize> = HashMap::with_capacity(inputs.len());
        let mut diagnostics = NetworkDiagnostics::default();

        for input in inputs {
            if index_of.contains_key(&input.id) {
                diagnostics.duplicate_ids.push(input.id.clone());
                continue;
            }
            let duration_days = match input.duration_days {
                Some(days) if days.is_finite() && days >= 0.0 => days,
                _ => {
                    diagnostics.defaulted_durations.push(input.id.clone());
                    DEFAULT_DURATION_DAYS
                }
            };
            let percent_complete = input
                .percent_complete
                .filter(|value| value.is_finite())
                .map(|value| value.clamp(0.0, 1.0));

            index_of.insert(input.id.clone(), tasks.len());
            tasks.push(NetworkTask {
                id: input.id.clone(),
                name: input.name.clone(),
                wbs_code: input.wbs_code.clone(),
                duration_days,
                predecessors: input.predecessors.clone(),
                is_critical: input.is_critical.unwrap_or(false),
                percent_complete,
            });
        }

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        for (idx, task) in tasks.iter().enumerate() {
            for reference in &task.predecessors {
                match index_of.get(&reference.task_id) {
                    Some(&pred_idx) => {
                        if !predecessors[idx].contains(&pred_idx) {
                            predecessors[idx].push(pred_idx);
                            successors[pred_idx].push(idx);
                        }
                    }
                    None => diagnostics.unlinked_predecessors.push(UnlinkedPredecessor {
                        task_id: task.id.clone(),
                        missing_predecessor: reference.task_id.clone(),
                    }),
                }
            }
        }

        if !diagnostics.unlinked_predecessors.is_empty() {
            tracing::warn!(
                count = diagnostics.unlinked_predecessors.len(),
                "predecessor references did not resolve and were excluded from traversal"
            );
        }

        Self {
            tasks,
            index_of,
            predecessors,
            successors,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[NetworkTask] {
        &self.tasks
    }

    pub fn task(&self, idx: usize) -> &NetworkTask {
        &self.tasks[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    pub fn predecessors_of(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }

    pub fn successors_of(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    /// A task with no schedule logic in either direction. Its dates rest
    /// solely on its own duration, which callers surface as a data-quality
    /// warning. Single-task projects are exempt.
    pub fn is_dangling(&self, idx: usize) -> bool {
        self.tasks.len() > 1
            && self.predecessors[idx].is_empty()
            && self.successors[idx].is_empty()
    }

    pub fn diagnostics(&self) -> &NetworkDiagnostics {
        &self.diagnostics
    }
}
