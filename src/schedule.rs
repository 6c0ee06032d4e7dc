use crate::calculations::{BackwardPass, ForwardPass};
use crate::graph::{NetworkDag, TaskNetwork, UnlinkedPredecessor};
use crate::task::TaskInput;
use serde::Serialize;

/// Tolerance for date and float comparison. Accumulated rounding over a
/// long chain must not flip a task off the critical path.
pub const FLOAT_EPSILON: f64 = 1e-6;

/// Per-task output of a calculation run. Date fields are `None` for tasks
/// caught in a dependency cycle (`unscheduled`), which are excluded from
/// date computation without failing the rest of the graph.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledTask {
    pub id: String,
    pub name: String,
    pub wbs_code: Option<String>,
    pub duration_days: f64,
    pub percent_complete: Option<f64>,
    pub early_start: Option<f64>,
    pub early_finish: Option<f64>,
    pub late_start: Option<f64>,
    pub late_finish: Option<f64>,
    pub total_float: Option<f64>,
    pub is_critical: bool,
    pub is_dangling: bool,
    pub unscheduled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleStats {
    pub total_tasks: usize,
    pub critical_tasks_count: usize,
    pub average_float: Option<f64>,
    pub dangling_tasks: Vec<String>,
    pub cyclic_tasks: Vec<String>,
    pub unlinked_predecessors: Vec<UnlinkedPredecessor>,
    pub critical_path: Vec<String>,
    pub project_duration: f64,
}

impl ScheduleStats {
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.total_tasks));
        parts.push(format!("critical={}", self.critical_tasks_count));
        parts.push(format!("duration={}", self.project_duration));
        if let Some(average) = self.average_float {
            parts.push(format!("avg_float={average:.1}"));
        }
        if !self.dangling_tasks.is_empty() {
            parts.push(format!("dangling={}", self.dangling_tasks.len()));
        }
        if !self.cyclic_tasks.is_empty() {
            parts.push(format!("cyclic={}", self.cyclic_tasks.len()));
        }
        if !self.unlinked_predecessors.is_empty() {
            parts.push(format!("unlinked={}", self.unlinked_predecessors.len()));
        }
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CpmResult {
    pub tasks: Vec<ScheduledTask>,
    pub stats: ScheduleStats,
}

impl CpmResult {
    pub fn project_duration(&self) -> f64 {
        self.stats.project_duration
    }

    pub fn find_task(&self, id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Critical Path Method engine. Holds only the caller-supplied input list;
/// every `calculate` call rebuilds the network and recomputes dates from
/// scratch, so repeated runs over the same input are identical.
#[derive(Default)]
pub struct CpmEngine {
    inputs: Vec<TaskInput>,
}

impl CpmEngine {
    pub fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    pub fn with_tasks(tasks: Vec<TaskInput>) -> Self {
        Self { inputs: tasks }
    }

    /// Replace the loaded task list.
    pub fn load_tasks(&mut self, tasks: Vec<TaskInput>) {
        self.inputs = tasks;
    }

    pub fn tasks(&self) -> &[TaskInput] {
        &self.inputs
    }

    pub fn calculate(&self) -> CpmResult {
        calculate(&self.inputs)
    }
}

/// One-shot calculation over a flat task list.
pub fn calculate(inputs: &[TaskInput]) -> CpmResult {
    let network = TaskNetwork::build(inputs);
    calculate_network(&network)
}

/// Calculation over a prebuilt network, for callers that also feed the
/// same network to the cascade analyzer.
pub fn calculate_network(network: &TaskNetwork) -> CpmResult {
    tracing::debug!(task_count = network.len(), "running critical path calculation");

    if network.is_empty() {
        return CpmResult {
            tasks: Vec::new(),
            stats: ScheduleStats::default(),
        };
    }

    let dag = NetworkDag::build(network);
    let (order, cyclic) = dag.kahn_order();
    if !cyclic.is_empty() {
        tracing::warn!(
            count = cyclic.len(),
            "dependency cycle detected; affected tasks left unscheduled"
        );
    }

    let early = ForwardPass::new(network).execute(&order);
    let project_duration = early
        .iter()
        .flatten()
        .map(|dates| dates.finish)
        .fold(0.0_f64, f64::max);
    let late = BackwardPass::new(network).execute(&order, project_duration);

    let mut tasks = Vec::with_capacity(network.len());
    let mut dangling_tasks = Vec::new();
    let mut cyclic_tasks = Vec::new();
    let mut critical_path: Vec<(f64, String)> = Vec::new();
    let mut critical_count = 0usize;
    let mut float_sum = 0.0_f64;
    let mut float_count = 0usize;

    for idx in 0..network.len() {
        let source = network.task(idx);
        let is_dangling = network.is_dangling(idx);
        if is_dangling {
            dangling_tasks.push(source.id.clone());
        }

        let (early_start, early_finish) = match early[idx] {
            Some(dates) => (Some(dates.start), Some(dates.finish)),
            None => (None, None),
        };
        let (late_start, late_finish) = match late[idx] {
            Some(dates) => (Some(dates.start), Some(dates.finish)),
            None => (None, None),
        };
        let unscheduled = early[idx].is_none();
        if unscheduled {
            cyclic_tasks.push(source.id.clone());
        }

        let total_float = match (late_start, early_start) {
            (Some(late), Some(early)) => Some(late - early),
            _ => None,
        };
        if let Some(float) = total_float {
            float_sum += float;
            float_count += 1;
        }
        let is_critical = total_float.is_some_and(|float| float <= FLOAT_EPSILON);
        if is_critical {
            critical_count += 1;
            critical_path.push((early_start.unwrap_or(0.0), source.id.clone()));
        }

        tasks.push(ScheduledTask {
            id: source.id.clone(),
            name: source.name.clone(),
            wbs_code: source.wbs_code.clone(),
            duration_days: source.duration_days,
            percent_complete: source.percent_complete,
            early_start,
            early_finish,
            late_start,
            late_finish,
            total_float,
            is_critical,
            is_dangling,
            unscheduled,
        });
    }

    critical_path.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let stats = ScheduleStats {
        total_tasks: network.len(),
        critical_tasks_count: critical_count,
        average_float: (float_count > 0).then(|| float_sum / float_count as f64),
        dangling_tasks,
        cyclic_tasks,
        unlinked_predecessors: network.diagnostics().unlinked_predecessors.clone(),
        critical_path: critical_path.into_iter().map(|(_, id)| id).collect(),
        project_duration,
    };

    CpmResult { tasks, stats }
}
