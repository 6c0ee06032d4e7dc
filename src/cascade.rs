use crate::graph::TaskNetwork;
use serde::Serialize;

/// Controls how a hypothetical delay amplifies per cascade hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadePolicy {
    /// Added amplification per level of depth. This is a buffer-erosion
    /// heuristic, not a calibrated model; the coefficient is tunable and
    /// pending product-owner confirmation.
    pub amplification_per_level: f64,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            amplification_per_level: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AffectedTask {
    pub id: String,
    pub name: String,
    pub cascade_depth: usize,
    pub delay_impact: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CascadeAnalysis {
    pub milestone_id: String,
    pub delay_days: f64,
    pub affected_tasks: Vec<AffectedTask>,
    pub total_tasks: usize,
    pub critical_affected: usize,
    /// Equals `delay_days` when the cascade reaches the critical path;
    /// a delay absorbed entirely by float does not move project finish.
    pub project_delay_risk: f64,
    pub max_depth: usize,
}

/// Propagate a milestone delay with the default amplification policy.
pub fn analyze_cascade(
    network: &TaskNetwork,
    milestone_id: &str,
    delay_days: f64,
) -> CascadeAnalysis {
    analyze_cascade_with_policy(network, milestone_id, delay_days, CascadePolicy::default())
}

/// Walk the "depends on me" direction from the milestone with an explicit
/// stack, visiting each task once. An unknown milestone yields an empty
/// analysis so callers can render a neutral state without special cases.
pub fn analyze_cascade_with_policy(
    network: &TaskNetwork,
    milestone_id: &str,
    delay_days: f64,
    policy: CascadePolicy,
) -> CascadeAnalysis {
    let mut analysis = CascadeAnalysis {
        milestone_id: milestone_id.to_string(),
        delay_days,
        affected_tasks: Vec::new(),
        total_tasks: 0,
        critical_affected: 0,
        project_delay_risk: 0.0,
        max_depth: 0,
    };
    let Some(start) = network.index_of(milestone_id) else {
        return analysis;
    };

    let mut visited = vec![false; network.len()];
    visited[start] = true;
    let mut stack: Vec<(usize, usize)> = network
        .successors_of(start)
        .iter()
        .rev()
        .map(|&idx| (idx, 1))
        .collect();

    while let Some((idx, depth)) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let task = network.task(idx);
        if task.is_critical {
            analysis.critical_affected += 1;
        }
        if depth > analysis.max_depth {
            analysis.max_depth = depth;
        }
        analysis.affected_tasks.push(AffectedTask {
            id: task.id.clone(),
            name: task.name.clone(),
            cascade_depth: depth,
            delay_impact: delay_days * (1.0 + depth as f64 * policy.amplification_per_level),
            is_critical: task.is_critical,
        });

        for &succ_idx in network.successors_of(idx).iter().rev() {
            if !visited[succ_idx] {
                stack.push((succ_idx, depth + 1));
            }
        }
    }

    analysis.total_tasks = analysis.affected_tasks.len();
    if analysis.critical_affected > 0 {
        analysis.project_delay_risk = delay_days;
    }
    tracing::debug!(
        milestone = milestone_id,
        affected = analysis.total_tasks,
        "cascade analysis complete"
    );
    analysis
}
