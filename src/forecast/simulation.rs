use super::{EngineParams, PercentileBand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Trials per worker batch. Batches carry independently derived seeds and
/// are merged in batch order, so the merged sample set is identical
/// whatever the thread count.
const BATCH_SIZE: usize = 256;

/// Floor for sampled multipliers; a deep tail draw must not push a cost
/// or duration negative.
const MIN_MULTIPLIER: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrialBaseline {
    pub cost_to_complete: Option<f64>,
    pub duration_to_complete: Option<f64>,
    pub actual_cost: f64,
}

/// Run independent trials against the deterministic baseline and reduce
/// them to P10/P50/P90 bands. Trials are embarrassingly parallel;
/// each samples per-parameter multipliers from distributions centered on
/// 1.0: optimism shifts the noise center, the risk buffer widens it, and
/// scope contingency adds one-sided growth. That mapping is a tunable
/// policy with these defaults, not a calibrated model.
pub(crate) fn run_trials(
    baseline: TrialBaseline,
    params: &EngineParams,
    trials: usize,
    seed: u64,
) -> (Option<PercentileBand>, Option<PercentileBand>) {
    if baseline.cost_to_complete.is_none() && baseline.duration_to_complete.is_none() {
        return (None, None);
    }

    let batch_count = trials.div_ceil(BATCH_SIZE);
    let batches: Vec<(Vec<f64>, Vec<f64>)> = (0..batch_count)
        .into_par_iter()
        .map(|batch| {
            let mut rng = StdRng::seed_from_u64(batch_seed(seed, batch));
            let batch_trials = BATCH_SIZE.min(trials - batch * BATCH_SIZE);
            let mut costs = Vec::with_capacity(batch_trials);
            let mut durations = Vec::with_capacity(batch_trials);

            for _ in 0..batch_trials {
                // Draw every sample each trial so the stream stays aligned
                // whether or not both projections are available.
                let cost_noise =
                    sample_normal(&mut rng, params.optimism_factor, params.risk_buffer)
                        .max(MIN_MULTIPLIER);
                let duration_noise =
                    sample_normal(&mut rng, params.optimism_factor, params.risk_buffer)
                        .max(MIN_MULTIPLIER);
                let scope_growth = 1.0 + rng.random::<f64>() * params.scope_contingency;

                if let Some(cost_to_complete) = baseline.cost_to_complete {
                    costs.push(
                        baseline.actual_cost
                            + cost_to_complete
                                * cost_noise
                                * scope_growth
                                * params.labor_cost_multiplier,
                    );
                }
                if let Some(duration_to_complete) = baseline.duration_to_complete {
                    durations.push(
                        duration_to_complete * duration_noise * scope_growth
                            / params.resource_efficiency,
                    );
                }
            }

            (costs, durations)
        })
        .collect();

    let mut costs = Vec::with_capacity(trials);
    let mut durations = Vec::with_capacity(trials);
    for (batch_costs, batch_durations) in batches {
        costs.extend(batch_costs);
        durations.extend(batch_durations);
    }

    (band_from(costs), band_from(durations))
}

fn batch_seed(seed: u64, batch: usize) -> u64 {
    seed ^ (batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn band_from(mut samples: Vec<f64>) -> Option<PercentileBand> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(f64::total_cmp);
    Some(PercentileBand {
        p10: percentile(&samples, 10.0),
        p50: percentile(&samples, 50.0),
        p90: percentile(&samples, 90.0),
    })
}

/// Linear-interpolated percentile over a sorted sample set.
pub(crate) fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Box-Muller transform; multiplier noise does not warrant a
/// distributions dependency.
fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std_dev * z
}
