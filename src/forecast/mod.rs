mod simulation;

use crate::schedule::{FLOAT_EPSILON, ScheduleStats};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Raw CPI/SPI ratios are clamped to this band before projection; values
/// near zero or highly leveraged produce degenerate forecasts.
pub const PERFORMANCE_INDEX_FLOOR: f64 = 0.5;
pub const PERFORMANCE_INDEX_CEILING: f64 = 2.0;

pub const DEFAULT_TRIALS: usize = 2_000;
pub const DEFAULT_SEED: u64 = 42;

/// Point-in-time earned-value snapshot of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Budget at completion.
    pub bac: f64,
    /// Actual cost to date.
    pub ac: f64,
    /// Earned value.
    pub ev: f64,
    /// Planned value.
    pub pv: f64,
    /// Cost performance index (ev / ac).
    pub cpi: f64,
    /// Schedule performance index (ev / pv).
    pub spi: f64,
    #[serde(alias = "remainingDuration")]
    pub remaining_duration: f64,
}

impl ProjectState {
    /// Derive the performance indices from the base measures. A zero
    /// denominator yields a zero index, which projection treats as
    /// unavailable.
    pub fn from_measures(bac: f64, ac: f64, ev: f64, pv: f64, remaining_duration: f64) -> Self {
        let cpi = if ac.abs() > FLOAT_EPSILON { ev / ac } else { 0.0 };
        let spi = if pv.abs() > FLOAT_EPSILON { ev / pv } else { 0.0 };
        Self {
            bac,
            ac,
            ev,
            pv,
            cpi,
            spi,
            remaining_duration,
        }
    }

    pub fn clamped_cpi(&self) -> Option<f64> {
        clamp_performance_index(self.cpi)
    }

    pub fn clamped_spi(&self) -> Option<f64> {
        clamp_performance_index(self.spi)
    }
}

fn clamp_performance_index(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    Some(raw.clamp(PERFORMANCE_INDEX_FLOOR, PERFORMANCE_INDEX_CEILING))
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Tunable risk multipliers for the simulation. Each is clamped to its
/// documented range before use; the mapping from parameter to sampling
/// distribution is a policy with these defaults, not settled methodology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Center of the per-trial noise. 1.0 is neutral; range 0.8..=1.2.
    #[serde(alias = "optimismFactor")]
    pub optimism_factor: f64,
    /// Spread of the per-trial noise. Range 0.0..=0.5.
    #[serde(alias = "riskBuffer")]
    pub risk_buffer: f64,
    /// Divides simulated durations. Range 0.5..=1.5.
    #[serde(alias = "resourceEfficiency")]
    pub resource_efficiency: f64,
    /// Upper bound of one-sided scope growth. Range 0.0..=0.3.
    #[serde(alias = "scopeContingency")]
    pub scope_contingency: f64,
    /// Scales simulated cost to complete. Range 0.8..=1.5.
    #[serde(alias = "laborCostMultiplier")]
    pub labor_cost_multiplier: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            optimism_factor: 1.0,
            risk_buffer: 0.1,
            resource_efficiency: 1.0,
            scope_contingency: 0.05,
            labor_cost_multiplier: 1.0,
        }
    }
}

impl EngineParams {
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            optimism_factor: bounded(self.optimism_factor, defaults.optimism_factor, 0.8, 1.2),
            risk_buffer: bounded(self.risk_buffer, defaults.risk_buffer, 0.0, 0.5),
            resource_efficiency: bounded(
                self.resource_efficiency,
                defaults.resource_efficiency,
                0.5,
                1.5,
            ),
            scope_contingency: bounded(
                self.scope_contingency,
                defaults.scope_contingency,
                0.0,
                0.3,
            ),
            labor_cost_multiplier: bounded(
                self.labor_cost_multiplier,
                defaults.labor_cost_multiplier,
                0.8,
                1.5,
            ),
        }
    }

    /// Widen the risk posture with the share of critical tasks in the
    /// current schedule. The 0.1 / 0.05 weights are policy defaults.
    pub fn adjusted_for_schedule(&self, stats: &ScheduleStats) -> Self {
        if stats.total_tasks == 0 {
            return self.clamped();
        }
        let critical_ratio = stats.critical_tasks_count as f64 / stats.total_tasks as f64;
        let mut params = *self;
        params.risk_buffer += 0.1 * critical_ratio;
        params.scope_contingency += 0.05 * critical_ratio;
        params.clamped()
    }
}

fn bounded(value: f64, fallback: f64, floor: f64, ceiling: f64) -> f64 {
    if value.is_finite() {
        value.clamp(floor, ceiling)
    } else {
        fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBand {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tcpi {
    /// Efficiency required on remaining work to finish on budget. `None`
    /// when BAC equals AC and the ratio is undefined.
    pub to_bac: Option<f64>,
}

/// Independent estimates at completion. Both methods are reported so
/// callers can show the spread of assumptions instead of one number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ieac {
    /// Remaining work proceeds at the budgeted rate: ac + (bac - ev).
    pub budget_rate: Option<f64>,
    /// Current cost efficiency persists: bac / cpi.
    pub cpi: Option<f64>,
}

/// Full output of one simulation run. Fields degrade to `None` instead of
/// NaN or infinity when the underlying ratios are unusable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub monte_carlo_cost: Option<PercentileBand>,
    pub monte_carlo_duration: Option<PercentileBand>,
    pub completion_date_estimate: Option<NaiveDate>,
    pub tcpi: Tcpi,
    pub ieac: Ieac,
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub trials: usize,
    /// Master seed; a fixed seed reproduces identical percentiles.
    pub seed: u64,
    /// Anchor for the completion date estimate. `None` means today.
    pub as_of: Option<NaiveDate>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            as_of: None,
        }
    }
}

/// Forecast with the default trial count and seed.
pub fn run_forecast_simulation(state: &ProjectState, params: &EngineParams) -> ForecastResult {
    run_forecast_simulation_with(state, params, SimulationConfig::default())
}

/// Forecast cost and duration outcomes from the current earned-value
/// position. Pure: identical state, params, and config produce identical
/// output, independent of worker thread count.
pub fn run_forecast_simulation_with(
    state: &ProjectState,
    params: &EngineParams,
    config: SimulationConfig,
) -> ForecastResult {
    let params = params.clamped();
    tracing::debug!(trials = config.trials, seed = config.seed, "running forecast simulation");

    let cost_to_complete = state
        .clamped_cpi()
        .and_then(|cpi| finite((state.bac - state.ev) / cpi));
    let duration_to_complete = state
        .clamped_spi()
        .and_then(|spi| finite(state.remaining_duration / spi));

    let (monte_carlo_cost, monte_carlo_duration) = if config.trials == 0 {
        (None, None)
    } else {
        simulation::run_trials(
            simulation::TrialBaseline {
                cost_to_complete,
                duration_to_complete,
                actual_cost: state.ac,
            },
            &params,
            config.trials,
            config.seed,
        )
    };

    let completion_date_estimate = monte_carlo_duration.map(|band| {
        let as_of = config
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        as_of + Duration::days(band.p50.round() as i64)
    });

    let budget_remaining = state.bac - state.ac;
    let to_bac = if budget_remaining.abs() > FLOAT_EPSILON {
        finite((state.bac - state.ev) / budget_remaining)
    } else {
        None
    };

    let ieac = Ieac {
        budget_rate: finite(state.ac + (state.bac - state.ev)),
        cpi: state.clamped_cpi().and_then(|cpi| finite(state.bac / cpi)),
    };

    ForecastResult {
        monte_carlo_cost,
        monte_carlo_duration,
        completion_date_estimate,
        tcpi: Tcpi { to_bac },
        ieac,
    }
}
