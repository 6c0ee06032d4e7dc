pub mod calculations;
pub mod cascade;
pub mod forecast;
pub mod graph;
pub mod persistence;
pub mod schedule;
pub mod task;

pub use cascade::{
    AffectedTask, CascadeAnalysis, CascadePolicy, analyze_cascade, analyze_cascade_with_policy,
};
pub use forecast::{
    EngineParams, ForecastResult, Ieac, PercentileBand, ProjectState, SimulationConfig, Tcpi,
    run_forecast_simulation, run_forecast_simulation_with,
};
pub use graph::{NetworkDiagnostics, TaskNetwork, UnlinkedPredecessor};
pub use persistence::{
    PersistenceError, load_tasks_from_csv, load_tasks_from_json, save_result_to_json,
};
pub use schedule::{CpmEngine, CpmResult, ScheduleStats, ScheduledTask, calculate};
pub use task::{LinkType, PredecessorRef, TaskInput};
