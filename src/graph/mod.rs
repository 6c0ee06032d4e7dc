pub mod builder;
pub mod dag;

pub use builder::{
    DEFAULT_DURATION_DAYS, NetworkDiagnostics, NetworkTask, TaskNetwork, UnlinkedPredecessor,
};
pub use dag::NetworkDag;
