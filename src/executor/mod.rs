//! Worker pool execution
//!
//! This module owns the concurrent task-distribution engine: a fixed-size
//! pool of worker threads that drains a closed, bounded queue of targets,
//! runs the command template against each exactly once, and reports
//! progress through shared atomic state.
//!
//! The split of responsibilities:
//! - [`pool`] manages workers, the queue handoff, and the join barrier
//! - [`task`] performs the substitute-execute-capture cycle for one target

pub mod pool;
pub mod task;

pub use pool::{ExecutionSummary, PoolConfig, Progress, WorkerPool};
pub use task::PLACEHOLDER;
