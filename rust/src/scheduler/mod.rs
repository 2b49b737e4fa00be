//! Construction scheduler for connectivity-constrained network growth.
//!
//! A planning run goes through four stages, each in its own module:
//! growth ordering from the source (`growth`), phase partitioning by
//! cumulative-length quotas (`phases`), simulated construction on a bounded
//! crew pool (`timeline`), and assembly of the reported schedule (`planner`).

mod frontier;
mod growth;
mod phases;
mod planner;
mod task;
mod timeline;
mod worker_pool;

pub use frontier::{Frontier, FrontierKey};
pub use growth::{ConnectivityScheduler, GrowthOrder};
pub use phases::PhasePartitioner;
pub use planner::NetworkPlanner;
pub use task::{build_tasks, Task};
pub use timeline::{DeadlineVerdict, ResourceTimeline, TimelineOutcome};
pub use worker_pool::{WorkerPool, WorkerSchedule};
