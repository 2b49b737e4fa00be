//! End-to-end planning run: growth order, phases, timeline and report.

use crate::config::PlannerConfig;
use crate::cost_model::CostModel;
use crate::error::PlanningError;
use crate::models::{Building, Schedule, Segment};
use crate::network::{NetworkGraph, ShortestPathTree};
use crate::report::ScheduleReport;
use crate::{log_decisions, log_progress};

use super::growth::ConnectivityScheduler;
use super::phases::PhasePartitioner;
use super::task::build_tasks;
use super::timeline::ResourceTimeline;

/// Planner for one network.
///
/// All structural checks (labels, lengths, connectivity, configuration) happen
/// in [`NetworkPlanner::new`]; [`NetworkPlanner::plan`] only fails on internal
/// inconsistencies. Each call to `plan` works on its own task vector.
pub struct NetworkPlanner {
    graph: NetworkGraph,
    config: PlannerConfig,
}

impl NetworkPlanner {
    /// Validate the configuration and load the network.
    pub fn new(
        buildings: &[Building],
        segments: &[Segment],
        source: &str,
        config: PlannerConfig,
    ) -> Result<Self, PlanningError> {
        config.validate()?;
        let graph = NetworkGraph::new(buildings, segments, source)?;
        log_progress!(
            config.verbosity,
            "Loaded network: {} nodes, {} segments, {} buildings ({} hospitals)",
            graph.node_count(),
            graph.edge_count(),
            graph.buildings().len(),
            graph.hospitals().len()
        );
        Ok(Self { graph, config })
    }

    /// Run the scheduler.
    ///
    /// A late hospital does not fail the run: the schedule comes back with
    /// `feasible = false` and the overrun filled in.
    pub fn plan(&self) -> Result<Schedule, PlanningError> {
        let verbosity = self.config.verbosity;
        let model = CostModel::new(&self.config.rates);
        let mut tasks = build_tasks(&self.graph, &model);

        let costs: Vec<f64> = tasks.iter().map(|t| t.cost).collect();
        let tree = ShortestPathTree::build(&self.graph, &costs);
        let hospital_path = tree.hospital_paths(&self.graph);
        let priorities = tree.downstream_priority(&self.graph);
        log_decisions!(
            verbosity,
            "Hospital path: {} segments",
            hospital_path.len()
        );

        let growth =
            ConnectivityScheduler::new(&self.graph, &tasks, &priorities, verbosity)
                .grow(&hospital_path)?;

        let lengths: Vec<f64> = growth.order.iter().map(|&i| tasks[i].length_m).collect();
        let phases = PhasePartitioner::new(&self.config.phase_quotas, verbosity)
            .assign(&lengths, growth.hospital_len);
        for (position, &task_idx) in growth.order.iter().enumerate() {
            tasks[task_idx].phase = Some(phases[position]);
        }

        let timeline = ResourceTimeline::new(self.config.max_workers, verbosity);
        let outcome = timeline.run(&self.graph, &mut tasks, &growth.order)?;
        let verdict = timeline.verify_deadline(
            &tasks,
            growth.hospital_tasks(),
            !self.graph.hospitals().is_empty(),
            self.config.hospital_deadline_hours(),
        );

        Ok(ScheduleReport::new(&self.graph, &self.config).assemble(
            &tasks, &growth, &outcome, &verdict,
        ))
    }
}
