//! Simulated construction timeline over a bounded crew pool.

use crate::error::PlanningError;
use crate::network::NetworkGraph;
use crate::{log_decisions, log_progress, log_trace};

use super::task::Task;
use super::worker_pool::WorkerPool;

/// Aggregate timing of a timeline run.
#[derive(Clone, Debug)]
pub struct TimelineOutcome {
    pub makespan_hours: f64,
    /// Makespan if crews were unlimited (longest energization chain).
    pub critical_path_hours: f64,
    pub total_work_hours: f64,
    pub pool: WorkerPool,
}

/// Hospital generator verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct DeadlineVerdict {
    /// None when the network has no hospital.
    pub ready_hours: Option<f64>,
    pub deadline_hours: f64,
    pub feasible: bool,
    pub overrun_hours: f64,
}

/// List scheduler assigning start/end times with at most `max_workers` tasks in flight.
///
/// Tasks are dispatched in the given order, each to the crew that frees up
/// first. A task starts as soon as that crew is free and one of its endpoints
/// is energized (the source is energized at 0), so branches that do not depend
/// on each other overlap.
pub struct ResourceTimeline {
    max_workers: usize,
    verbosity: u8,
}

impl ResourceTimeline {
    pub fn new(max_workers: usize, verbosity: u8) -> Self {
        Self {
            max_workers,
            verbosity,
        }
    }

    /// Fill `scheduled_start`, `scheduled_end` and `worker` for every task in `order`.
    ///
    /// # Errors
    /// * `InvalidConfig` when the pool has no crews
    /// * `Disconnected` when a task is reached before either endpoint is energized
    pub fn run(
        &self,
        graph: &NetworkGraph,
        tasks: &mut [Task],
        order: &[usize],
    ) -> Result<TimelineOutcome, PlanningError> {
        if self.max_workers == 0 {
            return Err(PlanningError::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }

        let mut pool = WorkerPool::new(self.max_workers);
        let mut energized = vec![f64::INFINITY; graph.node_count()];
        let mut unlimited = vec![f64::INFINITY; graph.node_count()];
        energized[graph.source() as usize] = 0.0;
        unlimited[graph.source() as usize] = 0.0;

        let mut makespan = 0.0_f64;
        let mut critical_path = 0.0_f64;
        let mut total_work = 0.0;

        for &task_idx in order {
            let task = &mut tasks[task_idx];
            let edge = graph.edge(task.edge);
            let (a, b) = (edge.a as usize, edge.b as usize);

            let ready = energized[a].min(energized[b]);
            if !ready.is_finite() {
                return Err(PlanningError::Disconnected {
                    source_node: graph.node_name(graph.source()).to_string(),
                    unreachable: vec![task.id.clone()],
                });
            }
            let (worker, free_at) = pool.earliest_free().ok_or_else(|| {
                PlanningError::InvalidConfig("worker pool is empty".to_string())
            })?;

            let start = ready.max(free_at);
            if ready > free_at {
                log_trace!(
                    self.verbosity,
                    "  {} waits {:.2}h for an energized endpoint",
                    task.id,
                    ready - free_at
                );
            }
            let end = start + task.duration_hours;
            pool.assign(worker, start, end);

            task.scheduled_start = Some(start);
            task.scheduled_end = Some(end);
            task.worker = Some(worker);
            energized[a] = energized[a].min(end);
            energized[b] = energized[b].min(end);

            let unlimited_end = unlimited[a].min(unlimited[b]) + task.duration_hours;
            unlimited[a] = unlimited[a].min(unlimited_end);
            unlimited[b] = unlimited[b].min(unlimited_end);

            makespan = makespan.max(end);
            critical_path = critical_path.max(unlimited_end);
            total_work += task.duration_hours;

            log_decisions!(
                self.verbosity,
                "  Dispatch {} on crew {} from {:.2}h to {:.2}h (ready {:.2}h)",
                task.id,
                worker,
                start,
                end,
                ready
            );
        }

        log_progress!(
            self.verbosity,
            "Timeline: makespan {:.2}h, critical path {:.2}h, work {:.2}h on {} crews",
            makespan,
            critical_path,
            total_work,
            self.max_workers
        );

        Ok(TimelineOutcome {
            makespan_hours: makespan,
            critical_path_hours: critical_path,
            total_work_hours: total_work,
            pool,
        })
    }

    /// Compare the hospital-path completion time with the generator deadline.
    ///
    /// `has_hospital` distinguishes "hospital on the source" (ready at 0) from
    /// "no hospital at all".
    pub fn verify_deadline(
        &self,
        tasks: &[Task],
        hospital_tasks: &[usize],
        has_hospital: bool,
        deadline_hours: f64,
    ) -> DeadlineVerdict {
        if !has_hospital {
            return DeadlineVerdict {
                ready_hours: None,
                deadline_hours,
                feasible: true,
                overrun_hours: 0.0,
            };
        }

        let ready = hospital_tasks
            .iter()
            .filter_map(|&idx| tasks[idx].scheduled_end)
            .fold(0.0_f64, f64::max);
        let overrun = (ready - deadline_hours).max(0.0);
        let feasible = overrun <= 1e-9;

        if feasible {
            log_progress!(
                self.verbosity,
                "Hospital energized at {:.2}h (deadline {:.2}h)",
                ready,
                deadline_hours
            );
        } else {
            log_progress!(
                self.verbosity,
                "Hospital energized at {:.2}h, {:.2}h past the {:.2}h deadline",
                ready,
                overrun,
                deadline_hours
            );
        }

        DeadlineVerdict {
            ready_hours: Some(ready),
            deadline_hours,
            feasible,
            overrun_hours: if feasible { 0.0 } else { overrun },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateTable;
    use crate::cost_model::CostModel;
    use crate::models::{Building, Segment};
    use crate::scheduler::task::build_tasks;

    fn seg(id: &str, a: &str, b: &str, length: f64, infra: &str) -> Segment {
        Segment::new(
            id.to_string(),
            a.to_string(),
            b.to_string(),
            length,
            infra.to_string(),
        )
    }

    fn home(id: &str, node: &str) -> Building {
        Building::new(id.to_string(), node.to_string(), "residential".to_string(), 1)
    }

    fn setup(buildings: &[Building], segments: &[Segment]) -> (NetworkGraph, Vec<Task>) {
        let graph = NetworkGraph::new(buildings, segments, "src").unwrap();
        let rates = RateTable::default();
        let tasks = build_tasks(&graph, &CostModel::new(&rates));
        (graph, tasks)
    }

    fn in_order(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_independent_branches_run_in_parallel() {
        // Four 25m aerial branches: 50h each, 200h of work in total
        let buildings: Vec<Building> = (1..=4).map(|i| home(&format!("b{i}"), &format!("n{i}"))).collect();
        let segments: Vec<Segment> = (1..=4)
            .map(|i| seg(&format!("s{i}"), "src", &format!("n{i}"), 25.0, "aerial"))
            .collect();
        let (graph, mut tasks) = setup(&buildings, &segments);

        let outcome = ResourceTimeline::new(4, 0)
            .run(&graph, &mut tasks, &in_order(4))
            .unwrap();

        let expected = outcome
            .critical_path_hours
            .max(outcome.total_work_hours / 4.0);
        assert!((outcome.total_work_hours - 200.0).abs() < 1e-9);
        assert!((outcome.critical_path_hours - 50.0).abs() < 1e-9);
        assert!((outcome.makespan_hours - expected).abs() < 1e-9);
        assert!((outcome.makespan_hours - 50.0).abs() < 1e-9);
        assert!(tasks.iter().all(|t| t.scheduled_start == Some(0.0)));
    }

    #[test]
    fn test_serial_chain_bounded_by_critical_path() {
        // 100m aerial path split into 4 serial 25m segments
        let buildings = vec![home("end", "n4")];
        let segments = vec![
            seg("s1", "src", "n1", 25.0, "aerial"),
            seg("s2", "n1", "n2", 25.0, "aerial"),
            seg("s3", "n2", "n3", 25.0, "aerial"),
            seg("s4", "n3", "n4", 25.0, "aerial"),
        ];
        let (graph, mut tasks) = setup(&buildings, &segments);

        let outcome = ResourceTimeline::new(4, 0)
            .run(&graph, &mut tasks, &in_order(4))
            .unwrap();

        let expected = outcome
            .critical_path_hours
            .max(outcome.total_work_hours / 4.0);
        assert!((outcome.makespan_hours - expected).abs() < 1e-9);
        assert!((outcome.makespan_hours - 200.0).abs() < 1e-9);
        for pair in tasks.windows(2) {
            assert!(pair[1].scheduled_start.unwrap() >= pair[0].scheduled_end.unwrap() - 1e-9);
        }
    }

    #[test]
    fn test_more_branches_than_workers() {
        // Eight 50h branches on four crews: two waves
        let buildings: Vec<Building> = (1..=8).map(|i| home(&format!("b{i}"), &format!("n{i}"))).collect();
        let segments: Vec<Segment> = (1..=8)
            .map(|i| seg(&format!("s{i}"), "src", &format!("n{i}"), 25.0, "aerial"))
            .collect();
        let (graph, mut tasks) = setup(&buildings, &segments);

        let outcome = ResourceTimeline::new(4, 0)
            .run(&graph, &mut tasks, &in_order(8))
            .unwrap();

        assert!((outcome.makespan_hours - 100.0).abs() < 1e-9);
        assert!((outcome.critical_path_hours - 50.0).abs() < 1e-9);
        assert_eq!(outcome.pool.peak_occupancy(), 4);
        assert_eq!(outcome.pool.occupancy_at(49.0), 4);
        assert_eq!(tasks[4].scheduled_start, Some(50.0));
        assert_eq!(tasks[4].worker, Some(0));
    }

    #[test]
    fn test_occupancy_never_exceeds_workers() {
        let buildings = vec![home("a", "n3"), home("b", "n5"), home("c", "n6")];
        let segments = vec![
            seg("s1", "src", "n1", 3.0, "aerial"),
            seg("s2", "src", "n2", 5.0, "conduit"),
            seg("s3", "n1", "n3", 2.0, "semi-aerial"),
            seg("s4", "n2", "n4", 7.0, "aerial"),
            seg("s5", "n4", "n5", 1.0, "aerial"),
            seg("s6", "src", "n6", 9.0, "aerial"),
            seg("s7", "n3", "n5", 4.0, "conduit"),
        ];
        let (graph, mut tasks) = setup(&buildings, &segments);

        let outcome = ResourceTimeline::new(2, 0)
            .run(&graph, &mut tasks, &in_order(7))
            .unwrap();
        assert!(outcome.pool.peak_occupancy() <= 2);
        assert!(tasks.iter().all(|t| t.is_scheduled()));
        for crew in 0..2 {
            let mut periods: Vec<(f64, f64)> = tasks
                .iter()
                .filter(|t| t.worker == Some(crew))
                .map(|t| (t.scheduled_start.unwrap(), t.scheduled_end.unwrap()))
                .collect();
            periods.sort_by(|a, b| a.0.total_cmp(&b.0));
            assert!(periods.windows(2).all(|w| w[0].1 <= w[1].0 + 1e-9));
        }
    }

    #[test]
    fn test_task_waits_for_energized_endpoint() {
        let buildings = vec![home("a", "n2"), home("b", "n3")];
        let segments = vec![
            seg("s1", "src", "n1", 5.0, "aerial"),
            seg("s2", "n1", "n2", 1.0, "aerial"),
            seg("s3", "src", "n3", 1.0, "aerial"),
        ];
        let (graph, mut tasks) = setup(&buildings, &segments);
        ResourceTimeline::new(4, 0)
            .run(&graph, &mut tasks, &in_order(3))
            .unwrap();

        assert_eq!(tasks[0].scheduled_end, Some(10.0));
        assert_eq!(tasks[1].scheduled_start, Some(10.0));
        // s3 hangs off the source and a crew is free, so it does not wait for s2
        assert_eq!(tasks[2].scheduled_start, Some(0.0));
        assert_eq!(tasks[2].worker, Some(2));
    }

    #[test]
    fn test_independent_branch_overlaps_dependent_chain() {
        // School branch a then b; unrelated home branch c on 125h of conduit
        let buildings = vec![
            Building::new("sch".into(), "n2".into(), "school".into(), 1),
            home("far", "n3"),
        ];
        let segments = vec![
            seg("a", "src", "n1", 25.0, "aerial"),
            seg("b", "n1", "n2", 1.0, "aerial"),
            seg("c", "src", "n3", 25.0, "conduit"),
        ];
        let (graph, mut tasks) = setup(&buildings, &segments);
        let outcome = ResourceTimeline::new(4, 0)
            .run(&graph, &mut tasks, &in_order(3))
            .unwrap();

        assert_eq!(tasks[1].scheduled_start, Some(50.0));
        assert_eq!(tasks[2].scheduled_start, Some(0.0));
        assert!((outcome.makespan_hours - 125.0).abs() < 1e-9);
        assert!((outcome.critical_path_hours - 125.0).abs() < 1e-9);
        let expected = outcome
            .critical_path_hours
            .max(outcome.total_work_hours / 4.0);
        assert!((outcome.makespan_hours - expected).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_dispatch_is_rejected() {
        let buildings = vec![home("a", "n2")];
        let segments = vec![
            seg("s1", "src", "n1", 5.0, "aerial"),
            seg("s2", "n1", "n2", 1.0, "aerial"),
        ];
        let (graph, mut tasks) = setup(&buildings, &segments);
        let result = ResourceTimeline::new(4, 0).run(&graph, &mut tasks, &[1, 0]);
        assert!(matches!(result, Err(PlanningError::Disconnected { .. })));
    }

    #[test]
    fn test_hospital_overrun_reported() {
        // 5m of conduit = 25h of serial work against a 20h generator
        let buildings = vec![Building::new(
            "h".into(),
            "n1".into(),
            "hospital".into(),
            1,
        )];
        let segments = vec![seg("s1", "src", "n1", 5.0, "conduit")];
        let (graph, mut tasks) = setup(&buildings, &segments);
        let timeline = ResourceTimeline::new(4, 0);
        timeline.run(&graph, &mut tasks, &[0]).unwrap();

        let verdict = timeline.verify_deadline(&tasks, &[0], true, 20.0);
        assert_eq!(verdict.ready_hours, Some(25.0));
        assert!(!verdict.feasible);
        assert!((verdict.overrun_hours - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_deadline_without_hospital() {
        let timeline = ResourceTimeline::new(4, 0);
        let verdict = timeline.verify_deadline(&[], &[], false, 20.0);
        assert_eq!(verdict.ready_hours, None);
        assert!(verdict.feasible);

        let on_source = timeline.verify_deadline(&[], &[], true, 20.0);
        assert_eq!(on_source.ready_hours, Some(0.0));
        assert!(on_source.feasible);
    }
}
