//! Assembly of the reported schedule from a finished planning run.
//!
//! Turns the internal task vector, growth order and timeline outcome into the
//! plain output records (`ScheduledTask`, `PhaseSummary`, `Schedule`).

use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashMap;

use crate::config::PlannerConfig;
use crate::cost_model::labor_cost;
use crate::models::{PhaseSummary, Schedule, ScheduledTask};
use crate::network::NetworkGraph;
use crate::scheduler::{DeadlineVerdict, GrowthOrder, Task, TimelineOutcome};
use crate::log_decisions;

/// Hour offset on the project calendar, rounded to the second.
///
/// `None` without a start date, or when the offset leaves chrono's range.
pub fn calendar_time(project_start: Option<NaiveDateTime>, hours: f64) -> Option<NaiveDateTime> {
    let start = project_start?;
    let seconds = (hours * 3600.0).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(TimeDelta::try_seconds(seconds as i64)?)
}

pub struct ScheduleReport<'a> {
    graph: &'a NetworkGraph,
    config: &'a PlannerConfig,
}

impl<'a> ScheduleReport<'a> {
    pub fn new(graph: &'a NetworkGraph, config: &'a PlannerConfig) -> Self {
        Self { graph, config }
    }

    /// Build the schedule record.
    ///
    /// `tasks` must carry phases and timings for every entry of `growth.order`.
    /// Buildings sitting on the source are powered from the start and count
    /// toward phase 0.
    pub fn assemble(
        &self,
        tasks: &[Task],
        growth: &GrowthOrder,
        outcome: &TimelineOutcome,
        verdict: &DeadlineVerdict,
    ) -> Schedule {
        let phase_count = self.config.phase_quotas.len() + 1;
        let mut phases: Vec<PhaseSummary> = (0..phase_count)
            .map(|phase| PhaseSummary {
                phase: phase as u8,
                ..PhaseSummary::default()
            })
            .collect();

        for building in self.graph.buildings_at(self.graph.source()) {
            phases[0].add_building(
                building.category.as_str(),
                building.houses,
                building.priority_score(),
            );
        }

        let mut spent = 0.0;
        let mut budget_exceeded_at = None;
        let mut scheduled = Vec::with_capacity(growth.order.len());
        for (position, &task_idx) in growth.order.iter().enumerate() {
            let task = &tasks[task_idx];
            let edge = self.graph.edge(task.edge);
            let phase = task.phase.unwrap_or(0);
            let start = task.scheduled_start.unwrap_or(0.0);
            let end = task.scheduled_end.unwrap_or(start);
            let labor = labor_cost(task.duration_hours, 1, self.config.hourly_rate);

            let summary = &mut phases[(phase as usize).min(phase_count - 1)];
            let mut buildings_connected = Vec::new();
            for &node in &growth.newly_connected[position] {
                for building in self.graph.buildings_at(node) {
                    buildings_connected.push(building.id.clone());
                    summary.add_building(
                        building.category.as_str(),
                        building.houses,
                        building.priority_score(),
                    );
                }
            }

            spent += task.cost + labor;
            if budget_exceeded_at.is_none() && self.config.budget.is_some_and(|cap| spent > cap) {
                log_decisions!(
                    self.config.verbosity,
                    "Budget crossed at {} (task #{}, {:.0} € spent)",
                    task.id,
                    position,
                    spent
                );
                budget_exceeded_at = Some(position);
            }

            summary.task_count += 1;
            summary.length_m += task.length_m;
            summary.material_cost += task.cost;
            summary.labor_cost += labor;
            summary.work_hours += task.duration_hours;
            summary.start_hours = Some(summary.start_hours.map_or(start, |s| s.min(start)));
            summary.end_hours = Some(summary.end_hours.map_or(end, |e| e.max(end)));
            *summary
                .infra_type_counts
                .entry(task.infra.as_str().to_string())
                .or_insert(0) += 1;

            scheduled.push(ScheduledTask {
                segment_id: task.id.clone(),
                node_a: self.graph.node_name(edge.a).to_string(),
                node_b: self.graph.node_name(edge.b).to_string(),
                infra_type: task.infra.as_str().to_string(),
                length_m: task.length_m,
                phase,
                cost: task.cost,
                labor_cost: labor,
                duration_hours: task.duration_hours,
                start_hours: start,
                end_hours: end,
                worker: task.worker.unwrap_or(0),
                on_hospital_path: position < growth.hospital_len,
                buildings_connected,
                cumulative_cost: spent,
                calendar_start: calendar_time(self.config.project_start, start),
                calendar_end: calendar_time(self.config.project_start, end),
            });
        }

        // Phases follow growth order, so a running sum gives spend at each phase end
        let mut running = 0.0;
        for summary in &mut phases {
            running += summary.material_cost + summary.labor_cost;
            summary.cumulative_cost = running;
        }

        let material_cost: f64 = phases.iter().map(|p| p.material_cost).sum();
        let labor_total: f64 = phases.iter().map(|p| p.labor_cost).sum();
        let buildings = self.graph.buildings();

        let mut category_counts: HashMap<String, usize> = HashMap::new();
        let mut category_houses: HashMap<String, u32> = HashMap::new();
        for summary in &phases {
            for (category, count) in &summary.category_counts {
                *category_counts.entry(category.clone()).or_insert(0) += count;
            }
            for (category, houses) in &summary.category_houses {
                *category_houses.entry(category.clone()).or_insert(0) += houses;
            }
        }

        let mut metadata = HashMap::new();
        metadata.insert("algorithm".to_string(), "connectivity_growth".to_string());
        metadata.insert(
            "max_workers".to_string(),
            self.config.max_workers.to_string(),
        );
        metadata.insert("phases".to_string(), phase_count.to_string());
        metadata.insert(
            "hospital_segments".to_string(),
            growth.hospital_len.to_string(),
        );
        metadata.insert(
            "peak_occupancy".to_string(),
            outcome.pool.peak_occupancy().to_string(),
        );
        let utilization = outcome.pool.utilization(outcome.makespan_hours);
        if !utilization.is_empty() {
            let avg = utilization.iter().sum::<f64>() / utilization.len() as f64;
            metadata.insert("avg_utilization".to_string(), format!("{:.3}", avg));
        }

        Schedule {
            tasks: scheduled,
            phases,
            material_cost,
            labor_cost: labor_total,
            total_cost: material_cost + labor_total,
            total_work_hours: outcome.total_work_hours,
            makespan_hours: outcome.makespan_hours,
            critical_path_hours: outcome.critical_path_hours,
            hospital_ready_hours: verdict.ready_hours,
            hospital_deadline_hours: verdict.deadline_hours,
            feasible: verdict.feasible,
            overrun_hours: verdict.overrun_hours,
            buildings_connected: buildings.len(),
            houses_connected: buildings.iter().map(|b| b.houses).sum(),
            category_counts,
            category_houses,
            budget: self.config.budget,
            budget_exceeded_at,
            algorithm_metadata: metadata,
        }
    }
}
