//! Crew slots for the construction timeline.

/// Work periods of one crew, as half-open `[start, end)` hour intervals.
///
/// Periods are appended in time order and never overlap; back-to-back periods
/// are merged.
#[derive(Clone, Debug, Default)]
pub struct WorkerSchedule {
    pub busy_periods: Vec<(f64, f64)>,
}

impl WorkerSchedule {
    /// Time at which the crew finishes its last assignment.
    pub fn free_at(&self) -> f64 {
        self.busy_periods.last().map(|(_, end)| *end).unwrap_or(0.0)
    }

    /// Append an assignment starting no earlier than [`WorkerSchedule::free_at`].
    pub fn push(&mut self, start: f64, end: f64) {
        debug_assert!(start >= self.free_at());
        match self.busy_periods.last_mut() {
            Some(last) if last.1 >= start => last.1 = last.1.max(end),
            _ => self.busy_periods.push((start, end)),
        }
    }

    pub fn busy_hours(&self) -> f64 {
        self.busy_periods.iter().map(|(s, e)| e - s).sum()
    }
}

/// Fixed pool of crews. The timeline is the only owner during a run.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    workers: Vec<WorkerSchedule>,
    /// Every assignment as (start, end), for occupancy checks.
    assignments: Vec<(f64, f64)>,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        Self {
            workers: vec![WorkerSchedule::default(); max_workers],
            assignments: Vec::new(),
        }
    }

    /// Crew that frees up first (lowest index on ties) and when.
    pub fn earliest_free(&self) -> Option<(usize, f64)> {
        self.workers
            .iter()
            .enumerate()
            .map(|(idx, w)| (idx, w.free_at()))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    pub fn assign(&mut self, worker: usize, start: f64, end: f64) {
        self.workers[worker].push(start, end);
        self.assignments.push((start, end));
    }

    /// Number of tasks running at instant `t`.
    pub fn occupancy_at(&self, t: f64) -> usize {
        self.assignments
            .iter()
            .filter(|(s, e)| *s <= t && t < *e)
            .count()
    }

    /// Highest number of tasks running at once over the whole run.
    pub fn peak_occupancy(&self) -> usize {
        // Ends sort before starts at the same instant: intervals are half-open
        let mut events: Vec<(f64, i32)> = Vec::with_capacity(self.assignments.len() * 2);
        for (start, end) in &self.assignments {
            events.push((*start, 1));
            events.push((*end, -1));
        }
        events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut running = 0i32;
        let mut peak = 0i32;
        for (_, delta) in events {
            running += delta;
            peak = peak.max(running);
        }
        peak as usize
    }

    /// Busy share of each crew over `[0, horizon)`.
    pub fn utilization(&self, horizon: f64) -> Vec<f64> {
        self.workers
            .iter()
            .map(|w| {
                if horizon > 0.0 {
                    w.busy_hours() / horizon
                } else {
                    0.0
                }
            })
            .collect()
    }
}
