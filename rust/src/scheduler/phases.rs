//! Partition of the growth order into construction phases.

use crate::log_progress;

/// Cuts the post-hospital task sequence by cumulative-length quotas.
///
/// Phase 0 is the hospital path; phases 1..=n take the quota shares of the
/// remaining length in order. A phase closes at the first task whose inclusion
/// meets or exceeds its cumulative target, and the last phase takes whatever is left.
#[derive(Clone, Debug)]
pub struct PhasePartitioner {
    quotas: Vec<f64>,
    verbosity: u8,
}

impl PhasePartitioner {
    pub fn new(quotas: &[f64], verbosity: u8) -> Self {
        Self {
            quotas: quotas.to_vec(),
            verbosity,
        }
    }

    /// Number of phases including phase 0.
    pub fn phase_count(&self) -> usize {
        self.quotas.len() + 1
    }

    /// Phase number for each position of the ordered `lengths`.
    ///
    /// The first `hospital_len` positions get phase 0. Re-running on the same
    /// input always yields the same cuts.
    pub fn assign(&self, lengths: &[f64], hospital_len: usize) -> Vec<u8> {
        let hospital_len = hospital_len.min(lengths.len());
        let mut phases = vec![0u8; lengths.len()];
        let remaining_total: f64 = lengths[hospital_len..].iter().sum();
        if remaining_total <= 0.0 {
            return phases;
        }

        // Cumulative targets, e.g. 40%, 60%, 80%, 100% of the remaining length
        let mut targets = Vec::with_capacity(self.quotas.len());
        let mut running = 0.0;
        for quota in &self.quotas {
            running += quota;
            targets.push(running * remaining_total);
        }
        let tolerance = remaining_total * 1e-9;
        let last_phase = self.quotas.len();

        let mut phase = 1usize;
        let mut cumulative = 0.0;
        for (position, length) in lengths.iter().enumerate().skip(hospital_len) {
            phases[position] = phase as u8;
            cumulative += length;
            while phase < last_phase && cumulative + tolerance >= targets[phase - 1] {
                log_progress!(
                    self.verbosity,
                    "Phase {} closed at {:.1}m of {:.1}m (target {:.1}m)",
                    phase,
                    cumulative,
                    remaining_total,
                    targets[phase - 1]
                );
                phase += 1;
            }
        }

        phases
    }
}
