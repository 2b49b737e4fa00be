//! Infrastructure types and the per-meter cost/time model.

use std::fmt;
use std::str::FromStr;

use crate::config::RateTable;
use crate::error::PlanningError;

/// Construction technique used for a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InfraType {
    Aerial,
    SemiAerial,
    Conduit,
}

impl InfraType {
    pub const ALL: [InfraType; 3] = [InfraType::Aerial, InfraType::SemiAerial, InfraType::Conduit];

    pub fn as_str(&self) -> &'static str {
        match self {
            InfraType::Aerial => "aerial",
            InfraType::SemiAerial => "semi-aerial",
            InfraType::Conduit => "conduit",
        }
    }
}

impl fmt::Display for InfraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, strip French accents, and unify separators to `-`.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'É' | 'È' | 'Ê' => 'e',
            'ô' | 'Ô' => 'o',
            '_' | ' ' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl FromStr for InfraType {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "aerial" | "aerien" => Ok(InfraType::Aerial),
            "semi-aerial" | "semi-aerien" | "semiaerial" => Ok(InfraType::SemiAerial),
            "conduit" | "fourreau" | "underground" => Ok(InfraType::Conduit),
            _ => Err(PlanningError::InvalidType(s.to_string())),
        }
    }
}

/// Cost and crew time for one meter of a given infrastructure type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfraRate {
    pub cost_per_m: f64,
    pub hours_per_m: f64,
}

/// Material cost and work content of one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskEstimate {
    pub cost: f64,
    pub duration_hours: f64,
}

/// Pure cost/time model over a borrowed rate table.
#[derive(Clone, Copy, Debug)]
pub struct CostModel<'a> {
    rates: &'a RateTable,
}

impl<'a> CostModel<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    pub fn rate(&self, infra: InfraType) -> InfraRate {
        match infra {
            InfraType::Aerial => InfraRate {
                cost_per_m: self.rates.aerial_cost_per_m,
                hours_per_m: self.rates.aerial_hours_per_m,
            },
            InfraType::SemiAerial => InfraRate {
                cost_per_m: self.rates.semi_aerial_cost_per_m,
                hours_per_m: self.rates.semi_aerial_hours_per_m,
            },
            InfraType::Conduit => InfraRate {
                cost_per_m: self.rates.conduit_cost_per_m,
                hours_per_m: self.rates.conduit_hours_per_m,
            },
        }
    }

    /// Material cost in euros.
    pub fn cost(&self, infra: InfraType, length_m: f64) -> f64 {
        length_m * self.rate(infra).cost_per_m
    }

    /// Crew work content in hours.
    pub fn duration(&self, infra: InfraType, length_m: f64) -> f64 {
        length_m * self.rate(infra).hours_per_m
    }

    pub fn estimate(&self, infra: InfraType, length_m: f64) -> TaskEstimate {
        TaskEstimate {
            cost: self.cost(infra, length_m),
            duration_hours: self.duration(infra, length_m),
        }
    }

    /// Same as [`CostModel::estimate`] for a type label straight from input data.
    pub fn estimate_by_name(
        &self,
        infra_type: &str,
        length_m: f64,
    ) -> Result<TaskEstimate, PlanningError> {
        let infra: InfraType = infra_type.parse()?;
        Ok(self.estimate(infra, length_m))
    }
}

/// Labor cost of `duration_hours` of work by `workers` crews at `hourly_rate`.
pub fn labor_cost(duration_hours: f64, workers: usize, hourly_rate: f64) -> f64 {
    duration_hours * workers as f64 * hourly_rate
}
