//! Aggregate statistics over valid records and the damage-cost estimate.

use serde::{Deserialize, Serialize};

/// Estimates the damage cost of an event from its magnitude.
pub trait CostModel {
    fn estimate(&self, magnitude: f64) -> f64;
}

impl<F> CostModel for F
where
    F: Fn(f64) -> f64,
{
    fn estimate(&self, magnitude: f64) -> f64 {
        self(magnitude)
    }
}

/// Cost proportional to magnitude. A placeholder model, not a physical one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCost {
    pub per_magnitude: f64,
}

impl Default for LinearCost {
    fn default() -> Self {
        Self {
            per_magnitude: 1_000_000.0,
        }
    }
}

impl CostModel for LinearCost {
    fn estimate(&self, magnitude: f64) -> f64 {
        magnitude * self.per_magnitude
    }
}

/// Running totals; every field stays zero until the first valid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: u64,
    pub sum_magnitude: f64,
    pub sum_cost: f64,
}

impl Statistics {
    pub fn ingest(&mut self, magnitude: f64, cost: f64) {
        self.count += 1;
        self.sum_magnitude += magnitude;
        self.sum_cost += cost;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn average_magnitude(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_magnitude / self.count as f64)
    }

    pub fn average_cost(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_cost / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_are_undefined_without_rows() {
        let stats = Statistics::default();
        assert!(stats.is_empty());
        assert_eq!(stats.average_magnitude(), None);
        assert_eq!(stats.average_cost(), None);
    }

    #[test]
    fn averages_divide_sums_by_count() {
        let cost = LinearCost::default();
        let mut stats = Statistics::default();
        for magnitude in [2.0, 3.5, 4.5] {
            stats.ingest(magnitude, cost.estimate(magnitude));
        }
        assert_eq!(stats.count, 3);
        assert!((stats.average_magnitude().unwrap() - 10.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_cost().unwrap() - 10_000_000.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn closures_are_cost_models() {
        let squared = |magnitude: f64| magnitude * magnitude;
        assert_eq!(squared.estimate(3.0), 9.0);
    }
}
