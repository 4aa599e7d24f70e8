//! Strict, fully numeric report shape produced by the normalizer.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// The four tracked environmental dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactMetrics {
    pub carbon: f64,
    pub water: f64,
    pub energy: f64,
    pub waste: f64,
}

impl ImpactMetrics {
    pub fn new(carbon: f64, water: f64, energy: f64, waste: f64) -> Self {
        Self {
            carbon,
            water,
            energy,
            waste,
        }
    }
}

impl Add for ImpactMetrics {
    type Output = ImpactMetrics;

    fn add(mut self, rhs: ImpactMetrics) -> ImpactMetrics {
        self += rhs;
        self
    }
}

impl AddAssign for ImpactMetrics {
    fn add_assign(&mut self, rhs: ImpactMetrics) {
        self.carbon += rhs.carbon;
        self.water += rhs.water;
        self.energy += rhs.energy;
        self.waste += rhs.waste;
    }
}

impl<'a> Sum<&'a ImpactMetrics> for ImpactMetrics {
    fn sum<I: Iterator<Item = &'a ImpactMetrics>>(iter: I) -> Self {
        iter.fold(ImpactMetrics::default(), |acc, m| acc + *m)
    }
}

/// One phase of the product lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleStage {
    pub stage: String,
    pub impact: ImpactMetrics,
    pub main_cause: String,
    pub alternative_methods: Vec<String>,
    pub reduction_suggestions: Vec<String>,
    pub circularity_opportunities: Vec<String>,
}

/// A complete assessment. Built once per normalization and never mutated
/// except for the processing time fix-up done by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub stages: Vec<LifecycleStage>,
    pub total_impact: ImpactMetrics,
    /// Milliseconds.
    pub processing_time: u64,
    pub request_id: String,
}

impl AssessmentReport {
    /// Field-wise sum of the stage impacts, in stage order.
    pub fn sum_stages(stages: &[LifecycleStage]) -> ImpactMetrics {
        stages.iter().map(|s| &s.impact).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_is_field_wise() {
        let a = ImpactMetrics::new(1.0, 2.0, 3.0, 4.0);
        let b = ImpactMetrics::new(10.0, 20.0, 30.0, 40.0);
        let total: ImpactMetrics = [a, b].iter().sum();
        assert_eq!(total, ImpactMetrics::new(11.0, 22.0, 33.0, 44.0));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        assert_eq!(AssessmentReport::sum_stages(&[]), ImpactMetrics::default());
    }
}
