//! Planner configuration: distance bands, leg count and empty-band policy.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive straight-line distance range in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub min_km: f64,
    pub max_km: f64,
}

impl DistanceBand {
    pub const fn new(min_km: f64, max_km: f64) -> Self {
        Self { min_km, max_km }
    }

    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km >= self.min_km && distance_km <= self.max_km
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_km.is_finite() || !self.max_km.is_finite() {
            return Err(PlannerError::InvalidBandConfiguration(format!(
                "band bounds must be finite, got [{}, {}]",
                self.min_km, self.max_km
            )));
        }
        if self.min_km < 0.0 {
            return Err(PlannerError::InvalidBandConfiguration(format!(
                "band minimum must not be negative, got {}",
                self.min_km
            )));
        }
        if self.min_km > self.max_km {
            return Err(PlannerError::InvalidBandConfiguration(format!(
                "band minimum {} exceeds maximum {}",
                self.min_km, self.max_km
            )));
        }
        Ok(())
    }
}

/// What the selector does when no municipality falls inside the band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPoolPolicy {
    /// Return nothing; the planner reports `EmptyCandidatePool`.
    #[default]
    Strict,
    /// Offer the nearest municipalities regardless of band, flagged as relaxed.
    NearestFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Band for the first destination, measured from the origin.
    pub step1_band: DistanceBand,
    /// Band for every later destination, measured from the previous one.
    pub later_band: DistanceBand,
    /// Number of destinations (legs) in a plan.
    pub leg_count: usize,
    /// Candidates offered per step.
    pub candidate_count: usize,
    #[serde(default)]
    pub empty_pool_policy: EmptyPoolPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            step1_band: DistanceBand::new(100.0, 300.0),
            later_band: DistanceBand::new(50.0, 100.0),
            leg_count: 3,
            candidate_count: 3,
            empty_pool_policy: EmptyPoolPolicy::Strict,
        }
    }
}

impl PlannerConfig {
    pub fn band_for_step(&self, step: usize) -> DistanceBand {
        if step <= 1 {
            self.step1_band
        } else {
            self.later_band
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.step1_band.validate()?;
        self.later_band.validate()?;
        if self.candidate_count == 0 {
            return Err(PlannerError::InvalidBandConfiguration(
                "candidate count must be at least 1".to_string(),
            ));
        }
        if self.leg_count == 0 {
            return Err(PlannerError::InvalidBandConfiguration(
                "leg count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands() {
        let config = PlannerConfig::default();
        assert_eq!(config.band_for_step(1), DistanceBand::new(100.0, 300.0));
        assert_eq!(config.band_for_step(2), DistanceBand::new(50.0, 100.0));
        assert_eq!(config.band_for_step(3), DistanceBand::new(50.0, 100.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn band_is_inclusive() {
        let band = DistanceBand::new(50.0, 100.0);
        assert!(band.contains(50.0));
        assert!(band.contains(100.0));
        assert!(!band.contains(100.0001));
    }

    #[test]
    fn rejects_inverted_band_and_zero_k() {
        let mut config = PlannerConfig::default();
        config.later_band = DistanceBand::new(120.0, 60.0);
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidBandConfiguration(_))
        ));

        let config = PlannerConfig {
            candidate_count: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidBandConfiguration(_))
        ));
    }
}
