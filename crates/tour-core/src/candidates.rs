//! Municipality pool and banded candidate sampling.

use crate::config::{DistanceBand, EmptyPoolPolicy};
use crate::error::{PlannerError, Result};
use crate::models::{Candidate, GeoPoint, Municipality};
use crate::spatial::distance_km;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Municipalities closer than this to the base point count as the base itself.
const COINCIDENT_KM: f64 = 0.001;

/// Read-only view over the normalized municipality dataset.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    municipalities: Vec<Municipality>,
}

impl CandidatePool {
    pub fn new(municipalities: Vec<Municipality>) -> Result<Self> {
        if municipalities.is_empty() {
            return Err(PlannerError::DatasetUnavailable(
                "dataset loaded no municipalities".to_string(),
            ));
        }
        Ok(Self { municipalities })
    }

    pub fn all(&self) -> &[Municipality] {
        &self.municipalities
    }

    pub fn len(&self) -> usize {
        self.municipalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty()
    }
}

/// Result of one selection round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    /// Set when the band was ignored under [`EmptyPoolPolicy::NearestFallback`].
    pub relaxed: bool,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CandidateSelector {
    pool: Arc<CandidatePool>,
    policy: EmptyPoolPolicy,
}

impl CandidateSelector {
    pub fn new(pool: Arc<CandidatePool>, policy: EmptyPoolPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn policy(&self) -> EmptyPoolPolicy {
        self.policy
    }

    /// Draw up to `k` municipalities whose distance from `base` lies in
    /// `band`, uniformly at random without replacement.
    pub fn select<R: Rng + ?Sized>(
        &self,
        base: &GeoPoint,
        band: DistanceBand,
        k: usize,
        rng: &mut R,
    ) -> Result<Selection> {
        band.validate()?;
        if k == 0 {
            return Err(PlannerError::InvalidBandConfiguration(
                "candidate count must be at least 1".to_string(),
            ));
        }

        let mut in_band: Vec<Candidate> = self
            .pool
            .all()
            .iter()
            .filter_map(|m| {
                let d = distance_km(base, &m.location);
                band.contains(d).then(|| Candidate {
                    municipality: m.clone(),
                    distance_km: d,
                })
            })
            .collect();

        tracing::debug!(
            in_band = in_band.len(),
            min_km = band.min_km,
            max_km = band.max_km,
            "filtered candidate pool"
        );

        if !in_band.is_empty() {
            let take = k.min(in_band.len());
            let (chosen, _) = in_band.partial_shuffle(rng, take);
            return Ok(Selection {
                candidates: chosen.to_vec(),
                relaxed: false,
            });
        }

        match self.policy {
            EmptyPoolPolicy::Strict => Ok(Selection::default()),
            EmptyPoolPolicy::NearestFallback => {
                let candidates = self.nearest(base, k);
                tracing::debug!(
                    count = candidates.len(),
                    "band empty, offering nearest municipalities"
                );
                Ok(Selection {
                    candidates,
                    relaxed: true,
                })
            }
        }
    }

    /// The `k` nearest municipalities, skipping any coincident with `base`.
    fn nearest(&self, base: &GeoPoint, k: usize) -> Vec<Candidate> {
        let mut all: Vec<Candidate> = self
            .pool
            .all()
            .iter()
            .map(|m| Candidate {
                distance_km: distance_km(base, &m.location),
                municipality: m.clone(),
            })
            .filter(|c| c.distance_km >= COINCIDENT_KM)
            .collect();
        all.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        all.truncate(k);
        all
    }
}
