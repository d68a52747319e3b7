//! In-memory plan sessions using DashMap.
//!
//! Each session owns one planner behind an async mutex, so operations on a
//! single plan run one at a time while different plans proceed in parallel.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tour_core::error::Result;
use tour_core::{CandidatePool, Geocoder, PlannerConfig, RoutePlanner, Router, TravelMode};
use uuid::Uuid;

/// Planner plus the travel mode chosen for the plan.
pub struct PlanEntry {
    pub planner: RoutePlanner,
    pub mode: TravelMode,
}

pub struct PlanSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    last_used: Mutex<DateTime<Utc>>,
    entry: AsyncMutex<PlanEntry>,
}

/// Exclusive access to a plan. The session counts as used until the guard
/// is dropped.
pub struct PlanGuard<'a> {
    session: &'a PlanSession,
    guard: MutexGuard<'a, PlanEntry>,
}

impl Deref for PlanGuard<'_> {
    type Target = PlanEntry;

    fn deref(&self) -> &PlanEntry {
        &self.guard
    }
}

impl DerefMut for PlanGuard<'_> {
    fn deref_mut(&mut self) -> &mut PlanEntry {
        &mut self.guard
    }
}

impl Drop for PlanGuard<'_> {
    fn drop(&mut self) {
        self.session.touch();
    }
}

impl PlanSession {
    /// Wait for exclusive access to the plan.
    pub async fn lock(&self) -> PlanGuard<'_> {
        let guard = self.entry.lock().await;
        self.touch();
        PlanGuard {
            session: self,
            guard,
        }
    }

    /// Whether a request currently holds the plan.
    pub fn in_use(&self) -> bool {
        self.entry.try_lock().is_err()
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_used
            .lock()
            .map(|t| *t)
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_used.lock() {
            *last = Utc::now();
        }
    }
}

/// Application state - shared collaborators and the session table.
pub struct AppState {
    sessions: DashMap<String, Arc<PlanSession>>,
    pool: Arc<CandidatePool>,
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn Router>,
    planner_config: PlannerConfig,
}

impl AppState {
    pub fn new(
        pool: Arc<CandidatePool>,
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn Router>,
        planner_config: PlannerConfig,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            pool,
            geocoder,
            router,
            planner_config,
        }
    }

    pub fn planner_config(&self) -> &PlannerConfig {
        &self.planner_config
    }

    /// Register a fresh, idle plan.
    pub fn create_session(&self, mode: TravelMode) -> Result<Arc<PlanSession>> {
        let planner = RoutePlanner::new(
            self.geocoder.clone(),
            self.router.clone(),
            self.pool.clone(),
            self.planner_config.clone(),
        )?;
        let now = Utc::now();
        let session = Arc::new(PlanSession {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            last_used: Mutex::new(now),
            entry: AsyncMutex::new(PlanEntry { planner, mode }),
        });
        self.sessions.insert(session.id.clone(), session.clone());
        tracing::debug!(plan_id = %session.id, "plan session created");
        Ok(session)
    }

    pub fn session(&self, id: &str) -> Option<Arc<PlanSession>> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    pub fn remove_session(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions idle for longer than `ttl`, then the least recently used
    /// ones until at most `max_sessions` remain. Sessions held by a request
    /// are never dropped. Returns how many were dropped.
    pub fn prune_sessions(&self, ttl: Duration, max_sessions: usize) -> usize {
        let before = self.sessions.len();
        let cutoff = Utc::now() - ttl;
        self.sessions
            .retain(|_, session| session.in_use() || session.last_used() >= cutoff);

        if self.sessions.len() > max_sessions {
            let mut by_age: Vec<(String, DateTime<Utc>)> = self
                .sessions
                .iter()
                .filter(|entry| !entry.value().in_use())
                .map(|entry| (entry.key().clone(), entry.value().last_used()))
                .collect();
            by_age.sort_by_key(|(_, last_used)| *last_used);
            for (id, _) in by_age {
                if self.sessions.len() <= max_sessions {
                    break;
                }
                self.sessions.remove(&id);
            }
        }
        before.saturating_sub(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tour_core::{GeoPoint, Municipality, PlannerError, RouteLeg};

    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn resolve(&self, query: &str) -> Result<GeoPoint> {
            Err(PlannerError::GeocodeNotFound(query.to_string()))
        }
    }

    struct NoRouter;

    #[async_trait]
    impl Router for NoRouter {
        async fn route(&self, _: &GeoPoint, _: &GeoPoint, _: TravelMode) -> Result<RouteLeg> {
            Err(PlannerError::NoRouteFound {
                from: String::new(),
                to: String::new(),
                reason: "unavailable".to_string(),
            })
        }
    }

    fn state() -> AppState {
        let pool = CandidatePool::new(vec![Municipality::new("Tsu", None, 34.73, 136.51)]).unwrap();
        AppState::new(
            Arc::new(pool),
            Arc::new(NoGeocoder),
            Arc::new(NoRouter),
            PlannerConfig::default(),
        )
    }

    #[test]
    fn create_and_remove() {
        let state = state();
        let session = state.create_session(TravelMode::Driving).unwrap();
        assert!(state.session(&session.id).is_some());
        assert!(state.remove_session(&session.id));
        assert!(!state.remove_session(&session.id));
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn prune_drops_idle_then_oldest() {
        let state = state();
        for _ in 0..3 {
            state.create_session(TravelMode::Driving).unwrap();
        }
        assert_eq!(state.prune_sessions(Duration::hours(1), 10), 0);
        assert_eq!(state.prune_sessions(Duration::hours(1), 2), 1);
        assert_eq!(state.session_count(), 2);
        assert_eq!(state.prune_sessions(Duration::seconds(-1), 10), 2);
        assert_eq!(state.session_count(), 0);
    }

    #[tokio::test]
    async fn held_session_is_not_pruned_and_is_touched_on_release() {
        let state = state();
        let session = state.create_session(TravelMode::Driving).unwrap();

        let guard = session.lock().await;
        let acquired = session.last_used();
        assert!(session.in_use());
        assert_eq!(state.prune_sessions(Duration::seconds(-1), 0), 0);
        assert_eq!(state.session_count(), 1);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        drop(guard);
        assert!(!session.in_use());
        assert!(session.last_used() > acquired);
        assert_eq!(state.prune_sessions(Duration::seconds(-1), 10), 1);
    }
}
