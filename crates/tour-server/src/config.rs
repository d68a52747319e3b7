//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use tour_core::{DistanceBand, EmptyPoolPolicy, PlannerConfig};
use tour_providers::{DEFAULT_DATASET_URL, DEFAULT_NOMINATIM_URL, DEFAULT_OSRM_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// URL or file path of the municipality dataset.
    pub dataset_source: String,
    pub nominatim_url: String,
    pub osrm_url: String,
    pub http_timeout_s: u64,
    pub user_agent: Option<String>,
    /// Plans untouched for this long are dropped.
    pub session_ttl_s: u64,
    pub max_sessions: usize,
    pub planner: PlannerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PlannerConfig::default();
        let policy = if env_flag("TOUR_FALLBACK") {
            EmptyPoolPolicy::NearestFallback
        } else {
            EmptyPoolPolicy::Strict
        };

        Self {
            server_port: env_parse("TOUR_PORT", 3000),
            dataset_source: env::var("TOUR_DATASET_URL")
                .unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string()),
            nominatim_url: env::var("TOUR_NOMINATIM_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_URL.to_string()),
            osrm_url: env::var("TOUR_OSRM_URL").unwrap_or_else(|_| DEFAULT_OSRM_URL.to_string()),
            http_timeout_s: env_parse("TOUR_HTTP_TIMEOUT_S", 10),
            user_agent: env::var("TOUR_USER_AGENT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            session_ttl_s: env_parse("TOUR_SESSION_TTL_S", 3600),
            max_sessions: env_parse("TOUR_MAX_SESSIONS", 1000),
            planner: PlannerConfig {
                step1_band: DistanceBand::new(
                    env_parse("TOUR_STEP1_MIN_KM", defaults.step1_band.min_km),
                    env_parse("TOUR_STEP1_MAX_KM", defaults.step1_band.max_km),
                ),
                later_band: DistanceBand::new(
                    env_parse("TOUR_LATER_MIN_KM", defaults.later_band.min_km),
                    env_parse("TOUR_LATER_MAX_KM", defaults.later_band.max_km),
                ),
                leg_count: env_parse("TOUR_LEG_COUNT", defaults.leg_count),
                candidate_count: env_parse("TOUR_CANDIDATE_COUNT", defaults.candidate_count),
                empty_pool_policy: policy,
            },
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
