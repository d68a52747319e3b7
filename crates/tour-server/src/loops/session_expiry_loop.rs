//! Session expiry loop.
//!
//! Drops plans nobody has touched within the TTL so abandoned sessions don't
//! hold memory indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::config::Config;
use crate::state::AppState;

const LOOP_INTERVAL_SECS: u64 = 30;
const MAX_TTL_SECS: u64 = 365 * 24 * 3600;

pub async fn run_session_expiry_loop(
    state: Arc<AppState>,
    config: Config,
    mut shutdown: broadcast::Receiver<()>,
) {
    let ttl = chrono::Duration::seconds(config.session_ttl_s.min(MAX_TTL_SECS) as i64);
    let mut ticker = interval(Duration::from_secs(LOOP_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Session expiry loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let dropped = state.prune_sessions(ttl, config.max_sessions);
                if dropped > 0 {
                    tracing::info!(
                        dropped,
                        remaining = state.session_count(),
                        "expired idle plan sessions"
                    );
                }
            }
        }
    }
}
