//! Periodic background refresh of every enabled ruleset

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::rulesets::{RefreshOutcome, RulesetStore};

/// Spawn a task running [`RulesetStore::refresh_all`] every `interval`.
///
/// Returns `None` when `interval` is zero. The task runs until its handle is
/// aborted; the first sweep happens one full interval after spawning.
pub fn spawn_auto_refresh(store: Arc<RulesetStore>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Ruleset auto refresh disabled");
        return None;
    }

    info!(interval_secs = interval.as_secs(), "Starting ruleset auto refresh");
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_once(&store).await;
        }
    }))
}

/// Run one sweep and log every outcome
pub async fn run_once(store: &RulesetStore) -> Vec<RefreshOutcome> {
    match store.refresh_all().await {
        Ok(outcomes) => {
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(message) => info!(id = %outcome.id, "{}", message),
                    Err(e) => warn!(id = %outcome.id, tag = %outcome.tag, error = %e, "Auto refresh failed"),
                }
            }
            outcomes
        }
        Err(e) => {
            error!(error = %e, "Auto refresh could not persist results");
            Vec::new()
        }
    }
}
