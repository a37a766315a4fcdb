use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::services::LinkService;

/// Periodically deletes expired short URLs until the runtime shuts down.
pub fn spawn_cleanup(links: LinkService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = every.as_secs(), "expired link cleanup scheduled");

        loop {
            ticker.tick().await;
            match links.cleanup_expired().await {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, "deleted expired short urls"),
                Err(err) => tracing::error!(error = ?err, "failed to delete expired short urls"),
            }
        }
    })
}
