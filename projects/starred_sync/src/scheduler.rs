use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};

use crate::sync::{run_tick, SyncContext};

/// Runs a tick every `period`, starting immediately. Never returns.
///
/// Tick errors are logged and the loop carries on; the next tick retries
/// against the same stored state. Ticks are not serialized against manual
/// triggers.
pub async fn run_every(ctx: Arc<SyncContext>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match run_tick(&ctx).await {
            Ok(report) => {
                info!(fetched = report.fetched, new = report.new, "tick completed");
            }
            Err(err) => {
                error!(error = %err, "tick failed");
            }
        }
    }
}

pub fn spawn_scheduler(ctx: Arc<SyncContext>, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "starting starred feed scheduler");
    tokio::spawn(run_every(ctx, period))
}
