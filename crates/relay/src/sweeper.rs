//! Background housekeeping: idle-room sweep and absence reports.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::store::RoomStore;

/// Spawn the housekeeping loop. It runs until the returned handle is aborted
/// or the runtime shuts down.
pub fn spawn(store: Arc<RoomStore>, config: &RelayConfig) -> JoinHandle<()> {
    let idle_timeout = config.idle_timeout();
    let sweep_every = config.sweep_interval();
    let absent_after = config.disconnect_after();
    // Check presence a few times per threshold so reports are not late by a
    // whole period.
    let presence_every = absent_after / 3;

    tokio::spawn(async move {
        let mut sweep = time::interval_at(Instant::now() + sweep_every, sweep_every);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut presence = time::interval_at(Instant::now() + presence_every, presence_every);
        presence.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = sweep.tick() => {
                    let removed = store.sweep_idle(idle_timeout).await;
                    if !removed.is_empty() {
                        info!(count = removed.len(), "swept idle rooms");
                    }
                }
                _ = presence.tick() => {
                    let reported = store.report_absent(absent_after).await;
                    if reported > 0 {
                        debug!(reported, "reported absent players");
                    }
                }
            }
        }
    })
}
