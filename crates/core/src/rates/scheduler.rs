//! Demand-activated refresh loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use realdash_market_data::{RateSnapshot, SnapshotSource};

/// Receives every completed snapshot, whether or not an audience remains.
pub type SnapshotSink = Arc<dyn Fn(Arc<RateSnapshot>) + Send + Sync>;

/// Two-state refresh driver: Idle (no task) or Active (periodic task).
///
/// While Active, a single tokio task ticks on a fixed interval; the first
/// tick fires immediately so the subscriber that activated the loop does not
/// wait a full period. Fetches are single-flight: the loop awaits each one
/// to completion before the next tick is considered.
///
/// `stop` cancels only the next scheduled tick. A fetch already in flight
/// runs to completion and its snapshot still reaches the sink; whether that
/// snapshot is broadcast is the sink's decision, not the scheduler's.
pub struct RefreshScheduler {
    period: Duration,
    source: Arc<dyn SnapshotSource>,
    sink: SnapshotSink,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl RefreshScheduler {
    pub fn new(period: Duration, source: Arc<dyn SnapshotSource>, sink: SnapshotSink) -> Self {
        Self {
            period,
            source,
            sink,
            shutdown: Mutex::new(None),
        }
    }

    /// Arms the refresh loop. Returns `false` when already Active.
    pub fn start(&self) -> bool {
        let mut shutdown = self.lock();
        if shutdown.is_some() {
            return false;
        }

        let (tx, mut rx) = watch::channel(false);
        let period = self.period;
        let source = self.source.clone();
        let sink = self.sink.clone();

        info!("Starting rate refresh loop (period {:?})", period);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = rx.changed() => break,
                    _ = ticker.tick() => {
                        // Awaited outside the select, so a stop request
                        // arriving mid-fetch never aborts it; the loop exits
                        // at the next iteration instead.
                        let snapshot = Arc::new(source.fetch_snapshot().await);
                        sink(snapshot);
                    }
                }
            }
            debug!("Rate refresh loop stopped");
        });

        *shutdown = Some(tx);
        true
    }

    /// Cancels the next tick. Returns `false` when already Idle.
    pub fn stop(&self) -> bool {
        match self.lock().take() {
            Some(tx) => {
                info!("Stopping rate refresh loop");
                let _ = tx.send(true);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<watch::Sender<bool>>> {
        self.shutdown
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
