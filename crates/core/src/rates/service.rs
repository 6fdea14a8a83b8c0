//! The rate service facade.
//!
//! Wires the cache, the subscription bus and the refresh scheduler together
//! and derives the scheduler lifecycle from the subscriber count. An explicit,
//! constructible object: callers inject the snapshot source and configuration,
//! nothing lives in process-wide globals.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use realdash_market_data::{RateSnapshot, RateSource, SnapshotSource};

use crate::rates::bus::{SubscriberCallback, SubscriptionBus};
use crate::rates::cache::RateCache;
use crate::rates::scheduler::{RefreshScheduler, SnapshotSink};
use crate::valuation::{self, ConversionRoute, CurrencyUnit, MonetaryAmount};

/// Refresh period between fetches while subscribers exist.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Service configuration.
#[derive(Debug, Clone)]
pub struct RateServiceConfig {
    pub refresh_interval: Duration,
}

impl Default for RateServiceConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Live market data cache and valuation engine.
///
/// Consumers opt in with [`subscribe`](Self::subscribe) and receive every new
/// snapshot; the first subscriber starts the refresh loop and the last
/// unsubscribe halts it, so no network traffic happens without demand.
/// [`convert`](Self::convert) prices amounts against the latest cached
/// snapshot at any time, falling back to the constant snapshot before the
/// first fetch completes — callers never need to handle "no data yet".
pub struct RateService {
    cache: Arc<RateCache>,
    bus: Arc<SubscriptionBus>,
    scheduler: RefreshScheduler,
    // Serializes subscriber-count transitions so concurrent subscribes can
    // never start two refresh loops.
    lifecycle: Mutex<()>,
}

impl RateService {
    pub fn new(source: Arc<dyn SnapshotSource>, config: RateServiceConfig) -> Self {
        let cache = Arc::new(RateCache::new());
        let bus = Arc::new(SubscriptionBus::new());

        let sink: SnapshotSink = {
            let cache = cache.clone();
            let bus = bus.clone();
            Arc::new(move |snapshot: Arc<RateSnapshot>| {
                // Cache first, fan out second. A completed fetch is never
                // discarded: it lands in the cache even when the audience is
                // gone; only the broadcast is conditional.
                if cache.replace(snapshot.clone()) && bus.subscriber_count() > 0 {
                    bus.broadcast(&snapshot);
                }
            })
        };

        let scheduler = RefreshScheduler::new(config.refresh_interval, source, sink);

        Self {
            cache,
            bus,
            scheduler,
            lifecycle: Mutex::new(()),
        }
    }

    /// Builds a service backed by the production providers, reading the
    /// optional crypto API key from the environment.
    pub fn with_live_source(config: RateServiceConfig) -> Self {
        Self::new(Arc::new(RateSource::from_env()), config)
    }

    /// Registers a snapshot consumer. The first registrant arms the refresh
    /// loop, which fetches immediately. Re-subscribing the same handle is a
    /// no-op.
    pub fn subscribe(&self, callback: SubscriberCallback) {
        let _guard = self.lock_lifecycle();
        let change = self.bus.subscribe(callback);
        if change.changed && change.count == 1 {
            self.scheduler.start();
        }
    }

    /// Removes a consumer. When the registry empties, the refresh loop is
    /// halted; a fetch already in flight still completes into the cache.
    pub fn unsubscribe(&self, callback: &SubscriberCallback) {
        let _guard = self.lock_lifecycle();
        let change = self.bus.unsubscribe(callback);
        if change.changed && change.count == 0 {
            self.scheduler.stop();
        }
    }

    /// Prices `amount` in `target` against the latest snapshot.
    pub fn convert(&self, amount: MonetaryAmount, target: CurrencyUnit) -> f64 {
        self.convert_with_route(amount, target).0
    }

    /// Like [`convert`](Self::convert), also reporting the conversion route.
    pub fn convert_with_route(
        &self,
        amount: MonetaryAmount,
        target: CurrencyUnit,
    ) -> (f64, ConversionRoute) {
        match self.cache.current() {
            Some(snapshot) => valuation::convert_with_route(amount, target, &snapshot),
            None => valuation::convert_with_route(amount, target, &RateSnapshot::fallback()),
        }
    }

    /// The latest captured snapshot, if any fetch has completed yet.
    pub fn current_snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.cache.current()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Whether the refresh loop is currently armed.
    pub fn is_refreshing(&self) -> bool {
        self.scheduler.is_active()
    }

    fn lock_lifecycle(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
