//! Subscriber registry and snapshot fan-out.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::{Arc, Mutex};

use log::{error, trace};

use realdash_market_data::RateSnapshot;

/// A subscriber callback. The `Arc` allocation is the subscriber's identity:
/// passing a clone of the same `Arc` to `unsubscribe` removes it, and
/// subscribing the same `Arc` twice is a no-op.
pub type SubscriberCallback = Arc<dyn Fn(&RateSnapshot) + Send + Sync>;

/// Outcome of a registry mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryChange {
    /// Whether the registry actually changed (false for duplicate subscribe
    /// or unknown unsubscribe).
    pub changed: bool,
    /// Subscriber count after the operation.
    pub count: usize,
}

/// Registry of snapshot consumers.
///
/// Delivery runs synchronously in registration order while the registry lock
/// is held, which guarantees a callback is never invoked after its own
/// unsubscribe has returned. Callbacks must therefore not call back into the
/// bus.
#[derive(Default)]
pub struct SubscriptionBus {
    subscribers: Mutex<Vec<SubscriberCallback>>,
}

fn same_callback(a: &SubscriberCallback, b: &SubscriberCallback) -> bool {
    // Identity by allocation address; the vtable part of the fat pointer is
    // deliberately ignored.
    ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback; duplicate handles are ignored.
    pub fn subscribe(&self, callback: SubscriberCallback) -> RegistryChange {
        let mut subscribers = self.lock();
        if subscribers.iter().any(|existing| same_callback(existing, &callback)) {
            return RegistryChange {
                changed: false,
                count: subscribers.len(),
            };
        }
        subscribers.push(callback);
        RegistryChange {
            changed: true,
            count: subscribers.len(),
        }
    }

    /// Removes a callback by handle identity.
    pub fn unsubscribe(&self, callback: &SubscriberCallback) -> RegistryChange {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|existing| !same_callback(existing, callback));
        RegistryChange {
            changed: subscribers.len() != before,
            count: subscribers.len(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Delivers `snapshot` to every subscriber in registration order.
    ///
    /// A panicking callback is isolated and logged; the remaining
    /// subscribers still receive the snapshot.
    pub fn broadcast(&self, snapshot: &RateSnapshot) {
        let subscribers = self.lock();
        trace!(
            "Broadcasting snapshot captured at {} to {} subscriber(s)",
            snapshot.captured_at,
            subscribers.len()
        );
        for (index, callback) in subscribers.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| callback(snapshot))).is_err() {
                error!("Subscriber {} panicked during snapshot delivery", index);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SubscriberCallback>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
