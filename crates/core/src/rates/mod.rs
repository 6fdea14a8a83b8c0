//! Live rate caching, refresh scheduling and fan-out.

pub mod bus;
pub mod cache;
pub mod scheduler;
pub mod service;

pub use bus::{RegistryChange, SubscriberCallback, SubscriptionBus};
pub use cache::RateCache;
pub use scheduler::{RefreshScheduler, SnapshotSink};
pub use service::{RateService, RateServiceConfig, DEFAULT_REFRESH_INTERVAL};
