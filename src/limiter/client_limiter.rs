//! Per-client rate limiter with idle eviction
//!
//! One token bucket per client key, stored in a concurrent map with
//! per-entry locking. A background sweeper evicts entries not seen within
//! the idle timeout, bounding memory under churny client populations.

use super::token_bucket::TokenBucket;
use crate::config::LimiterSettings;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Per-client bucket state plus request recency
#[derive(Debug)]
struct ClientEntry {
    bucket: TokenBucket,

    /// Time of the most recent admission check, admitted or rejected
    ///
    /// Rejections refresh this too: idle eviction measures request recency,
    /// and a throttled client hammering the limiter must not be handed a
    /// fresh bucket by the sweeper.
    last_seen: Instant,
}

impl ClientEntry {
    fn new(burst: u32, rps: f64) -> Self {
        Self {
            bucket: TokenBucket::new(burst, rps),
            last_seen: Instant::now(),
        }
    }
}

/// Per-client rate limiter
///
/// Shared by all request handlers via `Arc`. The hot path is [`allow`]:
/// one concurrent-map lookup plus a short per-entry lock. Entries are
/// created lazily at full burst on first sight of a key and removed by the
/// sweeper once idle for longer than the configured timeout.
///
/// [`allow`]: ClientRateLimiter::allow
pub struct ClientRateLimiter {
    /// Sustained admissions per second per client
    rps: f64,
    /// Maximum burst size per client
    burst: u32,
    /// When false, every call is admitted and no state is tracked
    enabled: bool,
    /// Clients unseen for longer than this are evicted
    idle_timeout: Duration,
    /// How often the sweeper runs
    sweep_interval: Duration,
    /// Client table - keyed by interned client key
    clients: DashMap<Arc<str>, Arc<Mutex<ClientEntry>>>,
    /// Cancellation for the background sweeper
    shutdown: CancellationToken,
}

impl ClientRateLimiter {
    /// Create a new limiter with default settings
    pub fn new() -> Self {
        Self::with_config(&LimiterSettings::default())
    }

    /// Create a new limiter from config settings
    pub fn with_config(config: &LimiterSettings) -> Self {
        Self {
            rps: config.rps,
            burst: config.burst,
            enabled: config.enabled,
            idle_timeout: config.idle_timeout(),
            sweep_interval: config.sweep_interval(),
            clients: DashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Check whether a request from `key` should be admitted
    ///
    /// Returns `true` if admitted, `false` if the client is out of tokens.
    /// Never fails: a `false` result is a policy decision, not an error.
    /// Both outcomes refresh the entry's recency.
    #[inline]
    pub fn allow(&self, key: &str) -> bool {
        if !self.enabled {
            return true;
        }

        // Clone the Arc out so the map shard lock is released before the
        // entry mutex is taken. Existing keys take the read-only path and
        // skip the key allocation.
        let entry = match self.clients.get(key) {
            Some(entry) => Arc::clone(&entry),
            None => Arc::clone(
                self.clients
                    .entry(Arc::from(key))
                    .or_insert_with(|| Arc::new(Mutex::new(ClientEntry::new(self.burst, self.rps))))
                    .value(),
            ),
        };

        let mut guard = entry.lock();
        guard.last_seen = Instant::now();
        guard.bucket.try_consume(1)
    }

    /// Evict clients unseen for longer than the idle timeout
    ///
    /// Returns the number of evicted entries. Infallible, so a single pass
    /// can never stop subsequent passes. Callable directly for deterministic
    /// eviction in tests; in production the sweeper calls it on a schedule.
    pub fn sweep_once(&self) -> usize {
        let idle_timeout = self.idle_timeout;
        let mut evicted = 0;

        self.clients.retain(|_, entry| {
            let stale = entry.lock().last_seen.elapsed() > idle_timeout;
            if stale {
                evicted += 1;
            }
            !stale
        });

        if evicted > 0 {
            log::debug!(
                "Sweep evicted {} idle clients, {} still tracked",
                evicted,
                self.clients.len()
            );
        }

        evicted
    }

    /// Start the background sweeper task
    ///
    /// Runs [`sweep_once`] every sweep interval until [`shutdown`] is called
    /// or the last strong handle to the limiter is dropped (the task holds
    /// only a weak reference, so it cannot keep the limiter alive).
    ///
    /// [`sweep_once`]: ClientRateLimiter::sweep_once
    /// [`shutdown`]: ClientRateLimiter::shutdown
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        let shutdown = self.shutdown.clone();
        let sweep_interval = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        log::debug!("Client limiter sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(limiter) = limiter.upgrade() else {
                            break;
                        };
                        limiter.sweep_once();
                    }
                }
            }
        })
    }

    /// Stop the background sweeper
    ///
    /// Idempotent. The limiter itself keeps working after shutdown; only
    /// idle eviction stops.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Current token count for a tracked client, `None` if untracked
    ///
    /// Monitoring helper; does not refresh the entry's recency.
    pub fn available_tokens(&self, key: &str) -> Option<f64> {
        let entry = self.clients.get(key).map(|entry| Arc::clone(&entry))?;
        let mut guard = entry.lock();
        Some(guard.bucket.available_tokens())
    }
}

impl Default for ClientRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
