//! Token bucket implementation for rate limiting
//!
//! Uses continuous refill based on elapsed time, providing smooth rate
//! limiting rather than bursty window-based limits. Token counts are kept
//! as `f64` so fractional rates (and fractional accrual between calls)
//! carry over instead of being truncated away.

use std::time::Instant;

/// Token bucket for rate limiting
#[derive(Debug)]
pub(crate) struct TokenBucket {
    /// Maximum tokens the bucket can hold
    capacity: f64,

    /// Current token count, always in `[0, capacity]`
    tokens: f64,

    /// Last refill time
    last_refill: Instant,

    /// Tokens added per second
    rate_per_sec: f64,
}

impl TokenBucket {
    /// Create a new bucket, initially full
    ///
    /// # Arguments
    /// * `capacity` - Maximum tokens the bucket can hold
    /// * `rate_per_sec` - Refill rate; zero means the bucket never refills
    #[inline]
    pub(crate) fn new(capacity: u32, rate_per_sec: f64) -> Self {
        let capacity = f64::from(capacity);
        Self {
            capacity,
            tokens: capacity,
            last_refill: Instant::now(),
            rate_per_sec,
        }
    }

    /// Try to consume tokens
    ///
    /// Returns `true` if successful, `false` if insufficient tokens.
    /// This is the hot path - optimized for speed.
    #[inline]
    pub(crate) fn try_consume(&mut self, tokens: u32) -> bool {
        self.refill();

        let cost = f64::from(tokens);
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }

    /// Refill tokens based on elapsed time, capped at capacity
    #[inline]
    fn refill(&mut self) {
        // Fast path: a zero-rate bucket never refills
        if self.rate_per_sec <= 0.0 {
            return;
        }

        let now = Instant::now();
        let elapsed_secs = now.duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + self.rate_per_sec * elapsed_secs).min(self.capacity);
        self.last_refill = now;
    }

    /// Get current token count (after refill)
    #[inline]
    pub(crate) fn available_tokens(&mut self) -> f64 {
        self.refill();
        self.tokens
    }
}
