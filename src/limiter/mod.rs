//! Client rate limiting module
//!
//! Per-client token bucket admission control with idle eviction.
//!
//! ## Components
//!
//! - [`ClientRateLimiter`]: one token bucket per client key, shared by all
//!   request handlers, with a cancellable background sweeper that evicts
//!   idle clients
//!
//! ## Design Principles
//!
//! - **Fast hot path**: `allow` does one map lookup plus one short
//!   per-entry lock; no allocation for already-tracked clients
//! - **No torn state**: each entry is guarded by its own mutex, so
//!   concurrent checks for the same key serialize
//! - **Bounded memory**: the sweeper removes entries unseen for longer
//!   than the idle timeout

mod client_limiter;
mod token_bucket;

pub use client_limiter::ClientRateLimiter;
