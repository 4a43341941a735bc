//! floodgate
//!
//! Per-client token bucket admission control with idle eviction.
//!
//! Each client key gets its own token bucket, refilled continuously at a
//! configured rate. A background sweeper evicts clients not seen within an
//! idle timeout so the tracked set stays bounded under churny populations.
//!
//! The host derives the client key (for example from the connection's origin
//! address) and asks the limiter for an admission decision before doing any
//! further work:
//!
//! ```rust,no_run
//! use floodgate::{ClientRateLimiter, LimiterSettings};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let settings = LimiterSettings::default();
//! let limiter = Arc::new(ClientRateLimiter::with_config(&settings));
//!
//! // Periodic idle eviction, cancellable on shutdown
//! let sweeper = limiter.spawn_sweeper();
//!
//! if limiter.allow("10.0.0.1") {
//!     // handle the request
//! } else {
//!     // reject with a "too many requests" response
//! }
//!
//! limiter.shutdown();
//! sweeper.await.ok();
//! # }
//! ```

pub mod config;
pub mod limiter;

pub use config::LimiterSettings;
pub use limiter::ClientRateLimiter;
