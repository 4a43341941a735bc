//! Limiter configuration types and loader

pub mod defaults;
mod loader;
mod types;

pub use types::LimiterSettings;
