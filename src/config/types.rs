use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client rate limiter settings
///
/// Immutable for the lifetime of a limiter instance. All fields have
/// defaults so a partial TOML table (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterSettings {
    /// Sustained admissions per second per client (default: 2.0)
    #[serde(default = "default_rps")]
    pub rps: f64,

    /// Maximum burst size per client (default: 4)
    ///
    /// A fresh client starts with this many tokens, so up to `burst`
    /// requests are admitted back-to-back before the rate applies.
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting (default: true)
    ///
    /// When false the limiter is a pass-through and tracks no state.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds a client may go unseen before it is evictable (default: 180)
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Seconds between idle sweeps (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl LimiterSettings {
    /// Idle timeout as a [`Duration`]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Sweep interval as a [`Duration`]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            rps: default_rps(),
            burst: default_burst(),
            enabled: default_enabled(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LimiterSettings::default();
        assert_eq!(settings.rps, 2.0);
        assert_eq!(settings.burst, 4);
        assert!(settings.enabled);
        assert_eq!(settings.idle_timeout_secs, 180);
        assert_eq!(settings.sweep_interval_secs, 60);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: LimiterSettings = toml::from_str("rps = 10.0\nburst = 20").unwrap();
        assert_eq!(settings.rps, 10.0);
        assert_eq!(settings.burst, 20);
        assert!(settings.enabled);
        assert_eq!(settings.idle_timeout_secs, 180);
    }

    #[test]
    fn test_duration_accessors() {
        let settings = LimiterSettings::default();
        assert_eq!(settings.idle_timeout(), Duration::from_secs(180));
        assert_eq!(settings.sweep_interval(), Duration::from_secs(60));
    }
}
