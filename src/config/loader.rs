use super::types::LimiterSettings;
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl LimiterSettings {
    /// Load settings from a TOML file
    ///
    /// Environment overrides are applied after parsing, then the result is
    /// validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut settings: LimiterSettings = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        settings.apply_env_overrides()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Override individual settings from the environment
    ///
    /// Recognized variables: `FLOODGATE_RPS`, `FLOODGATE_BURST`,
    /// `FLOODGATE_ENABLED`, `FLOODGATE_IDLE_TIMEOUT_SECS`,
    /// `FLOODGATE_SWEEP_INTERVAL_SECS`. Unset variables leave the current
    /// value in place.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Some(rps) = env_parse("FLOODGATE_RPS")? {
            self.rps = rps;
        }
        if let Some(burst) = env_parse("FLOODGATE_BURST")? {
            self.burst = burst;
        }
        if let Some(enabled) = env_parse("FLOODGATE_ENABLED")? {
            self.enabled = enabled;
        }
        if let Some(secs) = env_parse("FLOODGATE_IDLE_TIMEOUT_SECS")? {
            self.idle_timeout_secs = secs;
        }
        if let Some(secs) = env_parse("FLOODGATE_SWEEP_INTERVAL_SECS")? {
            self.sweep_interval_secs = secs;
        }
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.rps.is_finite() || self.rps < 0.0 {
            return Err(anyhow::anyhow!(
                "rps must be a finite, non-negative number (got {})",
                self.rps
            ));
        }

        if self.enabled && self.burst == 0 {
            return Err(anyhow::anyhow!(
                "burst cannot be 0 while the limiter is enabled"
            ));
        }

        if self.idle_timeout_secs == 0 {
            return Err(anyhow::anyhow!("idle_timeout_secs cannot be 0"));
        }

        if self.sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!("sweep_interval_secs cannot be 0"));
        }

        Ok(())
    }
}

/// Read and parse an environment variable, `None` if unset
fn env_parse<T: FromStr>(key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; tests touching them must
    // not run concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_validate_rejects_negative_rps() {
        let settings = LimiterSettings {
            rps: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_burst_when_enabled() {
        let settings = LimiterSettings {
            burst: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        // Zero burst is fine when the limiter is disabled
        let settings = LimiterSettings {
            burst: 0,
            enabled: false,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let settings = LimiterSettings {
            idle_timeout_secs: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = LimiterSettings {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("FLOODGATE_RPS", "25.5");
        std::env::set_var("FLOODGATE_BURST", "50");
        std::env::set_var("FLOODGATE_ENABLED", "false");

        let mut settings = LimiterSettings::default();
        settings.apply_env_overrides().unwrap();

        assert_eq!(settings.rps, 25.5);
        assert_eq!(settings.burst, 50);
        assert!(!settings.enabled);
        // Untouched variables keep their defaults
        assert_eq!(settings.idle_timeout_secs, 180);

        std::env::remove_var("FLOODGATE_RPS");
        std::env::remove_var("FLOODGATE_BURST");
        std::env::remove_var("FLOODGATE_ENABLED");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("FLOODGATE_SWEEP_INTERVAL_SECS", "soon");

        let mut settings = LimiterSettings::default();
        assert!(settings.apply_env_overrides().is_err());

        std::env::remove_var("FLOODGATE_SWEEP_INTERVAL_SECS");
    }
}
