// Default value functions

pub fn default_rps() -> f64 {
    2.0
}

pub fn default_burst() -> u32 {
    4
}

pub fn default_enabled() -> bool {
    true
}

pub fn default_idle_timeout_secs() -> u64 {
    180 // 3x the sweep interval; clients unseen this long are evicted
}

pub fn default_sweep_interval_secs() -> u64 {
    60
}
