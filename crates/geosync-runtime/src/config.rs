//! Runtime configuration

use std::time::Duration;

use geosync_core::Seconds;
use geosync_localize::LocalizeConfig;

/// Geosync runtime configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Thresholds and budgets for the localization machine.
    pub localize: LocalizeConfig,
    /// How long the fatal reason stays on screen before the scheduled exit.
    pub exit_display_delay: Seconds,
    /// Poll interval for the background location startup task.
    pub location_poll_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            localize: LocalizeConfig::default(),
            exit_display_delay: Seconds::new(3.0),
            location_poll_interval: Duration::from_millis(50),
        }
    }
}

/// Counters maintained across the run.
#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub ticks: u64,
    /// Deltas consumed from the geometry subscription.
    pub deltas_consumed: u64,
    pub entities_created: u64,
    pub entities_updated: u64,
    pub entities_destroyed: u64,
    /// Full teardowns performed (toggle-off or fatal).
    pub clears: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_budgets() {
        let config = RuntimeConfig::default();
        assert_eq!(config.exit_display_delay, Seconds::new(3.0));
        assert_eq!(config.localize.localization_timeout, Seconds::new(180.0));
        assert_eq!(config.localize.configure_cooldown, Seconds::new(3.0));
    }
}
