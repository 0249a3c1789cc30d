/// Default retention window, in whole minutes.
const DEFAULT_RETENTION_MINUTES: u32 = 5;

/// Event fanout configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FanoutConfig {
    /// How many trailing whole minutes of events a reader reconstructs,
    /// and how long a bucket lives after its first write
    /// (default: `5`). Must be at least 1.
    pub retention_minutes: u32,
}

impl FanoutConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `SYNC_EVENT_RETENTION_MINUTES` | `5`     |
    pub fn from_env() -> Self {
        let retention_minutes: u32 = std::env::var("SYNC_EVENT_RETENTION_MINUTES")
            .unwrap_or_else(|_| DEFAULT_RETENTION_MINUTES.to_string())
            .parse()
            .expect("SYNC_EVENT_RETENTION_MINUTES must be a valid u32");
        assert!(
            retention_minutes >= 1,
            "SYNC_EVENT_RETENTION_MINUTES must be at least 1"
        );

        Self { retention_minutes }
    }

    /// A config with an explicit retention window.
    pub fn with_retention_minutes(retention_minutes: u32) -> Self {
        Self { retention_minutes }
    }
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            retention_minutes: DEFAULT_RETENTION_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retention_is_five_minutes() {
        assert_eq!(FanoutConfig::default().retention_minutes, 5);
    }
}
