/// Coordination store configuration loaded from environment variables.
///
/// Defaults are suitable for local development; override via environment
/// variables in production.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store connection URL (default: `redis://127.0.0.1:6379`).
    pub url: String,
    /// Timeout for establishing the initial connection, in seconds
    /// (default: `5`).
    pub connect_timeout_secs: u64,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                   |
    /// |-----------------------------|---------------------------|
    /// | `STORE_URL`                 | `redis://127.0.0.1:6379`  |
    /// | `STORE_CONNECT_TIMEOUT_SECS`| `5`                       |
    pub fn from_env() -> Self {
        let url =
            std::env::var("STORE_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let connect_timeout_secs: u64 = std::env::var("STORE_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("STORE_CONNECT_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            connect_timeout_secs,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connect_timeout_secs: 5,
        }
    }
}
