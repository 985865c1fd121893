use std::time::Duration;

use autolab_client::poller::DEFAULT_POLL_INTERVAL;

/// Default runner origin for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Panel configuration loaded from environment variables.
///
/// All fields have defaults suitable for a runner on the same host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Runner origin; the `/api/v1` prefix is added by the client.
    pub api_url: String,
    /// Delay between poll cycles.
    pub poll_interval: Duration,
    /// Echo console log lines to stdout as they are appended.
    pub echo_console: bool,
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            echo_console: true,
        }
    }
}

impl PanelConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var            | Default                 |
    /// |--------------------|-------------------------|
    /// | `AUTOLAB_API_URL`  | `http://localhost:8000` |
    /// | `POLL_INTERVAL_MS` | `5000`                  |
    /// | `ECHO_CONSOLE`     | `true`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("AUTOLAB_API_URL") {
            let url = url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "AUTOLAB_API_URL",
                    expected: "an http:// or https:// URL",
                    value: url,
                });
            }
            config.api_url = url;
        }

        if let Some(raw) = lookup("POLL_INTERVAL_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "POLL_INTERVAL_MS",
                    expected: "a positive integer",
                    value: raw.clone(),
                })?;
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("ECHO_CONSOLE") {
            config.echo_console = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "ECHO_CONSOLE",
                        expected: "a boolean",
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }
}
