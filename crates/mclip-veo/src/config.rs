//! Veo client configuration.

use std::time::Duration;

use crate::error::{VeoError, VeoResult};

pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Veo client configuration.
#[derive(Debug, Clone)]
pub struct VeoConfig {
    /// Gemini API key
    pub api_key: String,
    /// Video model name
    pub model: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Fixed delay between status queries
    pub poll_interval: Duration,
    /// Overall deadline for one operation (None = wait until done)
    pub poll_timeout: Option<Duration>,
    pub aspect_ratio: String,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
}

impl VeoConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> VeoResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(VeoError::MissingApiKey)?;

        // Zero would query the API back to back.
        let poll_interval_secs: u64 = std::env::var("VEO_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let poll_timeout = std::env::var("VEO_POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            model: std::env::var("VEO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("VEO_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
            poll_timeout,
            aspect_ratio: std::env::var("VEO_ASPECT_RATIO")
                .unwrap_or_else(|_| DEFAULT_ASPECT_RATIO.to_string()),
            request_timeout: Duration::from_secs(120),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "GEMINI_API_KEY",
        "API_KEY",
        "VEO_MODEL",
        "VEO_BASE_URL",
        "VEO_POLL_INTERVAL_SECS",
        "VEO_POLL_TIMEOUT_SECS",
        "VEO_ASPECT_RATIO",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_missing_key() {
        clear_env();
        assert!(matches!(VeoConfig::from_env(), Err(VeoError::MissingApiKey)));

        std::env::set_var("GEMINI_API_KEY", "  ");
        assert!(matches!(VeoConfig::from_env(), Err(VeoError::MissingApiKey)));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_defaults_and_fallback_key() {
        clear_env();
        std::env::set_var("API_KEY", "fallback");
        let config = VeoConfig::from_env().unwrap();
        assert_eq!(config.api_key, "fallback");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.poll_timeout, None);
        assert_eq!(config.aspect_ratio, "16:9");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_poll_interval_uses_default() {
        clear_env();
        std::env::set_var("GEMINI_API_KEY", "k");
        std::env::set_var("VEO_POLL_INTERVAL_SECS", "0");
        let config = VeoConfig::from_env().unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("GEMINI_API_KEY", "k");
        std::env::set_var("API_KEY", "ignored");
        std::env::set_var("VEO_BASE_URL", "http://localhost:9000/v1beta/");
        std::env::set_var("VEO_POLL_INTERVAL_SECS", "2");
        std::env::set_var("VEO_POLL_TIMEOUT_SECS", "600");
        let config = VeoConfig::from_env().unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.base_url, "http://localhost:9000/v1beta");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.poll_timeout, Some(Duration::from_secs(600)));
        clear_env();
    }
}
