use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream site
    pub base_url: String,
    pub sfw_base_url: String,
    pub user_agent: String,

    // Cache
    pub short_ttl: Duration,
    pub long_ttl: Duration,
    pub max_cache_entry_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default("FA_BASE_URL", "https://www.furaffinity.net"),
            sfw_base_url: env_or_default("FA_SFW_BASE_URL", "https://sfw.furaffinity.net"),
            user_agent: env_or_default("FA_USER_AGENT", DEFAULT_USER_AGENT),
            short_ttl: Duration::from_secs(parse_env_u64("FA_SHORT_TTL_SECS", 30)?),
            long_ttl: Duration::from_secs(parse_env_u64("FA_LONG_TTL_SECS", 600)?),
            max_cache_entry_bytes: parse_env_usize("FA_MAX_CACHE_ENTRY_BYTES", 1_048_576)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("FA_BASE_URL", &self.base_url),
            ("FA_SFW_BASE_URL", &self.sfw_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "must be an absolute http(s) URL".to_string(),
                });
            }
            if value.ends_with('/') {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "must not end with a trailing slash".to_string(),
                });
            }
        }
        if self.short_ttl > self.long_ttl {
            return Err(ConfigError::InvalidValue {
                name: "FA_SHORT_TTL_SECS".to_string(),
                message: "short TTL must not exceed long TTL".to_string(),
            });
        }
        if self.max_cache_entry_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "FA_MAX_CACHE_ENTRY_BYTES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// A configuration suitable for tests: fixed values, no env reads.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_url: "https://www.furaffinity.net".to_string(),
            sfw_base_url: "https://sfw.furaffinity.net".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            short_ttl: Duration::from_secs(30),
            long_ttl: Duration::from_secs(600),
            max_cache_entry_bytes: 1_048_576,
        }
    }
}

const DEFAULT_USER_AGENT: &str = concat!("fa-export/", env!("CARGO_PKG_VERSION"));

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::for_testing();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_base_url_rejected() {
        let config = Config {
            base_url: "www.furaffinity.net".to_string(),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_ordering_enforced() {
        let config = Config {
            short_ttl: Duration::from_secs(900),
            long_ttl: Duration::from_secs(60),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_entry_cap_rejected() {
        let config = Config {
            max_cache_entry_bytes: 0,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }
}
