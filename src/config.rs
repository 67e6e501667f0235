//! Runtime Configuration
//!
//! Read once at startup from `DOKU_*` environment variables. Unset variables
//! take their defaults; set but malformed ones are an error.

use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::rng::ShuffleStrategy;
use crate::game::session::SessionConfig;
use crate::puzzle::GeneratorConfig;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Value could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
    /// Value parsed but is outside the allowed range.
    #[error("{name} must be at least {min}")]
    TooSmall {
        /// Variable name
        name: &'static str,
        /// Smallest allowed value
        min: u64,
    },
}

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Puzzle search tuning
    pub generator: GeneratorConfig,
    /// Guess handling
    pub session: SessionConfig,
    /// Minimum spacing between remote oracle calls
    pub rate_limit: Duration,
    /// Fixed puzzle date instead of today (UTC)
    pub date: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            session: SessionConfig::default(),
            rate_limit: Duration::from_millis(100),
            date: None,
        }
    }
}

impl AppConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("DOKU_MAX_ATTEMPTS") {
            let attempts = parse_u64("DOKU_MAX_ATTEMPTS", &value)?;
            if attempts == 0 {
                return Err(ConfigError::TooSmall { name: "DOKU_MAX_ATTEMPTS", min: 1 });
            }
            config.generator.max_attempts = u32::try_from(attempts).map_err(|_| ConfigError::Invalid {
                name: "DOKU_MAX_ATTEMPTS",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("DOKU_CHECK_TIMEOUT_MS") {
            let ms = parse_u64("DOKU_CHECK_TIMEOUT_MS", &value)?;
            if ms == 0 {
                return Err(ConfigError::TooSmall { name: "DOKU_CHECK_TIMEOUT_MS", min: 1 });
            }
            config.generator.check_timeout = Duration::from_millis(ms);
            config.session.match_timeout = Duration::from_millis(ms);
        }

        if let Some(value) = lookup("DOKU_SHUFFLE") {
            config.generator.shuffle = ShuffleStrategy::parse(&value).ok_or(ConfigError::Invalid {
                name: "DOKU_SHUFFLE",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("DOKU_ALLOW_BYPASS") {
            config.session.allow_bypass_tokens = parse_bool("DOKU_ALLOW_BYPASS", &value)?;
        }

        if let Some(value) = lookup("DOKU_RATE_LIMIT_MS") {
            config.rate_limit = Duration::from_millis(parse_u64("DOKU_RATE_LIMIT_MS", &value)?);
        }

        if let Some(value) = lookup("DOKU_DATE") {
            let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::Invalid {
                name: "DOKU_DATE",
                value: value.clone(),
            })?;
            config.date = Some(date);
        }

        Ok(config)
    }
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.generator.max_attempts, crate::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.generator.shuffle, ShuffleStrategy::Xorshift);
        assert!(!config.session.allow_bypass_tokens);
        assert_eq!(config.rate_limit, Duration::from_millis(100));
        assert_eq!(config.date, None);
    }

    #[test]
    fn test_overrides() {
        let bad = config(&[
            ("DOKU_MAX_ATTEMPTS", "12"),
            ("DOKU_CHECK_TIMEOUT_MS", "250"),
            ("DOKU_SHUFFLE", "Sine"),
            ("DOKU_ALLOW_BYPASS", "1"),
            ("DOKU_RATE_LIMIT_MS", "0"),
            ("DOKU_DATE", "2026-02-29"),
        ]);
        // 2026 is not a leap year.
        assert_eq!(
            bad.unwrap_err(),
            ConfigError::Invalid { name: "DOKU_DATE", value: "2026-02-29".into() }
        );

        let config = config(&[
            ("DOKU_MAX_ATTEMPTS", "12"),
            ("DOKU_CHECK_TIMEOUT_MS", "250"),
            ("DOKU_SHUFFLE", "Sine"),
            ("DOKU_ALLOW_BYPASS", "1"),
            ("DOKU_RATE_LIMIT_MS", "0"),
            ("DOKU_DATE", "2024-02-29"),
        ])
        .unwrap();
        assert_eq!(config.generator.max_attempts, 12);
        assert_eq!(config.generator.check_timeout, Duration::from_millis(250));
        assert_eq!(config.session.match_timeout, Duration::from_millis(250));
        assert_eq!(config.generator.shuffle, ShuffleStrategy::Sine);
        assert!(config.session.allow_bypass_tokens);
        assert_eq!(config.rate_limit, Duration::ZERO);
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config(&[("DOKU_MAX_ATTEMPTS", "lots")]),
            Err(ConfigError::Invalid { name: "DOKU_MAX_ATTEMPTS", .. })
        ));
        assert_eq!(
            config(&[("DOKU_MAX_ATTEMPTS", "0")]).unwrap_err(),
            ConfigError::TooSmall { name: "DOKU_MAX_ATTEMPTS", min: 1 }
        );
        assert!(config(&[("DOKU_SHUFFLE", "mersenne")]).is_err());
        assert!(config(&[("DOKU_ALLOW_BYPASS", "maybe")]).is_err());
    }
}
