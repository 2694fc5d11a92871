//! Application configuration loaded from environment variables
//!
//! A `.env` file is read first (if present) via dotenvy.

use std::net::SocketAddr;
use std::time::Duration;

use crate::pricing::PricingPolicy;

/// Longest quote lifetime the cache accepts (moka caps `time_to_live` at 1000 years)
pub const MAX_QUOTE_TTL_SECS: u64 = 1000 * 365 * 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Cents each pricing step is rounded to (1 = nearest cent)
    pub rounding_increment: i64,
    pub quote_ttl: Duration,
    pub quote_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rounding_increment: 1,
            quote_ttl: Duration::from_secs(24 * 60 * 60),
            quote_cache_capacity: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let rounding_increment = parse_or(
            &lookup,
            "PRICING_ROUNDING_INCREMENT",
            defaults.rounding_increment,
        )?;
        if rounding_increment <= 0 {
            return Err(ConfigError::Invalid {
                key: "PRICING_ROUNDING_INCREMENT",
                value: rounding_increment.to_string(),
            });
        }

        let quote_ttl_secs = parse_or(&lookup, "QUOTE_TTL_SECS", defaults.quote_ttl.as_secs())?;
        if quote_ttl_secs == 0 || quote_ttl_secs > MAX_QUOTE_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "QUOTE_TTL_SECS",
                value: quote_ttl_secs.to_string(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rounding_increment,
            quote_ttl: Duration::from_secs(quote_ttl_secs),
            quote_cache_capacity: parse_or(
                &lookup,
                "QUOTE_CACHE_CAPACITY",
                defaults.quote_cache_capacity,
            )?,
        })
    }

    /// Socket address to bind the HTTP server to
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: self.host.clone(),
            })
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            rounding_increment: self.rounding_increment,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
