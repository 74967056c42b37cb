use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::services::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL};

pub const DEFAULT_PORT: u16 = 7003;
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub covers_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog: CatalogConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                covers_url: DEFAULT_COVERS_URL.to_string(),
                timeout: DEFAULT_TIMEOUT,
            },
            cache: CacheConfig {
                ttl: DEFAULT_TTL,
                max_entries: DEFAULT_MAX_ENTRIES,
            },
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            port: parse_var(&lookup, "PORT", defaults.port)?,
            catalog: CatalogConfig {
                base_url: lookup("OPENLIBRARY_BASE_URL").unwrap_or(defaults.catalog.base_url),
                covers_url: lookup("OPENLIBRARY_COVERS_URL")
                    .unwrap_or(defaults.catalog.covers_url),
                timeout: Duration::from_secs(parse_var(
                    &lookup,
                    "HTTP_TIMEOUT_SECS",
                    defaults.catalog.timeout.as_secs(),
                )?),
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(parse_var(
                    &lookup,
                    "CACHE_TTL_SECS",
                    defaults.cache.ttl.as_secs(),
                )?),
                max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES", defaults.cache.max_entries)?,
            },
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 7003);
        assert_eq!(config.catalog.base_url, "https://openlibrary.org");
        assert_eq!(config.catalog.timeout, Duration::from_secs(15));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8000"),
            ("CACHE_TTL_SECS", "5"),
            ("OPENLIBRARY_BASE_URL", "http://localhost:9999"),
        ])
        .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.cache.ttl, Duration::from_secs(5));
        assert_eq!(config.catalog.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_invalid_value() {
        let err = config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.to_string(), "HTTP_TIMEOUT_SECS has invalid value 'soon'");
    }
}
