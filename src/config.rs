use crate::charts::{DEFAULT_SHARES_BINS, MAX_SHARES_BINS};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Source file read when nothing else is configured
pub const DEFAULT_DATA_PATH: &str = "saham.txt";

/// Bind address of the API server when nothing else is configured
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub server_addr: String,
    pub shares_bins: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            shares_bins: DEFAULT_SHARES_BINS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let shares_bins = match lookup("BEI_SHARES_BINS") {
            Some(raw) => {
                let bins: usize = raw
                    .trim()
                    .parse()
                    .context("BEI_SHARES_BINS must be a positive number")?;
                anyhow::ensure!(bins > 0, "BEI_SHARES_BINS must be a positive number");
                anyhow::ensure!(
                    bins <= MAX_SHARES_BINS,
                    "BEI_SHARES_BINS must be at most {}",
                    MAX_SHARES_BINS
                );
                bins
            }
            None => defaults.shares_bins,
        };

        Ok(Self {
            data_path: lookup("BEI_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            server_addr: lookup("BEI_SERVER_ADDR").unwrap_or(defaults.server_addr),
            shares_bins,
        })
    }

    /// Command-line flags take precedence over the environment
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, server_addr: Option<String>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(addr) = server_addr {
            self.server_addr = addr;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.data_path, PathBuf::from("saham.txt"));
        assert_eq!(config.shares_bins, 50);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("BEI_DATA_PATH", "/data/listings.tsv"),
            ("BEI_SERVER_ADDR", "127.0.0.1:8080"),
            ("BEI_SHARES_BINS", "20"),
        ]))
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/data/listings.tsv"));
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.shares_bins, 20);
    }

    #[test]
    fn test_invalid_bins_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("BEI_SHARES_BINS", "lots")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BEI_SHARES_BINS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BEI_SHARES_BINS", "1001")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BEI_SHARES_BINS", "1000")])).is_ok());
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default().with_overrides(Some(PathBuf::from("other.txt")), None);

        assert_eq!(config.data_path, PathBuf::from("other.txt"));
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
    }
}
