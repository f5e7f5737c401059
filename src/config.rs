//! Runtime configuration, read from the environment.
//!
//! - `ROSTER_STATE_FILE`: JSON file holding the roster (default: `roster.json`)
//! - `ROSTER_HOST`: address the web server binds to (default: `0.0.0.0`)
//! - `ROSTER_PORT`: web server port (default: 8080)
//! - `ROSTER_LOG`: log filter directive (default: `info`)
//!
//! A `.env` file in the working directory is loaded first if present.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, RosterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub state_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("roster.json"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and builds the configuration from the environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, defaults filling the gaps
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("ROSTER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| RosterError::Config(format!("Invalid ROSTER_PORT value: {}", raw)))?,
            None => defaults.port,
        };

        Ok(Self {
            state_file: lookup("ROSTER_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            host: lookup("ROSTER_HOST").unwrap_or(defaults.host),
            port,
            log_filter: lookup("ROSTER_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("ROSTER_STATE_FILE", "/tmp/r.json"),
            ("ROSTER_PORT", "9000"),
            ("ROSTER_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.state_file, PathBuf::from("/tmp/r.json"));
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("ROSTER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
    }
}
