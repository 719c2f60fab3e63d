//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `RIDES_DATABASE_PATH`: SQLite file (default: `:memory:`)
//! - `SERVICE_PORT`: HTTP port (default: `8010`)

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Database path used when `RIDES_DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = ":memory:";

/// Port used when `SERVICE_PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 8010;

/// Runtime configuration for the rides service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database path; `:memory:` keeps rides for the process lifetime only.
    pub database_path: PathBuf,
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("RIDES_DATABASE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let port = lookup("SERVICE_PORT")
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_path,
            port,
        }
    }

    /// Address to bind on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == DEFAULT_DATABASE_PATH
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServiceConfig::default());
        assert!(config.is_in_memory());
        assert_eq!(config.bind_addr().port(), 8010);
    }

    #[test]
    fn test_reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("RIDES_DATABASE_PATH", "/var/lib/rides/rides.db"),
            ("SERVICE_PORT", "9000"),
        ]));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/rides/rides.db"));
        assert_eq!(config.port, 9000);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[("SERVICE_PORT", "http")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_blank_database_path_falls_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[("RIDES_DATABASE_PATH", "  ")]));
        assert!(config.is_in_memory());
    }
}
