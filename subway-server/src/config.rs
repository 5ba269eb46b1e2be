//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Everything `main` needs to build the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Key for the real-time and full-schedule providers. Empty if unset;
    /// calls then fail and are reported as no data.
    pub seoul_api_key: String,
    /// Key for the limited-schedule provider. Its lines report "not
    /// configured" without one.
    pub kric_api_key: Option<String>,
    pub bind_addr: SocketAddr,
    /// Alternative topology dataset, replacing the embedded one.
    pub network_data: Option<PathBuf>,
}

impl ServerConfig {
    /// Read `SEOUL_API_KEY`, `KRIC_API_KEY`, `BIND_ADDR` and `NETWORK_DATA`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let seoul_api_key = get("SEOUL_API_KEY").unwrap_or_else(|| {
            warn!("SEOUL_API_KEY not set; real-time and timetable calls will fail");
            String::new()
        });

        let kric_api_key = get("KRIC_API_KEY");
        if kric_api_key.is_none() {
            warn!("KRIC_API_KEY not set; 1호선 and 2호선 timetables unavailable");
        }

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                value,
            })?,
            None => default_bind_addr(),
        };

        Ok(Self {
            seoul_api_key,
            kric_api_key,
            bind_addr,
            network_data: get("NETWORK_DATA").map(PathBuf::from),
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.seoul_api_key, "");
        assert_eq!(config.kric_api_key, None);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.network_data, None);
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("SEOUL_API_KEY", " seoul "),
            ("KRIC_API_KEY", "kric"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("NETWORK_DATA", "/tmp/network.json"),
        ])
        .unwrap();

        assert_eq!(config.seoul_api_key, "seoul");
        assert_eq!(config.kric_api_key.as_deref(), Some("kric"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.network_data, Some(PathBuf::from("/tmp/network.json")));
    }

    #[test]
    fn blank_key_is_unset() {
        let config = config(&[("KRIC_API_KEY", "  ")]).unwrap();
        assert_eq!(config.kric_api_key, None);
    }

    #[test]
    fn invalid_bind_addr() {
        let err = config(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid BIND_ADDR: localhost");
    }
}
