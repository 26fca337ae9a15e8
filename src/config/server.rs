//! Listener settings for the relay process.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use super::error::ValidationError;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_FILTER: &str = "info,collab_relay=debug,sqlx=warn";

/// Where the relay listens and how it reports.
///
/// Every field has a default, so the whole `server` section may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface address for the WebSocket and health endpoints.
    pub host: String,

    pub port: u16,

    pub environment: Environment,

    /// `EnvFilter` directive applied when `RUST_LOG` is not set.
    pub log_level: String,

    /// Comma-separated browser origins allowed to open sessions.
    /// Unset or blank means any origin.
    pub cors_origins: Option<String>,
}

/// Deployment tier. Production switches on JSON logs and the
/// stricter secret-length check.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// The listener address. `host` must be a literal IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(raw) = self.cors_origins.as_deref() else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listening_on(host: &str, port: u16) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn omitted_section_listens_on_all_interfaces() {
        let config = ServerConfig::default();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8000");
        assert_eq!(config.log_level, DEFAULT_LOG_FILTER);
        assert!(!config.is_production());
    }

    #[test]
    fn ipv6_loopback_is_accepted() {
        let addr = listening_on("::1", 9001).socket_addr().unwrap();

        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 9001);
    }

    #[test]
    fn hostname_is_rejected_as_bind_address() {
        assert_eq!(
            listening_on("relay.internal", 8000).validate(),
            Err(ValidationError::InvalidBindAddress("relay.internal".to_string()))
        );
    }

    #[test]
    fn port_zero_is_rejected() {
        assert_eq!(
            listening_on("127.0.0.1", 0).validate(),
            Err(ValidationError::InvalidPort)
        );
    }

    #[test]
    fn production_tier_is_detected() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..ServerConfig::default()
        };

        assert!(config.is_production());
    }

    #[test]
    fn editor_origins_are_split_and_blanks_dropped() {
        let config = ServerConfig {
            cors_origins: Some(" https://editor.example.com,,http://localhost:5173 ".to_string()),
            ..ServerConfig::default()
        };

        assert_eq!(
            config.cors_origins_list(),
            vec!["https://editor.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn unset_origins_mean_no_allow_list() {
        let config = ServerConfig {
            cors_origins: Some("  ".to_string()),
            ..ServerConfig::default()
        };

        assert!(config.cors_origins_list().is_empty());
        assert!(ServerConfig::default().cors_origins_list().is_empty());
    }
}
