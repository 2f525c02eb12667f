use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use thiserror::Error;

use crate::consts::{DEFAULT_LISTEN_ADDRESS, DEFAULT_UPSTREAM_ENDPOINT, UPSTREAM_TIMEOUT_SECS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Process-wide gateway settings, constructed once at startup and shared
/// read-only with every handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_upstream_endpoint")]
    pub upstream_endpoint: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    /// Server-side OpenAI key. Never read from the config file; it comes
    /// from the OPENAI_API_KEY environment variable or stays unset.
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

fn default_listen_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

fn default_upstream_endpoint() -> String {
    DEFAULT_UPSTREAM_ENDPOINT.to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    UPSTREAM_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            listen_address: default_listen_address(),
            upstream_endpoint: default_upstream_endpoint(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            openai_api_key: None,
        }
    }
}

impl GatewayConfig {
    /// Build the config: serde defaults, overlaid from the YAML file when a
    /// path is given, then from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                log::info!("loaded gateway config from {}", path.display());
                serde_yaml::from_str(&contents)?
            }
            None => GatewayConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = env::var("BIND_ADDRESS") {
            self.listen_address = addr;
        }
        if let Ok(endpoint) = env::var("OPENAI_CHAT_ENDPOINT") {
            self.upstream_endpoint = endpoint;
        }
        self.openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("BIND_ADDRESS");
        env::remove_var("OPENAI_CHAT_ENDPOINT");
        env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = GatewayConfig::load(None).unwrap();
        assert_eq!(config.listen_address, "0.0.0.0:8080");
        assert_eq!(
            config.upstream_endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(config.upstream_timeout(), Duration::from_secs(60));
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    #[serial]
    fn test_partial_yaml_keeps_defaults() {
        clear_env();
        let config: GatewayConfig = serde_yaml::from_str("listen_address: 127.0.0.1:9091").unwrap();
        assert_eq!(config.listen_address, "127.0.0.1:9091");
        assert_eq!(
            config.upstream_endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(config.upstream_timeout_secs, 60);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("BIND_ADDRESS", "127.0.0.1:3000");
        env::set_var("OPENAI_CHAT_ENDPOINT", "http://localhost:12001/v1/chat/completions");
        env::set_var("OPENAI_API_KEY", "sk-test");

        let config = GatewayConfig::load(None).unwrap();
        assert_eq!(config.listen_address, "127.0.0.1:3000");
        assert_eq!(
            config.upstream_endpoint,
            "http://localhost:12001/v1/chat/completions"
        );
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_api_key_treated_as_unset() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "");
        let config = GatewayConfig::load(None).unwrap();
        assert_eq!(config.openai_api_key, None);
        clear_env();
    }
}
