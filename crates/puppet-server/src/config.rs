//! Server settings read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub public_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub shared_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            public_dir: PathBuf::from("public"),
            assets_dir: PathBuf::from("assets"),
            shared_dir: PathBuf::from("shared"),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `OPENAI_API_KEY`, `OPENAI_MODEL`,
    /// `OPENAI_BASE_URL`, `PUBLIC_DIR`, `ASSETS_DIR` and `SHARED_DIR`.
    /// Unset or malformed values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("HOST") {
            match host.parse() {
                Ok(host) => config.host = host,
                Err(e) => tracing::warn!("[server] ignoring HOST={host}: {e}"),
            }
        }
        if let Some(port) = non_empty("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(e) => tracing::warn!("[server] ignoring PORT={port}: {e}"),
            }
        }
        config.openai_api_key = non_empty("OPENAI_API_KEY");
        if let Some(model) = non_empty("OPENAI_MODEL") {
            config.openai_model = model;
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            config.openai_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = non_empty("PUBLIC_DIR") {
            config.public_dir = dir.into();
        }
        if let Some(dir) = non_empty("ASSETS_DIR") {
            config.assets_dir = dir.into();
        }
        if let Some(dir) = non_empty("SHARED_DIR") {
            config.shared_dir = dir.into();
        }
        config
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.addr().to_string(), "0.0.0.0:3333");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
            ("ASSETS_DIR", "/srv/assets"),
        ]));
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_base_url, "http://localhost:9000/v1");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/assets"));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "not-a-port"),
            ("OPENAI_API_KEY", "   "),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.openai_api_key.is_none());
    }
}
