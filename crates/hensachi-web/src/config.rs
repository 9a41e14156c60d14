//! Configuration loading for hensachi-web.
//! Reads hensachi.toml from the current directory or the path in the
//! HENSACHI_CONFIG env var. A missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 8000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string(), "http://127.0.0.1:3000".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_origins() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON seed applied at startup.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "info,tower_http=debug".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

impl Config {
    /// Load configuration from hensachi.toml.
    /// Checks HENSACHI_CONFIG env var first, then current directory; a `.env`
    /// file is read beforehand if present.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let path = std::env::var("HENSACHI_CONFIG")
            .unwrap_or_else(|_| "hensachi.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_toml_str(&std::fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };

        if let Ok(extra) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.cors.extend_origins(&extra);
        }
        if let Ok(seed) = std::env::var("HENSACHI_SEED") {
            config.data.seed_path = Some(seed);
        }
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

impl CorsConfig {
    /// Append comma-separated origins, skipping blanks and duplicates.
    pub fn extend_origins(&mut self, raw: &str) {
        for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            if !self.allowed_origins.iter().any(|o| o == origin) {
                self.allowed_origins.push(origin.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert!(config.data.seed_path.is_none());
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9100

            [data]
            seed_path = "data/seed.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.data.seed_path.as_deref(), Some("data/seed.json"));
        assert_eq!(config.logging.filter, default_filter());
    }

    #[test]
    fn test_extend_origins() {
        let mut cors = CorsConfig::default();
        cors.extend_origins(" https://hensachi.example , ,http://localhost:3000");
        assert_eq!(cors.allowed_origins.len(), 3);
        assert_eq!(cors.allowed_origins[2], "https://hensachi.example");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("[server]\nport = \"nope\"").is_err());
    }
}
