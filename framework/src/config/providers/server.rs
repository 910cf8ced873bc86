use crate::config::env::{env, env_optional};
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// Port 0 binds an ephemeral port
    pub port: u16,
    /// Maximum request body size in bytes (default: 10MB)
    pub max_body_size: usize,
    /// Public HTTPS port used for redirects; unset disables redirecting
    pub https_port: Option<u16>,
    /// Web root for static files
    pub static_root: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env("SERVER_HOST", "127.0.0.1".to_string()),
            port: env("SERVER_PORT", 8080),
            max_body_size: env("SERVER_MAX_BODY_SIZE", 10 * 1024 * 1024),
            https_port: env_optional("HTTPS_PORT"),
            static_root: PathBuf::from(env("STATIC_ROOT", "wwwroot".to_string())),
        }
    }

    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for ServerConfig; unset fields come from the environment
#[derive(Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    max_body_size: Option<usize>,
    https_port: Option<Option<u16>>,
    static_root: Option<PathBuf>,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    pub fn https_port(mut self, port: Option<u16>) -> Self {
        self.https_port = Some(port);
        self
    }

    pub fn static_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.static_root = Some(root.into());
        self
    }

    pub fn build(self) -> ServerConfig {
        let default = ServerConfig::from_env();
        ServerConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            max_body_size: self.max_body_size.unwrap_or(default.max_body_size),
            https_port: self.https_port.unwrap_or(default.https_port),
            static_root: self.static_root.unwrap_or(default.static_root),
        }
    }
}
