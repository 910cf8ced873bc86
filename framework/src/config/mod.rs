//! Configuration
//!
//! Layered `.env` loading with environment-based precedence and typed config
//! structs. The loaded [`Config`] is a plain value handed to the composition
//! root; nothing is stored globally.
//!
//! # Example
//!
//! ```rust,no_run
//! use kit::Config;
//!
//! let config = Config::init(std::path::Path::new(".")).expect("valid configuration");
//! println!("Server port: {}", config.server.port);
//! ```

pub mod env;
pub mod providers;

pub use env::{env, env_list, env_optional, load_dotenv, Environment};
pub use providers::{AppConfig, AppConfigBuilder, AuthConfig, ServerConfig, ServerConfigBuilder};

use crate::database::DatabaseConfig;
use crate::error::FrameworkError;
use std::path::Path;

/// Everything the application reads from its environment
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load `.env` files from `project_root`, then read the environment
    pub fn init(project_root: &Path) -> Result<Self, FrameworkError> {
        load_dotenv(project_root);
        Self::from_env()
    }

    /// Fails on a value that cannot mean what the operator intended,
    /// such as an unknown `DB_MIGRATION_POLICY`
    pub fn from_env() -> Result<Self, FrameworkError> {
        Ok(Self {
            app: AppConfig::from_env(),
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            database: DatabaseConfig::try_from_env()?,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.app.environment
    }

    pub fn is_development(&self) -> bool {
        self.app.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.app.is_production()
    }
}
