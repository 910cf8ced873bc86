use crate::config::env::{env, env_optional, Environment};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub debug: bool,
    /// Public URL the app is reachable at
    pub url: String,
    /// Prefix for resource URLs in API payloads (picture paths etc.)
    pub api_base_url: String,
}

impl AppConfig {
    /// Build config from environment variables
    ///
    /// `API_BASE_URL` falls back to `APP_URL`.
    pub fn from_env() -> Self {
        let url = env("APP_URL", "http://localhost:8080".to_string());
        Self {
            name: env("APP_NAME", "Talabat".to_string()),
            environment: Environment::detect(),
            debug: env("APP_DEBUG", true),
            api_base_url: env_optional("API_BASE_URL").unwrap_or_else(|| url.clone()),
            url,
        }
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for AppConfig; unset fields come from the environment
#[derive(Default)]
pub struct AppConfigBuilder {
    name: Option<String>,
    environment: Option<Environment>,
    debug: Option<bool>,
    url: Option<String>,
    api_base_url: Option<String>,
}

impl AppConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn build(self) -> AppConfig {
        let default = AppConfig::from_env();
        AppConfig {
            name: self.name.unwrap_or(default.name),
            environment: self.environment.unwrap_or(default.environment),
            debug: self.debug.unwrap_or(default.debug),
            url: self.url.unwrap_or(default.url),
            api_base_url: self.api_base_url.unwrap_or(default.api_base_url),
        }
    }
}
