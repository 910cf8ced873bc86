use std::path::Path;

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect() -> Self {
        match std::env::var("APP_ENV") {
            Ok(name) => Self::from_name(&name),
            Err(_) => Self::Local,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" => Self::Staging,
            "development" | "dev" => Self::Development,
            "testing" | "test" => Self::Testing,
            "local" | "" => Self::Local,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Suffix of the environment-specific `.env` files
    pub fn env_file_suffix(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Custom(name) => name.as_str(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Local and development both count as development
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.env_file_suffix())
    }
}

/// Load environment variables from .env files with proper precedence
///
/// Precedence (later files override earlier):
/// 1. .env (base defaults)
/// 2. .env.local (local overrides, not committed)
/// 3. .env.{environment} (environment-specific)
/// 4. .env.{environment}.local (environment-specific local overrides)
/// 5. Actual system environment variables (highest priority)
pub fn load_dotenv(project_root: &Path) -> Environment {
    // APP_ENV may itself only be set in .env.local or .env
    let env = match std::env::var("APP_ENV") {
        Ok(name) => Environment::from_name(&name),
        Err(_) => file_environment(project_root).unwrap_or(Environment::Local),
    };
    let suffix = env.env_file_suffix().to_string();

    // dotenvy never overwrites a variable that is already set, so the most
    // specific file goes first
    let files = [
        format!(".env.{}.local", suffix),
        format!(".env.{}", suffix),
        ".env.local".to_string(),
        ".env".to_string(),
    ];
    for file in files {
        let _ = dotenvy::from_path(project_root.join(file));
    }

    Environment::detect()
}

/// `APP_ENV` as declared by `.env.local`, else `.env`, without loading either
fn file_environment(project_root: &Path) -> Option<Environment> {
    [".env.local", ".env"].iter().find_map(|file| {
        dotenvy::from_path_iter(project_root.join(file))
            .ok()?
            .filter_map(Result::ok)
            .find(|(key, _)| key == "APP_ENV")
            .map(|(_, value)| Environment::from_name(&value))
    })
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use kit::config::env;
///
/// let port: u16 = env("SERVER_PORT", 8080);
/// let host = env("SERVER_HOST", "127.0.0.1".to_string());
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable; unset, empty or unparsable is `None`
///
/// # Example
/// ```
/// use kit::config::env_optional;
///
/// let https_port: Option<u16> = env_optional("HTTPS_PORT");
/// ```
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

/// Comma-separated list variable, blanks dropped
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
