use crate::config::env::env_list;

/// Bearer tokens accepted by the authorization stage
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// From `API_TOKENS`, comma-separated
    pub tokens: Vec<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            tokens: env_list("API_TOKENS"),
        }
    }

    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}
