mod app;
mod auth;
mod server;

pub use app::{AppConfig, AppConfigBuilder};
pub use auth::AuthConfig;
pub use server::{ServerConfig, ServerConfigBuilder};
