//! Process-wide tracing subscriber
//!
//! Filtering follows `RUST_LOG` (default `info,sqlx=warn`). Set
//! `LOG_FORMAT=json` for one JSON object per line.

use crate::config::env::env_optional;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install the global subscriber
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = env_optional::<String>("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
