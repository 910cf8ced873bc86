//! Database connection management

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::{DatabaseConfig, DatabaseType};
use crate::error::FrameworkError;

/// Wrapper around SeaORM's DatabaseConnection
///
/// A clonable handle onto the shared pool. Every `StoreContext` borrows its
/// connection from here.
#[derive(Clone, Debug)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Create a connection pool from config
    ///
    /// SQLite files (and their parent directory) are created if missing.
    /// In-memory SQLite is pinned to one eagerly opened connection, otherwise
    /// each pooled connection would see its own empty database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let url = match config.database_type() {
            Some(DatabaseType::Sqlite) if !config.is_in_memory() => {
                prepare_sqlite_file(&config.url)?
            }
            _ => config.url.clone(),
        };

        let mut opt = ConnectOptions::new(url);
        opt.connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);

        if config.is_in_memory() {
            opt.max_connections(1).min_connections(1).connect_lazy(false);
        } else {
            opt.max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect_lazy(config.lazy);
        }

        let conn = Database::connect(opt).await?;
        tracing::debug!(backend = ?config.database_type(), lazy = config.lazy, "database pool ready");

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    /// Wrap an existing SeaORM connection
    pub fn from_inner(conn: DatabaseConnection) -> Self {
        Self {
            inner: Arc::new(conn),
        }
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Round-trip to the server; fails when the store is unreachable
    pub async fn ping(&self) -> Result<(), FrameworkError> {
        self.inner.ping().await?;
        Ok(())
    }
}

/// Make sure the SQLite file exists and rewrite the URL into create mode
fn prepare_sqlite_file(url: &str) -> Result<String, FrameworkError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(format!("sqlite:{}?mode=rwc", path))
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
