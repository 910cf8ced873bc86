//! Startup migration and seeding
//!
//! Before the server accepts traffic the schema is brought up to date and
//! reference data is seeded. What a failure does is decided by
//! [`MigrationPolicy`]: by default it is logged and startup carries on.

use super::connection::DbConnection;
use super::context::StoreContext;
use crate::error::FrameworkError;
use async_trait::async_trait;
use sea_orm_migration::MigratorTrait;
use std::str::FromStr;

/// Seeds reference data into an up-to-date schema
///
/// Implementations should be idempotent; they run on every startup.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn seed(&self, store: &StoreContext) -> Result<(), FrameworkError>;
}

/// Reaction to a failed startup migration or seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationPolicy {
    /// Log the failure and keep starting
    #[default]
    LogAndContinue,
    /// Abort startup with the error
    FailFast,
}

impl FromStr for MigrationPolicy {
    type Err = FrameworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "log-and-continue" | "log" | "continue" => Ok(Self::LogAndContinue),
            "fail-fast" | "fail" | "abort" => Ok(Self::FailFast),
            other => Err(FrameworkError::config(format!(
                "unknown migration policy '{}'",
                other
            ))),
        }
    }
}

/// What happened to the schema during startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupReport {
    /// Bootstrapping was turned off (`serve --no-migrate`)
    Skipped,
    /// Migrations applied and seed data in place
    Ready,
    /// A step failed and the failure was logged
    Degraded { error: String },
}

impl StartupReport {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Apply pending migrations, then seed, inside a dedicated context
pub async fn update_database<M: MigratorTrait>(
    connection: &DbConnection,
    seeder: Option<&dyn Seeder>,
) -> Result<(), FrameworkError> {
    M::up(connection.inner(), None).await?;
    tracing::info!("migrations applied");

    if let Some(seeder) = seeder {
        let store = StoreContext::new(connection.clone());
        seeder.seed(&store).await?;
        tracing::info!("seed data in place");
    }

    Ok(())
}

/// Run [`update_database`] under `policy`
pub async fn bootstrap_database<M: MigratorTrait>(
    connection: &DbConnection,
    seeder: Option<&dyn Seeder>,
    policy: MigrationPolicy,
) -> Result<StartupReport, FrameworkError> {
    match update_database::<M>(connection, seeder).await {
        Ok(()) => Ok(StartupReport::Ready),
        Err(e) => match policy {
            MigrationPolicy::LogAndContinue => {
                tracing::error!(error = %e, "an error occurred while applying migrations");
                Ok(StartupReport::Degraded {
                    error: e.to_string(),
                })
            }
            MigrationPolicy::FailFast => Err(e),
        },
    }
}
