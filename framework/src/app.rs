//! Application runner
//!
//! Parses the command line, loads configuration, connects to the database,
//! brings the schema up to date and hands everything to the composition
//! function that builds the request pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::Application;
//!
//! #[tokio::main]
//! async fn main() {
//!     Application::new()
//!         .migrations::<migrations::Migrator>()
//!         .seeder(StoreContextSeed)
//!         .compose(bootstrap::compose)
//!         .run()
//!         .await;
//! }
//! ```

use crate::config::Config;
use crate::database::{
    bootstrap_database, DbConnection, Seeder, StartupReport, StoreContext,
};
use crate::error::FrameworkError;
use crate::middleware::Pipeline;
use crate::routing::Router;
use crate::server::{BoundServer, Server};
use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "talabat")]
#[command(about = "Talabat API server and database utilities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip migrations and seeding on startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Run pending database migrations
    Migrate,
    /// Show migration status
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Rollback the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        /// Number of migrations to rollback
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
    /// Seed reference data
    #[command(name = "db:seed")]
    DbSeed,
}

type ComposeFn = Box<dyn FnOnce(&Config, DbConnection) -> Result<Pipeline, FrameworkError> + Send>;

pub struct Application<M = NoMigrator>
where
    M: MigratorTrait,
{
    compose_fn: Option<ComposeFn>,
    seeder: Option<Arc<dyn Seeder>>,
    _migrator: PhantomData<M>,
}

/// Placeholder type for when no migrator is configured
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator> {
    pub fn new() -> Self {
        Application {
            compose_fn: None,
            seeder: None,
            _migrator: PhantomData,
        }
    }
}

impl Default for Application<NoMigrator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Application<M>
where
    M: MigratorTrait,
{
    /// Register the composition function
    ///
    /// Called once with the loaded configuration and the shared connection;
    /// returns the fully assembled pipeline.
    pub fn compose<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Config, DbConnection) -> Result<Pipeline, FrameworkError> + Send + 'static,
    {
        self.compose_fn = Some(Box::new(f));
        self
    }

    pub fn seeder<S: Seeder + 'static>(mut self, seeder: S) -> Self {
        self.seeder = Some(Arc::new(seeder));
        self
    }

    pub fn migrations<NewM>(self) -> Application<NewM>
    where
        NewM: MigratorTrait,
    {
        Application {
            compose_fn: self.compose_fn,
            seeder: self.seeder,
            _migrator: PhantomData,
        }
    }

    /// Parse the command line and run the chosen command
    ///
    /// Exits the process with status 1 when the command fails.
    pub async fn run(self) {
        let cli = Cli::parse();

        let config = Config::init(Path::new("."));
        crate::logging::init();
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "invalid configuration");
                std::process::exit(1);
            }
        };

        let result = match cli.command {
            None | Some(Commands::Serve { no_migrate: false }) => self.serve(config, true).await,
            Some(Commands::Serve { no_migrate: true }) => self.serve(config, false).await,
            Some(Commands::Migrate) => Self::run_migrations(&config).await,
            Some(Commands::MigrateStatus) => Self::show_migration_status(&config).await,
            Some(Commands::MigrateRollback { steps }) => {
                Self::rollback_migrations(&config, steps).await
            }
            Some(Commands::MigrateFresh) => Self::fresh_migrations(&config).await,
            Some(Commands::DbSeed) => self.seed(&config).await,
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "command failed");
            std::process::exit(1);
        }
    }

    async fn serve(self, config: Config, migrate: bool) -> Result<(), FrameworkError> {
        self.boot(config, migrate).await?.serve().await
    }

    /// Connect, bootstrap the schema, compose and bind
    ///
    /// The listener is bound once this returns; call
    /// [`BootedApplication::serve`] to start accepting.
    pub async fn boot(self, config: Config, migrate: bool) -> Result<BootedApplication, FrameworkError> {
        let connection = DbConnection::connect(&config.database).await?;

        let report = if migrate {
            bootstrap_database::<M>(
                &connection,
                self.seeder.as_deref(),
                config.database.migration_policy,
            )
            .await?
        } else {
            StartupReport::Skipped
        };

        let pipeline = match self.compose_fn {
            Some(compose) => compose(&config, connection)?,
            None => Pipeline::new(Router::new()),
        };

        let server = Server::new(pipeline, &config.server).bind().await?;
        Ok(BootedApplication { server, report })
    }

    async fn seed(self, config: &Config) -> Result<(), FrameworkError> {
        let Some(seeder) = self.seeder else {
            tracing::warn!("no seeder registered");
            return Ok(());
        };
        let connection = DbConnection::connect(&config.database).await?;
        seeder.seed(&StoreContext::new(connection)).await?;
        tracing::info!("database seeded");
        Ok(())
    }

    async fn run_migrations(config: &Config) -> Result<(), FrameworkError> {
        tracing::info!("running migrations");
        let db = DbConnection::connect(&config.database).await?;
        M::up(db.inner(), None).await?;
        tracing::info!("migrations completed");
        Ok(())
    }

    async fn show_migration_status(config: &Config) -> Result<(), FrameworkError> {
        let db = DbConnection::connect(&config.database).await?;
        M::status(db.inner()).await?;
        Ok(())
    }

    async fn rollback_migrations(config: &Config, steps: u32) -> Result<(), FrameworkError> {
        tracing::info!(steps, "rolling back migrations");
        let db = DbConnection::connect(&config.database).await?;
        M::down(db.inner(), Some(steps)).await?;
        tracing::info!("rollback completed");
        Ok(())
    }

    async fn fresh_migrations(config: &Config) -> Result<(), FrameworkError> {
        tracing::warn!("dropping all tables and re-running migrations");
        let db = DbConnection::connect(&config.database).await?;
        M::fresh(db.inner()).await?;
        tracing::info!("database refreshed");
        Ok(())
    }
}

/// A booted application: schema bootstrapped, listener bound
pub struct BootedApplication {
    server: BoundServer,
    report: StartupReport,
}

impl BootedApplication {
    pub fn local_addr(&self) -> Result<SocketAddr, FrameworkError> {
        self.server.local_addr()
    }

    pub fn report(&self) -> &StartupReport {
        &self.report
    }

    pub async fn serve(self) -> Result<(), FrameworkError> {
        self.server.serve().await
    }
}
