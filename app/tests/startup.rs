mod common;

use common::config;
use kit::{Application, Environment, MigrationPolicy, StartupReport};
use pretty_assertions::assert_eq;
use sea_orm_migration::prelude::*;
use talabat_api::bootstrap::compose;
use talabat_api::migrations::Migrator;
use talabat_api::seed::StoreContextSeed;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

struct ExplodingMigration;

impl MigrationName for ExplodingMigration {
    fn name(&self) -> &str {
        "m20240101_999999_exploding"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for ExplodingMigration {
    async fn up(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration("disk on fire".to_string()))
    }
}

struct ExplodingMigrator;

impl MigratorTrait for ExplodingMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(ExplodingMigration)]
    }
}

async fn get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.expect("write");
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.expect("read");
    raw
}

#[tokio::test]
async fn test_boots_and_serves_seeded_catalog() {
    let booted = Application::new()
        .migrations::<Migrator>()
        .seeder(StoreContextSeed)
        .compose(compose)
        .boot(config(Environment::Development, None), true)
        .await
        .expect("boot");

    assert_eq!(booted.report(), &StartupReport::Ready);
    let addr = booted.local_addr().expect("addr");
    assert_ne!(addr.port(), 0);
    tokio::spawn(booted.serve());

    let health = get(addr, "/health").await;
    assert!(health.starts_with("HTTP/1.1 200"), "{}", health);
    assert!(health.contains(r#"{"status":"ok"}"#), "{}", health);

    let brands = get(addr, "/api/products/brands").await;
    assert!(brands.starts_with("HTTP/1.1 200"), "{}", brands);
    assert!(brands.contains("Redis"), "{}", brands);
}

#[tokio::test]
async fn test_failed_migration_is_logged_and_startup_continues() {
    let booted = Application::new()
        .migrations::<ExplodingMigrator>()
        .compose(compose)
        .boot(config(Environment::Development, None), true)
        .await
        .expect("boot despite migration failure");

    assert!(matches!(booted.report(), StartupReport::Degraded { .. }));
    let addr = booted.local_addr().expect("addr");
    tokio::spawn(booted.serve());

    let health = get(addr, "/health").await;
    assert!(health.starts_with("HTTP/1.1 200"), "{}", health);

    // the products table was never created
    let products = get(addr, "/api/products").await;
    assert!(products.starts_with("HTTP/1.1 500"), "{}", products);
}

#[tokio::test]
async fn test_fail_fast_policy_aborts_startup() {
    let mut config = config(Environment::Production, None);
    config.database.migration_policy = MigrationPolicy::FailFast;

    let result = Application::new()
        .migrations::<ExplodingMigrator>()
        .compose(compose)
        .boot(config, true)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_no_migrate_skips_bootstrap() {
    let booted = Application::new()
        .migrations::<ExplodingMigrator>()
        .compose(compose)
        .boot(config(Environment::Development, None), false)
        .await
        .expect("boot");

    assert_eq!(booted.report(), &StartupReport::Skipped);
}
