#![allow(dead_code)]

use kit::config::{AppConfig, AuthConfig, ServerConfig};
use kit::testing::TestDatabase;
use kit::{Config, DatabaseConfig, Environment, Pipeline, Seeder};
use talabat_api::bootstrap::compose;
use talabat_api::migrations::Migrator;
use talabat_api::seed::StoreContextSeed;

pub const TOKEN: &str = "test-token";
pub const BASE_URL: &str = "https://cdn.talabat.test";

pub fn config(environment: Environment, https_port: Option<u16>) -> Config {
    Config {
        app: AppConfig::builder()
            .environment(environment)
            .url("http://localhost:8080")
            .api_base_url(BASE_URL)
            .build(),
        server: ServerConfig::builder()
            .host("127.0.0.1")
            .port(0)
            .https_port(https_port)
            .static_root(concat!(env!("CARGO_MANIFEST_DIR"), "/wwwroot"))
            .build(),
        auth: AuthConfig::with_tokens([TOKEN]),
        database: DatabaseConfig::builder().url("sqlite::memory:").build(),
    }
}

/// Migrated and seeded database
pub async fn seeded_db() -> TestDatabase {
    let db = TestDatabase::fresh::<Migrator>().await.expect("test db");
    StoreContextSeed.seed(&db.store()).await.expect("seed");
    db
}

pub fn pipeline(db: &TestDatabase, environment: Environment, https_port: Option<u16>) -> Pipeline {
    compose(&config(environment, https_port), db.connection()).expect("compose")
}

/// Development pipeline over a seeded database, with HTTPS redirection off
pub async fn app() -> (TestDatabase, Pipeline) {
    let db = seeded_db().await;
    let pipeline = pipeline(&db, Environment::Development, None);
    (db, pipeline)
}
