//! Test support
//!
//! - [`TestDatabase`]: an isolated in-memory SQLite database per test
//! - [`TestRequest`]: builds [`Request`] values without a socket
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::testing::{TestDatabase, TestRequest};
//!
//! #[tokio::test]
//! async fn test_lists_products() {
//!     let db = TestDatabase::fresh::<Migrator>().await.expect("test db");
//!     let response = pipeline(db.connection())
//!         .handle(TestRequest::get("/api/products").build())
//!         .await;
//!     assert_eq!(response.status_code(), 200);
//! }
//! ```

use crate::database::{DatabaseConfig, DbConnection, StoreContext};
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request};
use bytes::Bytes;
use http::Method;
use sea_orm_migration::MigratorTrait;
use serde::de::DeserializeOwned;

/// A private in-memory database that lives as long as the value
pub struct TestDatabase {
    connection: DbConnection,
}

impl TestDatabase {
    /// In-memory database with every migration of `M` applied
    pub async fn fresh<M: MigratorTrait>() -> Result<Self, FrameworkError> {
        let db = Self::empty().await?;
        M::up(db.connection.inner(), None).await?;
        Ok(db)
    }

    /// In-memory database with no tables
    pub async fn empty() -> Result<Self, FrameworkError> {
        let config = DatabaseConfig::builder().url("sqlite::memory:").build();
        let connection = DbConnection::connect(&config).await?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> DbConnection {
        self.connection.clone()
    }

    /// A new unit of work over this database
    pub fn store(&self) -> StoreContext {
        StoreContext::new(self.connection.clone())
    }
}

/// Builder for in-process requests
///
/// ```rust,ignore
/// let request = TestRequest::post("/api/products")
///     .header("Authorization", "Bearer secret")
///     .json(serde_json::json!({ "name": "Angular Speedster" }))
///     .build();
/// ```
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl TestRequest {
    pub fn method(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::method(Method::GET, uri)
    }

    pub fn head(uri: &str) -> Self {
        Self::method(Method::HEAD, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::method(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::method(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::method(Method::DELETE, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// JSON body with a matching content type
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Bytes::from(body.to_string());
        self.header("Content-Type", "application/json")
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Panics on a malformed URI or header
    pub fn build(self) -> Request {
        let mut builder = http::Request::builder()
            .method(self.method)
            .uri(self.uri.as_str());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let inner = builder
            .body(self.body)
            .unwrap_or_else(|e| panic!("invalid test request {}: {}", self.uri, e));
        Request::new(inner)
    }
}

/// Deserialize a response body, panicking with the raw body on failure
pub fn json_body<T: DeserializeOwned>(response: &HttpResponse) -> T {
    serde_json::from_slice(response.body()).unwrap_or_else(|e| {
        panic!(
            "response body is not the expected JSON ({}): {}",
            e,
            String::from_utf8_lossy(response.body())
        )
    })
}
