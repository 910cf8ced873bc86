//! Composition root
//!
//! Every service the controllers need is built here and handed to them
//! explicitly; the stage order below is the order requests see.

use crate::docs::ApiDoc;
use crate::routes;
use kit::middleware::{
    ApiDocs, AuthorizationMiddleware, ExceptionMiddleware, HttpsRedirection, StaticFiles,
};
use kit::{Config, DbConnection, FrameworkError, Mapper, MappingContext, Method, Pipeline, StoreContext};
use utoipa::OpenApi;

/// Services shared by every request
#[derive(Clone)]
pub struct AppServices {
    connection: DbConnection,
    mapper: Mapper,
}

impl AppServices {
    pub fn new(connection: DbConnection, mapper: Mapper) -> Self {
        Self { connection, mapper }
    }

    /// A fresh unit of work for the current request
    pub fn store(&self) -> StoreContext {
        StoreContext::new(self.connection.clone())
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn connection(&self) -> &DbConnection {
        &self.connection
    }
}

/// Build the request pipeline
///
/// 1. exception translation
/// 2. API docs (development only)
/// 3. HTTPS redirection
/// 4. authorization of catalogue writes
/// 5. static files
/// 6. controllers
pub fn compose(config: &Config, connection: DbConnection) -> Result<Pipeline, FrameworkError> {
    let mapper = Mapper::new(MappingContext::new(config.app.api_base_url.clone()));
    let services = AppServices::new(connection, mapper);

    let mut pipeline = Pipeline::new(routes::register(services))
        .stage(ExceptionMiddleware::new(config.environment()));

    if config.is_development() {
        pipeline = pipeline.stage(ApiDocs::new(ApiDoc::openapi())?);
    }

    Ok(pipeline
        .stage(HttpsRedirection::new(config.server.https_port))
        .stage(
            AuthorizationMiddleware::new(config.auth.tokens.clone()).require(
                &[Method::POST, Method::PUT, Method::DELETE],
                "/api/products",
            ),
        )
        .stage(StaticFiles::new(&config.server.static_root)))
}
