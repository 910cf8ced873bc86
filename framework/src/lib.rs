pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod mapping;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod testing;

pub use app::{Application, BootedApplication, NoMigrator};
pub use config::{Config, Environment};
pub use database::{
    BaseEntity, DatabaseConfig, DbConnection, GenericRepository, MigrationPolicy, Seeder,
    Specification, StartupReport, StoreContext, Tracked,
};
pub use error::{AppError, FieldError, FrameworkError, ValidationErrors};
pub use http::{
    json, text, ApiExceptionResponse, ApiResponse, ApiValidationErrorResponse, FormRequest,
    HttpResponse, Redirect, Request, Response, ResponseExt,
};
pub use mapping::{MapFrom, Mapper, MappingContext};
pub use middleware::{Middleware, Next, Pipeline};
pub use routing::{inject, Router};
pub use server::Server;

pub use ::http::Method;
pub use async_trait::async_trait;
