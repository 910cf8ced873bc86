//! Endpoints that fail on purpose, for exercising the error shapes

use kit::{ApiExceptionResponse, ApiResponse, FrameworkError, HttpResponse, Request, Response};

#[utoipa::path(
    get,
    path = "/api/buggy/not-found",
    responses((status = 404, body = ApiResponse)),
    tag = "buggy"
)]
pub async fn not_found(_req: Request) -> Response {
    Err(HttpResponse::json_body(&ApiResponse::new(404)).status(404))
}

#[utoipa::path(
    get,
    path = "/api/buggy/server-error",
    responses((status = 500, body = ApiExceptionResponse)),
    tag = "buggy"
)]
pub async fn server_error(_req: Request) -> Response {
    Err(FrameworkError::internal("object reference not set to an instance of an object").into())
}

#[utoipa::path(
    get,
    path = "/api/buggy/bad-request",
    responses((status = 400, body = ApiResponse)),
    tag = "buggy"
)]
pub async fn bad_request(_req: Request) -> Response {
    Err(HttpResponse::json_body(&ApiResponse::new(400)).status(400))
}

#[utoipa::path(
    get,
    path = "/api/buggy/bad-request/{id}",
    params(("id" = i32, Path, description = "Must be numeric")),
    responses(
        (status = 200, description = "The id was numeric"),
        (status = 400, body = kit::ApiValidationErrorResponse)
    ),
    tag = "buggy"
)]
pub async fn bad_request_with_id(req: Request) -> Response {
    let id: i32 = req.param_as("id")?;
    Ok(HttpResponse::json(serde_json::json!({ "id": id })))
}
