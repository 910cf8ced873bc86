use crate::dto::HealthDto;
use kit::{HttpResponse, Request, Response};

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthDto)),
    tag = "health"
)]
pub async fn ping(_req: Request) -> Response {
    Ok(HttpResponse::json_body(&HealthDto {
        status: "ok".to_string(),
    }))
}
