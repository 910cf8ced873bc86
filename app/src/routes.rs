use crate::bootstrap::AppServices;
use crate::controllers::{buggy, health, products};
use kit::{inject, Router};

pub fn register(services: AppServices) -> Router {
    let s = services;

    Router::new()
        .get("/health", health::ping)
        .group("/api/products", |r| {
            r.get("", inject(s.clone(), products::index))
                .post("", inject(s.clone(), products::store))
                .get("/brands", inject(s.clone(), products::brands))
                .get("/categories", inject(s.clone(), products::categories))
                .get("/{id}", inject(s.clone(), products::show))
                .put("/{id}", inject(s.clone(), products::update))
                .delete("/{id}", inject(s.clone(), products::destroy))
        })
        .group("/api/buggy", |r| {
            r.get("/not-found", buggy::not_found)
                .get("/server-error", buggy::server_error)
                .get("/bad-request", buggy::bad_request)
                .get("/bad-request/{id}", buggy::bad_request_with_id)
        })
        .into()
}
