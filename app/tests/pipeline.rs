mod common;

use common::{app, pipeline, seeded_db, BASE_URL, TOKEN};
use kit::testing::{json_body, TestRequest};
use kit::Environment;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn valid_product() -> Value {
    json!({
        "name": "Angular Cap",
        "description": "A cap",
        "price": 9.5,
        "brandId": 1,
        "categoryId": 2
    })
}

async fn product_count(pipeline: &kit::Pipeline) -> u64 {
    let body: Value = json_body(
        &pipeline
            .handle(TestRequest::get("/api/products").build())
            .await,
    );
    body["count"].as_u64().unwrap()
}

#[tokio::test]
async fn test_every_validation_failure_is_reported_in_order() {
    let (_db, pipeline) = app().await;

    let response = pipeline
        .handle(
            TestRequest::post("/api/products")
                .bearer(TOKEN)
                .json(json!({
                    "name": "",
                    "description": "",
                    "price": 0.0,
                    "brandId": 0,
                    "categoryId": 0
                }))
                .build(),
        )
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = json_body(&response);
    assert_eq!(
        body,
        json!({
            "statusCode": 400,
            "message": "A bad request, you have made",
            "errors": [
                "The BrandId field must reference a brand.",
                "The CategoryId field must reference a category.",
                "The Description field is required.",
                "The Name field is required.",
                "Price must be greater than zero."
            ]
        })
    );
}

#[tokio::test]
async fn test_malformed_json_is_one_error() {
    let (_db, pipeline) = app().await;

    let response = pipeline
        .handle(
            TestRequest::post("/api/products")
                .bearer(TOKEN)
                .header("Content-Type", "application/json")
                .body("{ not json")
                .build(),
        )
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = json_body(&response);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_docs_are_served_in_development_only() {
    let db = seeded_db().await;

    let development = pipeline(&db, Environment::Development, None);
    let response = development
        .handle(TestRequest::get("/swagger/v1/swagger.json").build())
        .await;
    assert_eq!(response.status_code(), 200);
    let document: Value = json_body(&response);
    assert_eq!(document["info"]["title"], "Talabat.APIs");
    assert!(document["paths"]["/api/products"].is_object());

    let response = development
        .handle(TestRequest::get("/swagger/").build())
        .await;
    assert_eq!(response.status_code(), 200);

    let production = pipeline(&db, Environment::Production, None);
    for path in ["/swagger/v1/swagger.json", "/swagger", "/swagger/"] {
        let response = production.handle(TestRequest::get(path).build()).await;
        assert_eq!(response.status_code(), 404, "{}", path);
    }
}

#[tokio::test]
async fn test_unauthenticated_writes_never_reach_controllers() {
    let (_db, pipeline) = app().await;

    let response = pipeline
        .handle(TestRequest::post("/api/products").json(valid_product()).build())
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.header_value("WWW-Authenticate"), Some("Bearer"));
    let body: Value = json_body(&response);
    assert_eq!(
        body,
        json!({ "statusCode": 401, "message": "Authorized, you are not" })
    );

    let response = pipeline
        .handle(
            TestRequest::delete("/api/products/1")
                .bearer("not-the-token")
                .build(),
        )
        .await;
    assert_eq!(response.status_code(), 401);

    assert_eq!(product_count(&pipeline).await, 18);
}

#[tokio::test]
async fn test_reads_and_static_files_need_no_token() {
    let (_db, pipeline) = app().await;

    let response = pipeline.handle(TestRequest::get("/index.html").build()).await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .header_value("Content-Type")
        .unwrap()
        .starts_with("text/html"));

    let response = pipeline
        .handle(TestRequest::get("/api/products/brands").build())
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_every_product_picture_is_served() {
    let (_db, pipeline) = app().await;
    let prefix = format!("{}/", BASE_URL);

    for page_index in 1..=2 {
        let page: Value = json_body(
            &pipeline
                .handle(
                    TestRequest::get(&format!("/api/products?pageSize=10&pageIndex={}", page_index))
                        .build(),
                )
                .await,
        );
        for product in page["data"].as_array().unwrap() {
            let url = product["pictureUrl"].as_str().unwrap();
            let path = url.strip_prefix(&prefix).unwrap();

            let response = pipeline
                .handle(TestRequest::get(&format!("/{}", path)).build())
                .await;
            assert_eq!(response.status_code(), 200, "{}", url);
            assert_eq!(response.header_value("Content-Type"), Some("image/png"));
        }
    }
}

#[tokio::test]
async fn test_insecure_requests_are_redirected_before_authorization() {
    let db = seeded_db().await;
    let pipeline = pipeline(&db, Environment::Production, Some(5001));

    let response = pipeline
        .handle(
            TestRequest::post("/api/products?x=1")
                .header("Host", "shop.example:8080")
                .json(valid_product())
                .build(),
        )
        .await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(
        response.header_value("Location"),
        Some("https://shop.example:5001/api/products?x=1")
    );

    let response = pipeline
        .handle(
            TestRequest::get("/api/products")
                .header("Host", "shop.example")
                .header("X-Forwarded-Proto", "https")
                .build(),
        )
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_server_error_details_depend_on_environment() {
    let db = seeded_db().await;

    let response = pipeline(&db, Environment::Development, None)
        .handle(TestRequest::get("/api/buggy/server-error").build())
        .await;
    assert_eq!(response.status_code(), 500);
    let body: Value = json_body(&response);
    assert_eq!(body["statusCode"], 500);
    assert!(body["details"].as_str().unwrap().contains("object reference"));

    let response = pipeline(&db, Environment::Production, None)
        .handle(TestRequest::get("/api/buggy/server-error").build())
        .await;
    let body: Value = json_body(&response);
    assert_eq!(body["details"], Value::Null);
    assert_eq!(
        body["message"],
        "Errors are the path to the dark side. Errors lead to anger. Anger leads to hate. Hate leads to career change"
    );
}

#[tokio::test]
async fn test_buggy_endpoints() {
    let (_db, pipeline) = app().await;

    let cases = [
        ("/api/buggy/not-found", 404),
        ("/api/buggy/bad-request", 400),
        ("/api/buggy/bad-request/12", 200),
        ("/api/buggy/bad-request/twelve", 400),
        ("/health", 200),
        ("/api/nothing-here", 404),
    ];

    for (path, status) in cases {
        let response = pipeline.handle(TestRequest::get(path).build()).await;
        assert_eq!(response.status_code(), status, "{}", path);
    }

    let body: Value = json_body(
        &pipeline
            .handle(TestRequest::get("/api/buggy/bad-request/twelve").build())
            .await,
    );
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}
