use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    backfill_handler, check_sku_handler, create_product_handler, delete_product_handler,
    get_product_handler, health_handler, next_sku_handler, status_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/v1/skus",
                Router::new()
                    .route("/next", get(next_sku_handler))
                    .route("/check", post(check_sku_handler))
                    .route("/status", get(status_handler))
                    .route("/backfill", post(backfill_handler)),
            )
            .nest(
                "/v1/products",
                Router::new().route("/", post(create_product_handler)).route(
                    "/{sku}",
                    get(get_product_handler).delete(delete_product_handler),
                ),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use lodestone_core::{NewProduct, Repository};
    use lodestone_inventory::InventoryService;
    use lodestone_storage::InMemoryRepository;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router_with(repository: InMemoryRepository) -> Router {
        App::router(AppState::new(Arc::new(InventoryService::new(repository))))
    }

    fn router() -> Router {
        router_with(InMemoryRepository::new())
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn product(name: &str, sku: &str) -> Value {
        json!({ "sku": sku, "name": name, "category": "earrings", "stock": 4 })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&router(), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn next_sku_starts_at_the_first_location() {
        let (status, body) = send(&router(), Method::GET, "/v1/skus/next", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "sku": "Aa1a01" }));
    }

    #[tokio::test]
    async fn register_then_next_then_lookup() {
        let router = router();

        let (status, created) = send(
            &router,
            Method::POST,
            "/v1/products",
            Some(product("Garnet drops", "Aa1a05")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["sku"], "Aa1a05");
        assert_eq!(created["stock"], 4);

        let (_, next) = send(&router, Method::GET, "/v1/skus/next", None).await;
        assert_eq!(next, json!({ "sku": "Aa1b01" }));

        let (status, found) = send(&router, Method::GET, "/v1/products/Aa1a05", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["name"], "Garnet drops");
        assert_eq!(found["id"], created["id"]);
    }

    #[tokio::test]
    async fn register_rejects_an_invalid_sku() {
        let (status, body) = send(
            &router(),
            Method::POST,
            "/v1/products",
            Some(product("Opal studs", "Aa1a06")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Aa1a06"));
    }

    #[tokio::test]
    async fn register_conflicts_on_a_taken_sku() {
        let router = router();
        send(&router, Method::POST, "/v1/products", Some(product("a", "Aa1a01"))).await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/v1/products",
            Some(product("b", "Aa1a01")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_gets_an_error_body() {
        let router = router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/skus/check")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn check_reports_validity_and_availability() {
        let router = router();
        send(&router, Method::POST, "/v1/products", Some(product("a", "Aa1a01"))).await;

        let (status, taken) = send(
            &router,
            Method::POST,
            "/v1/skus/check",
            Some(json!({ "sku": "Aa1a01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            taken,
            json!({ "sku": "Aa1a01", "valid": true, "available": false })
        );

        let (_, invalid) = send(
            &router,
            Method::POST,
            "/v1/skus/check",
            Some(json!({ "sku": "nope" })),
        )
        .await;
        assert_eq!(
            invalid,
            json!({ "sku": "nope", "valid": false, "available": false })
        );
    }

    #[tokio::test]
    async fn full_storage_is_insufficient_storage() {
        let router = router();
        send(&router, Method::POST, "/v1/products", Some(product("last", "Bt4o05"))).await;

        let (status, body) = send(&router, Method::GET, "/v1/skus/next", None).await;
        assert_eq!(status, StatusCode::INSUFFICIENT_STORAGE);
        assert!(body["error"].as_str().unwrap().contains("Bt4o05"));
    }

    #[tokio::test]
    async fn lookup_of_a_free_location_is_not_found() {
        let (status, _) = send(&router(), Method::GET, "/v1/products/Aa1a01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router(), Method::GET, "/v1/products/bogus", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_retires_the_product() {
        let router = router();
        send(&router, Method::POST, "/v1/products", Some(product("a", "Aa1a01"))).await;

        let (status, _) = send(&router, Method::DELETE, "/v1/products/Aa1a01", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, Method::DELETE, "/v1/products/Aa1a01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_and_backfill() {
        let repository = InMemoryRepository::new();
        repository
            .insert(NewProduct {
                name: "legacy hoops".to_string(),
                description: None,
                category: None,
                stock: 1,
                sku: None,
            })
            .await
            .unwrap();
        let router = router_with(repository);

        let (status, before) = send(&router, Method::GET, "/v1/skus/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(before["unassigned"], 1);
        assert_eq!(before["needs_backfill"], true);
        assert_eq!(before["highest"], Value::Null);

        let (status, report) = send(&router, Method::POST, "/v1/skus/backfill", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["assignments"][0]["sku"], "Aa1a01");
        assert_eq!(report["assignments"][0]["name"], "legacy hoops");
        assert_eq!(report["next_available"], "Aa1a02");

        let (_, after) = send(&router, Method::GET, "/v1/skus/status", None).await;
        assert_eq!(after["assigned"], 1);
        assert_eq!(after["highest"], "Aa1a01");
        assert_eq!(after["needs_backfill"], false);
    }
}
