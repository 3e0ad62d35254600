//! 路由表与应用组装
//!
//! | Method    | Path            | Handler          |
//! |-----------|-----------------|------------------|
//! | GET       | /products       | list_products    |
//! | POST      | /products       | create_product   |
//! | GET       | /products/:id   | get_product      |
//! | PUT       | /products/:id   | update_product   |
//! | PATCH     | /products/:id   | patch_product    |
//! | DELETE    | /products/:id   | delete_product   |
//! | GET       | /user           | current_user     |
//!
//! 以上路由挂在 `http.api_prefix` 下；`/health` 始终在根路径。

use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::product::handler::{
    create_product, delete_product, get_product, list_products, patch_product, update_product,
};
use crate::app::session::handler::current_user;
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::middleware::{request_logging_middleware, require_session};
use crate::infrastructure::config::HttpConfig;

/// API 路由（不含前缀）
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product)
                .put(update_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route(
            "/user",
            get(current_user).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_session,
            )),
        )
}

/// 组装完整应用：API 路由、健康检查和中间件
pub fn build_app(state: AppState, http: &HttpConfig) -> Router {
    let api = api_routes(&state);
    let prefix = http.api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    router
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CoreError> {
    state.product_service.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "storage": state.product_service.backend(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::service::ProductService;
    use crate::app::session::service::SessionService;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app(prefix: &str) -> Router {
        let http = HttpConfig {
            api_prefix: prefix.to_string(),
            ..HttpConfig::default()
        };
        let state = AppState::new(ProductService::in_memory(), SessionService::default());
        build_app(state, &http)
    }

    async fn status(app: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_prefix_trailing_slash_is_ignored() {
        assert_eq!(status(app("/api/"), "/api/products").await, StatusCode::OK);
        assert_eq!(status(app("/api/"), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_headers_are_added() {
        let request = Request::builder()
            .uri("/api/products")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app("/api").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
