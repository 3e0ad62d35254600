//! 产品处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use super::model::{Product, ProductId, ProductPayload};
use crate::app::AppState;
use crate::core::error::CoreError;

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list().await?;
    Ok(Json(products))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let Json(payload) = payload?;
    let product = state.product_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&id)?;
    let product = state.product_service.read(id).await?;
    Ok(Json(product))
}

/// PUT /products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let product = state.product_service.update(id, payload).await?;
    Ok(Json(product))
}

/// PATCH /products/:id
pub async fn patch_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let product = state.product_service.patch(id, payload).await?;
    Ok(Json(product))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CoreError> {
    let id = parse_id(&id)?;
    state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 非数字的 ID 不可能存在，按 404 处理
fn parse_id(raw: &str) -> Result<ProductId, CoreError> {
    raw.parse::<ProductId>()
        .map_err(|_| CoreError::NotFound(format!("Product {} not found", raw)))
}
