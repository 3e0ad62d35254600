//! 会话处理器

use axum::{response::Json, Extension};

use super::model::Identity;

/// GET /user，身份由 `require_session` 中间件注入
pub async fn current_user(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
