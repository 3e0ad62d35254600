//! 核心错误处理模块

use std::borrow::Cow;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;
use validator::{ValidationError, ValidationErrors};

use super::response::{ErrorResponse, ValidationErrorResponse};
use crate::app::product::service::ServiceError;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    Validation(ValidationErrors),
    Unauthorized,
    NotFound(String),
    InternalServerError(String),
}

impl From<ServiceError> for CoreError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => CoreError::Validation(errors),
            ServiceError::NotFound(id) => CoreError::NotFound(format!("Product {} not found", id)),
            ServiceError::Store(e) => CoreError::InternalServerError(e.to_string()),
        }
    }
}

/// 请求体不是合法的 JSON 对象时，归入 `body` 字段的校验错误
impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        let mut error = ValidationError::new("json");
        error.message = Some(Cow::Owned(rejection.body_text()));

        let mut errors = ValidationErrors::new();
        errors.add("body", error);
        CoreError::Validation(errors)
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, error_message, user_message) = match self {
            CoreError::Validation(errors) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = ValidationErrorResponse::new(&errors, status.as_u16());
                return (status, Json(body)).into_response();
            }
            CoreError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthenticated.".to_string(),
            ),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            CoreError::InternalServerError(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let error_response = ErrorResponse::new(error_message, user_message, status.as_u16());

        (status, Json(error_response)).into_response()
    }
}
