//! 核心响应处理模块

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
    pub request_id: String,
}

/// 校验失败的响应结构，按字段列出错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    #[serde(flatten)]
    pub base: ErrorResponse,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            code,
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl ValidationErrorResponse {
    pub fn new(errors: &ValidationErrors, code: u16) -> Self {
        Self {
            base: ErrorResponse::new("VALIDATION_FAILED", "The given data was invalid.", code),
            errors: field_messages(errors),
        }
    }
}

/// 把校验错误整理成 `字段 -> 错误信息列表`
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("The {field} field is invalid."))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
