//! 产品客户端
//!
//! 页面不持有权威数据：每次增删改之后都重新拉取列表。

pub mod api;
pub mod form;
pub mod page;
pub mod render;

use async_trait::async_trait;

use crate::app::product::model::{Product, ProductId, ProductPayload};

pub use api::ProductApi;
pub use form::ProductForm;
pub use page::{DeleteOutcome, FormMode, FormState, ListState, ProductPage, SubmitOutcome};

/// 客户端错误：网络、解析或非成功状态码
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// 页面访问产品 API 的接口
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ClientError>;

    async fn create(&self, payload: &ProductPayload) -> Result<Product, ClientError>;

    async fn update(&self, id: ProductId, payload: &ProductPayload)
        -> Result<Product, ClientError>;

    async fn delete(&self, id: ProductId) -> Result<(), ClientError>;
}
