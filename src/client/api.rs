//! 基于 reqwest 的产品 API 客户端

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use super::{ClientError, ProductGateway};
use crate::app::product::model::{Product, ProductId, ProductPayload};
use crate::infrastructure::config::ClientConfig;

/// 指向固定 API 根地址的客户端，例如 `http://127.0.0.1:8000/api`
#[derive(Debug, Clone)]
pub struct ProductApi {
    http: Client,
    base_url: String,
}

impl ProductApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_client(Client::builder().build()?, base_url))
    }

    /// 使用调用方构建好的 reqwest 客户端（代理、超时等由调用方决定）
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }
}

/// 非 2xx 响应转换为 `ClientError::Status`
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ProductGateway for ProductApi {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.products_url();
        debug!("GET {}", url);
        let response = ensure_success(self.http.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        let url = self.products_url();
        debug!("POST {}", url);
        let response = ensure_success(self.http.post(&url).json(payload).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ClientError> {
        let url = self.product_url(id);
        debug!("PUT {}", url);
        let response = ensure_success(self.http.put(&url).json(payload).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: ProductId) -> Result<(), ClientError> {
        let url = self.product_url(id);
        debug!("DELETE {}", url);
        ensure_success(self.http.delete(&url).send().await?).await?;
        Ok(())
    }
}
