//! 产品业务服务

use std::sync::Arc;

use tracing::{debug, info};
use validator::ValidationErrors;

use super::model::{Product, ProductFields, ProductId, ProductPayload};
use super::repository::{MemoryProductRepository, ProductRepository, StoreError};

/// 服务层错误
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 产品的增删改查入口：校验请求字段并委托给存储实现
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryProductRepository::new()))
    }

    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.repository.list().await?;
        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub async fn create(&self, payload: ProductPayload) -> Result<Product, ServiceError> {
        let fields = payload.into_fields()?;
        let product = self.repository.insert(fields).await?;
        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn read(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.repository
            .find(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// 整体替换，必填字段都要提供
    pub async fn update(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, ServiceError> {
        self.read(id).await?;
        let fields = payload.into_fields()?;
        self.replace(id, fields).await
    }

    /// 部分更新，缺失的字段保留原值
    pub async fn patch(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, ServiceError> {
        let current = self.read(id).await?;
        let fields = payload.merge_into(current.fields())?;
        self.replace(id, fields).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        if !self.repository.remove(id).await? {
            return Err(ServiceError::NotFound(id));
        }
        info!("Deleted product: {}", id);
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.repository.ping().await?;
        Ok(())
    }

    async fn replace(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ServiceError> {
        let product = self
            .repository
            .replace(id, fields)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        info!("Updated product: {} ({})", product.name, product.id);
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ProductPayload {
        serde_json::from_value(value).unwrap()
    }

    fn pen() -> ProductPayload {
        payload(json!({ "name": "Pen", "price": 1.5, "stock": 10, "description": "" }))
    }

    #[tokio::test]
    async fn test_create_returns_input_with_id() {
        let service = ProductService::in_memory();
        let product = service.create(pen()).await.unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Pen");
        assert_eq!(product.price, 1.5);
        assert_eq!(product.stock, 10);
        assert_eq!(product.description, None);
        assert_eq!(service.list().await.unwrap(), vec![product]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = ProductService::in_memory();

        assert!(matches!(service.read(9999).await, Err(ServiceError::NotFound(9999))));
        assert!(matches!(
            service.update(9999, pen()).await,
            Err(ServiceError::NotFound(9999))
        ));
        assert!(matches!(
            service.patch(9999, ProductPayload::default()).await,
            Err(ServiceError::NotFound(9999))
        ));
        assert!(matches!(service.delete(9999).await, Err(ServiceError::NotFound(9999))));
    }

    #[tokio::test]
    async fn test_not_found_wins_over_invalid_payload() {
        let service = ProductService::in_memory();
        let result = service.update(42, ProductPayload::default()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_twice_fails() {
        let service = ProductService::in_memory();
        let product = service.create(pen()).await.unwrap();

        service.delete(product.id).await.unwrap();
        assert!(matches!(service.read(product.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(product.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_requires_all_fields_but_patch_does_not() {
        let service = ProductService::in_memory();
        let product = service.create(pen()).await.unwrap();

        let result = service.update(product.id, payload(json!({ "stock": 3 }))).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let patched = service
            .patch(product.id, payload(json!({ "stock": 3 })))
            .await
            .unwrap();
        assert_eq!(patched.stock, 3);
        assert_eq!(patched.name, "Pen");

        let updated = service
            .update(
                product.id,
                payload(json!({ "name": "Marker", "price": "2.25", "stock": "8" })),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Marker");
        assert_eq!(updated.price, 2.25);
        assert_eq!(service.read(product.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_create_stores_nothing() {
        let service = ProductService::in_memory();
        let result = service
            .create(payload(json!({ "name": "Pen", "price": -3, "stock": 1 })))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.list().await.unwrap().is_empty());
    }
}
