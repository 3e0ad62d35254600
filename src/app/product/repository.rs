//! 产品持久化

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Product, ProductFields, ProductId};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 产品记录的持久化接口
///
/// 只负责读写已校验的字段；找不到记录时返回 `None`/`false`，由服务层转换成业务错误。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 存储后端名称，用于健康检查和日志
    fn backend(&self) -> &'static str;

    /// 按创建顺序返回全部产品
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn insert(&self, fields: ProductFields) -> Result<Product, StoreError>;

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn replace(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError>;

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct MemoryState {
    next_id: ProductId,
    products: BTreeMap<ProductId, Product>,
}

/// 内存存储，ID 从 1 开始递增且不复用
#[derive(Debug)]
pub struct MemoryProductRepository {
    state: RwLock<MemoryState>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                products: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn insert(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let product = Product::from_fields(id, fields);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn replace(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.products.get_mut(&id).map(|product| {
            *product = Product::from_fields(id, fields);
            product.clone()
        }))
    }

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.products.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(feature = "database")]
pub use postgres::PgProductRepository;

#[cfg(feature = "database")]
mod postgres {
    use async_trait::async_trait;
    use sqlx::postgres::PgPool;

    use super::{ProductRepository, StoreError};
    use crate::app::product::model::{Product, ProductFields, ProductId};

    const COLUMNS: &str = "id, name, price, stock, description";

    /// Postgres 存储，表结构由 `DatabaseManager::migrate` 创建
    #[derive(Clone)]
    pub struct PgProductRepository {
        pool: PgPool,
    }

    impl PgProductRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl ProductRepository for PgProductRepository {
        fn backend(&self) -> &'static str {
            "postgres"
        }

        async fn list(&self) -> Result<Vec<Product>, StoreError> {
            let products =
                sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await?;
            Ok(products)
        }

        async fn insert(&self, fields: ProductFields) -> Result<Product, StoreError> {
            let product = sqlx::query_as::<_, Product>(&format!(
                "INSERT INTO products (name, price, stock, description) \
                 VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
            ))
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.stock)
            .bind(&fields.description)
            .fetch_one(&self.pool)
            .await?;
            Ok(product)
        }

        async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
            let product = sqlx::query_as::<_, Product>(&format!(
                "SELECT {COLUMNS} FROM products WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(product)
        }

        async fn replace(
            &self,
            id: ProductId,
            fields: ProductFields,
        ) -> Result<Option<Product>, StoreError> {
            let product = sqlx::query_as::<_, Product>(&format!(
                "UPDATE products SET name = $1, price = $2, stock = $3, description = $4 \
                 WHERE id = $5 RETURNING {COLUMNS}"
            ))
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.stock)
            .bind(&fields.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(product)
        }

        async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
            let result = sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            if self.pool.is_closed() {
                return Err(StoreError::Unavailable("connection pool is closed".to_string()));
            }
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        }
    }
}
