//! 产品管理页面的视图状态
//!
//! 列表：`Idle -> Loading -> Loaded | Errored`
//! 表单：`Closed -> Open(Create | Edit) -> Closed`
//!
//! 编辑模式携带目标产品，所以不存在“编辑中但没有目标”的状态。

use tracing::warn;

use super::form::ProductForm;
use super::ProductGateway;
use crate::app::product::model::{Product, ProductId};

pub const LOAD_FAILED: &str = "Failed to load products.";
pub const SAVE_FAILED: &str = "Failed to save product.";
pub const DELETE_FAILED: &str = "Failed to delete product.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded(Vec<Product>),
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Product),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Closed,
    Open { mode: FormMode, form: ProductForm },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Product),
    /// 必填字段为空，没有发出请求
    Incomplete(Vec<&'static str>),
    Failed,
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Failed,
}

/// 列表状态变化时的回调，用来在请求进行中渲染加载提示
pub type ListObserver = Box<dyn FnMut(&ListState) + Send>;

pub struct ProductPage<G> {
    gateway: G,
    list: ListState,
    form: FormState,
    banner: Option<String>,
    observer: Option<ListObserver>,
}

impl<G: ProductGateway> ProductPage<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            list: ListState::Idle,
            form: FormState::Closed,
            banner: None,
            observer: None,
        }
    }

    /// 每次列表状态变化（包括进入 `Loading`）都会调用 `observer`
    pub fn on_list_change(mut self, observer: impl FnMut(&ListState) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// 错误横幅，一旦出现就一直保留
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// 已加载的产品；未加载或加载失败时为空
    pub fn products(&self) -> &[Product] {
        match &self.list {
            ListState::Loaded(products) => products,
            _ => &[],
        }
    }

    /// 首次挂载：拉取列表
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// 重新拉取列表，失败时不重试
    ///
    /// 已经加载过的列表在刷新失败时保留，只显示横幅。
    pub async fn refresh(&mut self) {
        let previous = std::mem::replace(&mut self.list, ListState::Loading);
        self.notify();

        self.list = match self.gateway.list().await {
            Ok(products) => ListState::Loaded(products),
            Err(e) => {
                warn!("Loading products failed: {}", e);
                self.banner = Some(LOAD_FAILED.to_string());
                match previous {
                    ListState::Loaded(products) => ListState::Loaded(products),
                    _ => ListState::Errored,
                }
            }
        };
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.list);
        }
    }

    pub fn open_create(&mut self) {
        self.form = FormState::Open {
            mode: FormMode::Create,
            form: ProductForm::blank(),
        };
    }

    /// 用列表中的产品打开编辑表单；列表中没有该 ID 时返回 false
    pub fn open_edit(&mut self, id: ProductId) -> bool {
        let Some(product) = self.products().iter().find(|p| p.id == id).cloned() else {
            return false;
        };
        self.form = FormState::Open {
            form: ProductForm::from_product(&product),
            mode: FormMode::Edit(product),
        };
        true
    }

    pub fn form_mut(&mut self) -> Option<&mut ProductForm> {
        match &mut self.form {
            FormState::Open { form, .. } => Some(form),
            FormState::Closed => None,
        }
    }

    pub fn close_form(&mut self) {
        self.form = FormState::Closed;
    }

    /// 提交表单：编辑模式调用 update，否则调用 create
    ///
    /// 成功后关闭表单并刷新列表；失败时保留表单并显示横幅。
    pub async fn submit(&mut self) -> SubmitOutcome {
        let FormState::Open { mode, form } = &self.form else {
            return SubmitOutcome::NotOpen;
        };

        let missing = form.missing_required();
        if !missing.is_empty() {
            return SubmitOutcome::Incomplete(missing);
        }

        let payload = form.to_payload();
        let result = match mode {
            FormMode::Edit(product) => self.gateway.update(product.id, &payload).await,
            FormMode::Create => self.gateway.create(&payload).await,
        };

        match result {
            Ok(product) => {
                self.form = FormState::Closed;
                self.refresh().await;
                SubmitOutcome::Saved(product)
            }
            Err(e) => {
                warn!("Saving product failed: {}", e);
                self.banner = Some(SAVE_FAILED.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// 删除前必须确认；确认函数收到提示语，返回 false 时不发请求
    pub async fn delete<F>(&mut self, id: ProductId, confirm: F) -> DeleteOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        match self.gateway.delete(id).await {
            Ok(()) => {
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!("Deleting product {} failed: {}", id, e);
                self.banner = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::app::product::model::ProductPayload;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FailingGateway;

    #[async_trait]
    impl ProductGateway for FailingGateway {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            Err(ClientError::Status {
                status: 500,
                body: String::new(),
            })
        }

        async fn create(&self, _: &ProductPayload) -> Result<Product, ClientError> {
            Err(ClientError::Status {
                status: 500,
                body: String::new(),
            })
        }

        async fn update(&self, _: ProductId, _: &ProductPayload) -> Result<Product, ClientError> {
            Err(ClientError::Status {
                status: 500,
                body: String::new(),
            })
        }

        async fn delete(&self, _: ProductId) -> Result<(), ClientError> {
            Err(ClientError::Status {
                status: 404,
                body: String::new(),
            })
        }
    }

    /// 第一次列表请求成功，之后的列表请求全部失败
    struct FlakyGateway {
        lists: AtomicUsize,
    }

    fn pen() -> Product {
        Product {
            id: 1,
            name: "Pen".to_string(),
            price: 1.5,
            stock: 10,
            description: None,
        }
    }

    #[async_trait]
    impl ProductGateway for FlakyGateway {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            if self.lists.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![pen()])
            } else {
                Err(ClientError::Status {
                    status: 500,
                    body: String::new(),
                })
            }
        }

        async fn create(&self, _: &ProductPayload) -> Result<Product, ClientError> {
            Ok(pen())
        }

        async fn update(&self, _: ProductId, _: &ProductPayload) -> Result<Product, ClientError> {
            Ok(pen())
        }

        async fn delete(&self, _: ProductId) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_observer_sees_loading() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let mut page = ProductPage::new(FlakyGateway {
            lists: AtomicUsize::new(0),
        })
        .on_list_change(move |state| recorder.lock().unwrap().push(state.clone()));

        page.mount().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ListState::Loading, ListState::Loaded(vec![pen()])]
        );
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_loaded_list() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let mut page = ProductPage::new(FlakyGateway {
            lists: AtomicUsize::new(0),
        })
        .on_list_change(move |state| recorder.lock().unwrap().push(state.clone()));
        page.mount().await;

        assert_eq!(page.delete(1, |_| true).await, DeleteOutcome::Deleted);

        assert_eq!(page.banner(), Some(LOAD_FAILED));
        assert_eq!(page.list(), &ListState::Loaded(vec![pen()]));
        assert_eq!(seen.lock().unwrap().len(), 4);
        assert_eq!(seen.lock().unwrap()[2], ListState::Loading);
    }

    #[tokio::test]
    async fn test_failed_mount_shows_banner() {
        let mut page = ProductPage::new(FailingGateway);
        assert_eq!(page.list(), &ListState::Idle);

        page.mount().await;
        assert_eq!(page.list(), &ListState::Errored);
        assert_eq!(page.banner(), Some(LOAD_FAILED));
        assert!(page.products().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_form_open() {
        let mut page = ProductPage::new(FailingGateway);
        page.open_create();
        if let Some(form) = page.form_mut() {
            form.name = "Pen".to_string();
            form.price = "1.50".to_string();
            form.stock = "10".to_string();
        }

        assert_eq!(page.submit().await, SubmitOutcome::Failed);
        assert_eq!(page.banner(), Some(SAVE_FAILED));
        assert!(matches!(
            page.form(),
            FormState::Open {
                mode: FormMode::Create,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_sent() {
        let mut page = ProductPage::new(FailingGateway);
        page.open_create();

        assert_eq!(
            page.submit().await,
            SubmitOutcome::Incomplete(vec!["name", "price", "stock"])
        );
        assert_eq!(page.banner(), None);
    }

    #[tokio::test]
    async fn test_submit_without_open_form() {
        let mut page = ProductPage::new(FailingGateway);
        assert_eq!(page.submit().await, SubmitOutcome::NotOpen);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut page = ProductPage::new(FailingGateway);
        let mut prompt = String::new();

        let outcome = page
            .delete(1, |text| {
                prompt = text.to_string();
                false
            })
            .await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(prompt, DELETE_PROMPT);
        assert_eq!(page.banner(), None);
    }

    #[tokio::test]
    async fn test_edit_requires_loaded_product() {
        let mut page = ProductPage::new(FailingGateway);
        assert!(!page.open_edit(1));
        assert_eq!(page.form(), &FormState::Closed);
    }
}
