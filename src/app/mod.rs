//! 应用层：产品资源与会话身份

pub mod product;
pub mod session;

use product::service::ProductService;
use session::service::SessionService;

/// 所有处理器共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(product_service: ProductService, session_service: SessionService) -> Self {
        Self {
            product_service,
            session_service,
        }
    }
}
