//! # 产品目录
//!
//! 产品资源的 REST 服务和对应的终端客户端：
//! - `app`：产品增删改查、会话身份
//! - `core`：统一错误处理、响应结构、中间件
//! - `infrastructure`：配置、日志、数据库
//! - `routes`：显式路由表
//! - `client`：HTTP 客户端、表单、页面状态和文本渲染

pub mod app;
pub mod client;
pub mod core;
pub mod infrastructure;
pub mod routes;

pub use app::product::model::{Product, ProductFields, ProductId, ProductPayload};
pub use app::AppState;
pub use routes::build_app;
