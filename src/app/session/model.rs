//! 会话身份模型

use serde::{Deserialize, Serialize};

/// 通过会话令牌认证后的调用者身份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
}
