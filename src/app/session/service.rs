//! 会话业务服务

use std::collections::HashMap;
use std::sync::Arc;

use super::model::Identity;
use crate::infrastructure::config::AuthConfig;

/// 令牌到身份的只读映射，启动时从配置加载
#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<HashMap<String, Identity>>,
}

impl SessionService {
    pub fn new(sessions: HashMap<String, Identity>) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let sessions = config
            .sessions
            .iter()
            .map(|s| {
                let identity = Identity {
                    id: s.id,
                    name: s.name.clone(),
                    email: s.email.clone(),
                };
                (s.token.clone(), identity)
            })
            .collect();
        Self::new(sessions)
    }

    pub fn authenticate(&self, token: &str) -> Option<Identity> {
        self.sessions.get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
