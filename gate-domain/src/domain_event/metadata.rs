use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 元数据
///
/// 描述事件从哪一次命令执行中产生。
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// 事件唯一标识
    event_id: String,
    /// 产生该事件的那次分发（dispatch）的标识
    dispatch_id: String,
    /// 产生该事件的命令名称
    command_type: String,
    /// 调用方提供的幂等键（可选）
    idempotency_key: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl Metadata {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn dispatch_id(&self) -> &str {
        &self.dispatch_id
    }

    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub fn with_idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key;
        self
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }
}
