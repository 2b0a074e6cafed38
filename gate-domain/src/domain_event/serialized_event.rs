//! 事件传输模型（SerializedEvent）
//!
//! 定义事件在总线上的标准形态，以及由 `EventEnvelope` 转换而来的规则。
//!
use super::{DomainEvent, EventEnvelope};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct SerializedEvent {
    /// 事件唯一标识符
    event_id: String,
    /// 事件类型，用于区分不同的事件
    event_type: String,
    /// 事件版本，用于事件版本控制和升级
    event_version: usize,
    /// 产生该事件的分发标识
    dispatch_id: String,
    /// 产生该事件的命令名称
    command_type: String,
    /// 调用方提供的幂等键
    idempotency_key: Option<String>,
    /// 关联 ID，用于将多个事件关联到同一个业务操作
    correlation_id: Option<String>,
    /// 因果 ID，用于表示事件的触发来源
    causation_id: Option<String>,
    /// 触发命令的主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 触发命令的主体 ID
    actor_id: Option<String>,
    /// 命令执行耗时（毫秒）
    duration_ms: Option<u128>,
    /// 事件发生时间
    occurred_at: DateTime<Utc>,
    /// 事件负载，存储事件的具体数据
    payload: Value,
}

impl SerializedEvent {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
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

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn duration_ms(&self) -> Option<u128> {
        self.duration_ms
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl<E> TryFrom<&EventEnvelope<E>> for SerializedEvent
where
    E: DomainEvent,
{
    type Error = serde_json::Error;

    fn try_from(envelope: &EventEnvelope<E>) -> Result<Self, Self::Error> {
        Ok(SerializedEvent {
            event_id: envelope.metadata.event_id().to_string(),
            event_type: envelope.payload.event_type().to_string(),
            event_version: envelope.payload.event_version(),
            dispatch_id: envelope.metadata.dispatch_id().to_string(),
            command_type: envelope.metadata.command_type().to_string(),
            idempotency_key: envelope.metadata.idempotency_key().map(|s| s.to_string()),
            correlation_id: envelope.context.correlation_id().map(|s| s.to_string()),
            causation_id: envelope.context.causation_id().map(|s| s.to_string()),
            actor_type: envelope.context.actor_type().map(|s| s.to_string()),
            actor_id: envelope.context.actor_id().map(|s| s.to_string()),
            duration_ms: envelope.context.duration_ms(),
            occurred_at: *envelope.metadata.occurred_at(),
            payload: serde_json::to_value(&envelope.payload)?,
        })
    }
}
