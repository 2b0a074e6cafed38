use chrono::Utc;
use uuid::Uuid;

use super::business_context::BusinessContext;
use super::domain_event_trait::DomainEvent;
use super::metadata::Metadata;

/// 事件信封，包含事件载荷、元数据与业务上下文
#[derive(Debug, Clone)]
pub struct EventEnvelope<E>
where
    E: DomainEvent,
{
    pub metadata: Metadata,
    pub payload: E,
    pub context: BusinessContext,
}

impl<E> EventEnvelope<E>
where
    E: DomainEvent,
{
    pub fn new(dispatch_id: &str, command_type: &str, payload: E, context: BusinessContext) -> Self {
        let metadata = Metadata::builder()
            .event_id(Uuid::new_v4().to_string())
            .dispatch_id(dispatch_id.to_string())
            .command_type(command_type.to_string())
            .occurred_at(Utc::now())
            .build();

        Self {
            metadata,
            payload,
            context,
        }
    }

    /// 附加调用方的幂等键，随事件一同传播
    pub fn with_idempotency_key(mut self, key: Option<&str>) -> Self {
        self.metadata = self.metadata.with_idempotency_key(key.map(str::to_string));
        self
    }
}
