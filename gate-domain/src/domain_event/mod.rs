//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`），将事件与元数据/业务上下文
//! 封装后的 `EventEnvelope`，以及在总线上传输的标准形态 `SerializedEvent`。

mod business_context;
mod domain_event_trait;
mod event_envelope;
mod metadata;
mod serialized_event;

pub use business_context::BusinessContext;
pub use domain_event_trait::DomainEvent;
pub use event_envelope::EventEnvelope;
pub use metadata::Metadata;
pub use serialized_event::SerializedEvent;
