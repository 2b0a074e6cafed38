//! 事件总线（EventBus）协议
//!
//! 定义事件发布与订阅的统一抽象，支持批量发布与 'static 生命周期事件流，
//! 以便在异步运行时（如 tokio::spawn）中消费。
//!
//! 对发布方而言 `publish` 只是"交给总线"：订阅方何时、是否处理完成由总线自行保证，
//! 发布失败以 `DomainError::EventBus` 表示。
//!
use crate::{domain_event::SerializedEvent, error::DomainResult as Result};
use async_trait::async_trait;
use futures_core::stream::BoxStream;

/// 事件总线：负责分发事件与订阅事件流
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: &SerializedEvent) -> Result<()>;

    async fn publish_batch(&self, events: &[SerializedEvent]) -> Result<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    /// 返回一个 'static 生命周期的事件流，便于在 tokio::spawn 中使用
    async fn subscribe(&self) -> BoxStream<'static, Result<SerializedEvent>>;
}
