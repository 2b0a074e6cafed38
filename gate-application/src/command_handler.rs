use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;
use gate_domain::domain_event::DomainEvent;

/// 命令处理器：执行命令 `C` 并返回其结果
///
/// 命令以只读引用传入，处理器不持有命令的所有权。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: &C) -> Result<C::Output, AppError>;
}

/// 事件生产者：处理器声明在成功/失败时要发布的事件
///
/// - `event_on_success` 返回 `Some` 时，事件被发布，调用方得到空结果；
/// - `event_on_failure` 返回 `Some` 时，事件被发布，原始错误仍交还调用方。
///
/// 通过 `InMemoryHandlerRegistry::register_event_producer` 注册后生效。
pub trait EventProducer<C>: Send + Sync
where
    C: Command,
{
    type Event: DomainEvent;

    fn event_on_success(&self, output: &C::Output) -> Option<Self::Event>;

    fn event_on_failure(&self, error: &AppError) -> Option<Self::Event> {
        let _ = error;
        None
    }
}

/// 标记：处理器成功时的返回值本身就是事件
///
/// 仅对非 `EventProducer` 的处理器生效；通过
/// `InMemoryHandlerRegistry::register_returning_event` 注册后，
/// 返回值被发布到总线，调用方得到空结果。
pub trait ReturnEventOnSuccess {}
