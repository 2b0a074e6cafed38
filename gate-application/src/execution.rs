//! 执行上下文（ExecutionContext）
//!
//! 每次分发创建一次，持有原始命令、解析出的处理器与本次执行的元信息，
//! 对所有拦截器只读；分发返回后即被丢弃。
//!
use crate::{
    command::Command, context::AppContext, error::AppError, handler_descriptor::HandlerDescriptor,
};
use chrono::{DateTime, Utc};
use gate_domain::domain_event::{DomainEvent, EventEnvelope, SerializedEvent};
use gate_domain::error::DomainError;
use std::any::Any;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// 类型擦除后的命令结果
pub type Payload = Box<dyn Any + Send>;

/// 拦截器链上流转的执行结果：`None` 表示空结果（例如已转换为事件）
pub type Outcome = Result<Option<Payload>, AppError>;

pub struct ExecutionContext<'a> {
    dispatch_id: Uuid,
    started_at: DateTime<Utc>,
    clock: Instant,
    app: &'a AppContext,
    command: &'a (dyn Any + Send + Sync),
    handler: &'a HandlerDescriptor,
}

impl<'a> ExecutionContext<'a> {
    pub fn new<C>(app: &'a AppContext, command: &'a C, handler: &'a HandlerDescriptor) -> Self
    where
        C: Command,
    {
        Self {
            dispatch_id: Uuid::new_v4(),
            started_at: Utc::now(),
            clock: Instant::now(),
            app,
            command,
            handler,
        }
    }

    /// 本次分发的唯一标识，会写入产生的事件
    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 自分发开始以来的耗时
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn app(&self) -> &'a AppContext {
        self.app
    }

    pub fn command_name(&self) -> &'static str {
        self.handler.command_name()
    }

    /// 以具体类型读取原始命令；类型不符时返回 `None`
    pub fn command<C>(&self) -> Option<&'a C>
    where
        C: Command,
    {
        self.command.downcast_ref::<C>()
    }

    pub(crate) fn raw_command(&self) -> &'a (dyn Any + Send + Sync) {
        self.command
    }

    pub fn handler(&self) -> &'a HandlerDescriptor {
        self.handler
    }

    /// 将事件包装为信封并序列化，继承调用方的业务上下文：
    /// 因果ID 指向本次分发，并记录到目前为止的执行耗时；幂等键随事件传播。
    pub fn to_event<E>(&self, event: E) -> Result<SerializedEvent, AppError>
    where
        E: DomainEvent,
    {
        let dispatch_id = self.dispatch_id.to_string();
        let context = self
            .app
            .biz
            .caused_by(&dispatch_id, self.elapsed().as_millis());
        let envelope = EventEnvelope::new(&dispatch_id, self.command_name(), event, context)
            .with_idempotency_key(self.app.idempotency_key.as_deref());
        let event = SerializedEvent::try_from(&envelope).map_err(DomainError::from)?;
        Ok(event)
    }
}
