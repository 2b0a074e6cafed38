//! 处理器描述（HandlerDescriptor）
//!
//! 注册时把具体的 `CommandHandler<C>` 擦除为可被拦截器链统一调度的描述对象，
//! 并在同一时刻声明处理器的事件能力：
//! - `EventProducer`：由处理器决定成功/失败时发布的事件；
//! - `ReturnEventOnSuccess`：成功时的返回值本身即事件。
//!
//! 能力在注册时通过 trait 约束确定，运行期只需读取描述，无需反射。
//!
use crate::{
    command::Command,
    command_handler::{CommandHandler, EventProducer, ReturnEventOnSuccess},
    context::AppContext,
    error::AppError,
    execution::{ExecutionContext, Payload},
    handler_registry::CommandKey,
};
use async_trait::async_trait;
use gate_domain::domain_event::{DomainEvent, SerializedEvent};
use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 处理器在事件方面的能力（按判定优先级排列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerCapability {
    /// 普通执行器：结果原样返回，不产生事件
    Executor,
    /// 事件生产者：优先于标记生效
    EventProducer,
    /// 成功返回值即事件
    ReturnEventOnSuccess,
}

impl fmt::Display for HandlerCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executor => f.write_str("executor"),
            Self::EventProducer => f.write_str("event_producer"),
            Self::ReturnEventOnSuccess => f.write_str("return_event_on_success"),
        }
    }
}

#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &AppContext,
        command: &(dyn Any + Send + Sync),
    ) -> Result<Payload, AppError>;
}

trait ErasedEventProducer: Send + Sync {
    fn event_on_success(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<Option<SerializedEvent>, AppError>;

    fn event_on_failure(
        &self,
        exec: &ExecutionContext<'_>,
        error: &AppError,
    ) -> Result<Option<SerializedEvent>, AppError>;
}

trait ErasedOutputEvent: Send + Sync {
    fn encode(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<SerializedEvent, AppError>;
}

struct Typed<C, H> {
    handler: Arc<H>,
    _command: PhantomData<fn(&C)>,
}

impl<C, H> Typed<C, H> {
    fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            _command: PhantomData,
        }
    }
}

fn downcast_output<C>(output: &(dyn Any + Send)) -> Result<&C::Output, AppError>
where
    C: Command,
{
    output
        .downcast_ref::<C::Output>()
        .ok_or(AppError::TypeMismatch {
            expected: type_name::<C::Output>(),
            found: "unknown",
        })
}

#[async_trait]
impl<C, H> ErasedHandler for Typed<C, H>
where
    C: Command,
    H: CommandHandler<C> + 'static,
{
    async fn handle(
        &self,
        ctx: &AppContext,
        command: &(dyn Any + Send + Sync),
    ) -> Result<Payload, AppError> {
        // 键与适配器同一泛型 C，正常情况下不会失败
        let Some(cmd) = command.downcast_ref::<C>() else {
            return Err(AppError::TypeMismatch {
                expected: C::NAME,
                found: "unknown",
            });
        };

        let output = self.handler.handle(ctx, cmd).await?;
        Ok(Box::new(output))
    }
}

impl<C, H> ErasedEventProducer for Typed<C, H>
where
    C: Command,
    H: EventProducer<C> + 'static,
{
    fn event_on_success(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<Option<SerializedEvent>, AppError> {
        let output = downcast_output::<C>(output)?;
        self.handler
            .event_on_success(output)
            .map(|event| exec.to_event(event))
            .transpose()
    }

    fn event_on_failure(
        &self,
        exec: &ExecutionContext<'_>,
        error: &AppError,
    ) -> Result<Option<SerializedEvent>, AppError> {
        self.handler
            .event_on_failure(error)
            .map(|event| exec.to_event(event))
            .transpose()
    }
}

struct OutputEvent<C>(PhantomData<fn(&C)>);

impl<C> ErasedOutputEvent for OutputEvent<C>
where
    C: Command,
    C::Output: DomainEvent,
{
    fn encode(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<SerializedEvent, AppError> {
        let output = downcast_output::<C>(output)?;
        exec.to_event(output)
    }
}

/// 已注册处理器的类型擦除描述
pub struct HandlerDescriptor {
    key: CommandKey,
    handler_name: &'static str,
    handler: Arc<dyn ErasedHandler>,
    event_producer: Option<Arc<dyn ErasedEventProducer>>,
    output_event: Option<Arc<dyn ErasedOutputEvent>>,
}

impl HandlerDescriptor {
    pub fn key(&self) -> CommandKey {
        self.key
    }

    pub fn command_name(&self) -> &'static str {
        self.key.name()
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    /// 生效的事件能力：`EventProducer` 优先于 `ReturnEventOnSuccess`
    pub fn capability(&self) -> HandlerCapability {
        if self.event_producer.is_some() {
            HandlerCapability::EventProducer
        } else if self.output_event.is_some() {
            HandlerCapability::ReturnEventOnSuccess
        } else {
            HandlerCapability::Executor
        }
    }

    pub fn is_event_producer(&self) -> bool {
        self.event_producer.is_some()
    }

    /// 是否声明了 `ReturnEventOnSuccess`（与是否为事件生产者无关）
    pub fn returns_event_on_success(&self) -> bool {
        self.output_event.is_some()
    }

    /// 终端步骤：调用处理器本身
    pub(crate) async fn invoke(&self, exec: &ExecutionContext<'_>) -> Result<Payload, AppError> {
        self.handler.handle(exec.app(), exec.raw_command()).await
    }

    /// 询问事件生产者成功时的事件；非事件生产者恒为 `Ok(None)`
    pub fn event_on_success(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<Option<SerializedEvent>, AppError> {
        match &self.event_producer {
            Some(producer) => producer.event_on_success(exec, output),
            None => Ok(None),
        }
    }

    /// 询问事件生产者失败时的事件；非事件生产者恒为 `Ok(None)`
    pub fn event_on_failure(
        &self,
        exec: &ExecutionContext<'_>,
        error: &AppError,
    ) -> Result<Option<SerializedEvent>, AppError> {
        match &self.event_producer {
            Some(producer) => producer.event_on_failure(exec, error),
            None => Ok(None),
        }
    }

    /// 把成功返回值编码为事件；未声明 `ReturnEventOnSuccess` 时为 `Ok(None)`
    pub fn output_as_event(
        &self,
        exec: &ExecutionContext<'_>,
        output: &(dyn Any + Send),
    ) -> Result<Option<SerializedEvent>, AppError> {
        match &self.output_event {
            Some(encoder) => encoder.encode(exec, output).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("command", &self.command_name())
            .field("handler", &self.handler_name)
            .field("capability", &self.capability())
            .finish()
    }
}

/// 处理器注册信息：在注册时声明处理器的事件能力
///
/// ```rust
/// # use std::sync::Arc;
/// # use async_trait::async_trait;
/// # use gate_application::prelude::*;
/// # use gate_macros::{command, event};
/// #[command(output = Shipped)]
/// struct Ship;
///
/// #[event]
/// struct Shipped;
///
/// struct ShipHandler;
///
/// #[async_trait]
/// impl CommandHandler<Ship> for ShipHandler {
///     async fn handle(&self, _ctx: &AppContext, _cmd: &Ship) -> Result<Shipped, AppError> {
///         Ok(Shipped)
///     }
/// }
///
/// impl ReturnEventOnSuccess for ShipHandler {}
///
/// let descriptor = HandlerRegistration::<Ship, _>::new(Arc::new(ShipHandler))
///     .return_event_on_success()
///     .build();
/// assert_eq!(descriptor.capability(), HandlerCapability::ReturnEventOnSuccess);
/// ```
pub struct HandlerRegistration<C, H> {
    handler: Arc<H>,
    event_producer: Option<Arc<dyn ErasedEventProducer>>,
    output_event: Option<Arc<dyn ErasedOutputEvent>>,
    _command: PhantomData<fn(&C)>,
}

impl<C, H> HandlerRegistration<C, H>
where
    C: Command,
    H: CommandHandler<C> + 'static,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            event_producer: None,
            output_event: None,
            _command: PhantomData,
        }
    }

    /// 声明处理器为事件生产者
    pub fn event_producer(mut self) -> Self
    where
        H: EventProducer<C>,
    {
        self.event_producer = Some(Arc::new(Typed::<C, H>::new(self.handler.clone())));
        self
    }

    /// 声明处理器成功时的返回值即事件
    pub fn return_event_on_success(mut self) -> Self
    where
        H: ReturnEventOnSuccess,
        C::Output: DomainEvent,
    {
        self.output_event = Some(Arc::new(OutputEvent::<C>(PhantomData)));
        self
    }

    pub fn build(self) -> HandlerDescriptor {
        HandlerDescriptor {
            key: CommandKey::of::<C>(),
            handler_name: type_name::<H>(),
            handler: Arc::new(Typed::<C, H>::new(self.handler)),
            event_producer: self.event_producer,
            output_event: self.output_event,
        }
    }
}
