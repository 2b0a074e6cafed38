use crate::{
    command::Command,
    command_bus::CommandBus,
    config::GateConfig,
    context::AppContext,
    error::AppError,
    execution::ExecutionContext,
    handler_registry::{CommandKey, HandlerRegistry},
    interceptor::InterceptorChain,
};
use async_trait::async_trait;
use bon::Builder;
use gate_domain::eventing::EventBus;
use std::any::type_name;
use std::sync::Arc;
use tracing::Instrument;

/// 命令网关：CommandBus 的进程内实现
/// - 通过注册表解析处理器，构建执行上下文，交由拦截器链执行
/// - 自身不持有可变状态，可在任意多个任务中并发使用
#[derive(Builder, Clone)]
pub struct CommandGate {
    registry: Arc<dyn HandlerRegistry>,
    #[builder(default)]
    chain: InterceptorChain,
}

impl CommandGate {
    pub fn new(registry: Arc<dyn HandlerRegistry>, chain: InterceptorChain) -> Self {
        Self { registry, chain }
    }

    /// 使用标准拦截器链（日志、性能、结果事件）构建网关
    pub fn with_event_bus(
        registry: Arc<dyn HandlerRegistry>,
        event_bus: Arc<dyn EventBus>,
        config: &GateConfig,
    ) -> Self {
        Self::new(registry, InterceptorChain::standard(event_bus, config))
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }
}

#[async_trait]
impl CommandBus for CommandGate {
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<Option<C::Output>, AppError>
    where
        C: Command,
    {
        let handler = self.registry.resolve(&CommandKey::of::<C>())?;
        let exec = ExecutionContext::new(ctx, &cmd, &handler);

        let span = tracing::info_span!(
            "dispatch",
            command = C::NAME,
            dispatch_id = %exec.dispatch_id()
        );

        match self.chain.execute(&exec).instrument(span).await? {
            None => Ok(None),
            // 拦截器短路时可能给出与命令不符的结果类型
            Some(payload) => match payload.downcast::<C::Output>() {
                Ok(output) => Ok(Some(*output)),
                Err(_) => Err(AppError::TypeMismatch {
                    expected: type_name::<C::Output>(),
                    found: "unknown",
                }),
            },
        }
    }
}
