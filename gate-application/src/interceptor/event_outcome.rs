//! 结果事件拦截器（EventOutcomeInterceptor）
//!
//! 在返回路径上，根据处理器声明的事件能力把结果/失败转换为至多一个事件：
//!
//! | 能力 | 结果 | 行为 |
//! |---|---|---|
//! | EventProducer | 成功 | `event_on_success` 有事件则发布并返回空结果，否则原样返回 |
//! | EventProducer | 失败 | `event_on_failure` 有事件则发布；原始错误总是继续抛出 |
//! | ReturnEventOnSuccess | 成功 | 返回值本身作为事件发布，调用方得到空结果 |
//! | Executor | 成功 | 原样返回，不发布 |
//! | Executor / ReturnEventOnSuccess | 失败 | 不发布，原样抛出 |
//!
//! 发布是"交给总线即可"：总线错误只记录日志，不会变成分发失败，
//! 也不会替换原始结果或错误。
//!
use super::chain::{CommandInterceptor, Next};
use crate::error::AppError;
use crate::execution::{ExecutionContext, Outcome, Payload};
use crate::handler_descriptor::HandlerCapability;
use async_trait::async_trait;
use gate_domain::domain_event::SerializedEvent;
use gate_domain::eventing::EventBus;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct EventOutcomeInterceptor {
    event_bus: Arc<dyn EventBus>,
}

impl EventOutcomeInterceptor {
    pub fn new(event_bus: Arc<dyn EventBus>) -> Self {
        Self { event_bus }
    }

    async fn on_success(&self, exec: &ExecutionContext<'_>, output: Payload) -> Option<Payload> {
        let handler = exec.handler();

        match handler.capability() {
            HandlerCapability::EventProducer => {
                let decision = handler.event_on_success(exec, &*output);
                match decision {
                    Ok(Some(event)) => {
                        self.publish(exec, &event).await;
                        None
                    }
                    Ok(None) => {
                        debug!(
                            command = exec.command_name(),
                            dispatch_id = %exec.dispatch_id(),
                            "command is not returning any event on success"
                        );
                        Some(output)
                    }
                    Err(err) => {
                        warn!(
                            command = exec.command_name(),
                            dispatch_id = %exec.dispatch_id(),
                            error = %err,
                            "unable to build success event, result returned unchanged"
                        );
                        Some(output)
                    }
                }
            }
            HandlerCapability::ReturnEventOnSuccess => {
                let encoded = handler.output_as_event(exec, &*output);
                match encoded {
                    Ok(Some(event)) => {
                        info!(
                            command = exec.command_name(),
                            dispatch_id = %exec.dispatch_id(),
                            event_type = event.event_type(),
                            "command is sending its result as event"
                        );
                        self.publish(exec, &event).await;
                        None
                    }
                    Ok(None) => Some(output),
                    Err(err) => {
                        warn!(
                            command = exec.command_name(),
                            dispatch_id = %exec.dispatch_id(),
                            error = %err,
                            "unable to send result as event, result returned unchanged"
                        );
                        Some(output)
                    }
                }
            }
            HandlerCapability::Executor => Some(output),
        }
    }

    async fn on_failure(&self, exec: &ExecutionContext<'_>, failure: &AppError) {
        let handler = exec.handler();
        if !handler.is_event_producer() {
            return;
        }

        match handler.event_on_failure(exec, failure) {
            Ok(Some(event)) => {
                warn!(
                    command = exec.command_name(),
                    dispatch_id = %exec.dispatch_id(),
                    error = %failure,
                    "command has failed, sending an event"
                );
                self.publish(exec, &event).await;
            }
            Ok(None) => {
                warn!(
                    command = exec.command_name(),
                    dispatch_id = %exec.dispatch_id(),
                    error = %failure,
                    "no event sent in case of failure"
                );
            }
            Err(err) => {
                warn!(
                    command = exec.command_name(),
                    dispatch_id = %exec.dispatch_id(),
                    error = %err,
                    "unable to build failure event"
                );
            }
        }
    }

    async fn publish(&self, exec: &ExecutionContext<'_>, event: &SerializedEvent) {
        if let Err(err) = self.event_bus.publish(event).await {
            error!(
                command = exec.command_name(),
                dispatch_id = %exec.dispatch_id(),
                event_type = event.event_type(),
                event_id = event.event_id(),
                error = %err,
                "failed to publish event"
            );
        }
    }
}

#[async_trait]
impl CommandInterceptor for EventOutcomeInterceptor {
    fn name(&self) -> &'static str {
        "event_outcome"
    }

    async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome {
        match next.run(exec).await {
            Ok(Some(output)) => Ok(self.on_success(exec, output).await),
            // 内侧已给出空结果（短路或已转换），没有可供判断的返回值
            Ok(None) => Ok(None),
            Err(err) => {
                self.on_failure(exec, &err).await;
                Err(err)
            }
        }
    }
}
