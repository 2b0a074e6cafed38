//! 日志拦截器：记录命令分发的开始、完成与失败
//!
use super::chain::{CommandInterceptor, Next};
use crate::execution::{ExecutionContext, Outcome};
use async_trait::async_trait;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandInterceptor for LoggingInterceptor {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome {
        debug!(
            command = exec.command_name(),
            handler = exec.handler().handler_name(),
            dispatch_id = %exec.dispatch_id(),
            correlation_id = exec.app().correlation_id(),
            "dispatching command"
        );

        let outcome = next.run(exec).await;
        let elapsed_ms = exec.elapsed().as_millis() as u64;

        match &outcome {
            Ok(Some(_)) => info!(
                command = exec.command_name(),
                dispatch_id = %exec.dispatch_id(),
                elapsed_ms,
                "command completed"
            ),
            Ok(None) => info!(
                command = exec.command_name(),
                dispatch_id = %exec.dispatch_id(),
                elapsed_ms,
                "command completed with empty result"
            ),
            Err(err) => warn!(
                command = exec.command_name(),
                dispatch_id = %exec.dispatch_id(),
                elapsed_ms,
                error = %err,
                "command failed"
            ),
        }

        outcome
    }
}
