//! 性能拦截器：统计内侧链路与处理器的耗时，超过阈值时告警
//!
use super::chain::{CommandInterceptor, Next};
use crate::config::GateConfig;
use crate::execution::{ExecutionContext, Outcome};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy)]
pub struct ProfilingInterceptor {
    slow_threshold: Duration,
}

impl ProfilingInterceptor {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.slow_command_threshold())
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    pub fn is_slow(&self, elapsed: Duration) -> bool {
        elapsed > self.slow_threshold
    }
}

impl Default for ProfilingInterceptor {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}

#[async_trait]
impl CommandInterceptor for ProfilingInterceptor {
    fn name(&self) -> &'static str {
        "profiling"
    }

    async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome {
        let started = Instant::now();
        let outcome = next.run(exec).await;
        let elapsed = started.elapsed();

        if self.is_slow(elapsed) {
            warn!(
                command = exec.command_name(),
                dispatch_id = %exec.dispatch_id(),
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.slow_threshold.as_millis() as u64,
                "slow command"
            );
        } else {
            trace!(
                command = exec.command_name(),
                elapsed_us = elapsed.as_micros() as u64,
                "command profiled"
            );
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::command_handler::CommandHandler;
    use crate::context::AppContext;
    use crate::error::AppError;
    use crate::handler_descriptor::HandlerRegistration;
    use crate::interceptor::InterceptorChain;
    use crate::interceptor::log_capture::{capture, messages_at};
    use std::sync::Arc;
    use tracing::Level;

    struct Nap;

    impl Command for Nap {
        const NAME: &'static str = "Nap";
        type Output = u8;
    }

    struct NapHandler;

    #[async_trait]
    impl CommandHandler<Nap> for NapHandler {
        async fn handle(&self, _ctx: &AppContext, _cmd: &Nap) -> Result<u8, AppError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(1)
        }
    }

    async fn nap(profiling: ProfilingInterceptor) -> Outcome {
        let descriptor = HandlerRegistration::<Nap, _>::new(Arc::new(NapHandler)).build();
        let chain = InterceptorChain::builder().with(profiling).build();
        let ctx = AppContext::default();
        let exec = ExecutionContext::new(&ctx, &Nap, &descriptor);
        chain.execute(&exec).await
    }

    #[tokio::test]
    async fn slow_command_is_reported_and_result_kept() {
        let (_guard, records) = capture();

        let outcome = nap(ProfilingInterceptor::new(Duration::ZERO)).await;

        assert_eq!(*outcome.unwrap().unwrap().downcast::<u8>().unwrap(), 1);
        assert_eq!(messages_at(&records, Level::WARN), vec!["slow command"]);
    }

    #[tokio::test]
    async fn fast_command_is_only_traced() {
        let (_guard, records) = capture();

        let outcome = nap(ProfilingInterceptor::new(Duration::from_secs(10))).await;

        assert!(outcome.unwrap().is_some());
        assert!(messages_at(&records, Level::WARN).is_empty());
        assert_eq!(messages_at(&records, Level::TRACE), vec!["command profiled"]);
    }

    #[test]
    fn threshold_comes_from_config() {
        let config = GateConfig::builder().slow_command_threshold_ms(20).build();
        let profiling = ProfilingInterceptor::from_config(&config);

        assert_eq!(profiling.slow_threshold(), Duration::from_millis(20));
        assert!(!profiling.is_slow(Duration::from_millis(20)));
        assert!(profiling.is_slow(Duration::from_millis(21)));
    }

    #[test]
    fn default_threshold_is_half_a_second() {
        assert_eq!(
            ProfilingInterceptor::default().slow_threshold(),
            Duration::from_millis(500)
        );
    }
}
