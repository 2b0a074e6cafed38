//! 拦截器链（InterceptorChain）
//!
//! 洋葱模型：进入时按注册顺序执行，返回时按相反顺序观察结果。
//! 每个拦截器拿到执行上下文与代表"剩余链路"的延续 `Next`，可以：
//! - 调用一次 `next.run(exec)` 并对结果或失败做后处理；
//! - 不调用 `next`，直接返回自己的结果（短路）；
//! - 让失败继续向上传播（可选地转换）。
//!
//! `Next` 按值消费，因此同一次分发中终端处理器最多被调用一次。
//! 链在启动时构建一次，之后只读地在所有并发分发间共享。
//!
use super::{EventOutcomeInterceptor, LoggingInterceptor, ProfilingInterceptor};
use crate::config::GateConfig;
use crate::execution::{ExecutionContext, Outcome};
use async_trait::async_trait;
use gate_domain::eventing::EventBus;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// 命令拦截器
#[async_trait]
pub trait CommandInterceptor: Send + Sync {
    /// 拦截器名称（用于日志与调试）
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome;
}

/// 剩余链路的延续
pub struct Next<'a> {
    rest: &'a [Arc<dyn CommandInterceptor>],
}

impl<'a> Next<'a> {
    /// 执行剩余链路；链路耗尽时调用处理器本身
    pub async fn run(self, exec: &ExecutionContext<'_>) -> Outcome {
        match self.rest.split_first() {
            Some((head, rest)) => head.intercept(exec, Next { rest }).await,
            None => exec.handler().invoke(exec).await.map(Some),
        }
    }
}

/// 不可变的拦截器链
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Arc<[Arc<dyn CommandInterceptor>]>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Arc<dyn CommandInterceptor>>) -> Self {
        Self {
            interceptors: Arc::from(interceptors),
        }
    }

    pub fn builder() -> InterceptorChainBuilder {
        InterceptorChainBuilder::default()
    }

    /// 标准链：日志 -> 性能 -> 结果事件（最靠近处理器）
    ///
    /// 结果事件拦截器位于最内侧，外层拦截器观察到的是事件转换之后的结果。
    pub fn standard(event_bus: Arc<dyn EventBus>, config: &GateConfig) -> Self {
        let mut builder = Self::builder();
        if config.log_outcomes {
            builder = builder.with(LoggingInterceptor::new());
        }
        if config.profiling {
            builder = builder.with(ProfilingInterceptor::from_config(config));
        }
        if config.emit_outcome_events {
            builder = builder.with(EventOutcomeInterceptor::new(event_bus));
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 按执行顺序返回拦截器名称
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// 从链头开始执行一次分发
    pub async fn execute(&self, exec: &ExecutionContext<'_>) -> Outcome {
        Next {
            rest: &self.interceptors,
        }
        .run(exec)
        .await
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl FromIterator<Arc<dyn CommandInterceptor>> for InterceptorChain {
    fn from_iter<T: IntoIterator<Item = Arc<dyn CommandInterceptor>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InterceptorChainBuilder {
    interceptors: Vec<Arc<dyn CommandInterceptor>>,
}

impl InterceptorChainBuilder {
    /// 追加一个拦截器（位于已追加拦截器的内侧）
    pub fn with<I>(mut self, interceptor: I) -> Self
    where
        I: CommandInterceptor + 'static,
    {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_shared(mut self, interceptor: Arc<dyn CommandInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> InterceptorChain {
        InterceptorChain::new(self.interceptors)
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
    use std::sync::Mutex;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Probe {
        fail: bool,
    }

    impl Command for Probe {
        const NAME: &'static str = "Probe";
        type Output = u32;
    }

    struct ProbeHandler {
        journal: Journal,
    }

    #[async_trait]
    impl CommandHandler<Probe> for ProbeHandler {
        async fn handle(&self, _ctx: &AppContext, cmd: &Probe) -> Result<u32, AppError> {
            self.journal.lock().unwrap().push("handler".into());
            if cmd.fail {
                Err(AppError::Validation("probe failed".into()))
            } else {
                Ok(7)
            }
        }
    }

    struct Recording {
        label: &'static str,
        journal: Journal,
    }

    #[async_trait]
    impl CommandInterceptor for Recording {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome {
            self.journal.lock().unwrap().push(format!("{}:in", self.label));
            let outcome = next.run(exec).await;
            let seen = if outcome.is_ok() { "ok" } else { "err" };
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:out:{seen}", self.label));
            outcome
        }
    }

    struct ShortCircuit;

    #[async_trait]
    impl CommandInterceptor for ShortCircuit {
        async fn intercept(&self, _exec: &ExecutionContext<'_>, _next: Next<'_>) -> Outcome {
            Ok(Some(Box::new(99u32)))
        }
    }

    struct Recover;

    #[async_trait]
    impl CommandInterceptor for Recover {
        async fn intercept(&self, exec: &ExecutionContext<'_>, next: Next<'_>) -> Outcome {
            match next.run(exec).await {
                Err(AppError::Validation(_)) => Ok(Some(Box::new(0u32))),
                other => other,
            }
        }
    }

    fn recording(label: &'static str, journal: &Journal) -> Recording {
        Recording {
            label,
            journal: journal.clone(),
        }
    }

    async fn run(chain: &InterceptorChain, journal: &Journal, fail: bool) -> Outcome {
        let descriptor = HandlerRegistration::<Probe, _>::new(Arc::new(ProbeHandler {
            journal: journal.clone(),
        }))
        .build();
        let ctx = AppContext::default();
        let cmd = Probe { fail };
        let exec = ExecutionContext::new(&ctx, &cmd, &descriptor);
        chain.execute(&exec).await
    }

    fn output(outcome: Outcome) -> u32 {
        *outcome.unwrap().unwrap().downcast::<u32>().unwrap()
    }

    #[tokio::test]
    async fn interceptors_run_in_onion_order() {
        let journal = Journal::default();
        let chain = InterceptorChain::builder()
            .with(recording("A", &journal))
            .with(recording("B", &journal))
            .with(recording("C", &journal))
            .build();

        let outcome = run(&chain, &journal, false).await;

        assert_eq!(output(outcome), 7);
        assert_eq!(
            *journal.lock().unwrap(),
            vec![
                "A:in", "B:in", "C:in", "handler", "C:out:ok", "B:out:ok", "A:out:ok"
            ]
        );
        assert_eq!(chain.names(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn empty_chain_invokes_handler_directly() {
        let journal = Journal::default();
        let chain = InterceptorChain::default();
        assert!(chain.is_empty());

        assert_eq!(output(run(&chain, &journal, false).await), 7);
        assert_eq!(*journal.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn short_circuit_skips_handler_and_inner_links() {
        let journal = Journal::default();
        let chain = InterceptorChain::builder()
            .with(recording("A", &journal))
            .with(ShortCircuit)
            .with(recording("C", &journal))
            .build();

        let outcome = run(&chain, &journal, false).await;

        assert_eq!(output(outcome), 99);
        assert_eq!(*journal.lock().unwrap(), vec!["A:in", "A:out:ok"]);
    }

    #[tokio::test]
    async fn failure_propagates_through_every_out_phase() {
        let journal = Journal::default();
        let chain = InterceptorChain::builder()
            .with(recording("A", &journal))
            .with(recording("B", &journal))
            .build();

        let err = run(&chain, &journal, true).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "probe failed"));
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["A:in", "B:in", "handler", "B:out:err", "A:out:err"]
        );
    }

    #[tokio::test]
    async fn recovering_interceptor_turns_failure_into_result() {
        let journal = Journal::default();
        let chain = InterceptorChain::builder()
            .with(recording("A", &journal))
            .with(Recover)
            .with(recording("C", &journal))
            .build();

        let outcome = run(&chain, &journal, true).await;

        assert_eq!(output(outcome), 0);
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["A:in", "C:in", "handler", "C:out:err", "A:out:ok"]
        );
    }

    #[test]
    fn standard_chain_follows_config() {
        let bus: Arc<dyn EventBus> = Arc::new(gate_domain::eventing::InMemoryEventBus::new(4));

        let full = InterceptorChain::standard(bus.clone(), &GateConfig::default());
        assert_eq!(full.names(), vec!["logging", "profiling", "event_outcome"]);

        let config = GateConfig::builder()
            .profiling(false)
            .emit_outcome_events(false)
            .build();
        let lean = InterceptorChain::standard(bus, &config);
        assert_eq!(lean.names(), vec!["logging"]);
        assert_eq!(lean.len(), 1);
    }

    #[tokio::test]
    async fn chain_is_reusable_across_dispatches() {
        let journal = Journal::default();
        let first: Arc<dyn CommandInterceptor> = Arc::new(recording("A", &journal));
        let chain: InterceptorChain = std::iter::once(first).collect();
        let shared = chain.clone();

        assert_eq!(output(run(&chain, &journal, false).await), 7);
        assert_eq!(output(run(&shared, &journal, false).await), 7);
        assert_eq!(journal.lock().unwrap().len(), 6);
        assert_eq!(format!("{chain:?}"), r#"["A"]"#);
    }
}
