//! 拦截器（Interceptor）
//!
//! 命令在到达处理器之前/之后经过一条有序的拦截器链：
//! - `chain`：拦截器协议、延续 `Next` 与不可变的 `InterceptorChain`；
//! - `event_outcome`：把处理器的结果/失败转换为事件并发布；
//! - `logging`：记录分发开始、完成与失败；
//! - `profiling`：统计执行耗时并对慢命令告警。
//!
pub mod chain;
pub mod event_outcome;
pub mod logging;
pub mod profiling;

#[cfg(test)]
mod log_capture;

pub use chain::{CommandInterceptor, InterceptorChain, InterceptorChainBuilder, Next};
pub use event_outcome::EventOutcomeInterceptor;
pub use logging::LoggingInterceptor;
pub use profiling::ProfilingInterceptor;
