//! 网关配置（GateConfig）
//!
//! 控制标准拦截器链的组成与慢命令阈值；可由 serde 从任意配置源反序列化，
//! 缺失的字段取默认值。
//!
use bon::Builder;
use serde::Deserialize;
use std::time::Duration;

#[derive(Builder, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// 慢命令阈值（毫秒），超过时 `ProfilingInterceptor` 告警
    #[builder(default = 500)]
    pub slow_command_threshold_ms: u64,
    /// 标准链中是否包含 `ProfilingInterceptor`
    #[builder(default = true)]
    pub profiling: bool,
    /// 标准链中是否包含 `EventOutcomeInterceptor`
    #[builder(default = true)]
    pub emit_outcome_events: bool,
    /// 标准链中是否包含 `LoggingInterceptor`
    #[builder(default = true)]
    pub log_outcomes: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GateConfig {
    pub fn slow_command_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_command_threshold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_standard_interceptor() {
        let config = GateConfig::default();
        assert_eq!(config.slow_command_threshold_ms, 500);
        assert!(config.profiling);
        assert!(config.emit_outcome_events);
        assert!(config.log_outcomes);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GateConfig =
            serde_json::from_str(r#"{ "slow_command_threshold_ms": 50, "profiling": false }"#)
                .unwrap();

        assert_eq!(config.slow_command_threshold(), Duration::from_millis(50));
        assert!(!config.profiling);
        assert!(config.emit_outcome_events);
        assert!(config.log_outcomes);
    }
}
