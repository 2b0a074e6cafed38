use bon::Builder;
use serde::{Deserialize, Serialize};

/// 业务上下文信息
///
/// 由调用方随命令一起传入，并被复制到命令产生的事件上。
#[derive(Builder, Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 业务耗时
    duration_ms: Option<u128>,
    /// 触发命令的主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 触发命令的主体ID
    actor_id: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn duration_ms(&self) -> Option<u128> {
        self.duration_ms
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// 派生出"由某次执行引起"的上下文：
    /// - 因果ID 替换为 `cause`；
    /// - 关联ID 缺失时沿用 `cause`，保证同一业务链路可被串联；
    /// - 记录本次执行耗时。
    pub fn caused_by(&self, cause: &str, duration_ms: u128) -> Self {
        Self {
            correlation_id: self
                .correlation_id
                .clone()
                .or_else(|| Some(cause.to_string())),
            causation_id: Some(cause.to_string()),
            duration_ms: Some(duration_ms),
            actor_type: self.actor_type.clone(),
            actor_id: self.actor_id.clone(),
        }
    }
}
