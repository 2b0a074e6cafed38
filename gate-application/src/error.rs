use gate_domain::error::DomainError;

/// 应用层错误
///
/// - `HandlerNotFound`：命令没有注册处理器，分发立即失败；
/// - 处理器自身返回的任何错误都原样穿过拦截器链交还调用方；
/// - 事件发布失败属于总线（`DomainError::EventBus`），不会被当作分发失败。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("authorization: {0}")]
    Authorization(String),

    #[error("infra: {0}")]
    Infra(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub type AppResult<T> = Result<T, AppError>;
