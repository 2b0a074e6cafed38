use serde::Serialize;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 事件只要求可序列化：发布前会被转换为 [`SerializedEvent`](super::SerializedEvent)，
/// 订阅方按 `event_type` 自行反序列化。
pub trait DomainEvent: fmt::Debug + Serialize + Send + Sync {
    /// 事件类型（形如 `OrderEvent.Created` 或自定义类型名）
    fn event_type(&self) -> &str;

    /// 事件载荷版本（用于版本兼容）
    fn event_version(&self) -> usize {
        1
    }
}

impl<T> DomainEvent for &T
where
    T: DomainEvent + ?Sized,
{
    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn event_version(&self) -> usize {
        (**self).event_version()
    }
}
