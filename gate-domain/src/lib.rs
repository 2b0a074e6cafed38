//! 命令网关领域层基础库（gate-domain）
//!
//! 提供命令执行结果所对应的事件模型与事件传输协议：
//! - 领域事件（`domain_event`）：事件载荷接口、元数据、业务上下文与信封；
//! - 事件的标准序列化形态（`SerializedEvent`），用于在总线上传输；
//! - 事件系统（`eventing`）：事件总线协议与基于内存的广播实现；
//! - 统一错误类型（`error`）。
//!
//! 本 crate 不关心命令如何被路由与执行（见 `gate-application`），
//! 仅定义"命令结果 -> 事件 -> 总线"这一段所需的最小接口。
//!
//! 典型用法：
//! 1. 为事件类型实现 `DomainEvent`（或使用 `gate_macros::event`）；
//! 2. 通过 `EventEnvelope` 附加元数据与业务上下文，再转换为 `SerializedEvent`；
//! 3. 选择一个 `EventBus` 实现进行发布与订阅。
//!
pub mod domain_event;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;

// 允许在本 crate 内部通过 ::gate_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::gate_domain 路径。
extern crate self as gate_domain;
