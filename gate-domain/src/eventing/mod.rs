//! 事件子系统（eventing）
//!
//! 提供事件发布/订阅的基础抽象：
//! - `EventBus`：统一发布/订阅接口；
//! - `InMemoryEventBus`：基于 tokio broadcast 的进程内实现。
//!
//! 该模块仅定义协议，不绑定具体传输实现，可对接任意消息系统或内存实现。
//!
pub mod bus;
pub mod bus_inmemory;

pub use bus::EventBus;
pub use bus_inmemory::InMemoryEventBus;
