//! 命令网关应用层（gate-application）
//!
//! 命令分发流水线：解析处理器 -> 构建执行上下文 -> 经过有序拦截器链 -> 调用处理器，
//! 并可在返回路径上把结果或失败转换为事件发布到总线。
//!
//! - `command` / `command_handler`：命令、处理器与事件能力（`EventProducer`、`ReturnEventOnSuccess`）；
//! - `handler_registry` / `inmemory_handler_registry`：处理器注册表协议与内存实现；
//! - `execution`：单次分发的执行上下文；
//! - `interceptor`：拦截器链与内置拦截器；
//! - `gate`：`CommandBus` 的实现 `CommandGate`。
//!
// 供过程宏生成的 ::gate_application 路径在本 crate 内解析
extern crate self as gate_application;

pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod gate;
pub mod handler_descriptor;
pub mod handler_registry;
pub mod inmemory_handler_registry;
pub mod interceptor;

pub use gate::CommandGate;
pub use inmemory_handler_registry::InMemoryHandlerRegistry;

/// 常用类型的统一导入
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::command_bus::CommandBus;
    pub use crate::command_handler::{CommandHandler, EventProducer, ReturnEventOnSuccess};
    pub use crate::config::GateConfig;
    pub use crate::context::AppContext;
    pub use crate::error::{AppError, AppResult};
    pub use crate::gate::CommandGate;
    pub use crate::handler_descriptor::{HandlerCapability, HandlerDescriptor, HandlerRegistration};
    pub use crate::handler_registry::{CommandKey, HandlerRegistry};
    pub use crate::inmemory_handler_registry::InMemoryHandlerRegistry;
    pub use crate::interceptor::{CommandInterceptor, InterceptorChain, Next};
}
