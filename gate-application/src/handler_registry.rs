use crate::{command::Command, error::AppError, handler_descriptor::HandlerDescriptor};
use std::any::TypeId;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 命令查找键：命令的具体类型，附带其稳定名称用于日志与错误信息
#[derive(Debug, Clone, Copy)]
pub struct CommandKey {
    type_id: TypeId,
    name: &'static str,
}

impl CommandKey {
    pub fn of<C>() -> Self
    where
        C: Command,
    {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CommandKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CommandKey {}

impl Hash for CommandKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// 处理器注册表（Handler Registry）
///
/// - 根据命令键解析出对应的处理器描述；
/// - 未注册时返回 `AppError::HandlerNotFound`；
/// - 分发器不关心处理器如何被发现、注册与实例化。
pub trait HandlerRegistry: Send + Sync {
    fn resolve(&self, key: &CommandKey) -> Result<Arc<HandlerDescriptor>, AppError>;
}
