use crate::{
    command::Command,
    command_handler::{CommandHandler, EventProducer, ReturnEventOnSuccess},
    error::AppError,
    handler_descriptor::{HandlerDescriptor, HandlerRegistration},
    handler_registry::{CommandKey, HandlerRegistry},
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use gate_domain::domain_event::DomainEvent;
use std::any::TypeId;
use std::sync::Arc;

/// 基于内存的处理器注册表
/// - 通过 TypeId 注册不同 Command 对应的处理器
/// - 注册应在分发流量开始前完成；同一命令重复注册返回错误
pub struct InMemoryHandlerRegistry {
    handlers: DashMap<TypeId, Arc<HandlerDescriptor>>,
}

impl Default for InMemoryHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册普通命令处理器
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        self.register_descriptor(HandlerRegistration::<C, H>::new(handler).build())
    }

    /// 注册同时是事件生产者的命令处理器
    pub fn register_event_producer<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + EventProducer<C> + 'static,
    {
        self.register_descriptor(
            HandlerRegistration::<C, H>::new(handler)
                .event_producer()
                .build(),
        )
    }

    /// 注册"成功返回值即事件"的命令处理器
    pub fn register_returning_event<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        C::Output: DomainEvent,
        H: CommandHandler<C> + ReturnEventOnSuccess + 'static,
    {
        self.register_descriptor(
            HandlerRegistration::<C, H>::new(handler)
                .return_event_on_success()
                .build(),
        )
    }

    /// 注册已构建好的处理器描述
    pub fn register_descriptor(&self, descriptor: HandlerDescriptor) -> Result<(), AppError> {
        let key = descriptor.key();

        match self.handlers.entry(key.type_id()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredCommand {
                command: key.name(),
            }),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    command = descriptor.command_name(),
                    handler = descriptor.handler_name(),
                    capability = %descriptor.capability(),
                    "handler registered"
                );
                slot.insert(Arc::new(descriptor));
                Ok(())
            }
        }
    }

    pub fn contains<C>(&self) -> bool
    where
        C: Command,
    {
        self.handlers.contains_key(&TypeId::of::<C>())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 获取已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().command_name()).collect()
    }
}

impl HandlerRegistry for InMemoryHandlerRegistry {
    fn resolve(&self, key: &CommandKey) -> Result<Arc<HandlerDescriptor>, AppError> {
        self.handlers
            .get(&key.type_id())
            .map(|h| h.clone())
            .ok_or(AppError::HandlerNotFound(key.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;
    use crate::handler_descriptor::HandlerCapability;
    use async_trait::async_trait;
    use serde::Serialize;

    struct Rename;

    impl Command for Rename {
        const NAME: &'static str = "Rename";
        type Output = Renamed;
    }

    #[derive(Debug, Serialize)]
    struct Renamed;

    impl DomainEvent for Renamed {
        fn event_type(&self) -> &str {
            "Renamed"
        }
    }

    struct Archive;

    impl Command for Archive {
        const NAME: &'static str = "Archive";
        type Output = ();
    }

    struct RenameHandler;

    #[async_trait]
    impl CommandHandler<Rename> for RenameHandler {
        async fn handle(&self, _ctx: &AppContext, _cmd: &Rename) -> Result<Renamed, AppError> {
            Ok(Renamed)
        }
    }

    impl EventProducer<Rename> for RenameHandler {
        type Event = Renamed;

        fn event_on_success(&self, _output: &Renamed) -> Option<Renamed> {
            Some(Renamed)
        }
    }

    impl ReturnEventOnSuccess for RenameHandler {}

    #[test]
    fn resolve_returns_registered_descriptor() {
        let registry = InMemoryHandlerRegistry::new();
        registry.register::<Rename, _>(Arc::new(RenameHandler)).unwrap();

        let descriptor = registry.resolve(&CommandKey::of::<Rename>()).unwrap();
        assert_eq!(descriptor.command_name(), "Rename");
        assert!(descriptor.handler_name().ends_with("RenameHandler"));
        assert_eq!(descriptor.capability(), HandlerCapability::Executor);
        assert!(registry.contains::<Rename>());
        assert!(!registry.contains::<Archive>());
        assert_eq!(registry.registered_commands(), vec!["Rename"]);
    }

    #[test]
    fn resolve_unregistered_is_handler_not_found() {
        let registry = InMemoryHandlerRegistry::new();
        assert!(registry.is_empty());

        let err = registry.resolve(&CommandKey::of::<Archive>()).unwrap_err();
        match err {
            AppError::HandlerNotFound(name) => assert_eq!(name, "Archive"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = InMemoryHandlerRegistry::new();
        registry.register::<Rename, _>(Arc::new(RenameHandler)).unwrap();

        let err = registry
            .register_event_producer::<Rename, _>(Arc::new(RenameHandler))
            .unwrap_err();
        match err {
            AppError::AlreadyRegisteredCommand { command } => assert_eq!(command, "Rename"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn capabilities_follow_registration() {
        let producer = InMemoryHandlerRegistry::new();
        producer
            .register_event_producer::<Rename, _>(Arc::new(RenameHandler))
            .unwrap();
        let d = producer.resolve(&CommandKey::of::<Rename>()).unwrap();
        assert_eq!(d.capability(), HandlerCapability::EventProducer);
        assert!(!d.returns_event_on_success());

        let marked = InMemoryHandlerRegistry::new();
        marked
            .register_returning_event::<Rename, _>(Arc::new(RenameHandler))
            .unwrap();
        let d = marked.resolve(&CommandKey::of::<Rename>()).unwrap();
        assert_eq!(d.capability(), HandlerCapability::ReturnEventOnSuccess);

        let both = HandlerRegistration::<Rename, _>::new(Arc::new(RenameHandler))
            .return_event_on_success()
            .event_producer()
            .build();
        assert_eq!(both.capability(), HandlerCapability::EventProducer);
        assert!(both.is_event_producer());
        assert!(both.returns_event_on_success());
    }
}
