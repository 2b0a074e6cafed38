/// 应用层命令（Command）
///
/// 表达"意图"的写操作请求，通常会修改领域状态。
/// - 命令由唯一的处理器执行，执行结果为 `Output`（或失败）；
/// - 结果可能被转换为事件发布到总线，此时调用方拿到的是空结果；
/// - 建议保持语义化的"动宾结构"命名，如 `CreateUser`、`CloseOrder`。
///
/// 关联项：
/// - `NAME`：命令的稳定名称，用于日志、追踪与错误信息。避免依赖 `type_name::<T>()`。
/// - `Output`：处理器成功时返回的值类型。
///
/// 也可以使用 `gate_macros::command` 宏自动实现：
/// ```rust
/// use gate_application::command::Command;
/// use gate_macros::command;
///
/// #[command(output = u64)]
/// struct CreateUser {
///     name: String,
/// }
///
/// assert_eq!(<CreateUser as Command>::NAME, "CreateUser");
/// ```
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 命令执行成功时的返回值
    type Output: Send + 'static;
}
