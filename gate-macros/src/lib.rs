use proc_macro::TokenStream;

mod command;
mod event;
mod utils;

/// 命令宏
/// - 为目标类型实现 `::gate_application::command::Command`
/// - 支持参数：`#[command(output = T, name = "...")]`
///   - `output` 为处理器成功时的返回类型，默认 `()`
///   - `name` 为命令的稳定名称，默认取类型名
/// - 自动合并 `Debug` 派生
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}

/// 事件宏
/// - 为结构体或枚举实现 `::gate_domain::domain_event::DomainEvent`
/// - 结构体：`#[event(event_type = "...", version = N)]`，事件类型默认取结构体名
/// - 枚举：`#[event(version = N)]`，事件类型默认为 `Enum.Variant`，
///   变体可通过 `#[event(event_type = "...", event_version = N)]` 覆写
/// - 自动合并 `Debug`、`Clone`、`serde::Serialize` 派生
#[proc_macro_attribute]
pub fn event(attr: TokenStream, item: TokenStream) -> TokenStream {
    event::expand(attr, item)
}
