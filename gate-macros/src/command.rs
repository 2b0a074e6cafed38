use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Ident, Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[command] 宏实现
/// - 支持结构体与枚举
/// - 生成 `::gate_application::command::Command` 实现（NAME / Output）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as CommandAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let (ident, generics) = match &mut input {
        Item::Struct(s) => {
            apply_derives(&mut s.attrs, vec![syn::parse_quote!(Debug)]);
            (s.ident.clone(), s.generics.clone())
        }
        Item::Enum(e) => {
            apply_derives(&mut e.attrs, vec![syn::parse_quote!(Debug)]);
            (e.ident.clone(), e.generics.clone())
        }
        other => {
            return syn::Error::new(other.span(), "#[command] only on struct or enum")
                .to_compile_error()
                .into();
        }
    };

    let output = cfg.output.unwrap_or_else(|| syn::parse_quote! { () });
    let name = cfg
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        #input

        impl #impl_generics ::gate_application::command::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Output = #output;
        }
    };

    TokenStream::from(out)
}

// 解析 command 宏键值参数：output = <Type>、name = "<str>"
struct CommandAttrConfig {
    output: Option<Type>,
    name: Option<LitStr>,
}

enum CommandAttrKv {
    Output(Ident, Type),
    Name(Ident, LitStr),
}

impl Parse for CommandAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        match key.to_string().as_str() {
            "output" => Ok(Self::Output(key, input.parse()?)),
            "name" => Ok(Self::Name(key, input.parse()?)),
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key; expected 'output' | 'name'",
            )),
        }
    }
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut output = None;
        let mut name = None;

        let pairs = Punctuated::<CommandAttrKv, Token![,]>::parse_terminated(input)?;
        for kv in pairs {
            match kv {
                CommandAttrKv::Output(key, ty) => {
                    if output.replace(ty).is_some() {
                        return Err(crate::utils::duplicate(&key));
                    }
                }
                CommandAttrKv::Name(key, lit) => {
                    if name.replace(lit).is_some() {
                        return Err(crate::utils::duplicate(&key));
                    }
                }
            }
        }

        Ok(Self { output, name })
    }
}
