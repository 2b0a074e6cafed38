use crate::utils::{AttrKv, apply_derives, duplicate, lit_int, lit_str};
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, ItemEnum, ItemStruct, LitInt, LitStr, Result, Token, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[event] 宏实现
/// - 结构体：任意字段形态，事件类型默认取结构体名
/// - 枚举：任意变体形态，事件类型默认 `Enum.Variant`，变体可覆写类型与版本
/// - 生成 `::gate_domain::domain_event::DomainEvent` 实现（event_type / event_version）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let result = match &mut input {
        Item::Struct(st) => expand_struct(cfg, st),
        Item::Enum(en) => expand_enum(cfg, en),
        other => Err(syn::Error::new(other.span(), "#[event] only on struct or enum")),
    };

    match result {
        Ok(impl_block) => TokenStream::from(quote! {
            #input

            #impl_block
        }),
        Err(err) => err.to_compile_error().into(),
    }
}

// 合并/追加默认派生：Debug, Clone, Serialize
fn required_derives() -> Vec<syn::Path> {
    vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(::serde::Serialize),
    ]
}

fn expand_struct(cfg: EventAttrConfig, st: &mut ItemStruct) -> Result<proc_macro2::TokenStream> {
    apply_derives(&mut st.attrs, required_derives());

    let ident = &st.ident;
    let type_lit = cfg
        .event_type
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let version_lit = cfg.version.unwrap_or_else(|| syn::parse_quote! { 1 });
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::gate_domain::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            fn event_type(&self) -> &str {
                #type_lit
            }

            fn event_version(&self) -> usize {
                #version_lit
            }
        }
    })
}

fn expand_enum(cfg: EventAttrConfig, en: &mut ItemEnum) -> Result<proc_macro2::TokenStream> {
    if let Some(lit) = cfg.event_type {
        return Err(syn::Error::new(
            lit.span(),
            "'event_type' is not allowed on enums; set it per variant",
        ));
    }
    if en.variants.is_empty() {
        return Err(syn::Error::new(
            en.ident.span(),
            "#[event] requires at least one variant",
        ));
    }

    apply_derives(&mut en.attrs, required_derives());

    let default_version = cfg.version.unwrap_or_else(|| syn::parse_quote! { 1 });

    // 变体 -> 自定义事件类型名 / 版本
    let mut variant_types: HashMap<String, LitStr> = HashMap::new();
    let mut variant_versions: HashMap<String, LitInt> = HashMap::new();

    for v in &mut en.variants {
        let mut retained = Vec::new();
        for attr in v.attrs.drain(..) {
            if !attr.path().is_ident("event") {
                retained.push(attr);
                continue;
            }
            let overrides = parse_variant_event_attr(&attr)?;
            let key = v.ident.to_string();
            if let Some(lit) = overrides.event_type {
                if variant_types.insert(key.clone(), lit).is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "duplicate 'event_type' specified for this variant",
                    ));
                }
            }
            if let Some(lit) = overrides.event_version {
                if variant_versions.insert(key, lit).is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "duplicate 'event_version' specified for this variant",
                    ));
                }
            }
        }
        v.attrs = retained;
    }

    let enum_ident = &en.ident;
    let enum_name = enum_ident.to_string();

    let type_match_arms = en.variants.iter().map(|v| {
        let v_ident = &v.ident;
        let key = v_ident.to_string();
        match variant_types.get(&key) {
            Some(lit) => quote! { Self::#v_ident { .. } => #lit },
            None => {
                let lit = LitStr::new(&format!("{enum_name}.{key}"), v_ident.span());
                quote! { Self::#v_ident { .. } => #lit }
            }
        }
    });

    let ver_match_arms = en.variants.iter().map(|v| {
        let v_ident = &v.ident;
        match variant_versions.get(&v_ident.to_string()) {
            Some(lit) => quote! { Self::#v_ident { .. } => #lit },
            None => quote! { Self::#v_ident { .. } => #default_version },
        }
    });

    let (impl_generics, ty_generics, where_clause) = en.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::gate_domain::domain_event::DomainEvent for #enum_ident #ty_generics #where_clause {
            fn event_type(&self) -> &str {
                match self { #( #type_match_arms, )* }
            }

            fn event_version(&self) -> usize {
                match self { #( #ver_match_arms, )* }
            }
        }
    })
}

struct VariantEventAttrConfig {
    event_type: Option<LitStr>,
    event_version: Option<LitInt>,
}

fn parse_variant_event_attr(attr: &syn::Attribute) -> Result<VariantEventAttrConfig> {
    let syn::Meta::List(_) = &attr.meta else {
        return Err(syn::Error::new(attr.span(), "expected #[event(...)]"));
    };

    let mut event_type = None;
    let mut event_version = None;
    let pairs = attr.parse_args_with(Punctuated::<AttrKv, Token![,]>::parse_terminated)?;

    for kv in pairs {
        match kv.key.to_string().as_str() {
            "event_type" => {
                if event_type.is_some() {
                    return Err(duplicate(&kv.key));
                }
                event_type = Some(lit_str(kv.value, "event_type")?);
            }
            "event_version" => {
                if event_version.is_some() {
                    return Err(duplicate(&kv.key));
                }
                event_version = Some(lit_int(kv.value, "event_version")?);
            }
            _ => {
                return Err(syn::Error::new(
                    kv.key.span(),
                    "unknown key; expected 'event_type' | 'event_version'",
                ));
            }
        }
    }

    Ok(VariantEventAttrConfig {
        event_type,
        event_version,
    })
}

// 解析 event 宏键值参数：event_type = "<str>"、version = <int>
struct EventAttrConfig {
    event_type: Option<LitStr>,
    version: Option<LitInt>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut event_type = None;
        let mut version = None;

        let pairs = Punctuated::<AttrKv, Token![,]>::parse_terminated(input)?;
        for kv in pairs {
            match kv.key.to_string().as_str() {
                "event_type" => {
                    if event_type.is_some() {
                        return Err(duplicate(&kv.key));
                    }
                    event_type = Some(lit_str(kv.value, "event_type")?);
                }
                "version" => {
                    if version.is_some() {
                        return Err(duplicate(&kv.key));
                    }
                    version = Some(lit_int(kv.value, "version")?);
                }
                _ => {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "unknown key; expected 'event_type' | 'version'",
                    ));
                }
            }
        }

        Ok(Self {
            event_type,
            version,
        })
    }
}
