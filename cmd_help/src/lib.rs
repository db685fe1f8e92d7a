use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, parse_macro_input};

/// 提取文档注释，每行去掉`///`后紧跟的一个空格。
fn extract_doc(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("doc")
            && let syn::Meta::NameValue(nv) = &attr.meta
            && let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = &nv.value
        {
            let line = s.value();
            lines.push(line.strip_prefix(' ').unwrap_or(&line).to_string());
        }
    }
    lines.join("\n")
}

/// 提取文档中声明的命令名：顶格书写的行，第一个单词去掉`[!]`前缀后的字母部分。
///
/// ```text
/// [!]upper        -> upper
/// num[ [!]float]  -> num
/// file <file>     -> file
/// ```
fn extract_cmds(doc: &str) -> Vec<String> {
    let mut cmds: Vec<String> = Vec::new();
    for line in doc.lines().filter(|line| !line.is_empty() && !line.starts_with(char::is_whitespace)) {
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let name: String = token
            .trim_start_matches("[!]")
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if !name.is_empty() && !cmds.contains(&name) {
            cmds.push(name);
        }
    }
    cmds
}

#[proc_macro_derive(CmdHelp)]
pub fn cmd_help_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_name = &input.ident;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        return syn::Error::new_spanned(enum_name, "CmdHelp can only be derived on enums").to_compile_error().into();
    };

    // ===========================================
    // 1. 生成 all_help()：返回所有 (name, doc) 对
    // ===========================================
    let all_help_entries = variants.iter().map(|v| {
        let name = v.ident.to_string();
        let doc = extract_doc(&v.attrs);
        quote! {
            (#name, #doc)
        }
    });

    // ===========================================
    // 2. 生成 help_of(cmd)：按命令名查找帮助
    // ===========================================
    let lookup_entries = variants.iter().map(|v| {
        let doc = extract_doc(&v.attrs);
        let cmds = extract_cmds(&doc);
        quote! {
            (&[#(#cmds),*], #doc)
        }
    });

    let expanded = quote! {
        impl #enum_name {
            /// 获取全部帮助信息：[(name, help), ...]
            pub fn all_help() -> &'static [(&'static str, &'static str)] {
                &[
                    #(#all_help_entries),*
                ]
            }

            /// 获取命令的帮助信息，命令名忽略ASCII大小写。
            pub fn help_of(cmd: &str) -> Option<&'static str> {
                const ENTRIES: &[(&[&str], &str)] = &[
                    #(#lookup_entries),*
                ];
                ENTRIES
                    .iter()
                    .find(|(cmds, _)| cmds.iter().any(|name| name.eq_ignore_ascii_case(cmd)))
                    .map(|(_, doc)| *doc)
            }
        }
    };

    TokenStream::from(expanded)
}
