use proc_macro::TokenStream;
use quote::quote;
use std::path::Path;
use syn::{LitStr, parse_macro_input};

const SUPPORTED: [&str; 3] = ["en", "bn", "zh"];

/// 嵌入目录（相对调用方 crate 的 manifest）下所有 `<lang>.json`，启动时安装为进程级翻译器
///
/// JSON 格式错误、根节点不是对象或语言代码不受支持时编译失败。
#[proc_macro]
pub fn i18n_assets(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match expand(&lit) {
        Ok(tokens) => tokens.into(),
        Err(msg) => syn::Error::new(lit.span(), msg).to_compile_error().into(),
    }
}

fn expand(lit: &LitStr) -> Result<proc_macro2::TokenStream, String> {
    let dir = lit.value();
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR is not set".to_string())?;

    let dir_path = Path::new(&manifest_dir).join(&dir);
    if !dir_path.is_dir() {
        return Err(format!("i18n directory not found: {}", dir_path.display()));
    }

    let pattern = format!("{}/*.json", dir_path.display());
    let entries = glob::glob(&pattern).map_err(|e| format!("bad locale pattern {pattern}: {e}"))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| format!("unreadable locale path: {e}"))?;
        if path.is_dir() {
            continue;
        }

        let lang_code = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| format!("locale file name is not UTF-8: {}", path.display()))?
            .to_string();
        if !SUPPORTED.contains(&lang_code.as_str()) {
            return Err(format!(
                "unsupported locale `{lang_code}` ({}), expected one of {SUPPORTED:?}",
                path.display()
            ));
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("read error for {}: {e}", path.display()))?;
        validate_locale(&content).map_err(|e| format!("{}: {e}", path.display()))?;

        // include_str! 让编译器跟踪文件变更
        let abs_path = path
            .canonicalize()
            .map_err(|e| format!("cannot resolve {}: {e}", path.display()))?;
        let abs_path_str = abs_path
            .to_str()
            .ok_or_else(|| format!("locale path is not UTF-8: {}", abs_path.display()))?
            .to_string();

        sources.push(quote! { (#lang_code, include_str!(#abs_path_str)) });
    }

    if sources.is_empty() {
        return Err(format!("no locale files found in {}", dir_path.display()));
    }

    Ok(quote! {
        #[::sourcely_core::ctor::ctor(crate_path = ::sourcely_core::ctor)]
        fn __sourcely_install_i18n() {
            ::sourcely_core::i18n::internal_init_i18n(&[ #(#sources),* ]);
        }
    })
}

fn validate_locale(content: &str) -> Result<(), String> {
    let tree: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    if !tree.is_object() {
        return Err("locale root must be a JSON object".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale(r#"{"navbar":{"home":"Home"}}"#).is_ok());
        assert!(validate_locale("{}").is_ok());

        let err = validate_locale(r#"["Home"]"#).unwrap_err();
        assert!(err.contains("JSON object"));

        let err = validate_locale(r#"{"navbar": "#).unwrap_err();
        assert!(err.starts_with("invalid JSON"));
    }
}
