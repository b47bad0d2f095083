pub mod dictionary;
mod template;
pub mod translator;

use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

use crate::lang::Lang;

pub use dictionary::Dictionary;
pub use translator::Translator;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to read locales from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid locale JSON for {lang}: {source}")]
    Parse {
        lang: Lang,
        #[source]
        source: serde_json::Error,
    },
    #[error("locale {0} must be a JSON object at the root")]
    NotAnObject(Lang),
    #[error("no dictionary for default language {0}")]
    MissingDefault(Lang),
}

static I18N_STORE: OnceLock<Translator> = OnceLock::new();

/// 安装进程级翻译器，只有第一次调用生效
pub fn install(translator: Translator) -> bool {
    if I18N_STORE.set(translator).is_err() {
        log::error!("I18N_STORE already initialized");
        return false;
    }
    true
}

/// 进程级翻译器，未安装时为 `None`
pub fn global() -> Option<&'static Translator> {
    I18N_STORE.get()
}

/// `i18n_assets!` 生成的初始化代码调用的内部接口
pub fn internal_init_i18n(sources: &[(&'static str, &'static str)]) {
    match Translator::from_embedded(sources) {
        Ok(translator) => {
            install(translator);
        }
        Err(e) => log::error!("Failed to install embedded locales: {}", e),
    }
}
