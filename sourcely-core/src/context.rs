use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::lang::{DEFAULT_LANG, Lang};
use crate::storage::{ClientStorage, LANGUAGE_KEY};

/// 当前界面语言及其持久化存储
///
/// 持久化失败只记日志，不影响内存中的语言。
pub struct LanguageContext {
    current: RwLock<Lang>,
    bengali_font: AtomicBool,
    storage: Arc<dyn ClientStorage>,
}

impl std::fmt::Debug for LanguageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageContext")
            .field("current", &self.current())
            .field("bengali_font", &self.bengali_font())
            .finish_non_exhaustive()
    }
}

impl LanguageContext {
    /// 从存储恢复语言，无可用值时为默认语言
    pub fn restore(storage: Arc<dyn ClientStorage>) -> Self {
        let lang = match storage.get(LANGUAGE_KEY) {
            Ok(Some(code)) => Lang::from_code(&code).unwrap_or_else(|| {
                log::warn!("Ignoring stored language {:?}, using {}", code, DEFAULT_LANG);
                DEFAULT_LANG
            }),
            Ok(None) => DEFAULT_LANG,
            Err(e) => {
                log::error!("Failed to read stored language: {}", e);
                DEFAULT_LANG
            }
        };

        Self {
            current: RwLock::new(lang),
            bengali_font: AtomicBool::new(lang.uses_bengali_font()),
            storage,
        }
    }

    pub fn current(&self) -> Lang {
        self.current.read().map(|l| *l).unwrap_or(DEFAULT_LANG)
    }

    /// 切换语言、写入存储并切换孟加拉语字体标记
    pub fn set_language(&self, lang: Lang) {
        match self.current.write() {
            Ok(mut current) => *current = lang,
            Err(poisoned) => *poisoned.into_inner() = lang,
        }
        self.bengali_font
            .store(lang.uses_bengali_font(), Ordering::Relaxed);

        if let Err(e) = self.storage.set(LANGUAGE_KEY, lang.code()) {
            log::error!("Failed to persist language {}: {}", lang, e);
        }
    }

    pub fn bengali_font(&self) -> bool {
        self.bengali_font.load(Ordering::Relaxed)
    }

    /// 同步到页面 `lang` 属性的值
    pub fn html_lang(&self) -> &'static str {
        self.current().code()
    }

    pub fn font_class(&self) -> Option<&'static str> {
        self.current().font_class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    struct FailingStorage;

    impl ClientStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::ReadOnly)
        }
    }

    #[test]
    fn restores_stored_language() {
        let storage = Arc::new(MemoryStorage::new().with(LANGUAGE_KEY, "bn"));
        let ctx = LanguageContext::restore(storage);
        assert_eq!(ctx.current(), Lang::Bn);
        assert!(ctx.bengali_font());
        assert_eq!(ctx.html_lang(), "bn");
    }

    #[test]
    fn unknown_stored_value_uses_default() {
        let storage = Arc::new(MemoryStorage::new().with(LANGUAGE_KEY, "klingon"));
        assert_eq!(LanguageContext::restore(storage).current(), Lang::En);
    }

    #[test]
    fn set_language_persists_and_toggles_font() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = LanguageContext::restore(storage.clone());

        ctx.set_language(Lang::Bn);
        assert_eq!(ctx.font_class(), Some("font-bengali"));
        ctx.set_language(Lang::Zh);
        assert!(!ctx.bengali_font());
        assert_eq!(ctx.font_class(), None);

        assert_eq!(storage.get(LANGUAGE_KEY).unwrap().as_deref(), Some("zh"));
        assert_eq!(storage.writes().len(), 2);
    }

    #[test]
    fn setting_current_language_rewrites_same_value() {
        let storage = Arc::new(MemoryStorage::new().with(LANGUAGE_KEY, "zh"));
        let ctx = LanguageContext::restore(storage.clone());

        ctx.set_language(Lang::Zh);
        ctx.set_language(Lang::Zh);

        assert_eq!(ctx.current(), Lang::Zh);
        assert_eq!(
            storage.writes(),
            vec![
                (LANGUAGE_KEY.to_string(), "zh".to_string()),
                (LANGUAGE_KEY.to_string(), "zh".to_string()),
            ]
        );
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap().as_deref(), Some("zh"));
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let ctx = LanguageContext::restore(Arc::new(FailingStorage));
        assert_eq!(ctx.current(), Lang::En);

        ctx.set_language(Lang::Bn);
        assert_eq!(ctx.current(), Lang::Bn);
        assert!(ctx.bengali_font());
    }
}
