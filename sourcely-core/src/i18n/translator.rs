use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use super::I18nError;
use super::dictionary::Dictionary;
use super::template;
use crate::lang::{DEFAULT_LANG, Lang};

/// 按点号键查找翻译，缺失时回退到默认语言
///
/// 构建后语言包不可变，可放在 `Arc` 中共享，或用 [`super::install`] 安装为进程级实例。
#[derive(Debug, Clone)]
pub struct Translator {
    dictionaries: HashMap<Lang, Dictionary>,
    default_lang: Lang,
}

impl Translator {
    /// 默认语言必须在 `dictionaries` 中。
    ///
    /// 其他语言缺少的默认语言键会记为警告。
    pub fn new(dictionaries: impl IntoIterator<Item = Dictionary>) -> Result<Self, I18nError> {
        Self::with_default(dictionaries, DEFAULT_LANG)
    }

    pub fn with_default(
        dictionaries: impl IntoIterator<Item = Dictionary>,
        default_lang: Lang,
    ) -> Result<Self, I18nError> {
        let dictionaries: HashMap<Lang, Dictionary> =
            dictionaries.into_iter().map(|d| (d.lang(), d)).collect();
        if !dictionaries.contains_key(&default_lang) {
            return Err(I18nError::MissingDefault(default_lang));
        }

        let translator = Self {
            dictionaries,
            default_lang,
        };
        for (lang, key) in translator.coverage_gaps() {
            log::warn!("Translation missing for {lang}: {key} (falls back to {default_lang})");
        }
        Ok(translator)
    }

    /// 加载 `dir` 下所有 `<code>.json`
    ///
    /// 读取失败、格式错误或未知语言的文件记日志后跳过，只有缺少默认语言时报错。
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, I18nError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| I18nError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let dictionaries: Vec<Dictionary> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| load_locale_file(&entry.path()))
            .collect();
        Self::new(dictionaries)
    }

    /// 由 `i18n_assets!` 生成的 `(code, json)` 构建
    pub fn from_embedded(sources: &[(&str, &str)]) -> Result<Self, I18nError> {
        let mut dictionaries = Vec::with_capacity(sources.len());
        for (code, json) in sources {
            let Some(lang) = Lang::from_code(code) else {
                log::warn!("Skipping embedded locale with unsupported code: {code}");
                continue;
            };
            dictionaries.push(Dictionary::parse(lang, json)?);
        }
        Self::new(dictionaries)
    }

    pub fn default_lang(&self) -> Lang {
        self.default_lang
    }

    pub fn languages(&self) -> Vec<Lang> {
        Lang::all()
            .into_iter()
            .filter(|lang| self.dictionaries.contains_key(lang))
            .collect()
    }

    pub fn dictionary(&self, lang: Lang) -> Option<&Dictionary> {
        self.dictionaries.get(&lang)
    }

    /// 在 `lang` 中查找 `key`
    ///
    /// 找不到时从默认语言的根重新查找。命中字符串、数组或对象时原样返回；
    /// 其他值或两边都找不到时返回 `fallback`，没有则返回 `key` 本身。
    pub fn resolve<'a>(&'a self, key: &str, lang: Lang, fallback: Option<&str>) -> Cow<'a, Value> {
        let found = self
            .walk(lang, key)
            .or_else(|| self.walk(self.default_lang, key));

        match found {
            Some(value) if value.is_string() || value.is_array() || value.is_object() => {
                Cow::Borrowed(value)
            }
            _ => Cow::Owned(Value::String(fallback.unwrap_or(key).to_string())),
        }
    }

    pub fn text(&self, key: &str, lang: Lang) -> String {
        self.text_or(key, lang, key)
    }

    /// [`Self::resolve`] 的字符串形式，子树与数组返回 `fallback`
    pub fn text_or(&self, key: &str, lang: Lang, fallback: &str) -> String {
        match self.resolve(key, lang, Some(fallback)) {
            Cow::Borrowed(Value::String(s)) => s.clone(),
            Cow::Owned(Value::String(s)) => s,
            _ => fallback.to_string(),
        }
    }

    /// 数组中的字符串元素，不是数组时为空
    pub fn list(&self, key: &str, lang: Lang) -> Vec<String> {
        match self.resolve(key, lang, None).as_ref() {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 查找字符串并用 `args` 填充 `{name}` 占位符
    pub fn format(&self, key: &str, lang: Lang, args: &[(&str, &str)]) -> String {
        template::render(&self.text(key, lang), args)
    }

    /// 默认语言有而其他语言缺少的 `(lang, key)`
    pub fn coverage_gaps(&self) -> Vec<(Lang, String)> {
        let Some(default) = self.dictionaries.get(&self.default_lang) else {
            return Vec::new();
        };
        let leaves = default.leaf_paths();

        self.languages()
            .into_iter()
            .filter(|lang| *lang != self.default_lang)
            .flat_map(|lang| {
                let dict = &self.dictionaries[&lang];
                leaves
                    .iter()
                    .filter(|key| dict.get(key).is_none())
                    .map(move |key| (lang, key.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn walk(&self, lang: Lang, key: &str) -> Option<&Value> {
        self.dictionaries.get(&lang)?.get(key)
    }
}

fn load_locale_file(path: &Path) -> Option<Dictionary> {
    if path.extension()? != "json" {
        return None;
    }

    let code = path.file_stem()?.to_str()?;
    let Some(lang) = Lang::from_code(code) else {
        log::warn!("Ignoring locale file with unsupported language: {}", path.display());
        return None;
    };

    let content = fs::read_to_string(path)
        .inspect_err(|e| log::error!("Failed to read locale file {}: {}", path.display(), e))
        .ok()?;

    let dict = Dictionary::parse(lang, &content)
        .inspect_err(|e| log::error!("Failed to parse locale file {}: {}", path.display(), e))
        .ok()?;

    log::info!("Loaded locale: {}", lang);
    Some(dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translator() -> Translator {
        let en = Dictionary::from_value(
            Lang::En,
            json!({
                "navbar": { "home": "Home", "contact": "Contact" },
                "hero": { "welcome": "Welcome, {name}!" },
                "services": { "list": ["Interpretation", "Sourcing", 3] },
                "meta": { "version": 2 }
            }),
        )
        .unwrap();
        let bn = Dictionary::from_value(
            Lang::Bn,
            json!({
                "navbar": { "contact": "যোগাযোগ" },
                "meta": { "version": "দুই" }
            }),
        )
        .unwrap();
        Translator::new([en, bn]).unwrap()
    }

    #[test]
    fn resolves_in_active_language_first() {
        let t = translator();
        assert_eq!(t.resolve("navbar.contact", Lang::Bn, None).as_ref(), &json!("যোগাযোগ"));
    }

    #[test]
    fn falls_back_to_default_then_caller_then_key() {
        let t = translator();
        assert_eq!(t.resolve("navbar.home", Lang::Bn, None).as_ref(), &json!("Home"));
        assert_eq!(t.resolve("navbar.home", Lang::Zh, None).as_ref(), &json!("Home"));
        assert_eq!(
            t.resolve("footer.legal", Lang::Bn, Some("Legal")).as_ref(),
            &json!("Legal")
        );
        assert_eq!(t.resolve("footer.legal", Lang::En, None).as_ref(), &json!("footer.legal"));
    }

    #[test]
    fn subtrees_and_arrays_are_returned_whole() {
        let t = translator();
        assert_eq!(
            t.resolve("navbar", Lang::En, None).as_ref(),
            &json!({ "home": "Home", "contact": "Contact" })
        );
        assert_eq!(
            t.resolve("services.list", Lang::En, None).as_ref(),
            &json!(["Interpretation", "Sourcing", 3])
        );
    }

    #[test]
    fn non_text_terminals_use_the_fallback() {
        let t = translator();
        assert_eq!(t.resolve("meta.version", Lang::En, Some("n/a")).as_ref(), &json!("n/a"));
        // 当前语言已命中，不再查默认语言
        assert_eq!(t.resolve("meta.version", Lang::Bn, None).as_ref(), &json!("দুই"));
    }

    #[test]
    fn text_list_and_format_views() {
        let t = translator();
        assert_eq!(t.text("navbar.home", Lang::Bn), "Home");
        assert_eq!(t.text_or("navbar", Lang::En, "-"), "-");
        assert_eq!(t.list("services.list", Lang::Zh), vec!["Interpretation", "Sourcing"]);
        assert!(t.list("navbar.home", Lang::En).is_empty());
        assert_eq!(t.format("hero.welcome", Lang::Bn, &[("name", "Karim")]), "Welcome, Karim!");
    }

    #[test]
    fn reports_coverage_gaps_against_default() {
        let gaps = translator().coverage_gaps();
        let bn: Vec<&str> = gaps
            .iter()
            .filter(|(lang, _)| *lang == Lang::Bn)
            .map(|(_, key)| key.as_str())
            .collect();
        assert!(bn.contains(&"navbar.home"));
        assert!(bn.contains(&"services.list"));
        assert!(!bn.contains(&"navbar.contact"));
        assert!(gaps.iter().all(|(lang, _)| *lang != Lang::Zh));
    }

    #[test]
    fn requires_the_default_dictionary() {
        let zh = Dictionary::from_value(Lang::Zh, json!({ "a": "b" })).unwrap();
        assert!(matches!(
            Translator::new([zh]),
            Err(I18nError::MissingDefault(Lang::En))
        ));
    }

    #[test]
    fn embedded_sources_skip_unknown_codes() {
        let t = Translator::from_embedded(&[
            ("en", r#"{"navbar":{"home":"Home"}}"#),
            ("fr", r#"{"navbar":{"home":"Accueil"}}"#),
            ("zh", r#"{"navbar":{"home":"首页"}}"#),
        ])
        .unwrap();
        assert_eq!(t.languages(), vec![Lang::En, Lang::Zh]);
        assert_eq!(t.text("navbar.home", Lang::Zh), "首页");
    }
}
