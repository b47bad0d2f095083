use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::i18n::I18nError;

/// 站点支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Bn,
    Zh,
}

/// 缺失的键回退到的语言
pub const DEFAULT_LANG: Lang = Lang::En;

/// 孟加拉语下页面使用的 CSS 类
pub const BENGALI_FONT_CLASS: &str = "font-bengali";

impl Lang {
    pub const fn all() -> [Self; 3] {
        [Lang::En, Lang::Bn, Lang::Zh]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Bn => "bn",
            Lang::Zh => "zh",
        }
    }

    /// 语言切换器中的名称，用该语言本身书写
    pub const fn label(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Bn => "বাংলা",
            Lang::Zh => "中文",
        }
    }

    /// 接受语言代码与地区标签（`zh-CN`、`bn_BD`），不区分大小写
    pub fn from_code(code: &str) -> Option<Self> {
        let lowered = code.trim().to_ascii_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();
        Self::all().into_iter().find(|lang| lang.code() == base)
    }

    pub const fn uses_bengali_font(self) -> bool {
        matches!(self, Lang::Bn)
    }

    pub const fn font_class(self) -> Option<&'static str> {
        if self.uses_bengali_font() {
            Some(BENGALI_FONT_CLASS)
        } else {
            None
        }
    }
}

impl Default for Lang {
    fn default() -> Self {
        DEFAULT_LANG
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::from_code(s).ok_or_else(|| I18nError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_region_tags() {
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("EN-us"), Some(Lang::En));
        assert_eq!(Lang::from_code("zh-CN"), Some(Lang::Zh));
        assert_eq!(Lang::from_code("bn_BD"), Some(Lang::Bn));
        assert_eq!(Lang::from_code("fr"), None);
        assert_eq!(Lang::from_code(""), None);
    }

    #[test]
    fn only_bengali_needs_the_font_class() {
        assert_eq!(Lang::Bn.font_class(), Some(BENGALI_FONT_CLASS));
        assert_eq!(Lang::En.font_class(), None);
        assert_eq!(Lang::Zh.font_class(), None);
    }

    #[test]
    fn from_str_reports_unsupported_codes() {
        assert_eq!("zh".parse::<Lang>().unwrap(), Lang::Zh);
        assert!(matches!(
            "de".parse::<Lang>(),
            Err(I18nError::UnsupportedLanguage(code)) if code == "de"
        ));
    }

    #[test]
    fn serializes_as_lowercase_code() {
        assert_eq!(serde_json::to_string(&Lang::Bn).unwrap(), "\"bn\"");
        assert_eq!(serde_json::from_str::<Lang>("\"zh\"").unwrap(), Lang::Zh);
    }
}
