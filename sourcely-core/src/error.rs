use std::fmt;

use crate::code::Code;

/// 携带业务码的通用错误
///
/// `args` 用于填充翻译文案中的 `{name}` 占位符。
#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub args: Vec<(String, String)>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {{ code: {}, message: {}", self.code, self.message)?;
        if !self.args.is_empty() {
            write!(f, ", args: {:?}", self.args)?;
        }
        write!(f, " }}")
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            message: String::new(),
            args: vec![],
        }
    }

    pub fn of(code: Code) -> Self {
        Self::new(code.as_i32())
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.args.push((key.into(), val.into()));
        self
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self::of(Code::InternalServerError).with_message(msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::internal(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::internal(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::internal(err.to_string())
    }
}

impl From<crate::i18n::I18nError> for Error {
    fn from(err: crate::i18n::I18nError) -> Self {
        match err {
            crate::i18n::I18nError::UnsupportedLanguage(lang) => {
                Error::of(Code::UnsupportedLanguage).with_arg("lang", lang)
            }
            other => Error::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_args_only_when_present() {
        let plain = Error::of(Code::NotFound).with_message("gone");
        assert_eq!(plain.to_string(), "Error { code: 404, message: gone }");

        let with_args = Error::of(Code::UnsupportedLanguage).with_arg("lang", "fr");
        assert!(with_args.to_string().contains("args: [(\"lang\", \"fr\")]"));
    }

    #[test]
    fn unsupported_language_keeps_business_code() {
        let err: Error = crate::i18n::I18nError::UnsupportedLanguage("fr".into()).into();
        assert_eq!(err.code, 903);
        assert_eq!(err.args, vec![("lang".to_string(), "fr".to_string())]);
    }
}
