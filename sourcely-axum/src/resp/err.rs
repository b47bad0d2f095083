use std::fmt;

use sourcely_core::Code;
use sourcely_core::i18n::I18nError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error)]
pub enum E {
    #[error("{0}")]
    Code(i32),
    /// 业务码 + 文案占位符参数
    #[error("{0}")]
    Msg(i32, Vec<(String, String)>),
    #[error("{0}")]
    Sys(#[from] anyhow::Error),
    #[error("{0}")]
    Val(#[from] ValidationErrors),
}

impl fmt::Debug for E {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            E::Code(c) => write!(f, "E({c})"),
            E::Msg(c, p) => write!(f, "E({c}, {p:?})"),
            E::Sys(e) => write!(f, "{e:?}"),
            E::Val(e) => write!(f, "{e:?}"),
        }
    }
}

impl E {
    pub fn of(code: Code) -> Self {
        E::Code(code.as_i32())
    }
}

impl From<sourcely_core::Error> for E {
    fn from(err: sourcely_core::Error) -> Self {
        if err.code == Code::InternalServerError.as_i32() {
            return E::Sys(anyhow::anyhow!(err.message));
        }
        if err.args.is_empty() {
            E::Code(err.code)
        } else {
            E::Msg(err.code, err.args)
        }
    }
}

impl From<I18nError> for E {
    fn from(err: I18nError) -> Self {
        sourcely_core::Error::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_business_code() {
        let e: E = I18nError::UnsupportedLanguage("fr".into()).into();
        match e {
            E::Msg(code, args) => {
                assert_eq!(code, 903);
                assert_eq!(args, vec![("lang".to_string(), "fr".to_string())]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let e: E = sourcely_core::Error::of(Code::NotFound).into();
        assert!(matches!(e, E::Code(404)));

        let e: E = sourcely_core::Error::from(std::io::Error::other("disk")).into();
        assert!(matches!(e, E::Sys(_)));
    }
}
