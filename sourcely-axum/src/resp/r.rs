use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use sourcely_core::{Code, i18n};

use crate::i18n::current_lang;
use crate::resp::err::E;

/// 统一响应结构：`{ code, message, data }`，message 按当前请求语言翻译
#[derive(Debug, Serialize)]
pub struct R<T: Serialize> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> R<T> {
    pub fn ok(data: T) -> Self {
        let code = Code::Ok.as_i32();
        Self {
            code,
            message: message_of(code, &[]),
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: Code::Ok.as_i32(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn err(err: E) -> Self {
        let (code, message) = map_err(err);
        Self {
            code,
            message,
            data: None,
        }
    }

    pub fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err),
        }
    }
}

impl<T: Serialize> IntoResponse for R<T> {
    fn into_response(self) -> axum::response::Response {
        let status = if self.code == Code::InternalServerError.as_i32() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        (status, Json(self)).into_response()
    }
}

fn map_err(err: E) -> (i32, String) {
    match err {
        E::Code(code) => (code, message_of(code, &[])),
        E::Msg(code, params) => (code, message_of(code, &params)),
        E::Sys(err) => {
            log::error!("{:?}", err);
            let code = Code::InternalServerError.as_i32();
            (code, message_of(code, &[]))
        }
        E::Val(err) => {
            log::warn!("{:?}", err);
            let is_missing = err
                .field_errors()
                .values()
                .any(|errs| errs.iter().any(|e| e.code == "required"));
            let code = if is_missing {
                Code::MissingParam.as_i32()
            } else {
                Code::IllegalParam.as_i32()
            };
            (code, message_of(code, &[]))
        }
    }
}

/// 翻译 `code.<n>`；翻译器未安装或缺少该键时用内置英文文案
fn message_of(code: i32, params: &[(String, String)]) -> String {
    let fallback = Code::from_i32(code)
        .map(|c| c.default_message().to_string())
        .unwrap_or_else(|| code.to_string());

    let base = match i18n::global() {
        Some(t) => t.text_or(&Code::i18n_key(code), current_lang(), &fallback),
        None => fallback,
    };

    params
        .iter()
        .fold(base, |acc, (k, v)| acc.replace(&format!("{{{}}}", k), v))
}

#[macro_export]
macro_rules! r {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return $crate::resp::r::R::err(err.into()),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_carries_data() {
        let r = R::ok(123);
        assert_eq!(r.code, 200);
        assert_eq!(r.data, Some(123));
    }

    #[test]
    fn ok_with_message_keeps_message() {
        let r = R::ok_with_message("data", "msg");
        assert_eq!(r.code, 200);
        assert_eq!(r.message, "msg");
        assert_eq!(r.data, Some("data"));
    }

    #[test]
    fn err_has_no_data() {
        let r: R<()> = R::err(E::of(Code::BadRequest));
        assert_eq!(r.code, 400);
        assert_eq!(r.data, None);
    }

    #[test]
    fn unknown_codes_render_as_number() {
        let r: R<()> = R::err(E::Code(777));
        assert_eq!(r.code, 777);
        assert_eq!(r.message, "777");
    }
}
