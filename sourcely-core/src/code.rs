/// 业务状态码
///
/// HTTP 语义的码沿用 HTTP 状态值，9xx 为本系统自定义的业务码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
    MissingParam,
    IllegalParam,
    UnsupportedLanguage,
    UpstreamUnavailable,
}

impl Code {
    pub const fn as_i32(self) -> i32 {
        match self {
            Code::Ok => 200,
            Code::BadRequest => 400,
            Code::Unauthorized => 401,
            Code::NotFound => 404,
            Code::InternalServerError => 500,
            Code::MissingParam => 901,
            Code::IllegalParam => 902,
            Code::UnsupportedLanguage => 903,
            Code::UpstreamUnavailable => 904,
        }
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        [
            Code::Ok,
            Code::BadRequest,
            Code::Unauthorized,
            Code::NotFound,
            Code::InternalServerError,
            Code::MissingParam,
            Code::IllegalParam,
            Code::UnsupportedLanguage,
            Code::UpstreamUnavailable,
        ]
        .into_iter()
        .find(|c| c.as_i32() == code)
    }

    /// 语言包中对应的翻译键，例如 `code.404`
    pub fn i18n_key(code: i32) -> String {
        format!("code.{code}")
    }

    /// 语言包缺失时使用的英文默认文案
    pub const fn default_message(self) -> &'static str {
        match self {
            Code::Ok => "Ok",
            Code::BadRequest => "Request Parameter Error",
            Code::Unauthorized => "Unauthorized",
            Code::NotFound => "Not Found",
            Code::InternalServerError => "Internal Server Error",
            Code::MissingParam => "Missing Required Parameter",
            Code::IllegalParam => "Illegal Parameter",
            Code::UnsupportedLanguage => "Unsupported Language",
            Code::UpstreamUnavailable => "Upstream Service Unavailable",
        }
    }
}
