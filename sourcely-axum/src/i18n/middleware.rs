use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use sourcely_core::storage::LANGUAGE_KEY;
use sourcely_core::{DEFAULT_LANG, Lang};
use tokio::task_local;

use super::cookie::cookie_value;

task_local! {
    pub static CURRENT_LANG: Lang;
}

pub async fn handle_i18n(req: Request, next: Next) -> Response {
    let lang = resolve_language(req.headers());
    CURRENT_LANG.scope(lang, next.run(req)).await
}

/// 当前请求的语言；不在 i18n 中间件内时为默认语言
pub fn current_lang() -> Lang {
    CURRENT_LANG.try_with(|l| *l).unwrap_or(DEFAULT_LANG)
}

/// 优先级：`language` cookie > Accept-Language > 默认语言
fn resolve_language(headers: &HeaderMap) -> Lang {
    if let Some(lang) = cookie_value(headers, LANGUAGE_KEY).and_then(|v| Lang::from_code(&v)) {
        return lang;
    }

    let Some(header) = headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
    else {
        return DEFAULT_LANG;
    };

    // "bn-BD,bn;q=0.9,en;q=0.8" -> [(1.0, "bn-BD"), (0.9, "bn"), (0.8, "en")]
    let mut langs: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|part| {
            let mut sections = part.split(';');
            let lang = sections.next()?.trim();
            let q_value = sections
                .next()
                .and_then(|q| q.trim().strip_prefix("q="))
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((q_value, lang))
        })
        .collect();

    // 稳定排序，同权重保持原顺序
    langs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    langs
        .into_iter()
        .find_map(|(_, tag)| Lang::from_code(tag))
        .unwrap_or(DEFAULT_LANG)
}
