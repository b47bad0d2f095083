use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sourcely_core::{Code, Lang, LanguageContext};
use validator::Validate;

use crate::i18n::{RequestStorage, current_lang};
use crate::r;
use crate::resp::{E, R};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub languages: Vec<Lang>,
}

pub(crate) async fn health(State(state): State<AppState>) -> R<Health> {
    R::ok(Health {
        status: "up",
        languages: state.translator.languages(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LangOption {
    pub code: Lang,
    pub label: String,
}

/// 页面渲染所需的语言状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LangView {
    pub lang: Lang,
    pub label: String,
    pub html_lang: String,
    pub font_class: Option<String>,
    pub bengali_font: bool,
    pub available: Vec<LangOption>,
}

impl LangView {
    fn new(lang: Lang, available: &[Lang]) -> Self {
        Self {
            lang,
            label: lang.label().to_string(),
            html_lang: lang.code().to_string(),
            font_class: lang.font_class().map(str::to_string),
            bengali_font: lang.uses_bengali_font(),
            available: available
                .iter()
                .map(|l| LangOption {
                    code: *l,
                    label: l.label().to_string(),
                })
                .collect(),
        }
    }

    fn of_context(ctx: &LanguageContext, available: &[Lang]) -> Self {
        Self {
            html_lang: ctx.html_lang().to_string(),
            font_class: ctx.font_class().map(str::to_string),
            bengali_font: ctx.bengali_font(),
            ..Self::new(ctx.current(), available)
        }
    }
}

pub(crate) async fn get_lang(State(state): State<AppState>) -> R<LangView> {
    R::ok(LangView::new(current_lang(), &state.translator.languages()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LangForm {
    #[validate(required, length(min = 1))]
    pub lang: Option<String>,
}

/// 切换语言并通过 `Set-Cookie` 持久化
pub(crate) async fn put_lang(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<LangForm>,
) -> (HeaderMap, R<LangView>) {
    match switch_language(&state, &headers, form) {
        Ok((cookies, view)) => (cookies, R::ok(view)),
        Err(e) => (HeaderMap::new(), R::err(e)),
    }
}

fn switch_language(
    state: &AppState,
    headers: &HeaderMap,
    form: LangForm,
) -> Result<(HeaderMap, LangView), E> {
    form.validate()?;
    let lang: Lang = form.lang.unwrap_or_default().parse()?;

    let storage = Arc::new(RequestStorage::from_headers(headers));
    let ctx = LanguageContext::restore(storage.clone());
    ctx.set_language(lang);
    log::debug!("Language switched to {}", lang);

    Ok((
        storage.set_cookie_headers(),
        LangView::of_context(&ctx, &state.translator.languages()),
    ))
}

pub(crate) async fn dictionary(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> R<Value> {
    let lang: Lang = r!(code.parse());
    match state.translator.dictionary(lang) {
        Some(dict) => R::ok(dict.tree().clone()),
        None => R::err(E::of(Code::NotFound)),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TQuery {
    #[validate(required, length(min = 1))]
    pub key: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TValue {
    pub key: String,
    pub lang: Lang,
    pub value: Value,
}

pub(crate) async fn translate(
    State(state): State<AppState>,
    Query(query): Query<TQuery>,
) -> R<TValue> {
    r!(query.validate());
    let key = query.key.unwrap_or_default();
    let lang = current_lang();
    let value = state
        .translator
        .resolve(&key, lang, query.fallback.as_deref())
        .into_owned();

    R::ok(TValue { key, lang, value })
}
