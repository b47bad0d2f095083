mod admin;
mod content;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub use admin::{AdminList, AdminListParams};
pub use content::{LangForm, LangOption, LangView, TQuery, TValue};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(content::health))
        .route("/api/lang", get(content::get_lang).put(content::put_lang))
        .route("/api/i18n/{lang}", get(content::dictionary))
        .route("/api/t", get(content::translate))
        .route("/api/admin/downloads", get(admin::downloads))
        .route("/api/admin/downloads/refresh", post(admin::refresh_downloads))
        .route("/api/admin/page-content", get(admin::page_content))
        .route(
            "/api/admin/page-content/refresh",
            post(admin::refresh_page_content),
        )
        .with_state(state)
}
