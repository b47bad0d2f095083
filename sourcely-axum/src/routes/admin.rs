use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sourcely_admin::{
    DownloadRecord, ListQuery, ListResource, LoadOutcome, Page, PageOverview, Searchable,
};
use validator::Validate;

use crate::i18n::RequestStorage;
use crate::resp::{E, R};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AdminListParams {
    /// 搜索文本
    pub q: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<usize>,
}

/// 管理后台表格的一页数据
#[derive(Debug, Serialize)]
pub struct AdminList<T: Serialize> {
    pub loading: bool,
    pub loaded: bool,
    #[serde(flatten)]
    pub page: Page<T>,
}

async fn list_view<T>(
    resource: &ListResource<T>,
    storage: &RequestStorage,
    params: AdminListParams,
    refresh: bool,
    default_page_size: usize,
) -> Result<AdminList<T>, E>
where
    T: DeserializeOwned + Searchable + Clone + Serialize + Send + Sync,
{
    params.validate()?;

    // 首次查看或手动刷新时请求远端，失败只记日志，列表保持原样
    if refresh || !resource.has_loaded() {
        if let LoadOutcome::Failed = resource.load(storage).await {
            log::warn!("Serving cached {} after failed load", resource.endpoint().path);
        }
    }

    let query = ListQuery {
        search: params.q,
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(default_page_size),
    };

    Ok(AdminList {
        loading: resource.is_loading(),
        loaded: resource.has_loaded(),
        page: resource.view(&query),
    })
}

pub(crate) async fn downloads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> R<AdminList<DownloadRecord>> {
    let storage = state.request_storage(&headers);
    R::from(list_view(&state.downloads, &storage, params, false, state.page_size).await)
}

pub(crate) async fn refresh_downloads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> R<AdminList<DownloadRecord>> {
    let storage = state.request_storage(&headers);
    R::from(list_view(&state.downloads, &storage, params, true, state.page_size).await)
}

pub(crate) async fn page_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> R<AdminList<PageOverview>> {
    let storage = state.request_storage(&headers);
    R::from(list_view(&state.pages, &storage, params, false, state.page_size).await)
}

pub(crate) async fn refresh_page_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> R<AdminList<PageOverview>> {
    let storage = state.request_storage(&headers);
    R::from(list_view(&state.pages, &storage, params, true, state.page_size).await)
}
