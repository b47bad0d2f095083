use std::sync::Arc;

use axum::http::HeaderMap;
use sourcely_admin::{
    ApiClient, DOWNLOADS, DownloadRecord, ListResource, PAGE_OVERVIEW, PageOverview,
};
use sourcely_core::{ClientStorage, Translator};

use crate::i18n::RequestStorage;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub translator: &'static Translator,
    pub downloads: Arc<ListResource<DownloadRecord>>,
    pub pages: Arc<ListResource<PageOverview>>,
    /// 请求未携带对应值时读取的服务端存储
    pub server_storage: Arc<dyn ClientStorage>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(
        translator: &'static Translator,
        client: ApiClient,
        server_storage: Arc<dyn ClientStorage>,
        page_size: usize,
    ) -> Self {
        Self {
            translator,
            downloads: Arc::new(ListResource::new(client.clone(), DOWNLOADS)),
            pages: Arc::new(ListResource::new(client, PAGE_OVERVIEW)),
            server_storage,
            page_size,
        }
    }

    pub fn request_storage(&self, headers: &HeaderMap) -> RequestStorage {
        RequestStorage::from_headers(headers).with_fallback(self.server_storage.clone())
    }
}
