use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use sourcely_core::ClientStorage;
use sourcely_core::storage::TOKEN_KEY;

use crate::client::{ApiClient, FetchError};
use crate::query::{ListQuery, Page, Searchable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    /// 从客户端存储读取 token，发送 `Authorization: Bearer <token>`
    Bearer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub auth: Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 缓存已替换为这么多条记录
    Replaced(usize),
    /// 请求失败，缓存保持不变
    Failed,
    /// 完成前已有更新的加载发出，本次响应被丢弃
    Stale,
}

/// 一个远端集合的本地缓存
///
/// 每次加载领取递增序号，只有最新发出的加载可以替换列表；
/// 迟到的旧响应不会覆盖新数据。
pub struct ListResource<T> {
    client: ApiClient,
    endpoint: Endpoint,
    items: RwLock<Arc<Vec<T>>>,
    attempted: AtomicBool,
    issued: AtomicU64,
    /// 已结束（完成或被取消）的最大序号，小于 `issued` 即为加载中
    settled: AtomicU64,
}

/// 加载结束时登记序号；future 被丢弃时同样生效
struct Settle<'a> {
    settled: &'a AtomicU64,
    ticket: u64,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        self.settled.fetch_max(self.ticket, Ordering::SeqCst);
    }
}

impl<T> std::fmt::Debug for ListResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListResource")
            .field("endpoint", &self.endpoint)
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl<T> ListResource<T> {
    pub fn new(client: ApiClient, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            items: RwLock::new(Arc::new(Vec::new())),
            attempted: AtomicBool::new(false),
            issued: AtomicU64::new(0),
            settled: AtomicU64::new(0),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn is_loading(&self) -> bool {
        self.issued.load(Ordering::SeqCst) > self.settled.load(Ordering::SeqCst)
    }

    /// 是否已有加载结束（成功或失败）
    pub fn has_loaded(&self) -> bool {
        self.attempted.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Arc<Vec<T>> {
        match self.items.read() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<T> ListResource<T>
where
    T: DeserializeOwned + Send + Sync,
{
    /// 请求一次远端集合，失败只记日志，缓存保持不变
    pub async fn load(&self, storage: &dyn ClientStorage) -> LoadOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _settle = Settle {
            settled: &self.settled,
            ticket,
        };

        let result = self.fetch(storage).await;

        let mut items = match self.items.write() {
            Ok(items) => items,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.issued.load(Ordering::SeqCst) != ticket {
            log::debug!(
                "Dropping stale response #{} for {}",
                ticket,
                self.endpoint.path
            );
            return LoadOutcome::Stale;
        }

        self.attempted.store(true, Ordering::SeqCst);

        match result {
            Ok(list) => {
                let count = list.len();
                *items = Arc::new(list);
                log::info!("Loaded {} records from {}", count, self.endpoint.path);
                LoadOutcome::Replaced(count)
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", self.endpoint.path, e);
                LoadOutcome::Failed
            }
        }
    }

    async fn fetch(&self, storage: &dyn ClientStorage) -> Result<Vec<T>, FetchError> {
        let token = match self.endpoint.auth {
            Auth::None => None,
            Auth::Bearer => Some(storage.get(TOKEN_KEY)?.ok_or(FetchError::MissingToken)?),
        };
        self.client
            .fetch_list(self.endpoint.path, token.as_deref())
            .await
    }
}

impl<T> ListResource<T>
where
    T: Searchable + Clone,
{
    pub fn view(&self, query: &ListQuery) -> Page<T> {
        query.apply(&self.snapshot())
    }
}
