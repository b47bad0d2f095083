//! 管理后台的只读列表，数据来自远程 REST API
//!
//! 每个 [`ListResource`] 缓存一个集合，请求成功时整体替换，搜索与分页都在内存中完成。

pub mod client;
pub mod query;
pub mod records;
pub mod resource;

pub use client::{ApiClient, FetchError};
pub use query::{DEFAULT_PAGE_SIZE, ListQuery, Page, Searchable};
pub use records::{DOWNLOADS, DownloadRecord, PAGE_OVERVIEW, PageOverview};
pub use resource::{Auth, Endpoint, ListResource, LoadOutcome};
