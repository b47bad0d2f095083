use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sourcely_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no bearer token in client storage")]
    MissingToken,
    #[error("client storage error: {0}")]
    Storage(#[from] StorageError),
}

/// 列表接口统一返回的 `{ success, data }`
///
/// `Option` 字段缺失时即为 `None`，不要求 `T: Default`。
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: Option<bool>,
    data: Option<Vec<T>>,
}

const ERROR_BODY_LIMIT: usize = 200;

/// 绑定远程 REST API 前缀的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path`，返回 `data`；`data` 缺失时为空列表。
    ///
    /// 非 2xx 状态或无法解析的响应体视为错误。
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.url(path);
        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if envelope.success == Some(false) {
            log::warn!("{} answered {} with success=false", url, status);
        }
        Ok(envelope.data.unwrap_or_default())
    }
}
