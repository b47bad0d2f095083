use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use sourcely_core::storage::TOKEN_KEY;
use sourcely_core::{ClientStorage, StorageError};

const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// 单次请求的客户端存储
///
/// 读取顺序：本次请求内的写入 > 请求 cookie（`Authorization: Bearer` 覆盖 `token`）> 服务端存储。
/// 写入只记录下来，由 [`RequestStorage::set_cookie_headers`] 转成响应的 `Set-Cookie`。
pub struct RequestStorage {
    values: HashMap<String, String>,
    fallback: Option<Arc<dyn ClientStorage>>,
    pending: Mutex<Vec<(String, String)>>,
}

impl std::fmt::Debug for RequestStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&String> = self.values.keys().collect();
        f.debug_struct("RequestStorage")
            .field("keys", &keys)
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl RequestStorage {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut values: HashMap<String, String> = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_cookies)
            .collect();

        if let Some(token) = bearer_token(headers) {
            values.insert(TOKEN_KEY.to_string(), token);
        }

        Self {
            values,
            fallback: None,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ClientStorage>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// 本次请求写入的值，按写入顺序
    pub fn pending(&self) -> Vec<(String, String)> {
        match self.pending.lock() {
            Ok(p) => p.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_cookie_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (key, value) in self.pending() {
            let mut cookie =
                format!("{key}={value}; Path=/; Max-Age={COOKIE_MAX_AGE}; SameSite=Lax");
            if key == TOKEN_KEY {
                cookie.push_str("; HttpOnly");
            }
            match HeaderValue::from_str(&cookie) {
                Ok(v) => {
                    headers.append(SET_COOKIE, v);
                }
                Err(e) => log::warn!("Skipping cookie {}: {}", key, e),
            }
        }
        headers
    }
}

impl ClientStorage for RequestStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pending = self
            .pending
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone());
        if pending.is_some() {
            return Ok(pending);
        }

        if let Some(v) = self.values.get(key) {
            return Ok(Some(v.clone()));
        }

        match &self.fallback {
            Some(fallback) => fallback.get(key),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.pending
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// `a=1; b=2` -> [("a", "1"), ("b", "2")]
fn parse_cookies(header: &str) -> impl Iterator<Item = (String, String)> + '_ {
    header.split(';').filter_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        let k = k.trim();
        (!k.is_empty()).then(|| (k.to_string(), v.trim().trim_matches('"').to_string()))
    })
}

pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(parse_cookies)
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
