use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sourcely_core::utils::date_format;

use crate::query::Searchable;
use crate::resource::{Auth, Endpoint};

/// 目录下载记录，需要管理员 token
pub const DOWNLOADS: Endpoint = Endpoint {
    path: "/downloads",
    auth: Auth::Bearer,
};

/// 各页面的内容概览
pub const PAGE_OVERVIEW: Endpoint = Endpoint {
    path: "/page-content/overview",
    auth: Auth::None,
};

/// 下载记录中的一行
///
/// 字段由远端决定，反序列化从不失败：类型不符或为 null 的字段取空值，
/// 未识别的字段保留在 `extra` 中。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRecord {
    pub id: Option<Value>,
    pub user_name: String,
    pub user_email: String,
    pub product_name: String,
    #[serde(serialize_with = "date_format::standard::serialize")]
    pub downloaded_at: Option<DateTime<Utc>>,
    pub download_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for DownloadRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<Value> for DownloadRecord {
    fn from(value: Value) -> Self {
        let mut fields = Fields::new(value, "download");
        let user = fields.take(&["user"]);
        let product = fields.take(&["product"]);

        Self {
            id: fields.take(&["_id", "id"]),
            user_name: fields
                .text(&["userName", "user_name", "name"])
                .or_else(|| nested_text(user.as_ref(), &["name", "userName", "fullName"]))
                .or_else(|| user.as_ref().and_then(plain_text))
                .unwrap_or_default(),
            user_email: fields
                .text(&["userEmail", "user_email", "email"])
                .or_else(|| nested_text(user.as_ref(), &["email"]))
                .unwrap_or_default(),
            product_name: fields
                .text(&["productName", "product_name"])
                .or_else(|| nested_text(product.as_ref(), &["name", "title", "productName"]))
                .or_else(|| product.as_ref().and_then(plain_text))
                .unwrap_or_default(),
            downloaded_at: fields.datetime(&[
                "downloadedAt",
                "downloaded_at",
                "createdAt",
                "created_at",
            ]),
            download_count: fields
                .count(&["downloadCount", "download_count", "count"])
                .unwrap_or(0),
            extra: fields.into_extra(
                [("user", user), ("product", product)]
                    .into_iter()
                    .filter_map(|(k, v)| v.map(|v| (k, v))),
            ),
        }
    }
}

impl Searchable for DownloadRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.user_name.as_str(),
            self.user_email.as_str(),
            self.product_name.as_str(),
        ]
    }
}

/// 单个页面的内容概览
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOverview {
    pub slug: String,
    pub title: String,
    pub section_count: u64,
    #[serde(serialize_with = "date_format::standard::serialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for PageOverview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<Value> for PageOverview {
    fn from(value: Value) -> Self {
        let mut fields = Fields::new(value, "page overview");
        Self {
            slug: fields
                .text(&["slug", "page", "pageName", "page_name"])
                .unwrap_or_default(),
            title: fields.text(&["title"]).unwrap_or_default(),
            // sections 可能直接是数组
            section_count: fields
                .count(&["sectionCount", "section_count", "sections"])
                .unwrap_or(0),
            updated_at: fields.datetime(&["updatedAt", "updated_at"]),
            extra: fields.into_extra(std::iter::empty()),
        }
    }
}

impl Searchable for PageOverview {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.slug.as_str(), self.title.as_str()]
    }
}

/// 从一行 JSON 中按别名取字段，取走的键不再进入 `extra`
struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    fn new(value: Value, kind: &str) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => {
                log::warn!("Ignoring malformed {} record: {}", kind, other);
                Map::new()
            }
        };
        Self { map }
    }

    /// 取走所有别名，返回第一个非 null 的值
    fn take(&mut self, keys: &[&str]) -> Option<Value> {
        keys.iter()
            .filter_map(|k| self.map.remove(*k))
            .fold(None, |found, v| found.or((!v.is_null()).then_some(v)))
    }

    fn text(&mut self, keys: &[&str]) -> Option<String> {
        self.take(keys).as_ref().and_then(plain_text)
    }

    fn count(&mut self, keys: &[&str]) -> Option<u64> {
        match self.take(keys)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Array(items) => Some(items.len() as u64),
            _ => None,
        }
    }

    fn datetime(&mut self, keys: &[&str]) -> Option<DateTime<Utc>> {
        match self.take(keys)? {
            Value::String(s) => date_format::parse_datetime(&s),
            Value::Number(n) => n.as_i64().and_then(date_format::from_timestamp),
            _ => None,
        }
    }

    fn into_extra<'a>(mut self, kept: impl Iterator<Item = (&'a str, Value)>) -> Map<String, Value> {
        for (key, value) in kept {
            self.map.insert(key.to_string(), value);
        }
        self.map
    }
}

fn plain_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn nested_text(value: Option<&Value>, keys: &[&str]) -> Option<String> {
    let obj = value?.as_object()?;
    keys.iter().find_map(|k| obj.get(*k).and_then(plain_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn download_accepts_camel_case_payloads() {
        let record: DownloadRecord = serde_json::from_value(json!({
            "_id": "65f1",
            "userName": "Rahim Uddin",
            "userEmail": "rahim@example.com",
            "productName": "Gift Catalogue 2024",
            "createdAt": "2024-03-09T14:05:00Z",
            "downloadCount": 3,
            "ip": "10.0.0.1"
        }))
        .unwrap();

        assert_eq!(record.id, Some(json!("65f1")));
        assert_eq!(record.user_name, "Rahim Uddin");
        assert_eq!(record.product_name, "Gift Catalogue 2024");
        assert_eq!(record.download_count, 3);
        assert_eq!(record.extra.get("ip"), Some(&json!("10.0.0.1")));
        assert!(record.downloaded_at.is_some());
    }

    #[test]
    fn download_serializes_readable_timestamp() {
        let record: DownloadRecord = serde_json::from_value(json!({
            "user_name": "Li Wei",
            "downloaded_at": "2024-03-09T14:05:00Z"
        }))
        .unwrap();
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["downloaded_at"], json!("2024-03-09 14:05:00"));
        assert_eq!(out["download_count"], json!(0));
    }

    #[test]
    fn bad_fields_degrade_to_empty() {
        let record: DownloadRecord = serde_json::from_value(json!({
            "userName": null,
            "userEmail": null,
            "user": { "name": "Karim", "email": "karim@example.com" },
            "product": { "_id": "p9", "name": "Price List" },
            "createdAt": "2024-03-09 14:05:00",
            "downloadedAt": null,
            "downloadCount": "many"
        }))
        .unwrap();

        assert_eq!(record.user_name, "Karim");
        assert_eq!(record.user_email, "karim@example.com");
        assert_eq!(record.product_name, "Price List");
        assert_eq!(record.download_count, 0);
        assert_eq!(
            record.downloaded_at.map(|d| d.to_rfc3339()),
            Some("2024-03-09T14:05:00+00:00".to_string())
        );
        assert_eq!(record.extra["product"]["_id"], json!("p9"));
    }

    #[test]
    fn both_timestamp_aliases_prefer_downloaded_at() {
        let record: DownloadRecord = serde_json::from_value(json!({
            "createdAt": "2024-01-01T00:00:00Z",
            "downloadedAt": "2024-03-09T14:05:00Z"
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap()["downloaded_at"],
            json!("2024-03-09 14:05:00")
        );
    }

    #[test]
    fn serialized_record_reads_back() {
        let record: DownloadRecord = serde_json::from_value(json!({
            "userName": "Li Wei",
            "productName": "Price List",
            "downloadedAt": "2024-03-09T14:05:00Z",
            "downloadCount": 2
        }))
        .unwrap();
        let again: DownloadRecord =
            serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn non_object_rows_become_empty_records() {
        let rows: Vec<DownloadRecord> =
            serde_json::from_value(json!([null, "oops", { "name": "A", "count": 1.0 }])).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].user_name, "");
        assert_eq!(rows[1].extra, Map::new());
        assert_eq!(rows[2].user_name, "A");
        assert_eq!(rows[2].download_count, 1);
    }

    #[test]
    fn page_overview_counts_section_arrays() {
        let page: PageOverview = serde_json::from_value(json!({
            "pageName": "gifts",
            "title": null,
            "sections": [{ "id": 1 }, { "id": 2 }],
            "updatedAt": 1710000000
        }))
        .unwrap();
        assert_eq!(page.slug, "gifts");
        assert_eq!(page.title, "");
        assert_eq!(page.section_count, 2);
        assert!(page.updated_at.is_some());
    }

    #[test]
    fn page_overview_searches_slug_and_title() {
        let page: PageOverview = serde_json::from_value(json!({
            "page": "services",
            "title": "Interpretation & Sourcing",
            "sections": 4
        }))
        .unwrap();
        assert_eq!(page.section_count, 4);
        assert!(page.matches("sourcing"));
        assert!(page.matches("serv"));
        assert!(!page.matches("gifts"));
    }
}
