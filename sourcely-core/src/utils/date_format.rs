//! 管理后台列表中时间字段的序列化格式

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serializer;

/// 可按 strftime 格式输出的时间类型；`None` 序列化为 null
pub trait DateFormattable {
    fn format_date(&self, fmt: &str) -> Option<String>;
}

impl DateFormattable for Option<DateTime<Utc>> {
    fn format_date(&self, fmt: &str) -> Option<String> {
        self.map(|dt| dt.format(fmt).to_string())
    }
}

impl DateFormattable for Option<NaiveDateTime> {
    fn format_date(&self, fmt: &str) -> Option<String> {
        self.map(|dt| dt.format(fmt).to_string())
    }
}

impl DateFormattable for Option<NaiveDate> {
    fn format_date(&self, fmt: &str) -> Option<String> {
        self.map(|d| d.format(fmt).to_string())
    }
}

pub fn serialize_with_custom_format<S, T>(
    date: &T,
    format: &str,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: DateFormattable,
{
    match date.format_date(format) {
        Some(s) => serializer.serialize_str(&s),
        None => serializer.serialize_none(),
    }
}

macro_rules! define_format {
    ($name:ident, $format:expr) => {
        pub mod $name {
            use super::*;
            pub fn serialize<S, T>(date: &T, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
                T: DateFormattable,
            {
                serialize_with_custom_format(date, $format, serializer)
            }
        }
    };
}

define_format!(standard, "%Y-%m-%d %H:%M:%S");
define_format!(date_only, "%Y-%m-%d");

/// 无时区的时间按 UTC 处理
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"];

/// 宽松解析远端返回的时间文本：RFC 3339、`standard` 格式、纯日期
///
/// 无法识别时返回 `None`。
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Unix 时间戳，超过 10^11 的按毫秒处理
pub fn from_timestamp(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}
