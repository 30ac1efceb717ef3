pub mod binding;
pub mod client;
mod limiter;
pub mod refresh;

pub use client::QueryClient;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use std::fmt;

/// شناسه یک جریان داده حسگر در سمت سرور
///
/// برای هسته برنامه یک مقدار مات (Opaque) است و بدون تغییر به API ارسال می‌شود.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(String);

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Bucket {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// یک ردیف داده دریافتی از API پرس‌وجو
#[derive(Debug, Clone, Deserialize)]
pub struct Reading {
    #[serde(deserialize_with = "de_flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
    #[serde(default)]
    pub bucket: Option<String>,
}

impl Reading {
    /// استخراج مقدار عددی از payload
    ///
    /// برخی باکت‌ها یک شیء با چند فیلد برمی‌گردانند (مثلاً `{"temperature": 21.5}`)
    /// و برخی دیگر خودِ عدد را (شمارنده بازدیدکنندگان).
    pub fn value(&self, field: Option<&str>) -> Option<f64> {
        match field {
            Some(field) => self.payload.get(field).and_then(Value::as_f64),
            None => self.payload.as_f64(),
        }
    }
}

/// دی‌سریال‌سازی برچسب زمانی در قالب‌های مختلفی که سرویس تولید می‌کند
///
/// ستون timestamp در پایگاه داده به متن تبدیل می‌شود و بسته به مسیر درج، با یا
/// بدون ناحیه زمانی و با جداکننده فاصله یا `T` برمی‌گردد.
fn de_flexible_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }

    Err(serde::de::Error::custom(format!(
        "unrecognized timestamp format: {raw:?}"
    )))
}

/// خطاهای کلاینت API پرس‌وجو
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_accepts_service_timestamp_formats() {
        let rows: Vec<Reading> = serde_json::from_str(
            r#"[
                {"timestamp": "2024-01-10T12:00:00Z", "payload": 3},
                {"timestamp": "2024-01-10 12:00:00+00", "payload": 4},
                {"timestamp": "2024-01-10 12:00:00.250", "payload": 5}
            ]"#,
        )
        .expect("all formats parse");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].timestamp, rows[1].timestamp);
        assert!(rows[2].timestamp > rows[1].timestamp);
    }

    #[test]
    fn value_reads_field_or_bare_number() {
        let object: Reading = serde_json::from_str(
            r#"{"timestamp": "2024-01-10T12:00:00Z", "payload": {"temperature": 21.5}}"#,
        )
        .expect("object payload");
        let bare: Reading =
            serde_json::from_str(r#"{"timestamp": "2024-01-10T12:00:00Z", "payload": 17}"#)
                .expect("bare payload");

        assert_eq!(object.value(Some("temperature")), Some(21.5));
        assert_eq!(object.value(Some("humidity")), None);
        assert_eq!(object.value(None), None);
        assert_eq!(bare.value(None), Some(17.0));
    }
}
