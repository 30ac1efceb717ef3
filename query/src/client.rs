use crate::limiter::{self, FixedWindowBucket};
use crate::{Bucket, Error, Reading};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::Mutex;

use std::sync::LazyLock;
use std::time::Duration;

// سهمیه درخواست‌ها؛ بسیار بالاتر از نیاز یک داشبورد با بازه بروزرسانی ۳۰ ثانیه
const REQUEST_LIMIT: usize = 240;
const REFILL_RATE: Duration = Duration::from_secs(60);

static API_LIMITER: LazyLock<Mutex<FixedWindowBucket>> =
    LazyLock::new(|| Mutex::new(FixedWindowBucket::new(REQUEST_LIMIT, REFILL_RATE)));

/// تعداد نقاط نمونه‌برداری سمت سرور برای نمودارها
pub const DEFAULT_SAMPLE: usize = 1000;

/// کلاینت API پرس‌وجوی داده‌های حسگر
///
/// فقط آدرس پایه را نگه می‌دارد؛ اتصال‌ها از کلاینت HTTP مشترک استفاده می‌کنند.
#[derive(Debug, Clone)]
pub struct QueryClient {
    base_url: String,
}

impl QueryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// دریافت سری زمانی یک باکت در بازه `[from, to]` با نمونه‌برداری سرور
    ///
    /// بازه وارونه (`from > to`) خطا نیست و سرور برای آن مجموعه خالی برمی‌گرداند.
    pub async fn series(
        &self,
        bucket: &Bucket,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        sample: usize,
    ) -> Result<Vec<Reading>, Error> {
        let url = format!(
            "{}/data?bucket={}&from={}&to={}&sample={}",
            self.base_url,
            bucket,
            iso8601(from),
            iso8601(to),
            sample,
        );

        limiter::http_get_json(&url, &API_LIMITER, 1).await
    }

    /// دریافت آخرین ردیف(های) یک باکت، برای کاشی‌های مقدار لحظه‌ای
    pub async fn latest(&self, bucket: &Bucket, limit: usize) -> Result<Vec<Reading>, Error> {
        if limit == 0 {
            return Err(Error::InvalidRequest(
                "limit must be at least 1".to_string(),
            ));
        }

        let url = format!("{}/data?bucket={}&limit={}", self.base_url, bucket, limit);

        limiter::http_get_json(&url, &API_LIMITER, 1).await
    }

    /// فهرست باکت‌های شناخته‌شده سرور
    pub async fn buckets(&self) -> Result<Vec<String>, Error> {
        let url = format!("{}/buckets", self.base_url);

        limiter::http_get_json(&url, &API_LIMITER, 1).await
    }
}

fn iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = QueryClient::new("http://127.0.0.1:3000/api/");
        assert_eq!(client.base_url, "http://127.0.0.1:3000/api");
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let instant = DateTime::parse_from_rfc3339("2024-01-10T12:00:00.5+01:00")
            .expect("valid rfc3339 in test")
            .with_timezone(&Utc);

        assert_eq!(iso8601(instant), "2024-01-10T11:00:00.500Z");
    }
}
