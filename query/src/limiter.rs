use crate::Error;

use reqwest::Client;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

pub static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(Client::new);

/// محدودکننده نرخ درخواست بر اساس پنجره زمانی ثابت (Fixed Window)
///
/// داشبوردی با ده‌ها ویجت و یک بازه بروزرسانی مشترک نباید بتواند سرویس پرس‌وجو
/// را با رگبار درخواست روبرو کند؛ توکن‌ها در ابتدای هر پنجره دوباره شارژ می‌شوند.
pub struct FixedWindowBucket {
    max_tokens: usize,       // حداکثر توکن مجاز در هر پنجره
    available_tokens: usize, // توکن‌های باقی‌مانده پنجره فعلی
    last_refill: Instant,    // زمان آخرین شارژ مجدد
    refill_rate: Duration,   // طول پنجره زمانی
}

impl FixedWindowBucket {
    pub fn new(max_tokens: usize, refill_rate: Duration) -> Self {
        Self {
            max_tokens,
            available_tokens: max_tokens,
            last_refill: Instant::now(),
            refill_rate,
        }
    }

    fn refill(&mut self) {
        if self.last_refill.elapsed() >= self.refill_rate {
            self.available_tokens = self.max_tokens;
            self.last_refill = Instant::now();
        }
    }

    /// مصرف توکن؛ در صورت اتمام سهمیه، زمان انتظار تا پنجره بعدی را برمی‌گرداند
    pub fn calculate_wait_time(&mut self, tokens: usize) -> Option<Duration> {
        self.refill();

        if self.available_tokens >= tokens {
            self.available_tokens -= tokens;
            return None;
        }

        Some(self.refill_rate.saturating_sub(self.last_refill.elapsed()))
    }
}

/// ارسال درخواست GET با رعایت محدودیت نرخ
pub async fn http_get(
    url: &str,
    limiter: &tokio::sync::Mutex<FixedWindowBucket>,
    weight: usize,
) -> Result<String, Error> {
    let mut limiter_guard = limiter.lock().await;

    if let Some(wait_time) = limiter_guard.calculate_wait_time(weight) {
        log::warn!("Rate limit hit for: {url}. Waiting for {wait_time:?}");
        tokio::time::sleep(wait_time).await;
        limiter_guard.calculate_wait_time(weight);
    }
    drop(limiter_guard);

    let response = HTTP_CLIENT.get(url).send().await?;
    let response = response.error_for_status()?;

    Ok(response.text().await?)
}

/// دریافت و پارس JSON با گزارش تشخیصی در صورت پاسخ نامعتبر
pub async fn http_get_json<V>(
    url: &str,
    limiter: &tokio::sync::Mutex<FixedWindowBucket>,
    weight: usize,
) -> Result<V, Error>
where
    V: serde::de::DeserializeOwned,
{
    let body = http_get(url, limiter, weight).await?;
    let trimmed = body.trim();

    let body_preview = |body: &str, n: usize| {
        let trimmed = body.trim();
        let mut preview = trimmed.chars().take(n).collect::<String>();
        if trimmed.len() > n {
            preview.push('…');
        }
        preview
    };

    if trimmed.is_empty() {
        let msg = format!("Empty response body | url={url}");
        log::error!("{msg}");
        return Err(Error::Parse(msg));
    }
    if trimmed.starts_with('<') {
        let msg = format!(
            "Non-JSON (HTML?) response | url={} | len={} | preview={:?}",
            url,
            body.len(),
            body_preview(&body, 200)
        );
        log::error!("{msg}");
        return Err(Error::Parse(msg));
    }

    serde_json::from_str(&body).map_err(|e| {
        let msg = format!(
            "JSON parse failed: {} | url={} | response_len={} | preview={:?}",
            e,
            url,
            body.len(),
            body_preview(&body, 200)
        );
        log::error!("{msg}");
        Error::Parse(msg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_exhausts_within_one_window() {
        let mut bucket = FixedWindowBucket::new(2, Duration::from_secs(60));

        assert_eq!(bucket.calculate_wait_time(1), None);
        assert_eq!(bucket.calculate_wait_time(1), None);

        let wait = bucket
            .calculate_wait_time(1)
            .expect("third request must wait");
        assert!(wait <= Duration::from_secs(60));
    }

    #[test]
    fn bucket_refills_after_the_window_elapses() {
        let mut bucket = FixedWindowBucket::new(1, Duration::from_millis(0));

        assert_eq!(bucket.calculate_wait_time(1), None);
        // با پنجره صفر، هر فراخوانی دوباره شارژ می‌شود
        assert_eq!(bucket.calculate_wait_time(1), None);
    }
}
