use iced_futures::futures::{Stream, stream};
use rand::Rng;

use std::time::Duration;

/// بازه بروزرسانی پیش‌فرض ویجت‌ها
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(30_000);

/// زمان‌بند بروزرسانی یک ویجت
///
/// اگر N ویجت با بازه یکسان همزمان ساخته شوند و همه در یک لحظه درخواست بزنند،
/// هر `interval` یک بار بار سرور ناگهان اوج می‌گیرد. به همین دلیل اولین
/// بروزرسانی هر ویجت با یک تاخیر تصادفی یکنواخت در `[0, interval)` پخش می‌شود
/// و از آن به بعد آهنگ ثابت است.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTimer {
    interval: Duration,
    jitter: Duration,
}

impl RefreshTimer {
    /// ساخت زمان‌بند با تاخیر اولیه تصادفی
    pub fn new(interval: Duration) -> Self {
        let jitter = if interval.is_zero() {
            Duration::ZERO
        } else {
            let millis = rand::thread_rng().gen_range(0..interval.as_millis().max(1) as u64);
            Duration::from_millis(millis)
        };

        Self { interval, jitter }
    }

    /// ساخت زمان‌بند با تاخیر اولیه مشخص، برای مسیرهای قطعی و تست‌ها
    pub fn with_jitter(interval: Duration, jitter: Duration) -> Self {
        Self { interval, jitter }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn jitter(&self) -> Duration {
        self.jitter
    }
}

enum Phase {
    First,
    Recurring,
}

/// جریان تیک‌های بروزرسانی: یک تیک پس از تاخیر اولیه و سپس با آهنگ ثابت
///
/// چرخه عمر جریان همان چرخه عمر ویجت است؛ Drop شدن آن هم تایمر اولیه و هم
/// تایمر تکرارشونده را لغو می‌کند.
pub fn ticks(timer: RefreshTimer) -> impl Stream<Item = ()> {
    stream::unfold(Phase::First, move |phase| async move {
        let delay = match phase {
            Phase::First => timer.jitter(),
            Phase::Recurring => timer.interval(),
        };
        tokio::time::sleep(delay).await;

        Some(((), Phase::Recurring))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced_futures::futures::StreamExt;

    #[test]
    fn jitter_is_uniform_within_the_interval() {
        let interval = Duration::from_millis(30_000);
        let mut below_half = 0usize;
        let mut above_half = 0usize;

        for _ in 0..1_000 {
            let timer = RefreshTimer::new(interval);

            assert!(timer.jitter() < interval);
            if timer.jitter() < interval / 2 {
                below_half += 1;
            } else {
                above_half += 1;
            }
        }

        // هر دو نیمه بازه باید بارها دیده شوند
        assert!(below_half > 100, "below_half = {below_half}");
        assert!(above_half > 100, "above_half = {above_half}");
    }

    #[test]
    fn zero_interval_draws_zero_jitter() {
        let timer = RefreshTimer::new(Duration::ZERO);
        assert_eq!(timer.jitter(), Duration::ZERO);
    }

    #[tokio::test]
    async fn first_tick_waits_for_the_jitter() {
        let timer = RefreshTimer::with_jitter(Duration::from_millis(5), Duration::from_millis(40));
        let mut ticks = Box::pin(ticks(timer));

        let started = std::time::Instant::now();
        ticks.next().await;

        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn recurring_ticks_follow_the_interval() {
        let timer = RefreshTimer::with_jitter(Duration::from_millis(20), Duration::ZERO);
        let mut ticks = Box::pin(ticks(timer));

        let started = std::time::Instant::now();
        ticks.next().await;
        let after_first = started.elapsed();

        ticks.next().await;
        ticks.next().await;

        assert!(after_first < Duration::from_millis(20));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
