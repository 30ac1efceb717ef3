use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::{fmt, str::FromStr};

const DAY_SECS: u64 = 86_400;
const HOUR_SECS: u64 = 3_600;

/// بازه‌های زمانی از پیش تعریف شده (Presets) برای انتخاب پنجره نمایش
///
/// مدت زمان هر گزینه یک مقدار ثابت بر حسب ثانیه است و به طول ماه‌های تقویمی
/// وابسته نیست (مثلاً «1y» دقیقاً ۳۶۰ روز است).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Y1,  // یک سال (۳۶۰ روز)
    M6,  // شش ماه (۱۸۰ روز)
    D30, // سی روز
    D7,  // هفت روز
    D1,  // یک روز
    #[default]
    H6, // شش ساعت
    /// پنجره سفارشی با کران‌های مطلق و ثابت
    Custom,
}

impl Preset {
    /// گزینه‌های قابل انتخاب در نوار انتخاب بازه (بدون حالت سفارشی)
    pub const SELECTABLE: [Preset; 6] = [
        Preset::Y1,
        Preset::M6,
        Preset::D30,
        Preset::D7,
        Preset::D1,
        Preset::H6,
    ];

    /// مدت زمان گزینه بر حسب ثانیه؛ برای حالت سفارشی صفر برمی‌گرداند
    pub fn duration_secs(self) -> u64 {
        match self {
            Preset::Y1 => 360 * DAY_SECS,
            Preset::M6 => 180 * DAY_SECS,
            Preset::D30 => 30 * DAY_SECS,
            Preset::D7 => 7 * DAY_SECS,
            Preset::D1 => DAY_SECS,
            Preset::H6 => 6 * HOUR_SECS,
            Preset::Custom => 0,
        }
    }

    /// محاسبه کران پایین پنجره نسبت به لحظه مرجع (`anchor - duration`)
    pub fn resolve(self, anchor: DateTime<Utc>) -> DateTime<Utc> {
        anchor - TimeDelta::seconds(self.duration_secs() as i64)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Preset::Y1 => "1y",
                Preset::M6 => "6m",
                Preset::D30 => "30d",
                Preset::D7 => "7d",
                Preset::D1 => "1d",
                Preset::H6 => "6h",
                Preset::Custom => "C",
            }
        )
    }
}

impl FromStr for Preset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1y" => Ok(Preset::Y1),
            "6m" => Ok(Preset::M6),
            "30d" => Ok(Preset::D30),
            "7d" => Ok(Preset::D7),
            "1d" => Ok(Preset::D1),
            "6h" => Ok(Preset::H6),
            "C" => Ok(Preset::Custom),
            _ => Err(()),
        }
    }
}

impl Serialize for Preset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Preset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // ورودی ناشناخته خطا نیست؛ به گزینه پیش‌فرض برمی‌گردد
        let label = String::deserialize(deserializer)?;
        Ok(label.parse().unwrap_or_default())
    }
}

/// جهت جابجایی پنجره زمانی با صفحه‌کلید
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,  // به عقب (داده‌های قدیمی‌تر)
    Right, // به جلو (داده‌های جدیدتر)
}

/// پنجره زمانی قابل مشاهده داشبورد
///
/// در حالت Preset کران پایین در هر بار خواندن نسبت به «اکنون» محاسبه می‌شود و
/// `to` برابر None است (پنجره زنده). در حالت سفارشی هر دو کران مطلق و ثابت‌اند
/// تا زمانی که کاربر آن‌ها را تغییر دهد.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    option: Preset,
    custom: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl TimeWindow {
    pub fn with_preset(option: Preset) -> Self {
        Self {
            option: if option == Preset::Custom {
                // حالت سفارشی بدون کران تعریف نشده است؛ به پیش‌فرض برمی‌گردد
                Preset::default()
            } else {
                option
            },
            custom: None,
        }
    }

    pub fn option(&self) -> Preset {
        self.option
    }

    /// کران‌های پنجره در لحظه `now`؛ مقدار None برای `to` به معنی «اکنون» است
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
        match self.custom {
            Some((from, to)) if self.option == Preset::Custom => (from, Some(to)),
            _ => (self.option.resolve(now), None),
        }
    }

    /// کران‌های پنجره با جایگزینی «اکنون» به جای کران باز
    pub fn resolved(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let (from, to) = self.bounds(now);
        (from, to.unwrap_or(now))
    }

    /// انتخاب یک گزینه بازه
    ///
    /// انتخاب هر Preset واقعی کران‌های سفارشی ذخیره‌شده قبلی را پاک می‌کند.
    /// انتخاب «C» کران‌های سفارشی قبلی را دست‌نخورده نگه می‌دارد و اگر کرانی
    /// ذخیره نشده باشد، پنجره Preset فعال قبلی را در لحظه فراخوانی منجمد می‌کند.
    pub fn set_option(&mut self, option: Preset, now: DateTime<Utc>) {
        if option == Preset::Custom {
            if self.custom.is_none() {
                self.custom = Some((self.option.resolve(now), now));
            }
        } else {
            self.custom = None;
        }
        self.option = option;
    }

    /// تنظیم کران‌های سفارشی بدون هیچ اعتبارسنجی
    ///
    /// ذخیره `from > to` مجاز است و باید در پایین‌دست به یک بازه خالی منجر
    /// شود، نه خطا.
    pub fn set_custom_bounds(&mut self, from: DateTime<Utc>, to: DateTime<Utc>) {
        self.option = Preset::Custom;
        self.custom = Some((from, to));
    }

    /// جابجایی پنجره به اندازه دقیقاً یک عرض پنجره
    ///
    /// پنجره زنده در لحظه فراخوانی ارزیابی و سپس منجمد می‌شود (حالت سفارشی)؛
    /// در غیر این صورت ارزیابی زنده بعدی جابجایی را بلافاصله خنثی می‌کرد.
    /// پنجره با عرض صفر یا منفی بدون تغییر می‌ماند.
    pub fn pan(&mut self, direction: PanDirection, now: DateTime<Utc>) -> bool {
        let (from, to) = self.resolved(now);
        let width = to - from;

        if width <= TimeDelta::zero() {
            return false;
        }

        let (new_from, new_to) = match direction {
            PanDirection::Left => (from - width, from),
            PanDirection::Right => (to, to + width),
        };

        self.option = Preset::Custom;
        self.custom = Some((new_from, new_to));
        true
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::with_preset(Preset::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Subscriber {
    id: u64,
    notify: Box<dyn Fn(TimeWindow) + Send>,
}

/// منبع واحد و مشترک پنجره زمانی برای همه ویجت‌های یک صفحه
///
/// یک نمونه در ریشه برنامه ساخته می‌شود و با مرجع (`Arc`) به هر ویجت داده
/// می‌شود؛ ویجت‌ها هرگز مستقیماً وضعیت را تغییر نمی‌دهند و فقط از عملیات‌های
/// تعریف‌شده استفاده می‌کنند. همه تغییرها همزمان (synchronous) اعمال می‌شوند و
/// مشترکین همیشه مقدار کامل و نهایی را می‌بینند، نه به‌روزرسانی ناقص را.
pub struct RangeStore {
    window: Mutex<TimeWindow>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl RangeStore {
    pub fn new(initial: Preset) -> Arc<Self> {
        Arc::new(Self {
            window: Mutex::new(TimeWindow::with_preset(initial)),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// کپی از پنجره زمانی فعلی
    pub fn window(&self) -> TimeWindow {
        *lock(&self.window)
    }

    pub fn option(&self) -> Preset {
        self.window().option()
    }

    /// کران‌های فعلی؛ Preset زنده در هر بار خواندن نسبت به «اکنون» جلو می‌رود
    pub fn bounds(&self) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
        self.window().bounds(Utc::now())
    }

    pub fn resolved_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.window().resolved(Utc::now())
    }

    pub fn set_option(&self, option: Preset) {
        let window = {
            let mut guard = lock(&self.window);
            guard.set_option(option, Utc::now());
            *guard
        };
        self.notify(window);
    }

    pub fn set_custom_bounds(&self, from: DateTime<Utc>, to: DateTime<Utc>) {
        let window = {
            let mut guard = lock(&self.window);
            guard.set_custom_bounds(from, to);
            *guard
        };
        self.notify(window);
    }

    /// جابجایی پنجره؛ در صورت پنجره بدون عرض، هیچ اعلانی ارسال نمی‌شود
    pub fn pan(&self, direction: PanDirection) -> bool {
        let panned = {
            let mut guard = lock(&self.window);
            let panned = guard.pan(direction, Utc::now());
            panned.then_some(*guard)
        };

        match panned {
            Some(window) => {
                self.notify(window);
                true
            }
            None => false,
        }
    }

    /// ثبت یک مشترک برای دریافت هر تغییر پنجره
    ///
    /// گارد برگشتی هنگام Drop اشتراک را لغو می‌کند؛ فراخوانی مجدد subscribe از
    /// داخل خود callback مجاز نیست.
    pub fn subscribe(
        self: &Arc<Self>,
        notify: impl Fn(TimeWindow) + Send + 'static,
    ) -> RangeSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        lock(&self.subscribers).push(Subscriber {
            id,
            notify: Box::new(notify),
        });

        RangeSubscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    fn notify(&self, window: TimeWindow) {
        for subscriber in lock(&self.subscribers).iter() {
            (subscriber.notify)(window);
        }
    }
}

/// گارد اشتراک؛ با Drop شدن، مشترک از فهرست حذف می‌شود
pub struct RangeSubscription {
    id: u64,
    store: Weak<RangeStore>,
}

impl Drop for RangeSubscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            lock(&store.subscribers).retain(|subscriber| subscriber.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid rfc3339 in test")
            .with_timezone(&Utc)
    }

    #[test]
    fn durations_are_fixed_second_counts() {
        assert_eq!(Preset::Y1.duration_secs(), 360 * 86_400);
        assert_eq!(Preset::M6.duration_secs(), 180 * 86_400);
        assert_eq!(Preset::D30.duration_secs(), 30 * 86_400);
        assert_eq!(Preset::D7.duration_secs(), 7 * 86_400);
        assert_eq!(Preset::D1.duration_secs(), 86_400);
        assert_eq!(Preset::H6.duration_secs(), 6 * 3_600);
        assert_eq!(Preset::Custom.duration_secs(), 0);
    }

    #[test]
    fn resolve_subtracts_duration_from_anchor() {
        let anchor = at("2024-01-10T12:00:00Z");

        for preset in Preset::SELECTABLE {
            let expected = anchor - TimeDelta::seconds(preset.duration_secs() as i64);
            assert_eq!(preset.resolve(anchor), expected, "{preset}");
        }
    }

    #[test]
    fn unknown_label_parses_to_default() {
        assert!("90d".parse::<Preset>().is_err());
        assert_eq!(
            serde_json::from_str::<Preset>("\"90d\"").expect("lenient deserialize"),
            Preset::default(),
        );
    }

    #[test]
    fn preset_switch_scenario() {
        let anchor = at("2024-01-10T12:00:00Z");
        let mut window = TimeWindow::with_preset(Preset::D1);

        let (from, to) = window.bounds(anchor);
        assert_eq!(from, at("2024-01-09T12:00:00Z"));
        assert_eq!(to, None);

        window.set_option(Preset::H6, anchor);
        let (from, _) = window.bounds(anchor);
        assert_eq!(from, at("2024-01-10T06:00:00Z"));
    }

    #[test]
    fn live_preset_drifts_with_the_clock() {
        let window = TimeWindow::with_preset(Preset::H6);
        let t0 = at("2024-01-10T12:00:00Z");
        let t1 = t0 + TimeDelta::seconds(10);

        let (from0, _) = window.bounds(t0);
        let (from1, _) = window.bounds(t1);
        assert_eq!(from1 - from0, TimeDelta::seconds(10));
    }

    #[test]
    fn pan_round_trip_is_bit_exact() {
        let from = at("2024-01-01T00:00:00Z");
        let to = at("2024-01-02T06:30:00Z");
        let now = at("2024-03-01T00:00:00Z");

        let mut window = TimeWindow::default();
        window.set_custom_bounds(from, to);

        assert!(window.pan(PanDirection::Left, now));
        assert!(window.pan(PanDirection::Right, now));

        assert_eq!(window.resolved(now), (from, to));
    }

    #[test]
    fn pan_keeps_window_width() {
        let now = at("2024-01-10T12:00:00Z");
        let mut window = TimeWindow::with_preset(Preset::D7);

        assert!(window.pan(PanDirection::Left, now));
        let (from, to) = window.resolved(now);
        assert_eq!(to - from, TimeDelta::seconds(7 * 86_400));
        assert_eq!(to, now - TimeDelta::seconds(7 * 86_400));
    }

    #[test]
    fn pan_freezes_live_preset() {
        let t0 = at("2024-01-10T12:00:00Z");
        let t1 = at("2024-01-10T13:00:00Z");

        let mut window = TimeWindow::with_preset(Preset::H6);
        assert!(window.pan(PanDirection::Left, t0));

        assert_eq!(window.option(), Preset::Custom);
        // پس از جابجایی، خواندن‌های بعدی دیگر با ساعت دیواری جلو نمی‌روند
        assert_eq!(window.bounds(t0), window.bounds(t1));
    }

    #[test]
    fn zero_width_pan_is_a_noop() {
        let instant = at("2024-01-10T12:00:00Z");
        let now = at("2024-02-01T00:00:00Z");

        let mut window = TimeWindow::default();
        window.set_custom_bounds(instant, instant);

        assert!(!window.pan(PanDirection::Left, now));
        assert_eq!(window.resolved(now), (instant, instant));
    }

    #[test]
    fn inverted_custom_bounds_are_stored_and_inert() {
        let t1 = at("2024-01-10T12:00:00Z");
        let t2 = at("2024-01-01T00:00:00Z");
        let now = at("2024-02-01T00:00:00Z");

        let mut window = TimeWindow::default();
        window.set_custom_bounds(t1, t2);

        assert_eq!(window.resolved(now), (t1, t2));
        assert!(!window.pan(PanDirection::Right, now));
        assert_eq!(window.resolved(now), (t1, t2));
    }

    #[test]
    fn switching_to_custom_freezes_previous_preset() {
        let now = at("2024-01-10T12:00:00Z");
        let mut window = TimeWindow::with_preset(Preset::D1);

        window.set_option(Preset::Custom, now);

        assert_eq!(window.option(), Preset::Custom);
        assert_eq!(window.resolved(now), (at("2024-01-09T12:00:00Z"), now));
    }

    #[test]
    fn selecting_preset_clears_stored_custom_bounds() {
        let now = at("2024-01-10T12:00:00Z");
        let later = at("2024-01-20T00:00:00Z");

        let mut window = TimeWindow::default();
        window.set_custom_bounds(at("2023-12-01T00:00:00Z"), at("2023-12-02T00:00:00Z"));
        window.set_option(Preset::D7, now);

        // بازگشت به حالت سفارشی دیگر کران‌های قدیمی را برنمی‌گرداند
        window.set_option(Preset::Custom, later);
        assert_eq!(window.resolved(later), (Preset::D7.resolve(later), later));
    }

    #[test]
    fn store_notifies_subscribers_and_unsubscribes_on_drop() {
        let store = RangeStore::new(Preset::H6);
        let seen = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let seen = seen.clone();
            store.subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };

        store.set_option(Preset::D1);
        store.pan(PanDirection::Left);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        drop(subscription);
        store.set_option(Preset::H6);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn store_zero_width_pan_does_not_notify() {
        let store = RangeStore::new(Preset::H6);
        let instant = at("2024-01-10T12:00:00Z");
        store.set_custom_bounds(instant, instant);

        let seen = Arc::new(AtomicUsize::new(0));
        let _subscription = {
            let seen = seen.clone();
            store.subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(!store.pan(PanDirection::Right));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn store_subscribers_observe_complete_updates_in_order() {
        let store = RangeStore::new(Preset::H6);
        let windows = Arc::new(Mutex::new(Vec::new()));

        let _subscription = {
            let windows = windows.clone();
            store.subscribe(move |window| {
                lock(&windows).push(window);
            })
        };

        let from = at("2024-01-01T00:00:00Z");
        let to = at("2024-01-02T00:00:00Z");
        store.set_custom_bounds(from, to);
        store.set_option(Preset::D30);

        let seen = lock(&windows).clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].option(), Preset::Custom);
        assert_eq!(seen[0].resolved(to), (from, to));
        assert_eq!(seen[1].option(), Preset::D30);
    }
}
