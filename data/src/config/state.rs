use super::theme::Theme;
use super::timezone::UserTimezone;
use super::{Api, ScaleFactor};
use crate::layout::{Dashboard, WindowSpec, default_dashboards};
use crate::range::Preset;
use crate::util::ok_or_default;

use serde::{Deserialize, Serialize};

/// ساختار کلی وضعیت برنامه (Application State) برای ذخیره‌سازی و بازیابی
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    #[serde(deserialize_with = "ok_or_default")]
    pub dashboards: Vec<Dashboard>,         // تعریف داشبوردها و ویجت‌هایشان
    pub active_dashboard: Option<String>,   // نام داشبورد فعال فعلی
    pub initial_preset: Preset,             // بازه زمانی ابتدای هر اجرا
    pub refresh_interval_ms: u64,           // آهنگ بروزرسانی ویجت‌ها
    pub api: Api,                           // آدرس سرویس پرس‌وجو
    pub selected_theme: Theme,              // تم انتخاب شده
    pub timezone: UserTimezone,             // منطقه زمانی نمایش
    pub scale_factor: ScaleFactor,          // ضریب مقیاس رابط کاربری
    pub main_window: Option<WindowSpec>,    // مشخصات پنجره اصلی
}

impl Default for State {
    fn default() -> Self {
        State {
            dashboards: default_dashboards(),
            active_dashboard: None,
            initial_preset: Preset::default(),
            refresh_interval_ms: query::refresh::DEFAULT_INTERVAL.as_millis() as u64,
            api: Api::default(),
            selected_theme: Theme::default(),
            timezone: UserTimezone::default(),
            scale_factor: ScaleFactor::default(),
            main_window: None,
        }
    }
}

impl State {
    /// ایجاد یک نمونه جدید از وضعیت برنامه با استفاده از اجزای مختلف
    pub fn from_parts(
        dashboards: Vec<Dashboard>,
        active_dashboard: Option<String>,
        initial_preset: Preset,
        refresh_interval_ms: u64,
        api: Api,
        selected_theme: Theme,
        timezone: UserTimezone,
        scale_factor: ScaleFactor,
        main_window: Option<WindowSpec>,
    ) -> Self {
        State {
            dashboards,
            active_dashboard,
            initial_preset,
            refresh_interval_ms,
            api,
            selected_theme: Theme(selected_theme.0),
            timezone,
            scale_factor,
            main_window,
        }
    }
}
