use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

const DAY_SECS: u64 = 86_400;

/// انواع مناطق زمانی قابل انتخاب توسط کاربر
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UserTimezone {
    #[default]
    Utc,   // زمان هماهنگ جهانی (UTC)
    Local, // زمان محلی سیستم کاربر
}

impl UserTimezone {
    /// قالب‌بندی برچسب محور زمان بر اساس عرض پنجره قابل مشاهده
    pub fn format_axis_label(&self, timestamp: i64, window_secs: u64) -> String {
        if let Some(datetime) = DateTime::from_timestamp(timestamp, 0) {
            match self {
                UserTimezone::Local => {
                    Self::format_by_span(&datetime.with_timezone(&chrono::Local), window_secs)
                }
                UserTimezone::Utc => {
                    Self::format_by_span(&datetime.with_timezone(&chrono::Utc), window_secs)
                }
            }
        } else {
            String::new()
        }
    }

    /// قالب‌بندی یک شیء `DateTime` متناسب با عرض پنجره
    fn format_by_span<Tz: chrono::TimeZone>(datetime: &DateTime<Tz>, window_secs: u64) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        if window_secs <= 2 * DAY_SECS {
            // برای پنجره‌های کوتاه، ساعت کافی است
            datetime.format("%H:%M").to_string()
        } else if window_secs <= 60 * DAY_SECS {
            datetime.format("%b %-d").to_string()
        } else {
            datetime.format("%b %y").to_string()
        }
    }

    /// قالب‌بندی کامل یک لحظه، برای تولتیپ‌ها و برچسب بازه سفارشی
    pub fn format_full(&self, timestamp: i64) -> String {
        if let Some(datetime) = DateTime::from_timestamp(timestamp, 0) {
            match self {
                UserTimezone::Local => datetime
                    .with_timezone(&chrono::Local)
                    .format("%b %-d %Y %H:%M")
                    .to_string(),
                UserTimezone::Utc => datetime
                    .with_timezone(&chrono::Utc)
                    .format("%b %-d %Y %H:%M")
                    .to_string(),
            }
        } else {
            String::new()
        }
    }
}

impl fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => {
                let local_offset = chrono::Local::now().offset().local_minus_utc();
                let hours = local_offset / 3600;
                let minutes = (local_offset % 3600) / 60;
                write!(f, "Local (UTC {hours:+03}:{minutes:02})")
            }
        }
    }
}

impl<'de> Deserialize<'de> for UserTimezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let timezone_str = String::deserialize(deserializer)?;
        match timezone_str.to_lowercase().as_str() {
            "utc" => Ok(UserTimezone::Utc),
            "local" => Ok(UserTimezone::Local),
            _ => Err(serde::de::Error::custom("Invalid UserTimezone")),
        }
    }
}

impl Serialize for UserTimezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            UserTimezone::Utc => serializer.serialize_str("UTC"),
            UserTimezone::Local => serializer.serialize_str("Local"),
        }
    }
}
