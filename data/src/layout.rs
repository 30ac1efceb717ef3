use query::Bucket;
use serde::{Deserialize, Serialize};

/// تعریف یک داشبورد: مجموعه‌ای نام‌دار از ویجت‌ها
///
/// همه ویجت‌های یک داشبورد پنجره زمانی مشترک صفحه را مصرف می‌کنند.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub name: String,           // نام داشبورد
    pub widgets: Vec<Widget>,   // ویجت‌های داشبورد
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            name: "Home".to_string(),
            widgets: vec![],
        }
    }
}

/// تعریف یک ویجت روی داشبورد
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    pub title: String,  // عنوان کارت
    pub bucket: Bucket, // باکت داده در سرویس پرس‌وجو
    /// نام فیلد عددی داخل payload؛ بدون مقدار یعنی خود payload یک عدد است
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub kind: WidgetKind, // نوع نمایش
}

/// انواع نمایش یک ویجت
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// نمودار خطی سری زمانی روی بازه مشترک صفحه
    Chart { y_label: String },
    /// کاشی نمایش آخرین مقدار
    Status { unit: String },
}

impl Widget {
    fn chart(title: &str, bucket: &str, field: Option<&str>, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            bucket: Bucket::from(bucket),
            field: field.map(str::to_string),
            kind: WidgetKind::Chart {
                y_label: y_label.to_string(),
            },
        }
    }

    fn status(title: &str, bucket: &str, field: Option<&str>, unit: &str) -> Self {
        Self {
            title: title.to_string(),
            bucket: Bucket::from(bucket),
            field: field.map(str::to_string),
            kind: WidgetKind::Status {
                unit: unit.to_string(),
            },
        }
    }

    pub fn is_chart(&self) -> bool {
        matches!(self.kind, WidgetKind::Chart { .. })
    }
}

/// داشبوردهای پیش‌فرض برای اولین اجرای برنامه
pub fn default_dashboards() -> Vec<Dashboard> {
    vec![
        Dashboard {
            name: "Home".to_string(),
            widgets: vec![
                Widget::status(
                    "Current temperature living room",
                    "co2-sensor-living-room",
                    Some("temperature"),
                    "°C",
                ),
                Widget::status(
                    "Current humidity living room",
                    "co2-sensor-living-room",
                    Some("humidity"),
                    "%",
                ),
                Widget::status(
                    "Current CO2 living room",
                    "co2-sensor-living-room",
                    Some("co2"),
                    "ppm",
                ),
                Widget::status(
                    "Current humidity laundry room",
                    "humidity-laundry-room",
                    Some("humidity"),
                    "%",
                ),
                Widget::chart(
                    "Temperature living room",
                    "co2-sensor-living-room",
                    Some("temperature"),
                    "Temperature [°C]",
                ),
                Widget::chart(
                    "Humidity living room",
                    "co2-sensor-living-room",
                    Some("humidity"),
                    "Humidity [%]",
                ),
                Widget::chart(
                    "CO2 living room",
                    "co2-sensor-living-room",
                    Some("co2"),
                    "CO2 [ppm]",
                ),
                Widget::chart(
                    "Brightness reading nook",
                    "brightness-reading-nook",
                    Some("brightness"),
                    "Brightness [lux]",
                ),
                Widget::chart(
                    "Barometric pressure reading nook",
                    "barometric-reading-nook",
                    Some("pressure"),
                    "Pressure [hPa]",
                ),
                Widget::chart(
                    "Humidity laundry room",
                    "humidity-laundry-room",
                    Some("humidity"),
                    "Humidity [%]",
                ),
            ],
        },
        Dashboard {
            name: "Weight".to_string(),
            widgets: vec![Widget::chart(
                "Weight",
                "weight",
                Some("weight"),
                "Weight [kg]",
            )],
        },
        Dashboard {
            name: "Heuried".to_string(),
            widgets: vec![Widget::chart(
                "Current visitors",
                "heuried-visitors",
                None,
                "Visitors [#]",
            )],
        },
    ]
}

/// ساختار نگهدارنده ابعاد و موقعیت یک پنجره
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Window<T = f32> {
    pub width: T,  // عرض پنجره
    pub height: T, // ارتفاع پنجره
    pub pos_x: T,  // موقعیت افقی (X)
    pub pos_y: T,  // موقعیت عمودی (Y)
}

impl<T: Copy> Window<T> {
    pub fn size(&self) -> iced_core::Size<T> {
        iced_core::Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn position(&self) -> iced_core::Point<T> {
        iced_core::Point {
            x: self.pos_x,
            y: self.pos_y,
        }
    }
}

impl Default for Window<f32> {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            pos_x: 0.0,
            pos_y: 0.0,
        }
    }
}

/// مشخصات پنجره با مقادیر اعشاری (f32)
pub type WindowSpec = Window<f32>;

impl From<(&iced_core::Point, &iced_core::Size)> for WindowSpec {
    fn from((point, size): (&iced_core::Point, &iced_core::Size)) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pos_x: point.x,
            pos_y: point.y,
        }
    }
}
