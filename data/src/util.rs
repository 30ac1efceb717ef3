use serde::{Deserialize, Deserializer};

/// تابعی برای دی‌سریال‌سازی که در صورت بروز خطا، مقدار پیش‌فرض را برمی‌گرداند
pub fn ok_or_default<'a, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'a> + Default,
    D: Deserializer<'a>,
{
    let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(T::deserialize(v).unwrap_or_default())
}

/// اختصار اعداد بزرگ (مثلاً 1.5m برای یک میلیون و پانصد هزار)
pub fn abbr_large_numbers(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    match abs_value {
        v if v >= 1_000_000_000.0 => format!("{}{:.2}b", sign, v / 1_000_000_000.0),
        v if v >= 1_000_000.0 => format!("{}{:.2}m", sign, v / 1_000_000.0),
        v if v >= 10_000.0 => format!("{}{:.1}k", sign, v / 1_000.0),
        v if v >= 1_000.0 => format!("{}{:.2}k", sign, v / 1_000.0),
        v if v >= 100.0 => format!("{}{:.0}", sign, v),
        v if v >= 10.0 => format!("{}{:.1}", sign, v),
        v if v >= 1.0 => format!("{}{:.2}", sign, v),
        _ => {
            if abs_value == 0.0 {
                "0".to_string()
            } else {
                let s = format!("{}{:.3}", sign, abs_value);
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
    }
}

/// نمایش مقدار یک کاشی وضعیت؛ ارقام اعشار متناسب با بزرگی عدد
pub fn format_value(value: f64) -> String {
    let abs_value = value.abs();

    match abs_value {
        v if v >= 10_000.0 => abbr_large_numbers(value),
        v if v >= 100.0 => format!("{value:.0}"),
        v if v >= 1.0 => format!("{value:.1}"),
        _ => format!("{value:.2}"),
    }
}

/// گرد کردن مقدار به گام بعدی محور (بالا یا پایین)
pub fn round_to_next_tick(value: f64, tick_size: f64, down: bool) -> f64 {
    if down {
        (value / tick_size).floor() * tick_size
    } else {
        (value / tick_size).ceil() * tick_size
    }
}

/// حدس زدن گام مناسب برچسب‌های محور بر اساس دامنه مقادیر
pub fn guesstimate_ticks(range: f64) -> f64 {
    match range {
        r if r > 1_000_000_000.0 => 100_000_000.0,
        r if r > 100_000_000.0 => 10_000_000.0,
        r if r > 10_000_000.0 => 1_000_000.0,
        r if r > 1_000_000.0 => 100_000.0,
        r if r > 100_000.0 => 10_000.0,
        r if r > 10_000.0 => 1_000.0,
        r if r > 1_000.0 => 100.0,
        r if r > 100.0 => 10.0,
        r if r > 10.0 => 1.0,
        r if r > 1.0 => 0.1,
        r if r > 0.1 => 0.01,
        r if r > 0.01 => 0.001,
        _ => 0.0001,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_keep_sensible_precision() {
        assert_eq!(format_value(415.0), "415");
        assert_eq!(format_value(21.54), "21.5");
        assert_eq!(format_value(0.527), "0.53");
        assert_eq!(format_value(84_200.0), "84.2k");
    }

    #[test]
    fn axis_ticks_fit_the_range() {
        assert_eq!(guesstimate_ticks(650.0), 10.0);
        assert_eq!(guesstimate_ticks(42.0), 1.0);
        assert_eq!(guesstimate_ticks(0.5), 0.01);
        assert_eq!(round_to_next_tick(413.0, 10.0, true), 410.0);
        assert_eq!(round_to_next_tick(413.0, 10.0, false), 420.0);
    }
}
