use data::UserTimezone;
use data::util::{abbr_large_numbers, guesstimate_ticks, round_to_next_tick};
use query::Reading;

use chrono::{DateTime, Utc};
use iced::widget::canvas::{self, Cache, Canvas, Path, Stroke};
use iced::{Alignment, Element, Length, Point, Rectangle, Renderer, Theme, mouse};

const TEXT_SIZE: f32 = 10.0;
const Y_AXIS_WIDTH: f32 = 46.0; // ستون برچسب‌های محور Y در سمت راست
const X_AXIS_HEIGHT: f32 = 18.0;
const PADDING: f32 = 6.0;

/// ساخت ویجت نمودار خطی با ارتفاع ثابت
///
/// عرض از چیدمان گرفته می‌شود؛ ابعاد نهایی در هر رسم از `bounds` خوانده می‌شود
/// و تغییر اندازه کارت به صورت خودکار هندسه را دوباره می‌سازد.
pub fn view<Message: 'static>(plot: LinePlot<'_>, height: f32) -> Element<'_, Message> {
    Canvas::new(plot)
        .width(Length::Fill)
        .height(Length::Fixed(height))
        .into()
}

/// نمودار خطی یک سری زمانی روی بازه دریافت‌شده آن
pub struct LinePlot<'a> {
    pub cache: &'a Cache,       // کش هندسه؛ با رسیدن داده جدید خالی می‌شود
    pub readings: &'a [Reading],
    pub field: Option<&'a str>,
    /// بازه‌ای که داده برای آن دریافت شده؛ دامنه محور X
    pub window: (DateTime<Utc>, DateTime<Utc>),
    pub timezone: UserTimezone,
}

impl LinePlot<'_> {
    /// نقاط قابل رسم: ثانیه نسبت به ابتدای بازه و مقدار عددی
    fn points(&self) -> Vec<(f64, f64)> {
        let (from, _) = self.window;

        self.readings
            .iter()
            .filter_map(|reading| {
                let value = reading.value(self.field)?;
                let offset = (reading.timestamp - from).num_milliseconds() as f64 / 1000.0;
                Some((offset, value))
            })
            .collect()
    }

    fn draw_plot(&self, frame: &mut canvas::Frame, theme: &Theme) {
        let palette = theme.extended_palette();

        let (from, to) = self.window;
        let span_secs = (to - from).num_seconds();
        if span_secs <= 0 {
            // بازه وارونه یا بدون عرض؛ چیزی برای رسم نیست
            return;
        }

        let points = self.points();
        let Some((mut min_v, mut max_v)) = points
            .iter()
            .map(|(_, v)| (*v, *v))
            .reduce(|(lo, hi), (v, _)| (lo.min(v), hi.max(v)))
        else {
            return;
        };

        // کمی حاشیه عمودی؛ سری ثابت هم باید خط قابل دیدن داشته باشد
        if max_v - min_v < f64::EPSILON {
            min_v -= 1.0;
            max_v += 1.0;
        } else {
            let pad = (max_v - min_v) * 0.05;
            min_v -= pad;
            max_v += pad;
        }

        let plot_width = (frame.width() - Y_AXIS_WIDTH - PADDING).max(1.0);
        let plot_height = (frame.height() - X_AXIS_HEIGHT - PADDING).max(1.0);

        let x_at = |offset_secs: f64| -> f32 {
            PADDING + (offset_secs / span_secs as f64).clamp(0.0, 1.0) as f32 * plot_width
        };
        let y_at = |value: f64| -> f32 {
            let ratio = ((value - min_v) / (max_v - min_v)).clamp(0.0, 1.0) as f32;
            PADDING + (1.0 - ratio) * plot_height
        };

        let grid_stroke = Stroke::default()
            .with_color(palette.background.weak.color.scale_alpha(0.6))
            .with_width(1.0);
        let label_color = palette.background.base.text.scale_alpha(0.7);

        // خطوط شبکه افقی و برچسب‌های محور Y
        let tick_step = guesstimate_ticks(max_v - min_v);
        let mut tick = round_to_next_tick(min_v, tick_step, false);
        while tick <= max_v {
            let y = y_at(tick);

            frame.stroke(
                &Path::line(
                    Point::new(PADDING, y),
                    Point::new(PADDING + plot_width, y),
                ),
                grid_stroke,
            );
            frame.fill_text(canvas::Text {
                content: abbr_large_numbers(tick),
                position: Point::new(PADDING + plot_width + 4.0, y),
                color: label_color,
                size: iced::Pixels(TEXT_SIZE),
                align_x: Alignment::Start.into(),
                align_y: Alignment::Center.into(),
                ..Default::default()
            });

            tick += tick_step;
        }

        // برچسب‌های محور زمان
        for step in 0..=3 {
            let frac = f64::from(step) / 3.0;
            let timestamp = from.timestamp() + (span_secs as f64 * frac) as i64;
            let x = PADDING + frac as f32 * plot_width;

            frame.fill_text(canvas::Text {
                content: self
                    .timezone
                    .format_axis_label(timestamp, span_secs as u64),
                position: Point::new(x, PADDING + plot_height + 4.0),
                color: label_color,
                size: iced::Pixels(TEXT_SIZE),
                align_x: match step {
                    0 => Alignment::Start.into(),
                    3 => Alignment::End.into(),
                    _ => Alignment::Center.into(),
                },
                align_y: Alignment::Start.into(),
                ..Default::default()
            });
        }

        // خط سری زمانی
        let line = Path::new(|builder| {
            for (index, (offset, value)) in points.iter().enumerate() {
                let position = Point::new(x_at(*offset), y_at(*value));
                if index == 0 {
                    builder.move_to(position);
                } else {
                    builder.line_to(position);
                }
            }
        });
        frame.stroke(
            &line,
            Stroke::default()
                .with_color(palette.primary.base.color)
                .with_width(1.5),
        );

        // نشانگر آخرین نقطه
        if let Some((offset, value)) = points.last() {
            frame.fill(
                &Path::circle(Point::new(x_at(*offset), y_at(*value)), 2.5),
                palette.primary.base.color,
            );
        }
    }
}

impl<Message> canvas::Program<Message> for LinePlot<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let plot = self.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_plot(frame, theme);
        });

        vec![plot]
    }
}
