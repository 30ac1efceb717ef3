use crate::style;

use iced::Element;
use iced::widget::{container, scrollable, text, tooltip::Position};

/// ایجاد یک تولتیپ (Tooltip) ساده برای یک عنصر
pub fn tooltip<'a, Message: 'a>(
    content: impl Into<Element<'a, Message>>, // عنصر اصلی
    tooltip: Option<&'a str>,                 // متن تولتیپ
    position: Position,                       // موقعیت نمایش
) -> Element<'a, Message> {
    match tooltip {
        Some(tooltip) => iced::widget::tooltip(
            content,
            container(text(tooltip)).style(style::tooltip).padding(8),
            position,
        )
        .into(),
        None => content.into(),
    }
}

/// ایجاد یک محتوای قابل اسکرول (عمودی)
pub fn scrollable_content<'a, Message: 'a>(
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    scrollable::Scrollable::with_direction(
        content,
        scrollable::Direction::Vertical(scrollable::Scrollbar::new().width(4).scroller_width(4)),
    )
    .into()
}
