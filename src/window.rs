use data::layout::WindowSpec;
use iced::{Size, Subscription, Task, window};

pub use iced::window::{Id, Position, Settings, open};
use iced_futures::MaybeSend;

/// ساختار نگهدارنده اطلاعات پنجره اصلی برنامه
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub id: Id, // شناسه منحصر به فرد پنجره
}

impl Window {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

/// دریافت اندازه پیش‌فرض پنجره
pub fn default_size() -> Size {
    WindowSpec::default().size()
}

/// رویدادهای مربوط به پنجره
#[derive(Debug, Clone, Copy)]
pub enum Event {
    CloseRequested(window::Id), // درخواست بستن پنجره
}

/// گوش دادن به رویدادهای پنجره
pub fn events() -> Subscription<Event> {
    iced::event::listen_with(filtered_events)
}

/// فیلتر کردن رویدادهای خام سیستم و تبدیل به رویدادهای پنجره برنامه
fn filtered_events(
    event: iced::Event,
    _status: iced::event::Status,
    window: window::Id,
) -> Option<Event> {
    match &event {
        iced::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Event::CloseRequested(window))
        }
        _ => None,
    }
}

/// جمع‌آوری مشخصات (موقعیت و اندازه) پنجره اصلی پیش از خروج
pub fn collect_window_spec<M, F>(window_id: window::Id, message: F) -> Task<M>
where
    F: Fn(Option<WindowSpec>) -> M + Send + 'static,
    M: MaybeSend + 'static,
{
    let position_task = iced::window::position(window_id);
    let size_task = iced::window::size(window_id);

    position_task
        .map(|position| (position, None))
        .chain(size_task.map(|size| (None, Some(size))))
        .collect()
        .map(move |results| {
            let position = results.iter().find_map(|(position, _)| *position);
            let size = results.iter().find_map(|(_, size)| *size);

            let spec = match (position, size) {
                (Some(position), Some(size)) => Some(WindowSpec::from((&position, &size))),
                _ => None,
            };
            message(spec)
        })
}

#[cfg(target_os = "linux")]
/// تنظیمات پنجره برای سیستم‌عامل لینوکس
pub fn settings() -> Settings {
    Settings {
        min_size: Some(Size::new(800.0, 600.0)),
        ..Default::default()
    }
}

#[cfg(target_os = "macos")]
/// تنظیمات پنجره برای سیستم‌عامل مک (macOS)
pub fn settings() -> Settings {
    use iced::window;

    Settings {
        platform_specific: window::settings::PlatformSpecific {
            title_hidden: true,
            titlebar_transparent: true,
            fullsize_content_view: true,
        },
        min_size: Some(Size::new(800.0, 600.0)),
        ..Default::default()
    }
}

#[cfg(target_os = "windows")]
/// تنظیمات پنجره برای سیستم‌عامل ویندوز
pub fn settings() -> Settings {
    Settings {
        min_size: Some(Size::new(800.0, 600.0)),
        ..Default::default()
    }
}
