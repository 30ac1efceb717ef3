// غیرفعال کردن کنسول در ویندوز برای نسخه‌های ریلیز
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// تعریف ماژول‌های مختلف پروژه
mod chart;     // رسم نمودارهای خطی
mod dashboard; // داشبورد و ویجت‌های آن
mod logger;    // سیستم ثبت وقایع (Log)
mod modal;     // مدیریت پنجره‌های مودال (پاپ‌آپ)
mod style;     // تعریف استایل‌ها و تم‌های ظاهری
mod widget;    // ویجت‌های کمکی رابط کاربری
mod window;    // مدیریت پنجره سیستم‌عامل

use dashboard::Dashboard;
use data::config::Api;
use data::layout::WindowSpec;
use data::range::{PanDirection, Preset, RangeStore};
use data::{ScaleFactor, Theme, UserTimezone};
use query::QueryClient;
use widget::{scrollable_content, tooltip};

use chrono::{DateTime, NaiveDateTime, Utc};
use iced::widget::{
    button, column, container, pick_list, row, slider, text, text_input,
    tooltip::Position as TooltipPosition,
};
use iced::{Alignment, Element, Length, Subscription, Task, keyboard, padding};

use std::sync::Arc;
use std::time::Duration;

/// نقطه شروع برنامه
fn main() {
    // راه‌اندازی سیستم لاگ
    logger::setup(cfg!(debug_assertions)).expect("Failed to initialize logger");

    // اجرای برنامه اصلی با استفاده از کتابخانه Iced
    let _ = iced::daemon(Observatory::new, Observatory::update, Observatory::view)
        .settings(iced::Settings {
            antialiasing: true, // فعال‌سازی لبه‌های نرم
            default_text_size: iced::Pixels(12.0),
            ..Default::default()
        })
        .title(Observatory::title)
        .theme(Observatory::theme)
        .scale_factor(Observatory::scale_factor)
        .subscription(Observatory::subscription)
        .run();
}

/// منوهای شناور برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Menu {
    Settings,    // تنظیمات برنامه
    CustomRange, // فرم کران‌های سفارشی بازه
}

/// فرم ورود کران‌های سفارشی
///
/// اعتبارسنجی ترتیب کران‌ها این‌جا انجام نمی‌شود؛ بازه وارونه ذخیره می‌شود و
/// صرفاً به یک مجموعه داده خالی منجر خواهد شد.
#[derive(Debug, Clone, Default)]
struct CustomRangeForm {
    from_input: String,
    to_input: String,
    error: Option<String>, // خطای پارس آخرین تلاش
}

/// ساختار اصلی برنامه Observatory که وضعیت کل برنامه را نگه می‌دارد
struct Observatory {
    main_window: window::Window,   // پنجره اصلی برنامه
    range: Arc<RangeStore>,        // پنجره زمانی مشترک همه ویجت‌ها
    client: QueryClient,           // کلاینت API پرس‌وجو
    dashboards: Vec<Dashboard>,    // داشبوردهای تعریف شده
    active_dashboard: usize,       // داشبورد فعال فعلی
    refresh_interval: Duration,    // آهنگ بروزرسانی ویجت‌ها
    initial_preset: Preset,        // بازه ابتدای هر اجرا (خودِ بازه ذخیره نمی‌شود)
    api: Api,                      // تنظیمات اتصال
    timezone: UserTimezone,        // منطقه زمانی نمایش
    ui_scale_factor: ScaleFactor,  // ضریب بزرگنمایی رابط کاربری
    theme: Theme,                  // تم فعلی برنامه
    active_menu: Option<Menu>,     // مودال باز فعلی
    custom_range: CustomRangeForm, // وضعیت فرم بازه سفارشی
}

/// پیام‌های مختلف که در برنامه جابجا می‌شوند و باعث تغییر وضعیت می‌شوند
#[derive(Debug, Clone)]
enum Message {
    Dashboard(dashboard::Message),   // پیام‌های ویجت‌های داشبورد
    PresetSelected(Preset),          // انتخاب یک بازه از نوار انتخاب
    Pan(PanDirection),               // جابجایی پنجره زمانی
    DashboardSelected(String),       // تعویض داشبورد فعال
    ToggleMenu(Option<Menu>),        // باز/بسته کردن مودال‌ها
    CustomRangeFromChanged(String),  // ویرایش کران پایین فرم سفارشی
    CustomRangeToChanged(String),    // ویرایش کران بالای فرم سفارشی
    ApplyCustomRange,                // اعمال کران‌های سفارشی
    ThemeSelected(iced_core::Theme), // انتخاب تم جدید
    SetTimezone(UserTimezone),       // تنظیم منطقه زمانی
    ScaleFactorChanged(f32),         // تغییر ضریب بزرگنمایی
    DataFolderRequested,             // درخواست باز کردن پوشه داده‌ها
    WindowEvent(window::Event),      // رویدادهای پنجره (مانند بستن)
    ExitRequested(Option<WindowSpec>), // خروج از برنامه با مشخصات پنجره
    BucketCatalog(Result<Vec<String>, String>), // نتیجه فهرست باکت‌های سرور
}

impl Observatory {
    /// ایجاد یک نمونه جدید از برنامه و بارگذاری وضعیت ذخیره شده
    fn new() -> (Self, Task<Message>) {
        // بارگذاری وضعیت ذخیره شده از دیسک
        let saved_state = data::load_state();

        // تنظیمات پنجره اصلی
        let (main_window_id, open_main_window) = {
            let position = saved_state
                .main_window
                .map(|w| w.position())
                .map_or(window::Position::Centered, window::Position::Specific);
            let size = saved_state
                .main_window
                .map_or_else(window::default_size, |w| w.size());

            let config = window::Settings {
                size,
                position,
                exit_on_close_request: false,
                ..window::settings()
            };
            window::open(config)
        };

        let refresh_interval = Duration::from_millis(saved_state.refresh_interval_ms);

        // منبع مشترک پنجره زمانی؛ یک بار در ریشه ساخته و به ویجت‌ها داده می‌شود
        let range = RangeStore::new(saved_state.initial_preset);
        let client = QueryClient::new(saved_state.api.base_url.clone());

        let mut dashboards: Vec<Dashboard> = saved_state
            .dashboards
            .iter()
            .map(|config| Dashboard::from_config(config, refresh_interval))
            .collect();
        if dashboards.is_empty() {
            dashboards.push(Dashboard::from_config(
                &data::layout::Dashboard::default(),
                refresh_interval,
            ));
        }

        let active_dashboard = saved_state
            .active_dashboard
            .as_ref()
            .and_then(|name| dashboards.iter().position(|d| &d.name == name))
            .unwrap_or(0);

        // دریافت اولیه ویجت‌های داشبورد فعال
        let init_fetches = dashboards[active_dashboard]
            .init_fetches(&client, &range)
            .map(Message::Dashboard);

        // بررسی باکت‌های پیکربندی شده در برابر فهرست سرور
        let catalog_check = Task::perform(
            {
                let client = client.clone();
                async move { client.buckets().await.map_err(|err| err.to_string()) }
            },
            Message::BucketCatalog,
        );

        let state = Self {
            main_window: window::Window::new(main_window_id),
            range,
            client,
            dashboards,
            active_dashboard,
            refresh_interval,
            initial_preset: saved_state.initial_preset,
            api: saved_state.api,
            timezone: saved_state.timezone,
            ui_scale_factor: saved_state.scale_factor,
            theme: saved_state.selected_theme,
            active_menu: None,
            custom_range: CustomRangeForm::default(),
        };

        (
            state,
            open_main_window
                .discard()
                .chain(init_fetches)
                .chain(catalog_check),
        )
    }

    /// به‌روزرسانی وضعیت برنامه بر اساس پیام‌های دریافتی
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // رویدادهای ویجت‌های داشبورد (بروزرسانی و نتیجه دریافت)
            Message::Dashboard(msg) => {
                let widget_id = msg.widget_id();

                for dashboard in &mut self.dashboards {
                    if dashboard.contains(widget_id) {
                        return dashboard
                            .update(msg, &self.client, &self.range)
                            .map(Message::Dashboard);
                    }
                }
            }
            // انتخاب یک بازه؛ مشترکین از طریق خود store باخبر می‌شوند
            Message::PresetSelected(preset) => {
                self.range.set_option(preset);
            }
            // جابجایی پنجره؛ پنجره بدون عرض بی‌اثر است
            Message::Pan(direction) => {
                self.range.pan(direction);
            }
            // تعویض داشبورد فعال
            Message::DashboardSelected(name) => {
                if let Some(index) = self.dashboards.iter().position(|d| d.name == name)
                    && index != self.active_dashboard
                {
                    self.active_dashboard = index;

                    // تاخیر اولیه ویجت‌ها دوباره قرعه‌کشی و داده‌ها تازه می‌شوند
                    let refresh_interval = self.refresh_interval;
                    let dashboard = &mut self.dashboards[index];
                    dashboard.remount(refresh_interval);

                    return dashboard
                        .init_fetches(&self.client, &self.range)
                        .map(Message::Dashboard);
                }
            }
            // باز و بسته کردن مودال‌ها
            Message::ToggleMenu(menu) => {
                if menu == Some(Menu::CustomRange) {
                    // ورود به حالت سفارشی، پنجره فعلی را همین لحظه منجمد می‌کند
                    self.range.set_option(Preset::Custom);

                    let (from, to) = self.range.resolved_bounds();
                    self.custom_range = CustomRangeForm {
                        from_input: from.format("%Y-%m-%d %H:%M").to_string(),
                        to_input: to.format("%Y-%m-%d %H:%M").to_string(),
                        error: None,
                    };
                }
                self.active_menu = menu;
            }
            Message::CustomRangeFromChanged(input) => {
                self.custom_range.from_input = input;
            }
            Message::CustomRangeToChanged(input) => {
                self.custom_range.to_input = input;
            }
            // اعمال کران‌های سفارشی؛ فقط قالب ورودی بررسی می‌شود، نه ترتیب کران‌ها
            Message::ApplyCustomRange => {
                let from = parse_instant(&self.custom_range.from_input);
                let to = parse_instant(&self.custom_range.to_input);

                match (from, to) {
                    (Some(from), Some(to)) => {
                        self.range.set_custom_bounds(from, to);
                        self.custom_range.error = None;
                        self.active_menu = None;
                    }
                    _ => {
                        self.custom_range.error =
                            Some("Expected YYYY-MM-DD HH:MM (UTC)".to_string());
                    }
                }
            }
            // تغییر تم برنامه
            Message::ThemeSelected(theme) => {
                self.theme = Theme(theme);
            }
            // تنظیم منطقه زمانی
            Message::SetTimezone(timezone) => {
                self.timezone = timezone;
            }
            // تغییر ضریب بزرگنمایی رابط کاربری
            Message::ScaleFactorChanged(value) => {
                self.ui_scale_factor = value.into();
            }
            // باز کردن پوشه داده‌ها
            Message::DataFolderRequested => {
                if let Err(err) = data::open_data_folder() {
                    log::error!("Failed to open data folder: {err}");
                }
            }
            // رویدادهای پنجره (درخواست بستن)
            Message::WindowEvent(window::Event::CloseRequested(id)) => {
                if id == self.main_window.id {
                    return window::collect_window_spec(id, Message::ExitRequested);
                }
            }
            // خروج از برنامه و ذخیره وضعیت
            Message::ExitRequested(spec) => {
                self.save_state_to_disk(spec);
                return iced::exit();
            }
            // گزارش باکت‌های ناشناخته برای سرور
            Message::BucketCatalog(result) => match result {
                Ok(known) => {
                    for dashboard in &self.dashboards {
                        let config = data::layout::Dashboard::from(dashboard);
                        for widget in &config.widgets {
                            if !known.iter().any(|name| name == widget.bucket.as_str()) {
                                log::warn!("bucket {} is not known to the server", widget.bucket);
                            }
                        }
                    }
                }
                Err(err) => {
                    log::debug!("bucket catalog unavailable: {err}");
                }
            },
        }
        Task::none()
    }

    /// رندر کردن رابط کاربری برنامه
    fn view(&self, _id: window::Id) -> Element<'_, Message> {
        let dashboard = &self.dashboards[self.active_dashboard];

        let base: Element<'_, Message> = column![
            self.header(),
            scrollable_content(
                container(dashboard.view(self.timezone).map(Message::Dashboard)).padding(4)
            ),
        ]
        .spacing(8)
        .padding(8)
        .into();

        // نمایش مودال باز روی محتوا
        match self.active_menu {
            Some(Menu::Settings) => {
                modal::main_dialog_modal(base, self.settings_view(), Message::ToggleMenu(None))
            }
            Some(Menu::CustomRange) => modal::dashboard_modal(
                base,
                self.custom_range_view(),
                Message::ToggleMenu(None),
                padding::top(48),
                Alignment::Start,
                Alignment::End,
            ),
            None => base,
        }
    }

    /// نوار بالای صفحه: انتخاب داشبورد، نوار بازه و دکمه تنظیمات
    fn header(&self) -> Element<'_, Message> {
        let dashboard_names: Vec<String> = self
            .dashboards
            .iter()
            .map(|dashboard| dashboard.name.clone())
            .collect();
        let active_name = self
            .dashboards
            .get(self.active_dashboard)
            .map(|dashboard| dashboard.name.clone());

        let dashboard_picker = pick_list(dashboard_names, active_name, Message::DashboardSelected);

        let settings = button(text("Settings").size(12))
            .style(|theme, status| style::button::transparent(theme, status, false))
            .on_press(Message::ToggleMenu(Some(Menu::Settings)));

        row![
            dashboard_picker,
            iced::widget::space().width(iced::Length::Fill),
            self.range_selector(),
            iced::widget::space().width(iced::Length::Fill),
            settings,
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    /// نوار انتخاب بازه زمانی به همراه دکمه‌های جابجایی
    fn range_selector(&self) -> Element<'_, Message> {
        let current = self.range.option();

        let mut selector = row![].spacing(2);
        for preset in Preset::SELECTABLE {
            selector = selector.push(
                button(text(preset.to_string()).size(12))
                    .style(move |theme, status| {
                        style::button::transparent(theme, status, current == preset)
                    })
                    .on_press(Message::PresetSelected(preset)),
            );
        }
        selector = selector.push(
            button(text("C").size(12))
                .style(move |theme, status| {
                    style::button::transparent(theme, status, current == Preset::Custom)
                })
                .on_press(Message::ToggleMenu(Some(Menu::CustomRange))),
        );

        let pan_left = tooltip(
            button(text("‹").size(12))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press(Message::Pan(PanDirection::Left)),
            Some("Pan window back (ArrowLeft)"),
            TooltipPosition::Bottom,
        );
        let pan_right = tooltip(
            button(text("›").size(12))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press(Message::Pan(PanDirection::Right)),
            Some("Pan window forward (ArrowRight)"),
            TooltipPosition::Bottom,
        );

        row![
            pan_left,
            selector,
            pan_right,
            text(self.window_label()).size(11).style(style::dimmed_text),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    /// توضیح متنی پنجره فعلی در کنار نوار انتخاب
    fn window_label(&self) -> String {
        let window = self.range.window();

        if window.option() == Preset::Custom {
            let (from, to) = window.resolved(Utc::now());
            format!(
                "{} — {}",
                self.timezone.format_full(from.timestamp()),
                self.timezone.format_full(to.timestamp()),
            )
        } else {
            format!("last {}", window.option())
        }
    }

    /// محتوای مودال تنظیمات
    fn settings_view(&self) -> Element<'_, Message> {
        let themes: Vec<iced_core::Theme> = {
            let mut themes = vec![iced_core::Theme::Custom(
                data::config::theme::default_theme().into(),
            )];
            themes.extend(iced_core::Theme::ALL.iter().cloned());
            themes
        };

        let theme_picker = pick_list(themes, Some(self.theme.0.clone()), Message::ThemeSelected);

        let timezone_picker = pick_list(
            vec![UserTimezone::Utc, UserTimezone::Local],
            Some(self.timezone),
            Message::SetTimezone,
        );

        let scale_row = row![
            text("UI scale").size(12),
            slider(
                data::config::MIN_SCALE..=data::config::MAX_SCALE,
                f32::from(self.ui_scale_factor),
                Message::ScaleFactorChanged,
            )
            .step(0.1),
            text(format!("{:.1}", f32::from(self.ui_scale_factor))).size(12),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let data_folder = button(text("Open data folder").size(12))
            .style(|theme, status| style::button::transparent(theme, status, false))
            .on_press(Message::DataFolderRequested);

        container(
            column![
                text("Settings").size(14),
                column![
                    text("Theme").size(11).style(style::dimmed_text),
                    theme_picker
                ]
                .spacing(4),
                column![
                    text("Timezone").size(11).style(style::dimmed_text),
                    timezone_picker
                ]
                .spacing(4),
                scale_row,
                data_folder,
            ]
            .spacing(16),
        )
        .style(style::modal_container)
        .padding(24)
        .width(Length::Fixed(320.0))
        .into()
    }

    /// محتوای مودال کران‌های سفارشی
    fn custom_range_view(&self) -> Element<'_, Message> {
        let form = &self.custom_range;

        let mut content = column![
            text("Custom range").size(14),
            column![
                text("From (UTC)").size(11).style(style::dimmed_text),
                text_input("2024-01-09 12:00", &form.from_input)
                    .on_input(Message::CustomRangeFromChanged)
                    .on_submit(Message::ApplyCustomRange),
            ]
            .spacing(4),
            column![
                text("To (UTC)").size(11).style(style::dimmed_text),
                text_input("2024-01-10 12:00", &form.to_input)
                    .on_input(Message::CustomRangeToChanged)
                    .on_submit(Message::ApplyCustomRange),
            ]
            .spacing(4),
        ]
        .spacing(12);

        if let Some(error) = &form.error {
            content = content.push(text(error).size(11).style(style::error_text));
        }

        content = content.push(
            row![
                button(text("Cancel").size(12))
                    .style(|theme, status| style::button::cancel(theme, status, true))
                    .on_press(Message::ToggleMenu(None)),
                iced::widget::space().width(iced::Length::Fill),
                button(text("Apply").size(12))
                    .style(|theme, status| style::button::confirm(theme, status, true))
                    .on_press(Message::ApplyCustomRange),
            ]
            .spacing(8),
        );

        container(content)
            .style(style::modal_container)
            .padding(16)
            .width(Length::Fixed(280.0))
            .into()
    }

    /// تعیین تم برنامه
    fn theme(&self, _window: window::Id) -> iced_core::Theme {
        self.theme.0.clone()
    }

    /// تعیین عنوان پنجره
    fn title(&self, _window: window::Id) -> String {
        match self.dashboards.get(self.active_dashboard) {
            Some(dashboard) => format!("Observatory [{}]", dashboard.name),
            None => "Observatory".to_string(),
        }
    }

    /// تعیین ضریب بزرگنمایی
    fn scale_factor(&self, _window: window::Id) -> f32 {
        self.ui_scale_factor.into()
    }

    /// مدیریت اشتراک‌ها (Subscriptions) برای رویدادهای خارجی
    fn subscription(&self) -> Subscription<Message> {
        // رویدادهای پنجره
        let window_events = window::events().map(Message::WindowEvent);

        // جریان‌های بروزرسانی ویجت‌های داشبورد فعال
        let refresh_streams = self.dashboards[self.active_dashboard]
            .subscriptions(&self.range)
            .map(Message::Dashboard);

        // کلیدهای جهت‌دار برای جابجایی پنجره زمانی
        let hotkeys = keyboard::listen().filter_map(|event| {
            let keyboard::Event::KeyPressed { key, .. } = event else {
                return None;
            };
            match key {
                keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                    Some(Message::Pan(PanDirection::Left))
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
                    Some(Message::Pan(PanDirection::Right))
                }
                _ => None,
            }
        });

        Subscription::batch(vec![window_events, refresh_streams, hotkeys])
    }

    /// ذخیره وضعیت برنامه روی دیسک هنگام خروج
    fn save_state_to_disk(&self, main_window: Option<WindowSpec>) {
        let state = data::State::from_parts(
            self.dashboards
                .iter()
                .map(data::layout::Dashboard::from)
                .collect(),
            self.dashboards
                .get(self.active_dashboard)
                .map(|dashboard| dashboard.name.clone()),
            self.initial_preset,
            self.refresh_interval.as_millis() as u64,
            self.api.clone(),
            Theme(self.theme.0.clone()),
            self.timezone,
            self.ui_scale_factor,
            main_window,
        );

        if let Err(err) = data::save_state(&state) {
            log::error!("Failed to save application state: {err}");
        }
    }
}

/// پارس یک لحظه از ورودی کاربر؛ RFC3339 یا قالب ساده UTC
fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Some(parsed.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_inputs_parse_in_both_formats() {
        let simple = parse_instant("2024-01-09 12:00").expect("simple format");
        let rfc = parse_instant("2024-01-09T12:00:00Z").expect("rfc3339 format");
        assert_eq!(simple, rfc);

        assert!(parse_instant(" 2024-01-09 12:00:30 ").is_some());
        assert!(parse_instant("yesterday").is_none());
    }
}
