use crate::chart::{self, LinePlot};
use crate::style;

use data::UserTimezone;
use data::layout::{self, WidgetKind};
use data::range::RangeStore;
use data::util::format_value;
use query::binding::{FetchBinding, FetchStatus};
use query::client::DEFAULT_SAMPLE;
use query::refresh::{self, RefreshTimer};
use query::{QueryClient, Reading};

use chrono::{DateTime, Utc};
use iced::widget::canvas::Cache;
use iced::widget::{Column, Row, center, column, container, row, text};
use iced::{Alignment, Element, Length, Subscription, Task};
use iced_futures::futures::channel::mpsc;
use iced_futures::futures::{SinkExt, Stream, StreamExt};
use iced_futures::stream;
use uuid::Uuid;

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

const CHART_HEIGHT: f32 = 220.0;
const STATUS_TILES_PER_ROW: usize = 4;
const CHARTS_PER_ROW: usize = 2;

/// شناسه پایدار یک ویجت؛ هویت جریان بروزرسانی آن در طول عمر برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(Uuid);

impl WidgetId {
    fn unique() -> Self {
        Self(Uuid::new_v4())
    }
}

/// خطاهای مربوط به داشبورد
#[derive(thiserror::Error, Debug, Clone)]
pub enum DashboardError {
    #[error("Fetch error: {0}")]
    Fetch(String), // خطای دریافت داده
}

/// دلیل یک بروزرسانی ویجت
#[derive(Debug, Clone, Copy)]
pub enum RefreshCause {
    Scheduled,    // تیک زمان‌بند دوره‌ای
    RangeChanged, // تغییر پنجره زمانی مشترک
}

/// نتیجه موفق یک دریافت، همراه بازه‌ای که برای آن پرس‌وجو شد
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    readings: Vec<Reading>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// پیام‌های مربوط به داشبورد و ویجت‌هایش
#[derive(Debug, Clone)]
pub enum Message {
    Refresh(WidgetId, RefreshCause),
    Fetched(WidgetId, u64, Result<FetchedSeries, DashboardError>),
}

impl Message {
    pub fn widget_id(&self) -> WidgetId {
        match self {
            Message::Refresh(id, _) | Message::Fetched(id, _, _) => *id,
        }
    }
}

/// وضعیت اجرایی یک داشبورد: ویجت‌ها به همراه داده و زمان‌بندشان
pub struct Dashboard {
    pub name: String,
    widgets: Vec<WidgetState>,
}

impl Dashboard {
    pub fn from_config(config: &layout::Dashboard, interval: Duration) -> Self {
        Self {
            name: config.name.clone(),
            widgets: config
                .widgets
                .iter()
                .cloned()
                .map(|cfg| WidgetState::new(cfg, interval))
                .collect(),
        }
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|widget| widget.id == id)
    }

    /// قرعه‌کشی مجدد تاخیر اولیه همه ویجت‌ها؛ هنگام فعال شدن دوباره داشبورد
    pub fn remount(&mut self, interval: Duration) {
        for widget in &mut self.widgets {
            widget.timer = RefreshTimer::new(interval);
        }
    }

    /// دریافت اولیه همه ویجت‌ها هنگام نمایش داشبورد
    pub fn init_fetches(&mut self, client: &QueryClient, range: &RangeStore) -> Task<Message> {
        let tasks: Vec<_> = self
            .widgets
            .iter_mut()
            .map(|widget| widget.fetch(client, range))
            .collect();

        Task::batch(tasks)
    }

    pub fn update(
        &mut self,
        message: Message,
        client: &QueryClient,
        range: &RangeStore,
    ) -> Task<Message> {
        match message {
            Message::Refresh(id, cause) => {
                let Some(widget) = self.widgets.iter_mut().find(|widget| widget.id == id) else {
                    return Task::none();
                };

                log::debug!("refreshing {:?} ({:?})", widget.cfg.title, cause);
                widget.fetch(client, range)
            }
            Message::Fetched(id, token, result) => {
                let Some(widget) = self.widgets.iter_mut().find(|widget| widget.id == id) else {
                    return Task::none();
                };

                widget.apply(token, result);
                Task::none()
            }
        }
    }

    /// جریان‌های بروزرسانی ویجت‌های این داشبورد
    ///
    /// هر ویجت یک جریان با هویت خودش دارد؛ وقتی داشبورد غیرفعال شود این
    /// اشتراک‌ها برگردانده نمی‌شوند و ران‌تایم جریان‌ها را Drop می‌کند، که هم
    /// تایمرها و هم اشتراک تغییر بازه را لغو می‌کند.
    pub fn subscriptions(&self, range: &Arc<RangeStore>) -> Subscription<Message> {
        Subscription::batch(self.widgets.iter().map(|widget| {
            let id = widget.id;

            run_with_id(
                id,
                refresh_stream(range.clone(), widget.timer)
                    .map(move |cause| Message::Refresh(id, cause)),
            )
        }))
    }

    pub fn view(&self, timezone: UserTimezone) -> Element<'_, Message> {
        if self.widgets.is_empty() {
            return center(text("No widgets configured").style(style::dimmed_text))
                .height(Length::Fixed(CHART_HEIGHT))
                .into();
        }

        let statuses: Vec<&WidgetState> = self
            .widgets
            .iter()
            .filter(|widget| !widget.cfg.is_chart())
            .collect();
        let charts: Vec<&WidgetState> = self
            .widgets
            .iter()
            .filter(|widget| widget.cfg.is_chart())
            .collect();

        let mut content = Column::new().spacing(8);

        for chunk in statuses.chunks(STATUS_TILES_PER_ROW) {
            content = content.push(
                Row::with_children(chunk.iter().map(|widget| widget.view(timezone)))
                    .spacing(8),
            );
        }
        for chunk in charts.chunks(CHARTS_PER_ROW) {
            content = content.push(
                Row::with_children(chunk.iter().map(|widget| widget.view(timezone)))
                    .spacing(8),
            );
        }

        content.into()
    }
}

impl From<&Dashboard> for layout::Dashboard {
    /// تبدیل داشبورد اجرایی به ساختار قابل ذخیره‌سازی
    fn from(dashboard: &Dashboard) -> Self {
        layout::Dashboard {
            name: dashboard.name.clone(),
            widgets: dashboard
                .widgets
                .iter()
                .map(|widget| widget.cfg.clone())
                .collect(),
        }
    }
}

struct WidgetState {
    id: WidgetId,
    cfg: layout::Widget,
    timer: RefreshTimer,
    binding: FetchBinding<Vec<Reading>>,
    /// بازه‌ای که داده فعلی برای آن دریافت شده؛ دامنه محور X نمودار
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    cache: Cache,
}

impl WidgetState {
    fn new(cfg: layout::Widget, interval: Duration) -> Self {
        Self {
            id: WidgetId::unique(),
            cfg,
            timer: RefreshTimer::new(interval),
            binding: FetchBinding::new(),
            window: None,
            cache: Cache::default(),
        }
    }

    /// شروع یک دریافت برای کلید فعلی
    ///
    /// پنجره زنده همین‌جا و یک بار برای کل این دریافت ثابت می‌شود؛ تیک بعدی
    /// دوباره مقدار روز را می‌خواند.
    fn fetch(&mut self, client: &QueryClient, range: &RangeStore) -> Task<Message> {
        let token = self.binding.begin();
        let id = self.id;
        let client = client.clone();
        let bucket = self.cfg.bucket.clone();

        match &self.cfg.kind {
            WidgetKind::Chart { .. } => {
                let (from, to) = range.resolved_bounds();

                Task::perform(
                    async move {
                        client
                            .series(&bucket, from, to, DEFAULT_SAMPLE)
                            .await
                            .map(|readings| FetchedSeries {
                                readings,
                                window: Some((from, to)),
                            })
                            .map_err(|err| DashboardError::Fetch(err.to_string()))
                    },
                    move |result| Message::Fetched(id, token, result),
                )
            }
            WidgetKind::Status { .. } => Task::perform(
                async move {
                    client
                        .latest(&bucket, 1)
                        .await
                        .map(|readings| FetchedSeries {
                            readings,
                            window: None,
                        })
                        .map_err(|err| DashboardError::Fetch(err.to_string()))
                },
                move |result| Message::Fetched(id, token, result),
            ),
        }
    }

    /// اعمال نتیجه دریافت؛ پاسخ با توکن قدیمی بی‌صدا دور ریخته می‌شود
    fn apply(&mut self, token: u64, result: Result<FetchedSeries, DashboardError>) {
        match result {
            Ok(series) => {
                let mut readings = series.readings;
                readings.sort_by_key(|reading| reading.timestamp);

                if self.binding.resolve::<DashboardError>(token, Ok(readings)) {
                    self.window = series.window;
                    self.cache.clear();
                }
            }
            Err(err) => {
                if self.binding.resolve::<DashboardError>(token, Err(err.clone())) {
                    // داده خوب قبلی نمایش داده می‌ماند؛ تیک بعدی تلاش مجدد است
                    log::error!("{} fetch failed: {err}", self.cfg.title);
                }
            }
        }
    }

    fn view(&self, timezone: UserTimezone) -> Element<'_, Message> {
        match &self.cfg.kind {
            WidgetKind::Status { unit } => self.status_view(unit),
            WidgetKind::Chart { y_label } => self.chart_view(y_label, timezone),
        }
    }

    fn title_row(&self, right_label: Option<&str>) -> Element<'_, Message> {
        let mut title = row![text(&self.cfg.title).size(12).style(style::dimmed_text)].spacing(8);

        if self.binding.status() == FetchStatus::Error {
            title = title.push(text("stale").size(10).style(style::error_text));
        }
        if let Some(label) = right_label {
            title = title
                .push(iced::widget::space().width(iced::Length::Fill))
                .push(text(label.to_string()).size(10).style(style::dimmed_text));
        }

        title.align_y(Alignment::Center).into()
    }

    fn status_view<'a>(&'a self, unit: &'a str) -> Element<'a, Message> {
        let latest = self
            .binding
            .data()
            .and_then(|readings| readings.last())
            .and_then(|reading| reading.value(self.cfg.field.as_deref()));

        let value: Element<'a, Message> = if self.binding.is_loading_without_data() {
            text("...").size(24).style(style::dimmed_text).into()
        } else {
            match latest {
                Some(value) => text(format!("{} {}", format_value(value), unit))
                    .size(24)
                    .into(),
                None => text("No data").size(14).style(style::dimmed_text).into(),
            }
        };

        container(
            column![
                self.title_row(None),
                center(value).height(Length::Fixed(56.0)),
            ]
            .spacing(4),
        )
        .style(style::card_container)
        .padding(12)
        .width(Length::Fill)
        .into()
    }

    fn chart_view<'a>(&'a self, y_label: &'a str, timezone: UserTimezone) -> Element<'a, Message> {
        let body: Element<'a, Message> = if self.binding.is_loading_without_data() {
            center(text("Loading...").style(style::dimmed_text))
                .height(Length::Fixed(CHART_HEIGHT))
                .into()
        } else {
            match (self.binding.data(), self.window) {
                (Some(readings), Some(window)) if !readings.is_empty() => chart::view(
                    LinePlot {
                        cache: &self.cache,
                        readings,
                        field: self.cfg.field.as_deref(),
                        window,
                        timezone,
                    },
                    CHART_HEIGHT,
                ),
                _ => center(text("No data in range").style(style::dimmed_text))
                    .height(Length::Fixed(CHART_HEIGHT))
                    .into(),
            }
        };

        container(column![self.title_row(Some(y_label)), body].spacing(4))
            .style(style::card_container)
            .padding(12)
            .width(Length::Fill)
            .into()
    }
}

/// جریان بروزرسانی یک ویجت: تیک‌های زمان‌بند به علاوه اعلان تغییر بازه
///
/// اشتراک تغییر بازه داخل تسک جریان نگه داشته می‌شود؛ Drop شدن جریان توسط
/// ران‌تایم (حذف ویجت یا تعویض داشبورد) آن را هم آزاد می‌کند.
/// اشتراکی که با یک شناسه هش‌شدنی شناسایی می‌شود و جریان داده‌شده را اجرا می‌کند.
///
/// معادل `Subscription::run_with_id` نسخه‌های پیشین iced که در 0.14 حذف شد؛
/// هویت اشتراک تنها از روی `id` ساخته می‌شود تا رفتار یکسان حفظ شود.
fn run_with_id<I, S, T>(id: I, stream: S) -> Subscription<T>
where
    I: Hash + 'static,
    S: Stream<Item = T> + iced_futures::MaybeSend + 'static,
    T: 'static,
{
    use iced_futures::subscription::{EventStream, Hasher, Recipe, from_recipe};

    struct Runner<I, S> {
        id: I,
        stream: S,
    }

    impl<I, S, T> Recipe for Runner<I, S>
    where
        I: Hash + 'static,
        S: Stream<Item = T> + iced_futures::MaybeSend + 'static,
        T: 'static,
    {
        type Output = T;

        fn hash(&self, state: &mut Hasher) {
            std::any::TypeId::of::<I>().hash(state);
            self.id.hash(state);
        }

        fn stream(self: Box<Self>, _input: EventStream) -> iced_futures::BoxStream<T> {
            iced_futures::boxed_stream(self.stream)
        }
    }

    from_recipe(Runner { id, stream })
}

fn refresh_stream(
    range: Arc<RangeStore>,
    timer: RefreshTimer,
) -> impl Stream<Item = RefreshCause> {
    stream::channel(16, async move |mut output| {
        let (range_tx, range_rx) = mpsc::unbounded();
        let _range_subscription = range.subscribe(move |_| {
            let _ = range_tx.unbounded_send(());
        });

        let ticks = refresh::ticks(timer).map(|_| RefreshCause::Scheduled);
        let changes = range_rx.map(|_| RefreshCause::RangeChanged);

        let mut merged = Box::pin(iced_futures::futures::stream::select(ticks, changes));
        while let Some(cause) = merged.next().await {
            if output.send(cause).await.is_err() {
                break;
            }
        }
    })
}
