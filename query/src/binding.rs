/// وضعیت سه‌حالته دریافت داده یک ویجت
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// دریافتی برای کلید فعلی در جریان است
    #[default]
    Loading,
    /// آخرین دریافت موفق بود؛ مجموعه خالی هم یک حالت معتبر و نهایی است
    Ready,
    /// آخرین دریافت شکست خورد؛ داده موفق قبلی همچنان قابل نمایش است
    Error,
}

/// اتصال دریافت داده یک ویجت به کلید بازه زمانی آن
///
/// هر شروع دریافت، توکن درخواست را یک واحد جلو می‌برد؛ پاسخ فقط وقتی اعمال
/// می‌شود که توکن آن با توکن فعلی برابر باشد. به این ترتیب پاسخ دیرِ یک
/// درخواست قدیمی هرگز نتیجه درخواست جدیدتر را بازنویسی نمی‌کند.
#[derive(Debug, Default)]
pub struct FetchBinding<T> {
    token: u64,
    status: FetchStatus,
    data: Option<T>,
}

impl<T> FetchBinding<T> {
    pub fn new() -> Self {
        Self {
            token: 0,
            status: FetchStatus::Loading,
            data: None,
        }
    }

    /// شروع یک دریافت جدید؛ توکنی برمی‌گرداند که باید همراه پاسخ بازگردد
    pub fn begin(&mut self) -> u64 {
        self.token += 1;
        self.status = FetchStatus::Loading;
        self.token
    }

    /// اعمال نتیجه یک دریافت
    ///
    /// پاسخ با توکن قدیمی بی‌صدا دور ریخته می‌شود و `false` برمی‌گردد. خطا
    /// وضعیت را `Error` می‌کند ولی داده موفق قبلی را نگه می‌دارد.
    pub fn resolve<E>(&mut self, token: u64, result: Result<T, E>) -> bool {
        if token != self.token {
            return false;
        }

        match result {
            Ok(data) => {
                self.status = FetchStatus::Ready;
                self.data = Some(data);
            }
            Err(_) => {
                self.status = FetchStatus::Error;
            }
        }
        true
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// آیا ویجت باید جای‌نگه‌دار «در حال بارگذاری» نشان دهد؟
    pub fn is_loading_without_data(&self) -> bool {
        self.status == FetchStatus::Loading && self.data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_response_is_discarded() {
        let mut binding = FetchBinding::new();

        let first = binding.begin();
        let second = binding.begin();

        // درخواست قدیمی‌تر دیرتر از درخواست جدید کامل می‌شود
        assert!(binding.resolve::<()>(second, Ok(vec![2])));
        assert!(!binding.resolve::<()>(first, Ok(vec![1])));

        assert_eq!(binding.status(), FetchStatus::Ready);
        assert_eq!(binding.data(), Some(&vec![2]));
    }

    #[test]
    fn error_keeps_last_good_data() {
        let mut binding = FetchBinding::new();

        let token = binding.begin();
        assert!(binding.resolve::<&str>(token, Ok(vec![1, 2, 3])));

        let token = binding.begin();
        assert!(binding.resolve(token, Err("connection refused")));

        assert_eq!(binding.status(), FetchStatus::Error);
        assert_eq!(binding.data(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn empty_result_is_ready_not_error() {
        let mut binding = FetchBinding::<Vec<u32>>::new();

        let token = binding.begin();
        assert!(binding.resolve::<()>(token, Ok(vec![])));

        assert_eq!(binding.status(), FetchStatus::Ready);
        assert!(!binding.is_loading_without_data());
    }

    #[test]
    fn begin_shows_loading_only_before_first_data() {
        let mut binding = FetchBinding::new();

        binding.begin();
        assert!(binding.is_loading_without_data());

        let token = binding.token;
        assert!(binding.resolve::<()>(token, Ok(vec![1])));

        binding.begin();
        // بروزرسانی پس‌زمینه؛ داده قبلی همچنان نمایش داده می‌شود
        assert!(!binding.is_loading_without_data());
        assert_eq!(binding.data(), Some(&vec![1]));
    }

    #[test]
    fn stale_error_does_not_mark_current_fetch_failed() {
        let mut binding = FetchBinding::<Vec<u32>>::new();

        let first = binding.begin();
        let second = binding.begin();

        assert!(!binding.resolve(first, Err("timeout")));
        assert_eq!(binding.status(), FetchStatus::Loading);

        assert!(binding.resolve::<()>(second, Ok(vec![7])));
        assert_eq!(binding.status(), FetchStatus::Ready);
    }
}
