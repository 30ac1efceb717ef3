pub mod config;
pub mod layout;
pub mod log;
pub mod range;
pub mod util;

pub use config::{ScaleFactor, State, theme::Theme, timezone::UserTimezone};

use std::path::PathBuf;
use std::{fs, io};

const STATE_FILE: &str = "observatory-state.json";

/// مسیر پوشه داده‌های برنامه (و در صورت تعیین نام، مسیر فایل داخل آن)
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base_path = dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("observatory");

    match path_name {
        Some(file_name) => base_path.join(file_name),
        None => base_path,
    }
}

/// باز کردن پوشه داده‌ها در مدیر فایل سیستم‌عامل
pub fn open_data_folder() -> Result<(), InternalError> {
    let path = data_path(None);
    open::that(path).map_err(|err| InternalError::Io(err.to_string()))
}

/// بارگذاری وضعیت ذخیره‌شده برنامه؛ فایل غایب یا خراب به پیش‌فرض برمی‌گردد
pub fn load_state() -> State {
    let path = data_path(Some(STATE_FILE));

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(err) => {
                ::log::error!("Failed to parse saved state, starting fresh: {err}");
                State::default()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => State::default(),
        Err(err) => {
            ::log::error!("Failed to read saved state, starting fresh: {err}");
            State::default()
        }
    }
}

/// نوشتن وضعیت برنامه روی دیسک
pub fn save_state(state: &State) -> Result<(), InternalError> {
    let path = data_path(Some(STATE_FILE));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| InternalError::Io(err.to_string()))?;
    }

    let contents = serde_json::to_string_pretty(state)
        .map_err(|err| InternalError::Serde(err.to_string()))?;

    fs::write(&path, contents).map_err(|err| InternalError::Io(err.to_string()))
}

/// خطاهای داخلی لایه داده
#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("Io error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}
