use iced_core::{
    Color,
    theme::{Custom, Palette},
};
use serde::{Deserialize, Serialize};

/// ساختار نگهدارنده تم برنامه (پوششی بر روی تم Iced)
#[derive(Debug, Clone)]
pub struct Theme(pub iced_core::Theme);

/// ساختار کمکی برای سریال‌سازی تم
#[derive(Serialize, Deserialize)]
struct SerTheme {
    name: String, // نام تم
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>, // پالت رنگی (برای تم‌های سفارشی)
}

impl Default for Theme {
    fn default() -> Self {
        Self(iced_core::Theme::Custom(default_theme().into()))
    }
}

impl From<Theme> for iced_core::Theme {
    fn from(val: Theme) -> Self {
        val.0
    }
}

/// ایجاد تم پیش‌فرض برنامه (Observatory)
pub fn default_theme() -> Custom {
    Custom::new(
        "Observatory".to_string(),
        Palette {
            background: Color::from_rgb8(24, 25, 28),
            text: Color::from_rgb8(201, 204, 209),
            primary: Color::from_rgb8(121, 166, 219),
            success: Color::from_rgb8(112, 190, 153),
            danger: Color::from_rgb8(204, 96, 92),
            warning: Color::from_rgb8(227, 200, 126),
        },
    )
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let iced_core::Theme::Custom(custom) = &self.0 {
            let is_default_theme = custom.to_string() == "Observatory";
            let ser_theme = SerTheme {
                name: if is_default_theme {
                    "observatory"
                } else {
                    "custom"
                }
                .to_string(),
                palette: if is_default_theme {
                    None
                } else {
                    Some(self.0.palette())
                },
            };
            ser_theme.serialize(serializer)
        } else {
            let theme_str = match self.0 {
                iced_core::Theme::Ferra => "ferra",
                iced_core::Theme::Dark => "dark",
                iced_core::Theme::Light => "light",
                iced_core::Theme::Dracula => "dracula",
                iced_core::Theme::Nord => "nord",
                iced_core::Theme::SolarizedLight => "solarized_light",
                iced_core::Theme::SolarizedDark => "solarized_dark",
                iced_core::Theme::GruvboxLight => "gruvbox_light",
                iced_core::Theme::GruvboxDark => "gruvbox_dark",
                iced_core::Theme::TokyoNight => "tokyo_night",
                iced_core::Theme::KanagawaWave => "kanagawa_wave",
                iced_core::Theme::Moonfly => "moonfly",
                iced_core::Theme::Nightfly => "nightfly",
                iced_core::Theme::Oxocarbon => "oxocarbon",
                _ => "observatory",
            };

            let ser_theme = SerTheme {
                name: theme_str.to_string(),
                palette: None,
            };
            ser_theme.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ser_theme = SerTheme::deserialize(deserializer)?;

        let theme = match ser_theme.name.as_str() {
            "ferra" => iced_core::Theme::Ferra,
            "dark" => iced_core::Theme::Dark,
            "light" => iced_core::Theme::Light,
            "dracula" => iced_core::Theme::Dracula,
            "nord" => iced_core::Theme::Nord,
            "solarized_light" => iced_core::Theme::SolarizedLight,
            "solarized_dark" => iced_core::Theme::SolarizedDark,
            "gruvbox_light" => iced_core::Theme::GruvboxLight,
            "gruvbox_dark" => iced_core::Theme::GruvboxDark,
            "tokyo_night" => iced_core::Theme::TokyoNight,
            "kanagawa_wave" => iced_core::Theme::KanagawaWave,
            "moonfly" => iced_core::Theme::Moonfly,
            "nightfly" => iced_core::Theme::Nightfly,
            "oxocarbon" => iced_core::Theme::Oxocarbon,
            "custom" => match ser_theme.palette {
                Some(palette) => {
                    iced_core::Theme::Custom(Custom::new("Custom".to_string(), palette).into())
                }
                None => iced_core::Theme::Custom(default_theme().into()),
            },
            // نام ناشناخته به تم پیش‌فرض برمی‌گردد
            _ => iced_core::Theme::Custom(default_theme().into()),
        };

        Ok(Theme(theme))
    }
}
