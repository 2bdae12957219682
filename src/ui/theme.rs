use ratatui::style::Color;
use todo_store::config::Config;
use todo_store::toast::ToastKind;
use todo_store::todo::Priority;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub completed: Color,
    pub highlight_bg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub priority_high: Color,
    pub priority_medium: Color,
    pub priority_low: Color,
    pub toast_success: Color,
    pub toast_error: Color,
    pub toast_warning: Color,
    pub toast_info: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            completed: Color::DarkGray,
            highlight_bg: Color::Rgb(50, 50, 70),
            status_bar_bg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
            priority_high: Color::Rgb(255, 100, 100),
            priority_medium: Color::Rgb(255, 200, 100),
            priority_low: Color::Rgb(100, 150, 255),
            toast_success: Color::Rgb(0, 100, 0),
            toast_error: Color::Rgb(150, 30, 30),
            toast_warning: Color::Rgb(180, 100, 0),
            toast_info: Color::Rgb(30, 80, 150),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            ..Self::default_theme()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            completed: Color::Gray,
            highlight_bg: Color::Rgb(210, 220, 240),
            status_bar_bg: Color::LightBlue,
            status_bar_fg: Color::Black,
            priority_high: Color::Rgb(200, 50, 50),  // Darker red for light theme
            priority_medium: Color::Rgb(180, 130, 0),
            priority_low: Color::Rgb(50, 100, 200),
            toast_success: Color::Rgb(40, 140, 40),
            toast_error: Color::Rgb(190, 40, 40),
            toast_warning: Color::Rgb(200, 120, 0),
            toast_info: Color::Rgb(40, 100, 190),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.priority_high,
            Priority::Medium => self.priority_medium,
            Priority::Low => self.priority_low,
        }
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.toast_success,
            ToastKind::Error => self.toast_error,
            ToastKind::Warning => self.toast_warning,
            ToastKind::Info => self.toast_info,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
