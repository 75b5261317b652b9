use ratatui::style::Color;
use repolens_core::ThemeMode;

/// Resolved color palette for one theme mode.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub accent: Color,
    pub error: Color,
    pub muted: Color,
    pub selected_bg: Color,
    pub language: Color,
    pub link: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            background: Color::Rgb(0x1e, 0x1e, 0x2e),
            foreground: Color::Rgb(0xcd, 0xd6, 0xf4),
            border: Color::Rgb(0x45, 0x47, 0x5a),
            border_focused: Color::Rgb(0x89, 0xb4, 0xfa),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            accent: Color::Rgb(0xf9, 0xe2, 0xaf),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            muted: Color::Rgb(0x6c, 0x70, 0x86),
            selected_bg: Color::Rgb(0x31, 0x32, 0x44),
            language: Color::Rgb(0xcb, 0xa6, 0xf7),
            link: Color::Rgb(0x89, 0xdc, 0xeb),
        }
    }

    fn light() -> Self {
        Self {
            background: Color::Rgb(0xef, 0xf1, 0xf5),
            foreground: Color::Rgb(0x4c, 0x4f, 0x69),
            border: Color::Rgb(0xbc, 0xc0, 0xcc),
            border_focused: Color::Rgb(0x1e, 0x66, 0xf5),
            title: Color::Rgb(0x88, 0x39, 0xef),
            accent: Color::Rgb(0xdf, 0x8e, 0x1d),
            error: Color::Rgb(0xd2, 0x0f, 0x39),
            muted: Color::Rgb(0x9c, 0xa0, 0xb0),
            selected_bg: Color::Rgb(0xdc, 0xe0, 0xe8),
            language: Color::Rgb(0x88, 0x39, 0xef),
            link: Color::Rgb(0x04, 0xa5, 0xe5),
        }
    }
}
