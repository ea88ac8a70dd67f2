use ratatui::style::{Color, Modifier, Style};

/// Chart series colours, assigned to importers in selection order and
/// cycled when more than five are selected: blue, green, red, purple, orange.
pub const SERIES_PALETTE: [Color; 5] = [
    Color::Rgb(0x25, 0x63, 0xeb),
    Color::Rgb(0x16, 0xa3, 0x4a),
    Color::Rgb(0xdc, 0x26, 0x26),
    Color::Rgb(0x93, 0x33, 0xea),
    Color::Rgb(0xea, 0x58, 0x0c),
];

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style the dashboard widgets draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Filter panel ─────────────────────────────────────────────────────────
    /// Border of the filter list that has keyboard focus.
    pub focus_border: Style,
    /// Border of the other filter lists.
    pub border: Style,
    /// Options that are part of the active selection.
    pub selected: Style,
    /// Highlight of the cursor row in the focused list.
    pub cursor: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub axis: Style,
    pub series: [Color; 5],

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            focus_border: Style::default().fg(Color::Cyan),
            border: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),

            axis: Style::default().fg(Color::Gray),
            series: SERIES_PALETTE,

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            focus_border: Style::default().fg(Color::Blue),
            border: Style::default().fg(Color::Gray),
            selected: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default()
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),

            axis: Style::default().fg(Color::DarkGray),
            series: SERIES_PALETTE,

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour of the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }

    pub fn series_style(&self, index: usize) -> Style {
        Style::default().fg(self.series_color(index))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert!(t.error.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.selected.fg, Some(Color::Green));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("auto");
        assert!(t.header.fg.is_some());
    }

    // ── series palette ───────────────────────────────────────────────────────

    #[test]
    fn test_series_colors_are_distinct() {
        let t = Theme::dark();
        for i in 0..5 {
            for j in (i + 1)..5 {
                assert_ne!(t.series_color(i), t.series_color(j));
            }
        }
    }

    #[test]
    fn test_series_color_cycles() {
        let t = Theme::dark();
        assert_eq!(t.series_color(0), Color::Rgb(0x25, 0x63, 0xeb));
        assert_eq!(t.series_color(5), t.series_color(0));
        assert_eq!(t.series_color(7), t.series_color(2));
        assert_eq!(t.series_style(1).fg, Some(t.series_color(1)));
    }
}
