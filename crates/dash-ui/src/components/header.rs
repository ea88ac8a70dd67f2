use crate::themes::Theme;
use chrono::{DateTime, Utc};
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const ACCENTS: &str = "◆ ◇ ◆";

/// Figures shown once the record collection is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Size of the loaded collection.
    pub total: usize,
    /// Records passing the active filters.
    pub shown: usize,
    /// Rows dropped while decoding.
    pub skipped: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Dashboard header rendering three lines:
///
/// 1. Application title between accent marks (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Data source and load figures in
///    `[ source | N records | M shown | K skipped | loaded HH:MM:SS UTC ]`
///    format. The skipped count only appears when rows were dropped.
pub struct Header<'a> {
    /// Where the records came from (URL or `file:` path).
    pub source: &'a str,
    /// `None` while loading or after a failed load.
    pub loaded: Option<LoadSummary>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, loaded: Option<LoadSummary>, theme: &'a Theme) -> Self {
        Self {
            source,
            loaded,
            theme,
        }
    }

    /// Number of terminal rows [`Header::to_lines`] occupies.
    pub const HEIGHT: u16 = 3;

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(self.source.to_string(), self.theme.value),
        ];
        match &self.loaded {
            Some(load) => {
                info.push(Span::styled(" | ", self.theme.label));
                info.push(Span::styled(format!("{} records", load.total), self.theme.value));
                info.push(Span::styled(" | ", self.theme.label));
                info.push(Span::styled(format!("{} shown", load.shown), self.theme.value));
                if load.skipped > 0 {
                    info.push(Span::styled(" | ", self.theme.label));
                    info.push(Span::styled(
                        format!("{} skipped", load.skipped),
                        self.theme.warning,
                    ));
                }
                info.push(Span::styled(" | ", self.theme.label));
                info.push(Span::styled(
                    format!("loaded {}", load.loaded_at.format("%H:%M:%S UTC")),
                    self.theme.dim,
                ));
            }
            None => {
                info.push(Span::styled(" | ", self.theme.label));
                info.push(Span::styled("loading", self.theme.dim));
            }
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(vec![
                Span::styled(ACCENTS, self.theme.header_accent),
                Span::styled(" TRADE IMPORT DASHBOARD ", self.theme.header),
                Span::styled(ACCENTS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(info),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn summary(total: usize, shown: usize, skipped: usize) -> LoadSummary {
        LoadSummary {
            total,
            shown,
            skipped,
            loaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap(),
        }
    }

    #[test]
    fn test_header_line_count_matches_height() {
        let theme = Theme::dark();
        let lines = Header::new("http://h/x", Some(summary(3, 2, 0)), &theme).to_lines();
        assert_eq!(lines.len(), Header::HEIGHT as usize);
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new("http://h/x", None, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("TRADE IMPORT DASHBOARD"), "got: {title}");
        assert!(title.starts_with(ACCENTS) && title.ends_with(ACCENTS));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new("x", None, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line_with_counts() {
        let theme = Theme::dark();
        let lines = Header::new("file:/tmp/a.json", Some(summary(120, 45, 0)), &theme).to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ file:/tmp/a.json | 120 records | 45 shown | loaded 14:05:09 UTC ]"
        );
    }

    #[test]
    fn test_header_info_line_reports_skipped_rows() {
        let theme = Theme::dark();
        let lines = Header::new("http://h/x", Some(summary(10, 10, 2)), &theme).to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ http://h/x | 10 records | 10 shown | 2 skipped | loaded 14:05:09 UTC ]"
        );
    }

    #[test]
    fn test_header_info_line_while_loading() {
        let theme = Theme::dark();
        let lines = Header::new("http://h/x", None, &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ http://h/x | loading ]");
    }
}
