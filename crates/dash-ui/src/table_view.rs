//! Monthly summary table.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per month of
//! the filtered records plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dash_core::formatting;
use dash_core::models::{MonthlySummary, SummaryTotals};

use crate::themes::Theme;

pub const TABLE_TITLE: &str = "Monthly Summary";

const HEADERS: [&str; 5] = [
    "Month",
    "Total Value (USD)",
    "Quantity (Ton)",
    "Avg Price / Ton",
    "Records",
];

/// Render the monthly summary into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    rows: &[MonthlySummary],
    totals: &SummaryTotals,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_data(frame, area, theme);
        return;
    }

    let header_cells = HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.month.long_label()),
                Cell::from(formatting::format_usd(row.total_value_usd)),
                Cell::from(formatting::format_number(row.quantity, 2)),
                Cell::from(formatting::format_usd(row.avg_price)),
                Cell::from(formatting::format_number(row.record_count as f64, 0)),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from(format!("TOTAL ({} months)", totals.months)),
        Cell::from(formatting::format_usd(totals.total_value_usd)),
        Cell::from(formatting::format_number(totals.quantity, 2)),
        Cell::from(formatting::format_usd(totals.avg_price)),
        Cell::from(formatting::format_number(totals.record_count as f64, 0)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(18),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {TABLE_TITLE} ")),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder for a filter combination with no matching records.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No records match the selected filters", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'c' to clear all filters.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {TABLE_TITLE} ")),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::models::MonthKey;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_rows() -> Vec<MonthlySummary> {
        vec![
            MonthlySummary {
                month: MonthKey::new(2023, 1),
                total_value_usd: 160.0,
                quantity: 15.0,
                avg_price: 160.0 / 15.0,
                record_count: 2,
            },
            MonthlySummary {
                month: MonthKey::new(2023, 2),
                total_value_usd: 1_250_000.0,
                quantity: 2_500.0,
                avg_price: 500.0,
                record_count: 14,
            },
        ]
    }

    fn make_totals() -> SummaryTotals {
        SummaryTotals {
            total_value_usd: 1_250_160.0,
            quantity: 2_515.0,
            avg_price: 1_250_160.0 / 2_515.0,
            record_count: 16,
            months: 2,
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_table_view_rows_and_totals() {
        let backend = TestBackend::new(100, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &make_rows(), &make_totals(), &theme);
            })
            .unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Monthly Summary"));
        assert!(text.contains("Jan 2023"));
        assert!(text.contains("$1,250,000.00"));
        assert!(text.contains("$500.00"));
        assert!(text.contains("TOTAL (2 months)"));
    }

    #[test]
    fn test_render_table_view_empty_rows_shows_placeholder() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &[], &SummaryTotals::default(), &theme);
            })
            .unwrap();

        assert!(screen(&terminal).contains("No records match"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();
    }
}
