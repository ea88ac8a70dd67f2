//! Price and quantity trend charts.
//!
//! Both charts consume the month-ordered [`AggregatePoint`] series produced
//! by the data layer. A point either carries one combined value or one value
//! per selected importer; in the latter case each importer gets its own line
//! (price) or bar (quantity), coloured from the series palette in selection
//! order.

use dash_core::formatting::format_compact;
use dash_core::models::{AggregatePoint, Metric, TOTAL_KEY};
use dash_data::analysis::DashboardView;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::themes::Theme;

pub const PRICE_TITLE: &str = "Price Trends - average price per ton (USD) by month";
pub const VOLUME_TITLE: &str = "Quantity Trends - total quantity by month";

const NO_DATA: &str = "No records match the selected filters";

/// Widest bar drawn, in columns.
const MAX_BAR_WIDTH: u16 = 7;

// ── Series extraction ─────────────────────────────────────────────────────────

/// One named, coloured series laid out on a month-index x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: String,
    pub color: Color,
    /// `(month index, value)` pairs, one per point.
    pub data: Vec<(f64, f64)>,
}

/// Split `points` into per-series vectors, in series order.
pub fn series_lines(points: &[AggregatePoint], metric: Metric, theme: &Theme) -> Vec<SeriesLine> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    first
        .values
        .keys()
        .into_iter()
        .enumerate()
        .map(|(k, key)| SeriesLine {
            name: series_name(key, metric),
            color: theme.series_color(k),
            data: points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.get(key).unwrap_or(0.0)))
                .collect(),
        })
        .collect()
}

fn series_name(key: &str, metric: Metric) -> String {
    if key == TOTAL_KEY {
        metric.total_label().to_string()
    } else {
        key.to_string()
    }
}

/// Upper y bound leaving some headroom above the largest value.
pub fn y_upper_bound(lines: &[SeriesLine]) -> f64 {
    let max = lines
        .iter()
        .flat_map(|l| l.data.iter().map(|(_, y)| *y))
        .fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// X-axis labels: first, middle and last month.
pub fn month_axis_labels(points: &[AggregatePoint]) -> Vec<String> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![points[0].month.to_string()],
        2 => vec![points[0].month.to_string(), points[1].month.to_string()],
        n => vec![
            points[0].month.to_string(),
            points[n / 2].month.to_string(),
            points[n - 1].month.to_string(),
        ],
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Price chart on top, quantity chart below.
pub fn render_charts(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    render_price_chart(frame, top, view.series(Metric::Price), theme);
    render_volume_chart(frame, bottom, view.series(Metric::Volume), theme);
}

pub fn render_price_chart(frame: &mut Frame, area: Rect, points: &[AggregatePoint], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" {PRICE_TITLE} "));

    if points.is_empty() {
        render_no_data(frame, area, block, theme);
        return;
    }

    let lines = series_lines(points, Metric::Price, theme);
    let y_max = y_upper_bound(&lines);

    let datasets: Vec<Dataset> = lines
        .iter()
        .map(|line| {
            Dataset::default()
                .name(line.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line.color))
                .data(&line.data)
        })
        .collect();

    // A single month still needs a non-empty x range.
    let x_max = (points.len().max(2) - 1) as f64;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(month_axis_labels(points)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format_compact(y_max / 2.0),
                    format_compact(y_max),
                ]),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}

pub fn render_volume_chart(frame: &mut Frame, area: Rect, points: &[AggregatePoint], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" {VOLUME_TITLE} "));

    if points.is_empty() {
        render_no_data(frame, area, block, theme);
        return;
    }

    let lines = series_lines(points, Metric::Volume, theme);
    let per_group = lines.len().max(1) as u16;
    let bar_width = bar_width_for(area.width.saturating_sub(2), points.len() as u16, per_group);

    let legend: Vec<Span> = lines
        .iter()
        .flat_map(|l| {
            [
                Span::styled("■ ", Style::default().fg(l.color)),
                Span::styled(format!("{}  ", l.name), theme.label),
            ]
        })
        .collect();

    let mut chart = BarChart::default()
        .block(block.title_bottom(Line::from(legend)))
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1)
        .value_style(theme.value);

    for (i, point) in points.iter().enumerate() {
        let bars: Vec<Bar> = lines
            .iter()
            .map(|l| {
                let value = l.data[i].1;
                Bar::default()
                    .value(value.max(0.0).round() as u64)
                    .text_value(format_compact(value))
                    .style(Style::default().fg(l.color))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(point.month.axis_label()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

/// Bar width that fits `groups` groups of `per_group` bars into `width`
/// columns, with a one-column gap between groups.
pub fn bar_width_for(width: u16, groups: u16, per_group: u16) -> u16 {
    if groups == 0 || per_group == 0 {
        return 1;
    }
    let per_group_cols = (width / groups).saturating_sub(1);
    (per_group_cols / per_group).clamp(1, MAX_BAR_WIDTH)
}

fn render_no_data(frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(NO_DATA, theme.dim)))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
