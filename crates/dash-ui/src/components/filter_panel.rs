//! The four filter selectors stacked in the left column.
//!
//! Each list begins with an "All …" entry followed by the options reachable
//! under the other active filters. Entries that are part of the active
//! selection carry a marker; the focused list highlights its cursor row.

use dash_core::filters::{FilterChange, FilterField, FilterState};
use dash_data::options::FilterOptions;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

const SELECTED_MARK: &str = "● ";
const UNSELECTED_MARK: &str = "  ";

// ── Entry helpers ─────────────────────────────────────────────────────────────

/// Labels shown in `field`'s list: the "All …" entry, then every option.
pub fn entries(options: &FilterOptions, field: FilterField) -> Vec<String> {
    let mut out = Vec::with_capacity(options.len(field) + 1);
    out.push(field.all_label().to_string());
    out.extend(options.labels(field));
    out
}

/// Whether the entry at `index` of `field`'s list is part of the selection.
pub fn is_selected(
    options: &FilterOptions,
    filters: &FilterState,
    field: FilterField,
    index: usize,
) -> bool {
    if index == 0 {
        return filters.without(field) == *filters;
    }
    let i = index - 1;
    match field {
        FilterField::Product => options.products.get(i).is_some_and(|p| {
            filters.product.as_deref() == Some(p.as_str())
        }),
        FilterField::Destination => options.destinations.get(i).is_some_and(|d| {
            filters.destination.as_deref() == Some(d.as_str())
        }),
        FilterField::Year => options.years.get(i).is_some_and(|y| filters.year == Some(*y)),
        FilterField::Importers => options
            .importers
            .get(i)
            .is_some_and(|imp| filters.importers.contains(imp)),
    }
}

/// The change that choosing entry `index` of `field`'s list requests.
///
/// Entry 0 resets the field. Importer entries toggle membership; every other
/// field is replaced outright. `None` when `index` is past the end.
pub fn change_for(options: &FilterOptions, field: FilterField, index: usize) -> Option<FilterChange> {
    if index == 0 {
        return Some(FilterChange::Reset(field));
    }
    let i = index - 1;
    match field {
        FilterField::Product => options
            .products
            .get(i)
            .map(|p| FilterChange::Product(Some(p.clone()))),
        FilterField::Destination => options
            .destinations
            .get(i)
            .map(|d| FilterChange::Destination(Some(d.clone()))),
        FilterField::Year => options.years.get(i).map(|y| FilterChange::Year(Some(*y))),
        FilterField::Importers => options
            .importers
            .get(i)
            .map(|imp| FilterChange::ToggleImporter(imp.clone())),
    }
}

// ── PanelState ────────────────────────────────────────────────────────────────

/// Keyboard focus and per-list cursor positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub focus: FilterField,
    cursors: [usize; 4],
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            focus: FilterField::ALL[0],
            cursors: [0; 4],
        }
    }
}

impl PanelState {
    pub fn cursor(&self, field: FilterField) -> usize {
        self.cursors[slot(field)]
    }

    pub fn set_cursor(&mut self, field: FilterField, index: usize) {
        self.cursors[slot(field)] = index;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn move_up(&mut self) {
        let c = &mut self.cursors[slot(self.focus)];
        *c = c.saturating_sub(1);
    }

    /// Move the focused cursor down, stopping at the last of `len` entries.
    pub fn move_down(&mut self, len: usize) {
        let c = &mut self.cursors[slot(self.focus)];
        if *c + 1 < len {
            *c += 1;
        }
    }

    /// Pull every cursor back inside its list after the options shrank.
    pub fn clamp(&mut self, options: &FilterOptions) {
        for field in FilterField::ALL {
            let last = options.len(field);
            let c = &mut self.cursors[slot(field)];
            if *c > last {
                *c = last;
            }
        }
    }
}

fn slot(field: FilterField) -> usize {
    FilterField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0)
}

/// Shorten `text` to at most `max` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the four selectors into `area`, top to bottom in panel order.
pub fn render_filter_panel(
    frame: &mut Frame,
    area: Rect,
    options: &FilterOptions,
    filters: &FilterState,
    panel: &PanelState,
    theme: &Theme,
) {
    let chunks = Layout::vertical([
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
    ])
    .split(area);

    for (field, chunk) in FilterField::ALL.into_iter().zip(chunks.iter()) {
        render_list(frame, *chunk, options, filters, panel, field, theme);
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    options: &FilterOptions,
    filters: &FilterState,
    panel: &PanelState,
    field: FilterField,
    theme: &Theme,
) {
    let focused = panel.focus == field;
    let label_width = (area.width as usize).saturating_sub(2 + UNSELECTED_MARK.width());

    let items: Vec<ListItem> = entries(options, field)
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let label = truncate_to_width(&label, label_width);
            if is_selected(options, filters, field, i) {
                ListItem::new(Line::from(vec![
                    Span::styled(SELECTED_MARK, theme.selected),
                    Span::styled(label, theme.selected),
                ]))
            } else {
                ListItem::new(Line::from(vec![
                    Span::raw(UNSELECTED_MARK),
                    Span::styled(label, theme.text),
                ]))
            }
        })
        .collect();

    let title = match field {
        FilterField::Importers if !filters.importers.is_empty() => {
            format!(" {} ({} selected) ", field, filters.importers.len())
        }
        _ => format!(" {} ", field),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused { theme.focus_border } else { theme.border });

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused { theme.cursor } else { Style::default() });

    let mut state = ListState::default().with_selected(Some(panel.cursor(field)));
    frame.render_stateful_widget(list, area, &mut state);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
