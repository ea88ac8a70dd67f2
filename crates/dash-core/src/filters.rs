//! Filter state and the record filtering predicate.
//!
//! A [`FilterState`] is owned by the caller and passed by reference into the
//! engine; nothing here keeps state between calls. "No restriction" is an
//! explicit `None` / empty list rather than a magic `"all"` or `0`.

use std::fmt;

use serde::Serialize;

use crate::models::ImportRecord;

// ── FilterField ───────────────────────────────────────────────────────────────

/// The four filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Product,
    Importers,
    Destination,
    Year,
}

impl FilterField {
    /// Panel order.
    pub const ALL: [FilterField; 4] = [
        FilterField::Product,
        FilterField::Destination,
        FilterField::Year,
        FilterField::Importers,
    ];

    /// Label of the unrestricted choice in a selector.
    pub fn all_label(self) -> &'static str {
        match self {
            FilterField::Product => "All Products",
            FilterField::Importers => "All Importers",
            FilterField::Destination => "All Destinations",
            FilterField::Year => "All Years",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterField::Product => "Product",
            FilterField::Importers => "Compare Importers",
            FilterField::Destination => "Destination",
            FilterField::Year => "Year",
        };
        f.write_str(s)
    }
}

// ── FilterState ───────────────────────────────────────────────────────────────

/// Active filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Exact product name, or `None` for every product.
    pub product: Option<String>,
    /// Importers to compare. Empty means no restriction; otherwise records are
    /// restricted to these importers and charts split one series per entry,
    /// in this order.
    pub importers: Vec<String>,
    /// Exact destination, or `None` for every destination.
    pub destination: Option<String>,
    /// Calendar year, or `None` for every year.
    pub year: Option<i32>,
}

impl FilterState {
    /// `true` when no field restricts the record set.
    pub fn is_unrestricted(&self) -> bool {
        self.product.is_none()
            && self.importers.is_empty()
            && self.destination.is_none()
            && self.year.is_none()
    }

    /// `true` when charts should produce one series per selected importer.
    pub fn is_split(&self) -> bool {
        !self.importers.is_empty()
    }

    /// Whether `record` passes every active condition.
    pub fn matches(&self, record: &ImportRecord) -> bool {
        self.matches_except_importers(record) && self.importer_matches(&record.importer)
    }

    /// Product, destination and year conditions only.
    pub fn matches_except_importers(&self, record: &ImportRecord) -> bool {
        self.product.as_deref().map_or(true, |p| record.product == p)
            && self
                .destination
                .as_deref()
                .map_or(true, |d| record.destination == d)
            && self.year.map_or(true, |y| record.year == y)
    }

    /// Importer condition only.
    pub fn importer_matches(&self, importer: &str) -> bool {
        self.importers.is_empty() || self.importers.iter().any(|i| i == importer)
    }

    /// A copy with `field` reset to unrestricted.
    pub fn without(&self, field: FilterField) -> FilterState {
        let mut next = self.clone();
        next.reset(field);
        next
    }

    /// Reset `field` to unrestricted. Returns `true` if anything changed.
    pub fn reset(&mut self, field: FilterField) -> bool {
        match field {
            FilterField::Product => self.product.take().is_some(),
            FilterField::Destination => self.destination.take().is_some(),
            FilterField::Year => self.year.take().is_some(),
            FilterField::Importers => {
                let changed = !self.importers.is_empty();
                self.importers.clear();
                changed
            }
        }
    }

    /// Apply a single filter change. Returns `true` if the state changed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let before = self.clone();
        match change {
            FilterChange::Product(p) => self.product = p,
            FilterChange::Destination(d) => self.destination = d,
            FilterChange::Year(y) => self.year = y,
            FilterChange::Importers(list) => self.importers = dedup_in_order(list),
            FilterChange::ToggleImporter(name) => {
                if let Some(pos) = self.importers.iter().position(|i| *i == name) {
                    self.importers.remove(pos);
                } else {
                    self.importers.push(name);
                }
            }
            FilterChange::Reset(field) => {
                self.reset(field);
            }
            FilterChange::ClearAll => *self = FilterState::default(),
        }
        *self != before
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let importers = if self.importers.is_empty() {
            "all".to_string()
        } else {
            self.importers.join("+")
        };
        write!(
            f,
            "product={} importers={} destination={} year={}",
            self.product.as_deref().unwrap_or("all"),
            importers,
            self.destination.as_deref().unwrap_or("all"),
            self.year.map_or_else(|| "all".to_string(), |y| y.to_string()),
        )
    }
}

// ── FilterChange ──────────────────────────────────────────────────────────────

/// The single mutation surface for [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Product(Option<String>),
    /// Replace the importer selection. Duplicates are dropped, first one wins.
    Importers(Vec<String>),
    Destination(Option<String>),
    Year(Option<i32>),
    /// Add the importer if absent, remove it if present.
    ToggleImporter(String),
    /// Reset one field to unrestricted.
    Reset(FilterField),
    /// Reset every field.
    ClearAll,
}

fn dedup_in_order(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for item in list {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
