//! Selector options and filter-state reconciliation.
//!
//! Each selector lists the values reachable under every *other* active
//! filter, so choosing a product never collapses the product list to that
//! one product. Reconciliation then drops any selection that has become
//! unreachable because of the other filters.

use std::collections::BTreeSet;

use dash_core::filters::{FilterField, FilterState};
use dash_core::models::ImportRecord;
use serde::Serialize;
use tracing::debug;

/// Option lists for the four selectors, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub products: Vec<String>,
    pub importers: Vec<String>,
    pub destinations: Vec<String>,
    pub years: Vec<i32>,
}

impl FilterOptions {
    /// Compute all four option lists for the current filter state.
    pub fn compute(records: &[ImportRecord], filters: &FilterState) -> Self {
        Self {
            products: distinct(records, filters, FilterField::Product, |r| r.product.clone()),
            importers: distinct(records, filters, FilterField::Importers, |r| {
                r.importer.clone()
            }),
            destinations: distinct(records, filters, FilterField::Destination, |r| {
                r.destination.clone()
            }),
            years: distinct(records, filters, FilterField::Year, |r| r.year),
        }
    }

    /// Display labels for `field`'s options (years rendered as text).
    pub fn labels(&self, field: FilterField) -> Vec<String> {
        match field {
            FilterField::Product => self.products.clone(),
            FilterField::Importers => self.importers.clone(),
            FilterField::Destination => self.destinations.clone(),
            FilterField::Year => self.years.iter().map(|y| y.to_string()).collect(),
        }
    }

    pub fn len(&self, field: FilterField) -> usize {
        match field {
            FilterField::Product => self.products.len(),
            FilterField::Importers => self.importers.len(),
            FilterField::Destination => self.destinations.len(),
            FilterField::Year => self.years.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.len(*f) == 0)
    }
}

/// Distinct values of one field across the records that pass every filter
/// except the one on that field, sorted ascending.
pub fn distinct<T, F>(
    records: &[ImportRecord],
    filters: &FilterState,
    field: FilterField,
    key: F,
) -> Vec<T>
where
    T: Ord,
    F: Fn(&ImportRecord) -> T,
{
    let relaxed = filters.without(field);
    records
        .iter()
        .filter(|r| relaxed.matches(r))
        .map(key)
        .collect::<BTreeSet<T>>()
        .into_iter()
        .collect()
}

// ── Reconciliation ────────────────────────────────────────────────────────────

/// Order in which selections are checked. A selection checked later sees
/// the wider option lists left behind by earlier resets, so it survives
/// where it can.
const CHECK_ORDER: [FilterField; 4] = [
    FilterField::Importers,
    FilterField::Destination,
    FilterField::Year,
    FilterField::Product,
];

/// Reset every selection that is absent from its freshly computed option
/// list. Returns the reconciled state and whether anything was reset.
///
/// The result is a fixed point: calling `reconcile` again on its own output
/// is always a no-op.
pub fn reconcile(records: &[ImportRecord], filters: &FilterState) -> (FilterState, bool) {
    reconcile_in_order(records, filters, None)
}

/// Like [`reconcile`], but `last_changed` is checked last so the user's most
/// recent choice is the one that survives a conflict.
///
/// Toggling an importer that never traded the selected product therefore
/// resets the product and keeps the importer.
pub fn reconcile_after(
    records: &[ImportRecord],
    filters: &FilterState,
    last_changed: FilterField,
) -> (FilterState, bool) {
    reconcile_in_order(records, filters, Some(last_changed))
}

fn reconcile_in_order(
    records: &[ImportRecord],
    filters: &FilterState,
    keep: Option<FilterField>,
) -> (FilterState, bool) {
    let mut order: Vec<FilterField> = CHECK_ORDER
        .iter()
        .copied()
        .filter(|f| Some(*f) != keep)
        .collect();
    order.extend(keep);

    let mut state = filters.clone();

    // Values absent from the whole record set go first, so they cannot
    // knock out selections that are valid on their own.
    let mut changed = false;
    for field in &order {
        changed |= reconcile_field(records, &mut state, *field, Reach::Anywhere);
    }

    // Resets only widen the remaining option lists, so this settles after
    // at most one extra pass.
    loop {
        let mut pass_changed = false;
        for field in &order {
            pass_changed |= reconcile_field(records, &mut state, *field, Reach::UnderOtherFilters);
        }
        if !pass_changed {
            break;
        }
        changed = true;
    }

    (state, changed)
}

/// Which records a selection must appear in to be kept.
#[derive(Clone, Copy)]
enum Reach {
    Anywhere,
    UnderOtherFilters,
}

/// Check one field against its option list; reset it when unreachable.
fn reconcile_field(
    records: &[ImportRecord],
    state: &mut FilterState,
    field: FilterField,
    reach: Reach,
) -> bool {
    let relaxed = match reach {
        Reach::Anywhere => FilterState::default(),
        Reach::UnderOtherFilters => state.without(field),
    };
    let reachable = |pred: &dyn Fn(&ImportRecord) -> bool| {
        records.iter().any(|r| relaxed.matches(r) && pred(r))
    };

    match field {
        FilterField::Product => match state.product.clone() {
            Some(product) if !reachable(&|r| r.product == product) => {
                debug!(%product, "product no longer available; resetting");
                state.product = None;
                true
            }
            _ => false,
        },
        FilterField::Destination => match state.destination.clone() {
            Some(destination) if !reachable(&|r| r.destination == destination) => {
                debug!(%destination, "destination no longer available; resetting");
                state.destination = None;
                true
            }
            _ => false,
        },
        FilterField::Year => match state.year {
            Some(year) if !reachable(&|r| r.year == year) => {
                debug!(year, "year no longer available; resetting");
                state.year = None;
                true
            }
            _ => false,
        },
        FilterField::Importers => {
            let kept: Vec<String> = state
                .importers
                .iter()
                .filter(|i| reachable(&|r| r.importer == **i))
                .cloned()
                .collect();
            if kept.len() == state.importers.len() {
                return false;
            }
            debug!(
                dropped = state.importers.len() - kept.len(),
                "importers no longer available; dropping"
            );
            state.importers = kept;
            true
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
