//! Month-keyed aggregation of import records into chart series.
//!
//! One parameterised routine serves both charts (price and volume) in both
//! modes (a single combined series, or one series per selected importer).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use dash_core::filters::FilterState;
use dash_core::models::{
    unit_price, AggregatePoint, ImportRecord, Metric, MonthKey, MonthlySummary, SeriesValues,
    SummaryTotals,
};

// ── BucketTotals ──────────────────────────────────────────────────────────────

/// Value and quantity totals accumulated over the records of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketTotals {
    pub total_value_usd: f64,
    pub quantity: f64,
    pub count: usize,
}

impl BucketTotals {
    /// Add one record's value and quantity to the running totals.
    pub fn add(&mut self, record: &ImportRecord) {
        self.total_value_usd += record.total_value_usd;
        self.quantity += record.quantity;
        self.count += 1;
    }

    /// Evaluate `metric` over the totals.
    pub fn value(&self, metric: Metric) -> f64 {
        metric.evaluate(self.total_value_usd, self.quantity)
    }
}

// ── MonthlyAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that turns records into month-ordered series.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Build the chart series for `metric` under `filters`.
    ///
    /// With no importers selected this emits one `total` value per month that
    /// has at least one matching record. With importers selected it emits one
    /// value per importer for every month present in the records matching the
    /// non-importer filters, with explicit zeros where an importer had no
    /// activity.
    ///
    /// Points are ordered by month, ascending.
    pub fn aggregate_by_month(
        records: &[ImportRecord],
        filters: &FilterState,
        metric: Metric,
    ) -> Vec<AggregatePoint> {
        if filters.is_split() {
            Self::aggregate_split(records, filters, metric)
        } else {
            Self::aggregate_single(records, filters, metric)
        }
    }

    /// Per-month value, quantity, price and count for an already filtered
    /// record set, plus totals across all months.
    pub fn monthly_summary(records: &[ImportRecord]) -> (Vec<MonthlySummary>, SummaryTotals) {
        let buckets = Self::group_by_month(records.iter());

        let mut totals = SummaryTotals::default();
        let rows: Vec<MonthlySummary> = buckets
            .into_iter()
            .map(|(month, b)| {
                totals.total_value_usd += b.total_value_usd;
                totals.quantity += b.quantity;
                totals.record_count += b.count;
                totals.months += 1;
                MonthlySummary {
                    month,
                    total_value_usd: b.total_value_usd,
                    quantity: b.quantity,
                    avg_price: b.value(Metric::Price),
                    record_count: b.count,
                }
            })
            .collect();
        totals.avg_price = unit_price(totals.total_value_usd, totals.quantity);

        (rows, totals)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn aggregate_single(
        records: &[ImportRecord],
        filters: &FilterState,
        metric: Metric,
    ) -> Vec<AggregatePoint> {
        Self::group_by_month(records.iter().filter(|r| filters.matches(r)))
            .into_iter()
            .map(|(month, bucket)| AggregatePoint {
                month,
                values: SeriesValues::Total(bucket.value(metric)),
            })
            .collect()
    }

    fn aggregate_split(
        records: &[ImportRecord],
        filters: &FilterState,
        metric: Metric,
    ) -> Vec<AggregatePoint> {
        let base: Vec<&ImportRecord> = records
            .iter()
            .filter(|r| filters.matches_except_importers(r))
            .collect();

        // Month axis comes from the pre-importer set so every series is
        // zero-filled over the same months.
        let months: BTreeSet<MonthKey> = base.iter().map(|r| r.month_key()).collect();

        let mut buckets: HashMap<(MonthKey, &str), BucketTotals> = HashMap::new();
        for record in base.iter().filter(|r| filters.importer_matches(&r.importer)) {
            buckets
                .entry((record.month_key(), record.importer.as_str()))
                .or_default()
                .add(record);
        }

        months
            .into_iter()
            .map(|month| {
                let values = filters
                    .importers
                    .iter()
                    .map(|importer| {
                        let value = buckets
                            .get(&(month, importer.as_str()))
                            .map_or(0.0, |b| b.value(metric));
                        (importer.clone(), value)
                    })
                    .collect();
                AggregatePoint {
                    month,
                    values: SeriesValues::ByImporter(values),
                }
            })
            .collect()
    }

    /// Group records by month. `BTreeMap` keeps the keys sorted.
    fn group_by_month<'a>(
        records: impl Iterator<Item = &'a ImportRecord>,
    ) -> BTreeMap<MonthKey, BucketTotals> {
        let mut map: BTreeMap<MonthKey, BucketTotals> = BTreeMap::new();
        for record in records {
            map.entry(record.month_key()).or_default().add(record);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(
        year: i32,
        month: u32,
        product: &str,
        importer: &str,
        quantity: f64,
        value: f64,
    ) -> ImportRecord {
        ImportRecord::new(year, month, product, importer, "D", quantity, value)
    }

    fn example_records() -> Vec<ImportRecord> {
        vec![
            rec(2023, 1, "A", "X", 10.0, 100.0),
            rec(2023, 1, "A", "Y", 5.0, 60.0),
        ]
    }

    fn split(importers: &[&str]) -> FilterState {
        FilterState {
            importers: importers.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn total_of(p: &AggregatePoint) -> f64 {
        p.get("total").expect("total series")
    }

    // ── worked examples ───────────────────────────────────────────────────────

    #[test]
    fn test_single_series_price_is_ratio_of_sums() {
        let points = MonthlyAggregator::aggregate_by_month(
            &example_records(),
            &FilterState::default(),
            Metric::Price,
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].month.to_string(), "2023-01");
        assert!((total_of(&points[0]) - 160.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_series_volume() {
        let points = MonthlyAggregator::aggregate_by_month(
            &example_records(),
            &FilterState::default(),
            Metric::Volume,
        );
        assert_eq!(points.len(), 1);
        assert_eq!(total_of(&points[0]), 15.0);
    }

    #[test]
    fn test_split_price_per_importer() {
        let points = MonthlyAggregator::aggregate_by_month(
            &example_records(),
            &split(&["X", "Y"]),
            Metric::Price,
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].get("X"), Some(10.0));
        assert_eq!(points[0].get("Y"), Some(12.0));
        assert_eq!(
            serde_json::to_value(&points[0]).unwrap(),
            serde_json::json!({"month": "2023-01", "X": 10.0, "Y": 12.0})
        );
    }

    #[test]
    fn test_unknown_product_yields_empty_series() {
        let filters = FilterState {
            product: Some("B".into()),
            ..Default::default()
        };
        for metric in [Metric::Price, Metric::Volume] {
            let points =
                MonthlyAggregator::aggregate_by_month(&example_records(), &filters, metric);
            assert!(points.is_empty());
        }
    }

    // ── properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_price_is_not_mean_of_record_prices() {
        // Record prices are 1.0 and 100.0; the mean would be 50.5.
        let records = vec![
            rec(2023, 3, "A", "X", 1000.0, 1000.0),
            rec(2023, 3, "A", "X", 1.0, 100.0),
        ];
        let points =
            MonthlyAggregator::aggregate_by_month(&records, &FilterState::default(), Metric::Price);
        assert!((total_of(&points[0]) - 1100.0 / 1001.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_quantity_price_is_zero() {
        let records = vec![rec(2023, 3, "A", "X", 0.0, 500.0)];
        let points =
            MonthlyAggregator::aggregate_by_month(&records, &FilterState::default(), Metric::Price);
        assert_eq!(total_of(&points[0]), 0.0);
    }

    #[test]
    fn test_points_sorted_by_month() {
        let records = vec![
            rec(2024, 1, "A", "X", 1.0, 1.0),
            rec(2023, 12, "A", "X", 1.0, 1.0),
            rec(2023, 2, "A", "X", 1.0, 1.0),
            rec(2023, 12, "A", "Y", 1.0, 1.0),
        ];
        for filters in [FilterState::default(), split(&["X", "Y"])] {
            let points = MonthlyAggregator::aggregate_by_month(&records, &filters, Metric::Volume);
            let months: Vec<String> = points.iter().map(|p| p.month.to_string()).collect();
            assert_eq!(months, vec!["2023-02", "2023-12", "2024-01"]);
            assert!(points.windows(2).all(|w| w[0].month < w[1].month));
        }
    }

    #[test]
    fn test_split_zero_fills_every_month_and_importer() {
        let records = vec![
            rec(2023, 1, "A", "X", 10.0, 100.0),
            rec(2023, 2, "A", "Y", 5.0, 60.0),
            // Importer outside the selection still contributes a month.
            rec(2023, 3, "A", "W", 1.0, 1.0),
        ];
        let filters = split(&["X", "Y"]);
        for metric in [Metric::Price, Metric::Volume] {
            let points = MonthlyAggregator::aggregate_by_month(&records, &filters, metric);
            assert_eq!(points.len(), 3);
            for p in &points {
                assert_eq!(p.values.keys(), vec!["X", "Y"]);
                assert!(p.get("X").is_some() && p.get("Y").is_some());
            }
            assert_eq!(points[0].get("Y"), Some(0.0));
            assert_eq!(points[1].get("X"), Some(0.0));
            assert_eq!(points[2].get("X"), Some(0.0));
            assert_eq!(points[2].get("Y"), Some(0.0));
        }
    }

    #[test]
    fn test_split_respects_non_importer_filters() {
        let records = vec![
            rec(2023, 1, "A", "X", 10.0, 100.0),
            rec(2023, 2, "B", "X", 10.0, 100.0),
        ];
        let filters = FilterState {
            product: Some("A".into()),
            importers: vec!["X".into()],
            ..Default::default()
        };
        let points = MonthlyAggregator::aggregate_by_month(&records, &filters, Metric::Volume);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].month, MonthKey::new(2023, 1));
    }

    #[test]
    fn test_split_series_follow_selection_order() {
        let points = MonthlyAggregator::aggregate_by_month(
            &example_records(),
            &split(&["Y", "X"]),
            Metric::Volume,
        );
        assert_eq!(points[0].values.keys(), vec!["Y", "X"]);
        assert_eq!(
            points[0].values,
            SeriesValues::ByImporter(vec![("Y".into(), 5.0), ("X".into(), 10.0)])
        );
    }

    #[test]
    fn test_split_volume_sums_same_importer() {
        let records = vec![
            rec(2023, 1, "A", "X", 10.0, 100.0),
            rec(2023, 1, "B", "X", 4.0, 100.0),
        ];
        let points =
            MonthlyAggregator::aggregate_by_month(&records, &split(&["X"]), Metric::Volume);
        assert_eq!(points[0].get("X"), Some(14.0));
    }

    #[test]
    fn test_empty_records() {
        for filters in [FilterState::default(), split(&["X"])] {
            assert!(MonthlyAggregator::aggregate_by_month(&[], &filters, Metric::Price).is_empty());
        }
    }

    // ── monthly_summary ───────────────────────────────────────────────────────

    #[test]
    fn test_monthly_summary_rows_and_totals() {
        let records = vec![
            rec(2023, 1, "A", "X", 10.0, 100.0),
            rec(2023, 1, "A", "Y", 5.0, 60.0),
            rec(2023, 2, "A", "X", 5.0, 40.0),
        ];
        let (rows, totals) = MonthlyAggregator::monthly_summary(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record_count, 2);
        assert_eq!(rows[0].quantity, 15.0);
        assert!((rows[0].avg_price - 160.0 / 15.0).abs() < 1e-12);
        assert_eq!(rows[1].avg_price, 8.0);

        assert_eq!(totals.months, 2);
        assert_eq!(totals.record_count, 3);
        assert_eq!(totals.total_value_usd, 200.0);
        assert_eq!(totals.quantity, 20.0);
        assert_eq!(totals.avg_price, 10.0);
    }

    #[test]
    fn test_monthly_summary_empty() {
        let (rows, totals) = MonthlyAggregator::monthly_summary(&[]);
        assert!(rows.is_empty());
        assert_eq!(totals, SummaryTotals::default());
    }
}
