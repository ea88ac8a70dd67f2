use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One row of trade-import data as served by the backend API.
///
/// Only `year`, `month`, `importer`, `product`, `destination`, `quantity` and
/// `total_value_usd` are read by the aggregation engine; the remaining columns
/// are carried through so the filtered subset keeps the full row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub id: Option<i64>,
    /// Shipment date as sent by the API (free-form string).
    #[serde(default)]
    pub date: String,
    pub year: i32,
    /// Calendar month, 1–12.
    pub month: u32,
    #[serde(default)]
    pub supplier: String,
    pub importer: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub export: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(alias = "totalValueUsd")]
    pub total_value_usd: f64,
    pub quantity: f64,
    #[serde(default)]
    pub quantity_unit: String,
    /// Per-record unit price. Never used for aggregation: monthly prices are
    /// always recomputed as summed value over summed quantity.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_unit: String,
    #[serde(default)]
    pub incoterm: String,
    #[serde(default)]
    pub hs_code: Option<i64>,
    pub destination: String,
    #[serde(default)]
    pub importer_code: String,
    #[serde(default)]
    pub port: String,
    pub product: String,
    #[serde(default)]
    pub insert_date: String,
}

impl ImportRecord {
    /// Minimal constructor covering the columns the engine reads.
    pub fn new(
        year: i32,
        month: u32,
        product: impl Into<String>,
        importer: impl Into<String>,
        destination: impl Into<String>,
        quantity: f64,
        total_value_usd: f64,
    ) -> Self {
        Self {
            id: None,
            date: String::new(),
            year,
            month,
            supplier: String::new(),
            importer: importer.into(),
            origin: String::new(),
            export: String::new(),
            product_description: String::new(),
            manufacturer: String::new(),
            total_value_usd,
            quantity,
            quantity_unit: String::new(),
            price: 0.0,
            price_unit: String::new(),
            incoterm: String::new(),
            hs_code: None,
            destination: destination.into(),
            importer_code: String::new(),
            port: String::new(),
            product: product.into(),
            insert_date: String::new(),
        }
    }

    /// The time bucket this record falls into.
    pub fn month_key(&self) -> MonthKey {
        MonthKey::new(self.year, self.month)
    }
}

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// Year/month bucket key. Renders as `YYYY-MM`; the derived ordering is
/// chronological and agrees with lexicographic order of the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Two-digit month used for chart x-axis ticks (`"2023-04"` → `"04"`).
    pub fn axis_label(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Human-readable label such as `"Apr 2023"`.
    pub fn long_label(&self) -> String {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// Which value a monthly series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Average price per unit: summed value / summed quantity (0 when no quantity).
    Price,
    /// Summed quantity.
    Volume,
}

impl Metric {
    /// Evaluate the metric over bucket totals.
    pub fn evaluate(self, total_value_usd: f64, quantity: f64) -> f64 {
        match self {
            Metric::Price => unit_price(total_value_usd, quantity),
            Metric::Volume => quantity,
        }
    }

    /// Legend label of the combined (non-split) series.
    pub fn total_label(self) -> &'static str {
        match self {
            Metric::Price => "Avg Price Per Ton (USD)",
            Metric::Volume => "Total Quantity",
        }
    }
}

/// Ratio of summed value to summed quantity; `0.0` when quantity is not positive.
pub fn unit_price(total_value_usd: f64, quantity: f64) -> f64 {
    if quantity > 0.0 {
        total_value_usd / quantity
    } else {
        0.0
    }
}

// ── AggregatePoint ────────────────────────────────────────────────────────────

/// Numeric payload of one monthly point.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValues {
    /// Single combined series (no importer split).
    Total(f64),
    /// One value per selected importer, in selection order.
    ByImporter(Vec<(String, f64)>),
}

impl SeriesValues {
    /// Series names carried by this point (`"total"` for the combined series).
    pub fn keys(&self) -> Vec<&str> {
        match self {
            SeriesValues::Total(_) => vec![TOTAL_KEY],
            SeriesValues::ByImporter(values) => values.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }
}

/// Key of the combined series in serialized points.
pub const TOTAL_KEY: &str = "total";

/// One chart-ready row: a month plus one or more named values.
///
/// Serializes flat, as `{"month": "2023-01", "total": 15.0}` or
/// `{"month": "2023-01", "X": 10.0, "Y": 12.0}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePoint {
    pub month: MonthKey,
    pub values: SeriesValues,
}

impl AggregatePoint {
    /// Look up a series value by name.
    pub fn get(&self, key: &str) -> Option<f64> {
        match &self.values {
            SeriesValues::Total(v) => (key == TOTAL_KEY).then_some(*v),
            SeriesValues::ByImporter(values) => {
                values.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
            }
        }
    }
}

impl Serialize for AggregatePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(MONTH_KEY, &self.month)?;
        match &self.values {
            SeriesValues::Total(v) => map.serialize_entry(TOTAL_KEY, v)?,
            SeriesValues::ByImporter(values) => {
                for (importer, v) in values {
                    map.serialize_entry(&field_name(importer, values), v)?;
                }
            }
        }
        map.end()
    }
}

/// Key of the month in serialized points.
pub const MONTH_KEY: &str = "month";

/// Serialized key for `importer`. An importer named like [`MONTH_KEY`] gets
/// `_` appended until the key is free, so the month is never overwritten.
fn field_name<'a>(importer: &'a str, values: &[(String, f64)]) -> std::borrow::Cow<'a, str> {
    if importer != MONTH_KEY {
        return importer.into();
    }
    let mut name = format!("{importer}_");
    while values.iter().any(|(k, _)| *k == name) {
        name.push('_');
    }
    name.into()
}

// ── Monthly summary ───────────────────────────────────────────────────────────

/// Per-month roll-up of the filtered records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_value_usd: f64,
    pub quantity: f64,
    /// `total_value_usd / quantity`, or 0 when quantity is 0.
    pub avg_price: f64,
    pub record_count: usize,
}

/// Totals across every month of a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub total_value_usd: f64,
    pub quantity: f64,
    pub avg_price: f64,
    pub record_count: usize,
    pub months: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ImportRecord deserialization ──────────────────────────────────────────

    #[test]
    fn test_record_deserializes_full_api_row() {
        let json = r#"{
            "id": 7, "date": "2023-01-14", "year": 2023, "month": 1,
            "supplier": "S", "importer": "X", "origin": "CN", "export": "CN",
            "product_description": "desc", "manufacturer": "M",
            "total_value_usd": 100.0, "quantity": 10.0, "quantity_unit": "TON",
            "price": 10.0, "price_unit": "USD/TON", "incoterm": "CIF",
            "hs_code": 310210, "destination": "D", "importer_code": "X1",
            "port": "P", "product": "A", "insert_date": "2024-02-01"
        }"#;
        let r: ImportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, Some(7));
        assert_eq!(r.hs_code, Some(310_210));
        assert_eq!(r.importer, "X");
        assert_eq!(r.month_key(), MonthKey::new(2023, 1));
    }

    #[test]
    fn test_record_deserializes_minimal_row_with_camel_case_value() {
        let json = r#"{"year": 2023, "month": 2, "importer": "Y", "product": "A",
                       "destination": "D", "quantity": 5, "totalValueUsd": 60}"#;
        let r: ImportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.total_value_usd, 60.0);
        assert_eq!(r.quantity, 5.0);
        assert!(r.supplier.is_empty());
    }

    #[test]
    fn test_record_missing_core_field_is_rejected() {
        let json = r#"{"year": 2023, "month": 2, "product": "A",
                       "destination": "D", "quantity": 5, "total_value_usd": 60}"#;
        assert!(serde_json::from_str::<ImportRecord>(json).is_err());
    }

    // ── MonthKey ──────────────────────────────────────────────────────────────

    #[test]
    fn test_month_key_display_is_zero_padded() {
        assert_eq!(MonthKey::new(2023, 1).to_string(), "2023-01");
        assert_eq!(MonthKey::new(2023, 12).to_string(), "2023-12");
    }

    #[test]
    fn test_month_key_order_matches_string_order() {
        let mut keys = vec![
            MonthKey::new(2024, 1),
            MonthKey::new(2023, 11),
            MonthKey::new(2023, 2),
        ];
        keys.sort();
        let as_strings: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let mut sorted_strings = as_strings.clone();
        sorted_strings.sort();
        assert_eq!(as_strings, sorted_strings);
        assert_eq!(as_strings, vec!["2023-02", "2023-11", "2024-01"]);
    }

    #[test]
    fn test_month_key_labels() {
        let key = MonthKey::new(2023, 4);
        assert_eq!(key.axis_label(), "04");
        assert_eq!(key.long_label(), "Apr 2023");
    }

    #[test]
    fn test_month_key_serializes_as_string() {
        let json = serde_json::to_string(&MonthKey::new(2022, 9)).unwrap();
        assert_eq!(json, "\"2022-09\"");
    }

    // ── Metric ────────────────────────────────────────────────────────────────

    #[test]
    fn test_metric_price_is_ratio_of_sums() {
        assert!((Metric::Price.evaluate(160.0, 15.0) - 160.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_metric_price_zero_quantity() {
        assert_eq!(Metric::Price.evaluate(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_metric_volume() {
        assert_eq!(Metric::Volume.evaluate(100.0, 15.0), 15.0);
    }

    // ── AggregatePoint ────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_point_serializes_total_flat() {
        let p = AggregatePoint {
            month: MonthKey::new(2023, 1),
            values: SeriesValues::Total(15.0),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, serde_json::json!({"month": "2023-01", "total": 15.0}));
    }

    #[test]
    fn test_aggregate_point_serializes_importers_flat() {
        let p = AggregatePoint {
            month: MonthKey::new(2023, 1),
            values: SeriesValues::ByImporter(vec![("X".into(), 10.0), ("Y".into(), 12.0)]),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"month": "2023-01", "X": 10.0, "Y": 12.0})
        );
        assert_eq!(p.get("Y"), Some(12.0));
        assert_eq!(p.get("total"), None);
        assert_eq!(p.values.keys(), vec!["X", "Y"]);
    }

    #[test]
    fn test_aggregate_point_importer_named_month_keeps_month() {
        let p = AggregatePoint {
            month: MonthKey::new(2023, 1),
            values: SeriesValues::ByImporter(vec![
                ("month".into(), 10.0),
                ("month_".into(), 4.0),
            ]),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"month": "2023-01", "month__": 10.0, "month_": 4.0})
        );
        assert_eq!(p.get("month"), Some(10.0));
    }
}
