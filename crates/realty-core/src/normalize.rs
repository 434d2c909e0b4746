//! Response payload normalization.
//!
//! Turns one raw analysis payload into an [`AnalysisResult`]. Every field is
//! optional at this boundary: absent or wrongly shaped fields default to empty
//! values. Only a payload that is not a JSON object at all is rejected.
//!
//! Besides the `summary` / `chartData` / `tableData` envelope, the service's
//! native shape is accepted too:
//!
//! ```text
//! {
//!   "summary": "...",
//!   "chart": { "years": [...], "price": [...], "demand": [...] }
//!          | { "by_area": { "<area>": { "years": [...], ... } } },
//!   "table": [ {row}, ... ],
//!   "areas": [ "Wakad" ]
//! }
//! ```
//!
//! The aliases are consulted only when the primary key is absent.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RealtyError, Result};
use crate::session::{AnalysisResult, AreaSeries, ChartPoint, TableRow};

const SUMMARY_KEY: &str = "summary";
const CHART_KEY: &str = "chartData";
const CHART_ALIAS: &str = "chart";
const TABLE_KEY: &str = "tableData";
const TABLE_ALIAS: &str = "table";
const AREAS_KEY: &str = "areas";
const BY_AREA_KEY: &str = "by_area";

/// Parses a raw response body and normalizes it.
///
/// # Errors
///
/// Returns `MalformedResponse` if the body is not JSON or not a JSON object.
pub fn parse_payload(body: &str) -> Result<AnalysisResult> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| RealtyError::malformed(format!("response is not valid JSON: {e}")))?;
    normalize(&payload)
}

/// Normalizes an already-decoded payload.
///
/// # Errors
///
/// Returns `MalformedResponse` if `payload` is not a JSON object.
pub fn normalize(payload: &Value) -> Result<AnalysisResult> {
    let envelope = payload.as_object().ok_or_else(|| {
        RealtyError::malformed(format!(
            "expected a JSON object, got {}",
            value_kind(payload)
        ))
    })?;

    let summary = match envelope.get(SUMMARY_KEY) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => {
            debug!(kind = value_kind(other), "summary is not a string, using empty summary");
            String::new()
        }
    };

    let (chart_series, area_series) = normalize_chart(envelope);
    let table_rows = normalize_table(envelope);
    let areas = envelope
        .get(AREAS_KEY)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    debug!(
        summary_len = summary.len(),
        chart_points = chart_series.len(),
        area_series = area_series.len(),
        table_rows = table_rows.len(),
        "normalized analysis payload"
    );

    Ok(AnalysisResult {
        summary,
        chart_series,
        table_rows,
        areas,
        area_series,
    })
}

fn normalize_chart(envelope: &Map<String, Value>) -> (Vec<ChartPoint>, Vec<AreaSeries>) {
    if let Some(chart) = envelope.get(CHART_KEY) {
        return (sequence(chart, ChartPoint::new), Vec::new());
    }

    match envelope.get(CHART_ALIAS) {
        Some(points @ Value::Array(_)) => (sequence(points, ChartPoint::new), Vec::new()),
        Some(chart @ Value::Object(fields)) => match fields.get(BY_AREA_KEY) {
            Some(Value::Object(by_area)) => {
                let series = by_area
                    .iter()
                    .map(|(area, columns)| AreaSeries {
                        area: area.clone(),
                        points: columnar_points(columns),
                    })
                    .collect();
                (Vec::new(), series)
            }
            _ => (columnar_points(chart), Vec::new()),
        },
        _ => (Vec::new(), Vec::new()),
    }
}

fn normalize_table(envelope: &Map<String, Value>) -> Vec<TableRow> {
    match envelope.get(TABLE_KEY).or_else(|| envelope.get(TABLE_ALIAS)) {
        Some(rows) => sequence(rows, TableRow::new),
        None => Vec::new(),
    }
}

/// Maps each element of an array; anything else is an empty sequence.
fn sequence<T>(value: &Value, wrap: impl Fn(Value) -> T) -> Vec<T> {
    match value {
        Value::Array(items) => items.iter().cloned().map(wrap).collect(),
        other => {
            debug!(kind = value_kind(other), "expected a sequence, using empty");
            Vec::new()
        }
    }
}

/// Zips `{years, price, demand}` columns into points, one per year.
///
/// Short `price`/`demand` columns leave `null` in the missing slots.
fn columnar_points(columns: &Value) -> Vec<ChartPoint> {
    let Some(years) = columns.get("years").and_then(Value::as_array) else {
        return Vec::new();
    };
    let column = |name: &str, index: usize| {
        columns
            .get(name)
            .and_then(Value::as_array)
            .and_then(|values| values.get(index))
            .cloned()
            .unwrap_or(Value::Null)
    };

    years
        .iter()
        .enumerate()
        .map(|(index, year)| {
            let mut point = Map::new();
            point.insert("year".to_string(), year.clone());
            point.insert("price".to_string(), column("price", index));
            point.insert("demand".to_string(), column("demand", index));
            ChartPoint::new(Value::Object(point))
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_normalizes_to_empty_result() {
        let result = normalize(&json!({})).unwrap();
        assert_eq!(result, AnalysisResult::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_non_object_payloads_are_rejected() {
        for payload in [json!(null), json!("Wakad"), json!(42), json!([{"summary": "x"}])] {
            let err = normalize(&payload).unwrap_err();
            assert!(err.is_malformed(), "payload {payload} should be rejected");
        }
    }

    #[test]
    fn test_invalid_json_body_is_malformed() {
        let err = parse_payload("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_full_payload() {
        let payload = json!({
            "summary": "Wakad is trending up",
            "chartData": [
                {"year": 2021, "price": 100, "demand": 5},
                {"year": 2022, "price": 120, "demand": 7}
            ],
            "tableData": [{"locality": "Wakad", "price": 120}]
        });

        let result = normalize(&payload).unwrap();

        assert_eq!(result.summary, "Wakad is trending up");
        assert_eq!(result.chart_series.len(), 2);
        assert_eq!(result.chart_series[1].price(), Some(120.0));
        assert_eq!(result.table_rows.len(), 1);
    }

    #[test]
    fn test_wrongly_shaped_fields_default_to_empty() {
        let payload = json!({
            "summary": 17,
            "chartData": {"year": 2021},
            "tableData": "rows"
        });

        let result = normalize(&payload).unwrap();

        assert_eq!(result.summary, "");
        assert!(result.chart_series.is_empty());
        assert!(result.table_rows.is_empty());
    }

    #[test]
    fn test_individual_records_pass_through_unvalidated() {
        let payload = json!({"chartData": ["junk", {"year": "soon"}], "tableData": [3]});

        let result = normalize(&payload).unwrap();

        assert_eq!(result.chart_series.len(), 2);
        assert_eq!(result.chart_series[0].raw(), &json!("junk"));
        assert_eq!(result.chart_series[1].year(), None);
        assert_eq!(result.table_rows[0].raw(), &json!(3));
    }

    #[test]
    fn test_columnar_chart_alias_is_zipped() {
        let payload = json!({
            "summary": "Found 4 records for Wakad.",
            "chart": {"years": [2020, 2021, 2022], "price": [90.5, 100.0], "demand": [3, 5, 8]},
            "table": [{"area": "Wakad", "year": 2022}],
            "areas": ["Wakad"]
        });

        let result = normalize(&payload).unwrap();

        assert_eq!(result.chart_series.len(), 3);
        assert_eq!(result.chart_series[0].year(), Some(2020));
        assert_eq!(result.chart_series[0].price(), Some(90.5));
        assert_eq!(result.chart_series[2].price(), None);
        assert_eq!(result.chart_series[2].demand(), Some(8.0));
        assert_eq!(result.table_rows.len(), 1);
        assert_eq!(result.areas, vec!["Wakad".to_string()]);
    }

    #[test]
    fn test_primary_keys_win_over_aliases() {
        let payload = json!({
            "chartData": [],
            "chart": {"years": [2020], "price": [1], "demand": [1]},
            "tableData": [{"a": 1}],
            "table": [{"b": 2}, {"b": 3}]
        });

        let result = normalize(&payload).unwrap();

        assert!(result.chart_series.is_empty());
        assert_eq!(result.table_rows.len(), 1);
    }

    #[test]
    fn test_by_area_chart_becomes_area_series() {
        let payload = json!({
            "chart": {"by_area": {
                "Ambegaon": {"years": [2021, 2022], "price": [50, 55], "demand": [2, 4]},
                "Aundh": {"years": [], "price": [], "demand": []}
            }},
            "areas": ["Ambegaon", "Aundh"]
        });

        let result = normalize(&payload).unwrap();

        assert!(result.chart_series.is_empty());
        assert_eq!(result.area_series.len(), 2);
        assert_eq!(result.area_series[0].area, "Ambegaon");
        assert_eq!(result.area_series[0].points.len(), 2);
        assert!(result.area_series[1].points.is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let payload = json!({
            "summary": "s",
            "chartData": [{"year": 2021, "price": 1, "demand": 2}],
            "tableData": [{"x": 1, "y": null}]
        });

        assert_eq!(normalize(&payload).unwrap(), normalize(&payload).unwrap());
    }
}
