//! Normalized view models produced from one analysis response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One point of the trend chart.
///
/// Points are kept exactly as the service sent them; the accessors interpret
/// the `year`, `price` and `demand` fields leniently and return `None` when a
/// field is missing or not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartPoint(Value);

impl ChartPoint {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// X-axis value.
    pub fn year(&self) -> Option<i64> {
        let value = self.0.get("year")?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    pub fn price(&self) -> Option<f64> {
        self.number("price")
    }

    pub fn demand(&self) -> Option<f64> {
        self.number("demand")
    }

    fn number(&self, field: &str) -> Option<f64> {
        let value = self.0.get(field)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }
}

/// One record of the tabular dataset, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow(Value);

impl TableRow {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Column names in document order. Non-object records have none.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

/// Trend series for a single area of a comparison query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeries {
    pub area: String,
    pub points: Vec<ChartPoint>,
}

/// The normalized output of one successful analysis request.
///
/// All fields come from the same response payload and are published together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Narrative summary; may be empty.
    pub summary: String,
    /// Aggregated trend points; may be empty.
    pub chart_series: Vec<ChartPoint>,
    /// Filtered dataset rows; may be empty.
    pub table_rows: Vec<TableRow>,
    /// Areas the service recognised in the query.
    #[serde(default)]
    pub areas: Vec<String>,
    /// Per-area trend series for comparison queries.
    #[serde(default)]
    pub area_series: Vec<AreaSeries>,
}

impl AnalysisResult {
    /// True when none of the views has anything to render.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.chart_series.is_empty()
            && self.table_rows.is_empty()
            && self.area_series.is_empty()
    }
}
