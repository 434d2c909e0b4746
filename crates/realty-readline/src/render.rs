//! Terminal renderers for the three result views.
//!
//! Every renderer takes an already-normalized view model and returns `None`
//! when it has nothing to show.

use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use realty_core::session::{AnalysisResult, AreaSeries, ChartPoint, SessionState, TableRow};
use realty_core::table::{cell_text, header_label};
use realty_core::derive_columns;

const CARD_WIDTH: usize = 72;
const BAR_WIDTH: usize = 24;

/// Renders whatever the current session state calls for.
pub fn render_state(state: &SessionState) -> String {
    match state {
        SessionState::Idle => "Ask about a locality (e.g., Analyze Wakad)"
            .bright_black()
            .to_string(),
        SessionState::Pending { .. } => "Processing your request...".yellow().to_string(),
        SessionState::Error(message) => format!("{} {}", "✗".red().bold(), message.red()),
        SessionState::Success(result) => render_result(result),
    }
}

/// Summary card, trend chart(s) and data table, separated by blank lines.
pub fn render_result(result: &AnalysisResult) -> String {
    let sections: Vec<String> = render_summary(result)
        .into_iter()
        .chain(render_trend_chart("Trend Chart", &result.chart_series))
        .chain(result.area_series.iter().filter_map(render_area_series))
        .chain(render_table(&result.table_rows))
        .collect();

    if sections.is_empty() {
        "The service returned no data for this query.".bright_black().to_string()
    } else {
        sections.join("\n\n")
    }
}

pub fn render_summary(result: &AnalysisResult) -> Option<String> {
    if result.summary.is_empty() {
        return None;
    }

    let mut title = "Summary".to_string();
    if !result.areas.is_empty() {
        title.push_str(&format!(" · {}", result.areas.join(", ")));
    }

    let border = "─".repeat(CARD_WIDTH);
    let mut out = format!("{}\n{}\n", title.bold().cyan(), border.bright_black());
    for line in wrap(&result.summary, CARD_WIDTH) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&border.bright_black().to_string());
    Some(out)
}

fn render_area_series(series: &AreaSeries) -> Option<String> {
    render_trend_chart(&format!("Trend Chart · {}", series.area), &series.points)
}

/// Horizontal bar chart: one row per point, with price and demand bars scaled
/// to the largest value of their series.
pub fn render_trend_chart(title: &str, points: &[ChartPoint]) -> Option<String> {
    if points.is_empty() {
        return None;
    }

    let max_price = max_of(points, ChartPoint::price);
    let max_demand = max_of(points, ChartPoint::demand);

    let mut out = format!("{}\n", title.bold().cyan());
    for point in points {
        let year = point
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "{year:>6} │ price  {} │ demand {}\n",
            bar(point.price(), max_price).blue(),
            bar(point.demand(), max_demand).green(),
        ));
    }
    out.pop();
    Some(out)
}

/// Bordered table whose columns come from the first row.
pub fn render_table(rows: &[TableRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let columns = derive_columns(rows);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(columns.iter().map(|c| Cell::new(header_label(c))));
    for row in rows {
        table.add_row(columns.iter().map(|c| cell_text(row, c)));
    }

    Some(format!("{}\n{table}", "Filtered Data".bold().cyan()))
}

fn max_of(points: &[ChartPoint], value: fn(&ChartPoint) -> Option<f64>) -> f64 {
    points
        .iter()
        .filter_map(value)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

fn bar(value: Option<f64>, max: f64) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return format!("{:<width$} {:>10}", "", "-", width = BAR_WIDTH);
    };
    let filled = if max > 0.0 {
        ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!(
        "{:<width$} {:>10}",
        "█".repeat(filled.min(BAR_WIDTH)),
        format_number(value),
        width = BAR_WIDTH
    )
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}
