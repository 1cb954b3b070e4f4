//! Daily sales line chart.
//!
//! Input is a JSON object keyed by `YYYY-MM-DD` date:
//!
//! ```text
//! {"2024-03-01": {"total": "1500.00", "count": 4}, "2024-03-02": {"total": 820, "count": 2}}
//! ```
//!
//! Anything that cannot be read as such renders an empty chart.

use serde_json::Value;
use tracing::{debug, warn};

use possum_core::constants::CURRENCY_SYMBOL;

use crate::config::{
    ChartConfig, ChartData, ChartKind, ChartOptions, ColorSpec, Dataset, Interaction, Legend,
    Scale, Ticks,
};
use crate::format::{group_thousands, parse_float_prefix};
use crate::mount::ChartWidget;
use crate::parse_input;

const AMOUNT_COLOR: &str = "rgba(59, 130, 246, 1)";
const AMOUNT_FILL: &str = "rgba(59, 130, 246, 0.1)";
const COUNT_COLOR: &str = "rgba(16, 185, 129, 1)";
const COUNT_FILL: &str = "rgba(16, 185, 129, 0)";
const LINE_TENSION: f64 = 0.4;

/// One day of aggregated sales.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: String,

    /// Axis label, `DD/MM` for well-formed dates.
    pub label: String,

    pub total: f64,
    pub count: f64,
}

/// Sales amount and transaction count per day.
///
/// # Examples
///
/// ```
/// use possum_charts::DailySalesChart;
/// use possum_charts::mount::ChartWidget;
///
/// let chart = DailySalesChart::new();
/// let config = chart.render(r#"{"2024-03-02": {"total": "1234", "count": 3}}"#);
///
/// assert_eq!(config.data.labels, vec!["02/03"]);
/// assert_eq!(config.tooltip(0, 0), Some("Sales Amount (KSh): KSh 1,234"));
/// assert_eq!(config.tooltip(1, 0), Some("Transaction Count: 3"));
/// ```
#[derive(Debug, Clone)]
pub struct DailySalesChart {
    currency: String,
}

impl DailySalesChart {
    pub fn new() -> Self {
        Self::with_currency(CURRENCY_SYMBOL)
    }

    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// Read the per-day aggregates, sorted by date.
    pub fn parse(&self, input: &str) -> Vec<DailySales> {
        let value = match parse_input(input) {
            Some(value) => value,
            None => return Vec::new(),
        };

        let Value::Object(days) = value else {
            warn!("Daily sales data is not a JSON object");
            return Vec::new();
        };

        let mut dates: Vec<(&String, &Value)> = days.iter().collect();
        dates.sort_by(|a, b| a.0.cmp(b.0));

        dates
            .into_iter()
            .map(|(date, day)| DailySales {
                date: date.clone(),
                label: date_label(date),
                total: lenient_number(day.get("total")),
                count: lenient_number(day.get("count")),
            })
            .collect()
    }

    fn amount_label(&self) -> String {
        format!("Sales Amount ({})", self.currency)
    }
}

impl Default for DailySalesChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartWidget for DailySalesChart {
    fn name(&self) -> &'static str {
        "daily sales"
    }

    fn render(&self, input: &str) -> ChartConfig {
        let days = self.parse(input);
        debug!(days = days.len(), "Rendering daily sales chart");

        let amount_label = self.amount_label();
        let amounts: Vec<f64> = days.iter().map(|d| d.total).collect();
        let counts: Vec<f64> = days.iter().map(|d| d.count).collect();

        let amount_tooltips = amounts
            .iter()
            .map(|v| format!("{amount_label}: {} {}", self.currency, group_thousands(*v)))
            .collect();
        let count_tooltips = counts
            .iter()
            .map(|v| format!("Transaction Count: {v}"))
            .collect();

        let amount = Dataset {
            label: amount_label,
            data: amounts,
            border_color: ColorSpec::Single(AMOUNT_COLOR.to_string()),
            background_color: ColorSpec::Single(AMOUNT_FILL.to_string()),
            border_width: 2,
            fill: Some(true),
            tension: Some(LINE_TENSION),
            border_dash: None,
            y_axis_id: Some("y".to_string()),
            tooltips: amount_tooltips,
        };
        let count = Dataset {
            label: "Transaction Count".to_string(),
            data: counts,
            border_color: ColorSpec::Single(COUNT_COLOR.to_string()),
            background_color: ColorSpec::Single(COUNT_FILL.to_string()),
            border_width: 2,
            fill: None,
            tension: Some(LINE_TENSION),
            border_dash: Some(vec![5, 5]),
            y_axis_id: Some("y1".to_string()),
            tooltips: count_tooltips,
        };

        ChartConfig {
            kind: ChartKind::Line,
            data: ChartData {
                labels: days.into_iter().map(|d| d.label).collect(),
                datasets: vec![amount, count],
            },
            options: self.options(),
        }
    }
}

impl DailySalesChart {
    fn options(&self) -> ChartOptions {
        let x = Scale {
            ticks: Ticks {
                max_rotation: Some(0),
                auto_skip: Some(true),
                max_ticks_limit: Some(7),
                ..Ticks::default()
            },
            ..Scale::default()
        };

        let y = Scale::linear("left", &format!("Amount ({})", self.currency));

        let mut y1 = Scale::linear("right", "Transaction Count");
        y1.grid.draw_on_chart_area = Some(false);
        y1.ticks.precision = Some(0);

        ChartOptions::responsive(Legend::top())
            .with_interaction(Interaction::index())
            .with_scale("x", x)
            .with_scale("y", y)
            .with_scale("y1", y1)
    }
}

/// `YYYY-MM-DD` becomes `DD/MM`; anything else is kept.
fn date_label(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [_, month, day] => format!("{day}/{month}"),
        _ => date.to_string(),
    }
}

/// Numbers as-is, numeric strings by prefix, everything else zero.
fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_float_prefix(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("2024-03-05", "05/03")]
    #[case("2024-12-31", "31/12")]
    #[case("2024-03", "2024-03")]
    #[case("yesterday", "yesterday")]
    #[case("a-b-c-d", "a-b-c-d")]
    fn test_date_label(#[case] date: &str, #[case] expected: &str) {
        assert_eq!(date_label(date), expected);
    }

    #[rstest]
    #[case(json!(1500), 1500.0)]
    #[case(json!(12.5), 12.5)]
    #[case(json!("1500.75"), 1500.75)]
    #[case(json!("abc"), 0.0)]
    #[case(json!(null), 0.0)]
    #[case(json!(true), 0.0)]
    fn test_lenient_number(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(lenient_number(Some(&value)), expected);
    }

    #[test]
    fn test_parse_sorts_dates() {
        let chart = DailySalesChart::new();
        let days = chart.parse(
            r#"{"2024-03-02": {"total": 20, "count": 2}, "2024-03-01": {"total": "10", "count": 1}}"#,
        );

        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
        assert_eq!(days[0].total, 10.0);
        assert_eq!(days[1].count, 2.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let chart = DailySalesChart::new();
        let days = chart.parse(r#"{"2024-03-01": {}, "2024-03-02": 7}"#);

        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|d| d.total == 0.0 && d.count == 0.0));
    }

    #[rstest]
    #[case("")]
    #[case("{}")]
    #[case("not json")]
    #[case("[1, 2]")]
    #[case("42")]
    fn test_degrades_to_empty(#[case] input: &str) {
        assert!(DailySalesChart::new().parse(input).is_empty());
    }

    #[test]
    fn test_custom_currency() {
        let chart = DailySalesChart::with_currency("USD");
        let config = chart.render(r#"{"2024-01-01": {"total": 2500}}"#);

        assert_eq!(config.data.datasets[0].label, "Sales Amount (USD)");
        assert_eq!(config.tooltip(0, 0), Some("Sales Amount (USD): USD 2,500"));
    }
}
