//! Top products bar chart.
//!
//! Input is a JSON array of products:
//!
//! ```text
//! [{"name": "Sugar 1kg", "sold": 42, "revenue": "8,400"}]
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use possum_core::constants::CURRENCY_SYMBOL;

use crate::config::{
    ChartConfig, ChartData, ChartKind, ChartOptions, ColorSpec, Dataset, Legend, Scale, Ticks,
    with_alpha,
};
use crate::format::{group_thousands, parse_int_prefix};
use crate::mount::ChartWidget;
use crate::parse_input;

/// Bar colors, cycled when there are more products than colors.
pub const PALETTE: [&str; 5] = [
    "rgba(59, 130, 246, 0.7)",
    "rgba(16, 185, 129, 0.7)",
    "rgba(139, 92, 246, 0.7)",
    "rgba(249, 115, 22, 0.7)",
    "rgba(236, 72, 153, 0.7)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub name: String,
    pub sold: f64,
    pub revenue: f64,
}

/// Quantity sold per product, revenue in the tooltip.
///
/// # Examples
///
/// ```
/// use possum_charts::ProductsChart;
/// use possum_charts::mount::ChartWidget;
///
/// let chart = ProductsChart::new();
/// let config = chart.render(r#"[{"name": "Milk", "sold": 12, "revenue": "1,440"}]"#);
///
/// assert_eq!(config.data.labels, vec!["Milk"]);
/// assert_eq!(config.tooltip(0, 0), Some("Quantity: 12 (KSh 1,440)"));
/// ```
#[derive(Debug, Clone)]
pub struct ProductsChart {
    currency: String,
}

impl ProductsChart {
    pub fn new() -> Self {
        Self::with_currency(CURRENCY_SYMBOL)
    }

    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// Read the product rows in input order.
    pub fn parse(&self, input: &str) -> Vec<ProductSales> {
        let value = match parse_input(input) {
            Some(value) => value,
            None => return Vec::new(),
        };

        match value {
            Value::Array(rows) => rows.iter().map(product_row).collect(),
            // Blank input parses as an empty object
            Value::Object(map) if map.is_empty() => Vec::new(),
            _ => {
                warn!("Products data is not a JSON array");
                Vec::new()
            }
        }
    }
}

impl Default for ProductsChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartWidget for ProductsChart {
    fn name(&self) -> &'static str {
        "products"
    }

    fn render(&self, input: &str) -> ChartConfig {
        let products = self.parse(input);
        debug!(products = products.len(), "Rendering products chart");

        let colors: Vec<String> = (0..products.len())
            .map(|i| PALETTE[i % PALETTE.len()].to_string())
            .collect();
        let borders = colors.iter().map(|c| with_alpha(c, "1")).collect();
        let tooltips = products
            .iter()
            .map(|p| {
                format!(
                    "Quantity: {} ({} {})",
                    p.sold,
                    self.currency,
                    group_thousands(p.revenue)
                )
            })
            .collect();

        let sold = Dataset {
            label: "Quantity Sold".to_string(),
            data: products.iter().map(|p| p.sold).collect(),
            border_color: ColorSpec::PerPoint(borders),
            background_color: ColorSpec::PerPoint(colors),
            border_width: 1,
            fill: None,
            tension: None,
            border_dash: None,
            y_axis_id: None,
            tooltips,
        };

        let y = Scale {
            begin_at_zero: Some(true),
            ticks: Ticks {
                precision: Some(0),
                ..Ticks::default()
            },
            ..Scale::default()
        };

        ChartConfig {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: products.into_iter().map(|p| p.name).collect(),
                datasets: vec![sold],
            },
            options: ChartOptions::responsive(Legend::hidden())
                .with_scale("x", Scale::default())
                .with_scale("y", y),
        }
    }
}

fn product_row(row: &Value) -> ProductSales {
    let name = match row.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let sold = match row.get("sold") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };

    let revenue = match row.get("revenue") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_int_prefix(&s.replace(',', "")).map_or(0.0, |v| v as f64),
        _ => 0.0,
    };

    ProductSales {
        name,
        sold,
        revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"name": "Tea", "sold": 3, "revenue": 450}), "Tea", 3.0, 450.0)]
    #[case(json!({"name": "Tea", "sold": "3", "revenue": "1,250.75"}), "Tea", 0.0, 1250.0)]
    #[case(json!({"name": "Tea", "revenue": "n/a"}), "Tea", 0.0, 0.0)]
    #[case(json!({"sold": 1}), "", 1.0, 0.0)]
    #[case(json!({"name": 7, "sold": 1.5}), "7", 1.5, 0.0)]
    #[case(json!("Tea"), "", 0.0, 0.0)]
    fn test_product_row(
        #[case] row: Value,
        #[case] name: &str,
        #[case] sold: f64,
        #[case] revenue: f64,
    ) {
        let product = product_row(&row);
        assert_eq!(product.name, name);
        assert_eq!(product.sold, sold);
        assert_eq!(product.revenue, revenue);
    }

    #[rstest]
    #[case("")]
    #[case("{}")]
    #[case("[]")]
    #[case("{\"name\": \"Tea\"}")]
    #[case("garbage")]
    fn test_degrades_to_empty(#[case] input: &str) {
        assert!(ProductsChart::new().parse(input).is_empty());
    }

    #[test]
    fn test_palette_cycles() {
        let rows: Vec<Value> = (0..7)
            .map(|i| json!({"name": format!("P{i}"), "sold": i}))
            .collect();
        let config = ProductsChart::new().render(&Value::Array(rows).to_string());

        let ColorSpec::PerPoint(colors) = &config.data.datasets[0].background_color else {
            panic!("expected per-bar colors");
        };
        assert_eq!(colors.len(), 7);
        assert_eq!(colors[5], PALETTE[0]);

        let ColorSpec::PerPoint(borders) = &config.data.datasets[0].border_color else {
            panic!("expected per-bar borders");
        };
        assert_eq!(borders[1], "rgba(16, 185, 129, 1)");
    }
}
