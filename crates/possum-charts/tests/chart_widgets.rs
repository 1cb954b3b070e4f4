//! Integration tests for the chart widgets and their mount lifecycle.

use possum_charts::config::ChartConfig;
use possum_charts::mount::{ChartBackend, ChartMount, ChartWidget};
use possum_charts::{ChartError, ChartKind, DailySalesChart, ProductsChart, Result};
use serde_json::{Value, json};

/// Backend recording every draw and destroy.
#[derive(Debug, Default)]
struct RecordingCanvas {
    missing: bool,
    reject: bool,
    next_id: u32,
    live: Vec<u32>,
    destroyed: Vec<u32>,
    configs: Vec<ChartConfig>,
}

impl ChartBackend for RecordingCanvas {
    type Chart = u32;

    fn has_canvas(&self) -> bool {
        !self.missing
    }

    fn draw(&mut self, config: &ChartConfig) -> Result<u32> {
        if self.reject {
            return Err(ChartError::backend("context lost"));
        }
        self.next_id += 1;
        self.live.push(self.next_id);
        self.configs.push(config.clone());
        Ok(self.next_id)
    }

    fn destroy(&mut self, chart: u32) {
        self.live.retain(|id| *id != chart);
        self.destroyed.push(chart);
    }
}

fn to_value(config: &ChartConfig) -> Value {
    serde_json::from_str(&config.to_json().unwrap()).unwrap()
}

#[test]
fn test_daily_sales_config_shape() {
    let config = DailySalesChart::new().render(
        r#"{
            "2024-03-02": {"total": "1500.50", "count": 3},
            "2024-03-01": {"total": 1234, "count": 2}
        }"#,
    );
    let value = to_value(&config);

    assert_eq!(value["type"], "line");
    assert_eq!(value["data"]["labels"], json!(["01/03", "02/03"]));

    let amount = &value["data"]["datasets"][0];
    assert_eq!(amount["label"], "Sales Amount (KSh)");
    assert_eq!(amount["data"], json!([1234.0, 1500.5]));
    assert_eq!(amount["borderColor"], "rgba(59, 130, 246, 1)");
    assert_eq!(amount["backgroundColor"], "rgba(59, 130, 246, 0.1)");
    assert_eq!(amount["fill"], true);
    assert_eq!(amount["tension"], 0.4);
    assert_eq!(amount["yAxisID"], "y");

    let count = &value["data"]["datasets"][1];
    assert_eq!(count["label"], "Transaction Count");
    assert_eq!(count["data"], json!([2.0, 3.0]));
    assert_eq!(count["borderDash"], json!([5, 5]));
    assert_eq!(count["yAxisID"], "y1");
    assert!(count.get("fill").is_none());

    let options = &value["options"];
    assert_eq!(options["responsive"], true);
    assert_eq!(options["maintainAspectRatio"], false);
    assert_eq!(options["interaction"], json!({"mode": "index", "intersect": false}));
    assert_eq!(options["scales"]["x"]["ticks"]["maxTicksLimit"], 7);
    assert_eq!(options["scales"]["y"]["title"]["text"], "Amount (KSh)");
    assert_eq!(options["scales"]["y1"]["position"], "right");
    assert_eq!(options["scales"]["y1"]["grid"]["drawOnChartArea"], false);
    assert_eq!(options["scales"]["y1"]["ticks"]["precision"], 0);
    assert_eq!(options["plugins"]["legend"]["position"], "top");
    assert_eq!(options["plugins"]["legend"]["labels"]["font"]["size"], 12);

    assert_eq!(config.tooltip(0, 1), Some("Sales Amount (KSh): KSh 1,500.5"));
    assert_eq!(config.tooltip(1, 0), Some("Transaction Count: 2"));
}

#[test]
fn test_products_config_shape() {
    let config = ProductsChart::new().render(
        r#"[
            {"name": "Sugar 1kg", "sold": 42, "revenue": "8,400"},
            {"name": "Milk 500ml", "sold": 30, "revenue": 1800}
        ]"#,
    );
    let value = to_value(&config);

    assert_eq!(config.kind, ChartKind::Bar);
    assert_eq!(value["data"]["labels"], json!(["Sugar 1kg", "Milk 500ml"]));

    let sold = &value["data"]["datasets"][0];
    assert_eq!(sold["label"], "Quantity Sold");
    assert_eq!(sold["data"], json!([42.0, 30.0]));
    assert_eq!(
        sold["backgroundColor"],
        json!(["rgba(59, 130, 246, 0.7)", "rgba(16, 185, 129, 0.7)"])
    );
    assert_eq!(
        sold["borderColor"],
        json!(["rgba(59, 130, 246, 1)", "rgba(16, 185, 129, 1)"])
    );
    assert_eq!(sold["borderWidth"], 1);

    assert_eq!(value["options"]["plugins"]["legend"], json!({"display": false}));
    assert_eq!(value["options"]["scales"]["y"]["beginAtZero"], true);

    assert_eq!(config.tooltip(0, 0), Some("Quantity: 42 (KSh 8,400)"));
    assert_eq!(config.tooltip(0, 1), Some("Quantity: 30 (KSh 1,800)"));
}

#[test]
fn test_empty_object_renders_empty_series() {
    let daily = DailySalesChart::new().render("{}");
    assert!(daily.is_empty());
    assert_eq!(daily.data.datasets.len(), 2);

    let products = ProductsChart::new().render("{}");
    assert!(products.is_empty());
    assert_eq!(products.data.datasets.len(), 1);
}

#[test]
fn test_non_json_renders_same_fallback() {
    let daily = DailySalesChart::new();
    assert_eq!(daily.render("not json at all"), daily.render("{}"));

    let products = ProductsChart::new();
    assert_eq!(products.render("<html>"), products.render("[]"));
}

#[test]
fn test_render_replaces_previous_instance() {
    let mut mount = ChartMount::new(DailySalesChart::new(), RecordingCanvas::default());

    mount.render(r#"{"2024-03-01": {"total": 10}}"#).unwrap();
    mount.render(r#"{"2024-03-01": {"total": 10}, "2024-03-02": {"total": 5}}"#).unwrap();

    let canvas = mount.backend();
    assert_eq!(canvas.live, vec![2]);
    assert_eq!(canvas.destroyed, vec![1]);
    assert_eq!(canvas.configs[1].data.labels.len(), 2);
}

#[test]
fn test_unmount_destroys_instance() {
    let mut mount = ChartMount::new(ProductsChart::new(), RecordingCanvas::default());
    mount.render("[]").unwrap();
    assert!(mount.is_drawn());

    mount.unmount();
    assert!(!mount.is_drawn());
    assert!(mount.backend().live.is_empty());

    // Unmounting twice is harmless
    mount.unmount();
    assert_eq!(mount.backend().destroyed, vec![1]);
}

#[test]
fn test_missing_canvas_draws_nothing() {
    let canvas = RecordingCanvas {
        missing: true,
        ..RecordingCanvas::default()
    };
    let mut mount = ChartMount::new(DailySalesChart::new(), canvas);

    assert!(matches!(mount.render("{}"), Err(ChartError::MissingCanvas)));
    assert!(!mount.is_drawn());
    assert!(mount.backend().configs.is_empty());
}

#[test]
fn test_backend_failure_leaves_nothing_drawn() {
    let canvas = RecordingCanvas {
        reject: true,
        ..RecordingCanvas::default()
    };
    let mut mount = ChartMount::new(ProductsChart::new(), canvas);

    assert!(matches!(mount.render("[]"), Err(ChartError::Backend(_))));
    assert!(!mount.is_drawn());
}
