//! Dashboard chart widgets.
//!
//! Turns the aggregate JSON the server embeds in the dashboard into chart
//! configurations:
//!
//! - [`DailySalesChart`]: sales amount and transaction count per day (line).
//! - [`ProductsChart`]: quantity sold per product (bar).
//!
//! Rendering is delegated to a [`ChartBackend`](mount::ChartBackend); a
//! [`ChartMount`](mount::ChartMount) keeps one chart instance per host
//! element. Malformed input never fails a render, it produces an empty chart
//! and a `warn!` log.

pub mod config;
pub mod daily_sales;
pub mod error;
pub mod format;
pub mod mount;
pub mod products;

pub use config::{ChartConfig, ChartKind};
pub use daily_sales::{DailySales, DailySalesChart};
pub use error::{ChartError, Result};
pub use mount::{ChartBackend, ChartMount, ChartWidget};
pub use products::{ProductSales, ProductsChart};

use serde_json::Value;
use tracing::warn;

/// Parse widget input; blank input reads as an empty object.
pub(crate) fn parse_input(input: &str) -> Option<Value> {
    if input.trim().is_empty() {
        return Some(Value::Object(Default::default()));
    }
    match serde_json::from_str(input) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Chart data is not valid JSON");
            None
        }
    }
}
