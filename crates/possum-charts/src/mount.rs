//! Chart lifecycle on a host element.
//!
//! A [`ChartMount`] pairs a widget with the backend that draws on the host
//! canvas. Every render destroys the chart drawn before it and draws a new
//! one from the current data, mirroring how the host re-renders the element
//! on each data update.
//!
//! # Examples
//!
//! ```
//! use possum_charts::config::ChartConfig;
//! use possum_charts::mount::{ChartBackend, ChartMount};
//! use possum_charts::{DailySalesChart, Result};
//!
//! #[derive(Default)]
//! struct Canvas {
//!     drawn: Vec<usize>,
//! }
//!
//! impl ChartBackend for Canvas {
//!     type Chart = usize;
//!
//!     fn has_canvas(&self) -> bool {
//!         true
//!     }
//!
//!     fn draw(&mut self, config: &ChartConfig) -> Result<usize> {
//!         self.drawn.push(config.data.labels.len());
//!         Ok(self.drawn.len())
//!     }
//!
//!     fn destroy(&mut self, _chart: usize) {}
//! }
//!
//! let mut mount = ChartMount::new(DailySalesChart::new(), Canvas::default());
//! mount.render(r#"{"2024-03-01": {"total": 10, "count": 1}}"#).unwrap();
//! mount.render("{}").unwrap();
//! assert_eq!(mount.backend().drawn, vec![1, 0]);
//! ```

use tracing::{debug, error};

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};

/// Turns widget input into a chart configuration.
pub trait ChartWidget {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Build the configuration for `input`.
    ///
    /// Never fails: malformed input yields an empty chart.
    fn render(&self, input: &str) -> ChartConfig;
}

/// Drawing surface owned by the host.
pub trait ChartBackend {
    /// Handle to one drawn chart instance.
    type Chart;

    /// Whether the host element has a canvas to draw on.
    fn has_canvas(&self) -> bool;

    /// Draw a new chart instance.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::Backend` if the renderer rejects the configuration.
    fn draw(&mut self, config: &ChartConfig) -> Result<Self::Chart>;

    /// Tear down a chart instance.
    fn destroy(&mut self, chart: Self::Chart);
}

/// A widget mounted on a host element.
pub struct ChartMount<W, B: ChartBackend> {
    widget: W,
    backend: B,
    current: Option<B::Chart>,
}

impl<W: ChartWidget, B: ChartBackend> ChartMount<W, B> {
    pub fn new(widget: W, backend: B) -> Self {
        Self {
            widget,
            backend,
            current: None,
        }
    }

    /// Draw the widget for `input`, destroying the previous instance first.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::MissingCanvas` when the host element has no
    /// canvas (nothing is drawn), or the backend's draw error.
    pub fn render(&mut self, input: &str) -> Result<()> {
        if let Some(previous) = self.current.take() {
            self.backend.destroy(previous);
        }

        if !self.backend.has_canvas() {
            error!(widget = self.widget.name(), "Canvas element not found");
            return Err(ChartError::MissingCanvas);
        }

        let config = self.widget.render(input);
        debug!(
            widget = self.widget.name(),
            points = config.data.labels.len(),
            "Drawing chart"
        );
        self.current = Some(self.backend.draw(&config)?);
        Ok(())
    }

    /// Destroy the drawn instance, if any.
    pub fn unmount(&mut self) {
        if let Some(chart) = self.current.take() {
            self.backend.destroy(chart);
        }
    }

    /// Whether a chart instance is currently drawn.
    pub fn is_drawn(&self) -> bool {
        self.current.is_some()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<W, B: ChartBackend> Drop for ChartMount<W, B> {
    fn drop(&mut self) {
        if let Some(chart) = self.current.take() {
            self.backend.destroy(chart);
        }
    }
}
