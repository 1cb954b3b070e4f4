//! Chart configuration model.
//!
//! The structures serialize to the configuration object understood by
//! Chart.js style renderers (`camelCase` keys, absent options omitted).
//! Tooltip callbacks cannot travel as data, so each dataset carries its
//! tooltip texts precomputed, one per point.

use std::collections::BTreeMap;

use serde::Serialize;

/// Font family used by every chart.
pub const FONT_FAMILY: &str = "\"Sen\", sans-serif";

/// Default font size.
pub const FONT_SIZE: u8 = 12;

/// Light grid line color.
pub const GRID_COLOR: &str = "rgba(0, 0, 0, 0.05)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Complete chart definition handed to a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Whether every dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.data.labels.is_empty() && self.data.datasets.iter().all(|d| d.data.is_empty())
    }

    /// Tooltip text for point `index` of dataset `dataset`.
    pub fn tooltip(&self, dataset: usize, index: usize) -> Option<&str> {
        self.data
            .datasets
            .get(dataset)?
            .tooltips
            .get(index)
            .map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns `ChartError::Json` if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One color for the whole series, or one per bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: ColorSpec,
    pub background_color: ColorSpec,
    pub border_width: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u8>>,

    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,

    /// Tooltip label per point.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,

    pub scales: BTreeMap<String, Scale>,
    pub plugins: Plugins,
}

impl ChartOptions {
    /// Responsive chart filling its container, without scales yet.
    pub fn responsive(legend: Legend) -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            interaction: None,
            scales: BTreeMap::new(),
            plugins: Plugins {
                tooltip: TooltipOptions::default(),
                legend,
            },
        }
    }

    pub fn with_scale(mut self, id: &str, scale: Scale) -> Self {
        self.scales.insert(id.to_string(), scale);
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub mode: String,
    pub intersect: bool,
}

impl Interaction {
    /// Hover shows every dataset at the hovered index.
    pub fn index() -> Self {
        Self {
            mode: "index".to_string(),
            intersect: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub family: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: FONT_FAMILY.to_string(),
            size: None,
            weight: None,
        }
    }
}

impl Font {
    pub fn sized(size: u8) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn bold() -> Self {
        Self {
            weight: Some("bold".to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ScaleTitle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,

    pub ticks: Ticks,
    pub grid: Grid,
}

impl Scale {
    /// Visible linear value axis on `position`, starting at zero.
    pub fn linear(position: &str, title: &str) -> Self {
        Self {
            kind: Some("linear".to_string()),
            display: Some(true),
            position: Some(position.to_string()),
            title: Some(ScaleTitle {
                display: true,
                text: title.to_string(),
                font: Font::bold(),
            }),
            begin_at_zero: Some(true),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleTitle {
    pub display: bool,
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rotation: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_skip: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks_limit: Option<u8>,

    /// Decimal places on tick labels; `Some(0)` for counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,

    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_on_chart_area: Option<bool>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            color: GRID_COLOR.to_string(),
            draw_on_chart_area: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plugins {
    pub tooltip: TooltipOptions,
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub title_font: Font,
    pub body_font: Font,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub display: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LegendLabels>,
}

impl Legend {
    pub fn top() -> Self {
        Self {
            display: true,
            position: Some("top".to_string()),
            labels: Some(LegendLabels {
                font: Font::sized(FONT_SIZE),
            }),
        }
    }

    pub fn hidden() -> Self {
        Self {
            display: false,
            position: None,
            labels: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendLabels {
    pub font: Font,
}

/// Replace the alpha channel of an `rgba(r, g, b, a)` color.
///
/// Colors in any other notation are returned unchanged.
pub fn with_alpha(color: &str, alpha: &str) -> String {
    match (color.strip_suffix(')'), color.rfind(',')) {
        (Some(_), Some(comma)) if color.starts_with("rgba(") => {
            format!("{}, {})", &color[..comma], alpha)
        }
        _ => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_font_serialization() {
        assert_eq!(
            serde_json::to_value(Font::bold()).unwrap(),
            json!({"family": "\"Sen\", sans-serif", "weight": "bold"})
        );
    }

    #[test]
    fn test_scale_omits_unset_options() {
        let value = serde_json::to_value(Scale::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "ticks": {"font": {"family": "\"Sen\", sans-serif"}},
                "grid": {"color": "rgba(0, 0, 0, 0.05)"}
            })
        );
    }

    #[test]
    fn test_linear_scale() {
        let value = serde_json::to_value(Scale::linear("left", "Amount (KSh)")).unwrap();
        assert_eq!(value["type"], "linear");
        assert_eq!(value["position"], "left");
        assert_eq!(value["beginAtZero"], true);
        assert_eq!(value["title"]["text"], "Amount (KSh)");
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(
            with_alpha("rgba(59, 130, 246, 0.7)", "1"),
            "rgba(59, 130, 246, 1)"
        );
        assert_eq!(with_alpha("#3b82f6", "1"), "#3b82f6");
    }

    #[test]
    fn test_hidden_legend() {
        assert_eq!(
            serde_json::to_value(Legend::hidden()).unwrap(),
            json!({"display": false})
        );
    }
}
