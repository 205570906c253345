//! Chart adapter: turns a loosely-typed `{type, data, options}` descriptor
//! into a [`RenderSpec`] a drawing component can consume.
//!
//! [`normalize`] never fails. A descriptor without a usable `data` object
//! becomes a [`DiagnosticPlaceholder`] holding the raw input, and missing
//! labels or datasets degrade to empty sequences.
pub mod kind;
pub mod options;

pub use kind::{ChartKind, Orientation};
pub use options::{TOOLTIP_TEMPLATE, default_options, format_tooltip, merge_options};

use crate::core::types::{display_value, format_number, numeric_value};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const DEFAULT_CHART_TITLE: &str = "Chart";

/// One series of a chart. Styling keys the descriptor carried alongside
/// `label` and `data` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    /// Non-numeric points are kept as gaps so positions line up with labels
    pub data: Vec<Option<f64>>,
    #[serde(flatten)]
    pub style: Map<String, Value>,
}

impl ChartDataset {
    /// Numeric value at `index`, `None` for gaps and positions past the end
    pub fn point(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Normalized, safe-to-draw chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    pub kind: ChartKind,
    pub orientation: Orientation,
    pub data: ChartData,
    pub options: Map<String, Value>,
}

impl RenderSpec {
    /// The first dataset, which drives the narrative
    pub fn primary_dataset(&self) -> Option<&ChartDataset> {
        self.data.datasets.first()
    }

    pub fn has_categories(&self) -> bool {
        !self.data.labels.is_empty()
    }

    pub fn title(&self) -> &str {
        self.options
            .get("plugins")
            .and_then(|p| p.pointer("/title/text"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CHART_TITLE)
    }

    /// Tooltip line for a point, `None` when the point or its category is missing
    pub fn tooltip_text(&self, dataset: usize, index: usize) -> Option<String> {
        let set = self.data.datasets.get(dataset)?;
        let category = self.data.labels.get(index)?;
        let value = set.point(index)?;
        Some(format_tooltip(&set.label, &format_number(value), category))
    }
}

/// Shown in place of a chart whose descriptor could not be used
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticPlaceholder {
    pub reason: String,
    /// The descriptor exactly as received
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChartOutcome {
    Render(RenderSpec),
    Diagnostic(DiagnosticPlaceholder),
}

impl ChartOutcome {
    pub fn render_spec(&self) -> Option<&RenderSpec> {
        match self {
            Self::Render(spec) => Some(spec),
            Self::Diagnostic(_) => None,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }
}

fn diagnostic(reason: &str, raw: &Value) -> ChartOutcome {
    warn!("chart descriptor unusable: {reason}");
    ChartOutcome::Diagnostic(DiagnosticPlaceholder {
        reason: reason.to_string(),
        raw: raw.clone(),
    })
}

/// Normalize a chart descriptor. `default_title` is used for the title
/// plugin, falling back to "Chart".
pub fn normalize(descriptor: &Value, default_title: Option<&str>) -> ChartOutcome {
    let Some(object) = descriptor.as_object() else {
        return diagnostic("chart descriptor is not an object", descriptor);
    };
    let data = match object.get("data") {
        None | Some(Value::Null) => return diagnostic("chart descriptor has no data", descriptor),
        Some(Value::Object(data)) => data,
        Some(_) => return diagnostic("chart data is not an object", descriptor),
    };

    let type_name = object.get("type").and_then(Value::as_str);
    let (kind, orientation) = ChartKind::resolve(type_name);
    let title = default_title.unwrap_or(DEFAULT_CHART_TITLE);

    let processed = ChartData {
        labels: labels_of(data.get("labels")),
        datasets: datasets_of(data.get("datasets")),
    };
    let options = merge_options(default_options(kind, orientation, title), object.get("options"));

    debug!(
        requested = type_name.unwrap_or(""),
        %kind,
        %orientation,
        labels = processed.labels.len(),
        datasets = processed.datasets.len(),
        "chart descriptor normalized"
    );

    ChartOutcome::Render(RenderSpec {
        kind,
        orientation,
        data: processed,
        options,
    })
}

fn labels_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| display_value(Some(v))).collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            warn!("chart labels are not a sequence: {other}");
            Vec::new()
        }
    }
}

fn datasets_of(value: Option<&Value>) -> Vec<ChartDataset> {
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Vec::new(),
        Some(other) => {
            warn!("chart datasets are not a sequence: {other}");
            return Vec::new();
        }
    };
    items
        .iter()
        .filter_map(|item| {
            let Some(fields) = item.as_object() else {
                warn!("skipping chart dataset that is not an object: {item}");
                return None;
            };
            let data = match fields.get("data") {
                Some(Value::Array(points)) => points.iter().map(numeric_value).collect(),
                _ => Vec::new(),
            };
            let style = fields
                .iter()
                .filter(|(k, _)| k.as_str() != "label" && k.as_str() != "data")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Some(ChartDataset {
                label: display_value(fields.get("label")),
                data,
                style,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sales_descriptor(kind: &str) -> Value {
        json!({
            "type": kind,
            "data": {
                "labels": ["Norte", "Sul"],
                "datasets": [{"label": "Vendas", "data": [10, 20.5], "backgroundColor": "#36a2eb"}]
            }
        })
    }

    #[test]
    fn test_unknown_kind_renders_as_bar() {
        let descriptor = json!({
            "type": "unknown_kind",
            "data": {"labels": ["a", "b"], "datasets": [{"label": "x", "data": [1, 2]}]}
        });
        let outcome = normalize(&descriptor, None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.data.labels, vec!["a", "b"]);
        assert_eq!(spec.data.datasets[0].data, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_missing_data_is_diagnostic() {
        let descriptor = json!({});
        match normalize(&descriptor, Some("t")) {
            ChartOutcome::Diagnostic(d) => assert_eq!(d.raw, descriptor),
            other => panic!("expected diagnostic, got {other:?}"),
        }
        assert!(normalize(&Value::Null, None).is_diagnostic());
        assert!(normalize(&json!("bar"), None).is_diagnostic());
        assert!(normalize(&json!({"data": [1, 2]}), None).is_diagnostic());
    }

    #[test]
    fn test_missing_labels_and_datasets_degrade_to_empty() {
        let outcome = normalize(&json!({"type": "line", "data": {}}), None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.data, ChartData::default());

        let outcome = normalize(&json!({"data": {"labels": "a,b", "datasets": 3}}), None);
        assert_eq!(outcome.render_spec().unwrap().data, ChartData::default());
    }

    #[test]
    fn test_style_keys_pass_through() {
        let outcome = normalize(&sales_descriptor("bar_chart"), None);
        let set = outcome.render_spec().unwrap().primary_dataset().unwrap().clone();
        assert_eq!(set.label, "Vendas");
        assert_eq!(set.style.get("backgroundColor"), Some(&json!("#36a2eb")));
        let serialized = serde_json::to_value(&set).unwrap();
        assert_eq!(serialized["backgroundColor"], json!("#36a2eb"));
    }

    #[test]
    fn test_non_numeric_points_become_gaps() {
        let descriptor = json!({
            "data": {"labels": ["a", "b", "c"], "datasets": [{"label": "x", "data": [1, "n/a", "3"]}]}
        });
        let outcome = normalize(&descriptor, None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.data.datasets[0].data, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_title_default_and_override() {
        let outcome = normalize(&sales_descriptor("pie"), None);
        assert_eq!(outcome.render_spec().unwrap().title(), "Chart");
        let outcome = normalize(&sales_descriptor("pie"), Some("Vendas por região"));
        assert_eq!(outcome.render_spec().unwrap().title(), "Vendas por região");
    }

    #[test]
    fn test_caller_options_override_shallowly() {
        let mut descriptor = sales_descriptor("bar");
        descriptor["options"] = json!({"scales": {"x": {"stacked": true}}});
        let outcome = normalize(&descriptor, None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.options["scales"], json!({"x": {"stacked": true}}));
        assert_eq!(spec.options["maintainAspectRatio"], json!(false));
    }

    #[test]
    fn test_horizontal_bar_inverts_axis() {
        let outcome = normalize(&sales_descriptor("horizontal_bar"), None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.orientation, Orientation::Horizontal);
        assert_eq!(spec.options["indexAxis"], json!("y"));
    }

    #[test]
    fn test_tooltip_text() {
        let outcome = normalize(&sales_descriptor("bar"), None);
        let spec = outcome.render_spec().unwrap();
        assert_eq!(spec.tooltip_text(0, 1).as_deref(), Some("Vendas: 20.5 (Sul)"));
        assert_eq!(spec.tooltip_text(0, 5), None);
        assert_eq!(spec.tooltip_text(1, 0), None);
    }
}
