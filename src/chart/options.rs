//! Default chart options and the caller override merge.
use crate::chart::kind::{ChartKind, Orientation};
use serde_json::{Map, Value, json};
use tracing::warn;

/// Tooltip template; placeholders are filled by [`format_tooltip`]
pub const TOOLTIP_TEMPLATE: &str = "{label}: {value} ({category})";

/// Baseline options for a chart: responsive sizing, visible title and legend,
/// a tooltip template, and a zero-based value axis for cartesian kinds.
pub fn default_options(kind: ChartKind, orientation: Orientation, title: &str) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("responsive".into(), json!(true));
    options.insert("maintainAspectRatio".into(), json!(false));
    options.insert(
        "plugins".into(),
        json!({
            "title": {"display": true, "text": title},
            "legend": {"display": true, "position": "top"},
            "tooltip": {"enabled": true, "format": TOOLTIP_TEMPLATE}
        }),
    );
    if kind.has_axes() {
        let value_axis = match orientation {
            Orientation::Vertical => "y",
            Orientation::Horizontal => "x",
        };
        options.insert("scales".into(), json!({ value_axis: {"beginAtZero": true} }));
    }
    if orientation == Orientation::Horizontal {
        options.insert("indexAxis".into(), json!("y"));
    }
    options
}

/// Shallow merge: each top-level key the caller supplies replaces the
/// default wholesale. A partial `scales` drops the default axes.
pub fn merge_options(mut defaults: Map<String, Value>, overrides: Option<&Value>) -> Map<String, Value> {
    match overrides {
        Some(Value::Object(caller)) => {
            for (key, value) in caller {
                defaults.insert(key.clone(), value.clone());
            }
        }
        None | Some(Value::Null) => {}
        Some(other) => warn!("ignoring non-object chart options: {other}"),
    }
    defaults
}

/// Render a tooltip line: `"<label>: <value> (<category>)"`
pub fn format_tooltip(label: &str, value: &str, category: &str) -> String {
    TOOLTIP_TEMPLATE
        .replace("{label}", label)
        .replace("{value}", value)
        .replace("{category}", category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_for_vertical_bar() {
        let options = default_options(ChartKind::Bar, Orientation::Vertical, "Vendas");
        assert_eq!(options["responsive"], json!(true));
        assert_eq!(options["plugins"]["title"]["text"], json!("Vendas"));
        assert_eq!(options["plugins"]["legend"]["display"], json!(true));
        assert_eq!(options["scales"], json!({"y": {"beginAtZero": true}}));
        assert!(options.get("indexAxis").is_none());
    }

    #[test]
    fn test_defaults_for_horizontal_bar() {
        let options = default_options(ChartKind::Bar, Orientation::Horizontal, "t");
        assert_eq!(options["indexAxis"], json!("y"));
        assert_eq!(options["scales"], json!({"x": {"beginAtZero": true}}));
    }

    #[test]
    fn test_pie_has_no_scales() {
        let options = default_options(ChartKind::Pie, Orientation::Vertical, "t");
        assert!(options.get("scales").is_none());
    }

    #[test]
    fn test_merge_is_shallow() {
        let defaults = default_options(ChartKind::Bar, Orientation::Vertical, "t");
        let caller = json!({"scales": {"x": {"stacked": true}}, "animation": false});
        let merged = merge_options(defaults, Some(&caller));
        // the caller's partial scales replaces the whole default, losing y.beginAtZero
        assert_eq!(merged["scales"], json!({"x": {"stacked": true}}));
        assert_eq!(merged["animation"], json!(false));
        assert_eq!(merged["responsive"], json!(true));
    }

    #[test]
    fn test_merge_ignores_non_objects() {
        let defaults = default_options(ChartKind::Line, Orientation::Vertical, "t");
        let expected = defaults.clone();
        assert_eq!(merge_options(defaults, Some(&json!("big"))), expected);
    }

    #[test]
    fn test_format_tooltip() {
        assert_eq!(format_tooltip("Vendas", "50", "B"), "Vendas: 50 (B)");
    }
}
