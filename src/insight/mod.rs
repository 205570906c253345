//! Insight engine: heuristic narrative about the data behind a chart.
//!
//! The statements produced here are descriptive, not significance tests. The
//! thresholds live in [`InsightConfig`] and come from the `insights` config
//! section.
pub mod stats;

pub use stats::SeriesStats;

use crate::chart::{ChartKind, Orientation, RenderSpec};
use crate::core::types::{Row, format_number};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// `max` above `mean * max_outlier_factor` is flagged
    #[serde(default = "default_max_outlier_factor")]
    pub max_outlier_factor: f64,
    /// `min` below `mean * min_outlier_factor` is flagged
    #[serde(default = "default_min_outlier_factor")]
    pub min_outlier_factor: f64,
    /// Fewer distinct values than this share of all values is flagged
    #[serde(default = "default_repetition_ratio")]
    pub repetition_ratio: f64,
}

fn default_max_outlier_factor() -> f64 {
    1.5
}

fn default_min_outlier_factor() -> f64 {
    0.5
}

fn default_repetition_ratio() -> f64 {
    0.3
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_outlier_factor: default_max_outlier_factor(),
            min_outlier_factor: default_min_outlier_factor(),
            repetition_ratio: default_repetition_ratio(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Summary,
    MaxOutlier,
    MinOutlier,
    Repetition,
    ChartExplanation,
}

/// One narrative statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Statistics of the primary series, `None` when there is nothing to describe
    pub fn series_stats(&self, rows: &[Row], spec: &RenderSpec) -> Option<SeriesStats> {
        if rows.is_empty() || !spec.has_categories() {
            return None;
        }
        let series = spec.primary_dataset()?;
        SeriesStats::compute(rows.len(), &spec.data.labels, &series.data)
    }

    /// Narrative for `rows` as drawn by `spec`.
    ///
    /// `None` for empty rows, a chart without category labels, or a primary
    /// series with no numeric point. Otherwise the summary comes first, then
    /// any heuristic flags, then the chart explanation.
    pub fn interpret(&self, rows: &[Row], spec: &RenderSpec) -> Option<Vec<Insight>> {
        let stats = self.series_stats(rows, spec)?;
        let series_label = spec
            .primary_dataset()
            .map(|d| d.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or("value");
        let mean = stats.mean_display();
        let max = format_number(stats.max);
        let min = format_number(stats.min);

        let mut insights = vec![Insight::new(
            InsightKind::Summary,
            "Overview",
            format!(
                "{} records across {} categories. {series_label} ranges from {min} ({}) to {max} ({}), averaging {mean}.",
                stats.row_count, stats.category_count, stats.min_label, stats.max_label
            ),
        )];

        // a flat series has no outliers, even when the mean is negative
        if !stats.is_flat() {
            if stats.max > stats.mean * self.config.max_outlier_factor {
                insights.push(Insight::new(
                    InsightKind::MaxOutlier,
                    "Peak well above average",
                    format!(
                        "{} stands out at {max}, well above the average of {mean}.",
                        stats.max_label
                    ),
                ));
            }
            if stats.min < stats.mean * self.config.min_outlier_factor {
                insights.push(Insight::new(
                    InsightKind::MinOutlier,
                    "Low point well below average",
                    format!(
                        "{} sits at {min}, well below the average of {mean}.",
                        stats.min_label
                    ),
                ));
            }
        }

        if (stats.distinct_values as f64) < stats.value_count as f64 * self.config.repetition_ratio {
            insights.push(Insight::new(
                InsightKind::Repetition,
                "Repeated values",
                format!(
                    "Only {} distinct values among {} points; values repeat or cluster.",
                    stats.distinct_values, stats.value_count
                ),
            ));
        }

        if let Some(explanation) = explain(spec.kind, spec.orientation, series_label, &stats) {
            insights.push(explanation);
        }

        debug!(
            insights = insights.len(),
            rows = rows.len(),
            kind = %spec.kind,
            "insights derived"
        );
        Some(insights)
    }
}

/// Chart-specific reading guide; only bar charts carry one for now
fn explain(
    kind: ChartKind,
    orientation: Orientation,
    series_label: &str,
    stats: &SeriesStats,
) -> Option<Insight> {
    let extent = match orientation {
        Orientation::Vertical => "height",
        Orientation::Horizontal => "length",
    };
    match kind {
        ChartKind::Bar => Some(Insight::new(
            InsightKind::ChartExplanation,
            "Reading this chart",
            format!(
                "This bar chart shows {series_label} per category: the {extent} of each bar is the {series_label} of its category. {} has the highest value ({}) and {} the lowest ({}).",
                stats.max_label,
                format_number(stats.max),
                stats.min_label,
                format_number(stats.min)
            ),
        )),
        ChartKind::Line | ChartKind::Pie | ChartKind::Doughnut => None,
    }
}

/// [`InsightEngine::interpret`] with the default thresholds
pub fn interpret(rows: &[Row], spec: &RenderSpec) -> Option<Vec<Insight>> {
    InsightEngine::new().interpret(rows, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::normalize;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn rows(values: &[(&str, f64)]) -> Vec<Row> {
        values
            .iter()
            .map(|(cat, v)| serde_json::from_value(json!({"cat": cat, "v": v})).unwrap())
            .collect()
    }

    fn spec_for(kind: &str, values: &[(&str, f64)]) -> RenderSpec {
        let labels: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
        let data: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        let descriptor: Value = json!({
            "type": kind,
            "data": {"labels": labels, "datasets": [{"label": "v", "data": data}]}
        });
        normalize(&descriptor, None).render_spec().cloned().unwrap()
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_both_outliers_fire() {
        let data = [("A", 10.0), ("B", 50.0), ("C", 12.0)];
        let insights = interpret(&rows(&data), &spec_for("bar_chart", &data)).unwrap();
        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::Summary,
                InsightKind::MaxOutlier,
                InsightKind::MinOutlier,
                InsightKind::ChartExplanation
            ]
        );
        assert_eq!(
            insights[0].message,
            "3 records across 3 categories. v ranges from 10 (A) to 50 (B), averaging 24.0."
        );
        assert!(insights[1].message.starts_with("B stands out at 50"));
        assert!(insights[2].message.starts_with("A sits at 10"));
        assert!(insights[3].message.contains("B has the highest value (50)"));
        assert!(insights[3].message.contains("A the lowest (10)"));
    }

    #[test]
    fn test_horizontal_bars_are_read_by_length() {
        let data = [("A", 10.0), ("B", 50.0), ("C", 12.0)];
        let horizontal = spec_for("horizontal_bar", &data);
        assert_eq!(horizontal.orientation, Orientation::Horizontal);
        let insights = interpret(&rows(&data), &horizontal).unwrap();
        let explanation = insights.last().unwrap();
        assert_eq!(explanation.kind, InsightKind::ChartExplanation);
        assert!(explanation.message.contains("the length of each bar"));

        let vertical = interpret(&rows(&data), &spec_for("bar_chart", &data)).unwrap();
        assert!(vertical.last().unwrap().message.contains("the height of each bar"));
    }

    #[test]
    fn test_empty_rows_give_nothing() {
        let data = [("A", 1.0)];
        assert_eq!(interpret(&[], &spec_for("bar", &data)), None);
    }

    #[test]
    fn test_no_labels_give_nothing() {
        let descriptor = json!({"data": {"datasets": [{"label": "v", "data": [1, 2]}]}});
        let spec = normalize(&descriptor, None).render_spec().cloned().unwrap();
        assert_eq!(interpret(&rows(&[("A", 1.0)]), &spec), None);
    }

    #[test]
    fn test_no_numeric_series_gives_nothing() {
        let descriptor = json!({"data": {"labels": ["a"], "datasets": [{"label": "v", "data": ["x"]}]}});
        let spec = normalize(&descriptor, None).render_spec().cloned().unwrap();
        assert_eq!(interpret(&rows(&[("a", 1.0)]), &spec), None);
        let no_sets = normalize(&json!({"data": {"labels": ["a"]}}), None);
        assert_eq!(interpret(&rows(&[("a", 1.0)]), no_sets.render_spec().unwrap()), None);
    }

    #[test]
    fn test_all_equal_values_have_no_outliers() {
        let data = [("A", 5.0), ("B", 5.0), ("C", 5.0)];
        let insights = interpret(&rows(&data), &spec_for("line", &data)).unwrap();
        assert_eq!(kinds(&insights), vec![InsightKind::Summary]);
    }

    #[test]
    fn test_repetition_flag() {
        let data: Vec<(&str, f64)> = (0..10)
            .map(|i| (["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"][i], if i == 0 { 2.0 } else { 1.0 }))
            .collect();
        let insights = interpret(&rows(&data), &spec_for("pie", &data)).unwrap();
        assert!(kinds(&insights).contains(&InsightKind::Repetition));
        assert!(!kinds(&insights).contains(&InsightKind::ChartExplanation));
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let data = [("A", 10.0), ("B", 50.0), ("C", 12.0)];
        let engine = InsightEngine::with_config(InsightConfig {
            max_outlier_factor: 3.0,
            min_outlier_factor: 0.1,
            repetition_ratio: 0.0,
        });
        let insights = engine.interpret(&rows(&data), &spec_for("line", &data)).unwrap();
        assert_eq!(kinds(&insights), vec![InsightKind::Summary]);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: InsightConfig = serde_json::from_value(json!({"repetition_ratio": 0.5})).unwrap();
        assert_eq!(config.max_outlier_factor, 1.5);
        assert_eq!(config.min_outlier_factor, 0.5);
        assert_eq!(config.repetition_ratio, 0.5);
    }
}
