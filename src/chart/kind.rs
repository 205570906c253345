use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Drawable chart kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

/// Which axis carries the categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Categories along x, values along y
    #[default]
    Vertical,
    /// Categories along y, values along x
    Horizontal,
}

impl ChartKind {
    /// Resolve a descriptor `type` string. Total: unknown or absent names
    /// fall back to a vertical bar chart.
    pub fn resolve(type_name: Option<&str>) -> (Self, Orientation) {
        let name = type_name.map(|t| t.trim().to_ascii_lowercase()).unwrap_or_default();
        match name.as_str() {
            "bar_chart" | "bar" => (Self::Bar, Orientation::Vertical),
            "horizontal_bar" => (Self::Bar, Orientation::Horizontal),
            "line_chart" | "line" => (Self::Line, Orientation::Vertical),
            "pie_chart" | "pie" => (Self::Pie, Orientation::Vertical),
            "doughnut" => (Self::Doughnut, Orientation::Vertical),
            _ => (Self::Bar, Orientation::Vertical),
        }
    }

    /// Kinds drawn on cartesian axes
    pub fn has_axes(self) -> bool {
        matches!(self, Self::Bar | Self::Line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_dispatch_table() {
        let cases = [
            ("bar_chart", ChartKind::Bar, Orientation::Vertical),
            ("bar", ChartKind::Bar, Orientation::Vertical),
            ("line_chart", ChartKind::Line, Orientation::Vertical),
            ("line", ChartKind::Line, Orientation::Vertical),
            ("pie_chart", ChartKind::Pie, Orientation::Vertical),
            ("pie", ChartKind::Pie, Orientation::Vertical),
            ("doughnut", ChartKind::Doughnut, Orientation::Vertical),
            ("horizontal_bar", ChartKind::Bar, Orientation::Horizontal),
        ];
        for (name, kind, orientation) in cases {
            assert_eq!(ChartKind::resolve(Some(name)), (kind, orientation), "{name}");
        }
    }

    #[test]
    fn test_unknown_falls_back_to_bar() {
        assert_eq!(ChartKind::resolve(Some("unknown_kind")), (ChartKind::Bar, Orientation::Vertical));
        assert_eq!(ChartKind::resolve(Some("")), (ChartKind::Bar, Orientation::Vertical));
        assert_eq!(ChartKind::resolve(None), (ChartKind::Bar, Orientation::Vertical));
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = ChartKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["bar", "line", "pie", "doughnut"]);
        assert!(ChartKind::Line.has_axes());
        assert!(!ChartKind::Doughnut.has_axes());
    }
}
