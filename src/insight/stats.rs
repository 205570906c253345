//! Descriptive statistics over one numeric series and its category labels.
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Rows the series was drawn from
    pub row_count: usize,
    /// Distinct category labels
    pub category_count: usize,
    /// Numeric points in the series (gaps excluded)
    pub value_count: usize,
    /// Distinct numeric values
    pub distinct_values: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub max_label: String,
    pub min_label: String,
}

impl SeriesStats {
    /// Compute over `values`, reading each point's category from `labels` by
    /// position. `None` when the series has no numeric point.
    ///
    /// Ties resolve to the first occurrence. A point past the end of
    /// `labels` is named `item N` (1-based).
    pub fn compute(row_count: usize, labels: &[String], values: &[Option<f64>]) -> Option<Self> {
        let mut n: usize = 0;
        let mut mean: f64 = 0.0;
        let mut min: Option<(usize, f64)> = None;
        let mut max: Option<(usize, f64)> = None;
        let mut distinct: HashSet<u64> = HashSet::new();

        for (idx, x) in values.iter().enumerate() {
            let Some(x) = *x else { continue };
            n += 1;
            // Welford running mean
            mean += (x - mean) / (n as f64);
            // -0.0 and 0.0 are the same value
            distinct.insert(if x == 0.0 { 0u64 } else { x.to_bits() });
            if min.is_none_or(|(_, m)| x < m) {
                min = Some((idx, x));
            }
            if max.is_none_or(|(_, m)| x > m) {
                max = Some((idx, x));
            }
        }

        let (min_idx, min) = min?;
        let (max_idx, max) = max?;
        let category_count = labels.iter().collect::<HashSet<_>>().len();

        Some(Self {
            row_count,
            category_count,
            value_count: n,
            distinct_values: distinct.len(),
            min,
            max,
            mean,
            max_label: label_at(labels, max_idx),
            min_label: label_at(labels, min_idx),
        })
    }

    /// Mean rounded to one decimal, as displayed
    pub fn mean_display(&self) -> String {
        format!("{:.1}", self.mean)
    }

    /// Whether every point holds the same value
    pub fn is_flat(&self) -> bool {
        self.max <= self.min
    }
}

fn label_at(labels: &[String], idx: usize) -> String {
    labels
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("item {}", idx + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_basic_series() {
        let stats =
            SeriesStats::compute(3, &labels(&["A", "B", "C"]), &[Some(10.0), Some(50.0), Some(12.0)])
                .unwrap();
        assert_eq!(stats.mean, 24.0);
        assert_eq!(stats.mean_display(), "24.0");
        assert_eq!((stats.max, stats.max_label.as_str()), (50.0, "B"));
        assert_eq!((stats.min, stats.min_label.as_str()), (10.0, "A"));
        assert_eq!(stats.category_count, 3);
        assert_eq!(stats.distinct_values, 3);
    }

    #[test]
    fn test_single_value() {
        let stats = SeriesStats::compute(1, &labels(&["só"]), &[Some(7.0)]).unwrap();
        assert_eq!((stats.min, stats.max, stats.mean), (7.0, 7.0, 7.0));
        assert!(stats.is_flat());
    }

    #[test]
    fn test_duplicate_labels_first_occurrence_wins() {
        let stats = SeriesStats::compute(
            4,
            &labels(&["X", "Y", "X", "Z"]),
            &[Some(5.0), Some(1.0), Some(5.0), Some(1.0)],
        )
        .unwrap();
        assert_eq!(stats.max_label, "X");
        assert_eq!(stats.min_label, "Y");
        assert_eq!(stats.category_count, 3);
        assert_eq!(stats.distinct_values, 2);
    }

    #[test]
    fn test_gaps_are_skipped_and_unlabeled_points_named() {
        let stats = SeriesStats::compute(3, &labels(&["a"]), &[None, Some(2.0), Some(4.0)]).unwrap();
        assert_eq!(stats.value_count, 2);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min_label, "item 2");
        assert_eq!(stats.max_label, "item 3");
    }

    #[test]
    fn test_no_numeric_points() {
        assert_eq!(SeriesStats::compute(2, &labels(&["a", "b"]), &[None, None]), None);
        assert_eq!(SeriesStats::compute(0, &[], &[]), None);
    }
}
