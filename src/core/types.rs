use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};
use uuid::Uuid;

/// One record of a result set: column name to scalar value.
///
/// Rows in one result set may carry different key sets; a missing key reads
/// as an empty cell.
pub type Row = Map<String, Value>;

/// Ordered column names; defines display and filter order
pub type ColumnSet = Vec<String>;

/// Unique identifier for a delivered triad (rows, columns, chart descriptor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriadId(Uuid);

impl TriadId {
    /// Create a new unique triad ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for TriadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TriadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TriadId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s).map_err(|e| e.to_string())?))
    }
}

/// Direction of the single active sort
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[strum(to_string = "asc", serialize = "ascending")]
    Asc,
    #[strum(to_string = "desc", serialize = "descending")]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Arrow shown next to the sorted column header
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Column names taken from the keys of the first row, in key order
pub fn columns_from_rows(rows: &[Row]) -> ColumnSet {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Render a number the way a dashboard shows it: integral values drop the
/// fractional part, everything else keeps its shortest representation.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Coerce a cell to its display string. Absent and null cells are empty.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Display string of a row's cell, empty when the row lacks the column
pub fn cell_display(row: &Row, column: &str) -> String {
    display_value(row.get(column))
}

/// Numeric reading of a cell: JSON numbers, and strings that parse as numbers
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Three-way comparison of two raw cells.
///
/// Numbers compare numerically, strings lexicographically, booleans
/// false-before-true. Any other pairing (including absent cells) compares
/// the display strings.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => display_value(a).cmp(&display_value(b)),
    }
}
