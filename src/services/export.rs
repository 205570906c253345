//! Export of table rows as CSV or JSON.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use tracing::info;

use crate::core::types::{Row, cell_display};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Format named by the file extension. Unknown or missing extensions
    /// export as CSV.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or(Self::Csv)
    }

    /// `path` with this format's extension appended when it has none
    pub fn target_path(self, path: &Path) -> PathBuf {
        match path.extension() {
            Some(_) => path.to_path_buf(),
            None => path.with_extension(self.extension()),
        }
    }
}

/// Which rows of the table are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Every filtered and sorted row, across all pages
    #[default]
    All,
    /// Only the rows of the current page
    Page,
}

/// CSV with a header record in column order. Cells use their display strings.
pub fn write_csv<W: Write>(writer: W, columns: &[String], rows: &[&Row]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.write_record(columns.iter().map(|c| cell_display(row, c)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Pretty JSON array of objects holding exactly `columns`, absent cells as null
pub fn write_json<W: Write>(writer: W, columns: &[String], rows: &[&Row]) -> Result<()> {
    let projected: Vec<Map<String, Value>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect();
    serde_json::to_writer_pretty(writer, &projected)?;
    Ok(())
}

pub fn write_rows<W: Write>(writer: W, format: ExportFormat, columns: &[String], rows: &[&Row]) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, columns, rows),
        ExportFormat::Json => write_json(writer, columns, rows),
    }
}

pub fn export_to_path(path: &Path, format: ExportFormat, columns: &[String], rows: &[&Row]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_rows(&mut out, format, columns, rows)?;
    out.flush()?;
    info!("exported {} rows as {format} to {}", rows.len(), path.display());
    Ok(())
}
