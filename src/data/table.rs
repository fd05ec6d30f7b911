use std::io::Read;
use std::path::Path;

use anyhow::Context as _;

use crate::data::time::{TimeKey, TimeUnit};
use crate::foundation::error::{RaceError, RaceResult};

/// Names of the three columns read from the input CSV.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Time column.
    pub time: String,
    /// Entity (bar label) column.
    pub entity: String,
    /// Numeric value column.
    pub value: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            time: "time".to_string(),
            entity: "entity".to_string(),
            value: "value".to_string(),
        }
    }
}

/// One CSV row before time parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRow {
    /// Untouched time cell.
    pub time: String,
    /// Entity identifier.
    pub entity: String,
    /// Parsed value; `None` for an empty cell.
    pub value: Option<f64>,
}

/// Long-form record after time normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct LongRecord {
    /// Normalized time key.
    pub time: TimeKey,
    /// Entity identifier.
    pub entity: String,
    /// Value; `None` contributes the row key but no cell value.
    pub value: Option<f64>,
}

/// Normalized long-form table.
///
/// Record order is meaningful: when two records share a `(time, entity)` pair the later one wins
/// during pivoting.
#[derive(Clone, Debug)]
pub struct LongTable {
    /// Records in resolution order.
    pub records: Vec<LongRecord>,
    /// `true` when the time column parsed as dates.
    pub temporal: bool,
    /// Granularity actually applied (always `Raw` for non-temporal tables).
    pub unit: TimeUnit,
}

/// Load the three named columns of a CSV file.
pub fn load_csv(path: &Path, columns: &ColumnSpec) -> RaceResult<Vec<RawRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open input csv '{}'", path.display()))?;
    let rows = read_csv(file, columns)?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "loaded input csv");
    Ok(rows)
}

/// Read the three named columns from any CSV reader.
pub fn read_csv<R: Read>(reader: R, columns: &ColumnSpec) -> RaceResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("read csv header")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let find = |name: &str| -> RaceResult<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            RaceError::data(format!(
                "column '{name}' not found in csv header; columns={headers:?}"
            ))
        })
    };
    let time_i = find(&columns.time)?;
    let entity_i = find(&columns.entity)?;
    let value_i = find(&columns.value)?;

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = record.with_context(|| format!("read csv line {line}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let value_text = cell(value_i).trim();
        let value = if value_text.is_empty() {
            None
        } else {
            let v = value_text.parse::<f64>().map_err(|_| {
                RaceError::data(format!(
                    "line {line}: value '{value_text}' in column '{}' is not a number",
                    columns.value
                ))
            })?;
            // `NaN` cells count as missing.
            Some(v).filter(|v| !v.is_nan())
        };

        out.push(RawRow {
            time: cell(time_i).to_string(),
            entity: cell(entity_i).to_string(),
            value,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/data/table.rs"]
mod tests;
