use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use anyhow::Context as _;

use crate::data::table::LongTable;
use crate::data::time::TimeKey;
use crate::foundation::error::{RaceError, RaceResult};

/// Wide time×entity matrix.
///
/// Invariants: `index` is strictly ascending, `columns` is sorted and unique, and `values` holds
/// exactly `index.len() * columns.len()` cells in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotMatrix {
    index: Vec<TimeKey>,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl PivotMatrix {
    /// Build a matrix from parts, checking the shape invariants.
    pub fn from_parts(
        index: Vec<TimeKey>,
        columns: Vec<String>,
        values: Vec<f64>,
    ) -> RaceResult<Self> {
        if values.len() != index.len() * columns.len() {
            return Err(RaceError::validation(format!(
                "pivot values len {} does not match shape {}x{}",
                values.len(),
                index.len(),
                columns.len()
            )));
        }
        if index.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RaceError::validation(
                "pivot index must be strictly ascending",
            ));
        }
        if columns.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RaceError::validation(
                "pivot columns must be sorted and unique",
            ));
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    /// Row keys, ascending.
    pub fn index(&self) -> &[TimeKey] {
        &self.index
    }

    /// Entity columns, sorted.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    /// `true` when the matrix has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// Cells of row `r`.
    pub fn row(&self, r: usize) -> &[f64] {
        let n = self.columns.len();
        &self.values[r * n..(r + 1) * n]
    }

    /// Cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    /// Cell for a named entity in row `r`; `None` when the column does not exist.
    pub fn value(&self, r: usize, entity: &str) -> Option<f64> {
        let c = self.column_index(entity)?;
        Some(self.get(r, c))
    }

    /// Position of a named column.
    pub fn column_index(&self, entity: &str) -> Option<usize> {
        self.columns
            .binary_search_by(|c| c.as_str().cmp(entity))
            .ok()
    }

    /// Largest cell of the whole matrix (0 for an empty matrix).
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Write the matrix as CSV: a `time` column followed by one column per entity.
    pub fn write_csv<W: Write>(&self, out: W, period_fmt: Option<&str>) -> RaceResult<()> {
        let mut w = csv::Writer::from_writer(out);
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("time");
        header.extend(self.columns.iter().map(String::as_str));
        w.write_record(&header).context("write pivot csv header")?;

        for (r, key) in self.index.iter().enumerate() {
            let mut rec = Vec::with_capacity(self.columns.len() + 1);
            rec.push(key.label(period_fmt));
            rec.extend(self.row(r).iter().map(|v| v.to_string()));
            w.write_record(&rec).context("write pivot csv row")?;
        }
        w.flush().context("flush pivot csv")?;
        Ok(())
    }
}

/// Pivot a long table: rows are unique time keys (ascending), columns unique entities (sorted),
/// absent cells are zero.
///
/// When several records share a `(time, entity)` pair the later one in table order wins.
pub fn build_pivot(table: &LongTable) -> RaceResult<PivotMatrix> {
    let index: Vec<TimeKey> = table
        .records
        .iter()
        .map(|r| r.time.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<String> = table
        .records
        .iter()
        .map(|r| r.entity.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut collapsed = 0usize;
    for rec in &table.records {
        let Some(value) = rec.value else {
            continue;
        };
        let r = index
            .binary_search(&rec.time)
            .map_err(|_| RaceError::data("pivot row key vanished (bug)"))?;
        let c = columns
            .binary_search(&rec.entity)
            .map_err(|_| RaceError::data("pivot column vanished (bug)"))?;
        if cells.insert((r, c), value).is_some() {
            collapsed += 1;
        }
    }
    if collapsed > 0 {
        tracing::warn!(
            collapsed,
            "duplicate (time, entity) pairs collapsed; latest observation kept"
        );
    }

    let mut values = vec![0.0; index.len() * columns.len()];
    for ((r, c), v) in cells {
        values[r * columns.len() + c] = v;
    }

    PivotMatrix::from_parts(index, columns, values)
}

#[cfg(test)]
#[path = "../../tests/unit/data/pivot.rs"]
mod tests;
