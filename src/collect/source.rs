use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::foundation::error::{RaceError, RaceResult};

/// One daily snapshot: a header and string cells, as published.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotTable {
    /// Column names.
    pub headers: Vec<String>,
    /// Rows, one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl SnapshotTable {
    /// Parse a snapshot from CSV text (a leading UTF-8 BOM is ignored).
    pub fn from_csv<R: Read>(reader: R) -> RaceResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .context("read snapshot header")?
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
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.context("read snapshot row")?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// `true` when the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Provider of daily per-ticker market snapshots.
pub trait SnapshotSource {
    /// Snapshot of `market` on `date`; `None` when there was no trading data that day.
    fn snapshot(&self, date: NaiveDate, market: &str) -> RaceResult<Option<SnapshotTable>>;

    /// Display name of a ticker, when known.
    fn ticker_name(&self, ticker: &str) -> Option<String>;
}

/// Snapshots stored as `<root>/<market>/<YYYYMMDD>.csv`, with names in `<root>/tickers.csv`.
#[derive(Clone, Debug)]
pub struct DirSnapshotSource {
    root: PathBuf,
    names: HashMap<String, String>,
}

impl DirSnapshotSource {
    /// Open a snapshot directory, loading the ticker name table when present.
    pub fn open(root: impl Into<PathBuf>) -> RaceResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RaceError::validation(format!(
                "snapshot directory '{}' does not exist",
                root.display()
            )));
        }
        let names_path = root.join("tickers.csv");
        let names = if names_path.is_file() {
            load_ticker_names(&names_path)?
        } else {
            tracing::debug!(path = %names_path.display(), "no ticker name table");
            HashMap::new()
        };
        Ok(Self { root, names })
    }

    /// Path of the snapshot file for `date` and `market`.
    pub fn snapshot_path(&self, date: NaiveDate, market: &str) -> PathBuf {
        self.root
            .join(market)
            .join(format!("{}.csv", date.format("%Y%m%d")))
    }
}

impl SnapshotSource for DirSnapshotSource {
    fn snapshot(&self, date: NaiveDate, market: &str) -> RaceResult<Option<SnapshotTable>> {
        let path = self.snapshot_path(date, market);
        if !path.is_file() {
            return Ok(None);
        }
        let file = std::fs::File::open(&path)
            .with_context(|| format!("open snapshot '{}'", path.display()))?;
        let table = SnapshotTable::from_csv(file)
            .map_err(|e| RaceError::data(format!("snapshot '{}': {e}", path.display())))?;
        Ok(Some(table))
    }

    fn ticker_name(&self, ticker: &str) -> Option<String> {
        self.names.get(ticker).cloned()
    }
}

fn load_ticker_names(path: &Path) -> RaceResult<HashMap<String, String>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let table = SnapshotTable::from_csv(file)?;
    let find = |names: &[&str]| table.headers.iter().position(|h| names.contains(&h.as_str()));
    let (Some(t), Some(n)) = (find(&["티커", "ticker"]), find(&["종목명", "name"])) else {
        return Err(RaceError::data(format!(
            "'{}' needs ticker and name columns; columns={:?}",
            path.display(),
            table.headers
        )));
    };
    let names: HashMap<String, String> = table
        .rows
        .iter()
        .filter_map(|row| Some((row.get(t)?.clone(), row.get(n)?.clone())))
        .collect();
    tracing::debug!(tickers = names.len(), "loaded ticker names");
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/collect/source.rs"]
mod tests;
