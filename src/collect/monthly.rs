use std::io::Write;
use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::collect::source::{SnapshotSource, SnapshotTable};
use crate::data::time::month_end;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{RaceError, RaceResult};

/// Options of [`collect_monthly`].
#[derive(Clone, Debug)]
pub struct CollectOpts {
    /// First day considered (inclusive).
    pub start: NaiveDate,
    /// Last day considered (inclusive).
    pub end: NaiveDate,
    /// Market code passed to the source.
    pub market: String,
    /// Companies kept per month.
    pub top_n: usize,
    /// Days tried per month, the month end included.
    pub lookback_days: u32,
}

impl CollectOpts {
    /// Defaults for the given date range: KOSPI, top 20, 31 days of lookback.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            market: "KOSPI".to_string(),
            top_n: 20,
            lookback_days: 31,
        }
    }
}

/// One output row.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketCapRow {
    /// Ticker code.
    pub ticker: String,
    /// Company name (the ticker when unknown).
    pub name: String,
    /// Market capitalization.
    pub market_cap: f64,
    /// Trading day the snapshot was taken on.
    pub date: NaiveDate,
    /// Market code.
    pub market: String,
}

/// Positions of the columns used from a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotColumns {
    /// Ticker column.
    pub ticker: usize,
    /// Market cap column.
    pub market_cap: usize,
    /// Optional name column.
    pub name: Option<usize>,
}

/// Locate the ticker, market cap and name columns of a snapshot header.
///
/// The ticker (`티커`) and market cap (`시가총액`, else the first header containing both `시가`
/// and `총액`) are required; English `ticker` / `market_cap` / `name` headers are accepted too.
pub fn probe_columns(headers: &[String]) -> RaceResult<SnapshotColumns> {
    let exact = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    let ticker = exact(&["티커", "ticker"]).ok_or_else(|| {
        RaceError::data(format!("ticker column '티커' not found; columns={headers:?}"))
    })?;
    let market_cap = exact(&["시가총액", "market_cap"])
        .or_else(|| {
            headers
                .iter()
                .position(|h| h.contains("시가") && h.contains("총액"))
        })
        .ok_or_else(|| {
            RaceError::data(format!(
                "market cap column '시가총액' not found; columns={headers:?}"
            ))
        })?;
    let name = exact(&["종목명", "name"]);

    Ok(SnapshotColumns {
        ticker,
        market_cap,
        name,
    })
}

fn parse_cap(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a snapshot into rows, filling missing names from `source` (falling back to the ticker).
pub fn snapshot_rows(
    table: &SnapshotTable,
    date: NaiveDate,
    market: &str,
    source: &dyn SnapshotSource,
) -> RaceResult<Vec<MarketCapRow>> {
    let cols = probe_columns(&table.headers)?;
    let mut out = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        let ticker = cell(cols.ticker).to_string();
        if ticker.is_empty() {
            continue;
        }
        let market_cap = parse_cap(cell(cols.market_cap)).ok_or_else(|| {
            RaceError::data(format!(
                "{date} row {}: market cap '{}' is not a number",
                i + 1,
                cell(cols.market_cap)
            ))
        })?;
        let name = cols
            .name
            .map(|n| cell(n).to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| source.ticker_name(&ticker))
            .unwrap_or_else(|| ticker.clone());
        out.push(MarketCapRow {
            ticker,
            name,
            market_cap,
            date,
            market: market.to_string(),
        });
    }
    Ok(out)
}

/// Month ends between `start` and `end`, both inclusive.
pub fn month_ends(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cursor = month_end(start).date();
    while cursor <= end {
        out.push(cursor);
        let Some(next_month) = cursor.succ_opt() else {
            break;
        };
        cursor = month_end(next_month).date();
    }
    out
}

/// Walk every month end of the range and keep the largest companies of each month.
///
/// A month end without data falls back day by day, up to `lookback_days` tries; the row date is
/// the day actually used. Months with no data at all are skipped. The result is sorted by date
/// ascending, then market cap descending.
pub fn collect_monthly(
    source: &dyn SnapshotSource,
    opts: &CollectOpts,
) -> RaceResult<Vec<MarketCapRow>> {
    if opts.start > opts.end {
        return Err(RaceError::validation(format!(
            "start {} is after end {}",
            opts.start, opts.end
        )));
    }
    if opts.top_n == 0 {
        return Err(RaceError::validation("top_n must be > 0"));
    }

    let months = month_ends(opts.start, opts.end);
    if let (Some(first), Some(last)) = (months.first(), months.last()) {
        tracing::info!(
            from = %first,
            to = %last,
            months = months.len(),
            market = %opts.market,
            top_n = opts.top_n,
            "collecting month-end market caps"
        );
    }

    let mut out = Vec::new();
    for month in months {
        tracing::debug!(month = %month, "collecting");
        let mut found = None;
        let mut day = month;
        for _ in 0..opts.lookback_days {
            if let Some(table) = source.snapshot(day, &opts.market)?
                && !table.is_empty()
            {
                found = Some((day, table));
                break;
            }
            let Some(prev) = day.pred_opt() else {
                break;
            };
            day = prev;
        }

        let Some((used, table)) = found else {
            tracing::warn!(
                month = %month,
                days = opts.lookback_days,
                "no trading data within lookback window; month skipped"
            );
            continue;
        };
        if used != month {
            tracing::info!(month = %month, used = %used, "month end had no data; used earlier day");
        }

        let mut rows = snapshot_rows(&table, used, &opts.market, source)?;
        rows.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
        rows.truncate(opts.top_n);
        out.extend(rows);
    }

    // Stable: equal (date, cap) keep snapshot order.
    out.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(b.market_cap.total_cmp(&a.market_cap))
    });
    Ok(out)
}

/// Write rows as `ticker,name,market_cap,date,market` CSV, prefixed with a UTF-8 BOM.
pub fn write_rows<W: Write>(mut out: W, rows: &[MarketCapRow]) -> RaceResult<()> {
    out.write_all("\u{feff}".as_bytes())
        .context("write csv byte order mark")?;
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["ticker", "name", "market_cap", "date", "market"])
        .context("write csv header")?;
    for r in rows {
        let cap = r.market_cap.to_string();
        let date = r.date.format("%Y-%m-%d").to_string();
        w.write_record([
            r.ticker.as_str(),
            r.name.as_str(),
            cap.as_str(),
            date.as_str(),
            r.market.as_str(),
        ])
        .context("write csv row")?;
    }
    w.flush().context("flush csv")?;
    Ok(())
}

/// Write rows to `path`, creating parent directories.
pub fn write_rows_to_path(path: &Path, rows: &[MarketCapRow]) -> RaceResult<()> {
    ensure_parent_dir(path)?;
    let file =
        std::fs::File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    write_rows(file, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote market cap csv");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/collect/monthly.rs"]
mod tests;
