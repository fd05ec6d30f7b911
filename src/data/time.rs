//! Time column parsing and normalization.
//!
//! A time column is either fully temporal (every value parsed to a [`NaiveDateTime`]) or raw (kept
//! as an opaque sortable key). Range filtering and day/month conversion only apply to temporal
//! columns; on raw columns they degrade to warnings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::data::table::{LongRecord, LongTable, RawRow};
use crate::foundation::error::{RaceError, RaceResult};

/// Sortable raw key for time columns that did not parse as dates.
#[derive(Clone, Debug)]
pub enum RawKey {
    /// Every value in the column was numeric; ordering is numeric.
    Number {
        /// Parsed value used for ordering.
        value: f64,
        /// Original cell text used for display.
        text: String,
    },
    /// Lexicographic ordering.
    Text(String),
}

impl RawKey {
    /// Display text of the key.
    pub fn text(&self) -> &str {
        match self {
            Self::Number { text, .. } => text,
            Self::Text(t) => t,
        }
    }
}

/// Row key of the pivot matrix.
#[derive(Clone, Debug)]
pub enum TimeKey {
    /// Parsed timestamp.
    Instant(NaiveDateTime),
    /// Unparsed value.
    Raw(RawKey),
}

impl TimeKey {
    /// Parsed timestamp, when the key is temporal.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Instant(t) => Some(*t),
            Self::Raw(_) => None,
        }
    }

    /// Human-readable label. Temporal keys use `period_fmt` when given.
    pub fn label(&self, period_fmt: Option<&str>) -> String {
        match (self, period_fmt) {
            (Self::Instant(t), Some(fmt)) => t.format(fmt).to_string(),
            (Self::Instant(t), None) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            (Self::Raw(k), _) => k.text().to_string(),
        }
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (
                Self::Raw(RawKey::Number { value: a, .. }),
                Self::Raw(RawKey::Number { value: b, .. }),
            ) => a.total_cmp(b),
            (Self::Raw(RawKey::Text(a)), Self::Raw(RawKey::Text(b))) => a.cmp(b),
            (Self::Raw(RawKey::Number { .. }), Self::Raw(RawKey::Text(_))) => Ordering::Less,
            (Self::Raw(RawKey::Text(_)), Self::Raw(RawKey::Number { .. })) => Ordering::Greater,
            (Self::Instant(_), Self::Raw(_)) => Ordering::Less,
            (Self::Raw(_), Self::Instant(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

/// Time granularity applied after parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Keep parsed timestamps as-is.
    #[default]
    Raw,
    /// Truncate to midnight.
    Day,
    /// Resample per entity to month-end, keeping the last observed value.
    Month,
}

/// Options controlling [`normalize`].
#[derive(Clone, Debug, Default)]
pub struct TimeOptions {
    /// Explicit strftime format for the time column.
    pub format: Option<String>,
    /// Inclusive lower bound.
    pub start: Option<String>,
    /// Inclusive upper bound.
    pub end: Option<String>,
    /// Granularity.
    pub unit: TimeUnit,
}

/// Display format of the period label for a prepared matrix.
pub fn period_format(temporal: bool, unit: TimeUnit) -> Option<&'static str> {
    match (temporal, unit) {
        (false, _) => None,
        (true, TimeUnit::Month) => Some("%Y-%m"),
        (true, TimeUnit::Day | TimeUnit::Raw) => Some("%Y-%m-%d"),
    }
}

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d", "%m/%d/%Y", "%Y-%m", "%Y/%m",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Rfc3339,
    Format(&'static str),
}

impl Layout {
    fn parse(self, value: &str) -> Option<NaiveDateTime> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(value.trim())
                .ok()
                .map(|dt| dt.naive_local()),
            Self::Format(fmt) => parse_with_format(value, fmt),
        }
    }
}

fn candidate_layouts() -> impl Iterator<Item = Layout> {
    DATETIME_LAYOUTS
        .iter()
        .chain(DATE_LAYOUTS.iter())
        .map(|f| Layout::Format(*f))
        .chain(std::iter::once(Layout::Rfc3339))
}

/// Parse `value` with a strftime `fmt`.
///
/// Formats that omit the month or day (`%Y`, `%Y-%m`) resolve to the first day of the period, and
/// formats without time fields resolve to midnight.
pub fn parse_with_format(value: &str, fmt: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let has_any = |specs: &[&str]| specs.iter().any(|s| fmt.contains(s));
    let full_date = has_any(&["%F", "%D", "%x", "%c", "%+", "%s", "%j"]);

    let mut v = value.to_string();
    let mut f = fmt.to_string();
    if !full_date && !has_any(&["%m", "%b", "%B", "%h"]) {
        v.push_str(" 01");
        f.push_str(" %m");
    }
    if !full_date && !has_any(&["%d", "%e"]) {
        v.push_str(" 01");
        f.push_str(" %d");
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(&v, &f) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(&v, &f)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Infer a timestamp from a single value using the built-in layout list.
pub fn infer_datetime(value: &str) -> Option<NaiveDateTime> {
    candidate_layouts().find_map(|l| l.parse(value))
}

/// Outcome of parsing a whole time column.
#[derive(Clone, Debug)]
pub enum ParsedTimes {
    /// Every value parsed.
    Temporal(Vec<NaiveDateTime>),
    /// Parsing failed for at least one value; raw keys in input order.
    Raw(Vec<RawKey>),
}

/// Parse a time column strictly: either every value parses or the column stays raw.
///
/// Without an explicit `format` the first built-in layout that accepts every value is used. Bare
/// numbers are never inferred as dates.
pub fn parse_time_column(values: &[&str], format: Option<&str>) -> ParsedTimes {
    if values.is_empty() {
        return ParsedTimes::Raw(Vec::new());
    }

    let parsed = match format {
        Some(fmt) => values
            .iter()
            .map(|v| parse_with_format(v, fmt))
            .collect::<Option<Vec<_>>>(),
        None => candidate_layouts().find_map(|layout| {
            values
                .iter()
                .map(|v| layout.parse(v))
                .collect::<Option<Vec<_>>>()
        }),
    };

    match parsed {
        Some(times) => ParsedTimes::Temporal(times),
        None => {
            match format {
                Some(fmt) => tracing::warn!(
                    format = fmt,
                    "time column does not match the given format; using raw values"
                ),
                None => tracing::warn!("could not parse time column as dates; using raw values"),
            }
            ParsedTimes::Raw(raw_keys(values))
        }
    }
}

fn raw_keys(values: &[&str]) -> Vec<RawKey> {
    let numbers = values
        .iter()
        .map(|v| v.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<_>>>();

    match numbers {
        Some(nums) => nums
            .into_iter()
            .zip(values)
            .map(|(value, text)| RawKey::Number {
                value,
                text: text.trim().to_string(),
            })
            .collect(),
        None => values
            .iter()
            .map(|v| RawKey::Text(v.trim().to_string()))
            .collect(),
    }
}

/// Parse a range bound: the column's explicit format first, then the built-in layouts, then a
/// bare four-digit year.
fn parse_bound(name: &str, value: &str, format: Option<&str>) -> RaceResult<NaiveDateTime> {
    let trimmed = value.trim();
    let is_year = trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit());
    format
        .and_then(|fmt| parse_with_format(trimmed, fmt))
        .or_else(|| infer_datetime(trimmed))
        .or_else(|| is_year.then(|| parse_with_format(trimmed, "%Y")).flatten())
        .ok_or_else(|| RaceError::validation(format!("{name} '{value}' is not a recognizable date")))
}

/// Parse, filter and resample raw rows into a [`LongTable`].
pub fn normalize(rows: Vec<RawRow>, opts: &TimeOptions) -> RaceResult<LongTable> {
    let values: Vec<&str> = rows.iter().map(|r| r.time.as_str()).collect();
    let parsed = parse_time_column(&values, opts.format.as_deref());

    let times = match parsed {
        ParsedTimes::Raw(keys) => {
            if opts.start.is_some() || opts.end.is_some() {
                tracing::warn!(
                    "start/end time given but time column is not a date; range filter skipped \
                     (bare years need an explicit format such as %Y)"
                );
            }
            if matches!(opts.unit, TimeUnit::Day | TimeUnit::Month) {
                tracing::warn!(
                    unit = ?opts.unit,
                    "time unit requested but time column is not a date; using raw values"
                );
            }
            let records = rows
                .into_iter()
                .zip(keys)
                .map(|(row, key)| LongRecord {
                    time: TimeKey::Raw(key),
                    entity: row.entity,
                    value: row.value,
                })
                .collect();
            return Ok(LongTable {
                records,
                temporal: false,
                unit: TimeUnit::Raw,
            });
        }
        ParsedTimes::Temporal(times) => times,
    };

    let start = opts
        .start
        .as_deref()
        .map(|s| parse_bound("start_time", s, opts.format.as_deref()))
        .transpose()?;
    let end = opts
        .end
        .as_deref()
        .map(|s| parse_bound("end_time", s, opts.format.as_deref()))
        .transpose()?;

    let before = rows.len();
    let mut observed: Vec<(NaiveDateTime, RawRow)> = times
        .into_iter()
        .zip(rows)
        .filter(|(t, _)| start.is_none_or(|s| *t >= s) && end.is_none_or(|e| *t <= e))
        .collect();
    if observed.len() != before {
        tracing::debug!(
            kept = observed.len(),
            dropped = before - observed.len(),
            "applied time range filter"
        );
    }

    // Stable: equal timestamps keep input order, so "later" always means "observed later".
    observed.sort_by_key(|(t, _)| *t);

    let records = match opts.unit {
        TimeUnit::Raw => observed
            .into_iter()
            .map(|(t, row)| LongRecord {
                time: TimeKey::Instant(t),
                entity: row.entity,
                value: row.value,
            })
            .collect(),
        TimeUnit::Day => observed
            .into_iter()
            .map(|(t, row)| LongRecord {
                time: TimeKey::Instant(t.date().and_time(NaiveTime::MIN)),
                entity: row.entity,
                value: row.value,
            })
            .collect(),
        TimeUnit::Month => resample_month_end(observed),
    };

    Ok(LongTable {
        records,
        temporal: true,
        unit: opts.unit,
    })
}

/// Last day of the month containing `d`, at midnight.
pub fn month_end(d: NaiveDate) -> NaiveDateTime {
    let (y, m) = if d.month() == 12 {
        (d.year() + 1, 1)
    } else {
        (d.year(), d.month() + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MAX);
    first_next
        .pred_opt()
        .unwrap_or(first_next)
        .and_time(NaiveTime::MIN)
}

fn month_ordinal(t: NaiveDateTime) -> i64 {
    i64::from(t.year()) * 12 + i64::from(t.month0())
}

fn month_from_ordinal(ord: i64) -> Option<NaiveDate> {
    let year = i32::try_from(ord.div_euclid(12)).ok()?;
    let month0 = u32::try_from(ord.rem_euclid(12)).ok()?;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// Per entity: one record per calendar month between the first and last observation, holding the
/// latest non-empty value of that month. `observed` must be sorted by time (stable).
fn resample_month_end(observed: Vec<(NaiveDateTime, RawRow)>) -> Vec<LongRecord> {
    let mut per_entity: BTreeMap<String, BTreeMap<i64, Option<f64>>> = BTreeMap::new();
    for (t, row) in observed {
        let months = per_entity.entry(row.entity).or_default();
        let slot = months.entry(month_ordinal(t)).or_insert(None);
        if row.value.is_some() {
            *slot = row.value;
        }
    }

    let mut out = Vec::new();
    for (entity, months) in per_entity {
        let (Some((&first, _)), Some((&last, _))) =
            (months.first_key_value(), months.last_key_value())
        else {
            continue;
        };
        for ord in first..=last {
            let Some(month_start) = month_from_ordinal(ord) else {
                continue;
            };
            out.push(LongRecord {
                time: TimeKey::Instant(month_end(month_start)),
                entity: entity.clone(),
                value: months.get(&ord).copied().flatten(),
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/data/time.rs"]
mod tests;
