use std::path::Path;

use crate::data::pivot::{PivotMatrix, build_pivot};
use crate::data::table::{ColumnSpec, RawRow, load_csv};
use crate::data::time::{TimeOptions, TimeUnit, normalize, period_format};
use crate::data::top_n::filter_top_n_per_time;
use crate::foundation::error::{RaceError, RaceResult};

/// Options of the data preparation stage.
#[derive(Clone, Debug)]
pub struct PrepareOpts {
    /// Input column names.
    pub columns: ColumnSpec,
    /// Time parsing, range and granularity.
    pub time: TimeOptions,
    /// Entities kept per period.
    pub top_n: usize,
}

impl Default for PrepareOpts {
    fn default() -> Self {
        Self {
            columns: ColumnSpec::default(),
            time: TimeOptions::default(),
            top_n: 15,
        }
    }
}

/// Output of [`prepare_rows`]: the matrix to animate and how to label its periods.
#[derive(Clone, Debug)]
pub struct PreparedRace {
    /// Top-N filtered matrix.
    pub matrix: PivotMatrix,
    /// `true` when the time column parsed as dates.
    pub temporal: bool,
    /// Granularity actually applied.
    pub unit: TimeUnit,
}

impl PreparedRace {
    /// Display format of period labels (`None` for raw keys).
    pub fn period_format(&self) -> Option<&'static str> {
        period_format(self.temporal, self.unit)
    }
}

/// Load a CSV and prepare it, see [`prepare_rows`].
pub fn prepare_csv(path: &Path, opts: &PrepareOpts) -> RaceResult<PreparedRace> {
    if opts.top_n == 0 {
        return Err(RaceError::validation("top_n must be > 0"));
    }
    let rows = load_csv(path, &opts.columns)?;
    prepare_rows(rows, opts)
}

/// Normalize times, pivot and keep the `top_n` entities of every period.
pub fn prepare_rows(rows: Vec<RawRow>, opts: &PrepareOpts) -> RaceResult<PreparedRace> {
    let input_rows = rows.len();
    let table = normalize(rows, &opts.time)?;
    if table.records.is_empty() {
        return Err(RaceError::validation(format!(
            "no rows left after filtering ({input_rows} input rows)"
        )));
    }

    let pivot = build_pivot(&table)?;
    let (periods, entities) = pivot.shape();
    let fmt = period_format(table.temporal, table.unit);
    if let (Some(first), Some(last)) = (pivot.index().first(), pivot.index().last()) {
        tracing::info!(
            periods,
            entities,
            temporal = table.temporal,
            from = %first.label(fmt),
            to = %last.label(fmt),
            "pivoted input"
        );
    }

    let matrix = filter_top_n_per_time(&pivot, opts.top_n)?;
    tracing::info!(
        top_n = opts.top_n,
        entities = matrix.shape().1,
        "kept top entities per period"
    );

    Ok(PreparedRace {
        matrix,
        temporal: table.temporal,
        unit: table.unit,
    })
}

#[cfg(test)]
#[path = "../tests/unit/prepare.rs"]
mod tests;
