use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::data::pivot::PivotMatrix;
use crate::foundation::error::{RaceError, RaceResult};

/// Column indices of the `n` largest cells of `row`, largest first.
///
/// The sort is stable, so equal values keep column (alphabetical) order.
pub fn top_n_indices(row: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| row[b].partial_cmp(&row[a]).unwrap_or(Ordering::Equal));
    order.truncate(n);
    order
}

/// Keep only the `n` largest entities of every row.
///
/// Non-selected cells become zero, and the result's columns are the union of every row's
/// selection, sorted alphabetically. This keeps the number of simultaneously visible bars bounded
/// by `n` while an entity enters or leaves the ranking.
pub fn filter_top_n_per_time(pivot: &PivotMatrix, n: usize) -> RaceResult<PivotMatrix> {
    if n == 0 {
        return Err(RaceError::validation("top_n must be > 0"));
    }

    let (rows, _) = pivot.shape();
    let mut selections: Vec<Vec<usize>> = Vec::with_capacity(rows);
    let mut union = BTreeSet::new();
    for r in 0..rows {
        let picked = top_n_indices(pivot.row(r), n);
        union.extend(picked.iter().copied());
        selections.push(picked);
    }

    // Source columns are sorted, so ascending source indices keep the result sorted.
    let kept: Vec<usize> = union.into_iter().collect();
    let columns: Vec<String> = kept.iter().map(|&c| pivot.columns()[c].clone()).collect();

    let mut values = vec![0.0; rows * kept.len()];
    for (r, picked) in selections.iter().enumerate() {
        for &src in picked {
            let Ok(dst) = kept.binary_search(&src) else {
                continue;
            };
            values[r * kept.len() + dst] = pivot.get(r, src);
        }
    }

    tracing::debug!(
        top_n = n,
        columns_before = pivot.columns().len(),
        columns_after = columns.len(),
        "applied top-n per time filter"
    );
    PivotMatrix::from_parts(pivot.index().to_vec(), columns, values)
}

#[cfg(test)]
#[path = "../../tests/unit/data/top_n.rs"]
mod tests;
