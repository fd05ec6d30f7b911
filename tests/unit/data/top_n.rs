use super::*;
use crate::data::time::{RawKey, TimeKey};

fn key(v: f64) -> TimeKey {
    TimeKey::Raw(RawKey::Number {
        value: v,
        text: v.to_string(),
    })
}

fn matrix(columns: &[&str], rows: &[&[f64]]) -> PivotMatrix {
    PivotMatrix::from_parts(
        (0..rows.len()).map(|i| key(i as f64)).collect(),
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter().flat_map(|r| r.iter().copied()).collect(),
    )
    .unwrap()
}

#[test]
fn top_n_indices_are_stable_on_ties() {
    assert_eq!(top_n_indices(&[5.0, 9.0, 5.0, 1.0], 3), vec![1, 0, 2]);
    assert_eq!(top_n_indices(&[1.0, 2.0], 5), vec![1, 0]);
}

#[test]
fn zero_is_rejected() {
    let m = matrix(&["A"], &[&[1.0]]);
    assert!(filter_top_n_per_time(&m, 0).is_err());
}

#[test]
fn keeps_n_per_row_and_unions_columns() {
    let m = matrix(
        &["A", "B", "C", "D"],
        &[&[10.0, 8.0, 1.0, 0.5], &[1.0, 8.0, 9.0, 0.5], &[0.0, 0.0, 0.0, 0.0]],
    );
    let f = filter_top_n_per_time(&m, 2).unwrap();

    for r in 0..f.shape().0 {
        let non_zero = f.row(r).iter().filter(|v| **v != 0.0).count();
        assert!(non_zero <= 2);
    }

    let mut expected = std::collections::BTreeSet::new();
    for r in 0..m.shape().0 {
        for c in top_n_indices(m.row(r), 2) {
            expected.insert(m.columns()[c].clone());
        }
    }
    let got: std::collections::BTreeSet<String> = f.columns().iter().cloned().collect();
    assert_eq!(got, expected);

    assert_eq!(f.columns(), &["A", "B", "C"]);
    assert_eq!(f.row(0), &[10.0, 8.0, 0.0]);
    assert_eq!(f.row(1), &[0.0, 8.0, 9.0]);
    assert_eq!(f.row(2), &[0.0, 0.0, 0.0]);
}

#[test]
fn single_period_keeps_two_largest() {
    let m = matrix(&["A", "B", "C"], &[&[100.0, 50.0, 10.0]]);
    let f = filter_top_n_per_time(&m, 2).unwrap();
    assert_eq!(f.value(0, "A"), Some(100.0));
    assert_eq!(f.value(0, "B"), Some(50.0));
    assert_eq!(f.value(0, "C").unwrap_or(0.0), 0.0);
}
