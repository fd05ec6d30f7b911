use super::*;
use crate::data::table::LongRecord;
use crate::data::time::{RawKey, TimeUnit, infer_datetime};

fn rec(time: &str, entity: &str, value: Option<f64>) -> LongRecord {
    LongRecord {
        time: TimeKey::Instant(infer_datetime(time).unwrap()),
        entity: entity.to_string(),
        value,
    }
}

fn table(records: Vec<LongRecord>) -> LongTable {
    LongTable {
        records,
        temporal: true,
        unit: TimeUnit::Raw,
    }
}

#[test]
fn pivot_sorts_rows_and_columns_and_zero_fills() {
    let t = table(vec![
        rec("2020-02-01", "B", Some(2.0)),
        rec("2020-01-01", "C", Some(3.0)),
        rec("2020-01-01", "A", Some(1.0)),
    ]);
    let p = build_pivot(&t).unwrap();
    assert_eq!(p.shape(), (2, 3));
    assert_eq!(p.columns(), &["A", "B", "C"]);
    assert_eq!(p.row(0), &[1.0, 0.0, 3.0]);
    assert_eq!(p.row(1), &[0.0, 2.0, 0.0]);
    assert_eq!(p.value(1, "B"), Some(2.0));
    assert_eq!(p.value(1, "Z"), None);
    assert_eq!(p.max_value(), 3.0);
}

#[test]
fn missing_values_still_create_rows() {
    let t = table(vec![
        rec("2020-01-31", "A", Some(5.0)),
        rec("2020-02-29", "A", None),
    ]);
    let p = build_pivot(&t).unwrap();
    assert_eq!(p.shape(), (2, 1));
    assert_eq!(p.row(1), &[0.0]);
}

#[test]
fn duplicate_pairs_keep_the_later_record() {
    let t = table(vec![
        rec("2020-01-01", "A", Some(1.0)),
        rec("2020-01-01", "A", Some(7.0)),
    ]);
    let p = build_pivot(&t).unwrap();
    assert_eq!(p.shape(), (1, 1));
    assert_eq!(p.get(0, 0), 7.0);
}

#[test]
fn from_parts_rejects_broken_shapes() {
    let key = |v: f64| {
        TimeKey::Raw(RawKey::Number {
            value: v,
            text: v.to_string(),
        })
    };
    assert!(PivotMatrix::from_parts(vec![key(1.0)], vec!["A".into()], vec![]).is_err());
    assert!(
        PivotMatrix::from_parts(vec![key(2.0), key(1.0)], vec!["A".into()], vec![0.0, 0.0])
            .is_err()
    );
    assert!(
        PivotMatrix::from_parts(vec![key(1.0)], vec!["B".into(), "A".into()], vec![0.0, 0.0])
            .is_err()
    );
}

#[test]
fn write_csv_uses_period_format() {
    let t = table(vec![
        rec("2020-01-31", "A", Some(1.5)),
        rec("2020-01-31", "B", Some(2.0)),
    ]);
    let p = build_pivot(&t).unwrap();
    let mut out = Vec::new();
    p.write_csv(&mut out, Some("%Y-%m")).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "time,A,B\n2020-01,1.5,2\n");
}
