use super::*;

fn spec(time: &str, entity: &str, value: &str) -> ColumnSpec {
    ColumnSpec {
        time: time.to_string(),
        entity: entity.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn reads_named_columns_in_any_order() {
    let csv = "value,name,date,extra\n100,A,2020-01-31,x\n50,B,2020-01-31,y\n";
    let rows = read_csv(csv.as_bytes(), &spec("date", "name", "value")).unwrap();
    assert_eq!(
        rows,
        vec![
            RawRow {
                time: "2020-01-31".to_string(),
                entity: "A".to_string(),
                value: Some(100.0),
            },
            RawRow {
                time: "2020-01-31".to_string(),
                entity: "B".to_string(),
                value: Some(50.0),
            },
        ]
    );
}

#[test]
fn empty_and_nan_values_are_missing() {
    let csv = "time,entity,value\n2020,A,\n2020,B,NaN\n2020,C,3.5\n";
    let rows = read_csv(csv.as_bytes(), &ColumnSpec::default()).unwrap();
    assert_eq!(rows[0].value, None);
    assert_eq!(rows[1].value, None);
    assert_eq!(rows[2].value, Some(3.5));
}

#[test]
fn bom_on_first_header_is_ignored() {
    let csv = "\u{feff}time,entity,value\n2020,A,1\n";
    let rows = read_csv(csv.as_bytes(), &ColumnSpec::default()).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn missing_column_is_a_data_error() {
    let csv = "time,entity,amount\n2020,A,1\n";
    let err = read_csv(csv.as_bytes(), &ColumnSpec::default()).unwrap_err();
    assert!(matches!(err, RaceError::Data(_)));
    assert!(err.to_string().contains("'value'"));
    assert!(err.to_string().contains("amount"));
}

#[test]
fn non_numeric_value_reports_line() {
    let csv = "time,entity,value\n2020,A,1\n2021,A,lots\n";
    let err = read_csv(csv.as_bytes(), &ColumnSpec::default()).unwrap_err();
    assert!(err.to_string().contains("line 3"));
}
