use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit-collect").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("KOSPI")).unwrap();
    dir
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn parses_snapshot_csv_with_bom() {
    let t = SnapshotTable::from_csv("\u{feff}티커, 시가총액\n005930, 100\n".as_bytes()).unwrap();
    assert_eq!(t.headers, vec!["티커", "시가총액"]);
    assert_eq!(t.rows, vec![vec!["005930".to_string(), "100".to_string()]]);
    assert!(!t.is_empty());
}

#[test]
fn dir_source_reads_dated_files_and_names() {
    let root = scratch("dir_source");
    std::fs::write(
        root.join("KOSPI").join("20200131.csv"),
        "티커,시가총액\n005930,100\n",
    )
    .unwrap();
    std::fs::write(root.join("tickers.csv"), "ticker,name\n005930,삼성전자\n").unwrap();

    let src = DirSnapshotSource::open(&root).unwrap();
    assert_eq!(
        src.snapshot_path(d(2020, 1, 31), "KOSPI"),
        root.join("KOSPI").join("20200131.csv")
    );
    let t = src.snapshot(d(2020, 1, 31), "KOSPI").unwrap().unwrap();
    assert_eq!(t.rows.len(), 1);
    assert!(src.snapshot(d(2020, 1, 30), "KOSPI").unwrap().is_none());
    assert_eq!(src.ticker_name("005930").as_deref(), Some("삼성전자"));
    assert_eq!(src.ticker_name("000660"), None);
}

#[test]
fn missing_root_and_bad_name_table_fail() {
    assert!(DirSnapshotSource::open("target/unit-collect/nowhere").is_err());

    let root = scratch("bad_names");
    std::fs::write(root.join("tickers.csv"), "code\n005930\n").unwrap();
    assert!(DirSnapshotSource::open(&root).is_err());
}
