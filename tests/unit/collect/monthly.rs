use std::collections::HashMap;

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn table(headers: &[&str], rows: &[&[&str]]) -> SnapshotTable {
    SnapshotTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}

#[derive(Default)]
struct FakeSource {
    days: HashMap<NaiveDate, SnapshotTable>,
    names: HashMap<String, String>,
}

impl SnapshotSource for FakeSource {
    fn snapshot(&self, date: NaiveDate, market: &str) -> RaceResult<Option<SnapshotTable>> {
        assert_eq!(market, "KOSPI");
        Ok(self.days.get(&date).cloned())
    }

    fn ticker_name(&self, ticker: &str) -> Option<String> {
        self.names.get(ticker).cloned()
    }
}

#[test]
fn probe_finds_korean_columns() {
    let h = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let c = probe_columns(&h(&["티커", "종목명", "시가총액", "종가"])).unwrap();
    assert_eq!((c.ticker, c.market_cap, c.name), (0, 2, Some(1)));

    let c = probe_columns(&h(&["티커", "종가", "시가총액(원)"])).unwrap();
    assert_eq!((c.market_cap, c.name), (2, None));

    let err = probe_columns(&h(&["티커", "종가"])).unwrap_err().to_string();
    assert!(err.contains("종가"), "{err}");
    assert!(probe_columns(&h(&["종목명", "시가총액"])).is_err());
}

#[test]
fn month_ends_are_inclusive() {
    assert_eq!(
        month_ends(d(1995, 1, 1), d(1995, 3, 15)),
        vec![d(1995, 1, 31), d(1995, 2, 28)]
    );
    assert_eq!(
        month_ends(d(2020, 1, 31), d(2020, 2, 29)),
        vec![d(2020, 1, 31), d(2020, 2, 29)]
    );
    assert_eq!(
        month_ends(d(2020, 12, 5), d(2021, 1, 31)),
        vec![d(2020, 12, 31), d(2021, 1, 31)]
    );
    assert!(month_ends(d(2020, 1, 2), d(2020, 1, 30)).is_empty());
}

#[test]
fn collects_top_n_with_fallback_days() {
    let mut src = FakeSource::default();
    // 2020-01-31 has no data; the previous day does.
    src.days.insert(
        d(2020, 1, 30),
        table(
            &["티커", "시가총액"],
            &[&["005930", "300"], &["000660", "100"], &["035420", "200"]],
        ),
    );
    src.days.insert(
        d(2020, 2, 29),
        table(
            &["티커", "종목명", "시가총액"],
            &[&["000660", "SK하이닉스", "1,000"], &["005930", "삼성전자", "900"]],
        ),
    );
    // An empty snapshot counts as no data.
    src.days.insert(d(2020, 3, 31), table(&["티커", "시가총액"], &[]));
    src.names.insert("005930".into(), "삼성전자".into());

    let opts = CollectOpts {
        top_n: 2,
        ..CollectOpts::new(d(2020, 1, 1), d(2020, 3, 31))
    };
    let rows = collect_monthly(&src, &opts).unwrap();

    let got: Vec<(&str, &str, f64, NaiveDate)> = rows
        .iter()
        .map(|r| (r.ticker.as_str(), r.name.as_str(), r.market_cap, r.date))
        .collect();
    assert_eq!(
        got,
        vec![
            ("005930", "삼성전자", 300.0, d(2020, 1, 30)),
            ("035420", "035420", 200.0, d(2020, 1, 30)),
            ("000660", "SK하이닉스", 1000.0, d(2020, 2, 29)),
            ("005930", "삼성전자", 900.0, d(2020, 2, 29)),
        ]
    );
    assert!(rows.iter().all(|r| r.market == "KOSPI"));
}

#[test]
fn lookback_is_bounded() {
    let mut src = FakeSource::default();
    src.days.insert(
        d(2020, 1, 1),
        table(&["티커", "시가총액"], &[&["A", "1"]]),
    );
    let short = CollectOpts {
        lookback_days: 30,
        ..CollectOpts::new(d(2020, 1, 1), d(2020, 1, 31))
    };
    assert!(collect_monthly(&src, &short).unwrap().is_empty());

    let long = CollectOpts::new(d(2020, 1, 1), d(2020, 1, 31));
    assert_eq!(collect_monthly(&src, &long).unwrap().len(), 1);
}

#[test]
fn bad_inputs_are_rejected() {
    let src = FakeSource::default();
    assert!(collect_monthly(&src, &CollectOpts::new(d(2020, 2, 1), d(2020, 1, 1))).is_err());

    let t = table(&["티커", "시가총액"], &[&["A", "n/a"]]);
    assert!(snapshot_rows(&t, d(2020, 1, 31), "KOSPI", &src).is_err());
}

#[test]
fn csv_output_has_bom_and_header() {
    let rows = vec![MarketCapRow {
        ticker: "005930".into(),
        name: "삼성전자".into(),
        market_cap: 350_000_000_000_000.0,
        date: d(2020, 1, 31),
        market: "KOSPI".into(),
    }];
    let mut buf = Vec::new();
    write_rows(&mut buf, &rows).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(
        text,
        "\u{feff}ticker,name,market_cap,date,market\n\
         005930,삼성전자,350000000000000,2020-01-31,KOSPI\n"
    );
}
