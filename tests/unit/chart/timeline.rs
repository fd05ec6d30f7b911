use super::*;
use crate::data::time::RawKey;
use chrono::NaiveDate;

fn key(v: f64) -> TimeKey {
    TimeKey::Raw(RawKey::Number {
        value: v,
        text: format!("p{v}"),
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

fn opts(n_bars: usize, steps: u32) -> RaceOptions {
    RaceOptions {
        n_bars,
        steps_per_period: steps,
        ..RaceOptions::default()
    }
}

fn entities(f: &FrameState) -> Vec<&str> {
    f.bars.iter().map(|b| b.entity.as_str()).collect()
}

#[test]
fn frame_count_and_fps() {
    let m = matrix(&["A"], &[&[1.0], &[2.0], &[3.0]]);
    let tl = RaceTimeline::new(&m, None, opts(5, 4)).unwrap();
    assert_eq!(tl.frame_count(), 9);

    let one = matrix(&["A"], &[&[1.0]]);
    let tl = RaceTimeline::new(&one, None, RaceOptions::default()).unwrap();
    assert_eq!(tl.frame_count(), 1);
    assert_eq!(tl.fps(), Fps::new(16, 1).unwrap());
}

#[test]
fn bars_slide_between_ranks() {
    let m = matrix(&["A", "B", "C"], &[&[10.0, 5.0, 0.0], &[5.0, 10.0, 1.0]]);
    let tl = RaceTimeline::new(&m, None, opts(2, 2)).unwrap();

    let f0 = tl.frame(FrameIndex(0)).unwrap();
    assert_eq!(entities(&f0), vec!["A", "B"]);
    assert_eq!(f0.bars[0].slot, 0.0);
    assert_eq!(f0.bars[1].slot, 1.0);

    let mid = tl.frame(FrameIndex(1)).unwrap();
    assert_eq!(entities(&mid), vec!["A", "B"]);
    assert!(mid.bars.iter().all(|b| b.slot == 0.5 && b.value == 7.5));

    // C is ranked third in a two-slot race, so it stays hidden.
    let end = tl.frame(FrameIndex(2)).unwrap();
    assert_eq!(entities(&end), vec!["B", "A"]);
    assert_eq!(end.bars[0].value, 10.0);
}

#[test]
fn zero_values_are_hidden() {
    let m = matrix(&["A", "B"], &[&[3.0, 0.0]]);
    let tl = RaceTimeline::new(&m, None, opts(5, 8)).unwrap();
    let f = tl.frame(FrameIndex(0)).unwrap();
    assert_eq!(entities(&f), vec!["A"]);
}

#[test]
fn entering_bar_slides_in_from_hidden_slot() {
    let m = matrix(&["A", "B", "C"], &[&[9.0, 8.0, 0.0], &[9.0, 0.0, 8.0]]);
    let tl = RaceTimeline::new(&m, None, opts(2, 4)).unwrap();
    let f = tl.frame(FrameIndex(2)).unwrap();
    let c = f.bars.iter().find(|b| b.entity == "C").unwrap();
    assert_eq!(c.slot, 1.5);
    assert_eq!(c.value, 4.0);
}

#[test]
fn fixed_and_dynamic_max() {
    let m = matrix(&["A", "B"], &[&[4.0, 2.0], &[10.0, 5.0]]);
    let fixed = RaceTimeline::new(&m, None, opts(2, 2)).unwrap();
    assert_eq!(fixed.frame(FrameIndex(0)).unwrap().value_max, 10.0);

    let dynamic = RaceTimeline::new(
        &m,
        None,
        RaceOptions {
            dynamic_max: true,
            ..opts(2, 2)
        },
    )
    .unwrap();
    assert_eq!(dynamic.frame(FrameIndex(0)).unwrap().value_max, 4.0);
    assert_eq!(dynamic.frame(FrameIndex(1)).unwrap().value_max, 7.0);
}

#[test]
fn all_zero_frame_keeps_positive_max() {
    let m = matrix(&["A"], &[&[0.0]]);
    let tl = RaceTimeline::new(&m, None, opts(2, 2)).unwrap();
    let f = tl.frame(FrameIndex(0)).unwrap();
    assert!(f.bars.is_empty());
    assert_eq!(f.value_max, 1.0);
}

#[test]
fn ease_shapes_values() {
    let m = matrix(&["A"], &[&[10.0], &[5.0]]);
    let tl = RaceTimeline::new(
        &m,
        None,
        RaceOptions {
            ease: Ease::InQuad,
            ..opts(2, 2)
        },
    )
    .unwrap();
    assert_eq!(tl.frame(FrameIndex(1)).unwrap().bars[0].value, 8.75);
}

#[test]
fn raw_label_holds_current_period() {
    let m = matrix(&["A"], &[&[1.0], &[2.0]]);
    let tl = RaceTimeline::new(&m, None, opts(2, 4)).unwrap();
    assert_eq!(tl.frame(FrameIndex(3)).unwrap().period_label, "p0");
    assert_eq!(tl.frame(FrameIndex(4)).unwrap().period_label, "p1");
}

#[test]
fn temporal_label_is_interpolated() {
    let day = |d: u32| {
        TimeKey::Instant(
            NaiveDate::from_ymd_opt(2020, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    };
    let m = PivotMatrix::from_parts(vec![day(1), day(11)], vec!["A".into()], vec![1.0, 2.0])
        .unwrap();
    let tl = RaceTimeline::new(&m, Some("%Y-%m-%d"), opts(2, 2)).unwrap();
    assert_eq!(tl.frame(FrameIndex(0)).unwrap().period_label, "2020-01-01");
    assert_eq!(tl.frame(FrameIndex(1)).unwrap().period_label, "2020-01-06");
    assert_eq!(tl.frame(FrameIndex(2)).unwrap().period_label, "2020-01-11");
}

#[test]
fn rejects_bad_inputs() {
    let m = matrix(&["A"], &[&[1.0], &[2.0]]);
    assert!(RaceTimeline::new(&m, None, opts(0, 2)).is_err());
    assert!(RaceTimeline::new(&m, None, opts(2, 0)).is_err());

    let tl = RaceTimeline::new(&m, None, opts(2, 2)).unwrap();
    assert!(tl.frame(FrameIndex(3)).is_err());

    let empty = PivotMatrix::from_parts(vec![], vec!["A".into()], vec![]).unwrap();
    assert!(RaceTimeline::new(&empty, None, opts(2, 2)).is_err());
}
