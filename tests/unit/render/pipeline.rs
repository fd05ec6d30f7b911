use std::sync::Arc;

use super::*;
use crate::chart::style::StylePreset;
use crate::data::time::{RawKey, TimeKey};
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps};

fn matrix() -> PivotMatrix {
    let key = |v: f64| {
        TimeKey::Raw(RawKey::Number {
            value: v,
            text: v.to_string(),
        })
    };
    PivotMatrix::from_parts(
        vec![key(1.0), key(2.0)],
        vec!["A".into(), "B".into()],
        vec![3.0, 1.0, 1.0, 4.0],
    )
    .unwrap()
}

fn chart() -> CpuChartRenderer {
    CpuChartRenderer::with_fontdb(
        ChartOpts {
            canvas: Canvas {
                width: 64,
                height: 36,
            },
            style: StylePreset::MinimalWhite.config(),
            ..ChartOpts::default()
        },
        2,
        Arc::new(usvg::fontdb::Database::new()),
    )
    .unwrap()
}

#[test]
fn every_frame_reaches_the_sink_in_order() {
    let m = matrix();
    let race = RaceOptions {
        n_bars: 2,
        steps_per_period: 2,
        period_length_ms: 500,
        ..RaceOptions::default()
    };
    let mut r = RaceRenderer::with_renderer(&m, None, race, chart()).unwrap();
    let mut sink = InMemorySink::new();
    let stats = r.render_to_sink(&mut sink).unwrap();

    assert_eq!(stats.frames_rendered, 3);
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (64, 36));
    assert_eq!(cfg.fps, Fps::new(4, 1).unwrap());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert!(sink.is_finished());
}

#[test]
fn single_frame_matches_sink_output() {
    let m = matrix();
    let race = RaceOptions {
        n_bars: 2,
        steps_per_period: 2,
        ..RaceOptions::default()
    };
    let mut r = RaceRenderer::with_renderer(&m, None, race, chart()).unwrap();
    let single = r.render_frame(FrameIndex(1)).unwrap();

    let mut sink = InMemorySink::new();
    r.render_to_sink(&mut sink).unwrap();
    assert_eq!(sink.frames()[1].1, single);
    assert!(r.render_frame(FrameIndex(3)).is_err());
}
