use chrono::TimeDelta;

use crate::chart::ease::Ease;
use crate::data::pivot::PivotMatrix;
use crate::data::time::TimeKey;
use crate::data::top_n::top_n_indices;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{RaceError, RaceResult};
use crate::foundation::math::lerp;

/// Animation options of a race.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaceOptions {
    /// Visible bar slots.
    pub n_bars: usize,
    /// Output frames between two consecutive periods.
    pub steps_per_period: u32,
    /// Wall-clock duration of one period in milliseconds.
    pub period_length_ms: u32,
    /// Curve shaping bar motion between periods.
    pub ease: Ease,
    /// Follow the largest visible value instead of the global maximum.
    pub dynamic_max: bool,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            n_bars: 15,
            steps_per_period: 8,
            period_length_ms: 500,
            ease: Ease::Linear,
            dynamic_max: false,
        }
    }
}

/// One visible bar of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BarState {
    /// Column of the matrix the bar belongs to (drives its color).
    pub column: usize,
    /// Entity name.
    pub entity: String,
    /// Interpolated value.
    pub value: f64,
    /// Interpolated slot, `0.0` is the top bar.
    pub slot: f64,
}

/// Everything the renderer needs for one output frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// Output frame index.
    pub index: FrameIndex,
    /// Visible bars, top to bottom.
    pub bars: Vec<BarState>,
    /// Text of the period label.
    pub period_label: String,
    /// Value mapped to the full axes width, before headroom. Always > 0.
    pub value_max: f64,
}

/// Frame-by-frame view of a prepared matrix.
///
/// Frame `f` sits between period `f / S` and the next one with fraction `(f % S) / S`; the last
/// period gets exactly one frame, so `P` periods yield `(P - 1) * S + 1` frames.
#[derive(Debug)]
pub struct RaceTimeline<'a> {
    matrix: &'a PivotMatrix,
    period_fmt: Option<&'a str>,
    opts: RaceOptions,
    fps: Fps,
    // Row-major `rows * cols`, clipped to `n_bars` (the hidden slot).
    slots: Vec<f64>,
    global_max: f64,
}

impl<'a> RaceTimeline<'a> {
    /// Rank every period of `matrix` and derive the output frame rate.
    pub fn new(
        matrix: &'a PivotMatrix,
        period_fmt: Option<&'a str>,
        opts: RaceOptions,
    ) -> RaceResult<Self> {
        if matrix.is_empty() {
            return Err(RaceError::validation("cannot animate an empty matrix"));
        }
        if opts.n_bars == 0 {
            return Err(RaceError::validation("n_bars must be > 0"));
        }
        let fps = Fps::from_period(opts.steps_per_period, opts.period_length_ms)?;

        let (rows, cols) = matrix.shape();
        let hidden = opts.n_bars as f64;
        let mut slots = vec![hidden; rows * cols];
        for r in 0..rows {
            let order = top_n_indices(matrix.row(r), opts.n_bars);
            for (pos, c) in order.into_iter().enumerate() {
                slots[r * cols + c] = pos as f64;
            }
        }

        Ok(Self {
            matrix,
            period_fmt,
            opts,
            fps,
            slots,
            global_max: matrix.max_value(),
        })
    }

    /// Total number of output frames.
    pub fn frame_count(&self) -> u64 {
        let periods = self.matrix.shape().0 as u64;
        (periods - 1) * u64::from(self.opts.steps_per_period) + 1
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Animation options.
    pub fn options(&self) -> &RaceOptions {
        &self.opts
    }

    /// Source matrix.
    pub fn matrix(&self) -> &PivotMatrix {
        self.matrix
    }

    fn slot(&self, row: usize, col: usize) -> f64 {
        self.slots[row * self.matrix.shape().1 + col]
    }

    /// Evaluate frame `idx`.
    pub fn frame(&self, idx: FrameIndex) -> RaceResult<FrameState> {
        let count = self.frame_count();
        if idx.0 >= count {
            return Err(RaceError::validation(format!(
                "frame {} out of range (race has {count} frames)",
                idx.0
            )));
        }

        let steps = u64::from(self.opts.steps_per_period);
        let last = self.matrix.shape().0 - 1;
        let period = (idx.0 / steps) as usize;
        let (a, b, frac) = if period >= last {
            (last, last, 0.0)
        } else {
            (period, period + 1, (idx.0 % steps) as f64 / steps as f64)
        };
        let t = self.opts.ease.apply(frac);

        let n_bars = self.opts.n_bars as f64;
        let mut bars: Vec<BarState> = self
            .matrix
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(c, entity)| {
                let slot = lerp(self.slot(a, c), self.slot(b, c), t);
                let value = lerp(self.matrix.get(a, c), self.matrix.get(b, c), t);
                (slot < n_bars && value > 0.0).then(|| BarState {
                    column: c,
                    entity: entity.clone(),
                    value,
                    slot,
                })
            })
            .collect();
        bars.sort_by(|x, y| x.slot.total_cmp(&y.slot).then(x.column.cmp(&y.column)));

        let value_max = if self.opts.dynamic_max {
            bars.iter().map(|b| b.value).fold(0.0, f64::max)
        } else {
            self.global_max
        };

        Ok(FrameState {
            index: idx,
            bars,
            period_label: self.period_label(a, b, frac),
            value_max: if value_max > 0.0 { value_max } else { 1.0 },
        })
    }

    // Time advances uniformly; easing only shapes bar motion.
    fn period_label(&self, a: usize, b: usize, frac: f64) -> String {
        let index = self.matrix.index();
        match (index[a].instant(), index[b].instant()) {
            (Some(ta), Some(tb)) => {
                let span = (tb - ta).num_milliseconds() as f64;
                let at = ta + TimeDelta::milliseconds((span * frac).round() as i64);
                TimeKey::Instant(at).label(self.period_fmt)
            }
            _ => index[a].label(self.period_fmt),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/timeline.rs"]
mod tests;
