use crate::chart::style::StyleConfig;
use crate::foundation::core::{Canvas, Rect};

/// Extra room to the right of the largest bar so its value label stays inside the axes.
pub const AXIS_HEADROOM: f64 = 1.12;

/// Pixel geometry of a chart on a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Axes rectangle in pixels (y grows downward).
    pub axes: Rect,
    /// Height of one bar slot.
    pub slot_height: f64,
    /// Drawn bar thickness.
    pub bar_thickness: f64,
    px_per_pt: f64,
}

impl ChartLayout {
    /// Place the axes of `style` on `canvas` with `n_bars` slots.
    pub fn new(canvas: Canvas, style: &StyleConfig, n_bars: usize) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let a = style.axes;
        let axes = Rect::new(a.left * w, (1.0 - a.top) * h, a.right * w, (1.0 - a.bottom) * h);
        let slot_height = axes.height() / n_bars.max(1) as f64;
        Self {
            axes,
            slot_height,
            bar_thickness: slot_height * style.bar_size,
            // The canvas height stands for 9 inches.
            px_per_pt: h / 9.0 / 72.0,
        }
    }

    /// Convert typographic points to pixels.
    pub fn pt(&self, pt: f64) -> f64 {
        pt * self.px_per_pt
    }

    /// Vertical center of slot `slot` (fractional while a bar moves).
    pub fn slot_center_y(&self, slot: f64) -> f64 {
        self.axes.y0 + (slot + 0.5) * self.slot_height
    }

    /// Horizontal pixel of `value` on an axis spanning `0..=scale_max`.
    pub fn value_x(&self, value: f64, scale_max: f64) -> f64 {
        let frac = if scale_max > 0.0 { value / scale_max } else { 0.0 };
        self.axes.x0 + frac.clamp(0.0, 1.0) * self.axes.width()
    }

    /// Bar rectangle for a bar at `slot` with `value`.
    pub fn bar_rect(&self, slot: f64, value: f64, scale_max: f64) -> Rect {
        let cy = self.slot_center_y(slot);
        let half = self.bar_thickness / 2.0;
        Rect::new(self.axes.x0, cy - half, self.value_x(value, scale_max), cy + half)
    }
}

/// Grid positions in `(0, max]` on a 1/2/2.5/5 × 10ⁿ step, aiming for about `target` lines.
pub fn nice_ticks(max: f64, target: usize) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 || target == 0 {
        return Vec::new();
    }
    let raw = max / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);

    (1..)
        .map(|i| i as f64 * step)
        .take_while(|v| *v <= max * (1.0 + 1e-9))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
