/// Shape of the bar motion between two periods.
///
/// The timeline feeds the linear fraction of a frame between two periods through [`Ease::apply`]
/// before interpolating slots and values; the period label always uses the linear fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start, `t²`.
    InQuad,
    /// Slow finish.
    OutQuad,
    /// Slow start and finish.
    InOutQuad,
    /// Slower start, `t³`.
    InCubic,
    /// Slower finish.
    OutCubic,
    /// Slower start and finish.
    InOutCubic,
}

impl Ease {
    /// Map a linear fraction (clamped to `[0, 1]`) to the eased fraction. Endpoints are fixed.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => ease_in(t, 2),
            Self::OutQuad => ease_out(t, 2),
            Self::InOutQuad => ease_in_out(t, 2),
            Self::InCubic => ease_in(t, 3),
            Self::OutCubic => ease_out(t, 3),
            Self::InOutCubic => ease_in_out(t, 3),
        }
    }
}

fn ease_in(t: f64, power: i32) -> f64 {
    t.powi(power)
}

fn ease_out(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

// Mirror of `ease_in` around the midpoint.
fn ease_in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        ease_in(2.0 * t, power) / 2.0
    } else {
        1.0 - ease_in(2.0 - 2.0 * t, power) / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/ease.rs"]
mod tests;
