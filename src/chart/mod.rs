//! Chart model: easing, styles and the frame timeline of a race.

/// Easing curves applied to the in-between fraction of a period.
pub mod ease;
/// Style presets and JSON style overrides.
pub mod style;
/// Frame timeline: interpolated ranks, values and labels per output frame.
pub mod timeline;
