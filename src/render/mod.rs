//! CPU rendering of race frames.

/// Bar, grid and spine geometry plus the text overlay, rasterized on the CPU.
pub mod cpu;
/// Font database and font selection for text labels.
pub mod fonts;
/// Rendered frame buffers.
pub mod frame;
/// Chart geometry in pixels.
pub mod layout;
/// SVG text overlay.
pub mod overlay;
/// Frame loop: timeline → renderer → sink.
pub mod pipeline;
