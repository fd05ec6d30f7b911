//! rank-race renders bar chart race videos from long-form time-series CSV files.
//!
//! The pipeline is a straight line:
//!
//! - load `(time, entity, value)` rows and normalize the time column ([`data`])
//! - pivot to a time×entity matrix and keep the top N entities of every period ([`prepare`])
//! - evaluate interpolated frames ([`chart`]) and rasterize them on the CPU ([`render`])
//! - stream the frames into a [`FrameSink`], usually the system `ffmpeg` ([`encode`])
//!
//! [`collect`] builds month-end market capitalization CSVs in the same long format.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Easing, styles and the frame timeline.
pub mod chart;
/// Month-end market capitalization collection.
pub mod collect;
/// CSV loading, time normalization, pivoting and top-N filtering.
pub mod data;
/// Frame sinks (MP4 via `ffmpeg`, in-memory).
pub mod encode;
/// Data preparation entry points.
pub mod prepare;
/// CPU rendering.
pub mod render;

pub use chart::ease::Ease;
pub use chart::style::{StyleConfig, StylePreset};
pub use chart::timeline::{FrameState, RaceOptions, RaceTimeline};
pub use data::pivot::PivotMatrix;
pub use data::table::ColumnSpec;
pub use data::time::{TimeOptions, TimeUnit};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rect, Rgba8};
pub use foundation::error::{RaceError, RaceResult};
pub use foundation::math::format_thousands;
pub use prepare::{PrepareOpts, PreparedRace, prepare_csv, prepare_rows};
pub use render::cpu::{ChartOpts, CpuChartRenderer};
pub use render::frame::FrameRGBA;
pub use render::pipeline::{RaceRenderer, RenderStats};
