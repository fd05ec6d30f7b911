use std::path::PathBuf;

use crate::chart::timeline::{RaceOptions, RaceTimeline};
use crate::data::pivot::PivotMatrix;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::RaceResult;
use crate::render::cpu::{ChartOpts, CpuChartRenderer};
use crate::render::frame::FrameRGBA;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Rendering counters.
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
}

/// Timeline plus renderer: turns frame indices into pixels.
#[derive(Debug)]
pub struct RaceRenderer<'a> {
    timeline: RaceTimeline<'a>,
    chart: CpuChartRenderer,
}

impl<'a> RaceRenderer<'a> {
    /// Build the timeline of `matrix` and a renderer for it.
    pub fn new(
        matrix: &'a PivotMatrix,
        period_fmt: Option<&'a str>,
        race: RaceOptions,
        chart: ChartOpts,
    ) -> RaceResult<Self> {
        let timeline = RaceTimeline::new(matrix, period_fmt, race)?;
        let chart = CpuChartRenderer::new(chart, race.n_bars)?;
        Ok(Self { timeline, chart })
    }

    /// Like [`Self::new`] with an already built renderer (shares its fonts).
    pub fn with_renderer(
        matrix: &'a PivotMatrix,
        period_fmt: Option<&'a str>,
        race: RaceOptions,
        chart: CpuChartRenderer,
    ) -> RaceResult<Self> {
        let timeline = RaceTimeline::new(matrix, period_fmt, race)?;
        Ok(Self { timeline, chart })
    }

    /// Frame timeline.
    pub fn timeline(&self) -> &RaceTimeline<'a> {
        &self.timeline
    }

    /// Every frame of the race.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.timeline.frame_count()),
        }
    }

    /// Evaluate and rasterize a single frame.
    pub fn render_frame(&mut self, idx: FrameIndex) -> RaceResult<FrameRGBA> {
        let state = self.timeline.frame(idx)?;
        self.chart.render(&state)
    }

    /// Render every frame into `sink` in timeline order.
    pub fn render_to_sink(&mut self, sink: &mut dyn FrameSink) -> RaceResult<RenderStats> {
        let range = self.full_range();
        let canvas = self.chart.opts().canvas;
        let fps = self.timeline.fps();
        tracing::info!(
            frames = range.len_frames(),
            fps = fps.as_f64(),
            seconds = fps.frames_to_secs(range.len_frames()),
            "rendering race"
        );

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
        })?;
        let mut stats = RenderStats::default();
        for f in range.start.0..range.end.0 {
            let frame = self.render_frame(FrameIndex(f))?;
            sink.push_frame(FrameIndex(f), &frame)?;
            stats.frames_rendered += 1;
            if stats.frames_rendered.is_multiple_of(100) {
                tracing::debug!(done = stats.frames_rendered, total = range.len_frames(), "frames");
            }
        }
        sink.end()?;
        Ok(stats)
    }

    /// Render the race to an MP4 via the system `ffmpeg`, flattening over the style background.
    pub fn render_to_mp4(
        &mut self,
        out_path: impl Into<PathBuf>,
        overwrite: bool,
    ) -> RaceResult<RenderStats> {
        let out_path = out_path.into();
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out_path.clone(),
            overwrite,
            background: self.chart.opts().style.background,
        });
        let stats = self.render_to_sink(&mut sink)?;
        tracing::info!(path = %out_path.display(), "wrote video");
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
