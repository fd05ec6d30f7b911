use std::path::PathBuf;
use std::sync::Arc;

use crate::chart::style::StyleConfig;
use crate::chart::timeline::FrameState;
use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::error::{RaceError, RaceResult};
use crate::foundation::math::format_thousands;
use crate::render::fonts::{build_fontdb, report_font_choice};
use crate::render::frame::FrameRGBA;
use crate::render::layout::{AXIS_HEADROOM, ChartLayout, nice_ticks};
use crate::render::overlay::{Anchor, TextItem, overlay_svg, rasterize_overlay};

/// Static (per-race) rendering options.
#[derive(Clone, Debug)]
pub struct ChartOpts {
    /// Output size.
    pub canvas: Canvas,
    /// Visual style.
    pub style: StyleConfig,
    /// Title drawn above the axes.
    pub title: String,
    /// Value labels show `value / value_divisor`.
    pub value_divisor: f64,
    /// Decimals of value labels.
    pub value_decimals: usize,
    /// Extra font directories.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for ChartOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::DEFAULT,
            style: StyleConfig::default(),
            title: "Rank Race".to_string(),
            value_divisor: 1.0,
            value_decimals: 0,
            font_dirs: Vec::new(),
        }
    }
}

/// CPU renderer for bar chart race frames.
///
/// Geometry goes through `vello_cpu`; the labels are rasterized by `resvg` into one overlay image
/// painted on top.
pub struct CpuChartRenderer {
    opts: ChartOpts,
    layout: ChartLayout,
    fontdb: Arc<usvg::fontdb::Database>,
    ctx: Option<vello_cpu::RenderContext>,
    width: u16,
    height: u16,
}

impl std::fmt::Debug for CpuChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuChartRenderer")
            .field("canvas", &self.opts.canvas)
            .field("layout", &self.layout)
            .field("font_faces", &self.fontdb.len())
            .finish_non_exhaustive()
    }
}

impl CpuChartRenderer {
    /// Validate options and load fonts; the axes hold `n_bars` slots.
    pub fn new(opts: ChartOpts, n_bars: usize) -> RaceResult<Self> {
        let fontdb = build_fontdb(&opts.font_dirs);
        Self::with_fontdb(opts, n_bars, fontdb)
    }

    /// Like [`Self::new`] with an already built font database.
    pub fn with_fontdb(
        opts: ChartOpts,
        n_bars: usize,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> RaceResult<Self> {
        opts.canvas.validate()?;
        opts.style.validate()?;
        if n_bars == 0 {
            return Err(RaceError::validation("n_bars must be > 0"));
        }
        if !opts.value_divisor.is_finite() || opts.value_divisor == 0.0 {
            return Err(RaceError::validation(
                "value_divisor must be finite and non-zero",
            ));
        }
        let width = u16::try_from(opts.canvas.width)
            .map_err(|_| RaceError::validation("canvas width exceeds u16"))?;
        let height = u16::try_from(opts.canvas.height)
            .map_err(|_| RaceError::validation("canvas height exceeds u16"))?;

        report_font_choice(&fontdb, &opts.style.font_family);
        let layout = ChartLayout::new(opts.canvas, &opts.style, n_bars);
        Ok(Self {
            opts,
            layout,
            fontdb,
            ctx: None,
            width,
            height,
        })
    }

    /// Pixel geometry in use.
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Rendering options in use.
    pub fn opts(&self) -> &ChartOpts {
        &self.opts
    }

    /// Text of the value label for `value`.
    pub fn value_label(&self, value: f64) -> String {
        format_thousands(value / self.opts.value_divisor, self.opts.value_decimals)
    }

    /// Rasterize one frame.
    pub fn render(&mut self, frame: &FrameState) -> RaceResult<FrameRGBA> {
        let overlay = self.overlay_image(frame)?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        self.draw_geometry(&mut ctx, frame);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(overlay);
        ctx.fill_rect(&self.canvas_rect());

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: self.opts.canvas.width,
            height: self.opts.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn canvas_rect(&self) -> vello_cpu::kurbo::Rect {
        vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.opts.canvas.width),
            f64::from(self.opts.canvas.height),
        )
    }

    fn draw_geometry(&self, ctx: &mut vello_cpu::RenderContext, frame: &FrameState) {
        let style = &self.opts.style;
        let layout = &self.layout;
        let axes = layout.axes;
        let scale_max = frame.value_max * AXIS_HEADROOM;

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        set_color(ctx, style.background);
        ctx.fill_rect(&self.canvas_rect());

        let grid_w = layout.pt(style.grid_width).max(1.0);
        if style.grid_color.a > 0 {
            set_color(ctx, style.grid_color);
            for tick in nice_ticks(scale_max, 5) {
                let x = layout.value_x(tick, scale_max);
                fill(ctx, Rect::new(x - grid_w / 2.0, axes.y0, x + grid_w / 2.0, axes.y1));
            }
        }

        for bar in &frame.bars {
            let color = style.bar_color(bar.column).with_opacity(style.bar_opacity);
            set_color(ctx, color);
            fill(ctx, layout.bar_rect(bar.slot, bar.value, scale_max));
        }

        if style.spine_width > 0.0 {
            let w = layout.pt(style.spine_width).max(1.0);
            set_color(ctx, style.spine_color);
            fill(ctx, Rect::new(axes.x0 - w, axes.y0, axes.x0, axes.y1));
        }
    }

    fn overlay_image(&self, frame: &FrameState) -> RaceResult<vello_cpu::Image> {
        let svg = overlay_svg(
            self.opts.canvas.width,
            self.opts.canvas.height,
            &self.opts.style.font_family,
            &self.text_items(frame),
        );
        let rgba = rasterize_overlay(
            &svg,
            self.opts.canvas.width,
            self.opts.canvas.height,
            &self.fontdb,
        )?;
        rgba_premul_to_image(&rgba, self.opts.canvas.width, self.opts.canvas.height)
    }

    /// Every label of `frame`, in paint order.
    pub fn text_items(&self, frame: &FrameState) -> Vec<TextItem> {
        let style = &self.opts.style;
        let layout = &self.layout;
        let axes = layout.axes;
        let canvas_w = f64::from(self.opts.canvas.width);
        let canvas_h = f64::from(self.opts.canvas.height);
        let scale_max = frame.value_max * AXIS_HEADROOM;

        let mut items = Vec::with_capacity(frame.bars.len() * 2 + 2);

        let title_px = layout.pt(style.title_size);
        items.push(TextItem {
            x: canvas_w / 2.0,
            // `title_y` marks the top of the text.
            y: (1.0 - style.title_y) * canvas_h + 0.8 * title_px,
            size_px: title_px,
            color: style.title_color,
            anchor: Anchor::Middle,
            bold: true,
            text: self.opts.title.clone(),
        });

        let entity_px = layout.pt(style.entity_label_size);
        let value_px = layout.pt(style.value_label_size);
        let entity_x = axes.x0 - layout.pt(style.entity_label_pad);
        let value_pad = layout.pt(4.0);
        for bar in &frame.bars {
            let cy = layout.slot_center_y(bar.slot);
            items.push(TextItem::centered_at(
                entity_x,
                cy,
                entity_px,
                style.entity_label_color,
                Anchor::End,
                bar.entity.as_str(),
            ));
            items.push(TextItem::centered_at(
                layout.value_x(bar.value, scale_max) + value_pad,
                cy,
                value_px,
                style.value_label_color,
                Anchor::Start,
                self.value_label(bar.value),
            ));
        }

        let period_px = layout.pt(style.period_label_size);
        items.push(TextItem {
            bold: true,
            ..TextItem::centered_at(
                axes.x0 + style.period_label_x * axes.width(),
                axes.y1 - style.period_label_y * axes.height(),
                period_px,
                style.period_label_color,
                Anchor::End,
                frame.period_label.as_str(),
            )
        });

        items
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn fill(ctx: &mut vello_cpu::RenderContext, r: Rect) {
    if r.width() <= 0.0 || r.height() <= 0.0 {
        return;
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RaceResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RaceError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RaceError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RaceError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> RaceResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
