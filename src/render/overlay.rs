//! Text overlay: every label of a frame is emitted as one SVG document and rasterized by `resvg`.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{RaceError, RaceResult};
use crate::render::fonts::{css_family_list, make_font_resolver};

/// Horizontal anchor of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// `x` is the left edge.
    Start,
    /// `x` is the center.
    Middle,
    /// `x` is the right edge.
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One label.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    /// Anchor x in pixels.
    pub x: f64,
    /// Baseline y in pixels.
    pub y: f64,
    /// Font size in pixels.
    pub size_px: f64,
    /// Fill color.
    pub color: Rgba8,
    /// Horizontal anchor.
    pub anchor: Anchor,
    /// Bold weight.
    pub bold: bool,
    /// Unescaped text.
    pub text: String,
}

impl TextItem {
    /// Label whose visual middle sits on `center_y`.
    pub fn centered_at(
        x: f64,
        center_y: f64,
        size_px: f64,
        color: Rgba8,
        anchor: Anchor,
        text: impl Into<String>,
    ) -> Self {
        Self {
            x,
            y: center_y + 0.35 * size_px,
            size_px,
            color,
            anchor,
            bold: false,
            text: text.into(),
        }
    }
}

/// Escape text for use inside SVG character data and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// SVG document of `items` on a transparent `width`×`height` canvas.
pub fn overlay_svg(width: u32, height: u32, font_family: &str, items: &[TextItem]) -> String {
    let mut svg = String::with_capacity(256 + items.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{}">"#,
        escape_xml(&css_family_list(font_family))
    );
    for item in items {
        if item.text.is_empty() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="{}" fill="{}""#,
            item.x,
            item.y,
            item.size_px,
            item.anchor.as_svg(),
            item.color.to_css_rgb()
        );
        if item.color.a != 255 {
            let _ = write!(svg, r#" fill-opacity="{:.3}""#, item.color.alpha_f32());
        }
        if item.bold {
            svg.push_str(r#" font-weight="bold""#);
        }
        let _ = write!(svg, ">{}</text>", escape_xml(&item.text));
    }
    svg.push_str("</svg>");
    svg
}

/// Rasterize an overlay document into premultiplied RGBA8 bytes of `width`×`height`.
pub fn rasterize_overlay(
    svg: &str,
    width: u32,
    height: u32,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> RaceResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb: Arc::clone(fontdb),
        font_resolver: make_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse overlay svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RaceError::render("failed to allocate overlay pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
