use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{RaceError, RaceResult};

/// Built-in chart styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Warm paper background with pastel bars.
    #[default]
    PastelWood,
    /// Dark navy background with saturated bars.
    DeepNavy,
    /// Near-white background with muted bars.
    MinimalWhite,
}

impl StylePreset {
    /// All presets, in CLI listing order.
    pub const ALL: [StylePreset; 3] = [Self::PastelWood, Self::DeepNavy, Self::MinimalWhite];

    /// Name used on the command line and in style files.
    pub fn name(self) -> &'static str {
        match self {
            Self::PastelWood => "pastel_wood",
            Self::DeepNavy => "deep_navy",
            Self::MinimalWhite => "minimal_white",
        }
    }

    /// Full style of this preset.
    pub fn config(self) -> StyleConfig {
        match self {
            Self::PastelWood => pastel_wood(),
            Self::DeepNavy => deep_navy(),
            Self::MinimalWhite => minimal_white(),
        }
    }
}

impl FromStr for StylePreset {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                RaceError::validation(format!("unknown style '{s}'; expected one of {names:?}"))
            })
    }
}

/// Axes placement as figure fractions, measured from the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxesFractions {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

/// Everything that controls how a frame looks.
///
/// Font sizes are typographic points; the renderer maps them to pixels with the canvas height
/// standing for 9 inches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Figure and axes background.
    pub background: Rgba8,
    /// Title color.
    pub title_color: Rgba8,
    /// Period label color.
    pub period_label_color: Rgba8,
    /// Entity labels left of the bars.
    pub entity_label_color: Rgba8,
    /// Value labels right of the bars.
    pub value_label_color: Rgba8,
    /// Vertical grid lines, alpha included.
    pub grid_color: Rgba8,
    /// Left spine.
    pub spine_color: Rgba8,
    /// CSS-like font family list.
    pub font_family: String,
    /// Axes placement.
    pub axes: AxesFractions,
    /// Title baseline region, as a figure fraction from the bottom (top edge of the text).
    pub title_y: f64,
    /// Title size in points.
    pub title_size: f64,
    /// Period label size in points.
    pub period_label_size: f64,
    /// Period label anchor in axes fractions (right-aligned, vertically centered).
    pub period_label_x: f64,
    /// See [`Self::period_label_x`].
    pub period_label_y: f64,
    /// Value label size in points.
    pub value_label_size: f64,
    /// Entity label size in points.
    pub entity_label_size: f64,
    /// Gap between the axes and the entity labels, in points.
    pub entity_label_pad: f64,
    /// Bar thickness as a fraction of its slot.
    pub bar_size: f64,
    /// Bar opacity.
    pub bar_opacity: f64,
    /// Grid line width in points.
    pub grid_width: f64,
    /// Left spine width in points; `0` hides it.
    pub spine_width: f64,
    /// Bar colors, assigned by column index and cycled.
    pub palette: Vec<Rgba8>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StylePreset::default().config()
    }
}

impl StyleConfig {
    /// Color of the bar for column `col`.
    pub fn bar_color(&self, col: usize) -> Rgba8 {
        if self.palette.is_empty() {
            return self.entity_label_color;
        }
        self.palette[col % self.palette.len()]
    }

    /// Check ranges the renderer relies on.
    pub fn validate(&self) -> RaceResult<()> {
        let a = self.axes;
        if !(0.0..=1.0).contains(&a.left)
            || !(0.0..=1.0).contains(&a.right)
            || !(0.0..=1.0).contains(&a.top)
            || !(0.0..=1.0).contains(&a.bottom)
            || a.left >= a.right
            || a.bottom >= a.top
        {
            return Err(RaceError::validation(format!(
                "axes fractions must satisfy 0 <= left < right <= 1 and 0 <= bottom < top <= 1, \
                 got {a:?}"
            )));
        }
        if !(self.bar_size > 0.0 && self.bar_size <= 1.0) {
            return Err(RaceError::validation("bar_size must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.bar_opacity) {
            return Err(RaceError::validation("bar_opacity must be in [0, 1]"));
        }
        let sizes = [
            self.title_size,
            self.period_label_size,
            self.value_label_size,
            self.entity_label_size,
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(RaceError::validation("font sizes must be finite and > 0"));
        }
        if self.font_family.trim().is_empty() {
            return Err(RaceError::validation("font_family must not be empty"));
        }
        Ok(())
    }

    /// Parse a JSON style document on top of `base`.
    ///
    /// The document is an object with any subset of the [`StyleConfig`] fields plus an optional
    /// `"base"` preset name that replaces `base`. Nested objects (`axes`) merge field by field.
    pub fn from_json(text: &str, base: StylePreset) -> RaceResult<Self> {
        let mut doc: serde_json::Value =
            serde_json::from_str(text).context("parse style json")?;
        let serde_json::Value::Object(obj) = &mut doc else {
            return Err(RaceError::validation("style json must be an object"));
        };

        let base = match obj.remove("base") {
            Some(serde_json::Value::String(name)) => name.parse()?,
            Some(other) => {
                return Err(RaceError::validation(format!(
                    "style \"base\" must be a preset name, got {other}"
                )));
            }
            None => base,
        };

        let mut merged = serde_json::to_value(base.config()).context("serialize base style")?;
        merge_json(&mut merged, doc);
        let style: StyleConfig = serde_json::from_value(merged).context("decode style json")?;
        style.validate()?;
        Ok(style)
    }

    /// Read a JSON style file, see [`Self::from_json`].
    pub fn from_path(path: &Path, base: StylePreset) -> RaceResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read style file '{}'", path.display()))?;
        let style = Self::from_json(&text, base)?;
        tracing::debug!(path = %path.display(), "loaded style file");
        Ok(style)
    }
}

fn merge_json(dst: &mut serde_json::Value, src: serde_json::Value) {
    match (dst, src) {
        (serde_json::Value::Object(d), serde_json::Value::Object(s)) => {
            for (k, v) in s {
                match d.get_mut(&k) {
                    Some(slot) => merge_json(slot, v),
                    None => {
                        d.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

const FONT_FAMILY: &str = "NanumGothic, Noto Sans CJK KR, sans-serif";

/// Color Brewer `Pastel1`.
pub const PASTEL1: [Rgba8; 9] = [
    Rgba8::rgb(0xfb, 0xb4, 0xae),
    Rgba8::rgb(0xb3, 0xcd, 0xe3),
    Rgba8::rgb(0xcc, 0xeb, 0xc5),
    Rgba8::rgb(0xde, 0xcb, 0xe4),
    Rgba8::rgb(0xfe, 0xd9, 0xa6),
    Rgba8::rgb(0xff, 0xff, 0xcc),
    Rgba8::rgb(0xe5, 0xd8, 0xbd),
    Rgba8::rgb(0xfd, 0xda, 0xec),
    Rgba8::rgb(0xf2, 0xf2, 0xf2),
];

/// Color Brewer `Set2`.
pub const SET2: [Rgba8; 8] = [
    Rgba8::rgb(0x66, 0xc2, 0xa5),
    Rgba8::rgb(0xfc, 0x8d, 0x62),
    Rgba8::rgb(0x8d, 0xa0, 0xcb),
    Rgba8::rgb(0xe7, 0x8a, 0xc3),
    Rgba8::rgb(0xa6, 0xd8, 0x54),
    Rgba8::rgb(0xff, 0xd9, 0x2f),
    Rgba8::rgb(0xe5, 0xc4, 0x94),
    Rgba8::rgb(0xb3, 0xb3, 0xb3),
];

/// `tab20c`: five hue groups of four shades.
pub const TAB20C: [Rgba8; 20] = [
    Rgba8::rgb(0x31, 0x82, 0xbd),
    Rgba8::rgb(0x6b, 0xae, 0xd6),
    Rgba8::rgb(0x9e, 0xca, 0xe1),
    Rgba8::rgb(0xc6, 0xdb, 0xef),
    Rgba8::rgb(0xe6, 0x55, 0x0d),
    Rgba8::rgb(0xfd, 0x8d, 0x3c),
    Rgba8::rgb(0xfd, 0xae, 0x6b),
    Rgba8::rgb(0xfd, 0xd0, 0xa2),
    Rgba8::rgb(0x31, 0xa3, 0x54),
    Rgba8::rgb(0x74, 0xc4, 0x76),
    Rgba8::rgb(0xa1, 0xd9, 0x9b),
    Rgba8::rgb(0xc7, 0xe9, 0xc0),
    Rgba8::rgb(0x75, 0x6b, 0xb1),
    Rgba8::rgb(0x9e, 0x9a, 0xc8),
    Rgba8::rgb(0xbc, 0xbd, 0xdc),
    Rgba8::rgb(0xda, 0xda, 0xeb),
    Rgba8::rgb(0x63, 0x63, 0x63),
    Rgba8::rgb(0x96, 0x96, 0x96),
    Rgba8::rgb(0xbd, 0xbd, 0xbd),
    Rgba8::rgb(0xd9, 0xd9, 0xd9),
];

fn pastel_wood() -> StyleConfig {
    let text = Rgba8::rgb(0x3b, 0x3a, 0x36);
    StyleConfig {
        background: Rgba8::rgb(0xf6, 0xf1, 0xe9),
        title_color: text,
        period_label_color: text,
        entity_label_color: text,
        value_label_color: Rgba8::rgb(0x6b, 0x61, 0x57),
        grid_color: Rgba8::rgb(0xd7, 0xca, 0xbb).with_opacity(0.25),
        spine_color: Rgba8::rgb(0xe0, 0xd8, 0xcc),
        font_family: FONT_FAMILY.to_string(),
        axes: AxesFractions {
            left: 0.10,
            right: 0.97,
            top: 0.80,
            bottom: 0.12,
        },
        title_y: 0.92,
        title_size: 34.0,
        period_label_size: 28.0,
        period_label_x: 0.95,
        period_label_y: 0.13,
        value_label_size: 18.0,
        entity_label_size: 18.0,
        entity_label_pad: 14.0,
        bar_size: 0.78,
        bar_opacity: 0.94,
        grid_width: 0.8,
        spine_width: 0.8,
        palette: PASTEL1.to_vec(),
    }
}

fn deep_navy() -> StyleConfig {
    let text = Rgba8::rgb(0xe5, 0xe7, 0xeb);
    StyleConfig {
        background: Rgba8::rgb(0x02, 0x06, 0x17),
        title_color: text,
        period_label_color: text,
        entity_label_color: text,
        value_label_color: text,
        grid_color: text.with_opacity(0.12),
        spine_color: Rgba8::rgb(0x02, 0x06, 0x17),
        font_family: FONT_FAMILY.to_string(),
        axes: AxesFractions {
            left: 0.26,
            right: 0.97,
            top: 0.82,
            bottom: 0.12,
        },
        title_y: 0.92,
        title_size: 32.0,
        period_label_size: 30.0,
        period_label_x: 0.95,
        period_label_y: 0.13,
        value_label_size: 18.0,
        entity_label_size: 18.0,
        entity_label_pad: 10.0,
        bar_size: 0.90,
        bar_opacity: 0.94,
        grid_width: 0.8,
        spine_width: 0.0,
        palette: TAB20C.to_vec(),
    }
}

fn minimal_white() -> StyleConfig {
    let text = Rgba8::rgb(0x11, 0x18, 0x27);
    StyleConfig {
        background: Rgba8::rgb(0xf9, 0xfa, 0xfb),
        title_color: text,
        period_label_color: text,
        entity_label_color: text,
        value_label_color: Rgba8::rgb(0x6b, 0x72, 0x80),
        grid_color: text.with_opacity(0.08),
        spine_color: Rgba8::rgb(0xe5, 0xe7, 0xeb),
        font_family: FONT_FAMILY.to_string(),
        axes: AxesFractions {
            left: 0.24,
            right: 0.96,
            top: 0.80,
            bottom: 0.12,
        },
        title_y: 0.92,
        title_size: 32.0,
        period_label_size: 28.0,
        period_label_x: 0.95,
        period_label_y: 0.14,
        value_label_size: 18.0,
        entity_label_size: 18.0,
        entity_label_pad: 10.0,
        bar_size: 0.88,
        bar_opacity: 0.94,
        grid_width: 0.8,
        spine_width: 0.8,
        palette: SET2.to_vec(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/style.rs"]
mod tests;
