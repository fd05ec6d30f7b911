use crate::foundation::error::{RaceError, RaceResult};

pub use kurbo::Rect;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Zero-based index of an output video frame.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open range of output frames.
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// Last frame (exclusive).
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> RaceResult<Self> {
        if start.0 > end.0 {
            return Err(RaceError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// `true` when the range holds no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// `true` when `f` lies inside the range.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Rational frames-per-second.
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, always > 0.
    pub den: u32,
}

impl Fps {
    /// Create a frame rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> RaceResult<Self> {
        if den == 0 {
            return Err(RaceError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(RaceError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frame rate that plays `steps_per_period` frames every `period_length_ms` milliseconds.
    ///
    /// The result is reduced, so 8 steps per 500 ms becomes `16/1`.
    pub fn from_period(steps_per_period: u32, period_length_ms: u32) -> RaceResult<Self> {
        if steps_per_period == 0 {
            return Err(RaceError::validation("steps_per_period must be > 0"));
        }
        if period_length_ms == 0 {
            return Err(RaceError::validation("period_length must be > 0"));
        }
        let num = u64::from(steps_per_period) * 1000;
        let den = u64::from(period_length_ms);
        let g = gcd(num, den);
        let num = u32::try_from(num / g)
            .map_err(|_| RaceError::validation("frame rate numerator overflows u32"))?;
        let den = u32::try_from(den / g)
            .map_err(|_| RaceError::validation("frame rate denominator overflows u32"))?;
        Self::new(num, den)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Seconds covered by `frames` frames.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output frame size in pixels.
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// 16x9 inches at 160 dpi.
    pub const DEFAULT: Canvas = Canvas {
        width: 2560,
        height: 1440,
    };

    /// Validate that both sides are non-zero, even and addressable by the raster backend.
    pub fn validate(self) -> RaceResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RaceError::validation("canvas width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(RaceError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(RaceError::validation("canvas width/height must fit in u16"));
        }
        Ok(())
    }
}

/// Straight-alpha RGBA8 color, serialized as `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `opacity` (0..=1).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional, case-insensitive).
    pub fn parse_hex(s: &str) -> RaceResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| -> RaceResult<u8> {
            let pair = s
                .get(i..i + 2)
                .ok_or_else(|| RaceError::validation(format!("invalid hex color \"#{s}\"")))?;
            u8::from_str_radix(pair, 16)
                .map_err(|_| RaceError::validation(format!("invalid hex byte \"{pair}\"")))
        };
        match s.len() {
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(RaceError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    /// CSS form used inside generated SVG (`#rrggbb`).
    pub fn to_css_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 float.
    pub fn alpha_f32(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        ))
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
