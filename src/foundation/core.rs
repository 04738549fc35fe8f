use crate::foundation::error::{ReelError, ReelResult};

/// Zero-based frame number derived from a playback time: `floor(time * fps)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert a decimal rate as reported by media probing (`29.97`, `25.0`).
    ///
    /// Whole rates keep a denominator of 1; fractional rates are expressed in thousandths.
    pub fn from_f64(rate: f64) -> ReelResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ReelError::validation(format!("invalid frame rate {rate}")));
        }
        if rate.fract() == 0.0 && rate <= f64::from(u32::MAX) {
            return Self::new(rate as u32, 1);
        }
        let num = (rate * 1000.0).round();
        if num < 1.0 || num > f64::from(u32::MAX) {
            return Err(ReelError::validation(format!("invalid frame rate {rate}")));
        }
        Self::new(num as u32, 1000)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    pub fn frame_at(self, secs: f64) -> FrameIndex {
        FrameIndex(self.secs_to_frames_floor(secs))
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Pixel dimensions of the project canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn rect(self) -> kurbo::Rect {
        kurbo::Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or the keyword `transparent`.
    pub fn parse(s: &str) -> ReelResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ReelError::validation(format!("color '{s}' must start with '#'")))?;
        let nibble = |c: u8| -> ReelResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| ReelError::validation(format!("invalid hex digit in color '{s}'")))
        };
        let b = hex.as_bytes();
        match b.len() {
            3 => {
                let r = nibble(b[0])?;
                let g = nibble(b[1])?;
                let bl = nibble(b[2])?;
                Ok(Self::opaque(r * 17, g * 17, bl * 17))
            }
            6 | 8 => {
                let byte = |i: usize| -> ReelResult<u8> { Ok(nibble(b[i])? << 4 | nibble(b[i + 1])?) };
                let a = if b.len() == 8 { byte(6)? } else { 255 };
                Ok(Self {
                    r: byte(0)?,
                    g: byte(2)?,
                    b: byte(4)?,
                    a,
                })
            }
            _ => Err(ReelError::validation(format!(
                "color '{s}' must have 3, 6 or 8 hex digits"
            ))),
        }
    }

    /// Scale alpha by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Largest rect with the aspect ratio of `src` that fits inside `bounds`, centered.
pub fn contain_rect(src_w: u32, src_h: u32, bounds: kurbo::Rect) -> kurbo::Rect {
    if src_w == 0 || src_h == 0 {
        return kurbo::Rect::from_origin_size(bounds.center(), (0.0, 0.0));
    }
    let scale = (bounds.width() / f64::from(src_w)).min(bounds.height() / f64::from(src_h));
    let size = kurbo::Size::new(f64::from(src_w) * scale, f64::from(src_h) * scale);
    kurbo::Rect::from_center_size(bounds.center(), size)
}

/// Smallest rect with the aspect ratio of `src` that covers `bounds`, centered.
pub fn cover_rect(src_w: u32, src_h: u32, bounds: kurbo::Rect) -> kurbo::Rect {
    if src_w == 0 || src_h == 0 {
        return bounds;
    }
    let scale = (bounds.width() / f64::from(src_w)).max(bounds.height() / f64::from(src_h));
    let size = kurbo::Size::new(f64::from(src_w) * scale, f64::from(src_h) * scale);
    kurbo::Rect::from_center_size(bounds.center(), size)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
