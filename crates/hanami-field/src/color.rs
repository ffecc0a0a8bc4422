//! Colour tokens for particle palettes.

/// An RGB colour with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with alpha replaced, clamped to `[0, 1]`.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) },
            ..self
        }
    }

    /// Linear blend from `self` toward `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Convert HSL (hue in degrees, saturation and lightness in `[0, 1]`) to an
/// opaque colour.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgba {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };
    let lightness = l - chroma / 2.0;
    let channel = |v: f32| ((v + lightness) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba::rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(1.7).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-0.2).a, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(f32::NAN).a, 0.0);
    }

    #[test]
    fn test_hsl_star_blue() {
        // hsl(220, 100%, 80%) is the night-sky star colour.
        let c = hsl_to_rgb(220.0, 1.0, 0.8);
        assert_eq!(c, Rgba::rgb(153, 187, 255));
    }

    #[test]
    fn test_hsl_channels_round_instead_of_truncating() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgba::rgb(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgba::rgb(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 1.0), Rgba::WHITE);
        assert_eq!(hsl_to_rgb(90.0, 0.0, 0.5), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_hsl_hue_wraps() {
        assert_eq!(hsl_to_rgb(580.0, 1.0, 0.8), hsl_to_rgb(220.0, 1.0, 0.8));
        assert_eq!(hsl_to_rgb(-140.0, 1.0, 0.8), hsl_to_rgb(220.0, 1.0, 0.8));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba::BLACK;
        let b = Rgba::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).r, 128);
    }
}
