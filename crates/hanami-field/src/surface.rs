//! Drawing surface abstraction.
//!
//! The animator never owns its canvas. It sizes the backing store through
//! [`Surface`] and draws through the immediate-mode [`DrawContext`], which
//! mirrors the subset of a 2D canvas API the particle shapes need.

use crate::color::Rgba;

/// A 2D immediate-mode drawing context.
///
/// Transform calls compose onto the current transform like a canvas 2D
/// context: the last call applies first to path coordinates.
pub trait DrawContext {
    /// Reset every pixel to the surface background.
    fn clear(&mut self);
    /// Paint `color` over the whole surface, blended by its alpha.
    fn fade(&mut self, color: Rgba);
    /// Push the current transform.
    fn save(&mut self);
    /// Pop the transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Start a new, empty path.
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    /// Cubic bezier from the current point through two control points.
    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32);
    /// Circular arc around `(cx, cy)` from `start` to `end` radians.
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);
    /// Fill the current path with `color` using the even-odd rule.
    fn fill(&mut self, color: Rgba);
}

/// An externally owned render target.
pub trait Surface {
    /// Displayed size in logical pixels.
    fn display_size(&self) -> (f32, f32);

    /// Backing-store pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Resize the backing store.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// The drawing context, if the surface can currently be drawn into.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

/// Backing-store dimensions the particle field lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Backing size for a display size and pixel ratio. Non-finite or
    /// negative inputs collapse to zero.
    pub fn from_display(width: f32, height: f32, dpr: f32) -> (u32, u32) {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let backing = |v: f32| {
            let scaled = (v * dpr).floor();
            if scaled.is_finite() && scaled > 0.0 {
                scaled.min(u32::MAX as f32) as u32
            } else {
                0
            }
        };
        (backing(width), backing(height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether `(x, y)` lies within the bounds grown by `margin` on each side.
    pub fn contains_padded(&self, x: f32, y: f32, margin: f32) -> bool {
        x >= -margin && x <= self.width + margin && y >= -margin && y <= self.height + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_display_scales_and_floors() {
        assert_eq!(Bounds::from_display(400.0, 300.0, 2.0), (800, 600));
        assert_eq!(Bounds::from_display(100.7, 50.2, 1.0), (100, 50));
    }

    #[test]
    fn test_from_display_tolerates_bad_input() {
        assert_eq!(Bounds::from_display(-10.0, 20.0, 1.0), (0, 20));
        assert_eq!(Bounds::from_display(f32::NAN, 20.0, 1.0), (0, 20));
        assert_eq!(Bounds::from_display(10.0, 20.0, 0.0), (10, 20));
    }

    #[test]
    fn test_contains_padded() {
        let b = Bounds::new(100.0, 50.0);
        assert!(b.contains_padded(-20.0, 70.0, 20.0));
        assert!(!b.contains_padded(-20.5, 10.0, 20.0));
        assert!(!b.contains_padded(10.0, 70.1, 20.0));
    }
}
