//! Particle state and field tuning.

use hanami_core::AnimationSpeed;

use crate::color::Rgba;
use crate::surface::Bounds;

/// A single decorative particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position in backing-store pixels.
    pub x: f32,
    /// Vertical position in backing-store pixels.
    pub y: f32,
    /// Base radius of the drawn shape.
    pub size: f32,
    /// Current velocity, pixels per frame.
    pub vx: f32,
    pub vy: f32,
    /// Resting velocity the current velocity eases back to after a burst.
    pub drift_vx: f32,
    pub drift_vy: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rotation added per frame.
    pub rotation_delta: f32,
    /// Oscillation phase offset, keeps neighbours out of step.
    pub phase: f32,
    /// Twinkle rate (radians per millisecond), stars only.
    pub twinkle_speed: f32,
    pub color: Rgba,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    pub scale: f32,
    pub target_scale: f32,
}

impl Particle {
    /// Whether the particle has left the bounds grown by `margin`.
    pub fn is_outside(&self, bounds: Bounds, margin: f32) -> bool {
        !bounds.contains_padded(self.x, self.y, margin)
    }
}

/// Tuning for the particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Backing-store pixel area per particle.
    pub density_divisor: f32,
    /// Motion multiplier.
    pub speed: AnimationSpeed,
    /// Lower clamp for `scale`.
    pub min_scale: f32,
    /// Upper clamp for `scale`.
    pub max_scale: f32,
    /// Fraction of the remaining distance covered per frame when easing
    /// scale and velocity.
    pub ease: f32,
    /// Distance past the canvas edge before a particle is recycled.
    pub edge_margin: f32,
    /// Radius around the centre that burst particles spawn in.
    pub burst_radius: f32,
    /// Outward speed range of burst particles, pixels per frame.
    pub burst_speed_min: f32,
    pub burst_speed_max: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: 20_000.0,
            speed: AnimationSpeed::default(),
            min_scale: 0.2,
            max_scale: 1.5,
            ease: 0.05,
            edge_margin: 20.0,
            burst_radius: 12.0,
            burst_speed_min: 2.0,
            burst_speed_max: 6.0,
        }
    }
}

impl FieldConfig {
    /// Number of particles for a field of the given size.
    ///
    /// Zero-area bounds or an unusable divisor give an empty field.
    pub fn particle_count(&self, bounds: Bounds) -> usize {
        if bounds.is_empty() || !self.density_divisor.is_finite() || self.density_divisor <= 0.0 {
            return 0;
        }
        let count = (bounds.width as f64 * bounds.height as f64) / self.density_divisor as f64;
        count.floor() as usize
    }

    /// Clamp a scale value into the configured range.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale.max(self.min_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_count_reference_canvas() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count(Bounds::new(800.0, 600.0)), 24);
    }

    #[test]
    fn test_particle_count_zero_area() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count(Bounds::new(0.0, 600.0)), 0);
        assert_eq!(config.particle_count(Bounds::new(800.0, 0.0)), 0);
    }

    #[test]
    fn test_particle_count_bad_divisor() {
        let config = FieldConfig {
            density_divisor: 0.0,
            ..FieldConfig::default()
        };
        assert_eq!(config.particle_count(Bounds::new(800.0, 600.0)), 0);
    }

    #[test]
    fn test_clamp_scale() {
        let config = FieldConfig::default();
        assert_eq!(config.clamp_scale(5.0), 1.5);
        assert_eq!(config.clamp_scale(0.0), 0.2);
        assert_eq!(config.clamp_scale(f32::NAN), 0.2);
    }
}
