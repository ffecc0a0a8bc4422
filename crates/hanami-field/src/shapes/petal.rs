//! Falling cherry-blossom petals (light theme).

use std::f32::consts::{PI, TAU};

use rand::Rng;

use super::{Placement, pick, uniform};
use crate::color::Rgba;
use crate::particle::{FieldConfig, Particle};
use crate::surface::{Bounds, DrawContext};

/// Petal pinks, lightest first.
pub const PALETTE: &[Rgba] = &[
    Rgba::rgb(255, 228, 241),
    Rgba::rgb(255, 215, 235),
    Rgba::rgb(255, 192, 222),
];

/// Rotation added per frame.
const SPIN: f32 = 0.02;

pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: Bounds,
    placement: Placement,
    config: &FieldConfig,
) -> Particle {
    let x = uniform(rng, 0.0, bounds.width);
    let y = match placement {
        Placement::Scatter => uniform(rng, 0.0, bounds.height),
        // Just above the top edge so it drifts into view.
        Placement::Edge => -config.edge_margin,
    };
    let fall = uniform(rng, 0.5, 1.5);
    let scale = uniform(rng, 0.85, 1.15);

    Particle {
        x,
        y,
        size: uniform(rng, 2.0, 6.0),
        vx: 0.0,
        vy: fall,
        drift_vx: 0.0,
        drift_vy: fall,
        rotation: uniform(rng, 0.0, PI),
        rotation_delta: SPIN,
        phase: uniform(rng, 0.0, TAU),
        twinkle_speed: 0.0,
        color: pick(rng, PALETTE),
        opacity: 0.75,
        scale,
        target_scale: scale,
    }
}

/// Sway sideways as the petal falls.
pub fn drift(particle: &mut Particle, speed: f32) {
    particle.x += (particle.y * 0.03 + particle.phase).sin() * 0.5 * speed;
}

/// Gentle pulse between roughly 0.55 and 0.95.
pub fn opacity(particle: &Particle, now_secs: f32) -> f32 {
    0.75 + 0.2 * (now_secs * 1.5 + particle.phase).sin()
}

/// Two mirrored cubic curves meeting at the petal tip.
pub fn trace(ctx: &mut dyn DrawContext, size: f32) {
    ctx.move_to(0.0, 0.0);
    ctx.bezier_curve_to(size * 2.0, -size, size * 2.0, size, 0.0, size * 3.0);
    ctx.bezier_curve_to(-size * 2.0, size, -size * 2.0, -size, 0.0, 0.0);
    ctx.close_path();
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_edge_spawn_starts_above_canvas() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = FieldConfig::default();
        let p = spawn(&mut rng, Bounds::new(200.0, 100.0), Placement::Edge, &config);
        assert_eq!(p.y, -config.edge_margin);
        assert!(p.vy > 0.0);
        assert_eq!(p.vy, p.drift_vy);
    }

    #[test]
    fn test_opacity_stays_in_pulse_band() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = spawn(
            &mut rng,
            Bounds::new(200.0, 100.0),
            Placement::Scatter,
            &FieldConfig::default(),
        );
        for step in 0..100 {
            let alpha = opacity(&p, step as f32 * 0.1);
            assert!((0.54..=0.96).contains(&alpha));
        }
    }
}
