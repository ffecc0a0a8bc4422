//! Twinkling stars (dark theme).

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use rand::Rng;

use super::uniform;
use crate::color::{Rgba, hsl_to_rgb};
use crate::particle::Particle;
use crate::surface::{Bounds, DrawContext};

/// Number of star tips.
pub const POINTS: usize = 5;

/// Inner radius as a fraction of the outer radius.
const INNER_RATIO: f32 = 0.45;

/// Translucent black painted every frame so stars leave short trails.
pub const NIGHT_FADE: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 0.1,
};

/// Lowest opacity a star twinkles down to.
const MIN_ALPHA: f32 = 0.1;

pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Particle {
    let vx = uniform(rng, -0.05, 0.05);
    let vy = uniform(rng, -0.05, 0.05);
    let scale = uniform(rng, 0.85, 1.15);

    Particle {
        x: uniform(rng, 0.0, bounds.width),
        y: uniform(rng, 0.0, bounds.height),
        size: uniform(rng, 0.5, 2.0),
        vx,
        vy,
        drift_vx: vx,
        drift_vy: vy,
        rotation: uniform(rng, 0.0, TAU),
        rotation_delta: uniform(rng, -0.01, 0.01),
        phase: uniform(rng, 0.0, TAU),
        twinkle_speed: uniform(rng, 0.002, 0.004),
        color: hsl_to_rgb(220.0, 1.0, 0.8),
        opacity: uniform(rng, MIN_ALPHA, 1.0),
        scale,
        target_scale: scale,
    }
}

/// Slow vertical bob keyed to the clock and the star's column.
pub fn drift(particle: &mut Particle, now_secs: f32, speed: f32) {
    particle.y += (now_secs * 0.5 + particle.x * 0.01 + particle.phase).sin() * 0.05 * speed;
}

/// Random-walk twinkle: nudge the previous opacity, never below
/// [`MIN_ALPHA`].
pub fn opacity(particle: &Particle, now_secs: f32) -> f32 {
    let now_ms = now_secs * 1000.0;
    let alpha = particle.opacity + (now_ms * particle.twinkle_speed + particle.phase).sin() * 0.01;
    alpha.clamp(MIN_ALPHA, 1.0)
}

/// Closed polygon alternating outer tips and inner notches.
pub fn trace(ctx: &mut dyn DrawContext, size: f32) {
    let inner = size * INNER_RATIO;
    let step = PI / POINTS as f32;
    for i in 0..POINTS * 2 {
        let radius = if i % 2 == 0 { size } else { inner };
        let angle = i as f32 * step - FRAC_PI_2;
        let (x, y) = (angle.cos() * radius, angle.sin() * radius);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.close_path();
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_twinkle_never_drops_below_floor() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut p = spawn(&mut rng, Bounds::new(100.0, 100.0));
        p.opacity = MIN_ALPHA;
        for frame in 0..2_000 {
            p.opacity = opacity(&p, frame as f32 / 60.0);
            assert!((MIN_ALPHA..=1.0).contains(&p.opacity));
        }
    }

    #[test]
    fn test_star_colour_is_night_blue() {
        let mut rng = StdRng::seed_from_u64(4);
        let p = spawn(&mut rng, Bounds::new(100.0, 100.0));
        assert_eq!(p.color, hsl_to_rgb(220.0, 1.0, 0.8));
    }
}
