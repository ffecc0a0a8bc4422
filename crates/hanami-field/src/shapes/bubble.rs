//! Drifting bubbles (alternate theme).

use std::f32::consts::TAU;

use rand::Rng;

use super::{pick, uniform};
use crate::color::Rgba;
use crate::particle::Particle;
use crate::surface::{Bounds, DrawContext};

/// Pale greys matching the soft gradient backdrop.
pub const PALETTE: &[Rgba] = &[
    Rgba::WHITE,
    Rgba::rgb(229, 231, 235),
    Rgba::rgb(209, 213, 219),
];

pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Particle {
    let rise = uniform(rng, -0.6, -0.2);
    let scale = uniform(rng, 0.85, 1.15);

    Particle {
        x: uniform(rng, 0.0, bounds.width),
        y: uniform(rng, 0.0, bounds.height),
        size: uniform(rng, 1.0, 4.0),
        vx: 0.0,
        vy: rise,
        drift_vx: 0.0,
        drift_vy: rise,
        rotation: 0.0,
        rotation_delta: 0.0,
        phase: uniform(rng, 0.0, TAU),
        twinkle_speed: 0.0,
        color: pick(rng, PALETTE),
        opacity: 0.35,
        scale,
        target_scale: scale,
    }
}

/// Wobble sideways while rising.
pub fn drift(particle: &mut Particle, now_secs: f32, speed: f32) {
    particle.x += (now_secs * 1.2 + particle.y * 0.02 + particle.phase).sin() * 0.3 * speed;
}

pub fn opacity(particle: &Particle, now_secs: f32) -> f32 {
    0.35 + 0.15 * (now_secs * 0.8 + particle.phase).sin()
}

pub fn trace(ctx: &mut dyn DrawContext, size: f32) {
    ctx.arc(0.0, 0.0, size, 0.0, TAU);
}
