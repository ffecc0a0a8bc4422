//! Per-theme particle shapes.
//!
//! Each theme maps to exactly one [`ParticleShape`], which owns everything
//! that varies between themes: spawning, secondary drift, opacity, edge
//! policy, backdrop and drawing.

pub mod bubble;
pub mod petal;
pub mod star;

use hanami_core::VisualTheme;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::Rgba;
use crate::particle::{FieldConfig, Particle};
use crate::surface::{Bounds, DrawContext};

/// Where a freshly spawned particle is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Uniformly over the whole canvas.
    Scatter,
    /// At the entry edge, for recycling.
    Edge,
}

/// What happens to a particle that leaves the padded bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Reappear at the opposite edge with the same state.
    Wrap,
    /// Replace with a freshly spawned particle at the entry edge.
    Respawn,
}

/// How the surface is prepared before particles are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    Clear,
    /// Paint a translucent colour over the previous frame, leaving trails.
    Fade(Rgba),
}

/// Shape strategy selected by the visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Petal,
    Star,
    Bubble,
}

impl ParticleShape {
    pub fn for_theme(theme: VisualTheme) -> Self {
        match theme {
            VisualTheme::Light => ParticleShape::Petal,
            VisualTheme::Dark => ParticleShape::Star,
            VisualTheme::Alternate => ParticleShape::Bubble,
        }
    }

    pub fn edge_policy(self) -> EdgePolicy {
        match self {
            ParticleShape::Petal => EdgePolicy::Respawn,
            ParticleShape::Star | ParticleShape::Bubble => EdgePolicy::Wrap,
        }
    }

    pub fn backdrop(self) -> Backdrop {
        match self {
            ParticleShape::Star => Backdrop::Fade(star::NIGHT_FADE),
            ParticleShape::Petal | ParticleShape::Bubble => Backdrop::Clear,
        }
    }

    /// Spawn a particle with randomised attributes.
    pub fn spawn<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        bounds: Bounds,
        placement: Placement,
        config: &FieldConfig,
    ) -> Particle {
        let mut particle = match self {
            ParticleShape::Petal => petal::spawn(rng, bounds, placement, config),
            ParticleShape::Star => star::spawn(rng, bounds),
            ParticleShape::Bubble => bubble::spawn(rng, bounds),
        };
        particle.target_scale = config.clamp_scale(particle.target_scale);
        particle.scale = config.clamp_scale(particle.scale);
        particle
    }

    /// Spawn a particle near the centre moving radially outward.
    pub fn spawn_burst<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        bounds: Bounds,
        config: &FieldConfig,
    ) -> Particle {
        let mut particle = self.spawn(rng, bounds, Placement::Scatter, config);
        let (cx, cy) = bounds.center();
        let angle = uniform(rng, 0.0, std::f32::consts::TAU);
        let radius = config.burst_radius.max(0.0);
        let distance = uniform(rng, radius * 0.05, radius);
        let speed = uniform(rng, config.burst_speed_min, config.burst_speed_max);
        let (sin, cos) = angle.sin_cos();

        particle.x = cx + cos * distance;
        particle.y = cy + sin * distance;
        particle.vx = cos * speed;
        particle.vy = sin * speed;
        particle.scale = config.min_scale;
        particle
    }

    /// Sideways or vertical oscillation applied after velocity integration.
    pub fn drift(self, particle: &mut Particle, now_secs: f32, speed: f32) {
        match self {
            ParticleShape::Petal => petal::drift(particle, speed),
            ParticleShape::Star => star::drift(particle, now_secs, speed),
            ParticleShape::Bubble => bubble::drift(particle, now_secs, speed),
        }
    }

    /// Opacity for the current frame, before clamping.
    pub fn opacity(self, particle: &Particle, now_secs: f32) -> f32 {
        match self {
            ParticleShape::Petal => petal::opacity(particle, now_secs),
            ParticleShape::Star => star::opacity(particle, now_secs),
            ParticleShape::Bubble => bubble::opacity(particle, now_secs),
        }
    }

    /// Draw one particle at its current transform.
    pub fn draw(self, particle: &Particle, ctx: &mut dyn DrawContext) {
        ctx.save();
        ctx.translate(particle.x, particle.y);
        ctx.rotate(particle.rotation);
        ctx.scale(particle.scale, particle.scale);
        ctx.begin_path();
        match self {
            ParticleShape::Petal => petal::trace(ctx, particle.size),
            ParticleShape::Star => star::trace(ctx, particle.size),
            ParticleShape::Bubble => bubble::trace(ctx, particle.size),
        }
        ctx.fill(particle.color.with_alpha(particle.opacity));
        ctx.restore();
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

pub(crate) fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Rgba]) -> Rgba {
    palette.choose(rng).copied().unwrap_or(Rgba::WHITE)
}
