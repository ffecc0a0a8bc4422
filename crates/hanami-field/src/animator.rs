//! Particle field animator state machine.

use std::f32::consts::TAU;
use std::time::Duration;

use hanami_core::{AnimationSpeed, VisualTheme};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::particle::{FieldConfig, Particle};
use crate::shapes::{Backdrop, EdgePolicy, ParticleShape, Placement};
use crate::surface::{Bounds, DrawContext, Surface};

/// Lifecycle of an animator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimatorState {
    /// Surface not sized yet, no particles.
    #[default]
    Idle,
    /// Advancing and rendering every frame.
    Running,
    /// Terminal. No further mutation.
    Stopped,
}

/// Maintains a bounded field of decorative particles and redraws it every
/// frame.
#[derive(Debug)]
pub struct ParticleFieldAnimator<R = StdRng> {
    state: AnimatorState,
    /// Theme most recently requested.
    theme: VisualTheme,
    /// Shape the current particles were seeded with.
    shape: ParticleShape,
    /// A burst reseed is due on the next frame.
    pending_burst: bool,
    config: FieldConfig,
    particles: Vec<Particle>,
    bounds: Bounds,
    rng: R,
    frame_count: u64,
    burst_count: u64,
}

impl ParticleFieldAnimator<StdRng> {
    /// Create an animator seeded from system entropy.
    pub fn new(theme: VisualTheme, config: FieldConfig) -> Self {
        Self::with_rng(theme, config, StdRng::from_entropy())
    }

    /// Create an animator with a reproducible field.
    pub fn seeded(theme: VisualTheme, config: FieldConfig, seed: u64) -> Self {
        Self::with_rng(theme, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleFieldAnimator<R> {
    /// Create an animator drawing randomness from `rng`.
    pub fn with_rng(theme: VisualTheme, config: FieldConfig, rng: R) -> Self {
        Self {
            state: AnimatorState::Idle,
            theme,
            shape: ParticleShape::for_theme(theme),
            pending_burst: false,
            config,
            particles: Vec::new(),
            bounds: Bounds::default(),
            rng,
            frame_count: 0,
            burst_count: 0,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn theme(&self) -> VisualTheme {
        self.theme
    }

    /// Shape used for the particles currently in the field.
    pub fn shape(&self) -> ParticleShape {
        self.shape
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of burst reseeds performed so far.
    pub fn burst_count(&self) -> u64 {
        self.burst_count
    }

    /// Whether a burst reseed is waiting for the next frame.
    pub fn is_reseeding(&self) -> bool {
        self.state == AnimatorState::Running && self.pending_burst
    }

    /// Recompute the backing-store resolution from the surface's displayed
    /// size and pixel ratio.
    pub fn resize(&mut self, surface: &mut dyn Surface) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        let (width, height) = surface.display_size();
        let (backing_w, backing_h) =
            Bounds::from_display(width, height, surface.device_pixel_ratio());
        surface.set_backing_size(backing_w, backing_h);
        self.bounds = Bounds::new(backing_w as f32, backing_h as f32);
        tracing::debug!(width = backing_w, height = backing_h, "resized particle surface");
    }

    /// Resize and reseed, as on a viewport resize notification.
    pub fn handle_resize(&mut self, surface: &mut dyn Surface) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        self.resize(surface);
        self.seed_field(false);
    }

    /// Repopulate the field for the current bounds.
    ///
    /// A normal seed scatters particles uniformly. A burst seed spawns every
    /// particle near the centre with outward velocity.
    pub fn seed_field(&mut self, burst: bool) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        let count = self.config.particle_count(self.bounds);
        self.particles.truncate(count);

        for index in 0..count {
            let particle = if burst {
                self.shape.spawn_burst(&mut self.rng, self.bounds, &self.config)
            } else {
                self.shape
                    .spawn(&mut self.rng, self.bounds, Placement::Scatter, &self.config)
            };
            match self.particles.get_mut(index) {
                Some(slot) => *slot = particle,
                None => self.particles.push(particle),
            }
        }
        tracing::debug!(count, burst, shape = ?self.shape, "seeded particle field");
    }

    /// Advance every particle by one frame. `now` is a monotonic timestamp
    /// driving the oscillation and twinkle terms.
    pub fn advance_frame(&mut self, now: Duration) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        let now_secs = now.as_secs_f32();
        let speed = self.config.speed.multiplier();
        let margin = self.config.edge_margin.max(0.0);
        let shape = self.shape;
        let bounds = self.bounds;

        for particle in &mut self.particles {
            step(shape, particle, now_secs, speed, &self.config);
            if particle.is_outside(bounds, margin) {
                match shape.edge_policy() {
                    EdgePolicy::Wrap => wrap(particle, bounds, margin),
                    EdgePolicy::Respawn => {
                        *particle = shape.spawn(&mut self.rng, bounds, Placement::Edge, &self.config)
                    }
                }
            }
        }
        self.frame_count += 1;
    }

    /// Prepare the surface and draw every particle.
    pub fn render_frame(&self, ctx: &mut dyn DrawContext) {
        match self.shape.backdrop() {
            Backdrop::Clear => ctx.clear(),
            Backdrop::Fade(color) => ctx.fade(color),
        }
        for particle in &self.particles {
            self.shape.draw(particle, ctx);
        }
    }

    /// Size the surface, seed the field and enter [`AnimatorState::Running`].
    ///
    /// A surface without a drawing context leaves the animator idle; the
    /// decoration simply does not appear. Returns whether the animator is
    /// running afterwards.
    pub fn start(&mut self, surface: &mut dyn Surface) -> bool {
        match self.state {
            AnimatorState::Running => return true,
            AnimatorState::Stopped => return false,
            AnimatorState::Idle => {}
        }
        if surface.context().is_none() {
            tracing::debug!("no drawing context, particle field disabled");
            return false;
        }
        self.state = AnimatorState::Running;
        self.handle_resize(surface);
        tracing::info!(theme = %self.theme, particles = self.particles.len(), "particle field started");
        true
    }

    /// Stop animating and discard the field. Idempotent.
    pub fn stop(&mut self) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        self.state = AnimatorState::Stopped;
        self.pending_burst = false;
        self.particles.clear();
        tracing::info!(frames = self.frame_count, "particle field stopped");
    }

    /// Run one logical frame: pending reseed, advance, render.
    ///
    /// Returns `false` without touching any state unless running.
    pub fn frame(&mut self, surface: &mut dyn Surface, now: Duration) -> bool {
        if self.state != AnimatorState::Running {
            return false;
        }
        if self.pending_burst {
            self.pending_burst = false;
            self.shape = ParticleShape::for_theme(self.theme);
            self.seed_field(true);
            self.burst_count += 1;
        }
        self.advance_frame(now);
        match surface.context() {
            Some(ctx) => self.render_frame(ctx),
            None => tracing::trace!("drawing context unavailable, frame not rendered"),
        }
        true
    }

    /// Switch theme. While running, the next frame reseeds the field with a
    /// burst in the new theme's shape.
    pub fn set_theme(&mut self, theme: VisualTheme) {
        match self.state {
            AnimatorState::Stopped => {}
            AnimatorState::Idle => {
                self.theme = theme;
                self.shape = ParticleShape::for_theme(theme);
            }
            AnimatorState::Running => {
                if theme != self.theme {
                    tracing::info!(from = %self.theme, to = %theme, "theme changed");
                    self.theme = theme;
                    self.pending_burst = true;
                }
            }
        }
    }

    /// Request a burst reseed in the current theme.
    pub fn burst(&mut self) {
        if self.state == AnimatorState::Running {
            self.pending_burst = true;
        }
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.config.speed = speed;
    }
}

/// Integrate one particle: velocity, drift, rotation, easing, opacity.
fn step(shape: ParticleShape, p: &mut Particle, now_secs: f32, speed: f32, config: &FieldConfig) {
    let ease = config.ease.clamp(0.0, 1.0);

    p.vx += (p.drift_vx - p.vx) * ease;
    p.vy += (p.drift_vy - p.vy) * ease;
    p.x += p.vx * speed;
    p.y += p.vy * speed;
    shape.drift(p, now_secs, speed);

    p.rotation = (p.rotation + p.rotation_delta * speed).rem_euclid(TAU);
    p.scale = config.clamp_scale(p.scale + (p.target_scale - p.scale) * ease);

    let opacity = shape.opacity(p, now_secs);
    p.opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
}

/// Move a particle that left the padded bounds to the opposite edge.
fn wrap(p: &mut Particle, bounds: Bounds, margin: f32) {
    if p.x < -margin {
        p.x = bounds.width + margin;
    } else if p.x > bounds.width + margin {
        p.x = -margin;
    }
    if p.y < -margin {
        p.y = bounds.height + margin;
    } else if p.y > bounds.height + margin {
        p.y = -margin;
    }
}
