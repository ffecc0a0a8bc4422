//! Decorative particle field animation for hanami.
//!
//! A [`ParticleFieldAnimator`] keeps a field of petals, stars or bubbles
//! (depending on the [`VisualTheme`](hanami_core::VisualTheme)) sized to a
//! [`Surface`] and redraws it through a [`DrawContext`] once per frame. The
//! [`FrameLoop`] drives it from any [`FrameTicker`] and stops cleanly through
//! a [`LoopHandle`].

mod animator;
mod color;
mod frame_loop;
mod particle;
mod shapes;
mod surface;
pub mod testing;

pub use animator::{AnimatorState, ParticleFieldAnimator};
pub use color::{Rgba, hsl_to_rgb};
pub use frame_loop::{FrameLoop, FrameTicker, IntervalTicker, LoopHandle};
pub use particle::{FieldConfig, Particle};
pub use shapes::{Backdrop, EdgePolicy, ParticleShape, Placement};
pub use surface::{Bounds, DrawContext, Surface};
