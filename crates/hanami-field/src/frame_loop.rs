//! Cancellable per-frame scheduling loop.

use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::animator::ParticleFieldAnimator;
use crate::surface::Surface;

/// Shared cancellation flag for a [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<RwLock<bool>>,
}

impl LoopHandle {
    fn new() -> Self {
        Self {
            running: Arc::new(RwLock::new(true)),
        }
    }

    /// Request the loop to stop. Idempotent.
    pub fn stop(&self) {
        if let Ok(mut running) = self.running.write() {
            *running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.read().map(|running| *running).unwrap_or(false)
    }
}

/// Source of display refreshes.
pub trait FrameTicker {
    /// Block until the next refresh and return its timestamp relative to the
    /// ticker's origin, or `None` once the display source has gone away.
    fn next_frame(&mut self) -> Option<Duration>;
}

/// Fixed-rate ticker sleeping until each frame deadline.
#[derive(Debug)]
pub struct IntervalTicker {
    origin: Instant,
    interval: Duration,
    deadline: Instant,
}

impl IntervalTicker {
    pub fn new(frame_rate: u32) -> Self {
        let interval = Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64);
        let origin = Instant::now();
        Self {
            origin,
            interval,
            deadline: origin,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next frame is due.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl FrameTicker for IntervalTicker {
    fn next_frame(&mut self) -> Option<Duration> {
        let wait = self.remaining();
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        let now = Instant::now();
        self.deadline += self.interval;
        // Drop frames rather than bursting to catch up after a stall.
        if self.deadline < now {
            self.deadline = now + self.interval;
        }
        Some(now.duration_since(self.origin))
    }
}

/// Drives a [`ParticleFieldAnimator`] once per display refresh until its
/// [`LoopHandle`] is stopped.
#[derive(Debug)]
pub struct FrameLoop<R> {
    animator: ParticleFieldAnimator<R>,
    handle: LoopHandle,
}

impl<R: Rng> FrameLoop<R> {
    pub fn new(animator: ParticleFieldAnimator<R>) -> Self {
        Self {
            animator,
            handle: LoopHandle::new(),
        }
    }

    /// A handle that can cancel this loop.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn animator(&self) -> &ParticleFieldAnimator<R> {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ParticleFieldAnimator<R> {
        &mut self.animator
    }

    /// Size the surface and seed the field.
    pub fn start(&mut self, surface: &mut dyn Surface) -> bool {
        self.handle.is_running() && self.animator.start(surface)
    }

    /// Run one frame if the loop is still live. Once the handle has been
    /// stopped the animator is stopped too and nothing else happens.
    pub fn tick(&mut self, surface: &mut dyn Surface, now: Duration) -> bool {
        if !self.handle.is_running() {
            self.animator.stop();
            return false;
        }
        self.animator.frame(surface, now)
    }

    /// Run frames from `ticker` until stopped or the ticker ends. Returns the
    /// number of frames run.
    ///
    /// This is the headless driver: it blocks on the ticker and owns nothing
    /// else. An event loop that also polls input calls [`start`](Self::start)
    /// and [`tick`](Self::tick) itself.
    pub fn run(&mut self, surface: &mut dyn Surface, ticker: &mut dyn FrameTicker) -> u64 {
        if !self.start(surface) {
            return 0;
        }
        let mut frames = 0;
        while self.handle.is_running() {
            let Some(now) = ticker.next_frame() else {
                break;
            };
            if !self.tick(surface, now) {
                break;
            }
            frames += 1;
        }
        self.stop();
        frames
    }

    /// Cancel the loop and stop the animator. Idempotent.
    pub fn stop(&mut self) {
        self.handle.stop();
        self.animator.stop();
    }
}

#[cfg(test)]
mod tests {
    use hanami_core::VisualTheme;

    use super::*;
    use crate::animator::AnimatorState;
    use crate::particle::FieldConfig;
    use crate::testing::{RecordingSurface, StepTicker};

    fn frame_loop() -> FrameLoop<rand::rngs::StdRng> {
        FrameLoop::new(ParticleFieldAnimator::seeded(
            VisualTheme::Light,
            FieldConfig::default(),
            3,
        ))
    }

    #[test]
    fn test_run_until_ticker_ends() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut ticker = StepTicker::new(Duration::from_millis(16)).with_limit(12);
        let mut frames = frame_loop();

        assert_eq!(frames.run(&mut surface, &mut ticker), 12);
        assert_eq!(frames.animator().frame_count(), 12);
        assert_eq!(surface.frames_rendered(), 12);
        assert_eq!(frames.animator().state(), AnimatorState::Stopped);
    }

    #[test]
    fn test_stop_from_handle_mid_run() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut frames = frame_loop();
        let mut ticker = StepTicker::new(Duration::from_millis(16)).stop_at(5, frames.handle());

        assert_eq!(frames.run(&mut surface, &mut ticker), 4);
        assert_eq!(frames.animator().frame_count(), 4);
        assert_eq!(surface.frames_rendered(), 4);

        // Further refreshes after stop change nothing.
        for _ in 0..20 {
            let now = ticker.next_frame().unwrap_or_default();
            assert!(!frames.tick(&mut surface, now));
        }
        assert_eq!(ticker.ticks(), 25);
        assert_eq!(frames.animator().frame_count(), 4);
        assert_eq!(surface.frames_rendered(), 4);
    }

    #[test]
    fn test_tick_after_handle_stop_stops_animator() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut frames = frame_loop();
        assert!(frames.start(&mut surface));
        assert!(frames.tick(&mut surface, Duration::ZERO));

        let handle = frames.handle();
        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
        assert!(!frames.tick(&mut surface, Duration::from_millis(16)));
        assert_eq!(frames.animator().state(), AnimatorState::Stopped);
        assert_eq!(frames.animator().frame_count(), 1);
    }

    #[test]
    fn test_run_without_context_does_nothing() {
        let mut surface = RecordingSurface::without_context(800.0, 600.0);
        let mut ticker = StepTicker::new(Duration::from_millis(16)).with_limit(5);
        let mut frames = frame_loop();

        assert_eq!(frames.run(&mut surface, &mut ticker), 0);
        assert_eq!(ticker.ticks(), 0);
        assert_eq!(frames.animator().state(), AnimatorState::Idle);
    }

    #[test]
    fn test_interval_ticker_is_monotonic() {
        let mut ticker = IntervalTicker::new(240);
        let first = ticker.next_frame().unwrap_or_default();
        let second = ticker.next_frame().unwrap_or_default();
        assert!(second > first);
        assert!(second - first >= ticker.interval() / 2);
        assert_eq!(IntervalTicker::new(0).interval(), Duration::from_secs(1));
    }
}
