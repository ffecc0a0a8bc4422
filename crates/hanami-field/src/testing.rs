//! Test doubles for surfaces and frame sources.

use std::time::Duration;

use crate::color::Rgba;
use crate::frame_loop::{FrameTicker, LoopHandle};
use crate::surface::{DrawContext, Surface};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fade(Rgba),
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate(f32),
    Scale { sx: f32, sy: f32 },
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    BezierCurveTo { c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32 },
    Arc { cx: f32, cy: f32, radius: f32, start: f32, end: f32 },
    ClosePath,
    Fill(Rgba),
}

/// A drawing context that records every call.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames drawn, counted by their clear/fade prologue.
    pub fn frames(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear | DrawCommand::Fade(_)))
            .count()
    }
}

impl DrawContext for RecordingContext {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fade(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fade(color));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.commands.push(DrawCommand::BezierCurveTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        });
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill(color));
    }
}

/// An in-memory surface with a recording context.
#[derive(Debug)]
pub struct RecordingSurface {
    display: (f32, f32),
    pixel_ratio: f32,
    backing: Option<(u32, u32)>,
    context: Option<RecordingContext>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            display: (width, height),
            pixel_ratio: 1.0,
            backing: None,
            context: Some(RecordingContext::default()),
        }
    }

    /// A surface whose drawing context is unavailable.
    pub fn without_context(width: f32, height: f32) -> Self {
        Self {
            context: None,
            ..Self::new(width, height)
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = (width, height);
    }

    /// Backing size set by the last resize, if any.
    pub fn backing_size(&self) -> Option<(u32, u32)> {
        self.backing
    }

    pub fn commands(&self) -> &[DrawCommand] {
        self.context.as_ref().map(|c| c.commands()).unwrap_or_default()
    }

    pub fn clear_commands(&mut self) {
        if let Some(context) = self.context.as_mut() {
            context.commands.clear();
        }
    }

    /// Frames drawn since the last [`clear_commands`](Self::clear_commands).
    pub fn frames_rendered(&self) -> usize {
        self.context.as_ref().map(|c| c.frames()).unwrap_or(0)
    }
}

impl Surface for RecordingSurface {
    fn display_size(&self) -> (f32, f32) {
        self.display
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = Some((width, height));
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        self.context.as_mut().map(|c| c as &mut dyn DrawContext)
    }
}

/// A frame source that advances a fake clock by a fixed step per refresh.
#[derive(Debug)]
pub struct StepTicker {
    step: Duration,
    now: Duration,
    ticks: u64,
    limit: Option<u64>,
    stop_at: Option<(u64, LoopHandle)>,
}

impl StepTicker {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            ticks: 0,
            limit: None,
            stop_at: None,
        }
    }

    /// End the display source after `limit` refreshes.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Stop `handle` during refresh number `tick` (1-based), before the
    /// frame is delivered.
    pub fn stop_at(mut self, tick: u64, handle: LoopHandle) -> Self {
        self.stop_at = Some((tick, handle));
        self
    }

    /// Refreshes requested so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl FrameTicker for StepTicker {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.limit.is_some_and(|limit| self.ticks >= limit) {
            return None;
        }
        self.ticks += 1;
        if let Some((tick, handle)) = &self.stop_at
            && *tick == self.ticks
        {
            handle.stop();
        }
        self.now = self.now.saturating_add(self.step);
        Some(self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_ticker_accumulates_and_saturates() {
        let mut ticker = StepTicker::new(Duration::from_millis(16)).with_limit(3);
        let stamps: Vec<_> = std::iter::from_fn(|| ticker.next_frame()).collect();
        assert_eq!(stamps, [16, 32, 48].map(Duration::from_millis).to_vec());
        assert_eq!(ticker.ticks(), 3);

        let mut ticker = StepTicker::new(Duration::MAX);
        assert_eq!(ticker.next_frame(), Some(Duration::MAX));
        assert_eq!(ticker.next_frame(), Some(Duration::MAX));
    }
}
