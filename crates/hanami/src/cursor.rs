//! Spring-driven glyph that follows the mouse pointer.

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Largest integration step, keeps the stiff spring stable.
const MAX_STEP_SECS: f32 = 1.0 / 120.0;

/// Length of one pulse cycle.
const PULSE_PERIOD_SECS: f32 = 2.0;

/// Spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            stiffness: 300.0,
            damping: 20.0,
            mass: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Axis {
    position: f32,
    velocity: f32,
}

impl Axis {
    fn step(&mut self, target: f32, spring: Spring, dt: f32) {
        let force = -spring.stiffness * (self.position - target) - spring.damping * self.velocity;
        self.velocity += force / spring.mass.max(f32::EPSILON) * dt;
        self.position += self.velocity * dt;
    }
}

/// Glyph easing toward the last pointer position.
#[derive(Debug, Default)]
pub struct CursorFollower {
    spring: Spring,
    x: Axis,
    y: Axis,
    target: (f32, f32),
    /// Hidden until the first pointer event.
    visible: bool,
}

impl CursorFollower {
    pub fn new(spring: Spring) -> Self {
        Self {
            spring,
            ..Self::default()
        }
    }

    /// Point the follower at a terminal cell.
    pub fn set_target(&mut self, column: u16, row: u16) {
        self.target = (column as f32, row as f32);
        self.visible = true;
    }

    /// Advance the spring by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let mut remaining = dt.as_secs_f32().min(0.25);
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.x.step(self.target.0, self.spring, step);
            self.y.step(self.target.1, self.spring, step);
            remaining -= step;
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x.position, self.y.position)
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Scale of the breathing pulse, easing between 1.0 and 1.1.
    pub fn pulse(now: Duration) -> f32 {
        let phase = (now.as_secs_f32() % PULSE_PERIOD_SECS) / PULSE_PERIOD_SECS;
        1.0 + 0.05 * (1.0 - (phase * std::f32::consts::TAU).cos())
    }

    /// Draw the follower into `buf` if it lies inside `area`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, color: Color, now: Duration) {
        if !self.visible {
            return;
        }
        let (x, y) = self.position();
        let (x, y) = (x.round(), y.round());
        if x < area.x as f32 || y < area.y as f32 {
            return;
        }
        let (x, y) = (x as u16, y as u16);
        if x >= area.right() || y >= area.bottom() {
            return;
        }
        let glyph = if Self::pulse(now) > 1.05 { '❖' } else { '◆' };
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(glyph).set_fg(color);
        }
    }
}

/// Mouse capture for pointer tracking, released on drop.
#[derive(Debug)]
pub struct MouseCapture;

impl MouseCapture {
    pub fn enable() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        tracing::debug!("mouse capture enabled");
        Ok(Self)
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
        tracing::debug!("mouse capture released");
    }
}
