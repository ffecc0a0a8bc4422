//! Software rasteriser drawing the particle field as braille glyphs.
//!
//! Each terminal cell holds a 2×4 grid of braille dots. Paths are flattened
//! to polygons in dot space under the current affine transform and filled
//! with the even-odd rule; every dot keeps a colour and an ink level that
//! fills raise and fades lower.

use hanami_field::{DrawContext, Rgba, Surface};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Logical pixels per terminal cell, horizontally.
pub const CELL_WIDTH_PX: f32 = 8.0;
/// Logical pixels per terminal cell, vertically.
pub const CELL_HEIGHT_PX: f32 = 16.0;

const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

/// Braille bit for the dot at column `x`, row `y` of a cell.
const BRAILLE_BITS: [[u32; DOTS_Y]; DOTS_X] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Ink level below which a dot is not drawn.
const INK_THRESHOLD: f32 = 0.2;

const BEZIER_SEGMENTS: usize = 12;
const ARC_SEGMENTS_PER_TURN: f32 = 24.0;

/// 2D affine transform in canvas order: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += self.a * tx + self.c * ty;
        self.f += self.b * tx + self.d * ty;
    }

    fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.a *= sx;
        self.b *= sx;
        self.c *= sy;
        self.d *= sy;
    }
}

/// A terminal region the particle field is rasterised into.
#[derive(Debug)]
pub struct TerminalSurface {
    area: Rect,
    pixel_ratio: f32,
    backing: (u32, u32),
    dots_w: usize,
    dots_h: usize,
    background: Rgba,
    colors: Vec<Rgba>,
    ink: Vec<f32>,
    base: Affine,
    transform: Affine,
    stack: Vec<Affine>,
    /// Subpaths of the current path, in dot space.
    path: Vec<Vec<(f32, f32)>>,
}

impl TerminalSurface {
    pub fn new(pixel_ratio: f32, background: Rgba) -> Self {
        Self {
            area: Rect::default(),
            pixel_ratio,
            backing: (0, 0),
            dots_w: 0,
            dots_h: 0,
            background,
            colors: Vec::new(),
            ink: Vec::new(),
            base: Affine::scaling(0.0, 0.0),
            transform: Affine::scaling(0.0, 0.0),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Track the terminal area. Returns whether it changed.
    pub fn set_area(&mut self, area: Rect) -> bool {
        if area == self.area {
            return false;
        }
        self.area = area;
        self.dots_w = area.width as usize * DOTS_X;
        self.dots_h = area.height as usize * DOTS_Y;
        let dots = self.dots_w * self.dots_h;
        self.colors = vec![self.background; dots];
        self.ink = vec![0.0; dots];
        self.update_base();
        true
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    /// Ink level of a dot.
    #[cfg(test)]
    pub fn ink_at(&self, x: usize, y: usize) -> f32 {
        if x >= self.dots_w || y >= self.dots_h {
            return 0.0;
        }
        self.ink[y * self.dots_w + x]
    }

    fn update_base(&mut self) {
        let (bw, bh) = self.backing;
        let scale = |dots: usize, backing: u32| {
            if backing == 0 { 0.0 } else { dots as f32 / backing as f32 }
        };
        self.base = Affine::scaling(scale(self.dots_w, bw), scale(self.dots_h, bh));
        self.transform = self.base;
        self.stack.clear();
    }

    fn push_point(&mut self, x: f32, y: f32) {
        let point = self.transform.apply(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn current_point(&self) -> Option<(f32, f32)> {
        self.path.last().and_then(|subpath| subpath.last().copied())
    }

    /// Even-odd containment across every subpath of the current path.
    fn contains(&self, px: f32, py: f32) -> bool {
        let mut inside = false;
        for subpath in self.path.iter().filter(|s| s.len() >= 3) {
            let mut prev = subpath[subpath.len() - 1];
            for &(x, y) in subpath {
                let (x0, y0) = prev;
                if (y0 > py) != (y > py) {
                    let cross = x0 + (py - y0) * (x - x0) / (y - y0);
                    if px < cross {
                        inside = !inside;
                    }
                }
                prev = (x, y);
            }
        }
        inside
    }
}

impl Surface for TerminalSurface {
    fn display_size(&self) -> (f32, f32) {
        (
            self.area.width as f32 * CELL_WIDTH_PX,
            self.area.height as f32 * CELL_HEIGHT_PX,
        )
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.update_base();
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        Some(self)
    }
}

impl DrawContext for TerminalSurface {
    fn clear(&mut self) {
        self.ink.fill(0.0);
        self.colors.fill(self.background);
    }

    fn fade(&mut self, color: Rgba) {
        let keep = 1.0 - color.a.clamp(0.0, 1.0);
        for ink in &mut self.ink {
            *ink *= keep;
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform.translate(x, y);
    }

    fn rotate(&mut self, angle: f32) {
        self.transform.rotate(angle);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale(sx, sy);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let point = self.transform.apply(x, y);
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push_point(x, y);
    }

    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let Some(start) = self.current_point() else {
            self.move_to(x, y);
            return;
        };
        // Affine maps preserve beziers, so flatten in dot space.
        let c1 = self.transform.apply(c1x, c1y);
        let c2 = self.transform.apply(c2x, c2y);
        let end = self.transform.apply(x, y);
        if let Some(subpath) = self.path.last_mut() {
            for i in 1..=BEZIER_SEGMENTS {
                let t = i as f32 / BEZIER_SEGMENTS as f32;
                let u = 1.0 - t;
                let w0 = u * u * u;
                let w1 = 3.0 * u * u * t;
                let w2 = 3.0 * u * t * t;
                let w3 = t * t * t;
                subpath.push((
                    w0 * start.0 + w1 * c1.0 + w2 * c2.0 + w3 * end.0,
                    w0 * start.1 + w1 * c1.1 + w2 * c2.1 + w3 * end.1,
                ));
            }
        }
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        let sweep = end - start;
        let segments = ((sweep.abs() / std::f32::consts::TAU) * ARC_SEGMENTS_PER_TURN)
            .ceil()
            .max(4.0) as usize;
        for i in 0..=segments {
            let angle = start + sweep * i as f32 / segments as f32;
            self.push_point(cx + angle.cos() * radius, cy + angle.sin() * radius);
        }
    }

    fn close_path(&mut self) {
        if let Some(&first) = self.path.last().and_then(|subpath| subpath.first()) {
            self.path.push(vec![first]);
        }
    }

    fn fill(&mut self, color: Rgba) {
        let alpha = color.a.clamp(0.0, 1.0);
        if alpha <= 0.0 || self.dots_w == 0 || self.dots_h == 0 {
            return;
        }
        let points = self.path.iter().flatten();
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return;
        }

        let clamp_x = |v: f32| (v.max(0.0) as usize).min(self.dots_w - 1);
        let clamp_y = |v: f32| (v.max(0.0) as usize).min(self.dots_h - 1);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (x0, x1) = (clamp_x(min_x.floor()), clamp_x(max_x.ceil()));
        let (y0, y1) = (clamp_y(min_y.floor()), clamp_y(max_y.ceil()));
        let opaque = color.with_alpha(1.0);

        for y in y0..=y1 {
            for x in x0..=x1 {
                if !self.contains(x as f32 + 0.5, y as f32 + 0.5) {
                    continue;
                }
                let idx = y * self.dots_w + x;
                let ink = self.ink[idx];
                self.colors[idx] = if ink <= 0.0 {
                    opaque
                } else {
                    self.colors[idx].lerp(opaque, alpha)
                };
                self.ink[idx] = ink + alpha * (1.0 - ink);
            }
        }
    }
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb(rgba.r, rgba.g, rgba.b)
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        let bg = to_color(self.background);

        for row in 0..area.height.min(self.area.height) {
            for col in 0..area.width.min(self.area.width) {
                let mut bits = 0;
                let (mut r, mut g, mut b, mut ink_sum, mut lit) = (0.0, 0.0, 0.0, 0.0, 0.0_f32);
                for (dx, column_bits) in BRAILLE_BITS.iter().enumerate() {
                    for (dy, bit) in column_bits.iter().enumerate() {
                        let x = col as usize * DOTS_X + dx;
                        let y = row as usize * DOTS_Y + dy;
                        let idx = y * self.dots_w + x;
                        let ink = self.ink[idx];
                        if ink < INK_THRESHOLD {
                            continue;
                        }
                        let color = self.colors[idx];
                        bits |= bit;
                        r += color.r as f32;
                        g += color.g as f32;
                        b += color.b as f32;
                        ink_sum += ink;
                        lit += 1.0;
                    }
                }

                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                cell.set_bg(bg);
                if bits == 0 {
                    cell.set_char(' ');
                    continue;
                }
                let average = Rgba::rgb((r / lit) as u8, (g / lit) as u8, (b / lit) as u8);
                // Faint ink sinks toward the background so trails read as fading.
                let fg = self.background.lerp(average, (ink_sum / lit).clamp(0.0, 1.0));
                cell.set_char(char::from_u32(0x2800 + bits).unwrap_or(' '));
                cell.set_fg(to_color(fg));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(cols: u16, rows: u16) -> TerminalSurface {
        let mut surface = TerminalSurface::new(1.0, Rgba::BLACK);
        surface.set_area(Rect::new(0, 0, cols, rows));
        let (w, h) = surface.display_size();
        surface.set_backing_size(w as u32, h as u32);
        surface
    }

    fn fill_square(surface: &mut TerminalSurface, x: f32, y: f32, size: f32, alpha: f32) {
        surface.begin_path();
        surface.move_to(x, y);
        surface.line_to(x + size, y);
        surface.line_to(x + size, y + size);
        surface.line_to(x, y + size);
        surface.close_path();
        surface.fill(Rgba::WHITE.with_alpha(alpha));
    }

    #[test]
    fn test_display_size_in_logical_pixels() {
        let surface = surface(10, 5);
        assert_eq!(surface.display_size(), (80.0, 80.0));
    }

    #[test]
    fn test_fill_inks_covered_dots_only() {
        let mut surface = surface(10, 5);
        // 4 logical px per dot horizontally and vertically.
        fill_square(&mut surface, 0.0, 0.0, 16.0, 1.0);
        assert_eq!(surface.ink_at(0, 0), 1.0);
        assert_eq!(surface.ink_at(3, 3), 1.0);
        assert_eq!(surface.ink_at(4, 4), 0.0);
        assert_eq!(surface.ink_at(19, 19), 0.0);
    }

    #[test]
    fn test_fade_and_clear() {
        let mut surface = surface(4, 2);
        fill_square(&mut surface, 0.0, 0.0, 8.0, 1.0);
        surface.fade(Rgba::BLACK.with_alpha(0.5));
        assert!((surface.ink_at(0, 0) - 0.5).abs() < 1e-6);
        surface.clear();
        assert_eq!(surface.ink_at(0, 0), 0.0);
    }

    #[test]
    fn test_translucent_fill_accumulates() {
        let mut surface = surface(4, 2);
        fill_square(&mut surface, 0.0, 0.0, 8.0, 0.5);
        fill_square(&mut surface, 0.0, 0.0, 8.0, 0.5);
        assert!((surface.ink_at(0, 0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_transform_stack() {
        let mut surface = surface(10, 5);
        surface.save();
        surface.translate(40.0, 40.0);
        fill_square(&mut surface, -4.0, -4.0, 8.0, 1.0);
        surface.restore();
        fill_square(&mut surface, 0.0, 0.0, 4.0, 1.0);
        assert_eq!(surface.ink_at(10, 10), 1.0);
        assert_eq!(surface.ink_at(0, 0), 1.0);
    }

    #[test]
    fn test_arc_fills_disc() {
        let mut surface = surface(10, 5);
        surface.begin_path();
        surface.arc(40.0, 40.0, 12.0, 0.0, std::f32::consts::TAU);
        surface.fill(Rgba::WHITE);
        assert_eq!(surface.ink_at(10, 10), 1.0);
        assert_eq!(surface.ink_at(0, 0), 0.0);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let mut affine = Affine::scaling(1.0, 1.0);
        affine.rotate(std::f32::consts::FRAC_PI_2);
        let (x, y) = affine.apply(1.0, 0.0);
        assert!(x.abs() < 1e-6 && (y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_writes_braille_glyphs() {
        let mut surface = surface(2, 1);
        fill_square(&mut surface, 0.0, 0.0, 8.0, 1.0);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);

        // Left cell: dots (0,0),(1,0),(0,1),(1,1) lit.
        assert_eq!(buf[(0, 0)].symbol(), "\u{281B}");
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }

    #[test]
    fn test_offscreen_fill_is_ignored() {
        let mut surface = surface(4, 2);
        fill_square(&mut surface, -100.0, -100.0, 10.0, 1.0);
        fill_square(&mut surface, 500.0, 500.0, 10.0, 1.0);
        assert!((0..8).all(|x| (0..8).all(|y| surface.ink_at(x, y) == 0.0)));
    }
}
