//! Software render surface: a resizable pixel buffer.

use super::RenderSurface;
use super::particle::{ParticleRect, Rgb};

/// Largest canvas side in pixels. Larger requests are clamped.
pub const MAX_CANVAS_SIDE: usize = 8192;

/// A pixel buffer where unpainted pixels are transparent (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl Canvas {
    /// Create a blank canvas. Each side is clamped to [`MAX_CANVAS_SIDE`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    /// Resize the canvas. The contents are discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (width, height) = clamp_size(width, height);
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, None);
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, or `None` if transparent or out of bounds.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied().flatten()
    }

    /// Number of painted pixels.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }
}

fn clamp_size(width: usize, height: usize) -> (usize, usize) {
    let (clamped_w, clamped_h) = (width.min(MAX_CANVAS_SIDE), height.min(MAX_CANVAS_SIDE));
    if (clamped_w, clamped_h) != (width, height) {
        tracing::warn!(width, height, max = MAX_CANVAS_SIDE, "canvas size clamped");
    }
    (clamped_w, clamped_h)
}

impl RenderSurface for Canvas {
    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn fill_rect(&mut self, rect: &ParticleRect) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let radius = rect.bounding_radius();
        let min_x = (rect.x - radius).floor().max(0.0) as usize;
        let min_y = (rect.y - radius).floor().max(0.0) as usize;
        let max_x = ((rect.x + radius).ceil().max(0.0) as usize).min(self.width);
        let max_y = ((rect.y + radius).ceil().max(0.0) as usize).min(self.height);

        for py in min_y..max_y {
            for px in min_x..max_x {
                // Sample at the pixel center.
                if !rect.contains(px as f32 + 0.5, py as f32 + 0.5) {
                    continue;
                }
                if let Some(pixel) = self.pixels.get_mut(py * self.width + px) {
                    *pixel = Some(rect.color);
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celebration::PALETTE;

    fn rect_at(x: f32, y: f32, size: f32) -> ParticleRect {
        ParticleRect {
            x,
            y,
            size,
            rotation: 0.0,
            color: PALETTE[3],
        }
    }

    #[test]
    fn fill_paints_size_by_half_size() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_rect(&rect_at(20.0, 20.0, 10.0));

        assert_eq!(canvas.painted(), 10 * 5);
        assert_eq!(canvas.pixel(15, 15), Some(PALETTE[3]));
        assert_eq!(canvas.pixel(24, 19), Some(PALETTE[3]));
        assert_eq!(canvas.pixel(20, 20), None);
    }

    #[test]
    fn offscreen_rect_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(&rect_at(-50.0, -50.0, 12.0));
        canvas.fill_rect(&rect_at(500.0, 5.0, 12.0));
        assert!(canvas.is_blank());

        canvas.fill_rect(&rect_at(0.0, 3.0, 12.0));
        assert!(!canvas.is_blank());
    }

    #[test]
    fn clear_and_resize() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_rect(&rect_at(10.0, 10.0, 8.0));
        canvas.clear();
        assert!(canvas.is_blank());

        canvas.fill_rect(&rect_at(10.0, 10.0, 8.0));
        canvas.resize(5, 3);
        assert_eq!((canvas.width(), canvas.height()), (5, 3));
        assert!(canvas.is_blank());
        assert_eq!(canvas.pixel(5, 0), None);
    }

    #[test]
    fn oversized_canvas_is_clamped() {
        let mut canvas = Canvas::new(usize::MAX, 2);
        assert_eq!((canvas.width(), canvas.height()), (MAX_CANVAS_SIDE, 2));

        canvas.resize(3, usize::MAX);
        assert_eq!((canvas.width(), canvas.height()), (3, MAX_CANVAS_SIDE));
        assert!(canvas.is_blank());
    }

    #[test]
    fn zero_sized_canvas_ignores_draws() {
        let mut canvas = Canvas::new(0, 0);
        canvas.fill_rect(&rect_at(0.0, 0.0, 10.0));
        assert!(canvas.is_blank());
    }
}
