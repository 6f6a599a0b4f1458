//! # Celebration Renderer
//!
//! Decorative confetti. A trigger spawns a batch of [`PARTICLE_COUNT`]
//! particles above the viewport; each frame draws every live particle and then
//! advances it by one constant-velocity step. A batch lives for exactly
//! [`FRAME_BUDGET`] frames, after which it is dropped and the surface cleared.
//!
//! Triggers never fail. Overlapping triggers run independent batches on the
//! same surface.

#![allow(clippy::float_arithmetic)]

mod canvas;
mod particle;

pub use canvas::{Canvas, MAX_CANVAS_SIDE};
pub use particle::{PALETTE, Particle, ParticleRect, Rgb};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Particles spawned per trigger.
pub const PARTICLE_COUNT: usize = 150;

/// Frames drawn per batch before it is dropped.
pub const FRAME_BUDGET: u32 = 180;

/// Anything particles can be drawn onto.
pub trait RenderSurface {
    /// Erase the whole surface.
    fn clear(&mut self);

    /// Paint one particle rectangle.
    fn fill_rect(&mut self, rect: &ParticleRect);
}

/// One trigger's worth of particles.
#[derive(Debug, Clone)]
pub struct ParticleBatch {
    particles: Vec<Particle>,
    frames: u32,
}

impl ParticleBatch {
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn is_spent(&self) -> bool {
        self.frames >= FRAME_BUDGET
    }
}

/// Drives confetti batches frame by frame.
#[derive(Debug, Clone)]
pub struct CelebrationRenderer {
    rng: StdRng,
    batches: Vec<ParticleBatch>,
}

impl Default for CelebrationRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CelebrationRenderer {
    /// Create a renderer seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            batches: Vec::new(),
        }
    }

    /// Create a renderer with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            batches: Vec::new(),
        }
    }

    /// Start a new batch for a `width × height` viewport.
    ///
    /// Returns the number of particles spawned: [`PARTICLE_COUNT`], or zero
    /// when the viewport is empty, negative or not finite.
    pub fn trigger(&mut self, width: f32, height: f32) -> usize {
        let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !valid {
            tracing::debug!(width, height, "ignoring celebration for malformed viewport");
            return 0;
        }

        let particles: Vec<Particle> = (0..PARTICLE_COUNT)
            .map(|_| Particle::spawn(&mut self.rng, width, height))
            .collect();

        self.batches.push(ParticleBatch {
            particles,
            frames: 0,
        });
        tracing::debug!(batches = self.batches.len(), "celebration triggered");
        PARTICLE_COUNT
    }

    /// Render one frame of every live batch.
    ///
    /// Returns `true` while any batch still has frames left to draw.
    pub fn frame<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.batches.is_empty() {
            return false;
        }

        surface.clear();
        for batch in &mut self.batches {
            for particle in &mut batch.particles {
                surface.fill_rect(&particle.rect());
                particle.step();
            }
            batch.frames += 1;
        }

        self.batches.retain(|batch| !batch.is_spent());
        if self.batches.is_empty() {
            surface.clear();
        }

        self.is_active()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.batches.is_empty()
    }

    /// Live batches, oldest first.
    #[must_use]
    pub fn batches(&self) -> &[ParticleBatch] {
        &self.batches
    }

    /// Particle count of each live batch.
    #[must_use]
    pub fn particle_counts(&self) -> Vec<usize> {
        self.batches.iter().map(|b| b.particles.len()).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface that only counts calls.
    #[derive(Default)]
    struct Recorder {
        clears: usize,
        rects: usize,
    }

    impl RenderSurface for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill_rect(&mut self, _rect: &ParticleRect) {
            self.rects += 1;
        }
    }

    #[test]
    fn trigger_spawns_full_batch() {
        let mut renderer = CelebrationRenderer::with_seed(1);
        assert_eq!(renderer.trigger(1280.0, 720.0), PARTICLE_COUNT);
        assert_eq!(renderer.particle_counts(), vec![PARTICLE_COUNT]);
        assert!(renderer.is_active());
    }

    #[test]
    fn malformed_viewport_spawns_nothing() {
        let mut renderer = CelebrationRenderer::with_seed(1);
        for (w, h) in [
            (0.0, 600.0),
            (800.0, 0.0),
            (-1.0, 600.0),
            (f32::NAN, 600.0),
            (800.0, f32::INFINITY),
        ] {
            assert_eq!(renderer.trigger(w, h), 0);
        }
        assert!(!renderer.is_active());
    }

    #[test]
    fn batch_runs_exactly_frame_budget() {
        let mut renderer = CelebrationRenderer::with_seed(2);
        let mut surface = Recorder::default();
        renderer.trigger(400.0, 300.0);

        let mut frames = 0;
        while renderer.frame(&mut surface) {
            frames += 1;
        }
        frames += 1;

        assert_eq!(frames, FRAME_BUDGET as usize);
        assert_eq!(surface.rects, PARTICLE_COUNT * FRAME_BUDGET as usize);
        // One clear per frame plus the final wipe.
        assert_eq!(surface.clears, FRAME_BUDGET as usize + 1);
        assert!(!renderer.frame(&mut surface));
    }

    #[test]
    fn overlapping_triggers_are_independent() {
        let mut renderer = CelebrationRenderer::with_seed(3);
        let mut surface = Recorder::default();

        renderer.trigger(400.0, 300.0);
        for _ in 0..100 {
            renderer.frame(&mut surface);
        }
        renderer.trigger(400.0, 300.0);
        assert_eq!(renderer.particle_counts(), vec![PARTICLE_COUNT; 2]);

        for _ in 0..80 {
            renderer.frame(&mut surface);
        }
        assert_eq!(renderer.batches().len(), 1, "first batch expired");
        assert_eq!(renderer.batches()[0].frames(), 80);
    }

    #[test]
    fn same_seed_same_particles() {
        let mut a = CelebrationRenderer::with_seed(99);
        let mut b = CelebrationRenderer::with_seed(99);
        a.trigger(640.0, 480.0);
        b.trigger(640.0, 480.0);
        assert_eq!(a.batches()[0].particles(), b.batches()[0].particles());
    }

    #[test]
    fn canvas_is_blank_after_batch() {
        let mut renderer = CelebrationRenderer::with_seed(4);
        let mut canvas = Canvas::new(120, 80);
        renderer.trigger(120.0, 80.0);

        let mut painted_any = false;
        while renderer.frame(&mut canvas) {
            painted_any |= !canvas.is_blank();
        }

        assert!(painted_any);
        assert!(canvas.is_blank());
    }

    #[test]
    fn canvas_resize_between_frames() {
        let mut renderer = CelebrationRenderer::with_seed(5);
        let mut canvas = Canvas::new(100, 100);
        renderer.trigger(100.0, 100.0);

        renderer.frame(&mut canvas);
        canvas.resize(50, 20);
        assert!(renderer.frame(&mut canvas));
    }
}
