//! Confetti particle with constant-velocity motion.

use rand::Rng;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build a color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The confetti palette.
pub const PALETTE: [Rgb; 6] = [
    Rgb::hex(0x7c3aed),
    Rgb::hex(0x06b6d4),
    Rgb::hex(0x10b981),
    Rgb::hex(0xf59e0b),
    Rgb::hex(0xef4444),
    Rgb::hex(0xec4899),
];

/// A single confetti particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    /// Horizontal drift per frame.
    pub speed_x: f32,
    /// Downward speed per frame.
    pub speed_y: f32,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per frame.
    pub rotation_speed: f32,
}

impl Particle {
    /// Spawn a particle somewhere in the band just above a `width × height`
    /// viewport. Both dimensions must be positive and finite.
    pub fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        Self {
            x: rng.random_range(0.0..width),
            y: rng.random_range(-height..0.0),
            size: rng.random_range(5.0..15.0),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            speed_x: rng.random_range(-1.0..1.0),
            speed_y: rng.random_range(2.0..5.0),
            rotation: rng.random_range(0.0..360.0),
            rotation_speed: rng.random_range(-5.0..5.0),
        }
    }

    /// Advance one frame. No gravity, no drag.
    pub fn step(&mut self) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        self.rotation += self.rotation_speed;
    }

    /// The rectangle to draw for the current frame.
    #[must_use]
    pub fn rect(&self) -> ParticleRect {
        ParticleRect {
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: self.rotation,
            color: self.color,
        }
    }
}

/// A `size × size/2` rectangle, offset by `(-size/2, -size/2)` in a local frame
/// translated to `(x, y)` and rotated by `rotation` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRect {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation: f32,
    pub color: Rgb,
}

impl ParticleRect {
    /// Radius of a circle around `(x, y)` that contains the whole rectangle.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        self.size * std::f32::consts::FRAC_1_SQRT_2
    }

    /// Check if a surface point lies inside the rotated rectangle.
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = px - self.x;
        let dy = py - self.y;

        // Undo the rotation to land in the local frame.
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;

        let half = self.size / 2.0;
        (-half..half).contains(&lx) && (-half..0.0).contains(&ly)
    }
}

// =============================================================================
// TESTS
// =============================================================================
