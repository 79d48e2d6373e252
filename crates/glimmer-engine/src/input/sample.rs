//! Ephemeral gesture samples. Each is consumed against the previous one and
//! then dropped.

use glam::{Vec2, Vec3};

/// A pointer position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub pos: Vec2,
    pub at_ms: u64,
}

impl GestureSample {
    pub fn new(pos: Vec2, at_ms: u64) -> Self {
        Self { pos, at_ms }
    }

    /// Displacement from `prev` to this sample.
    pub fn delta(&self, prev: &GestureSample) -> Vec2 {
        self.pos - prev.pos
    }
}

/// An acceleration vector at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub accel: Vec3,
    pub at_ms: u64,
}

impl MotionSample {
    pub fn new(accel: Vec3, at_ms: u64) -> Self {
        Self { accel, at_ms }
    }

    /// Sum of absolute per-axis differences against `prev`.
    pub fn delta(&self, prev: Vec3) -> f32 {
        (self.accel - prev).abs().element_sum()
    }

    /// Whether every component is a real number.
    pub fn is_finite(&self) -> bool {
        self.accel.is_finite()
    }
}
