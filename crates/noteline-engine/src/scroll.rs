//! Spring-driven scroll offset.
//!
//! Used for the smooth scroll-to-top that accompanies navigation from the
//! timeline.

use std::time::Duration;

/// Integration step for the spring simulation.
const STEP: Duration = Duration::from_micros(8_333);

/// Distance and speed below which the spring snaps to its target.
const REST_THRESHOLD: f32 = 0.5;

/// Critically damped spring animating a scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSpring {
    position: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
}

impl Default for ScrollSpring {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl ScrollSpring {
    /// Create a spring at rest at offset 0.
    pub fn new(stiffness: f32) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
        }
    }

    /// Current offset in rows.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn offset(&self) -> u16 {
        self.position.round().clamp(0.0, f32::from(u16::MAX)) as u16
    }

    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < f32::EPSILON && self.velocity.abs() < f32::EPSILON
    }

    /// Move immediately to `offset`, without animation.
    pub fn jump_to(&mut self, offset: u16) {
        self.position = f32::from(offset);
        self.target = self.position;
        self.velocity = 0.0;
    }

    /// Scroll immediately by `delta` rows, clamped at the top.
    pub fn scroll_by(&mut self, delta: i32) {
        #[allow(clippy::cast_precision_loss)]
        let next = (self.position + delta as f32).max(0.0);
        self.position = next.round();
        self.target = self.position;
        self.velocity = 0.0;
    }

    /// Start animating towards the top. The previous offset is discarded.
    pub fn to_top(&mut self) {
        self.target = 0.0;
    }

    /// Advance the simulation. Returns true while still moving.
    pub fn step(&mut self, dt: Duration) -> bool {
        if self.is_settled() {
            return false;
        }

        let mut remaining = dt;
        while !remaining.is_zero() {
            let h = remaining.min(STEP);
            remaining -= h;
            let h = h.as_secs_f32();

            let displacement = self.position - self.target;
            let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
            self.velocity += acceleration * h;
            self.position = (self.position + self.velocity * h).max(0.0);

            if (self.position - self.target).abs() < REST_THRESHOLD
                && self.velocity.abs() < REST_THRESHOLD
            {
                self.position = self.target;
                self.velocity = 0.0;
                return false;
            }
        }
        true
    }
}
