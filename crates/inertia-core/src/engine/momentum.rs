//! Velocity integration with exponential friction

use super::tick::Impulse;
use super::{FRAME_INTERVAL_SECS, FRAME_RATE, VELOCITY_THRESHOLD};

/// Smoothness above this no longer increases carry-over
pub const MAX_EFFECTIVE_SMOOTHNESS: f64 = 0.9;

/// Half-life floor in seconds, reached at zero momentum duration
const MIN_HALF_LIFE_SECS: f64 = 0.02;

/// Seconds of half-life added per unit of momentum duration
const HALF_LIFE_PER_DURATION: f64 = 0.2;

/// Per-frame decay factor for a momentum duration
///
/// The half-life is normalized to the frame rate so glide length does not
/// depend on how often frames run.
pub fn friction_for_duration(momentum_duration: f64) -> f64 {
    let half_life_secs = MIN_HALF_LIFE_SECS + momentum_duration * HALF_LIFE_PER_DURATION;
    let half_life_frames = half_life_secs * FRAME_RATE;
    0.5_f64.powf(1.0 / half_life_frames)
}

/// Result of one animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Still moving; pixels to scroll this frame
    Moving(f64),
    /// Velocity fell below threshold and was zeroed
    Stopped,
}

#[derive(Debug, Clone)]
pub struct Momentum {
    velocity: f64,
    friction: f64,
    animating: bool,
}

impl Default for Momentum {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            friction: friction_for_duration(0.6),
            animating: false,
        }
    }
}

impl Momentum {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Fold a tick's impulse into the velocity
    ///
    /// Returns true if the velocity was reset by a direction reversal.
    pub fn apply(&mut self, impulse: &Impulse) -> bool {
        self.friction = impulse.friction;

        let reversed = impulse.direction.opposes(self.velocity);
        if reversed {
            self.velocity = 0.0;
        }

        let smoothness = impulse.smoothness.clamp(0.0, MAX_EFFECTIVE_SMOOTHNESS);
        let compensation = (1.0 - smoothness) / (1.0 - MAX_EFFECTIVE_SMOOTHNESS);
        let max = impulse.max_velocity;

        self.velocity =
            (self.velocity * smoothness + impulse.velocity * compensation).clamp(-max, max);
        reversed
    }

    /// Mark the animation as running if there is velocity to animate
    ///
    /// Returns true exactly when the animation transitions from idle, i.e.
    /// when the caller must create the frame timer.
    pub fn begin(&mut self) -> bool {
        if self.animating || self.velocity == 0.0 {
            return false;
        }
        self.animating = true;
        true
    }

    /// Decay by one frame of friction
    pub fn step(&mut self) -> FrameStep {
        self.velocity *= self.friction;
        if self.velocity.abs() < VELOCITY_THRESHOLD {
            self.halt();
            return FrameStep::Stopped;
        }
        FrameStep::Moving(self.velocity * FRAME_INTERVAL_SECS)
    }

    /// Zero velocity and end the animation
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.animating = false;
    }
}
