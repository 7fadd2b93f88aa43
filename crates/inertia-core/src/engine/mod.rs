//! Momentum scroll engine
//!
//! Turns discrete wheel ticks into a continuous, decaying velocity and
//! quantizes that velocity into synthetic scroll events.
//!
//! # Layers
//!
//! ## Pure building blocks
//! - `rate` - inter-tick cadence estimation
//! - `curve` - cadence to speed multiplier
//! - `swipe` - fast-swipe detection and escalation
//! - `synthesis` - pixel/line quantization of per-frame deltas
//!
//! ## Stateful composition
//! - `tick` - per-tick pipeline producing an [`Impulse`]
//! - `momentum` - shared velocity with per-frame friction
//!
//! The runtime wiring (filter, frame timer, locking) lives in
//! [`crate::service`].

use std::time::Duration;

pub mod curve;
pub mod momentum;
pub mod rate;
pub mod swipe;
pub mod synthesis;
pub mod tick;

pub use curve::SpeedCurve;
pub use momentum::{friction_for_duration, FrameStep, Momentum};
pub use rate::RateEstimator;
pub use swipe::SwipeClassifier;
pub use synthesis::{AxisDelta, Quantizer, SyntheticScroll};
pub use tick::{Impulse, TickProcessor};

/// Animation frame rate in Hz
pub const FRAME_RATE: f64 = 120.0;

/// Seconds between animation frames
pub const FRAME_INTERVAL_SECS: f64 = 1.0 / FRAME_RATE;

/// Pixels contributed by one wheel tick at unit speed
pub const PIXELS_PER_TICK: f64 = 45.0;

/// Pixels per scroll line in synthetic events
pub const PIXELS_PER_LINE: f64 = 10.0;

/// Velocity (px/s) below which momentum stops
pub const VELOCITY_THRESHOLD: f64 = 120.0;

/// Damping applied by the host preview helper
pub const PREVIEW_DAMPING: f64 = 0.3;

pub fn frame_interval() -> Duration {
    Duration::from_secs_f64(FRAME_INTERVAL_SECS)
}

/// Direction of a wheel tick along the primary axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Direction of a non-zero delta; zero counts as negative
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    /// True if `velocity` points against this direction
    #[inline]
    pub fn opposes(self, velocity: f64) -> bool {
        match self {
            Direction::Positive => velocity < 0.0,
            Direction::Negative => velocity > 0.0,
        }
    }
}

/// Pixel delta the host preview should scroll for a raw wheel delta
///
/// Applies only base-speed scaling; never touches momentum state.
pub fn preview_transform(raw_delta: f64, base_speed: f64) -> f64 {
    raw_delta * base_speed * PIXELS_PER_TICK * PREVIEW_DAMPING
}
