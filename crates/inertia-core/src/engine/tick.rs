//! Per-tick pipeline: cadence, speed curve and swipe escalation
//!
//! Everything here runs outside the shared velocity lock. The result is an
//! [`Impulse`] that carries every value the integrator needs, so the locked
//! section never reads tunables.

use std::time::Instant;

use super::curve::{SpeedCurve, MAX_MULTIPLIER};
use super::momentum::friction_for_duration;
use super::rate::RateEstimator;
use super::swipe::SwipeClassifier;
use super::{Direction, PIXELS_PER_TICK};
use crate::tunables::Tunables;

/// Headroom of the velocity clamp over a saturated single tick
const MAX_VELOCITY_TICKS: f64 = 4.0;

/// Velocity contribution of one raw tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub direction: Direction,
    /// Signed impulse in px/s
    pub velocity: f64,
    pub fast_factor: f64,
    pub smoothness: f64,
    /// Per-frame decay factor in effect from this tick on
    pub friction: f64,
    /// Symmetric velocity clamp
    pub max_velocity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TickProcessor {
    rate: RateEstimator,
    swipe: SwipeClassifier,
    /// Tunables as of the most recent tick
    cached: Tunables,
    cadence: f64,
}

impl TickProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one discrete tick through the pipeline
    pub fn process(&mut self, direction: Direction, now: Instant, tunables: Tunables) -> Impulse {
        self.cached = tunables;

        self.cadence = self.rate.record(now);
        let fast_factor = self.swipe.record(direction, now);

        let curve = SpeedCurve::new(tunables.base_speed, tunables.curve_exponent);
        let speed = curve.speed(self.cadence);

        let impulse = Impulse {
            direction,
            velocity: direction.sign() * speed * PIXELS_PER_TICK * fast_factor,
            fast_factor,
            smoothness: tunables.smoothness,
            friction: friction_for_duration(tunables.momentum_duration),
            max_velocity: tunables.base_speed
                * MAX_MULTIPLIER
                * PIXELS_PER_TICK
                * MAX_VELOCITY_TICKS
                * fast_factor,
        };

        tracing::debug!(
            cadence = self.cadence,
            speed,
            fast_factor,
            swipes = self.swipe.swipe_count(),
            impulse = impulse.velocity,
            "Scroll tick"
        );

        impulse
    }

    /// Smoothed cadence of the most recent tick
    pub fn cadence(&self) -> f64 {
        self.cadence
    }

    pub fn cached_tunables(&self) -> Tunables {
        self.cached
    }

    pub fn swipe(&self) -> &SwipeClassifier {
        &self.swipe
    }

    pub fn reset(&mut self) {
        self.rate.reset();
        self.swipe.reset();
        self.cadence = 0.0;
    }
}
