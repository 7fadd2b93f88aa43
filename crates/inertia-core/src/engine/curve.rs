//! Cadence to speed mapping
//!
//! Slow, deliberate ticks scroll at the base speed. Above the pivot cadence the
//! multiplier grows exponentially, reaching `PIVOT_MULTIPLIER` one tick/s past
//! the pivot and saturating at `MAX_MULTIPLIER`.

/// Exponential growth base
const GROWTH_BASE: f64 = 1.1;

/// Cadence (ticks/s) where acceleration begins
pub const PIVOT_CADENCE: f64 = 8.0;

/// Multiplier one tick/s above the pivot
const PIVOT_MULTIPLIER: f64 = 1.33;

/// Cadence is clamped to this before evaluation
const MAX_CADENCE: f64 = 100.0;

pub const MAX_MULTIPLIER: f64 = 3.0;

/// Below this the curve degenerates and the base speed is returned
const DEGENERATE_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedCurve {
    base: f64,
    exponent: f64,
}

impl SpeedCurve {
    pub fn new(base: f64, exponent: f64) -> Self {
        Self { base, exponent }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    /// Per-tick speed for a cadence in ticks/s
    pub fn speed(&self, cadence: f64) -> f64 {
        let denominator = GROWTH_BASE.powf(self.exponent) - 1.0;
        if denominator.abs() < DEGENERATE_EPSILON {
            return self.base;
        }
        let a = (PIVOT_MULTIPLIER - 1.0) / denominator;

        let x = cadence.min(MAX_CADENCE);
        if x < PIVOT_CADENCE {
            return self.base;
        }

        let multiplier = a * GROWTH_BASE.powf((x - PIVOT_CADENCE) * self.exponent) + 1.0 - a;
        self.base * multiplier.clamp(1.0, MAX_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_below_pivot() {
        let curve = SpeedCurve::new(4.0, 1.5);
        for cadence in [0.0, 1.0, 5.0, 7.99] {
            assert_eq!(curve.speed(cadence), 4.0);
        }
    }

    #[test]
    fn test_monotonic_and_bounded() {
        for exponent in [0.5, 1.0, 1.5, 2.5, 4.0] {
            let curve = SpeedCurve::new(2.0, exponent);
            let mut prev = curve.speed(PIVOT_CADENCE);
            assert!(prev >= 2.0);
            for i in 0..=400 {
                let cadence = PIVOT_CADENCE + i as f64 * 0.25;
                let s = curve.speed(cadence);
                assert!(s >= prev, "exponent {} not monotonic at {}", exponent, cadence);
                assert!((2.0..=6.0).contains(&s));
                prev = s;
            }
        }
    }

    #[test]
    fn test_pivot_edge_multiplier() {
        let curve = SpeedCurve::new(1.0, 1.5);
        assert!((curve.speed(PIVOT_CADENCE) - 1.0).abs() < 1e-9);
        assert!((curve.speed(PIVOT_CADENCE + 1.0) - PIVOT_MULTIPLIER).abs() < 1e-9);
    }

    #[test]
    fn test_saturates() {
        let curve = SpeedCurve::new(4.0, 4.0);
        assert_eq!(curve.speed(1_000.0), 12.0);
        assert_eq!(curve.speed(f64::INFINITY), 12.0);
    }

    #[test]
    fn test_degenerate_exponent() {
        let curve = SpeedCurve::new(3.0, 0.0);
        assert_eq!(curve.speed(50.0), 3.0);
    }

    #[test]
    fn test_ten_hertz_scenario() {
        let curve = SpeedCurve::new(4.0, 1.5);
        let s = curve.speed(10.0);
        assert!(s > 4.0 && s < 12.0);
        assert!(curve.speed(12.0) >= s);
    }
}
