//! User-facing scroll tunables and presets
//!
//! The engine never reads these live: it takes a [`Tunables`] snapshot from a
//! [`TunableSource`] once per raw tick, so a host editing values mid-animation
//! can never tear a velocity update.

use std::ops::RangeInclusive;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub const BASE_SPEED_RANGE: RangeInclusive<f64> = 0.5..=10.0;
pub const CURVE_EXPONENT_RANGE: RangeInclusive<f64> = 0.5..=4.0;
pub const MOMENTUM_DURATION_RANGE: RangeInclusive<f64> = 0.0..=2.0;
pub const SMOOTHNESS_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Tolerance used when matching values back to a preset
const PRESET_TOLERANCE: f64 = 0.01;

/// Snapshot of the scroll tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    /// Base per-tick speed multiplier
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,
    /// Steepness of the acceleration curve above the cadence pivot
    #[serde(default = "default_curve_exponent")]
    pub curve_exponent: f64,
    /// Momentum glide length; drives the friction half-life
    #[serde(default = "default_momentum_duration")]
    pub momentum_duration: f64,
    /// How much of the previous velocity survives a new tick
    #[serde(default = "default_smoothness")]
    pub smoothness: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            curve_exponent: default_curve_exponent(),
            momentum_duration: default_momentum_duration(),
            smoothness: default_smoothness(),
        }
    }
}

fn default_base_speed() -> f64 {
    4.0
}

fn default_curve_exponent() -> f64 {
    1.5
}

fn default_momentum_duration() -> f64 {
    0.6
}

fn default_smoothness() -> f64 {
    0.6
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

impl Tunables {
    /// Pull every field into its valid range
    pub fn clamped(self) -> Self {
        Self {
            base_speed: clamp_to(self.base_speed, &BASE_SPEED_RANGE),
            curve_exponent: clamp_to(self.curve_exponent, &CURVE_EXPONENT_RANGE),
            momentum_duration: clamp_to(self.momentum_duration, &MOMENTUM_DURATION_RANGE),
            smoothness: clamp_to(self.smoothness, &SMOOTHNESS_RANGE),
        }
    }

    /// Names of the fields that lie outside their valid range
    pub fn out_of_range(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !BASE_SPEED_RANGE.contains(&self.base_speed) {
            fields.push("base_speed");
        }
        if !CURVE_EXPONENT_RANGE.contains(&self.curve_exponent) {
            fields.push("curve_exponent");
        }
        if !MOMENTUM_DURATION_RANGE.contains(&self.momentum_duration) {
            fields.push("momentum_duration");
        }
        if !SMOOTHNESS_RANGE.contains(&self.smoothness) {
            fields.push("smoothness");
        }
        fields
    }

    pub fn apply_speed_preset(&mut self, preset: SpeedPreset) {
        if let Some(base) = preset.base_speed() {
            self.base_speed = base;
        }
    }

    pub fn apply_smoothness_preset(&mut self, preset: SmoothnessPreset) {
        self.smoothness = preset.smoothness();
        self.momentum_duration = preset.momentum_duration();
    }

    /// The speed preset matching the current base speed, or `Custom`
    pub fn speed_preset(&self) -> SpeedPreset {
        SpeedPreset::NAMED
            .into_iter()
            .find(|p| {
                p.base_speed()
                    .is_some_and(|base| (base - self.base_speed).abs() < PRESET_TOLERANCE)
            })
            .unwrap_or(SpeedPreset::Custom)
    }

    /// The smoothness preset matching the current smoothness, or `Regular`
    pub fn smoothness_preset(&self) -> SmoothnessPreset {
        SmoothnessPreset::ALL
            .into_iter()
            .find(|p| (p.smoothness() - self.smoothness).abs() < PRESET_TOLERANCE)
            .unwrap_or(SmoothnessPreset::Regular)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    Medium,
    Fast,
    Custom,
}

impl SpeedPreset {
    const NAMED: [SpeedPreset; 3] = [SpeedPreset::Slow, SpeedPreset::Medium, SpeedPreset::Fast];

    /// Base speed for the preset; `Custom` leaves the value untouched
    pub fn base_speed(self) -> Option<f64> {
        match self {
            SpeedPreset::Slow => Some(2.0),
            SpeedPreset::Medium => Some(4.0),
            SpeedPreset::Fast => Some(7.0),
            SpeedPreset::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothnessPreset {
    Low,
    Regular,
    High,
}

impl SmoothnessPreset {
    const ALL: [SmoothnessPreset; 3] = [
        SmoothnessPreset::Low,
        SmoothnessPreset::Regular,
        SmoothnessPreset::High,
    ];

    pub fn smoothness(self) -> f64 {
        match self {
            SmoothnessPreset::Low => 0.3,
            SmoothnessPreset::Regular => 0.6,
            SmoothnessPreset::High => 1.0,
        }
    }

    pub fn momentum_duration(self) -> f64 {
        match self {
            SmoothnessPreset::Low => 0.3,
            SmoothnessPreset::Regular => 0.6,
            SmoothnessPreset::High => 1.0,
        }
    }
}

/// Read access to the current tunables
pub trait TunableSource: Send + Sync {
    fn snapshot(&self) -> Tunables;
}

impl TunableSource for Tunables {
    fn snapshot(&self) -> Tunables {
        *self
    }
}

/// Live tunables shared between the engine and its host
///
/// Each setter clamps into range and is independent of the others; a tick
/// racing a multi-field edit may observe a mix of old and new values.
#[derive(Debug, Clone, Default)]
pub struct SharedTunables {
    inner: Arc<RwLock<Tunables>>,
}

impl SharedTunables {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tunables.clamped())),
        }
    }

    pub fn replace(&self, tunables: Tunables) {
        *self.inner.write() = tunables.clamped();
    }

    pub fn set_base_speed(&self, value: f64) {
        self.inner.write().base_speed = clamp_to(value, &BASE_SPEED_RANGE);
    }

    pub fn set_curve_exponent(&self, value: f64) {
        self.inner.write().curve_exponent = clamp_to(value, &CURVE_EXPONENT_RANGE);
    }

    pub fn set_momentum_duration(&self, value: f64) {
        self.inner.write().momentum_duration = clamp_to(value, &MOMENTUM_DURATION_RANGE);
    }

    pub fn set_smoothness(&self, value: f64) {
        self.inner.write().smoothness = clamp_to(value, &SMOOTHNESS_RANGE);
    }

    pub fn reset_to_defaults(&self) {
        *self.inner.write() = Tunables::default();
    }
}

impl TunableSource for SharedTunables {
    fn snapshot(&self) -> Tunables {
        *self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_range() {
        let t = Tunables::default();
        assert!(t.out_of_range().is_empty());
        assert_eq!(t.speed_preset(), SpeedPreset::Medium);
        assert_eq!(t.smoothness_preset(), SmoothnessPreset::Regular);
    }

    #[test]
    fn test_clamped() {
        let t = Tunables {
            base_speed: 42.0,
            curve_exponent: 0.1,
            momentum_duration: -1.0,
            smoothness: f64::NAN,
        };
        assert_eq!(t.out_of_range().len(), 4);

        let c = t.clamped();
        assert_eq!(c.base_speed, 10.0);
        assert_eq!(c.curve_exponent, 0.5);
        assert_eq!(c.momentum_duration, 0.0);
        assert_eq!(c.smoothness, 0.0);
    }

    #[test]
    fn test_presets() {
        let mut t = Tunables::default();
        t.apply_speed_preset(SpeedPreset::Fast);
        assert_eq!(t.base_speed, 7.0);
        assert_eq!(t.speed_preset(), SpeedPreset::Fast);

        t.apply_speed_preset(SpeedPreset::Custom);
        assert_eq!(t.base_speed, 7.0);

        t.base_speed = 5.5;
        assert_eq!(t.speed_preset(), SpeedPreset::Custom);

        t.apply_smoothness_preset(SmoothnessPreset::High);
        assert_eq!(t.smoothness, 1.0);
        assert_eq!(t.momentum_duration, 1.0);
        assert_eq!(t.smoothness_preset(), SmoothnessPreset::High);

        t.smoothness = 0.45;
        assert_eq!(t.smoothness_preset(), SmoothnessPreset::Regular);
    }

    #[test]
    fn test_shared_setters_clamp() {
        let shared = SharedTunables::default();
        shared.set_base_speed(0.1);
        shared.set_smoothness(3.0);
        let snap = shared.snapshot();
        assert_eq!(snap.base_speed, 0.5);
        assert_eq!(snap.smoothness, 1.0);

        shared.reset_to_defaults();
        assert_eq!(shared.snapshot(), Tunables::default());
    }

    #[test]
    fn test_shared_clones_see_edits() {
        let shared = SharedTunables::default();
        let view = shared.clone();
        shared.set_curve_exponent(2.5);
        assert_eq!(view.snapshot().curve_exponent, 2.5);
    }
}
