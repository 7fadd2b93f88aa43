//! Inter-tick cadence estimation
//!
//! Keeps a short rolling history of instantaneous tick rates so a single
//! jittery gap does not swing the speed curve.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of instantaneous rates averaged
pub const HISTORY_SIZE: usize = 3;

/// Gaps at or above this break the sequence
pub const SEQUENCE_BREAK: Duration = Duration::from_millis(160);

/// Cadence reported after a break, in ticks/s
pub const FALLBACK_RATE: f64 = 5.0;

#[derive(Debug, Clone, Default)]
pub struct RateEstimator {
    history: VecDeque<f64>,
    last_tick: Option<Instant>,
}

impl RateEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick at `now` and return the smoothed cadence
    pub fn record(&mut self, now: Instant) -> f64 {
        let gap = self.last_tick.map(|last| now.saturating_duration_since(last));
        self.last_tick = Some(now);
        self.record_gap(gap)
    }

    /// Time of the previous tick, if any
    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    /// Feed an explicit gap; `None` means no previous tick
    pub fn record_gap(&mut self, gap: Option<Duration>) -> f64 {
        match gap {
            Some(gap) if !gap.is_zero() && gap < SEQUENCE_BREAK => {
                if self.history.len() == HISTORY_SIZE {
                    self.history.pop_front();
                }
                self.history.push_back(1.0 / gap.as_secs_f64());
                self.history.iter().sum::<f64>() / self.history.len() as f64
            }
            _ => {
                self.history.clear();
                FALLBACK_RATE
            }
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Option<Duration> {
        Some(Duration::from_millis(n))
    }

    #[test]
    fn test_first_tick_uses_fallback() {
        let mut est = RateEstimator::new();
        assert_eq!(est.record(Instant::now()), FALLBACK_RATE);
    }

    #[test]
    fn test_mean_of_history() {
        let mut est = RateEstimator::new();
        assert!((est.record_gap(ms(100)) - 10.0).abs() < 1e-9);
        assert!((est.record_gap(ms(50)) - 15.0).abs() < 1e-9);
        assert!((est.record_gap(ms(25)) - (10.0 + 20.0 + 40.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_oldest_evicted() {
        let mut est = RateEstimator::new();
        est.record_gap(ms(100)); // 10
        est.record_gap(ms(50)); // 20
        est.record_gap(ms(50)); // 20
        let rate = est.record_gap(ms(50)); // 10 evicted
        assert!((rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_clears_history() {
        let mut est = RateEstimator::new();
        est.record_gap(ms(20));
        est.record_gap(ms(20));
        assert_eq!(est.record_gap(ms(160)), FALLBACK_RATE);
        assert!((est.record_gap(ms(100)) - 10.0).abs() < 1e-9);
        assert_eq!(est.record_gap(Some(Duration::ZERO)), FALLBACK_RATE);
    }

    #[test]
    fn test_record_uses_wall_gaps() {
        let mut est = RateEstimator::new();
        let t0 = Instant::now();
        est.record(t0);
        let rate = est.record(t0 + Duration::from_millis(125));
        assert!((rate - 8.0).abs() < 1e-9);
        assert_eq!(est.last_tick(), Some(t0 + Duration::from_millis(125)));
    }
}
