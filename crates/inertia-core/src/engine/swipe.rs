//! Fast-swipe detection
//!
//! A run is a sequence of same-direction ticks without a long pause. When a
//! run closes quickly enough it counts as a swipe; consecutive swipes compound
//! into a growing speed factor. Any pause or slow run resets the escalation.

use std::time::{Duration, Instant};

use super::Direction;

/// Pause that ends a run and resets escalation
pub const SWIPE_WINDOW: Duration = Duration::from_millis(400);

/// Minimum average ticks/s for a run to count as a swipe
pub const MIN_SWIPE_RATE: f64 = 5.0;

/// Swipes needed before the fast factor kicks in
const ESCALATION_START: u32 = 2;

const FAST_FACTOR_BASE: f64 = 1.33;
const FAST_FACTOR_GROWTH: f64 = 7.5;
const FAST_FACTOR_SPAN: f64 = 7.5;
pub const MAX_FAST_FACTOR: f64 = 50.0;

#[derive(Debug, Clone, Copy)]
struct Run {
    direction: Direction,
    started: Instant,
    ticks: u32,
    last_tick: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeClassifier {
    run: Option<Run>,
    /// Same-direction ticks since the last reversal
    consecutive_ticks: u32,
    swipe_count: u32,
}

impl SwipeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick and return the current fast-scroll factor
    pub fn record(&mut self, direction: Direction, now: Instant) -> f64 {
        match self.run {
            Some(run) => {
                let gap = now.saturating_duration_since(run.last_tick);
                let reversed = run.direction != direction;

                if reversed {
                    self.consecutive_ticks = 0;
                }
                if gap > SWIPE_WINDOW || reversed {
                    self.close_run(run, gap, now);
                    self.run = Some(Run {
                        direction,
                        started: now,
                        ticks: 0,
                        last_tick: now,
                    });
                }
            }
            None => {
                self.run = Some(Run {
                    direction,
                    started: now,
                    ticks: 0,
                    last_tick: now,
                });
            }
        }

        if let Some(run) = self.run.as_mut() {
            run.ticks += 1;
            run.last_tick = now;
        }
        self.consecutive_ticks += 1;

        self.fast_factor()
    }

    fn close_run(&mut self, run: Run, gap: Duration, now: Instant) {
        let elapsed = now.saturating_duration_since(run.started).as_secs_f64();
        if run.ticks >= 2 && gap <= SWIPE_WINDOW && elapsed > 0.0 {
            let avg_tick_rate = run.ticks as f64 / elapsed;
            if avg_tick_rate >= MIN_SWIPE_RATE {
                self.swipe_count += 1;
                tracing::debug!(swipes = self.swipe_count, avg_tick_rate, "Swipe detected");
                return;
            }
        }
        self.swipe_count = 0;
    }

    pub fn swipe_count(&self) -> u32 {
        self.swipe_count
    }

    pub fn consecutive_ticks(&self) -> u32 {
        self.consecutive_ticks
    }

    /// Ticks in the current run
    pub fn run_ticks(&self) -> u32 {
        self.run.map(|r| r.ticks).unwrap_or(0)
    }

    pub fn fast_factor(&self) -> f64 {
        fast_factor(self.swipe_count)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Speed factor for a given number of consecutive swipes
pub fn fast_factor(swipe_count: u32) -> f64 {
    if swipe_count < ESCALATION_START {
        return 1.0;
    }
    let exponent = (swipe_count - ESCALATION_START) as f64 / FAST_FACTOR_SPAN;
    (FAST_FACTOR_BASE * FAST_FACTOR_GROWTH.powf(exponent)).min(MAX_FAST_FACTOR)
}
