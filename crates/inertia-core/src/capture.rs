//! OS-facing boundary types
//!
//! A platform backend implements [`EventFilter`] to intercept wheel input and
//! [`EventPoster`] to inject synthetic events. Observed events reach the
//! engine as [`RawEvent`]s through an [`EngineHandle`](crate::EngineHandle);
//! the returned [`Verdict`] tells the backend what to do with the original.

use tokio::runtime::Handle;

use crate::engine::{Direction, SyntheticScroll};
use crate::service::EngineHandle;
use crate::Result;

/// Deltas smaller than this are treated as noise
pub const NEGLIGIBLE_DELTA: f64 = 0.001;

/// One scroll-wheel event as seen by the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// Already-continuous input (trackpad, free-spinning hi-res wheel)
    pub continuous: bool,
    /// Raw primary-axis delta in ticks
    pub delta: f64,
}

impl ScrollSample {
    pub fn discrete(delta: f64) -> Self {
        Self {
            continuous: false,
            delta,
        }
    }

    pub fn continuous(delta: f64) -> Self {
        Self {
            continuous: true,
            delta,
        }
    }
}

/// Why the OS stopped delivering events to the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    /// The filter fell behind and events were dropped
    Timeout,
    /// The user or another client took the input away
    UserInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Scroll(ScrollSample),
    FilterDisabled(DisableReason),
}

/// What the backend should do with the observed event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Deliver the original event unchanged
    PassThrough,
    /// Swallow the original event
    Suppress,
    /// Re-enable the filter; engine state is untouched
    Rearm,
}

/// How the boundary treats a scroll sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Continuous,
    Negligible,
    Discrete(Direction),
}

pub fn classify(sample: &ScrollSample) -> Classification {
    if sample.continuous {
        Classification::Continuous
    } else if sample.delta.abs() < NEGLIGIBLE_DELTA || sample.delta.is_nan() {
        Classification::Negligible
    } else {
        Classification::Discrete(Direction::from_delta(sample.delta))
    }
}

/// A system-wide scroll-wheel filter
///
/// At most one is installed per engine. `install` must either fully succeed
/// or leave nothing behind.
pub trait EventFilter: Send {
    /// Begin intercepting; observed events go to `engine`
    fn install(&mut self, engine: EngineHandle, runtime: &Handle) -> Result<()>;

    /// Stop intercepting and release every OS resource
    fn remove(&mut self);

    /// Whether the filter currently holds OS resources
    fn is_installed(&self) -> bool;
}

/// Sink for synthetic scroll events
pub trait EventPoster: Send + Sync {
    fn post(&self, event: &SyntheticScroll) -> Result<()>;
}
