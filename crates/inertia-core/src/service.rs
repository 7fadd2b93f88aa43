//! Scroll engine runtime
//!
//! Two producers share the motion state: the filter, which delivers raw ticks
//! through an [`EngineHandle`], and the frame timer, a tokio task that decays
//! velocity at [`FRAME_RATE`](crate::engine::FRAME_RATE) and posts synthetic
//! events. Both go through a single mutex held only for the velocity update
//! or the decay-and-quantize step; posting happens outside it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::capture::{classify, Classification, EventFilter, EventPoster, RawEvent, Verdict};
use crate::engine::{self, frame_interval, Direction, FrameStep, Momentum, Quantizer, TickProcessor};
use crate::tunables::TunableSource;
use crate::{Error, Result};

/// Velocity, quantizer and the frame timer that animates them
///
/// `timer` is `Some` exactly while `momentum.is_animating()`.
struct Motion {
    momentum: Momentum,
    quantizer: Quantizer,
    timer: Option<JoinHandle<()>>,
    /// Incremented per spawned timer so a stale task cannot drive frames
    generation: u64,
}

impl Motion {
    fn new() -> Self {
        Self {
            momentum: Momentum::new(),
            quantizer: Quantizer::new(),
            timer: None,
            generation: 0,
        }
    }

    fn halt(&mut self) {
        self.momentum.halt();
        self.quantizer.reset();
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameOutcome {
    Continue,
    Finished,
}

struct Shared {
    tunables: Arc<dyn TunableSource>,
    poster: Arc<dyn EventPoster>,
    filter: Mutex<Box<dyn EventFilter>>,
    running: AtomicBool,
    ticks: Mutex<TickProcessor>,
    motion: Mutex<Motion>,
    runtime: Mutex<Option<Handle>>,
}

impl Shared {
    fn observe(self: &Arc<Self>, event: RawEvent, now: Instant) -> Verdict {
        if !self.running.load(Ordering::Acquire) {
            return Verdict::PassThrough;
        }

        match event {
            RawEvent::FilterDisabled(reason) => {
                warn!(?reason, "Input filter disabled by the system, re-arming");
                Verdict::Rearm
            }
            RawEvent::Scroll(sample) => match classify(&sample) {
                Classification::Continuous | Classification::Negligible => Verdict::PassThrough,
                Classification::Discrete(direction) => {
                    self.apply_tick(direction, now);
                    Verdict::Suppress
                }
            },
        }
    }

    fn apply_tick(self: &Arc<Self>, direction: Direction, now: Instant) {
        let tunables = self.tunables.snapshot();
        let impulse = self.ticks.lock().process(direction, now, tunables);

        let mut motion = self.motion.lock();
        // stop() clears `running` under this lock
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        if motion.momentum.apply(&impulse) {
            debug!("Scroll direction reversed, velocity reset");
        }
        if motion.momentum.begin() {
            motion.quantizer.reset();
            motion.generation = motion.generation.wrapping_add(1);
            match self.spawn_frame_timer(motion.generation) {
                Some(timer) => motion.timer = Some(timer),
                None => {
                    warn!("No runtime for frame timer, dropping momentum");
                    motion.momentum.halt();
                }
            }
        }
    }

    fn spawn_frame_timer(self: &Arc<Self>, generation: u64) -> Option<JoinHandle<()>> {
        let runtime = self.runtime.lock().clone()?;
        trace!(generation, "Starting frame timer");
        Some(runtime.spawn(run_frames(Arc::downgrade(self), generation)))
    }

    /// Advance the animation by one frame
    fn frame(&self, generation: u64) -> FrameOutcome {
        let event = {
            let mut motion = self.motion.lock();
            if motion.generation != generation || !motion.momentum.is_animating() {
                return FrameOutcome::Finished;
            }
            match motion.momentum.step() {
                FrameStep::Stopped => {
                    motion.quantizer.reset();
                    motion.timer = None;
                    trace!("Momentum settled");
                    return FrameOutcome::Finished;
                }
                FrameStep::Moving(pixel_delta) => motion.quantizer.push(pixel_delta),
            }
        };

        if let Some(event) = event {
            if let Err(e) = self.poster.post(&event) {
                trace!("Synthetic scroll dropped: {}", e);
            }
        }
        FrameOutcome::Continue
    }
}

async fn run_frames(shared: Weak<Shared>, generation: u64) {
    let mut ticker = interval(frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if shared.frame(generation) == FrameOutcome::Finished {
            break;
        }
    }
}

/// Weak, cloneable entry point handed to the installed filter
///
/// Once the engine is dropped every observed event passes through.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Weak<Shared>,
}

impl EngineHandle {
    /// Deliver an event observed now
    pub fn observe(&self, event: RawEvent) -> Verdict {
        self.observe_at(event, Instant::now())
    }

    /// Deliver an event observed at `now`
    pub fn observe_at(&self, event: RawEvent, now: Instant) -> Verdict {
        match self.shared.upgrade() {
            Some(shared) => shared.observe(event, now),
            None => Verdict::PassThrough,
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|s| s.running.load(Ordering::Acquire))
    }
}

/// The momentum scroll engine
///
/// Owns the filter, the motion state and the frame timer. Dropping the engine
/// stops it.
pub struct ScrollEngine {
    shared: Arc<Shared>,
}

impl ScrollEngine {
    pub fn new(
        tunables: Arc<dyn TunableSource>,
        filter: Box<dyn EventFilter>,
        poster: Arc<dyn EventPoster>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                tunables,
                poster,
                filter: Mutex::new(filter),
                running: AtomicBool::new(false),
                ticks: Mutex::new(TickProcessor::new()),
                motion: Mutex::new(Motion::new()),
                runtime: Mutex::new(None),
            }),
        }
    }

    /// Install the filter and begin transforming wheel input
    ///
    /// No-op if already running. Must be called from within a tokio runtime.
    /// On failure the engine stays stopped; call again to retry.
    pub fn start(&self) -> Result<()> {
        let mut filter = self.shared.filter.lock();
        if self.shared.running.load(Ordering::Acquire) {
            debug!("Scroll engine already running");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;

        info!("Starting scroll engine");
        if let Err(e) = filter.install(self.handle(), &runtime) {
            error!("Failed to install input filter: {}", e);
            return Err(e);
        }

        *self.shared.runtime.lock() = Some(runtime);
        self.shared.ticks.lock().reset();
        self.shared.running.store(true, Ordering::Release);
        info!("Scroll engine running");
        Ok(())
    }

    /// Remove the filter, cancel the frame timer and zero all state
    ///
    /// Safe to call repeatedly.
    pub fn stop(&self) {
        let mut filter = self.shared.filter.lock();
        let was_running = {
            let mut motion = self.shared.motion.lock();
            let was_running = self.shared.running.swap(false, Ordering::AcqRel);
            motion.halt();
            was_running
        };

        if filter.is_installed() {
            filter.remove();
        }
        self.shared.ticks.lock().reset();
        *self.shared.runtime.lock() = None;

        if was_running {
            info!("Scroll engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn is_animating(&self) -> bool {
        self.shared.motion.lock().momentum.is_animating()
    }

    /// Current velocity in px/s
    pub fn velocity(&self) -> f64 {
        self.shared.motion.lock().momentum.velocity()
    }

    /// Pixel delta for a host-side preview; never touches momentum state
    pub fn preview_transform(&self, raw_delta: f64) -> f64 {
        engine::preview_transform(raw_delta, self.shared.tunables.snapshot().base_speed)
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl Drop for ScrollEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
