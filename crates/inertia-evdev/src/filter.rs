//! Exclusive evdev grab feeding the scroll engine
//!
//! Devices are read through the raw stream: the synced stream would absorb
//! `SYN_DROPPED` and the engine would never learn the grab fell behind.

use std::path::PathBuf;

use evdev::raw_stream::{EventStream, RawDevice};
use evdev::{InputEvent, InputEventKind, Synchronization};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use inertia_core::capture::DisableReason;
use inertia_core::{EngineHandle, Error, EventFilter, RawEvent, Result, Verdict};

use crate::discovery::open_devices;
use crate::frame::{forwarded, wheel_sample};
use crate::virtual_pointer::{build_virtual_device, VirtualPointer};

/// What the reader does after one raw event
#[derive(Debug, Clone)]
pub(crate) enum Action {
    /// Event buffered into the current frame
    Buffered,
    /// Frame complete; replay these on the virtual pointer
    Replay(Vec<InputEvent>),
    /// Events were lost; ungrab and grab again
    Rearm,
    /// Partial frame thrown away, nothing to do
    Discarded,
}

// `InputEvent` has no `PartialEq` in evdev 0.12, so compare field by field
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: &InputEvent, b: &InputEvent) -> bool {
            a.timestamp() == b.timestamp()
                && a.event_type() == b.event_type()
                && a.code() == b.code()
                && a.value() == b.value()
        }
        match (self, other) {
            (Action::Buffered, Action::Buffered)
            | (Action::Rearm, Action::Rearm)
            | (Action::Discarded, Action::Discarded) => true,
            (Action::Replay(a), Action::Replay(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
            }
            _ => false,
        }
    }
}

/// Fold one raw event into `frame`, consulting the engine at frame boundaries
pub(crate) fn handle_event(
    event: InputEvent,
    frame: &mut Vec<InputEvent>,
    mut observe: impl FnMut(RawEvent) -> Verdict,
) -> Action {
    match event.kind() {
        InputEventKind::Synchronization(Synchronization::SYN_REPORT) => {
            let verdict = match wheel_sample(frame) {
                Some(sample) => observe(RawEvent::Scroll(sample)),
                None => Verdict::PassThrough,
            };
            let replay = forwarded(frame, verdict == Verdict::Suppress);
            frame.clear();
            Action::Replay(replay)
        }
        InputEventKind::Synchronization(Synchronization::SYN_DROPPED) => {
            frame.clear();
            match observe(RawEvent::FilterDisabled(DisableReason::Timeout)) {
                Verdict::Rearm => Action::Rearm,
                _ => Action::Discarded,
            }
        }
        _ => {
            frame.push(event);
            Action::Buffered
        }
    }
}

pub struct EvdevFilter {
    paths: Vec<PathBuf>,
    virtual_name: String,
    pointer: VirtualPointer,
    readers: Vec<JoinHandle<()>>,
}

impl EvdevFilter {
    /// `paths` empty means grab every discovered wheel device
    pub fn new(paths: Vec<PathBuf>, virtual_name: impl Into<String>, pointer: VirtualPointer) -> Self {
        Self {
            paths,
            virtual_name: virtual_name.into(),
            pointer,
            readers: Vec::new(),
        }
    }
}

impl EventFilter for EvdevFilter {
    fn install(&mut self, engine: EngineHandle, runtime: &Handle) -> Result<()> {
        if self.is_installed() {
            return Ok(());
        }

        let devices = open_devices(&self.paths, &self.virtual_name)?;
        if devices.is_empty() {
            return Err(Error::FilterInstall(
                "no scroll wheel devices found (is /dev/input readable?)".to_string(),
            ));
        }
        let virtual_device = build_virtual_device(&self.virtual_name, &devices)?;
        let paths: Vec<PathBuf> = devices.into_iter().map(|(path, _)| path).collect();

        // Dropping a device closes it and releases its grab
        let _guard = runtime.enter();
        let mut streams = Vec::with_capacity(paths.len());
        for path in paths {
            let mut device = RawDevice::open(&path).map_err(|e| {
                Error::FilterInstall(format!("cannot open {}: {}", path.display(), e))
            })?;
            device.grab().map_err(|e| {
                Error::FilterInstall(format!("cannot grab {}: {}", path.display(), e))
            })?;
            let stream = device.into_event_stream().map_err(|e| {
                Error::FilterInstall(format!("cannot poll {}: {}", path.display(), e))
            })?;
            streams.push((path, stream));
        }

        self.pointer.attach(virtual_device);
        for (path, stream) in streams {
            info!(path = %path.display(), "Grabbed wheel device");
            let reader = pump(stream, engine.clone(), self.pointer.clone(), path);
            self.readers.push(runtime.spawn(reader));
        }
        Ok(())
    }

    fn remove(&mut self) {
        for reader in self.readers.drain(..) {
            reader.abort();
        }
        self.pointer.detach();
        debug!("Released wheel devices");
    }

    fn is_installed(&self) -> bool {
        !self.readers.is_empty()
    }
}

/// Read one grabbed device until it disappears
async fn pump(mut stream: EventStream, engine: EngineHandle, pointer: VirtualPointer, path: PathBuf) {
    let mut frame: Vec<InputEvent> = Vec::with_capacity(8);

    loop {
        let event = match stream.next_event().await {
            Ok(event) => event,
            Err(e) => {
                warn!(path = %path.display(), "Wheel device gone, stopped reading: {}", e);
                break;
            }
        };

        match handle_event(event, &mut frame, |raw| engine.observe(raw)) {
            Action::Replay(replay) => {
                if let Err(e) = pointer.forward(&replay) {
                    trace!("Replay dropped: {}", e);
                }
            }
            Action::Rearm => {
                let device = stream.device_mut();
                if let Err(e) = device.ungrab() {
                    trace!("Ungrab before re-arm failed: {}", e);
                }
                match device.grab() {
                    Ok(()) => debug!(path = %path.display(), "Re-armed wheel device"),
                    Err(e) => warn!(path = %path.display(), "Re-arm failed: {}", e),
                }
            }
            Action::Buffered | Action::Discarded => {}
        }
    }
}
