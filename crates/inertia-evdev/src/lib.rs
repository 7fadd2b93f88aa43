//! Linux input backend
//!
//! Wheel-capable pointer devices are grabbed exclusively through evdev. Their
//! events are regrouped into `SYN_REPORT` frames; wheel frames go through the
//! scroll engine, everything else is replayed unchanged on a uinput virtual
//! pointer, which also carries the synthesized momentum scroll.
//!
//! The virtual pointer is skipped by name during discovery and all of its
//! wheel output is high-resolution, so the engine never sees its own events.

pub mod discovery;
pub mod filter;
pub mod frame;
pub mod virtual_pointer;

pub use discovery::{list_wheel_devices, WheelDevice};
pub use filter::EvdevFilter;
pub use virtual_pointer::VirtualPointer;
