//! uinput virtual pointer
//!
//! Replays grabbed input and carries synthesized scroll events.

use std::path::PathBuf;
use std::sync::Arc;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, Device, EventType, InputEvent, Key, RelativeAxisType};
use parking_lot::Mutex;

use inertia_core::engine::synthesis::AxisDelta;
use inertia_core::engine::PIXELS_PER_LINE;
use inertia_core::{Error, EventPoster, Result, SyntheticScroll};

use crate::frame::HI_RES_PER_DETENT;

/// Build a virtual pointer able to replay every source device
///
/// Capabilities are the union of the sources plus both wheel resolutions.
pub fn build_virtual_device(name: &str, sources: &[(PathBuf, Device)]) -> Result<VirtualDevice> {
    let mut axes = AttributeSet::<RelativeAxisType>::new();
    let mut keys = AttributeSet::<Key>::new();

    for (_, device) in sources {
        if let Some(supported) = device.supported_relative_axes() {
            supported.iter().for_each(|axis| axes.insert(axis));
        }
        if let Some(supported) = device.supported_keys() {
            supported.iter().for_each(|key| keys.insert(key));
        }
    }
    axes.insert(RelativeAxisType::REL_WHEEL);
    axes.insert(RelativeAxisType::REL_WHEEL_HI_RES);

    let install_err = |e: std::io::Error| Error::FilterInstall(format!("uinput: {}", e));

    let mut builder = VirtualDeviceBuilder::new()
        .map_err(install_err)?
        .name(name)
        .with_relative_axes(&axes)
        .map_err(install_err)?;
    if keys.iter().next().is_some() {
        builder = builder.with_keys(&keys).map_err(install_err)?;
    }
    builder.build().map_err(install_err)
}

/// Hi-res units per whole pixel; exact, so no remainder needs carrying
const HI_RES_PER_PIXEL: i64 = HI_RES_PER_DETENT as i64 / PIXELS_PER_LINE as i64;

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Hi-res wheel value for a whole-pixel delta
fn hi_res_units(pixels: i64) -> i32 {
    saturate(pixels.saturating_mul(HI_RES_PER_PIXEL))
}

fn axis_events(delta: &AxisDelta, lines: RelativeAxisType, hi_res: RelativeAxisType) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(2);
    let units = hi_res_units(delta.pixels);
    if units != 0 {
        events.push(InputEvent::new(EventType::RELATIVE, hi_res.0, units));
    }
    if delta.lines != 0 {
        events.push(InputEvent::new(EventType::RELATIVE, lines.0, saturate(delta.lines)));
    }
    events
}

/// Wheel events for one synthetic scroll
pub fn scroll_events(event: &SyntheticScroll) -> Vec<InputEvent> {
    let mut events = axis_events(
        &event.primary,
        RelativeAxisType::REL_WHEEL,
        RelativeAxisType::REL_WHEEL_HI_RES,
    );
    events.extend(axis_events(
        &event.secondary,
        RelativeAxisType::REL_HWHEEL,
        RelativeAxisType::REL_HWHEEL_HI_RES,
    ));
    events
}

/// Shared handle to the uinput device
///
/// Empty until the filter installs; posting while empty fails with
/// [`Error::Synthesis`].
#[derive(Clone, Default)]
pub struct VirtualPointer {
    device: Arc<Mutex<Option<VirtualDevice>>>,
}

impl VirtualPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(&self, device: VirtualDevice) {
        *self.device.lock() = Some(device);
    }

    pub(crate) fn detach(&self) {
        self.device.lock().take();
    }

    pub fn is_attached(&self) -> bool {
        self.device.lock().is_some()
    }

    /// Emit one report frame
    pub fn forward(&self, events: &[InputEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let mut guard = self.device.lock();
        let device = guard
            .as_mut()
            .ok_or_else(|| Error::Synthesis("virtual pointer not attached".to_string()))?;
        device
            .emit(events)
            .map_err(|e| Error::Synthesis(e.to_string()))
    }
}

impl EventPoster for VirtualPointer {
    fn post(&self, event: &SyntheticScroll) -> Result<()> {
        self.forward(&scroll_events(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inertia_core::engine::synthesis::FIXED_POINT_SCALE;
    use inertia_core::engine::Quantizer;

    fn vertical(lines: i64, pixels: i64) -> SyntheticScroll {
        SyntheticScroll::vertical(AxisDelta {
            lines,
            pixels,
            fixed_point: (pixels as f64 / PIXELS_PER_LINE * FIXED_POINT_SCALE) as i64,
        })
    }

    fn posted_hi_res(events: &[InputEvent]) -> i64 {
        events
            .iter()
            .filter(|e| e.code() == RelativeAxisType::REL_WHEEL_HI_RES.0)
            .map(|e| i64::from(e.value()))
            .sum()
    }

    #[test]
    fn test_hi_res_scaling() {
        assert_eq!(hi_res_units(10), 120);
        assert_eq!(hi_res_units(-10), -120);
        assert_eq!(hi_res_units(5), 60);
        assert_eq!(hi_res_units(1), 12);
        assert_eq!(hi_res_units(0), 0);
    }

    #[test]
    fn test_scroll_events() {
        let events = scroll_events(&vertical(1, 15));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code(), RelativeAxisType::REL_WHEEL_HI_RES.0);
        assert_eq!(events[0].value(), 180);
        assert_eq!(events[1].code(), RelativeAxisType::REL_WHEEL.0);
        assert_eq!(events[1].value(), 1);
    }

    #[test]
    fn test_sub_line_scroll_is_hi_res_only() {
        let events = scroll_events(&vertical(0, 5));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code(), RelativeAxisType::REL_WHEEL_HI_RES.0);
        // Not a whole detent, so our own output reads back as continuous
        assert_ne!(events[0].value() % HI_RES_PER_DETENT, 0);
    }

    #[test]
    fn test_hi_res_output_tracks_pixels() {
        let mut q = Quantizer::new();
        let mut pixels = 0;
        let mut hi_res = 0;
        for _ in 0..1000 {
            if let Some(event) = q.push(6.0) {
                pixels += event.primary.pixels;
                hi_res += posted_hi_res(&scroll_events(&event));
            }
        }
        assert_eq!(pixels, 6000);
        assert_eq!(hi_res, 72000);
    }

    #[test]
    fn test_hi_res_no_drift_on_fractional_frames() {
        let mut q = Quantizer::new();
        let mut hi_res = 0;
        for _ in 0..1000 {
            if let Some(event) = q.push(-2.37) {
                hi_res += posted_hi_res(&scroll_events(&event));
            }
        }
        let exact = -2.37 * 1000.0 * HI_RES_PER_PIXEL as f64;
        // Within one pixel of the integrated delta
        assert!((exact - hi_res as f64).abs() <= HI_RES_PER_PIXEL as f64);
    }

    #[test]
    fn test_detached_pointer_rejects_posts() {
        let pointer = VirtualPointer::new();
        assert!(!pointer.is_attached());
        assert!(matches!(
            pointer.post(&vertical(1, 10)),
            Err(Error::Synthesis(_))
        ));
        assert!(pointer.forward(&[]).is_ok());
    }
}
