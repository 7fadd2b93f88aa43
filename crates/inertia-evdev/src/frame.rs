//! Wheel classification of evdev report frames

use evdev::{EventType, InputEvent, RelativeAxisType};
use inertia_core::ScrollSample;

/// Hi-res units per wheel detent
pub const HI_RES_PER_DETENT: i32 = 120;

fn is_wheel_code(code: u16) -> bool {
    code == RelativeAxisType::REL_WHEEL.0 || code == RelativeAxisType::REL_WHEEL_HI_RES.0
}

fn is_rel(event: &InputEvent) -> bool {
    event.event_type() == EventType::RELATIVE
}

/// Vertical wheel sample carried by one report frame, if any
///
/// A hi-res value that is not a whole number of detents comes from a
/// free-spinning or smooth wheel and is tagged continuous. Otherwise the
/// frame is one discrete click of `REL_WHEEL` ticks.
pub fn wheel_sample(frame: &[InputEvent]) -> Option<ScrollSample> {
    let mut detents = None;
    let mut hi_res = None;

    for event in frame.iter().filter(|e| is_rel(e)) {
        if event.code() == RelativeAxisType::REL_WHEEL.0 {
            detents = Some(event.value());
        } else if event.code() == RelativeAxisType::REL_WHEEL_HI_RES.0 {
            hi_res = Some(event.value());
        }
    }

    match (detents, hi_res) {
        (_, Some(h)) if h % HI_RES_PER_DETENT != 0 => Some(ScrollSample::continuous(
            f64::from(h) / f64::from(HI_RES_PER_DETENT),
        )),
        (Some(d), _) if d != 0 => Some(ScrollSample::discrete(f64::from(d))),
        (None, Some(h)) if h != 0 => Some(ScrollSample::discrete(f64::from(
            h / HI_RES_PER_DETENT,
        ))),
        _ => None,
    }
}

/// Events to replay on the virtual pointer
///
/// Keys and relative motion are kept; with `suppress_wheel` the vertical
/// wheel codes are dropped. Sync and misc events are regenerated by uinput.
pub fn forwarded(frame: &[InputEvent], suppress_wheel: bool) -> Vec<InputEvent> {
    frame
        .iter()
        .filter(|e| match e.event_type() {
            EventType::KEY => true,
            EventType::RELATIVE => !(suppress_wheel && is_wheel_code(e.code())),
            _ => false,
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(axis: RelativeAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::RELATIVE, axis.0, value)
    }

    #[test]
    fn test_detent_click() {
        let frame = [
            rel(RelativeAxisType::REL_WHEEL, -1),
            rel(RelativeAxisType::REL_WHEEL_HI_RES, -120),
        ];
        let sample = wheel_sample(&frame).unwrap();
        assert!(!sample.continuous);
        assert_eq!(sample.delta, -1.0);
    }

    #[test]
    fn test_partial_detent_is_continuous() {
        let frame = [rel(RelativeAxisType::REL_WHEEL_HI_RES, 30)];
        let sample = wheel_sample(&frame).unwrap();
        assert!(sample.continuous);
        assert_eq!(sample.delta, 0.25);
    }

    #[test]
    fn test_legacy_wheel_without_hi_res() {
        let sample = wheel_sample(&[rel(RelativeAxisType::REL_WHEEL, 2)]).unwrap();
        assert!(!sample.continuous);
        assert_eq!(sample.delta, 2.0);
    }

    #[test]
    fn test_motion_only_frame() {
        let frame = [
            rel(RelativeAxisType::REL_X, 3),
            rel(RelativeAxisType::REL_HWHEEL, 1),
        ];
        assert!(wheel_sample(&frame).is_none());
    }

    #[test]
    fn test_forwarding_drops_only_wheel() {
        let frame = [
            rel(RelativeAxisType::REL_X, 3),
            rel(RelativeAxisType::REL_WHEEL, 1),
            rel(RelativeAxisType::REL_WHEEL_HI_RES, 120),
            rel(RelativeAxisType::REL_HWHEEL, 1),
            InputEvent::new(EventType::MISC, 4, 0x90001),
        ];

        let kept = forwarded(&frame, true);
        let codes: Vec<u16> = kept.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec![RelativeAxisType::REL_X.0, RelativeAxisType::REL_HWHEEL.0]
        );

        assert_eq!(forwarded(&frame, false).len(), 4);
    }
}
