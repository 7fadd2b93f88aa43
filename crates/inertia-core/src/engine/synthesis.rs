//! Quantization of per-frame pixel deltas into synthetic scroll events
//!
//! Fractional pixels and lines are carried between frames so the emitted
//! stream never drifts more than one unit from the integrated velocity.

use super::PIXELS_PER_LINE;

/// Scale of the 16.16 fixed-point line field
pub const FIXED_POINT_SCALE: f64 = 65536.0;

/// Deltas along one scroll axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisDelta {
    /// Whole lines
    pub lines: i64,
    /// Whole pixels
    pub pixels: i64,
    /// Lines in 16.16 fixed point
    pub fixed_point: i64,
}

impl AxisDelta {
    pub const ZERO: AxisDelta = AxisDelta {
        lines: 0,
        pixels: 0,
        fixed_point: 0,
    };
}

/// A continuous scroll event manufactured by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticScroll {
    /// Always true; keeps the capture filter from re-processing our own output
    pub continuous: bool,
    pub primary: AxisDelta,
    pub secondary: AxisDelta,
}

impl SyntheticScroll {
    pub fn vertical(primary: AxisDelta) -> Self {
        Self {
            continuous: true,
            primary,
            secondary: AxisDelta::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    sub_pixel: f64,
    sub_line: f64,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's pixel delta; returns an event once a whole pixel is due
    pub fn push(&mut self, pixel_delta: f64) -> Option<SyntheticScroll> {
        let precise = pixel_delta + self.sub_pixel;
        let whole = precise.trunc();
        if whole == 0.0 {
            self.sub_pixel = precise;
            return None;
        }
        self.sub_pixel = precise - whole;

        let line_delta = whole / PIXELS_PER_LINE;
        let precise_lines = line_delta + self.sub_line;
        let whole_lines = precise_lines.trunc();
        self.sub_line = precise_lines - whole_lines;

        Some(SyntheticScroll::vertical(AxisDelta {
            lines: whole_lines as i64,
            pixels: whole as i64,
            fixed_point: (line_delta * FIXED_POINT_SCALE) as i64,
        }))
    }

    /// Fractional pixels carried to the next frame
    pub fn pixel_remainder(&self) -> f64 {
        self.sub_pixel
    }

    /// Fractional lines carried to the next event
    pub fn line_remainder(&self) -> f64 {
        self.sub_line
    }

    pub fn reset(&mut self) {
        self.sub_pixel = 0.0;
        self.sub_line = 0.0;
    }
}
