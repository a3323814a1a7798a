//! Dimmer envelope
//!
//! A periodic brightness curve: dark, linear fade-in, lit plateau, linear
//! fade-out, dark again until the cycle restarts. All timestamps are
//! milliseconds relative to the segment start.

use embassy_time::Duration;

/// Cycle used when a zero cycle period is requested through a command
pub const DEFAULT_CYCLE_MS: u32 = 1000;

/// Timestamps of the four envelope phases plus the cycle length.
///
/// A cycle of `0` disables the envelope: [`DimmerEnvelope::factor`] is then
/// always `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimmerEnvelope {
    fade_in_start: u32,
    fade_in_end: u32,
    fade_out_start: u32,
    fade_out_end: u32,
    cycle: u32,
}

impl DimmerEnvelope {
    /// Envelope that never dims
    pub const ALWAYS_LIT: Self = Self::from_raw([0, 0, 0, 0, 0]);

    /// Build an envelope from `[fade_in_start, fade_in_end, fade_out_start,
    /// fade_out_end, cycle]` without any validation.
    ///
    /// Used for built-in tables that are ordered by construction.
    pub const fn from_raw(times: [u32; 5]) -> Self {
        Self {
            fade_in_start: times[0],
            fade_in_end: times[1],
            fade_out_start: times[2],
            fade_out_end: times[3],
            cycle: times[4],
        }
    }

    /// Build an envelope from untrusted values, repairing it into a valid
    /// shape.
    ///
    /// Negative values become `0`. A phase that comes before its predecessor
    /// is moved one millisecond after it; both ramps are forced to be at
    /// least one millisecond wide. A zero cycle is replaced by
    /// [`DEFAULT_CYCLE_MS`] and a cycle shorter than the fade-out is extended
    /// to one millisecond past it.
    #[allow(clippy::cast_sign_loss)]
    pub fn repaired(times: [i32; 5]) -> Self {
        let [fade_in_start, fade_in_end, fade_out_start, fade_out_end, cycle] =
            times.map(|t| t.max(0) as u32);

        let fade_in_end = if fade_in_end <= fade_in_start {
            fade_in_start.saturating_add(1)
        } else {
            fade_in_end
        };
        let fade_out_start = if fade_out_start < fade_in_end {
            fade_in_end.saturating_add(1)
        } else {
            fade_out_start
        };
        let fade_out_end = if fade_out_end <= fade_out_start {
            fade_out_start.saturating_add(1)
        } else {
            fade_out_end
        };
        let cycle = if cycle == 0 { DEFAULT_CYCLE_MS } else { cycle };
        let cycle = if cycle < fade_out_end {
            fade_out_end.saturating_add(1)
        } else {
            cycle
        };

        Self {
            fade_in_start,
            fade_in_end,
            fade_out_start,
            fade_out_end,
            cycle,
        }
    }

    pub const fn fade_in_start(&self) -> u32 {
        self.fade_in_start
    }

    pub const fn fade_in_end(&self) -> u32 {
        self.fade_in_end
    }

    pub const fn fade_out_start(&self) -> u32 {
        self.fade_out_start
    }

    pub const fn fade_out_end(&self) -> u32 {
        self.fade_out_end
    }

    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Returns all five timestamps in phase order
    pub const fn as_array(&self) -> [u32; 5] {
        [
            self.fade_in_start,
            self.fade_in_end,
            self.fade_out_start,
            self.fade_out_end,
            self.cycle,
        ]
    }

    /// Returns true if the envelope is disabled
    pub const fn is_always_lit(&self) -> bool {
        self.cycle == 0
    }

    /// Brightness factor in `[0, 1]` after `elapsed` time since segment start
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn factor(&self, elapsed: Duration) -> f32 {
        if self.is_always_lit() {
            return 1.0;
        }

        // The remainder is below `cycle`, so it fits in u32
        let t = (elapsed.as_millis() % u64::from(self.cycle)) as u32;

        if t < self.fade_in_start {
            0.0
        } else if t < self.fade_in_end {
            ramp(t - self.fade_in_start, self.fade_in_end - self.fade_in_start)
        } else if t < self.fade_out_start {
            1.0
        } else if t < self.fade_out_end {
            1.0 - ramp(
                t - self.fade_out_start,
                self.fade_out_end - self.fade_out_start,
            )
        } else {
            0.0
        }
    }
}

/// Progress of `offset` across a span of `width` milliseconds
#[inline]
#[allow(clippy::cast_precision_loss)]
fn ramp(offset: u32, width: u32) -> f32 {
    if width == 0 {
        return 1.0;
    }
    (offset as f32 / width as f32).clamp(0.0, 1.0)
}
