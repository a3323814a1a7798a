//! Light segments
//!
//! A segment is a four point color/transparency ramp that moves along the
//! strip. All mutation goes through methods that keep the segment valid:
//! lengths are never zero, transparencies stay in `[0, 1]`, the move range
//! is ordered and colors are always palette indices.

mod envelope;
mod motion;
mod preset;

use embassy_time::{Duration, Instant};
pub use envelope::{DEFAULT_CYCLE_MS, DimmerEnvelope};
pub use motion::{reflect, wrap};
pub use preset::Preset;

use crate::palette::ColorId;

/// External handle of a segment
pub type SegmentId = i32;

pub const DEFAULT_COLORS: [ColorId; 4] = [
    ColorId::RED,
    ColorId::GREEN,
    ColorId::BLUE,
    ColorId::YELLOW,
];
pub const DEFAULT_TRANSPARENCY: [f32; 4] = [0.0; 4];
pub const DEFAULT_LENGTHS: [u16; 3] = [10; 3];
pub const DEFAULT_MOVE_SPEED: f32 = 20.0;

/// Direction the ramp extends to from its anchor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher LED indices
    Forward,
    /// Towards lower LED indices
    Backward,
}

impl Direction {
    /// Direction matching the sign of `speed`. Zero counts as forward.
    pub fn from_speed(speed: f32) -> Self {
        if speed < 0.0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    pub const fn sign(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Closed interval of LED indices a segment moves and renders within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRange {
    min: u16,
    max: u16,
}

impl MoveRange {
    /// Create a range clamped to `[0, led_count - 1]`.
    ///
    /// Bounds received in the wrong order are swapped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(a: i32, b: i32, led_count: u16) -> Self {
        let last = i32::from(led_count.max(1) - 1);
        let a = a.clamp(0, last) as u16;
        let b = b.clamp(0, last) as u16;
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Range covering the whole strip
    pub fn full(led_count: u16) -> Self {
        Self::new(0, i32::from(led_count).saturating_sub(1), led_count)
    }

    pub const fn min(self) -> u16 {
        self.min
    }

    pub const fn max(self) -> u16 {
        self.max
    }

    /// Number of pixels in the range, both ends included
    pub const fn width(self) -> u16 {
        self.max - self.min + 1
    }

    pub fn contains(self, pixel: i32) -> bool {
        pixel >= i32::from(self.min) && pixel <= i32::from(self.max)
    }

    /// Re-clamp the range after the strip length changed
    #[must_use]
    pub fn clamped(self, led_count: u16) -> Self {
        Self::new(i32::from(self.min), i32::from(self.max), led_count)
    }
}

/// One independently moving and dimmed light pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: SegmentId,
    colors: [ColorId; 4],
    transparencies: [f32; 4],
    lengths: [u16; 3],
    move_speed: f32,
    direction: Direction,
    move_range: MoveRange,
    initial_position: i32,
    position: f32,
    edge_reflect: bool,
    envelope: DimmerEnvelope,
    start_time: Instant,
}

impl Segment {
    /// Create a segment with default look and motion
    #[allow(clippy::cast_precision_loss)]
    pub fn new(id: SegmentId, initial_position: i32, range: MoveRange, now: Instant) -> Self {
        Self {
            id,
            colors: DEFAULT_COLORS,
            transparencies: DEFAULT_TRANSPARENCY,
            lengths: DEFAULT_LENGTHS,
            move_speed: DEFAULT_MOVE_SPEED,
            direction: Direction::from_speed(DEFAULT_MOVE_SPEED),
            move_range: range,
            initial_position,
            position: initial_position as f32,
            edge_reflect: false,
            envelope: DimmerEnvelope::ALWAYS_LIT,
            start_time: now,
        }
    }

    pub const fn id(&self) -> SegmentId {
        self.id
    }

    pub const fn colors(&self) -> [ColorId; 4] {
        self.colors
    }

    pub fn set_colors(&mut self, colors: [ColorId; 4]) {
        self.colors = colors;
    }

    pub const fn transparencies(&self) -> [f32; 4] {
        self.transparencies
    }

    /// Set control point transparencies, clamped into `[0, 1]`
    pub fn set_transparencies(&mut self, transparencies: [f32; 4]) {
        self.transparencies = transparencies.map(clamp_unit);
    }

    pub const fn lengths(&self) -> [u16; 3] {
        self.lengths
    }

    /// Set distances between control points. Zero is raised to one.
    pub fn set_lengths(&mut self, lengths: [u16; 3]) {
        self.lengths = lengths.map(|length| length.max(1));
    }

    pub const fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Set the speed in pixels per second.
    ///
    /// The direction flips only when the sign actually changes from positive
    /// to negative or back. Stopping or starting from zero keeps it.
    pub fn set_move_speed(&mut self, speed: f32) {
        let flipped = (speed > 0.0 && self.move_speed < 0.0)
            || (speed < 0.0 && self.move_speed > 0.0);
        if flipped {
            self.direction = self.direction.reversed();
        }
        self.move_speed = speed;
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn move_range(&self) -> MoveRange {
        self.move_range
    }

    pub fn set_move_range(&mut self, range: MoveRange) {
        self.move_range = range;
    }

    pub const fn initial_position(&self) -> i32 {
        self.initial_position
    }

    /// Set the start position and move the segment there
    #[allow(clippy::cast_precision_loss)]
    pub fn set_initial_position(&mut self, position: i32) {
        self.initial_position = position;
        self.position = position as f32;
    }

    /// Current sub-pixel position of the first control point
    pub const fn position(&self) -> f32 {
        self.position
    }

    /// Move the segment without touching its initial position.
    ///
    /// The next motion update folds the position back into the range.
    pub fn set_position(&mut self, position: f32) {
        if position.is_finite() {
            self.position = position;
        }
    }

    pub const fn is_edge_reflect(&self) -> bool {
        self.edge_reflect
    }

    pub fn set_edge_reflect(&mut self, reflect: bool) {
        self.edge_reflect = reflect;
    }

    pub const fn envelope(&self) -> DimmerEnvelope {
        self.envelope
    }

    pub fn set_envelope(&mut self, envelope: DimmerEnvelope) {
        self.envelope = envelope;
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Envelope brightness factor at `now`
    pub fn dimming(&self, now: Instant) -> f32 {
        let elapsed = now
            .checked_duration_since(self.start_time)
            .unwrap_or(Duration::from_ticks(0));
        self.envelope.factor(elapsed)
    }

    /// Pixel positions of the four control points.
    ///
    /// The first point sits at the truncated position, the others follow in
    /// the current direction.
    #[allow(clippy::cast_possible_truncation)]
    pub fn control_points(&self) -> [i32; 4] {
        let step = self.direction.sign();
        let first = self.position as i32;
        let second = first.saturating_add(step * i32::from(self.lengths[0]));
        let third = second.saturating_add(step * i32::from(self.lengths[1]));
        let fourth = third.saturating_add(step * i32::from(self.lengths[2]));
        [first, second, third, fourth]
    }
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
