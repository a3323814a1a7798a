//! Effect - the ordered segment registry plus render settings
//!
//! Segments are kept in insertion order. Later segments are composited over
//! earlier ones, so the order is part of the visible result and removal
//! never reorders the survivors.

use embassy_time::Instant;
use heapless::Vec;
use thiserror::Error;

use crate::segment::{MoveRange, Segment, SegmentId};

/// Default segment capacity
pub const DEFAULT_MAX_SEGMENTS: usize = 10;

/// Effect id used when none is configured
pub const DEFAULT_EFFECT_ID: i32 = 1;

/// Default frame rate (frames per second)
pub const DEFAULT_FPS: u16 = 60;

/// Highest accepted frame rate
pub const MAX_FPS: u16 = 120;

pub type EffectId = i32;

/// Registry failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("segment capacity exceeded")]
    CapacityExceeded,
    #[error("segment {0} already exists")]
    DuplicateId(SegmentId),
    #[error("segment {0} not found")]
    NotFound(SegmentId),
}

/// Top level container of all active segments
#[derive(Debug, Clone)]
pub struct Effect<const MAX_SEGMENTS: usize> {
    id: EffectId,
    strip_len: u16,
    led_count: u16,
    fps: u16,
    segments: Vec<Segment, MAX_SEGMENTS>,
}

impl<const MAX_SEGMENTS: usize> Effect<MAX_SEGMENTS> {
    /// Create an empty effect.
    ///
    /// `strip_len` is the physical strip length and caps `led_count`.
    pub fn new(id: EffectId, strip_len: u16, led_count: u16, fps: u16) -> Self {
        let strip_len = strip_len.max(1);
        Self {
            id,
            strip_len,
            led_count: led_count.clamp(1, strip_len),
            fps: fps.clamp(1, MAX_FPS),
            segments: Vec::new(),
        }
    }

    pub const fn id(&self) -> EffectId {
        self.id
    }

    /// Physical strip length
    pub const fn strip_len(&self) -> u16 {
        self.strip_len
    }

    /// Number of LEDs currently rendered
    pub const fn led_count(&self) -> u16 {
        self.led_count
    }

    pub const fn fps(&self) -> u16 {
        self.fps
    }

    /// Motion timestep in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / f32::from(self.fps)
    }

    /// Change render settings.
    ///
    /// `led_count` is clamped to `[1, strip_len]`, `fps` to `[1, MAX_FPS]`.
    /// Move ranges of existing segments are re-clamped to the new length.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_settings(&mut self, led_count: i32, fps: i32) {
        self.led_count = led_count.clamp(1, i32::from(self.strip_len)) as u16;
        self.fps = fps.clamp(1, i32::from(MAX_FPS)) as u16;

        let led_count = self.led_count;
        for segment in &mut self.segments {
            segment.set_move_range(segment.move_range().clamped(led_count));
        }
    }

    /// Range covering every rendered LED
    pub fn full_range(&self) -> MoveRange {
        MoveRange::full(self.led_count)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.segments.is_full()
    }

    pub const fn capacity(&self) -> usize {
        MAX_SEGMENTS
    }

    /// Segments in composition order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn find(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.id() == id)
    }

    pub fn find_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|segment| segment.id() == id)
    }

    /// First segment in composition order
    pub fn first_mut(&mut self) -> Option<&mut Segment> {
        self.segments.first_mut()
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.find(id).is_some()
    }

    /// Append a segment.
    ///
    /// Fails without touching the registry when it is full or the id is
    /// already taken.
    pub fn insert(&mut self, segment: Segment) -> Result<(), RegistryError> {
        if self.contains(segment.id()) {
            return Err(RegistryError::DuplicateId(segment.id()));
        }
        self.segments
            .push(segment)
            .map_err(|_| RegistryError::CapacityExceeded)
    }

    /// Remove a segment, shifting the ones after it down
    pub fn remove(&mut self, id: SegmentId) -> Result<Segment, RegistryError> {
        let index = self
            .segments
            .iter()
            .position(|segment| segment.id() == id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(self.segments.remove(index))
    }

    /// Remove every segment
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Create a default segment spanning the rendered strip
    pub fn create_segment(
        &mut self,
        id: SegmentId,
        initial_position: i32,
        now: Instant,
    ) -> Result<&mut Segment, RegistryError> {
        let segment = Segment::new(id, initial_position, self.full_range(), now);
        self.insert(segment)?;
        // Just pushed, so the last slot holds it
        self.segments
            .last_mut()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Advance every segment by one frame
    pub fn update_motion(&mut self) {
        let dt = self.frame_dt();
        for segment in &mut self.segments {
            segment.advance(dt);
        }
    }
}
