//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::engine::LightEngine;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Duration of one frame at `fps` frames per second
pub fn frame_duration(fps: u16) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
}

/// Portable frame scheduler that manages timing without async.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Ticks the engine and hands the frame to the output driver
/// - Returns timing info so the caller can sleep appropriately
///
/// The frame duration follows the effect's frame rate, so a `settings`
/// command retimes the loop from the next frame on.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(engine, driver);
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<
    'a,
    O: OutputDriver,
    const MAX_LEDS: usize,
    const MAX_SEGMENTS: usize,
    const QUEUE_SIZE: usize,
> {
    output: O,
    engine: LightEngine<'a, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE>,
    next_frame: Option<Instant>,
}

impl<'a, O: OutputDriver, const MAX_LEDS: usize, const MAX_SEGMENTS: usize, const QUEUE_SIZE: usize>
    FrameScheduler<'a, O, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE>
{
    /// Create a new frame scheduler.
    pub fn new(engine: LightEngine<'a, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE>, driver: O) -> Self {
        Self {
            output: driver,
            engine,
            next_frame: None,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Ticks the engine (commands, motion, render)
    /// 3. Writes to the output driver
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let frame_duration = frame_duration(self.engine.effect().fps());

        // Drift correction: more than two frames behind resets to now,
        // which prevents catch-up bursts after long stalls
        let max_drift = frame_duration * 2;
        let deadline = match self.next_frame {
            Some(deadline) if now <= deadline + max_drift => deadline,
            _ => now,
        };

        let frame = self.engine.tick(now);
        self.output.write(frame);

        let next_deadline = deadline + frame_duration;
        self.next_frame = Some(next_deadline);

        let sleep_duration = next_deadline
            .checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0));

        FrameResult {
            next_deadline,
            sleep_duration,
        }
    }

    /// Get a reference to the engine.
    pub fn engine(&self) -> &LightEngine<'a, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE> {
        &self.engine
    }

    /// Get a mutable reference to the engine.
    pub fn engine_mut(&mut self) -> &mut LightEngine<'a, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE> {
        &mut self.engine
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }
}
