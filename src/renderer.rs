use embassy_time::Instant;

use crate::color::{Rgb, blend_over, lerp_f32, lerp_rgb};
use crate::effect::Effect;
use crate::segment::Segment;

/// Composites effect segments into a frame buffer
///
/// `MAX_LEDS` is the physical strip length; the rendered frame is the
/// first `led_count` LEDs of the buffer.
pub struct Renderer<const MAX_LEDS: usize> {
    frame_buffer: [Rgb; MAX_LEDS],
}

impl<const MAX_LEDS: usize> Default for Renderer<MAX_LEDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_LEDS: usize> Renderer<MAX_LEDS> {
    pub const fn new() -> Self {
        Self {
            frame_buffer: [Rgb { r: 0, g: 0, b: 0 }; MAX_LEDS],
        }
    }

    /// Render one frame
    ///
    /// Clears the whole buffer to black, then draws every segment in
    /// registry order so later segments cover earlier ones. LEDs past the
    /// current led count stay black.
    pub fn render<const MAX_SEGMENTS: usize>(
        &mut self,
        effect: &Effect<MAX_SEGMENTS>,
        now: Instant,
    ) -> &[Rgb] {
        let len = usize::from(effect.led_count()).min(MAX_LEDS);
        self.frame_buffer.fill(Rgb::default());
        let frame = &mut self.frame_buffer[..len];

        for segment in effect.iter() {
            render_segment(segment, segment.dimming(now), frame);
        }

        frame
    }

    /// Whole strip as last rendered. LEDs beyond the led count are black.
    pub fn frame_buffer(&self) -> &[Rgb] {
        &self.frame_buffer
    }
}

/// Draw one segment over `leds`.
///
/// `dimming` scales every control point transparency, so a fully dimmed
/// segment paints its colors opaquely.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn render_segment(segment: &Segment, dimming: f32, leds: &mut [Rgb]) {
    let points = segment.control_points();
    let range = segment.move_range();
    let last_led = i32::try_from(leds.len()).unwrap_or(i32::MAX) - 1;

    let start = points[0]
        .min(points[3])
        .max(0)
        .max(i32::from(range.min()));
    let end = points[0]
        .max(points[3])
        .min(last_led)
        .min(i32::from(range.max()));

    let colors = segment.colors();
    let transparencies = segment.transparencies();

    for pixel in start..=end {
        let Some(section) = (0..3).find(|&i| between(pixel, points[i], points[i + 1])) else {
            continue;
        };

        let from = points[section];
        let to = points[section + 1];
        let t = if from == to {
            0.0
        } else {
            ((pixel - from) as f32 / (to - from) as f32).clamp(0.0, 1.0)
        };

        let color = lerp_rgb(colors[section].rgb(), colors[section + 1].rgb(), t);
        let transparency =
            lerp_f32(transparencies[section], transparencies[section + 1], t) * dimming;

        if transparency < 1.0 {
            let led = &mut leds[pixel as usize];
            *led = blend_over(*led, color, transparency);
        }
    }
}

/// Checks if `pixel` lies between `a` and `b`, in either order
#[inline]
fn between(pixel: i32, a: i32, b: i32) -> bool {
    a.min(b) <= pixel && pixel <= a.max(b)
}
