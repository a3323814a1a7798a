//! Segment kinematics

use libm::{ceilf, fabsf, fmodf};

use super::{Direction, MoveRange, Segment};

impl Segment {
    /// Advance the segment by `dt` seconds and apply its edge policy
    pub fn advance(&mut self, dt: f32) {
        self.position += self.move_speed * dt;

        if self.edge_reflect {
            if let Some((position, direction)) = reflect(self.position, self.move_range) {
                let magnitude = fabsf(self.move_speed);
                self.position = position;
                self.direction = direction;
                self.move_speed = match direction {
                    Direction::Forward => magnitude,
                    Direction::Backward => -magnitude,
                };
            }
        } else {
            self.position = wrap(self.position, self.move_range);
        }
    }
}

/// Wrap `position` around `range`.
///
/// Leaving one edge re-enters at the other, keeping the sub-pixel residual:
/// the result equals `position` modulo the range width. A single pixel range
/// pins the position to that pixel.
pub fn wrap(position: f32, range: MoveRange) -> f32 {
    let min = f32::from(range.min());
    let max = f32::from(range.max());
    if position >= min && position <= max {
        return position;
    }
    if range.min() == range.max() {
        return min;
    }

    let width = f32::from(range.width());
    let mut offset = fmodf(position - min, width);
    if offset < 0.0 {
        offset += width;
    }
    // Adding the width to a tiny negative remainder can round up to it
    if offset >= width {
        offset -= width;
    }
    min + offset
}

/// Reflect `position` back into `range`.
///
/// Returns `None` if the position is already inside. Otherwise returns the
/// mirrored position and the direction of travel after the last bounce.
/// Overshoot longer than the range bounces as many times as needed, so the
/// result always lies within the range.
#[allow(clippy::float_cmp)]
pub fn reflect(position: f32, range: MoveRange) -> Option<(f32, Direction)> {
    let min = f32::from(range.min());
    let max = f32::from(range.max());

    let (overshoot, exit) = if position < min {
        (min - position, Direction::Backward)
    } else if position > max {
        (position - max, Direction::Forward)
    } else {
        return None;
    };

    let span = max - min;
    if span == 0.0 {
        return Some((min, exit.reversed()));
    }

    // Number of bounces, and the distance travelled after the last one
    let bounces = ceilf(overshoot / span);
    let residual = overshoot - (bounces - 1.0) * span;
    let odd = fmodf(bounces, 2.0) == 1.0;

    let (position, direction) = match (exit, odd) {
        (Direction::Backward, true) | (Direction::Forward, false) => {
            (min + residual, Direction::Forward)
        }
        (Direction::Forward, true) | (Direction::Backward, false) => {
            (max - residual, Direction::Backward)
        }
    };

    Some((position.clamp(min, max), direction))
}
