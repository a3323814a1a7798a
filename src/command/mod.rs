//! Command routing
//!
//! Translates `(address, arguments)` pairs delivered by the transport into
//! segment and effect mutations. Every handler validates the whole message
//! before it assigns anything, so a rejected command leaves no trace.

mod address;

use embassy_time::Instant;
use heapless::{String, Vec};
use thiserror::Error;

pub use address::{Route, SegmentField, Target};

use crate::effect::{Effect, EffectId, RegistryError};
use crate::palette::ColorId;
use crate::segment::{DimmerEnvelope, MoveRange, Preset, Segment, SegmentId};

/// Longest address a queued [`Command`] can hold
pub const MAX_ADDRESS_LEN: usize = 64;

/// Most arguments a queued [`Command`] can hold
pub const MAX_ARGS: usize = 8;

/// A typed message argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    Int(i32),
    Float(f32),
    Bool(bool),
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Reasons a command was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("malformed address")]
    MalformedAddress,
    #[error("effect {received} does not match live effect {expected}")]
    EffectMismatch {
        expected: EffectId,
        received: EffectId,
    },
    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),
    #[error("segment {0} already exists")]
    DuplicateSegment(SegmentId),
    #[error("segment capacity exceeded")]
    CapacityExceeded,
    #[error("expected {expected} arguments, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("invalid argument at index {index}")]
    InvalidArgument { index: usize },
    #[error("unknown preset {0}")]
    UnknownPreset(i32),
    #[error("unknown preset name")]
    UnknownPresetName,
    #[error("command does not fit the queue entry")]
    CommandTooLarge,
}

impl From<RegistryError> for CommandError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::CapacityExceeded => Self::CapacityExceeded,
            RegistryError::DuplicateId(id) => Self::DuplicateSegment(id),
            RegistryError::NotFound(id) => Self::SegmentNotFound(id),
        }
    }
}

/// An owned command, ready to be queued between transport and render loop
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    address: String<MAX_ADDRESS_LEN>,
    args: Vec<Arg, MAX_ARGS>,
}

impl Command {
    pub fn new(address: &str, args: &[Arg]) -> Result<Self, CommandError> {
        let mut owned = String::new();
        owned
            .push_str(address)
            .map_err(|()| CommandError::CommandTooLarge)?;
        let args = Vec::from_slice(args).map_err(|()| CommandError::CommandTooLarge)?;
        Ok(Self {
            address: owned,
            args,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

/// Parse, validate and apply one command.
///
/// Returns the reason when the command is dropped; the effect is unchanged
/// in that case.
pub fn dispatch<const MAX_SEGMENTS: usize>(
    address: &str,
    args: &[Arg],
    effect: &mut Effect<MAX_SEGMENTS>,
    now: Instant,
) -> Result<(), CommandError> {
    let route = Route::parse(address).ok_or(CommandError::MalformedAddress)?;
    if route.effect != effect.id() {
        return Err(CommandError::EffectMismatch {
            expected: effect.id(),
            received: route.effect,
        });
    }

    match route.target {
        Target::Segment { id, field } => {
            let led_count = effect.led_count();
            let segment = effect
                .find_mut(id)
                .ok_or(CommandError::SegmentNotFound(id))?;
            apply_field(segment, field, args, led_count)?;
            log::debug!("segment {}: updated {}", id, field.as_str());
        }
        Target::CreateSegment => create_segment(effect, args, now)?,
        Target::DeleteSegment => {
            let id = int_arg(args, 0)?;
            effect.remove(id)?;
            log::debug!("segment {}: deleted", id);
        }
        Target::Settings => {
            expect_args(args, 2)?;
            let led_count = int_arg(args, 0)?;
            let fps = int_arg(args, 1)?;
            effect.apply_settings(led_count, fps);
            log::debug!(
                "effect settings: leds={}, fps={}",
                effect.led_count(),
                effect.fps()
            );
        }
        Target::Clear => {
            effect.clear();
            log::debug!("effect {}: cleared", effect.id());
        }
    }

    Ok(())
}

fn create_segment<const MAX_SEGMENTS: usize>(
    effect: &mut Effect<MAX_SEGMENTS>,
    args: &[Arg],
    now: Instant,
) -> Result<(), CommandError> {
    let id = int_arg(args, 0)?;
    let initial_position = optional_int_arg(args, 1)?.unwrap_or(0);
    let min = optional_int_arg(args, 2)?.unwrap_or(0);
    let max = optional_int_arg(args, 3)?
        .unwrap_or_else(|| i32::from(effect.led_count()).saturating_sub(1));

    if effect.contains(id) {
        return Err(CommandError::DuplicateSegment(id));
    }

    let range = MoveRange::new(min, max, effect.led_count());
    effect.insert(Segment::new(id, initial_position, range, now))?;
    log::debug!("segment {}: created", id);
    Ok(())
}

/// Validate the arguments of a field update, then assign
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_field(
    segment: &mut Segment,
    field: SegmentField,
    args: &[Arg],
    led_count: u16,
) -> Result<(), CommandError> {
    match field {
        SegmentField::Color => {
            let colors = int_args::<4>(args)?.map(ColorId::new);
            segment.set_colors(colors);
        }
        SegmentField::Transparency => {
            let transparencies = float_args::<4>(args)?;
            segment.set_transparencies(transparencies);
        }
        SegmentField::Length => {
            let lengths = int_args::<3>(args)?.map(|length| {
                length.clamp(1, i32::from(u16::MAX)) as u16
            });
            segment.set_lengths(lengths);
        }
        SegmentField::MoveSpeed => {
            let [speed] = float_args::<1>(args)?;
            segment.set_move_speed(speed);
        }
        SegmentField::MoveRange => {
            let [min, max] = int_args::<2>(args)?;
            segment.set_move_range(MoveRange::new(min, max, led_count));
        }
        SegmentField::InitialPosition => {
            let [position] = int_args::<1>(args)?;
            segment.set_initial_position(position);
        }
        SegmentField::IsEdgeReflect => {
            let reflect = bool_arg(args, 0)?;
            segment.set_edge_reflect(reflect);
        }
        SegmentField::DimmerTime => {
            let times = int_args::<5>(args)?;
            segment.set_envelope(DimmerEnvelope::repaired(times));
        }
        SegmentField::Preset => {
            let [raw] = int_args::<1>(args)?;
            let preset = Preset::from_raw(raw).ok_or(CommandError::UnknownPreset(raw))?;
            preset.apply(segment);
            log::debug!("segment {}: preset {}", segment.id(), preset.as_str());
        }
    }
    Ok(())
}

fn expect_args(args: &[Arg], expected: usize) -> Result<(), CommandError> {
    if args.len() < expected {
        return Err(CommandError::MissingArguments {
            expected,
            received: args.len(),
        });
    }
    Ok(())
}

fn int_arg(args: &[Arg], index: usize) -> Result<i32, CommandError> {
    match args.get(index) {
        Some(Arg::Int(value)) => Ok(*value),
        Some(_) => Err(CommandError::InvalidArgument { index }),
        None => Err(CommandError::MissingArguments {
            expected: index + 1,
            received: args.len(),
        }),
    }
}

fn optional_int_arg(args: &[Arg], index: usize) -> Result<Option<i32>, CommandError> {
    if index >= args.len() {
        return Ok(None);
    }
    int_arg(args, index).map(Some)
}

#[allow(clippy::cast_precision_loss)]
fn float_arg(args: &[Arg], index: usize) -> Result<f32, CommandError> {
    match args.get(index) {
        Some(Arg::Float(value)) if value.is_finite() => Ok(*value),
        Some(Arg::Int(value)) => Ok(*value as f32),
        Some(_) => Err(CommandError::InvalidArgument { index }),
        None => Err(CommandError::MissingArguments {
            expected: index + 1,
            received: args.len(),
        }),
    }
}

fn bool_arg(args: &[Arg], index: usize) -> Result<bool, CommandError> {
    match args.get(index) {
        Some(Arg::Bool(value)) => Ok(*value),
        Some(Arg::Int(value)) => Ok(*value != 0),
        Some(_) => Err(CommandError::InvalidArgument { index }),
        None => Err(CommandError::MissingArguments {
            expected: index + 1,
            received: args.len(),
        }),
    }
}

/// Read the first `N` arguments as integers
fn int_args<const N: usize>(args: &[Arg]) -> Result<[i32; N], CommandError> {
    expect_args(args, N)?;
    let mut values = [0; N];
    for (index, value) in values.iter_mut().enumerate() {
        *value = int_arg(args, index)?;
    }
    Ok(values)
}

/// Read the first `N` arguments as finite floats
fn float_args<const N: usize>(args: &[Arg]) -> Result<[f32; N], CommandError> {
    expect_args(args, N)?;
    let mut values = [0.0; N];
    for (index, value) in values.iter_mut().enumerate() {
        *value = float_arg(args, index)?;
    }
    Ok(values)
}
