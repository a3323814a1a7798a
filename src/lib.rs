#![no_std]

pub mod auto_cycle;
pub mod channel;
pub mod color;
pub mod command;
pub mod effect;
pub mod engine;
pub mod frame_scheduler;
pub mod logging;
pub mod palette;
pub mod renderer;
pub mod segment;

pub use auto_cycle::AutoCycler;
pub use channel::{
    CommandChannel, CommandReceiver, CommandSender, DefaultCommandChannel, SendError,
};
pub use command::{Arg, Command, CommandError, dispatch};
pub use effect::{Effect, EffectId, RegistryError};
pub use engine::{DefaultLightEngine, EngineConfig, LightEngine};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use palette::ColorId;
pub use renderer::Renderer;
pub use segment::{Direction, DimmerEnvelope, MoveRange, Preset, Segment, SegmentId};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
