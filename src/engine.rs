use embassy_time::{Duration, Instant};

use crate::auto_cycle::AutoCycler;
use crate::channel::{CommandReceiver, DEFAULT_QUEUE_SIZE};
use crate::color::Rgb;
use crate::command::{Arg, CommandError, dispatch};
use crate::effect::{DEFAULT_EFFECT_ID, DEFAULT_FPS, DEFAULT_MAX_SEGMENTS, Effect, EffectId};
use crate::renderer::Renderer;
use crate::segment::{Preset, SegmentId};

/// Id of the segment created from [`EngineConfig::startup_preset`]
pub const STARTUP_SEGMENT_ID: SegmentId = 0;

/// Configuration for the light engine
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Id commands must address to reach this effect
    pub effect_id: EffectId,
    /// Number of LEDs rendered, capped by the strip length
    pub led_count: u16,
    /// Frame rate used for the motion timestep
    pub fps: u16,
    /// Look of the segment present at startup; `None` starts empty
    pub startup_preset: Option<Preset>,
    /// Rotate presets on the first segment with this interval
    pub auto_cycle: Option<Duration>,
}

impl EngineConfig {
    /// Default configuration for a strip of `led_count` LEDs
    pub const fn new(led_count: u16) -> Self {
        Self {
            effect_id: DEFAULT_EFFECT_ID,
            led_count,
            fps: DEFAULT_FPS,
            startup_preset: None,
            auto_cycle: None,
        }
    }
}

/// Engine with the default segment capacity and queue depth
pub type DefaultLightEngine<'a, const MAX_LEDS: usize> =
    LightEngine<'a, MAX_LEDS, DEFAULT_MAX_SEGMENTS, DEFAULT_QUEUE_SIZE>;

/// Light Engine - the main orchestrator
///
/// Owns the live effect and the frame buffer. A tick drains pending
/// commands, advances motion and renders, in that order and without
/// interruption, so a frame never shows a half-applied command.
pub struct LightEngine<
    'a,
    const MAX_LEDS: usize,
    const MAX_SEGMENTS: usize,
    const QUEUE_SIZE: usize,
> {
    // External dependencies
    commands: Option<CommandReceiver<'a, QUEUE_SIZE>>,

    // Internal state
    effect: Effect<MAX_SEGMENTS>,
    renderer: Renderer<MAX_LEDS>,
    auto_cycle: Option<AutoCycler>,
}

impl<'a, const MAX_LEDS: usize, const MAX_SEGMENTS: usize, const QUEUE_SIZE: usize>
    LightEngine<'a, MAX_LEDS, MAX_SEGMENTS, QUEUE_SIZE>
{
    /// Create a new engine fed by a command queue
    pub fn new(
        commands: CommandReceiver<'a, QUEUE_SIZE>,
        config: &EngineConfig,
        now: Instant,
    ) -> Self {
        let mut engine = Self::without_queue(config, now);
        engine.commands = Some(commands);
        engine
    }

    /// Create an engine that only receives commands through [`Self::apply`]
    pub fn without_queue(config: &EngineConfig, now: Instant) -> Self {
        let strip_len = u16::try_from(MAX_LEDS).unwrap_or(u16::MAX);
        let mut effect = Effect::new(config.effect_id, strip_len, config.led_count, config.fps);

        if let Some(preset) = config.startup_preset {
            match effect.create_segment(STARTUP_SEGMENT_ID, 0, now) {
                Ok(segment) => preset.apply(segment),
                Err(err) => log::warn!("startup segment not created: {}", err),
            }
        }

        log::info!(
            "light engine ready: effect={}, leds={}, fps={}",
            effect.id(),
            effect.led_count(),
            effect.fps()
        );

        Self {
            commands: None,
            effect,
            renderer: Renderer::new(),
            auto_cycle: config.auto_cycle.map(AutoCycler::new),
        }
    }

    /// Process one frame
    ///
    /// This is the main render loop step. Call it once per intended frame.
    pub fn tick(&mut self, now: Instant) -> &[Rgb] {
        self.process_commands(now);
        self.process_auto_cycle(now);
        self.effect.update_motion();
        self.renderer.render(&self.effect, now)
    }

    /// Apply a single command immediately
    ///
    /// Errors are returned for inspection; the engine itself stays usable
    /// whatever the outcome.
    pub fn apply(
        &mut self,
        address: &str,
        args: &[Arg],
        now: Instant,
    ) -> Result<(), CommandError> {
        dispatch(address, args, &mut self.effect, now)
    }

    /// Apply a preset to a segment by its name
    pub fn apply_preset_name(&mut self, id: SegmentId, name: &str) -> Result<(), CommandError> {
        let preset = Preset::parse_from_str(name).ok_or(CommandError::UnknownPresetName)?;
        let segment = self
            .effect
            .find_mut(id)
            .ok_or(CommandError::SegmentNotFound(id))?;
        preset.apply(segment);
        Ok(())
    }

    /// Start rotating presets on the first segment, beginning with the
    /// first preset on the next tick. Restarts a running rotation.
    pub fn start_auto_cycle(&mut self, interval: Duration) {
        self.auto_cycle = Some(AutoCycler::new(interval));
    }

    pub fn stop_auto_cycle(&mut self) {
        self.auto_cycle = None;
    }

    /// Change the rotation interval; ignored when not cycling
    pub fn set_auto_cycle_interval(&mut self, interval: Duration) {
        if let Some(cycler) = &mut self.auto_cycle {
            cycler.set_interval(interval);
        }
    }

    pub const fn auto_cycle(&self) -> Option<&AutoCycler> {
        self.auto_cycle.as_ref()
    }

    pub const fn is_auto_cycling(&self) -> bool {
        self.auto_cycle.is_some()
    }

    fn process_auto_cycle(&mut self, now: Instant) {
        let Some(cycler) = &mut self.auto_cycle else {
            return;
        };
        let Some(preset) = cycler.poll(now) else {
            return;
        };
        // An empty effect skips this preset, the rotation keeps going
        if let Some(segment) = self.effect.first_mut() {
            preset.apply(segment);
            log::debug!("segment {}: auto preset {}", segment.id(), preset.as_str());
        }
    }

    /// Drain pending commands from the queue (non-blocking)
    fn process_commands(&mut self, now: Instant) {
        let Some(commands) = self.commands else {
            return;
        };

        while let Some(command) = commands.try_receive() {
            let result = dispatch(command.address(), command.args(), &mut self.effect, now);
            if let Err(err) = result {
                log_dropped(command.address(), err);
            }
        }
    }

    pub const fn effect(&self) -> &Effect<MAX_SEGMENTS> {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut Effect<MAX_SEGMENTS> {
        &mut self.effect
    }

    pub const fn renderer(&self) -> &Renderer<MAX_LEDS> {
        &self.renderer
    }
}

fn log_dropped(address: &str, err: CommandError) {
    match err {
        CommandError::CapacityExceeded | CommandError::UnknownPreset(_) => {
            log::warn!("{}: {}", address, err);
        }
        _ => log::debug!("{}: dropped, {}", address, err),
    }
}
