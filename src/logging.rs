//! Log output
//!
//! The crate logs through the `log` facade. Hosts install their own logger,
//! or a [`PrintLogger`] around any print function. With the `esp32-log`
//! feature a console logger backed by `esp-println` is available through
//! [`init`].

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `log` sink that hands every enabled record to a print function
pub struct PrintLogger {
    print: fn(&Record<'_>),
}

impl PrintLogger {
    pub const fn new(print: fn(&Record<'_>)) -> Self {
        Self { print }
    }
}

impl Log for PrintLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            (self.print)(record);
        }
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger and set the maximum level.
///
/// Fails if a logger is already installed; the level is left as it was.
#[cfg(target_has_atomic = "ptr")]
pub fn install(logger: &'static PrintLogger, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(feature = "esp32-log")]
pub use esp32::init;

#[cfg(feature = "esp32-log")]
mod esp32 {
    use esp_println::println;
    use log::{LevelFilter, Record, SetLoggerError};

    use super::{PrintLogger, install};

    fn print(record: &Record<'_>) {
        println!("[{}] {}: {}", record.level(), record.target(), record.args());
    }

    static LOGGER: PrintLogger = PrintLogger::new(print);

    /// Install the `esp-println` console logger
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        install(&LOGGER, level)
    }
}
