use chrono::Local;
use log::{Level, Log, Metadata, Record, SetLoggerError};
use nokari_core::config::Config;

pub fn init(config: &Config) -> Result<(), SetLoggerError> {
    log::set_logger(&Logger)?;
    log::set_max_level(config.loglevel);
    Ok(())
}

/// Prints records of all `nokari*` crates to stdout.
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("nokari")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        println!("[{}] [{}] {}", now, level(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn level(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
