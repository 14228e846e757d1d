use log::{Level, LevelFilter, Log, Metadata, Record};
use std::env;

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub const LOG_ENV: &str = "CHESS_PROFILE_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

fn level_from_str(s: &str) -> LevelFilter {
    match s.trim().to_lowercase().as_str() {
        "off" | "none" => LevelFilter::Off,
        "error" | "err" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

pub fn level_from_env() -> LevelFilter {
    env::var(LOG_ENV)
        .map(|s| level_from_str(&s))
        .unwrap_or(LevelFilter::Warn)
}

fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", prefix(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the stderr logger once; later calls only adjust the level.
/// `verbose` forces debug output regardless of the environment.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        level_from_env()
    };
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
