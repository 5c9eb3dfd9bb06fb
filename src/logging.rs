//! Logging setup.
//!
//! Everything logs through the `log` facade; the binary installs an
//! `env_logger` backend here. `RUST_LOG` takes precedence over the level
//! passed in (usually `SERVER.LOGLEVEL` from the configuration).

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Map a configuration level string ("DEBUG", "info", "warning", ...) to a filter.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" | "critical" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => {
            eprintln!("Invalid log level '{}', using 'info'", level);
            LevelFilter::Info
        }
    }
}

/// Install the global logger. Calling it twice is harmless (second call is ignored).
pub fn init_logging(level: &str) {
    let mut builder = Builder::new();
    builder.filter_level(parse_level(level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    let _ = builder.try_init();
}
