// ============================================================================
// hyperbatch-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// The core library logs through the `log` facade. This module installs
// env_logger as the backend with a colored level column.
//
// USAGE:
// - default: Info
// - --verbose: Debug (state transitions, ffmpeg commands, progress ticks)
// - RUST_LOG overrides both when set

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use std::io::Write;

/// Level used when RUST_LOG is not set.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
pub fn init(verbose: bool, use_color: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(verbose));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder
        .format(move |buf, record| {
            let level_str = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN ",
                Level::Info => "INFO ",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            };
            let timestamp = chrono::Local::now().format("%H:%M:%S");

            if use_color {
                let level_colored = match record.level() {
                    Level::Error => level_str.bright_red().to_string(),
                    Level::Warn => level_str.yellow().to_string(),
                    Level::Info => level_str.green().to_string(),
                    Level::Debug => level_str.blue().to_string(),
                    Level::Trace => level_str.magenta().to_string(),
                };
                writeln!(buf, "{} {} {}", timestamp.dimmed(), level_colored, record.args())
            } else {
                writeln!(buf, "{} {} {}", timestamp, level_str, record.args())
            }
        })
        .init();

    log::debug!("Logger initialized with level: {}", level_for(verbose));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }
}
