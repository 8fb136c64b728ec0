//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! The level is determined by (in priority order):
//!
//! 1. the `RUST_LOG` environment variable, if set
//! 2. the `--verbose` flag count (0 = warn, 1 = info, 2 = debug, 3+ = trace)
//!
//! All log output goes to the error channel. Warnings are on by default
//! so scan and comparison failures are visible without flooding normal
//! runs; `-q` affects only the progress indicator, never logging.

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logging subsystem once, before any scan work.
pub fn init(verbose: u8) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    builder.init();
}

/// Map the `--verbose` count to a level filter.
fn determine_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level_default() {
        assert_eq!(determine_level(0), LevelFilter::Warn);
    }

    #[test]
    fn test_determine_level_verbose_steps() {
        assert_eq!(determine_level(1), LevelFilter::Info);
        assert_eq!(determine_level(2), LevelFilter::Debug);
        assert_eq!(determine_level(3), LevelFilter::Trace);
        assert_eq!(determine_level(9), LevelFilter::Trace);
    }
}
