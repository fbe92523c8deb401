//! Log output for the `sift` binary.

use log::LevelFilter;

/// Maps the `-v` count to a log level.
fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger, writing to stderr.
///
/// `RUST_LOG` takes precedence over the `-v` level when set.
pub fn init(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(verbose))
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(2), LevelFilter::Trace);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
