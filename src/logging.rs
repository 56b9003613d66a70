//! Tracing initialization.
//!
//! Installs a compact stderr subscriber filtered by an `EnvFilter`. The level
//! comes from the command line; `RUST_LOG`, when set, takes over.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// How chatty the binary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Moves, renames and failures.
    #[default]
    Normal,
    /// Everything, including debug detail.
    Verbose,
}

impl Verbosity {
    /// Picks the verbosity from the two mutually exclusive CLI switches.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }
}

#[inline]
fn to_level_filter(verbosity: Verbosity) -> LevelFilter {
    match verbosity {
        Verbosity::Quiet => LevelFilter::ERROR,
        Verbosity::Normal => LevelFilter::INFO,
        Verbosity::Verbose => LevelFilter::DEBUG,
    }
}

fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(to_level_filter(verbosity).to_string()))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(verbosity: Verbosity) -> Result<(), TryInitError> {
    let stderr_layer = tsfmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .compact();

    registry()
        .with(env_filter(verbosity))
        .with(stderr_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(to_level_filter(Verbosity::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(Verbosity::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(Verbosity::Verbose), LevelFilter::DEBUG);
    }
}
