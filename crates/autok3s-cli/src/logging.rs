// crates/autok3s-cli/src/logging.rs - Log output setup
//
// Logs go to stderr so stdout carries only banner, help and command output.
// RUST_LOG takes effect unless debug is requested, which always wins.

use std::io::IsTerminal;
use tracing::warn;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Allows raising the level once the configuration has been read
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// Switch to debug level after `debug: true` came from config or env
    pub fn enable_debug(&self) {
        if let Err(e) = self.0.reload(filter(true)) {
            warn!("failed to raise log level: {e}");
        }
    }
}

/// Install the global subscriber; call once, first thing in main
pub fn init(debug: bool) -> LogHandle {
    let (filter_layer, handle) = reload::Layer::new(filter(debug));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .init();
    LogHandle(handle)
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
