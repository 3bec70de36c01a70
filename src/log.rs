//! Log and panic reporting.
//!
//! `trellis` logs through [`tracing`]. Applications that do not install a
//! subscriber of their own can call [`install`] (or enable it on the
//! [`App`](crate::App) builder) to get formatted output on stderr, filtered by
//! the `TRELLIS_LOG` environment variable in [`EnvFilter`] syntax.

use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter.
pub const FILTER_ENV: &str = "TRELLIS_LOG";

const DEFAULT_FILTER: &str = "info";

// ============================================================================
// Global State
// ============================================================================

static TRACING_INSTALLED: Once = Once::new();
static PANIC_HOOK_INSTALLED: Once = Once::new();

// ============================================================================
// Installation
// ============================================================================

/// Installs a formatting subscriber (idempotent).
///
/// The filter comes from [`FILTER_ENV`] when set, else from `default_filter`,
/// else `info`. Does nothing if another global subscriber already exists.
pub fn install(default_filter: Option<&str>) {
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_env(FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

        let result = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();

        if result.is_err() {
            eprintln!("trellis: a global tracing subscriber is already installed");
        }
    });
}

/// Installs a panic hook that reports panics through [`tracing`] before
/// running the previous hook (idempotent).
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            forward_panic(info);
            previous(info);
        }));
    });
}

// ============================================================================
// Panic Forwarding
// ============================================================================

fn forward_panic(info: &PanicHookInfo<'_>) {
    let location = info.location().map_or_else(
        || "<unknown>".to_string(),
        |location| format!("{}:{}", location.file(), location.line()),
    );
    let thread = std::thread::current();
    let thread = thread.name().unwrap_or("<unnamed>");

    error!(
        target: "trellis::panic",
        %location,
        thread,
        "{}",
        panic_message(info)
    );
}

fn panic_message<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    let payload = info.payload();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installation_is_idempotent() {
        install(Some("debug"));
        install(Some("trace"));
        install_panic_hook();
        install_panic_hook();
        assert!(TRACING_INSTALLED.is_completed());
        assert!(PANIC_HOOK_INSTALLED.is_completed());
    }
}
