//! End-to-end tests driving whole control trees through the headless backend.
//!
//! The UI runtime is process-wide, so every test that starts it goes through
//! [`with_runtime`], which serialises them.

mod area;
mod controls;
mod layout;
mod runtime;

use parking_lot::{Mutex, const_mutex};
use trellis_headless::Headless;

use crate::{Control, Label};

static RUNTIME_LOCK: Mutex<()> = const_mutex(());

// ============================================================================
// Helper Functions
// ============================================================================

/// Runs `routine` on a fresh headless runtime, handing it a driver clone of
/// the backend.
fn with_runtime(routine: impl FnOnce(&Headless)) -> Headless {
    let _guard = RUNTIME_LOCK.lock();
    let backend = Headless::new();
    let driver = backend.clone();
    crate::run(backend, || routine(&driver)).expect("headless runtime starts");
    driver
}

/// A label whose preferred size is exactly `width` by `height`.
fn sized(width: i32, height: i32) -> Label {
    let label = Label::new(format!("{width}x{height}"));
    label.control().set_min_size(width, height);
    label
}

fn sized_control(width: i32, height: i32) -> Control {
    sized(width, height).into()
}
