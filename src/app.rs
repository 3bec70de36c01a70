//! Application entry point.

use trellis_core::{Backend, Error, dispatch};

/// Process-level options applied before the UI runtime starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Install the formatting subscriber from [`log::install`](crate::log::install).
    pub install_logging: bool,
    /// Filter used when `TRELLIS_LOG` is unset.
    pub log_filter: Option<String>,
    /// Report panics through `tracing` as well.
    pub panic_hook: bool,
}

/// Builder that configures the process and runs the application routine.
///
/// ```no_run
/// use trellis::{App, Label, Window};
/// use trellis_headless::Headless;
///
/// App::new(Headless::new())
///     .install_logging(true)
///     .run(|| {
///         let window = Window::new("Hello", 320, 200, Label::new("Hello, world"));
///         window.open();
///         window.closing().recv();
///     })
///     .expect("failed to start the UI");
/// ```
#[derive(Debug)]
#[must_use]
pub struct App<B> {
    backend: B,
    options: RunOptions,
}

impl<B: Backend> App<B> {
    /// Creates an application driven by `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            options: RunOptions::default(),
        }
    }

    /// Replaces all options.
    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs the formatting subscriber before starting.
    pub const fn install_logging(mut self, enabled: bool) -> Self {
        self.options.install_logging = enabled;
        self
    }

    /// Sets the log filter used when `TRELLIS_LOG` is unset.
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.options.log_filter = Some(filter.into());
        self
    }

    /// Reports panics through `tracing` before the default hook runs.
    pub const fn panic_hook(mut self, enabled: bool) -> Self {
        self.options.panic_hook = enabled;
        self
    }

    /// Runs `main` on the calling thread, which becomes the UI thread.
    ///
    /// See [`run`](crate::run).
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyRunning`] if a runtime is already active.
    /// - [`Error::Init`] if the backend fails to initialise; `main` is not
    ///   invoked.
    pub fn run(self, main: impl FnOnce()) -> Result<(), Error> {
        if self.options.install_logging {
            crate::log::install(self.options.log_filter.as_deref());
        }
        if self.options.panic_hook {
            crate::log::install_panic_hook();
        }
        dispatch::run(self.backend, main)
    }
}

/// Runs `main` on the calling thread with default options.
///
/// The calling thread becomes the UI thread for the duration of the call.
/// Blocking on a [`Signal`](crate::Signal) inside `main` keeps native events
/// flowing. Once `main` returns the backend's loop is stopped and no control
/// or window may be used any more.
///
/// # Errors
///
/// - [`Error::AlreadyRunning`] if a runtime is already active.
/// - [`Error::Init`] if the backend fails to initialise; `main` is not
///   invoked.
pub fn run<B: Backend>(backend: B, main: impl FnOnce()) -> Result<(), Error> {
    App::new(backend).run(main)
}
