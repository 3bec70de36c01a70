//! The UI thread and its dispatch loop.
//!
//! [`run`] turns the calling thread into the *UI thread*: it initialises the
//! backend, installs the runtime, invokes the application routine on that same
//! thread and tears everything down once the routine returns. Controls, layout
//! and backend calls are only valid on the UI thread while [`run`] is active.
//!
//! The application routine keeps native events flowing by waiting on
//! [`Signal`](crate::Signal)s: a blocking read on the UI thread pumps the loop
//! until a value arrives. Other threads reach the UI thread through a
//! [`UiProxy`], which queues closures that are drained inside [`pump`].
//!
//! Native notifications enter through an [`EventSink`]. Each sink is bound to
//! one widget handle and resolves its target through the runtime's routing
//! table, so backends never hold references to controls.

use core::fmt;
use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_channel::{Receiver, Sender};
use image::RgbaImage;
use parking_lot::{Mutex, const_mutex};
use tracing::{debug, error, info, trace, warn};

use crate::{
    backend::{Backend, Waker, WidgetHandle},
    error::Error,
    event::Notification,
    layout::Rect,
};

/// A unit of work queued for the UI thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Receiver of native notifications for one widget.
pub trait NotificationTarget {
    /// Handles a fire-and-forget notification.
    fn notify(&self, notification: Notification);

    /// Produces pixels for `clip`. Only custom-drawn surfaces are painted by
    /// the core; other targets answer with an empty buffer.
    fn paint(&self, clip: Rect) -> RgbaImage {
        warn!(?clip, "paint requested for a widget that is not custom drawn");
        RgbaImage::new(0, 0)
    }
}

struct Runtime {
    backend: Rc<dyn Backend>,
    tasks: Receiver<Task>,
    routes: RefCell<HashMap<WidgetHandle, Weak<dyn NotificationTarget>>>,
}

impl Runtime {
    fn drain_tasks(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.tasks.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "drained UI tasks");
        }
        ran
    }
}

#[derive(Clone)]
struct Shared {
    tasks: Sender<Task>,
    waker: Waker,
}

static RUNNING: AtomicBool = AtomicBool::new(false);
static SHARED: Mutex<Option<Shared>> = const_mutex(None);

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

struct RunningFlag;

impl Drop for RunningFlag {
    fn drop(&mut self) {
        RUNNING.store(false, Ordering::Release);
    }
}

struct Installed {
    backend: Rc<dyn Backend>,
}

impl Drop for Installed {
    fn drop(&mut self) {
        self.backend.stop_loop();
        let runtime = RUNTIME.with(|slot| slot.borrow_mut().take());
        SHARED.lock().take();
        if let Some(runtime) = runtime {
            // Dropping queued tasks unrun releases the reply channels of
            // pending `UiProxy::call`s.
            runtime.tasks.close();
            let mut pending = 0_usize;
            while let Ok(task) = runtime.tasks.try_recv() {
                drop(task);
                pending += 1;
            }
            if pending > 0 {
                debug!(pending, "discarding UI tasks queued after the routine returned");
            }
        }
    }
}

/// Runs `main` on the calling thread, which becomes the UI thread.
///
/// Blocks until `main` returns, then stops the backend's loop. After that no
/// control or window operation is valid.
///
/// Call this once, from the process's initial thread: some native toolkits
/// only process events on the thread that initialised them.
///
/// # Errors
///
/// - [`Error::AlreadyRunning`] if a runtime is already active in the process.
/// - [`Error::Init`] if the backend fails to initialise.
///
/// In both cases `main` is never invoked.
pub fn run<B: Backend>(backend: B, main: impl FnOnce()) -> Result<(), Error> {
    if RUNNING.swap(true, Ordering::AcqRel) {
        warn!("refusing to start a second UI runtime");
        return Err(Error::AlreadyRunning);
    }
    let running = RunningFlag;

    let backend: Rc<dyn Backend> = Rc::new(backend);
    backend.init().map_err(|err| {
        error!(%err, "native toolkit initialisation failed");
        Error::Init(err)
    })?;

    let (sender, receiver) = async_channel::unbounded();
    *SHARED.lock() = Some(Shared {
        tasks: sender,
        waker: backend.waker(),
    });
    RUNTIME.with(|slot| {
        *slot.borrow_mut() = Some(Rc::new(Runtime {
            backend: backend.clone(),
            tasks: receiver,
            routes: RefCell::default(),
        }));
    });
    let installed = Installed { backend };
    info!("UI runtime started");

    main();

    drop(installed);
    drop(running);
    info!("UI runtime stopped");
    Ok(())
}

fn current(operation: &str) -> Rc<Runtime> {
    RUNTIME
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| {
            panic!("{operation} must be called on the UI thread while the runtime is running")
        })
}

/// Returns true when called on the UI thread of an active runtime.
#[must_use]
pub fn is_ui_thread() -> bool {
    RUNTIME.with(|slot| slot.borrow().is_some())
}

/// Panics unless called on the UI thread of an active runtime.
///
/// # Panics
///
/// Panics with a message naming `operation` when called from another thread
/// or after the runtime stopped.
pub fn assert_ui_thread(operation: &str) {
    let _ = current(operation);
}

/// Runs `f` with the active backend.
///
/// # Panics
///
/// Panics when called off the UI thread or when no runtime is active.
pub fn with_backend<R>(f: impl FnOnce(&dyn Backend) -> R) -> R {
    let runtime = current("backend access");
    f(runtime.backend.as_ref())
}

/// Runs one iteration of the UI loop: queued tasks first, then one native
/// loop iteration bounded by `timeout` (`None` blocks until woken).
///
/// # Panics
///
/// Panics when called off the UI thread.
pub fn pump(timeout: Option<Duration>) {
    let runtime = current("pumping the UI loop");
    let ran = runtime.drain_tasks();
    let timeout = if ran > 0 {
        Some(Duration::ZERO)
    } else {
        timeout
    };
    runtime.backend.run_loop_once(timeout);
    runtime.drain_tasks();
}

/// Interrupts a blocked UI loop iteration. Callable from any thread; does
/// nothing when no runtime is active.
pub fn wake() {
    let waker = SHARED.lock().as_ref().map(|shared| shared.waker.clone());
    if let Some(waker) = waker {
        waker();
    }
}

/// Returns a handle for scheduling work on the UI thread, if a runtime is
/// active.
#[must_use]
pub fn proxy() -> Option<UiProxy> {
    SHARED.lock().as_ref().map(|shared| UiProxy {
        tasks: shared.tasks.clone(),
        waker: shared.waker.clone(),
    })
}

/// Registers `target` for notifications about `handle` and hands the backend
/// a sink bound to that handle.
///
/// # Panics
///
/// Panics when called off the UI thread.
pub fn connect(handle: WidgetHandle, target: Weak<dyn NotificationTarget>) {
    let runtime = current("connecting a widget");
    runtime.routes.borrow_mut().insert(handle, target);
    runtime.backend.register_sink(handle, EventSink { handle });
    trace!(%handle, "widget connected");
}

/// Removes the routing entry for `handle`.
///
/// # Panics
///
/// Panics when called off the UI thread.
pub fn disconnect(handle: WidgetHandle) {
    let runtime = current("disconnecting a widget");
    runtime.routes.borrow_mut().remove(&handle);
}

/// Sends work to the UI thread from any thread.
#[derive(Clone)]
pub struct UiProxy {
    tasks: Sender<Task>,
    waker: Waker,
}

impl fmt::Debug for UiProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiProxy")
            .field("queued", &self.tasks.len())
            .field("closed", &self.tasks.is_closed())
            .finish()
    }
}

impl UiProxy {
    /// Queues `task` for the UI thread without waiting for it.
    ///
    /// Returns false when the runtime has already stopped; the task is then
    /// dropped unrun.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        if self.tasks.try_send(Box::new(task)).is_err() {
            debug!("UI runtime stopped, dropping posted task");
            return false;
        }
        (self.waker)();
        true
    }

    /// Runs `task` on the UI thread and returns its result.
    ///
    /// On the UI thread itself the task runs inline. Elsewhere the caller
    /// blocks until the UI thread has run it. Returns `None` when the runtime
    /// stopped before the task ran.
    pub fn call<R: Send + 'static>(
        &self,
        task: impl FnOnce() -> R + Send + 'static,
    ) -> Option<R> {
        if is_ui_thread() {
            return Some(task());
        }
        let (sender, receiver) = async_channel::bounded(1);
        let posted = self.post(move || {
            let _ = sender.try_send(task());
        });
        if !posted {
            return None;
        }
        receiver.recv_blocking().ok()
    }
}

/// Entry point for native notifications about one widget.
///
/// Backends receive sinks through
/// [`Backend::register_sink`](crate::Backend::register_sink) and call them
/// from native callbacks on the UI thread.
#[derive(Debug, Clone)]
pub struct EventSink {
    handle: WidgetHandle,
}

impl EventSink {
    /// Returns the widget this sink reports for.
    #[must_use]
    pub const fn handle(&self) -> WidgetHandle {
        self.handle
    }

    /// Delivers a notification to the owning control.
    ///
    /// # Panics
    ///
    /// Panics when called off the UI thread.
    pub fn notify(&self, notification: Notification) {
        match self.target() {
            Some(target) => {
                trace!(handle = %self.handle, ?notification, "routing notification");
                target.notify(notification);
            }
            None => warn!(handle = %self.handle, "notification for a disconnected widget dropped"),
        }
    }

    /// Asks the owning control to paint `clip`.
    ///
    /// # Panics
    ///
    /// Panics when called off the UI thread, and propagates handler contract
    /// violations raised while painting.
    #[must_use]
    pub fn paint(&self, clip: Rect) -> RgbaImage {
        match self.target() {
            Some(target) => target.paint(clip),
            None => {
                warn!(handle = %self.handle, "paint for a disconnected widget ignored");
                RgbaImage::new(0, 0)
            }
        }
    }

    fn target(&self) -> Option<Rc<dyn NotificationTarget>> {
        let runtime = current("delivering a notification");
        let routes = runtime.routes.borrow();
        routes.get(&self.handle).and_then(Weak::upgrade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_runtime_outside_run() {
        assert!(!is_ui_thread());
    }

    #[test]
    #[should_panic(expected = "must be called on the UI thread")]
    fn pump_requires_ui_thread() {
        pump(Some(Duration::ZERO));
    }
}
