#![allow(clippy::multiple_crate_versions)]

//! An in-memory backend for `trellis`.
//!
//! [`Headless`] keeps a record of every widget the core creates, the
//! rectangles it applies and the properties it pushes, and lets tests inject
//! the notifications a native toolkit would deliver. It needs no display and
//! behaves deterministically.
//!
//! `Headless` is a cheap handle: keep a clone before handing one to
//! [`run`](trellis_core::run) to inspect and drive the backend from inside the
//! application routine.
//!
//! Notifications can be delivered in two ways:
//!
//! - synchronously with [`Headless::notify`] and friends, as if a native
//!   callback fired right now;
//! - queued with [`Headless::queue`], to be delivered during the next loop
//!   iteration, as a native toolkit would while the routine waits on a
//!   signal.

mod record;

pub use record::WidgetRecord;

use core::fmt;
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap, VecDeque},
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use image::RgbaImage;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace, warn};
use trellis_core::{
    Backend, BackendError, ControlKind, DialogRequest, DialogResult, EventSink, Notification,
    Property, Rect, Size, Waker, WidgetConfig, WidgetHandle,
};

/// Wake flag shared with other threads.
#[derive(Default)]
struct Latch {
    woken: Mutex<bool>,
    ready: Condvar,
}

impl Latch {
    fn wake(&self) {
        *self.woken.lock() = true;
        self.ready.notify_all();
    }

    /// Waits until woken or until `timeout` elapses, then clears the flag.
    fn wait(&self, timeout: Option<Duration>) {
        let mut woken = self.woken.lock();
        match timeout {
            None => {
                while !*woken {
                    self.ready.wait(&mut woken);
                }
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                while !*woken {
                    if self.ready.wait_until(&mut woken, deadline).timed_out() {
                        break;
                    }
                }
            }
        }
        *woken = false;
    }

    fn clear(&self) {
        *self.woken.lock() = false;
    }
}

/// A window-modal dialog waiting to be dismissed.
struct Sheet {
    window: WidgetHandle,
    request: DialogRequest,
    done: Box<dyn FnOnce(DialogResult)>,
}

#[derive(Default)]
struct Inner {
    widgets: RefCell<BTreeMap<WidgetHandle, WidgetRecord>>,
    next_handle: Cell<u64>,
    init_error: RefCell<Option<String>>,
    preferred: RefCell<HashMap<ControlKind, Size>>,
    queue: RefCell<VecDeque<(WidgetHandle, Notification)>>,
    latch: Arc<Latch>,
    modal_replies: RefCell<VecDeque<DialogResult>>,
    modal_requests: RefCell<Vec<DialogRequest>>,
    sheets: RefCell<VecDeque<Sheet>>,
    sheet_replies: RefCell<VecDeque<DialogResult>>,
    focused: Cell<Option<WidgetHandle>>,
    iterations: Cell<usize>,
    stopped: Cell<bool>,
}

/// An in-memory [`Backend`] for tests.
#[derive(Clone, Default)]
pub struct Headless {
    inner: Rc<Inner>,
}

impl fmt::Debug for Headless {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Headless")
            .field("widgets", &self.inner.widgets.borrow().len())
            .field("queued", &self.inner.queue.borrow().len())
            .field("sheets", &self.inner.sheets.borrow().len())
            .field("stopped", &self.inner.stopped.get())
            .finish_non_exhaustive()
    }
}

impl Headless {
    /// Creates a backend that initialises successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose initialisation fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.inner.init_error.replace(Some(message.into()));
        backend
    }

    /// Sets the preferred size reported for widgets of `kind` created from
    /// now on.
    pub fn set_kind_preferred_size(&self, kind: ControlKind, size: Size) {
        self.inner.preferred.borrow_mut().insert(kind, size);
    }

    /// Sets the preferred size reported for one widget.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is unknown.
    pub fn set_preferred_size(&self, handle: WidgetHandle, size: Size) {
        self.with_record(handle, |record| record.preferred = size);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Live widgets in creation order.
    #[must_use]
    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.inner
            .widgets
            .borrow()
            .iter()
            .filter(|(_, record)| !record.destroyed)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Live widgets of `kind` in creation order.
    #[must_use]
    pub fn widgets_of(&self, kind: ControlKind) -> Vec<WidgetHandle> {
        self.inner
            .widgets
            .borrow()
            .iter()
            .filter(|(_, record)| !record.destroyed && record.kind == kind)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// A snapshot of one widget's record.
    #[must_use]
    pub fn record(&self, handle: WidgetHandle) -> Option<WidgetRecord> {
        self.inner.widgets.borrow().get(&handle).cloned()
    }

    /// The last rectangle applied to `handle`.
    #[must_use]
    pub fn rect(&self, handle: WidgetHandle) -> Option<Rect> {
        self.inner
            .widgets
            .borrow()
            .get(&handle)
            .and_then(|record| record.rect)
    }

    /// The most recent text pushed to `handle`.
    #[must_use]
    pub fn text(&self, handle: WidgetHandle) -> Option<String> {
        self.inner
            .widgets
            .borrow()
            .get(&handle)
            .and_then(|record| record.text().map(str::to_owned))
    }

    /// Number of invalidations requested for `handle`.
    #[must_use]
    pub fn invalidations(&self, handle: WidgetHandle) -> usize {
        self.inner
            .widgets
            .borrow()
            .get(&handle)
            .map_or(0, |record| record.invalidations)
    }

    /// The widget that last received focus.
    #[must_use]
    pub fn focused(&self) -> Option<WidgetHandle> {
        self.inner.focused.get()
    }

    /// Process-modal dialogs presented so far.
    #[must_use]
    pub fn modal_requests(&self) -> Vec<DialogRequest> {
        self.inner.modal_requests.borrow().clone()
    }

    /// Window-modal dialogs still open, oldest first.
    #[must_use]
    pub fn open_sheets(&self) -> Vec<(WidgetHandle, DialogRequest)> {
        self.inner
            .sheets
            .borrow()
            .iter()
            .map(|sheet| (sheet.window, sheet.request.clone()))
            .collect()
    }

    /// Number of loop iterations run so far.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.inner.iterations.get()
    }

    /// Returns true once the core stopped the loop.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Delivers `notification` for `handle` right away.
    ///
    /// Must be called on the UI thread, like a native callback.
    pub fn notify(&self, handle: WidgetHandle, notification: Notification) {
        match self.sink(handle) {
            Some(sink) => sink.notify(notification),
            None => warn!(%handle, "no sink registered, notification dropped"),
        }
    }

    /// Queues `notification` for delivery during the next loop iteration.
    pub fn queue(&self, handle: WidgetHandle, notification: Notification) {
        self.inner
            .queue
            .borrow_mut()
            .push_back((handle, notification));
        self.inner.latch.wake();
    }

    /// Clicks a button right away.
    pub fn click(&self, handle: WidgetHandle) {
        self.notify(handle, Notification::Clicked);
    }

    /// Reports a new client area for a window right away.
    pub fn resize(&self, window: WidgetHandle, width: i32, height: i32) {
        self.notify(window, Notification::Resized(Size::new(width, height)));
    }

    /// Asks to close a window right away.
    pub fn close(&self, window: WidgetHandle) {
        self.notify(window, Notification::Closing);
    }

    /// Paints `clip` of an area, as an expose event would.
    #[must_use]
    pub fn paint(&self, handle: WidgetHandle, clip: Rect) -> RgbaImage {
        self.sink(handle).map_or_else(
            || {
                warn!(%handle, "no sink registered, paint ignored");
                RgbaImage::new(0, 0)
            },
            |sink| sink.paint(clip),
        )
    }

    /// Answers the next process-modal dialog with `result`. Without queued
    /// answers dialogs return [`DialogResult::Dismissed`].
    pub fn answer_modal(&self, result: DialogResult) {
        self.inner.modal_replies.borrow_mut().push_back(result);
    }

    /// Dismisses the oldest open window-modal dialog during the next loop
    /// iteration.
    pub fn answer_sheet(&self, result: DialogResult) {
        self.inner.sheet_replies.borrow_mut().push_back(result);
        self.inner.latch.wake();
    }

    /// Dismisses the oldest open window-modal dialog right away. Returns
    /// false if none is open.
    pub fn dismiss_sheet(&self, result: DialogResult) -> bool {
        let sheet = self.inner.sheets.borrow_mut().pop_front();
        sheet.is_some_and(|sheet| {
            debug!(window = %sheet.window, ?result, "sheet dismissed");
            (sheet.done)(result);
            true
        })
    }

    fn sink(&self, handle: WidgetHandle) -> Option<EventSink> {
        self.inner
            .widgets
            .borrow()
            .get(&handle)
            .filter(|record| !record.destroyed)
            .and_then(|record| record.sink.clone())
    }

    fn with_record<R>(&self, handle: WidgetHandle, f: impl FnOnce(&mut WidgetRecord) -> R) -> R {
        let mut widgets = self.inner.widgets.borrow_mut();
        let record = widgets
            .get_mut(&handle)
            .unwrap_or_else(|| panic!("unknown widget {handle}"));
        f(record)
    }

    fn deliver_queued(&self) {
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some((handle, notification)) = next else {
                break;
            };
            self.notify(handle, notification);
        }

        loop {
            let reply = {
                let mut replies = self.inner.sheet_replies.borrow_mut();
                if self.inner.sheets.borrow().is_empty() {
                    None
                } else {
                    replies.pop_front()
                }
            };
            let Some(result) = reply else { break };
            self.dismiss_sheet(result);
        }
    }

    fn has_pending(&self) -> bool {
        !self.inner.queue.borrow().is_empty()
            || (!self.inner.sheet_replies.borrow().is_empty()
                && !self.inner.sheets.borrow().is_empty())
    }
}

impl Backend for Headless {
    fn init(&self) -> Result<(), BackendError> {
        self.inner.stopped.set(false);
        match self.inner.init_error.borrow().as_deref() {
            Some(message) => Err(BackendError::new(message)),
            None => {
                debug!("headless backend initialised");
                Ok(())
            }
        }
    }

    fn waker(&self) -> Waker {
        let latch = self.inner.latch.clone();
        Arc::new(move || latch.wake())
    }

    fn run_loop_once(&self, timeout: Option<Duration>) {
        self.inner.iterations.set(self.inner.iterations.get() + 1);
        if self.has_pending() {
            self.inner.latch.clear();
        } else {
            self.inner.latch.wait(timeout);
        }
        self.deliver_queued();
    }

    fn stop_loop(&self) {
        self.inner.stopped.set(true);
        let dropped = self.inner.queue.borrow_mut().drain(..).count();
        if dropped > 0 {
            debug!(dropped, "discarding undelivered notifications");
        }
    }

    fn create_widget(&self, kind: ControlKind, config: &WidgetConfig) -> WidgetHandle {
        let raw = self.inner.next_handle.get() + 1;
        self.inner.next_handle.set(raw);
        let handle = WidgetHandle::new(raw);
        let preferred = self
            .inner
            .preferred
            .borrow()
            .get(&kind)
            .copied()
            .unwrap_or_default();
        self.inner.widgets.borrow_mut().insert(
            handle,
            WidgetRecord::new(kind, config.parent, config.properties.clone(), preferred),
        );
        trace!(%handle, ?kind, "widget created");
        handle
    }

    fn register_sink(&self, handle: WidgetHandle, sink: EventSink) {
        self.with_record(handle, |record| record.sink = Some(sink));
    }

    fn apply_rect(&self, handle: WidgetHandle, rect: Rect) {
        self.with_record(handle, |record| record.rect = Some(rect));
    }

    fn preferred_size(&self, handle: WidgetHandle) -> Size {
        self.with_record(handle, |record| record.preferred)
    }

    fn set_property(&self, handle: WidgetHandle, property: &Property) {
        let kind = self.with_record(handle, |record| {
            record.properties.push(property.clone());
            record.kind
        });
        // A native window reports its new client area after a resize request.
        if let (ControlKind::Window, Property::WindowSize(size)) = (kind, property) {
            self.queue(handle, Notification::Resized(*size));
        }
    }

    fn invalidate(&self, handle: WidgetHandle, rect: Option<Rect>) {
        trace!(%handle, ?rect, "invalidate");
        self.with_record(handle, |record| record.invalidations += 1);
    }

    fn focus(&self, handle: WidgetHandle) {
        self.inner.focused.set(Some(handle));
    }

    fn run_modal_dialog(&self, request: &DialogRequest) -> DialogResult {
        self.inner.modal_requests.borrow_mut().push(request.clone());
        self.inner
            .modal_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(DialogResult::Dismissed)
    }

    fn open_sheet(
        &self,
        window: WidgetHandle,
        request: &DialogRequest,
        done: Box<dyn FnOnce(DialogResult)>,
    ) {
        self.inner.sheets.borrow_mut().push_back(Sheet {
            window,
            request: request.clone(),
            done,
        });
    }

    fn destroy_widget(&self, handle: WidgetHandle) {
        let mut widgets = self.inner.widgets.borrow_mut();
        let mut doomed = vec![handle];
        while let Some(current) = doomed.pop() {
            for (child, record) in widgets.iter() {
                if record.parent == Some(current) && !record.destroyed {
                    doomed.push(*child);
                }
            }
            if let Some(record) = widgets.get_mut(&current) {
                record.destroyed = true;
                record.sink = None;
            }
        }
    }
}
