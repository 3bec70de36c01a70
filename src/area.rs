//! Custom-drawn surfaces.
//!
//! An [`Area`] hands painting and raw input to an application-supplied
//! [`AreaHandler`]. Its drawing size and redraw flag live behind one lock
//! together with the handler, so a resize requested from a worker thread
//! through an [`AreaHandle`] waits for any paint or input handling in
//! progress and never interleaves with it.
//!
//! The handler runs on the UI thread while that lock is held. It must not
//! call back into its own area; doing so is a programming error and panics
//! instead of deadlocking. Other areas may be used freely.

use core::fmt;
use std::{
    cell::Cell,
    sync::{Arc, OnceLock},
};

use image::RgbaImage;
use parking_lot::Mutex;
use tracing::{debug, trace};
use trellis_core::{
    KeyEvent, MouseEvent, Notification, Property, Rect, Size, WidgetHandle, dispatch,
};

use crate::control::{Body, Control, control_handle};

/// Application logic behind an [`Area`].
///
/// All methods run on the UI thread.
pub trait AreaHandler: Send + 'static {
    /// Paints `clip`, which lies within the area's drawing size.
    ///
    /// The returned image must be exactly `clip.width()` by `clip.height()`
    /// pixels; pixel (0, 0) corresponds to `clip.origin()`.
    fn paint(&mut self, clip: Rect) -> RgbaImage;

    /// Handles a mouse event. Return true to have the whole area redrawn.
    fn mouse(&mut self, event: MouseEvent) -> bool {
        let _ = event;
        false
    }

    /// Handles a key event. Return true to have the whole area redrawn.
    fn key(&mut self, event: KeyEvent) -> bool {
        let _ = event;
        false
    }
}

struct Surface {
    size: Size,
    needs_redraw: bool,
    handler: Box<dyn AreaHandler>,
}

struct Shared {
    surface: Mutex<Surface>,
    handle: OnceLock<WidgetHandle>,
}

thread_local! {
    // Address of the area whose handler is running on this thread, or null.
    static IN_HANDLER: Cell<*const Shared> = const { Cell::new(std::ptr::null()) };
}

/// Marks the current thread as running the handler of one area.
struct HandlerScope {
    previous: *const Shared,
}

impl HandlerScope {
    fn enter(shared: &Arc<Shared>) -> Self {
        Self {
            previous: IN_HANDLER.with(|current| current.replace(Arc::as_ptr(shared))),
        }
    }

    fn check(shared: &Arc<Shared>, operation: &str) {
        assert!(
            !std::ptr::eq(IN_HANDLER.with(Cell::get), Arc::as_ptr(shared)),
            "{operation} called from inside the area's own handler"
        );
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        IN_HANDLER.with(|current| current.set(self.previous));
    }
}

fn validate_size(width: i32, height: i32) -> Size {
    assert!(
        width > 0 && height > 0,
        "area size {width}x{height} must be positive"
    );
    Size::new(width, height)
}

pub(crate) struct AreaState {
    shared: Arc<Shared>,
}

impl AreaState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![Property::AreaSize(self.size())]
    }

    pub(crate) fn size(&self) -> Size {
        HandlerScope::check(&self.shared, "reading the area size");
        self.shared.surface.lock().size
    }

    pub(crate) fn attach(&self, handle: WidgetHandle) {
        let _ = self.shared.handle.set(handle);
    }

    /// Paints the part of `clip` that lies inside the drawing size.
    ///
    /// # Panics
    ///
    /// Panics if the handler returns an image whose dimensions differ from the
    /// clipped rectangle.
    pub(crate) fn paint(&self, clip: Rect) -> RgbaImage {
        HandlerScope::check(&self.shared, "painting an area");
        let mut surface = self.shared.surface.lock();
        let bounds = Rect::from_size(surface.size);
        let clip = clip.intersect(&bounds);
        if clip.is_empty() {
            trace!(?bounds, "paint request outside the drawing size");
            return RgbaImage::new(0, 0);
        }

        let image = {
            let _scope = HandlerScope::enter(&self.shared);
            surface.handler.paint(clip)
        };
        let matches = i32::try_from(image.width()).is_ok_and(|width| width == clip.width())
            && i32::try_from(image.height()).is_ok_and(|height| height == clip.height());
        assert!(
            matches,
            "area handler returned a {}x{} image for a {}x{} clip",
            image.width(),
            image.height(),
            clip.width(),
            clip.height()
        );

        if clip == bounds {
            surface.needs_redraw = false;
        }
        image
    }

    pub(crate) fn notify(&self, handle: Option<WidgetHandle>, notification: Notification) {
        HandlerScope::check(&self.shared, "delivering area input");
        let (redraw, press) = match notification {
            Notification::Mouse(event) => {
                let press = event.is_press();
                let mut surface = self.shared.surface.lock();
                let redraw = {
                    let _scope = HandlerScope::enter(&self.shared);
                    surface.handler.mouse(event)
                };
                surface.needs_redraw |= redraw;
                (redraw, press)
            }
            Notification::Key(event) => {
                let mut surface = self.shared.surface.lock();
                let redraw = {
                    let _scope = HandlerScope::enter(&self.shared);
                    surface.handler.key(event)
                };
                surface.needs_redraw |= redraw;
                (redraw, false)
            }
            other => {
                trace!(notification = ?other, "area ignores notification");
                return;
            }
        };

        let Some(handle) = handle else { return };
        dispatch::with_backend(|backend| {
            if press {
                backend.focus(handle);
            }
            if redraw {
                backend.invalidate(handle, None);
            }
        });
    }
}

/// A custom-drawn surface with a fixed drawing size.
///
/// The drawing size is also the area's preferred size. Backends typically
/// show it inside a scrolling viewport.
#[derive(Debug, Clone)]
pub struct Area {
    control: Control,
}

control_handle!(Area, Area, AreaState);

impl Area {
    /// Creates an area of `width` by `height` pixels drawn by `handler`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32, handler: impl AreaHandler) -> Self {
        let size = validate_size(width, height);
        Self {
            control: Control::from_body(Body::Area(AreaState {
                shared: Arc::new(Shared {
                    surface: Mutex::new(Surface {
                        size,
                        needs_redraw: true,
                        handler: Box::new(handler),
                    }),
                    handle: OnceLock::new(),
                }),
            })),
        }
    }

    /// Returns a thread-safe handle for resizing and redrawing this area.
    #[must_use]
    pub fn handle(&self) -> AreaHandle {
        AreaHandle {
            shared: self.state().shared.clone(),
        }
    }

    /// The drawing size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.state().size()
    }

    /// See [`AreaHandle::set_size`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive, or when called from inside
    /// this area's handler.
    pub fn set_size(&self, width: i32, height: i32) {
        self.handle().set_size(width, height);
    }

    /// See [`AreaHandle::repaint_all`].
    ///
    /// # Panics
    ///
    /// Panics when called from inside this area's handler.
    pub fn repaint_all(&self) {
        self.handle().repaint_all();
    }
}

/// A `Send + Sync` handle to an [`Area`], usable from any thread.
///
/// Requests made off the UI thread update the area's state immediately and
/// forward the matching native request to the UI thread.
#[derive(Clone)]
pub struct AreaHandle {
    shared: Arc<Shared>,
}

impl fmt::Debug for AreaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaHandle")
            .field("handle", &self.shared.handle.get())
            .finish_non_exhaustive()
    }
}

impl AreaHandle {
    /// The drawing size.
    ///
    /// # Panics
    ///
    /// Panics when called from inside the area's handler.
    #[must_use]
    pub fn size(&self) -> Size {
        HandlerScope::check(&self.shared, "AreaHandle::size");
        self.shared.surface.lock().size
    }

    /// Returns true while a full redraw is outstanding.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.shared.surface.lock().needs_redraw
    }

    /// Changes the drawing size and requests a full redraw.
    ///
    /// Waits for a paint or input handler in progress to finish first, so the
    /// handler always sees one consistent size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive, or when called from inside
    /// the area's handler.
    pub fn set_size(&self, width: i32, height: i32) {
        let size = validate_size(width, height);
        HandlerScope::check(&self.shared, "AreaHandle::set_size");
        {
            let mut surface = self.shared.surface.lock();
            surface.size = size;
            surface.needs_redraw = true;
        }
        debug!(?size, "area resized");
        self.forward(Some(size));
    }

    /// Requests a redraw of the whole area. The size is unchanged.
    ///
    /// # Panics
    ///
    /// Panics when called from inside the area's handler.
    pub fn repaint_all(&self) {
        HandlerScope::check(&self.shared, "AreaHandle::repaint_all");
        self.shared.surface.lock().needs_redraw = true;
        self.forward(None);
    }

    fn forward(&self, size: Option<Size>) {
        let Some(&handle) = self.shared.handle.get() else {
            return;
        };
        let apply = move || {
            dispatch::with_backend(|backend| {
                if let Some(size) = size {
                    backend.set_property(handle, &Property::AreaSize(size));
                }
                backend.invalidate(handle, None);
            });
        };
        if dispatch::is_ui_thread() {
            apply();
        } else if let Some(proxy) = dispatch::proxy() {
            proxy.post(apply);
        } else {
            debug!(%handle, "UI runtime stopped, area request not forwarded");
        }
    }
}
