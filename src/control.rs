//! The control tree.
//!
//! A [`Control`] is a cheap handle to one node of the tree. Nodes are a closed
//! set of variants (leaf widgets, [`Stack`](crate::Stack),
//! [`Grid`](crate::Grid), [`Area`](crate::Area)) sharing one small capability
//! set: a preferred size, an assigned rectangle and, for containers, their
//! children.
//!
//! Handles are `!Send`: controls belong to the UI thread. They are created
//! detached, adopted by exactly one container or window, and frozen when the
//! owning window is created. After that only their content (text, selection,
//! progress) may change.

use core::fmt;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use image::RgbaImage;
use tracing::trace;
use trellis_core::{
    ControlKind, Notification, NotificationTarget, Property, Rect, Size, WidgetConfig,
    WidgetHandle, dispatch,
};
use trellis_layout::Layout;

use crate::{
    area::AreaState,
    container::{GridState, StackState},
    widget::{
        button::ButtonState, checkbox::CheckboxState, combobox::ComboboxState,
        label::LabelState, line_edit::LineEditState, listbox::ListboxState,
        progress::ProgressState,
    },
};

/// Variant-specific state of a node.
pub(crate) enum Body {
    Button(ButtonState),
    Label(LabelState),
    LineEdit(LineEditState),
    Checkbox(CheckboxState),
    Combobox(ComboboxState),
    Listbox(ListboxState),
    ProgressBar(ProgressState),
    Spacer,
    Stack(StackState),
    Grid(GridState),
    Area(AreaState),
}

impl Body {
    const fn kind(&self) -> ControlKind {
        match self {
            Self::Button(_) => ControlKind::Button,
            Self::Label(_) => ControlKind::Label,
            Self::LineEdit(_) => ControlKind::LineEdit,
            Self::Checkbox(_) => ControlKind::Checkbox,
            Self::Combobox(_) => ControlKind::Combobox,
            Self::Listbox(_) => ControlKind::Listbox,
            Self::ProgressBar(_) => ControlKind::ProgressBar,
            Self::Spacer => ControlKind::Spacer,
            Self::Stack(_) => ControlKind::Stack,
            Self::Grid(_) => ControlKind::Grid,
            Self::Area(_) => ControlKind::Area,
        }
    }

    /// Properties handed to the backend when the native widget is created.
    fn initial_properties(&self) -> Vec<Property> {
        match self {
            Self::Button(state) => state.initial_properties(),
            Self::Label(state) => state.initial_properties(),
            Self::LineEdit(state) => state.initial_properties(),
            Self::Checkbox(state) => state.initial_properties(),
            Self::Combobox(state) => state.initial_properties(),
            Self::Listbox(state) => state.initial_properties(),
            Self::ProgressBar(state) => state.initial_properties(),
            Self::Area(state) => state.initial_properties(),
            Self::Spacer | Self::Stack(_) | Self::Grid(_) => Vec::new(),
        }
    }

    /// Spacers and containers have no native widget of their own.
    const fn is_native(&self) -> bool {
        !matches!(self, Self::Spacer | Self::Stack(_) | Self::Grid(_))
    }
}

#[derive(Default)]
struct Placement {
    handle: Option<WidgetHandle>,
    rect: Rect,
    adopted: bool,
    finalized: bool,
    min_size: Size,
}

pub(crate) struct Node {
    placement: RefCell<Placement>,
    pub(crate) body: Body,
}

impl NotificationTarget for Node {
    fn notify(&self, notification: Notification) {
        let handle = self.placement.borrow().handle;
        match &self.body {
            Body::Button(state) => state.notify(notification),
            Body::LineEdit(state) => state.notify(notification),
            Body::Checkbox(state) => state.notify(notification),
            Body::Combobox(state) => state.notify(notification),
            Body::Listbox(state) => state.notify(notification),
            Body::Area(state) => state.notify(handle, notification),
            Body::Label(_)
            | Body::ProgressBar(_)
            | Body::Spacer
            | Body::Stack(_)
            | Body::Grid(_) => {
                trace!(kind = ?self.body.kind(), ?notification, "ignoring notification");
            }
        }
    }

    fn paint(&self, clip: Rect) -> RgbaImage {
        match &self.body {
            Body::Area(state) => state.paint(clip),
            _ => RgbaImage::new(0, 0),
        }
    }
}

/// A handle to any control in the tree.
#[derive(Clone)]
pub struct Control {
    pub(crate) node: Rc<Node>,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placement = self.node.placement.borrow();
        f.debug_struct("Control")
            .field("kind", &self.kind())
            .field("handle", &placement.handle)
            .field("rect", &placement.rect)
            .field("finalized", &placement.finalized)
            .finish_non_exhaustive()
    }
}

impl Control {
    pub(crate) fn from_body(body: Body) -> Self {
        Self {
            node: Rc::new(Node {
                placement: RefCell::default(),
                body,
            }),
        }
    }

    /// The variant of this control.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.node.body.kind()
    }

    /// Returns true for containers, which lay out children.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// The children of a container, in layout order. Empty for other
    /// controls.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.node.body {
            Body::Stack(state) => state.children(),
            Body::Grid(state) => state.children(),
            _ => &[],
        }
    }

    /// The native widget backing this control, once its window was created.
    #[must_use]
    pub fn handle(&self) -> Option<WidgetHandle> {
        self.node.placement.borrow().handle
    }

    /// The rectangle assigned by the most recent layout pass.
    #[must_use]
    pub fn assigned_rect(&self) -> Rect {
        self.node.placement.borrow().rect
    }

    /// Returns true once the owning window was created.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.node.placement.borrow().finalized
    }

    /// Returns true if both handles refer to the same control.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Sets a lower bound for the preferred size reported by the backend.
    ///
    /// # Panics
    ///
    /// Panics after the owning window was created, or for a negative size.
    pub fn set_min_size(&self, width: i32, height: i32) {
        assert!(
            width >= 0 && height >= 0,
            "minimum size {width}x{height} must not be negative"
        );
        self.ensure_configurable("set_min_size");
        self.node.placement.borrow_mut().min_size = Size::new(width, height);
    }

    /// The size this control would like to have.
    ///
    /// Containers derive it from their children, areas report their drawing
    /// size and leaves ask the backend, floored by [`set_min_size`](Self::set_min_size).
    ///
    /// # Panics
    ///
    /// Panics when a created leaf is queried off the UI thread.
    #[must_use]
    pub fn preferred_size(&self) -> Size {
        let (handle, min_size) = {
            let placement = self.node.placement.borrow();
            (placement.handle, placement.min_size)
        };
        let preferred = match &self.node.body {
            Body::Stack(state) => state
                .layout()
                .preferred_size(&Self::preferred_sizes(state.children())),
            Body::Grid(state) => state
                .layout()
                .preferred_size(&Self::preferred_sizes(state.children())),
            Body::Area(state) => state.size(),
            Body::Spacer => Size::zero(),
            _ => handle.map_or_else(Size::zero, |handle| {
                dispatch::with_backend(|backend| backend.preferred_size(handle))
            }),
        };
        preferred.max(min_size)
    }

    fn preferred_sizes(children: &[Self]) -> Vec<Size> {
        children.iter().map(Self::preferred_size).collect()
    }

    /// Panics if the control is frozen.
    pub(crate) fn ensure_configurable(&self, operation: &str) {
        assert!(
            !self.is_finalized(),
            "{operation} cannot change a control after its window was created"
        );
    }

    /// Records that `owner` took this control.
    ///
    /// # Panics
    ///
    /// Panics if the control already belongs to a container or window.
    pub(crate) fn adopt(&self, owner: &str) {
        let mut placement = self.node.placement.borrow_mut();
        assert!(
            !placement.adopted,
            "a {:?} cannot be added to {owner}: it already has a parent",
            self.node.body.kind()
        );
        placement.adopted = true;
    }

    /// Pushes a property to the native widget, if one exists.
    pub(crate) fn push(&self, property: &Property) {
        if let Some(handle) = self.handle() {
            dispatch::with_backend(|backend| backend.set_property(handle, property));
        }
    }

    /// Creates native widgets for this subtree under `parent` and freezes it.
    pub(crate) fn realize(&self, parent: WidgetHandle) {
        if self.node.body.is_native() {
            let mut config = WidgetConfig::new(Some(parent));
            config.properties = self.node.body.initial_properties();
            let kind = self.kind();
            let handle = dispatch::with_backend(|backend| backend.create_widget(kind, &config));
            self.node.placement.borrow_mut().handle = Some(handle);
            if let Body::Area(state) = &self.node.body {
                state.attach(handle);
            }
            let target: Weak<Node> = Rc::downgrade(&self.node);
            dispatch::connect(handle, target);
            trace!(?kind, %handle, "native widget created");
        }
        self.node.placement.borrow_mut().finalized = true;

        for child in self.children() {
            child.realize(parent);
        }
    }

    /// Destroys the native widgets of this subtree.
    pub(crate) fn unrealize(&self) {
        for child in self.children() {
            child.unrealize();
        }
        let handle = self.node.placement.borrow_mut().handle.take();
        if let Some(handle) = handle {
            dispatch::disconnect(handle);
            dispatch::with_backend(|backend| backend.destroy_widget(handle));
        }
    }

    /// Assigns `rect` to this control and lays out its subtree, collecting
    /// the rectangles native widgets must receive.
    pub(crate) fn layout(&self, rect: Rect, placements: &mut Vec<(WidgetHandle, Rect)>) {
        let handle = {
            let mut placement = self.node.placement.borrow_mut();
            placement.rect = rect;
            placement.handle
        };
        if let Some(handle) = handle {
            placements.push((handle, rect));
        }

        let children = self.children();
        if children.is_empty() {
            return;
        }
        let preferred = Self::preferred_sizes(children);
        let rects = match &self.node.body {
            Body::Stack(state) => state.layout().place(rect, &preferred),
            Body::Grid(state) => state.layout().place(rect, &preferred),
            _ => return,
        };
        for (child, rect) in children.iter().zip(rects) {
            child.layout(rect, placements);
        }
    }
}

/// Implements the conversions shared by every typed control handle.
macro_rules! control_handle {
    ($ty:ident, $variant:ident, $state:ty) => {
        impl From<$ty> for $crate::control::Control {
            fn from(value: $ty) -> Self {
                value.control
            }
        }

        impl AsRef<$crate::control::Control> for $ty {
            fn as_ref(&self) -> &$crate::control::Control {
                &self.control
            }
        }

        impl $ty {
            /// The untyped handle for this control.
            #[must_use]
            pub const fn control(&self) -> &$crate::control::Control {
                &self.control
            }

            fn state(&self) -> &$state {
                match &self.control.node.body {
                    $crate::control::Body::$variant(state) => state,
                    _ => unreachable!(concat!(stringify!($ty), " handle over another variant")),
                }
            }
        }
    };
}

pub(crate) use control_handle;
