use trellis_core::{ControlKind, EventSink, Property, Rect, Size, WidgetHandle};

/// Everything the headless backend knows about one widget.
#[derive(Debug, Clone)]
pub struct WidgetRecord {
    /// The variant the widget was created for.
    pub kind: ControlKind,
    /// The native parent, `None` for windows.
    pub parent: Option<WidgetHandle>,
    /// The last rectangle applied, if any.
    pub rect: Option<Rect>,
    /// Every property pushed, oldest first, starting with the creation
    /// properties.
    pub properties: Vec<Property>,
    /// What [`preferred_size`](trellis_core::Backend::preferred_size) answers.
    pub preferred: Size,
    /// Number of invalidation requests.
    pub invalidations: usize,
    /// Set once the widget was destroyed.
    pub destroyed: bool,
    pub(crate) sink: Option<EventSink>,
}

impl WidgetRecord {
    pub(crate) fn new(
        kind: ControlKind,
        parent: Option<WidgetHandle>,
        properties: Vec<Property>,
        preferred: Size,
    ) -> Self {
        Self {
            kind,
            parent,
            rect: None,
            properties,
            preferred,
            invalidations: 0,
            destroyed: false,
            sink: None,
        }
    }

    /// The most recent text property.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.properties.iter().rev().find_map(|property| match property {
            Property::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the current visibility of a window.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.properties
            .iter()
            .rev()
            .find_map(|property| match property {
                Property::Visible(visible) => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Returns true if the widget has a registered event sink.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.sink.is_some()
    }
}
