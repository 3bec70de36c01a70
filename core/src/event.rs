//! Input snapshots and native notifications delivered by backend adapters.
//!
//! A [`MouseEvent`] or [`KeyEvent`] describes exactly one native input
//! notification. It is built by the backend, handed to an area handler by
//! value and dropped once the handler returns.

use crate::layout::{Point, Size};

bitflags::bitflags! {
    /// Keyboard modifiers held while an input event occurred.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL = 0b0001;
        /// Alt (Option on macOS).
        const ALT = 0b0010;
        /// Shift key.
        const SHIFT = 0b0100;
        /// Super (Windows or Command key).
        const SUPER = 0b1000;
    }
}

/// Mouse input delivered to an area.
///
/// Buttons are numbered from 1. Buttons 1, 2 and 3 are the left, middle and
/// right buttons; higher numbers are backend-defined extra buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MouseEvent {
    /// Position of the pointer, relative to the area's top-left corner.
    pub pos: Point,
    /// The button pressed by this event, or 0 if none was.
    pub down: u8,
    /// The button released by this event, or 0 if none was.
    pub up: u8,
    /// Click count for `down` (2 for a double click). Zero when `down` is 0.
    pub count: u32,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
    /// Buttons held during the event, excluding `down` and `up`.
    pub held: Vec<u8>,
}

impl MouseEvent {
    /// A pointer move with no button activity.
    #[must_use]
    pub const fn moved(pos: Point) -> Self {
        Self {
            pos,
            down: 0,
            up: 0,
            count: 0,
            modifiers: Modifiers::empty(),
            held: Vec::new(),
        }
    }

    /// A single press of `button` at `pos`.
    #[must_use]
    pub const fn pressed(pos: Point, button: u8) -> Self {
        Self {
            pos,
            down: button,
            up: 0,
            count: 1,
            modifiers: Modifiers::empty(),
            held: Vec::new(),
        }
    }

    /// A release of `button` at `pos`.
    #[must_use]
    pub const fn released(pos: Point, button: u8) -> Self {
        Self {
            pos,
            down: 0,
            up: button,
            count: 0,
            modifiers: Modifiers::empty(),
            held: Vec::new(),
        }
    }

    /// Returns true if `button` was held while this event happened.
    #[must_use]
    pub fn is_held(&self, button: u8) -> bool {
        self.held.contains(&button)
    }

    /// Returns true if this event presses a button.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        self.down != 0
    }
}

/// Keys that do not produce a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ExtKey {
    Escape,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// Keypad digit 0-9.
    Keypad(u8),
    KeypadDot,
    KeypadEnter,
    KeypadAdd,
    KeypadSubtract,
    KeypadMultiply,
    KeypadDivide,
}

/// Keyboard input delivered to an area.
///
/// Exactly one of `key`, `ext_key` and `modifier` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// The character key, as it would appear on a US layout without Shift.
    pub key: Option<char>,
    /// A non-character key.
    pub ext_key: Option<ExtKey>,
    /// A modifier key pressed or released on its own.
    pub modifier: Option<Modifiers>,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
    /// True on key release, false on key press.
    pub up: bool,
}

impl KeyEvent {
    /// A character key press.
    #[must_use]
    pub const fn char(key: char) -> Self {
        Self {
            key: Some(key),
            ext_key: None,
            modifier: None,
            modifiers: Modifiers::empty(),
            up: false,
        }
    }

    /// A non-character key press.
    #[must_use]
    pub const fn ext(key: ExtKey) -> Self {
        Self {
            key: None,
            ext_key: Some(key),
            modifier: None,
            modifiers: Modifiers::empty(),
            up: false,
        }
    }

    /// Returns a copy marked as a key release.
    #[must_use]
    pub fn released(mut self) -> Self {
        self.up = true;
        self
    }
}

/// A native notification forwarded by a backend to the control owning a
/// widget. Paint requests travel separately through
/// [`EventSink::paint`](crate::dispatch::EventSink::paint) because they need a
/// reply.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Notification {
    /// A button was activated.
    Clicked,
    /// The user asked to close a window.
    Closing,
    /// A window's client area changed size.
    Resized(Size),
    /// The user edited the text of an editable widget.
    TextChanged(String),
    /// A checkbox changed state.
    Toggled(bool),
    /// The selection of a combobox or listbox changed.
    SelectionChanged(Vec<usize>),
    /// Mouse input over an area.
    Mouse(MouseEvent),
    /// Keyboard input for a focused area.
    Key(KeyEvent),
}
