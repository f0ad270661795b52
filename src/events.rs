//! Input events.
//!
//! Events are plain values produced once per frame by the input source and handed to the tree by
//! reference. Nothing in here knows about elements.

use cgmath::{Point2, Vector2, Zero};

/// State of a single mouse button during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// The button is held down.
    pub down: bool,

    /// The button went down this frame.
    pub pressed: bool,

    /// The button went up this frame.
    pub released: bool,
}

impl ButtonState {
    /// A button that went down this frame (and is therefore also held).
    pub const PRESSED: ButtonState = ButtonState {
        down: true,
        pressed: true,
        released: false,
    };

    /// A button that is being held since an earlier frame.
    pub const HELD: ButtonState = ButtonState {
        down: true,
        pressed: false,
        released: false,
    };

    /// A button that went up this frame.
    pub const RELEASED: ButtonState = ButtonState {
        down: false,
        pressed: false,
        released: true,
    };
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// A mouse event.
///
/// Carries the full mouse state for one frame: where the cursor is, what the buttons are doing and
/// how far the wheel moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Cursor location in the coordinate space of whoever is receiving the event.
    ///
    /// For the tree this starts out in window space; scroll containers translate it into their
    /// content space before handing it to their children.
    pub location: Point2<f64>,
    pub left: ButtonState,
    pub middle: ButtonState,
    pub right: ButtonState,

    /// Wheel delta, in notches. Positive y is up.
    pub scroll_delta: Vector2<f64>,
}

impl MouseEvent {
    /// Creates an event at the given location with no buttons and no scrolling.
    pub fn at(x: f64, y: f64) -> MouseEvent {
        MouseEvent {
            location: Point2::new(x, y),
            left: ButtonState::default(),
            middle: ButtonState::default(),
            right: ButtonState::default(),
            scroll_delta: Vector2::zero(),
        }
    }

    /// Convenience for a left click at the given location.
    pub fn click(x: f64, y: f64) -> MouseEvent {
        MouseEvent::at(x, y).with_pressed(MouseButton::Left)
    }

    /// Convenience for a wheel event at the given location.
    pub fn wheel(x: f64, y: f64, dx: f64, dy: f64) -> MouseEvent {
        MouseEvent::at(x, y).with_scroll(dx, dy)
    }

    pub fn with_button(mut self, button: MouseButton, state: ButtonState) -> MouseEvent {
        *self.button_mut(button) = state;
        self
    }

    /// Marks the button as having gone down this frame.
    pub fn with_pressed(self, button: MouseButton) -> MouseEvent {
        self.with_button(button, ButtonState::PRESSED)
    }

    /// Marks the button as held.
    pub fn with_down(self, button: MouseButton) -> MouseEvent {
        self.with_button(button, ButtonState::HELD)
    }

    /// Marks the button as having gone up this frame.
    pub fn with_released(self, button: MouseButton) -> MouseEvent {
        self.with_button(button, ButtonState::RELEASED)
    }

    pub fn with_scroll(mut self, dx: f64, dy: f64) -> MouseEvent {
        self.scroll_delta = Vector2::new(dx, dy);
        self
    }

    /// Returns the state of one button.
    pub fn button(&self, button: MouseButton) -> ButtonState {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }

    fn button_mut(&mut self, button: MouseButton) -> &mut ButtonState {
        match button {
            MouseButton::Left => &mut self.left,
            MouseButton::Middle => &mut self.middle,
            MouseButton::Right => &mut self.right,
        }
    }

    fn buttons(&self) -> [ButtonState; 3] {
        [self.left, self.middle, self.right]
    }

    /// True if any button went down this frame.
    pub fn any_pressed(&self) -> bool {
        self.buttons().iter().any(|b| b.pressed)
    }

    /// True if any button is held.
    pub fn any_down(&self) -> bool {
        self.buttons().iter().any(|b| b.down)
    }

    /// True if any button went up this frame.
    pub fn any_released(&self) -> bool {
        self.buttons().iter().any(|b| b.released)
    }

    /// True if the wheel moved.
    pub fn is_scroll(&self) -> bool {
        self.scroll_delta.x != 0. || self.scroll_delta.y != 0.
    }

    /// Returns the same event with the location moved by `offset`.
    pub fn translated(&self, offset: Vector2<f64>) -> MouseEvent {
        MouseEvent {
            location: self.location + offset,
            ..*self
        }
    }
}

/// What happened to a key this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// The key went down this frame.
    Pressed,
    /// The key went up this frame.
    Released,
    /// The key is being held (or repeating).
    Down,
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any option key or alt key is pressed.
    pub option: bool,

    /// Whether any command key or meta key is pressed.
    pub command: bool,
}

impl KeyModifiers {
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.control || self.option || self.command)
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: KeyCode,
    pub action: KeyAction,
    pub modifiers: KeyModifiers,
}

impl KeyboardEvent {
    pub fn new(key: KeyCode, action: KeyAction) -> KeyboardEvent {
        KeyboardEvent {
            key,
            action,
            modifiers: KeyModifiers::default(),
        }
    }

    /// A key that went down this frame.
    pub fn pressed(key: KeyCode) -> KeyboardEvent {
        KeyboardEvent::new(key, KeyAction::Pressed)
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> KeyboardEvent {
        self.modifiers = modifiers;
        self
    }
}

/// Keyboard layout-independent identifiers for keyboard keys.
///
/// Some obscure keys may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    Minus,
    Equal,
    Comma,
    Period,
    Slash,
    Return,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,
    Shift,
    Control,
    Option,
    Command,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
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
}
