//! Input abstraction layer.
//!
//! Normalizes host pointer and wheel events into a single `InputEvent` enum
//! consumed by the gesture machine. Coordinates are screen pixels relative
//! to the canvas origin.

use nw_core::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64 },

    /// Pointer moved.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// One wheel notch. Negative `delta_y` zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    /// Screen position of the event.
    pub fn position(&self) -> Point {
        match *self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. } => Point::new(x, y),
        }
    }
}
