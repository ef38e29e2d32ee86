//! Screen ↔ world transform.
//!
//! `screen = world * scale + offset`. The zoom step is additive: each notch
//! adds or subtracts `zoom_step` from the scale, clamped to
//! `[min_scale, max_scale]`. At either bound a further notch in the same
//! direction leaves the viewport untouched.

use crate::config::EditorConfig;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Visible canvas area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: scrolling up (negative delta) zooms in.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }

    fn sign(self) -> f64 {
        match self {
            ZoomDirection::In => 1.0,
            ZoomDirection::Out => -1.0,
        }
    }
}

/// Pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.offset) / self.scale).to_point()
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        (world.to_vec2() * self.scale + self.offset).to_point()
    }

    /// Convert a screen-space distance into world units.
    pub fn screen_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Set the pan offset directly (screen pixels).
    pub fn pan_to(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Zoom one notch around `screen`, keeping the world point under it fixed.
    #[must_use]
    pub fn zoom_at(&self, screen: Point, direction: ZoomDirection, config: &EditorConfig) -> Self {
        let anchor = self.screen_to_world(screen);
        let scale = (self.scale + direction.sign() * config.zoom_step)
            .clamp(config.min_scale, config.max_scale);
        if scale == self.scale {
            return *self;
        }
        Self {
            scale,
            offset: screen.to_vec2() - anchor.to_vec2() * scale,
        }
    }
}

/// One wheel notch as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub screen: Point,
    pub delta_y: f64,
}

/// Latest-wins buffer for wheel events.
///
/// Hosts push every wheel event and drain once per animation frame; the
/// intermediate events of a burst are dropped.
#[derive(Debug, Clone, Default)]
pub struct WheelCoalescer {
    pending: Option<WheelEvent>,
}

impl WheelCoalescer {
    pub fn push(&mut self, event: WheelEvent) {
        self.pending = Some(event);
    }

    pub fn take(&mut self) -> Option<WheelEvent> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
