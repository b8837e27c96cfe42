//! Pointer input tracking.
//!
//! The `PointerInput` struct provides a clean abstraction over raw window
//! events, tracking both instantaneous events (button just pressed) and
//! continuous state (button held down), plus the cursor position in pixels
//! and in normalized device coordinates for ray picking.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

impl PointerButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(PointerButton::Left),
            WinitMouseButton::Right => Some(PointerButton::Right),
            WinitMouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

/// Pointer state tracking.
///
/// Tracks both instantaneous events (pressed/released this frame) and
/// continuous state (currently held).
#[derive(Debug, Default)]
pub struct PointerInput {
    held: HashSet<PointerButton>,
    pressed: HashSet<PointerButton>,
    released: HashSet<PointerButton>,

    position: Vec2,
    ndc: Vec2,
    delta: Vec2,

    scroll_delta: f32,

    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl PointerInput {
    /// Create a new pointer tracker.
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    /// Check if a button was pressed this frame (just went down).
    pub fn pressed(&self, button: PointerButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Check if a button is currently held down.
    pub fn held(&self, button: PointerButton) -> bool {
        self.held.contains(&button)
    }

    /// Check if a button was released this frame (just went up).
    pub fn released(&self, button: PointerButton) -> bool {
        self.released.contains(&button)
    }

    /// Get the cursor position in screen pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Get the cursor position in normalized device coordinates (-1 to 1).
    ///
    /// Origin is at center of window. X increases to the right, Y increases
    /// upward.
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Get the cursor movement since last frame in pixels.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Get the scroll wheel delta this frame.
    ///
    /// Positive values indicate scrolling up/forward.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Called at the start of each frame to clear per-frame state.
    pub(crate) fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Update window size for NDC calculations.
    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    fn track_cursor(&mut self, new_pos: Vec2) {
        self.delta += new_pos - self.position;
        self.position = new_pos;

        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.ndc = Vec2::new(
                (new_pos.x / w as f32) * 2.0 - 1.0,
                1.0 - (new_pos.y / h as f32) * 2.0, // Y flipped
            );
        }
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(btn) = PointerButton::from_winit(*button) else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        self.pressed.insert(btn);
                        self.held.insert(btn);
                    }
                    ElementState::Released => {
                        self.held.remove(&btn);
                        self.released.insert(btn);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.track_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => *y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            _ => {}
        }
    }
}
