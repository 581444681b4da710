//! Translates raw winit input into gesture-controller calls and direct
//! view adjustments (wheel zoom, keyboard shortcuts).

use std::time::Instant;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase};
use winit::keyboard::{Key, NamedKey};

use corelib::view::{ViewState, ZOOM_STEP};

use crate::gesture::{GestureController, TouchPoint};

/// Yaw applied per arrow-key press, in degrees.
const KEY_ROTATE_STEP_DEG: f32 = 30.0;
/// Synthetic touch id for the mouse pointer, outside the OS touch range.
const MOUSE_TOUCH_ID: u64 = u64::MAX;

pub struct InputState {
    gestures: GestureController,
    /// Active touches in arrival order.
    touches: Vec<(u64, TouchPoint)>,
    cursor: TouchPoint,
    mouse_down: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gestures: GestureController::new(),
            touches: Vec::new(),
            cursor: TouchPoint::new(0.0, 0.0),
            mouse_down: false,
        }
    }

    fn points(&self) -> Vec<TouchPoint> {
        self.touches.iter().map(|(_, p)| *p).collect()
    }

    fn upsert(&mut self, id: u64, point: TouchPoint) {
        match self.touches.iter_mut().find(|(i, _)| *i == id) {
            Some((_, p)) => *p = point,
            None => self.touches.push((id, point)),
        }
    }

    fn remove(&mut self, id: u64) {
        self.touches.retain(|(i, _)| *i != id);
    }

    pub fn handle_touch(&mut self, touch: Touch, view: &mut ViewState) {
        let point = TouchPoint::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => {
                self.upsert(touch.id, point);
                self.gestures.touch_began(&self.points(), view);
            }
            TouchPhase::Moved => {
                self.upsert(touch.id, point);
                self.gestures.touch_moved(&self.points(), view);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.remove(touch.id);
                self.gestures
                    .touch_ended(&self.points(), Instant::now(), view);
            }
        }
    }

    /// Left mouse drag acts as a single synthetic touch point.
    pub fn handle_mouse_button(
        &mut self,
        state: ElementState,
        button: MouseButton,
        view: &mut ViewState,
    ) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.mouse_down = true;
                self.upsert(MOUSE_TOUCH_ID, self.cursor);
                self.gestures.touch_began(&self.points(), view);
            }
            ElementState::Released => {
                self.mouse_down = false;
                self.remove(MOUSE_TOUCH_ID);
                self.gestures
                    .touch_ended(&self.points(), Instant::now(), view);
            }
        }
    }

    pub fn handle_cursor_moved(&mut self, x: f64, y: f64, view: &mut ViewState) {
        self.cursor = TouchPoint::new(x as f32, y as f32);
        if self.mouse_down {
            self.upsert(MOUSE_TOUCH_ID, self.cursor);
            self.gestures.touch_moved(&self.points(), view);
        }
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta, view: &mut ViewState) {
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
        };
        view.zoom_by(steps * ZOOM_STEP);
    }

    /// Keyboard equivalents of the original viewer's on-screen buttons.
    pub fn handle_key(&mut self, key: &Key, view: &mut ViewState) {
        match key {
            Key::Named(NamedKey::ArrowLeft) => view.rotate_by(-KEY_ROTATE_STEP_DEG, 0.0),
            Key::Named(NamedKey::ArrowRight) => view.rotate_by(KEY_ROTATE_STEP_DEG, 0.0),
            Key::Character(c) if c == "a" => {
                view.auto_rotate = !view.auto_rotate;
                log::info!("auto-rotate: {}", view.auto_rotate);
            }
            Key::Character(c) if c == "r" => view.reset(),
            Key::Character(c) if c == "+" || c == "=" => view.zoom_by(ZOOM_STEP),
            Key::Character(c) if c == "-" => view.zoom_by(-ZOOM_STEP),
            _ => {}
        }
    }
}
