use crate::camera::Camera;
use crate::engine_config::EngineConfig;
use crate::window_event::CursorPosition;
use crate::window_event::WindowEvent;
use windows::Win32::UI::Input::KeyboardAndMouse::*;

/// Source of "is this key held right now" answers.
pub trait KeyboardState {
    fn is_key_down(&self, key: VIRTUAL_KEY) -> bool;
}

impl KeyboardState for [VIRTUAL_KEY] {
    fn is_key_down(&self, key: VIRTUAL_KEY) -> bool {
        self.contains(&key)
    }
}

/// What the window procedure has to do on the OS side after an event was routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResponse {
    /// Not ours, hand it to `DefWindowProc`.
    Unhandled,
    Handled,
    CaptureMouse,
    ReleaseMouse,
    Quit,
}

/// Turns polled keys and mouse messages into camera motion.
#[derive(Clone, Debug)]
pub struct CameraController {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub degrees_per_pixel: f32,
    last_mouse_position: CursorPosition,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            degrees_per_pixel: config.degrees_per_pixel,
            last_mouse_position: CursorPosition::default(),
        }
    }

    pub fn last_mouse_position(&self) -> CursorPosition {
        self.last_mouse_position
    }

    /// WASD movement, Shift to sprint. Rebuilds the view matrix afterwards.
    pub fn update_camera<K: KeyboardState + ?Sized>(
        &self,
        camera: &mut Camera,
        keyboard: &K,
        dt: f32,
    ) {
        let speed = if keyboard.is_key_down(VK_SHIFT) {
            self.sprint_speed
        } else {
            self.walk_speed
        };
        let step = speed * dt;

        if keyboard.is_key_down(VK_W) {
            camera.walk(step);
        }
        if keyboard.is_key_down(VK_S) {
            camera.walk(-step);
        }
        if keyboard.is_key_down(VK_A) {
            camera.strafe(-step);
        }
        if keyboard.is_key_down(VK_D) {
            camera.strafe(step);
        }

        camera.update_view_matrix();
    }

    pub fn on_event(&mut self, event: &WindowEvent, camera: &mut Camera) -> InputResponse {
        match *event {
            WindowEvent::RightButtonDown { position, .. } => {
                self.last_mouse_position = position;
                InputResponse::CaptureMouse
            }
            WindowEvent::RightButtonUp { .. } => InputResponse::ReleaseMouse,
            WindowEvent::MouseMove { buttons, position } => {
                if buttons.left {
                    let dx = (self.degrees_per_pixel
                        * (position.x - self.last_mouse_position.x) as f32)
                        .to_radians();
                    let dy = (self.degrees_per_pixel
                        * (position.y - self.last_mouse_position.y) as f32)
                        .to_radians();
                    camera.pitch(dy);
                    camera.rotate_y(dx);
                }
                self.last_mouse_position = position;
                InputResponse::Handled
            }
            WindowEvent::KeyUp(VK_ESCAPE) => InputResponse::Quit,
            WindowEvent::KeyUp(_) => InputResponse::Unhandled,
            // Posting the quit message is the window procedure's job.
            WindowEvent::Destroy => InputResponse::Unhandled,
        }
    }
}
