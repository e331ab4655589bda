use std::time::Instant;

use crate::engine::components::FlyCamera;
use crate::engine::config::HarnessConfig;
use crate::engine::utils::math::Vec3;

use super::input::KeyAction;

/// Everything the render loop mutates between frames.
#[derive(Debug)]
pub struct AppState {
    pub camera: FlyCamera,
    pub camera_enabled: bool,
    pub cursor_sensitivity: f32,
    pub clear_color: [f32; 4],
    pub model_color: [f32; 4],
    pub light_color: [f32; 4],
    pub scale: Vec3,
    pub light_position: Vec3,
    last_frame: Option<Instant>,
    pub dt: f32,
}

/// What the window should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    None,
    CaptureCursor(bool),
    Close,
}

impl AppState {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            camera: FlyCamera::with_sensitivity(config.camera.mouse_sensitivity, config.camera.key_sensitivity),
            camera_enabled: true,
            cursor_sensitivity: config.camera.cursor_sensitivity,
            clear_color: [1.0, 1.0, 1.0, 1.0],
            model_color: [1.0, 0.0, 0.0, 1.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            scale: [0.5, 0.5, 0.5],
            light_position: [-2.0, 2.0, 2.0],
            last_frame: None,
            dt: 0.0,
        }
    }

    pub fn handle_key(&mut self, action: KeyAction, pressed: bool) -> WindowRequest {
        match action {
            KeyAction::Move(direction) => {
                self.camera.set_movement(direction, pressed);
                WindowRequest::None
            }
            KeyAction::ToggleCamera if pressed => WindowRequest::CaptureCursor(self.toggle_camera()),
            KeyAction::Exit if pressed => WindowRequest::Close,
            _ => WindowRequest::None,
        }
    }

    /// Returns whether the camera is now enabled.
    pub fn toggle_camera(&mut self) -> bool {
        self.camera_enabled = !self.camera_enabled;
        log::debug!("camera {}", if self.camera_enabled { "captured" } else { "released" });
        self.camera_enabled
    }

    /// Turns the camera by raw pointer motion `(dx, dy)` in pixels.
    /// Moving right or down yields negative yaw or pitch.
    pub fn mouse_moved(&mut self, dx: f64, dy: f64) {
        if !self.camera_enabled {
            return;
        }
        let yaw = -dx as f32 * self.cursor_sensitivity;
        let pitch = -dy as f32 * self.cursor_sensitivity;
        self.camera.rotate(yaw, pitch);
    }

    /// Records frame timing and moves the camera. Returns `dt` in seconds.
    pub fn advance_frame(&mut self, now: Instant) -> f32 {
        self.dt = self.last_frame.map(|last| (now - last).as_secs_f32()).unwrap_or(0.0);
        self.last_frame = Some(now);
        if self.camera_enabled {
            self.camera.update(self.dt);
        }
        self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Direction;
    use std::time::Duration;

    #[test]
    fn pointer_motion_turns_camera() {
        let mut state = AppState::new(&HarnessConfig::default());
        state.mouse_moved(200.0, 0.0);

        // Moving right turns towards +x.
        let front = state.camera.front();
        assert!(front[0] > 0.0, "{front:?}");
        assert!(front[1].abs() < 1e-5);
    }

    #[test]
    fn released_camera_ignores_cursor_and_motion() {
        let mut state = AppState::new(&HarnessConfig::default());
        assert_eq!(state.handle_key(KeyAction::ToggleCamera, true), WindowRequest::CaptureCursor(false));
        assert_eq!(state.handle_key(KeyAction::ToggleCamera, false), WindowRequest::None);

        let front = state.camera.front();
        state.mouse_moved(50.0, 50.0);
        assert_eq!(state.camera.front(), front);

        state.handle_key(KeyAction::Move(Direction::Front), true);
        let start = Instant::now();
        state.advance_frame(start);
        state.advance_frame(start + Duration::from_millis(100));
        assert_eq!(state.camera.position(), [0.0, 0.0, 5.0]);
    }

    #[test]
    fn frame_timing_moves_enabled_camera() {
        let mut state = AppState::new(&HarnessConfig::default());
        state.handle_key(KeyAction::Move(Direction::Front), true);

        let start = Instant::now();
        assert_eq!(state.advance_frame(start), 0.0);
        let dt = state.advance_frame(start + Duration::from_millis(100));
        assert!((dt - 0.1).abs() < 1e-4);
        assert!(state.camera.position()[2] < 5.0);
    }

    #[test]
    fn escape_requests_close_on_press_only() {
        let mut state = AppState::new(&HarnessConfig::default());
        assert_eq!(state.handle_key(KeyAction::Exit, false), WindowRequest::None);
        assert_eq!(state.handle_key(KeyAction::Exit, true), WindowRequest::Close);
    }
}
