use crate::engine::utils::math::{
    Mat4x4,
    Vec3,
    mat4x4_look_at,
    rotate_about_axis,
    vec3_add,
    vec3_cross,
    vec3_dot,
    vec3_lerp,
    vec3_normalize,
    vec3_scale,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
}

impl Direction {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Free-flying camera with smoothed keyboard movement.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    mouse_sensitivity: f32,
    key_sensitivity: f32,
    up: Vec3,
    movement: u8,
    position: Vec3,
    front: Vec3,
    velocity: Vec3,
}

impl FlyCamera {
    pub fn new(mouse_sensitivity: f32, key_sensitivity: f32, position: Vec3, front: Vec3, up: Vec3) -> Self {
        Self {
            mouse_sensitivity,
            key_sensitivity,
            up,
            movement: 0,
            position,
            front: vec3_normalize(front),
            velocity: [0.0; 3],
        }
    }

    pub fn with_sensitivity(mouse_sensitivity: f32, key_sensitivity: f32) -> Self {
        Self {
            mouse_sensitivity,
            key_sensitivity,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Turns by the given angles in degrees, scaled by mouse sensitivity.
    /// Pitch that would bring the view within ~8 degrees of straight up or
    /// down is dropped; yaw always applies.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let yaw = (yaw * self.mouse_sensitivity).to_radians();
        let pitch = (pitch * self.mouse_sensitivity).to_radians();

        let right = vec3_cross(self.front, self.up);
        let pitched = rotate_about_axis(self.front, pitch, right);
        if vec3_dot(pitched, self.up).abs() < 0.99 {
            self.front = pitched;
        }
        self.front = vec3_normalize(rotate_about_axis(self.front, yaw, self.up));
    }

    pub fn set_movement(&mut self, direction: Direction, on: bool) {
        if on {
            self.movement |= direction.bit();
        } else {
            self.movement &= !direction.bit();
        }
    }

    pub fn is_moving(&self, direction: Direction) -> bool {
        self.movement & direction.bit() != 0
    }

    /// Advances the position by `dt` seconds of movement intent.
    pub fn update(&mut self, dt: f32) {
        let axis = |positive: Direction, negative: Direction| {
            (self.is_moving(positive) as i8 - self.is_moving(negative) as i8) as f32
        };

        let right = vec3_cross(self.front, self.up);
        let mut target = vec3_scale(right, axis(Direction::Right, Direction::Left));
        target = vec3_add(target, vec3_scale(self.up, axis(Direction::Up, Direction::Down)));
        target = vec3_add(target, vec3_scale(self.front, axis(Direction::Front, Direction::Back)));

        self.velocity = vec3_lerp(self.velocity, vec3_scale(target, dt * self.key_sensitivity), 0.5);
        self.position = vec3_add(self.position, self.velocity);
    }

    pub fn compute_view_matrix(&self) -> Mat4x4 {
        mat4x4_look_at(self.position, vec3_add(self.position, self.front), self.up)
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(0.5, 5.0, [0.0, 0.0, 5.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_camera_stays_put() {
        let mut camera = FlyCamera::default();
        camera.update(0.016);
        assert_eq!(camera.position(), [0.0, 0.0, 5.0]);
    }

    #[test]
    fn forward_intent_moves_along_front() {
        let mut camera = FlyCamera::default();
        camera.set_movement(Direction::Front, true);
        camera.update(0.1);

        // Half of dt * key_sensitivity on the first frame.
        let z = camera.position()[2];
        assert!((z - 4.75).abs() < 1e-5, "z = {z}");

        camera.set_movement(Direction::Front, false);
        assert!(!camera.is_moving(Direction::Front));
    }

    #[test]
    fn opposite_intents_cancel() {
        let mut camera = FlyCamera::default();
        camera.set_movement(Direction::Left, true);
        camera.set_movement(Direction::Right, true);
        camera.update(1.0);
        assert_eq!(camera.position(), [0.0, 0.0, 5.0]);
    }

    #[test]
    fn pitch_stops_short_of_vertical() {
        let mut camera = FlyCamera::with_sensitivity(1.0, 5.0);
        for _ in 0..20 {
            camera.rotate(0.0, 10.0);
        }
        assert!(vec3_dot(camera.front(), [0.0, 1.0, 0.0]).abs() < 0.99);
        assert!(camera.front()[1] > 0.9);
    }

    #[test]
    fn yaw_keeps_front_horizontal_and_unit() {
        let mut camera = FlyCamera::with_sensitivity(1.0, 5.0);
        camera.rotate(90.0, 0.0);
        let front = camera.front();
        assert!((front[0] - -1.0).abs() < 1e-5, "{front:?}");
        assert!(front[1].abs() < 1e-5);
    }

    #[test]
    fn view_matrix_places_camera_at_origin() {
        let camera = FlyCamera::default();
        let view = camera.compute_view_matrix();
        // Translation column of a row-major look-at from (0, 0, 5).
        assert!((view[11] - -5.0).abs() < 1e-5);
    }
}
