use bevy_math::Mat3;
use bevy_math::Mat4;
use bevy_math::Vec3;
use bevy_math::Vec4;
use std::f32::consts::FRAC_PI_4;

/// First person camera in the left-handed Direct3D convention.
///
/// Movement and rotation only touch the position and basis vectors;
/// call [`Camera::update_view_matrix`] once per frame to fix up drift and rebuild the view.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    right: Vec3,
    up: Vec3,
    look: Vec3,

    fov_y: f32,
    aspect: f32,
    near_z: f32,
    far_z: f32,

    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            look: Vec3::Z,
            fov_y: FRAC_PI_4,
            aspect: 1.0,
            near_z: 1.0,
            far_z: 1000.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.set_lens(FRAC_PI_4, 1.0, 1.0, 1000.0);
        camera.update_view_matrix();
        camera
    }
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self::default();
        camera.set_lens(camera.fov_y, aspect, camera.near_z, camera.far_z);
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn look(&self) -> Vec3 {
        self.look
    }

    pub fn set_lens(&mut self, fov_y: f32, aspect: f32, near_z: f32, far_z: f32) {
        self.fov_y = fov_y;
        self.aspect = aspect;
        self.near_z = near_z;
        self.far_z = far_z;
        self.projection = Mat4::perspective_lh(fov_y, aspect, near_z, far_z);
    }

    /// Moves along the look vector.
    pub fn walk(&mut self, distance: f32) {
        self.position += self.look * distance;
    }

    /// Moves along the right vector.
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    /// Rotates up and look around the right vector.
    pub fn pitch(&mut self, angle: f32) {
        let rotation = Mat3::from_axis_angle(self.right.normalize(), angle);
        self.up = rotation * self.up;
        self.look = rotation * self.look;
    }

    /// Rotates the whole basis around the world Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        let rotation = Mat3::from_rotation_y(angle);
        self.right = rotation * self.right;
        self.up = rotation * self.up;
        self.look = rotation * self.look;
    }

    pub fn update_view_matrix(&mut self) {
        // Rounding error accumulates across rotations.
        let look = self.look.normalize();
        let up = look.cross(self.right).normalize();
        let right = up.cross(look);

        self.look = look;
        self.up = up;
        self.right = right;

        // Rows are the basis vectors, the last column moves the eye to the origin.
        self.view = Mat4::from_cols(
            Vec4::new(right.x, up.x, look.x, 0.0),
            Vec4::new(right.y, up.y, look.y, 0.0),
            Vec4::new(right.z, up.z, look.z, 0.0),
            Vec4::new(
                -self.position.dot(right),
                -self.position.dot(up),
                -self.position.dot(look),
                1.0,
            ),
        );
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &Camera) {
        assert!((camera.right().length() - 1.0).abs() < EPS);
        assert!((camera.up().length() - 1.0).abs() < EPS);
        assert!((camera.look().length() - 1.0).abs() < EPS);
        assert!(camera.right().dot(camera.up()).abs() < EPS);
        assert!(camera.up().dot(camera.look()).abs() < EPS);
        assert!(camera.look().dot(camera.right()).abs() < EPS);
    }

    #[test]
    fn default_camera_looks_down_positive_z() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::ZERO);
        assert_eq!(camera.look(), Vec3::Z);
        assert_eq!(camera.view(), Mat4::IDENTITY);
    }

    #[test]
    fn walk_and_strafe_follow_the_basis() {
        let mut camera = Camera::default();
        camera.walk(2.0);
        camera.strafe(-3.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(-3.0, 0.0, 2.0), EPS));
    }

    #[test]
    fn rotate_y_turns_look_toward_right() {
        let mut camera = Camera::default();
        camera.rotate_y(FRAC_PI_2);
        assert!(camera.look().abs_diff_eq(Vec3::X, EPS));
        assert!(camera.right().abs_diff_eq(-Vec3::Z, EPS));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let mut camera = Camera::default();
        camera.pitch(0.3);
        assert!(camera.look().y < 0.0);
        assert!(camera.right().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn update_view_matrix_restores_orthonormal_basis() {
        let mut camera = Camera::default();
        for step in 0..500 {
            camera.pitch(0.013 * (step % 7) as f32 - 0.03);
            camera.rotate_y(0.021);
        }
        camera.update_view_matrix();
        assert_orthonormal(&camera);
    }

    #[test]
    fn view_maps_eye_to_origin_and_look_to_z() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(4.0, -2.0, 7.0));
        camera.rotate_y(0.7);
        camera.pitch(-0.2);
        camera.update_view_matrix();

        let view = camera.view();
        assert!(view.transform_point3(camera.position()).abs_diff_eq(Vec3::ZERO, 1e-4));
        assert!(view.transform_vector3(camera.look()).abs_diff_eq(Vec3::Z, EPS));
        assert!(view.transform_vector3(camera.right()).abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn view_agrees_with_look_to_lh() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        camera.rotate_y(-0.6);
        camera.pitch(0.3);
        camera.update_view_matrix();
        let expected = Mat4::look_to_lh(camera.position(), camera.look(), camera.up());
        assert!(camera.view().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn points_in_front_land_inside_the_frustum() {
        let mut camera = Camera::new(800.0 / 600.0);
        camera.update_view_matrix();
        let clip = camera.view_projection() * Vec3::new(0.0, 0.0, 10.0).extend(1.0);
        let depth = clip.z / clip.w;
        assert!(clip.w > 0.0);
        assert!((0.0..=1.0).contains(&depth));
    }
}
