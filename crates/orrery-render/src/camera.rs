//! Fly camera: Euler yaw/pitch look, scroll zoom, reverse-Z projection.

use glam::{Mat3, Mat4, Vec3};

/// World up axis used to derive the camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pitch is clamped to keep the basis well defined.
pub const PITCH_LIMIT: f32 = 89.0;

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// A free-flying perspective camera.
///
/// Angles are in degrees. Yaw `-90` looks down `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees, in `MIN_ZOOM..=MAX_ZOOM`.
    pub zoom: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pixel of look motion.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            zoom: MAX_ZOOM,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            speed: 10.0,
            sensitivity: 0.1,
        }
    }
}

impl FlyCamera {
    /// Place the camera at `position` looking along `front`.
    ///
    /// A zero or non-finite `front` keeps the default orientation.
    pub fn looking_along(position: Vec3, front: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Self::default()
        };
        camera.set_front(front);
        camera
    }

    /// Recover yaw/pitch from a direction vector.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(dir) = front.try_normalize() else {
            return;
        };
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(WORLD_UP).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalize()
    }

    /// Move along the camera basis. `local` is (right, up, forward); each axis
    /// is typically -1, 0 or 1.
    pub fn fly(&mut self, local: Vec3, dt: f32) {
        if local == Vec3::ZERO {
            return;
        }
        let velocity = self.speed * dt;
        self.position += (self.right() * local.x + self.up() * local.y + self.front() * local.z)
            * velocity;
    }

    /// Apply a mouse-look delta in pixels. Positive `dy` is downward motion.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scroll zoom: positive lines narrow the field of view.
    pub fn scroll(&mut self, lines: f32) {
        self.zoom = (self.zoom - lines).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front(), self.up())
    }

    /// Reverse-Z perspective: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.zoom.to_radians(),
            self.aspect_ratio,
            self.far,
            self.near,
        )
    }

    /// Inverse of projection times the rotation-only view, for skybox ray
    /// reconstruction.
    pub fn skybox_inv_view_proj(&self) -> Mat4 {
        let rotation = Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()));
        (self.projection_matrix() * rotation).inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let camera = FlyCamera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < EPS);
        assert!((camera.right() - Vec3::X).length() < EPS);
        assert!((camera.up() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn test_front_round_trips_through_yaw_pitch() {
        let front = Vec3::new(0.3, -0.4, -0.8).normalize();
        let camera = FlyCamera::looking_along(Vec3::ZERO, front);
        assert!((camera.front() - front).length() < 1e-4);
    }

    #[test]
    fn test_zero_front_keeps_default_orientation() {
        let camera = FlyCamera::looking_along(Vec3::ONE, Vec3::ZERO);
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.position, Vec3::ONE);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.look(0.0, -10_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.look(0.0, 10_000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_look_right_increases_yaw() {
        let mut camera = FlyCamera::default();
        camera.look(100.0, 0.0);
        assert!((camera.yaw - (-90.0 + 100.0 * camera.sensitivity)).abs() < EPS);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.scroll(-5.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.scroll(100.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
        camera.scroll(-3.0);
        assert_eq!(camera.zoom, 4.0);
    }

    #[test]
    fn test_fly_forward_moves_along_front() {
        let mut camera = FlyCamera::default();
        camera.speed = 2.0;
        camera.fly(Vec3::Z, 0.5);
        assert!((camera.position - Vec3::new(0.0, 0.0, 2.0)).length() < EPS);

        camera.fly(Vec3::new(1.0, 1.0, 0.0), 1.0);
        assert!((camera.position - Vec3::new(2.0, 2.0, 2.0)).length() < EPS);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let camera = FlyCamera {
            position: Vec3::ZERO,
            ..FlyCamera::default()
        };
        let view_proj = camera.projection_matrix() * camera.view_matrix();

        let near = view_proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = view_proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!((near.z - 1.0).abs() < 1e-4);
        assert!(far.z.abs() < 1e-4);
    }

    #[test]
    fn test_skybox_matrix_ignores_translation() {
        let a = FlyCamera::default();
        let b = FlyCamera {
            position: Vec3::new(100.0, -50.0, 7.0),
            ..FlyCamera::default()
        };
        let diff = a.skybox_inv_view_proj() - b.skybox_inv_view_proj();
        assert!(diff.to_cols_array().iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_size() {
        let mut camera = FlyCamera::default();
        camera.set_aspect_ratio(1200.0, 800.0);
        assert!((camera.aspect_ratio - 1.5).abs() < EPS);
        camera.set_aspect_ratio(0.0, 0.0);
        assert!((camera.aspect_ratio - 1.5).abs() < EPS);
    }
}
