use glam::{Mat3, Mat4, Vec3};

use crate::config::CameraConfig;
use crate::scene::FrameUniforms;

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 10.0;

/// Camera orbiting the cake at the origin. Yaw and pitch are in degrees.
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub sensitivity: f32,
    pub zoom_step: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let start = Vec3::from_array(config.position);
        let distance = start.length().max(MIN_DISTANCE);
        let dir = start / distance;
        Self {
            yaw: dir.x.atan2(dir.z).to_degrees(),
            pitch: dir.y.clamp(-1.0, 1.0).asin().to_degrees(),
            distance,
            sensitivity: config.orbit_sensitivity,
            zoom_step: config.zoom_step,
            fov: config.fov_degrees,
            near: config.near_clip,
            far: config.far_clip,
        }
    }

    pub fn orbit(&mut self, mouse_dx: f32, mouse_dy: f32) {
        self.yaw -= mouse_dx * self.sensitivity;
        self.pitch += mouse_dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-89.0, 89.0);
    }

    /// Positive `steps` moves closer.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance - steps * self.zoom_step).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn eye(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos()) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Camera-to-world rotation: columns are the camera's right, up and back axes.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.view_matrix()).transpose()
    }

    pub fn frame_uniforms(&self, aspect: f32) -> FrameUniforms {
        FrameUniforms {
            eye: self.eye(),
            view: self.view_matrix(),
            projection: self.projection_matrix(aspect),
            camera_rotation: self.rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_at_configured_position() {
        let camera = Camera::new(&CameraConfig::default());
        assert!(camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 2.7), 1e-5));
        assert_abs_diff_eq!(camera.distance, 2.7);
    }

    #[test]
    fn rotation_faces_sprites_at_the_eye() {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.orbit(120.0, -40.0);
        let rot = camera.rotation();
        let back = rot * Vec3::Z;
        assert!(back.abs_diff_eq(camera.eye().normalize(), 1e-5));
        let right = rot * Vec3::X;
        assert_abs_diff_eq!(right.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_and_zoom_are_clamped() {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.zoom(1_000.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-1_000.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }
}
