use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::camera::Camera;
use crate::input::Input;

/// Lowest the camera may sit, measured as degrees below the pole offset.
pub const MIN_ELEVATION: f32 = -78.75;
/// Highest elevation; keeps the camera just above the horizon.
pub const MAX_ELEVATION: f32 = -1.0;
pub const MIN_RADIUS: f32 = 5.0;

const ANGLE_STEP: f32 = 11.25;
const RADIUS_STEP: f32 = 5.0;
const TARGET_STEP: f32 = 4.0;
/// Holding shift divides every step by this.
const FINE_DIVISOR: f32 = 10.0;

/// A camera that orbits a target point on a sphere, driven by the keyboard.
///
/// The position is stored in spherical coordinates relative to the target:
/// - `azimuth_deg` (phi) spins the camera around the vertical axis,
/// - `elevation_deg` is offset by 90° to get the polar angle theta, so
///   `-90` is straight overhead and values near `0` approach the horizon,
/// - `radius` is the distance from the target.
///
/// # Controls
///
/// | Keys              | Effect                    |
/// |-------------------|---------------------------|
/// | J / L             | azimuth - / +             |
/// | I / K             | elevation - / +           |
/// | U / O             | radius + / -              |
/// | ← / →             | target x - / +            |
/// | ↑ / ↓             | target z - / +            |
/// | PageUp / PageDown | target y + / -            |
///
/// Hold Shift for fine steps.
///
/// # Example
/// ```ignore
/// let mut sphere = SphereCamera::new();
///
/// // In frame loop:
/// sphere.update(&input);
/// let camera = sphere.camera();
/// ```
#[derive(Clone, Debug)]
pub struct SphereCamera {
    /// Point the camera looks at.
    pub target: Vec3,
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub radius: f32,
    /// Field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SphereCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 0.4, 0.0),
            azimuth_deg: 67.5,
            elevation_deg: -46.0,
            radius: 150.0,
            fov: 45f32.to_radians(),
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl SphereCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point to orbit around.
    pub fn target(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self.clamp();
        self
    }

    pub fn azimuth(mut self, degrees: f32) -> Self {
        self.azimuth_deg = degrees;
        self
    }

    pub fn elevation(mut self, degrees: f32) -> Self {
        self.elevation_deg = degrees;
        self.clamp();
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self.clamp();
        self
    }

    /// Set the field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Apply this frame's key presses.
    pub fn update(&mut self, input: &Input) {
        let scale = if input.shift_down() {
            1.0 / FINE_DIVISOR
        } else {
            1.0
        };
        let step = |minus: KeyCode, plus: KeyCode, amount: f32| {
            let mut delta = 0.0;
            if input.key_pressed(minus) {
                delta -= amount * scale;
            }
            if input.key_pressed(plus) {
                delta += amount * scale;
            }
            delta
        };

        self.azimuth_deg += step(KeyCode::KeyJ, KeyCode::KeyL, ANGLE_STEP);
        self.elevation_deg += step(KeyCode::KeyI, KeyCode::KeyK, ANGLE_STEP);
        self.radius += step(KeyCode::KeyO, KeyCode::KeyU, RADIUS_STEP);
        self.target.x += step(KeyCode::ArrowLeft, KeyCode::ArrowRight, TARGET_STEP);
        self.target.z += step(KeyCode::ArrowUp, KeyCode::ArrowDown, TARGET_STEP);
        self.target.y += step(KeyCode::PageDown, KeyCode::PageUp, TARGET_STEP);

        self.clamp();
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let phi = self.azimuth_deg.to_radians();
        let theta = (self.elevation_deg + 90.0).to_radians();

        let dir_to_camera = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        dir_to_camera * self.radius + self.target
    }

    /// Get the current camera state.
    pub fn camera(&self) -> Camera {
        Camera {
            position: self.position(),
            target: self.target,
            up: Vec3::Y,
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }

    fn clamp(&mut self) {
        self.elevation_deg = self.elevation_deg.clamp(MIN_ELEVATION, MAX_ELEVATION);
        self.radius = self.radius.max(MIN_RADIUS);
        self.target.y = self.target.y.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_is_radius_away_from_target() {
        let sphere = SphereCamera::new();
        let distance = sphere.position().distance(sphere.target);
        assert_relative_eq!(distance, sphere.radius, epsilon = 1e-3);
    }

    #[test]
    fn spherical_to_cartesian() {
        // phi = 0 keeps the camera in the XY plane, just above the horizon.
        let sphere = SphereCamera::new()
            .target(Vec3::ZERO)
            .azimuth(0.0)
            .elevation(-1.0)
            .radius(10.0);
        let theta = 89f32.to_radians();
        let expected = Vec3::new(theta.sin() * 10.0, theta.cos() * 10.0, 0.0);
        assert!(sphere.position().abs_diff_eq(expected, 1e-4));

        // phi = 90° swings onto +Z.
        let sphere = sphere.azimuth(90.0);
        let expected = Vec3::new(0.0, theta.cos() * 10.0, theta.sin() * 10.0);
        assert!(sphere.position().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn builder_clamps() {
        let sphere = SphereCamera::new()
            .elevation(10.0)
            .radius(1.0)
            .target(Vec3::new(3.0, -2.0, 1.0));
        assert_eq!(sphere.elevation_deg, MAX_ELEVATION);
        assert_eq!(sphere.radius, MIN_RADIUS);
        assert_eq!(sphere.target, Vec3::new(3.0, 0.0, 1.0));

        let sphere = sphere.elevation(-120.0);
        assert_eq!(sphere.elevation_deg, MIN_ELEVATION);
    }

    #[test]
    fn keys_step_coarse_and_fine() {
        let mut sphere = SphereCamera::new().azimuth(0.0).radius(100.0);
        let mut input = Input::new();

        input.handle_key(KeyCode::KeyL, true);
        input.handle_key(KeyCode::KeyU, true);
        sphere.update(&input);
        assert_relative_eq!(sphere.azimuth_deg, 11.25);
        assert_relative_eq!(sphere.radius, 105.0);

        input.begin_frame();
        input.handle_key(KeyCode::KeyL, false);
        input.handle_key(KeyCode::ShiftLeft, true);
        input.handle_key(KeyCode::KeyJ, true);
        input.handle_key(KeyCode::PageUp, true);
        sphere.update(&input);
        assert_relative_eq!(sphere.azimuth_deg, 10.125, epsilon = 1e-5);
        assert_relative_eq!(sphere.target.y, 0.4 + 0.4, epsilon = 1e-5);
    }

    #[test]
    fn held_keys_do_not_repeat() {
        let mut sphere = SphereCamera::new().azimuth(0.0);
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyL, true);
        sphere.update(&input);
        input.begin_frame();
        sphere.update(&input);
        assert_relative_eq!(sphere.azimuth_deg, 11.25);
    }

    #[test]
    fn camera_looks_at_target() {
        let sphere = SphereCamera::new();
        let camera = sphere.camera();
        assert_eq!(camera.target, sphere.target);
        let view = camera.view_matrix();
        let target_in_view = view.transform_point3(sphere.target);
        assert!(target_in_view.x.abs() < 1e-3);
        assert!(target_in_view.y.abs() < 1e-3);
        assert!(target_in_view.z < 0.0);
    }
}
