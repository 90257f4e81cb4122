use glam::{Mat4, Vec3, Vec4};

/// A simple perspective camera for 3D scenes.
///
/// Provides position, look target, up direction, and projection parameters.
/// [`SphereCamera`](crate::SphereCamera) produces one of these each frame.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 300.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45f32.to_radians(),
            near: 1.0,
            far: 600.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.target, self.up)
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

/// Build a right-handed view matrix looking from `eye` towards `target`.
///
/// The camera basis is assembled by hand: `right = look × up`,
/// `perp_up = right × look`, and the rotation's rows are
/// `(right, perp_up, -look)`. That rotation is applied after translating the
/// eye to the origin. `up` only needs to be non-parallel to the view
/// direction; it does not have to be perpendicular or unit length.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let look = (target - eye).normalize();
    let up = up.normalize();

    let right = look.cross(up).normalize();
    let perp_up = right.cross(look);

    let rotation = Mat4::from_cols(
        right.extend(0.0),
        perp_up.extend(0.0),
        (-look).extend(0.0),
        Vec4::W,
    )
    .transpose();
    let translation = Mat4::from_translation(-eye);

    rotation * translation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_matches_glam() {
        let cases = [
            (Vec3::new(0.0, 0.0, 300.0), Vec3::ZERO, Vec3::Y),
            (Vec3::new(10.0, 40.0, -25.0), Vec3::new(1.0, 0.4, 3.0), Vec3::Y),
            (Vec3::new(-3.0, 2.0, 1.0), Vec3::ZERO, Vec3::new(0.2, 3.0, 0.0)),
        ];
        for (eye, target, up) in cases {
            let ours = look_at(eye, target, up);
            let glam = Mat4::look_at_rh(eye, target, up.normalize());
            assert!(ours.abs_diff_eq(glam, 1e-4), "{eye} -> {target}");
        }
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let eye = Vec3::new(5.0, 5.0, 5.0);
        let view = look_at(eye, Vec3::ZERO, Vec3::Y);
        let target_in_view = view.transform_point3(Vec3::ZERO);
        let distance = eye.length();
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -distance), 1e-4));
    }

    #[test]
    fn builder_sets_fields() {
        let camera = Camera::new()
            .at(Vec3::new(1.0, 2.0, 3.0))
            .looking_at(Vec3::new(1.0, 2.0, 0.0))
            .with_fov(90.0)
            .with_clip(0.1, 50.0);

        assert_eq!(camera.forward(), Vec3::NEG_Z);
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!((camera.near, camera.far), (0.1, 50.0));
    }

    #[test]
    fn projection_maps_near_and_far_to_depth_range() {
        let camera = Camera::new().with_clip(1.0, 100.0);
        let proj = camera.projection_matrix(4.0 / 3.0);

        let near = proj.project_point3(Vec3::new(0.0, 0.0, -1.0));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!((near.z - 0.0).abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }
}
