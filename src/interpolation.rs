//! Quaternion interpolation: normalised LERP and shortest-path SLERP.
//!
//! Both functions take unit quaternions and a progress value `t` in `[0, 1]`
//! and return a unit quaternion.
//!
//! | Function  | Path                        | Angular velocity |
//! |-----------|-----------------------------|------------------|
//! | [`lerp`]  | straight chord, renormalised | uneven           |
//! | [`slerp`] | great-circle arc             | constant         |
//!
//! glam's own `Quat::lerp`/`Quat::slerp` flip signs internally; these versions
//! spell the steps out so the demo can show the difference between the two.

use glam::{Quat, Vec4};
use serde::{Deserialize, Serialize};

/// Above this dot product SLERP falls back to LERP (the arc is too short
/// for `acos`/`sin` to be numerically stable).
pub const SLERP_LERP_THRESHOLD: f32 = 0.9995;

/// Component-wise linear interpolation followed by renormalisation.
///
/// No sign correction is applied, so `a` and `-a` interpolate through the
/// origin. At that single degenerate point (zero-length result) `a` is
/// returned.
pub fn lerp(a: Quat, b: Quat, t: f32) -> Quat {
    let start = Vec4::from(a);
    let end = Vec4::from(b);
    let raw = start + (end - start) * t;

    if raw.length_squared() <= f32::EPSILON {
        return a;
    }
    Quat::from_vec4(raw.normalize())
}

/// Spherical linear interpolation along the shorter arc.
///
/// When `a · b < 0`, `b` is negated first: `b` and `-b` are the same rotation,
/// and the negated one is the nearer of the two on the 4D sphere. The result
/// at `t = 1` is therefore `-b` in that case.
pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
    let mut end = b;
    let mut dot = a.dot(b);
    if dot < 0.0 {
        end = -end;
        dot = -dot;
    }

    if dot > SLERP_LERP_THRESHOLD {
        return lerp(a, end, t);
    }

    let dot = dot.clamp(-1.0, 1.0);
    let theta_0 = dot.acos();
    let theta = theta_0 * t;

    let start = Vec4::from(a);
    let ortho = (Vec4::from(end) - start * dot).normalize();
    Quat::from_vec4(start * theta.cos() + ortho * theta.sin())
}

/// Whether two unit quaternions describe the same rotation (`q` or `-q`).
pub fn same_rotation(a: Quat, b: Quat, tolerance: f32) -> bool {
    a.dot(b).abs() >= 1.0 - tolerance
}

/// Which interpolation an animation uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Lerp,
    Slerp,
}

impl Interpolation {
    pub fn apply(self, a: Quat, b: Quat, t: f32) -> Quat {
        match self {
            Interpolation::Lerp => lerp(a, b, t),
            Interpolation::Slerp => slerp(a, b, t),
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Interpolation::Lerp => Interpolation::Slerp,
            Interpolation::Slerp => Interpolation::Lerp,
        }
    }

    pub fn is_slerp(self) -> bool {
        self == Interpolation::Slerp
    }

    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Lerp => "lerp",
            Interpolation::Slerp => "slerp",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    const TOLERANCE: f32 = 1e-4;

    fn unit_quat() -> impl Strategy<Value = Quat> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
            .prop_map(|(x, y, z, w)| Vec4::new(x, y, z, w))
            .prop_filter("needs a direction", |v| v.length() > 0.1)
            .prop_map(|v| Quat::from_vec4(v.normalize()))
    }

    #[test]
    fn lerp_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(FRAC_PI_2);
        assert!(lerp(a, b, 0.0).abs_diff_eq(a, TOLERANCE));
        assert!(lerp(a, b, 1.0).abs_diff_eq(b, TOLERANCE));
    }

    #[test]
    fn lerp_midpoint_is_renormalised() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_z(FRAC_PI_2);
        let mid = lerp(a, b, 0.5);
        assert_relative_eq!(mid.length(), 1.0, epsilon = TOLERANCE);
        // For two endpoints the chord midpoint lies on the bisecting arc.
        assert!(mid.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2 / 2.0), TOLERANCE));
    }

    #[test]
    fn lerp_through_origin_returns_start() {
        let a = Quat::from_rotation_x(0.3);
        assert_eq!(lerp(a, -a, 0.5), a);
    }

    #[test]
    fn slerp_midpoint_halves_the_angle() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_z(FRAC_PI_2);
        let mid = slerp(a, b, 0.5);
        let (axis, angle) = mid.to_axis_angle();
        assert_relative_eq!(angle, FRAC_PI_2 / 2.0, epsilon = TOLERANCE);
        assert!(axis.abs_diff_eq(Vec3::Z, TOLERANCE));
    }

    #[test]
    fn slerp_has_constant_angular_velocity() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(2.0);
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            let q = slerp(a, b, t);
            assert_relative_eq!(a.angle_between(q), 2.0 * t, epsilon = 1e-3);
        }
    }

    #[test]
    fn slerp_takes_the_short_way_round() {
        let a = Quat::IDENTITY;
        let b = -Quat::from_rotation_x(0.5);
        assert!(a.dot(b) < 0.0);

        let end = slerp(a, b, 1.0);
        assert!(end.abs_diff_eq(-b, TOLERANCE));
        let mid = slerp(a, b, 0.5);
        assert!(same_rotation(mid, Quat::from_rotation_x(0.25), TOLERANCE));
    }

    #[test]
    fn slerp_of_nearly_equal_inputs_uses_lerp() {
        let a = Quat::from_rotation_y(0.1);
        let b = Quat::from_rotation_y(0.11);
        assert!(a.dot(b) > SLERP_LERP_THRESHOLD);
        assert_eq!(slerp(a, b, 0.3), lerp(a, b, 0.3));
    }

    #[test]
    fn interpolation_toggles_and_dispatches() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_x(2.5);
        assert_eq!(Interpolation::default(), Interpolation::Lerp);
        assert_eq!(Interpolation::Lerp.toggled(), Interpolation::Slerp);
        assert_eq!(Interpolation::Slerp.toggled(), Interpolation::Lerp);
        assert_eq!(Interpolation::Lerp.apply(a, b, 0.25), lerp(a, b, 0.25));
        assert_eq!(Interpolation::Slerp.apply(a, b, 0.25), slerp(a, b, 0.25));
        assert_eq!(Interpolation::Slerp.to_string(), "slerp");
    }

    #[test]
    fn interpolation_serializes_lowercase() {
        let json = serde_json::to_string(&Interpolation::Slerp).unwrap();
        assert_eq!(json, "\"slerp\"");
        let parsed: Interpolation = serde_json::from_str("\"lerp\"").unwrap();
        assert_eq!(parsed, Interpolation::Lerp);
    }

    proptest! {
        #[test]
        fn lerp_of_identical_inputs_is_identity(a in unit_quat(), t in 0.0f32..=1.0) {
            prop_assert!(lerp(a, a, t).abs_diff_eq(a, TOLERANCE));
        }

        #[test]
        fn slerp_stays_on_the_unit_sphere(a in unit_quat(), b in unit_quat(), t in 0.0f32..=1.0) {
            prop_assert!((slerp(a, b, t).length() - 1.0).abs() < TOLERANCE);
        }

        #[test]
        fn slerp_hits_both_endpoints(a in unit_quat(), b in unit_quat()) {
            prop_assert!(slerp(a, b, 0.0).abs_diff_eq(a, TOLERANCE));
            let end = slerp(a, b, 1.0);
            prop_assert!(same_rotation(end, b, TOLERANCE));
            if a.dot(b) >= 0.0 {
                prop_assert!(end.abs_diff_eq(b, 1e-3));
            }
        }

        #[test]
        fn lerp_stays_on_the_unit_sphere(a in unit_quat(), b in unit_quat(), t in 0.0f32..=1.0) {
            let q = lerp(a, b, t);
            prop_assert!((q.length() - 1.0).abs() < TOLERANCE);
        }
    }
}
