//! A stack of model matrices for building hierarchical transforms.
//!
//! Every operation post-multiplies the top matrix, so transforms read in the
//! order they are applied to the *parent* frame: translate, then rotate, then
//! scale yields `T * R * S`.
//!
//! ```
//! use glam::{Mat4, Vec3};
//! use orient_lab::MatrixStack;
//!
//! let mut stack = MatrixStack::new();
//! stack.translate(Vec3::new(0.0, 0.0, -5.0));
//! stack.with_pushed(|stack| {
//!     stack.rotate_y(90.0);
//!     stack.scale(Vec3::splat(2.0));
//!     // draw a child with stack.top()
//! });
//! assert_eq!(stack.top(), Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
//! ```

use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Debug)]
pub struct MatrixStack {
    // Never empty: the base matrix cannot be popped.
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    /// A stack holding only the identity matrix.
    pub fn new() -> Self {
        Self::with_base(Mat4::IDENTITY)
    }

    pub fn with_base(base: Mat4) -> Self {
        Self { stack: vec![base] }
    }

    pub fn top(&self) -> Mat4 {
        self.stack[self.stack.len() - 1]
    }

    /// Number of matrices on the stack (at least 1).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicate the top matrix.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Discard the top matrix and return it.
    ///
    /// The base matrix stays; popping it returns `None`.
    pub fn pop(&mut self) -> Option<Mat4> {
        if self.stack.len() == 1 {
            log::warn!("matrix stack underflow: pop with only the base matrix left");
            return None;
        }
        self.stack.pop()
    }

    /// Run `f` between a push and a matching pop.
    pub fn with_pushed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push();
        let result = f(self);
        self.stack.truncate(depth);
        result
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.apply(Mat4::from_rotation_x(degrees.to_radians()));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.apply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.apply(Mat4::from_rotation_z(degrees.to_radians()));
    }

    /// Rotate about an arbitrary axis. A zero axis does nothing.
    pub fn rotate(&mut self, axis: Vec3, degrees: f32) {
        let axis = axis.normalize_or_zero();
        if axis != Vec3::ZERO {
            self.apply(Mat4::from_axis_angle(axis, degrees.to_radians()));
        }
    }

    pub fn rotate_quat(&mut self, rotation: Quat) {
        self.apply(Mat4::from_quat(rotation));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.apply(Mat4::from_scale(factors));
    }

    /// Post-multiply the top matrix by `matrix`.
    pub fn apply(&mut self, matrix: Mat4) {
        *self.top_mut() *= matrix;
    }

    /// Replace the top matrix.
    pub fn set(&mut self, matrix: Mat4) {
        *self.top_mut() = matrix;
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_identity() {
        let stack = MatrixStack::new();
        assert_eq!(stack.top(), Mat4::IDENTITY);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn push_duplicates_and_pop_restores() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::X);
        let parent = stack.top();

        stack.push();
        assert_eq!(stack.top(), parent);
        stack.scale(Vec3::splat(3.0));
        assert_ne!(stack.top(), parent);

        let child = stack.pop();
        assert!(child.is_some());
        assert_eq!(stack.top(), parent);
    }

    #[test]
    fn base_matrix_cannot_be_popped() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::Y);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::from_translation(Vec3::Y));
    }

    #[test]
    fn operations_post_multiply() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::new(0.0, 0.0, -200.0));
        stack.rotate_x(-90.0);
        stack.scale(Vec3::splat(20.0));

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -200.0))
            * Mat4::from_rotation_x((-90f32).to_radians())
            * Mat4::from_scale(Vec3::splat(20.0));
        assert!(stack.top().abs_diff_eq(expected, 1e-4));

        // Model +Z is scaled, pitched onto +Y, then pushed back.
        let p = stack.top().transform_point3(Vec3::Z);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 20.0, -200.0), 1e-3));
    }

    #[test]
    fn rotate_matches_axis_specific_helpers() {
        let mut a = MatrixStack::new();
        a.rotate_z(30.0);
        let mut b = MatrixStack::new();
        b.rotate(Vec3::new(0.0, 0.0, 5.0), 30.0);
        let mut c = MatrixStack::new();
        c.rotate_quat(Quat::from_rotation_z(30f32.to_radians()));

        assert!(a.top().abs_diff_eq(b.top(), 1e-6));
        assert!(a.top().abs_diff_eq(c.top(), 1e-6));
    }

    #[test]
    fn with_pushed_restores_depth_even_after_extra_pushes() {
        let mut stack = MatrixStack::new();
        stack.rotate_y(45.0);
        let before = stack.top();

        let depth_inside = stack.with_pushed(|stack| {
            stack.translate(Vec3::ONE);
            stack.push();
            stack.depth()
        });

        assert_eq!(depth_inside, 3);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn clones_are_independent() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::X);
        let mut copy = stack.clone();
        copy.translate(Vec3::X);
        assert_eq!(stack.top(), Mat4::from_translation(Vec3::X));
        assert_eq!(copy.top(), Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn set_replaces_top() {
        let mut stack = MatrixStack::new();
        stack.push();
        stack.set(Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(stack.top(), Mat4::from_scale(Vec3::splat(2.0)));
        stack.pop();
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }
}
