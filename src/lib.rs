//! # orient-lab
//!
//! **Timed quaternion interpolation between preset orientations.**
//!
//! An [`Orientation`] sits at one entry of an [`OrientationTable`] until asked
//! to move to another, then blends there over a fixed duration with either
//! normalised linear interpolation ([`lerp`]) or spherical linear
//! interpolation ([`slerp`]). The interpolation mode can be switched while an
//! animation is running.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use orient_lab::{Interpolation, Orientation, OrientationTable};
//!
//! let mut orientation = Orientation::new(OrientationTable::default())
//!     .with_duration(Duration::from_secs(2))
//!     .with_interpolation(Interpolation::Slerp);
//!
//! let t0 = Instant::now();
//! orientation.animate_to_at(6, t0).unwrap();
//!
//! let halfway = orientation.orient_at(t0 + Duration::from_secs(1));
//! assert!(halfway.is_normalized());
//! ```
//!
//! The crate also ships the pieces of the interactive demo: a free-rotation
//! mode ([`FreeRotation`]), a [`MatrixStack`] for model transforms, a
//! keyboard-driven [`SphereCamera`], and a small wgpu renderer started with
//! [`run`].

mod animation;
mod app;
mod camera;
mod controls;
mod error;
mod free_rotation;
mod gpu;
mod input;
mod interpolation;
mod matrix_stack;
mod mesh;
mod mesh_pass;
mod orientation;
mod orientation_table;
pub mod settings;
mod sphere_camera;
mod timer;

pub use animation::{Animation, DEFAULT_ANIMATION_DURATION};
pub use app::run;
pub use camera::{Camera, look_at};
pub use controls::{Action, Controls, DemoMode};
pub use error::{Error, Result};
pub use free_rotation::{FreeRotation, MultiplyOrder};
pub use gpu::GpuContext;
pub use input::{Input, key_code_for};
pub use interpolation::{Interpolation, SLERP_LERP_THRESHOLD, lerp, same_rotation, slerp};
pub use matrix_stack::MatrixStack;
pub use mesh::{Mesh, MeshData, Vertex};
pub use mesh_pass::{DrawCall, MeshPass};
pub use orientation::Orientation;
pub use orientation_table::{NamedOrientation, OrientationTable};
pub use settings::Settings;
pub use sphere_camera::SphereCamera;
pub use timer::{Timer, TimerMode};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
