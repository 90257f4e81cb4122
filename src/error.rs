//! Error type shared by the whole crate.

use thiserror::Error;

/// Everything that can go wrong while configuring or running the demo.
///
/// The orientation core itself only reports configuration problems
/// (bad tables, bad durations, out-of-range indices); the remaining
/// variants wrap failures from the windowing and GPU stack.
#[derive(Debug, Error)]
pub enum Error {
    #[error("orientation table is empty")]
    EmptyTable,

    #[error("orientation '{name}' is not a valid rotation (zero length or non-finite)")]
    InvalidOrientation { name: String },

    #[error("key '{key}' is bound to more than one orientation")]
    DuplicateKey { key: char },

    #[error("key '{key}' has no keyboard mapping")]
    UnmappedKey { key: char },

    #[error("orientation index {index} out of range (table has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("timer queried before it was started")]
    TimerNotStarted,

    #[error("animation duration must be finite and non-negative, got {0}")]
    InvalidDuration(f32),

    #[error("invalid camera settings: {0}")]
    InvalidCamera(String),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load or store settings: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Os(#[from] winit::error::OsError),

    #[error(transparent)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
