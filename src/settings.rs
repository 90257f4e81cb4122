use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::input::key_code_for;
use crate::interpolation::Interpolation;
use crate::orientation_table::{NamedOrientation, OrientationTable, default_entries};
use crate::sphere_camera::SphereCamera;

pub const CONFY_APP_NAME: &str = "orient-lab";
const CONFY_CONFIG_NAME: &str = "settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "orient-lab".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub duration_secs: f32,
    pub interpolation: Interpolation,
    /// Angle of one free-rotation key press.
    pub free_rotation_step_deg: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            interpolation: Interpolation::Lerp,
            free_rotation_step_deg: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub target: [f32; 3],
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub radius: f32,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let sphere = SphereCamera::default();
        Self {
            target: sphere.target.to_array(),
            azimuth_deg: sphere.azimuth_deg,
            elevation_deg: sphere.elevation_deg,
            radius: sphere.radius,
            fov_deg: sphere.fov.to_degrees(),
            near: sphere.near,
            far: sphere.far,
        }
    }
}

/// One table row as written in a settings file. `wxyz` is scalar-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationEntry {
    pub name: String,
    pub key: char,
    pub wxyz: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub animation: AnimationSettings,
    pub camera: CameraSettings,
    pub orientations: Vec<OrientationEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        let orientations = default_entries()
            .into_iter()
            .map(|entry| {
                let q = entry.rotation;
                OrientationEntry {
                    name: entry.name,
                    key: entry.key,
                    wxyz: [q.w, q.x, q.y, q.z],
                }
            })
            .collect();

        Self {
            window: WindowSettings::default(),
            animation: AnimationSettings::default(),
            camera: CameraSettings::default(),
            orientations,
        }
    }
}

impl Settings {
    /// Load from the per-user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Ok(confy::load(CONFY_APP_NAME, CONFY_CONFIG_NAME)?)
    }

    pub fn store(&self) -> Result<()> {
        confy::store(CONFY_APP_NAME, CONFY_CONFIG_NAME, self)?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate the configured orientations and build the table.
    pub fn orientation_table(&self) -> Result<OrientationTable> {
        if let Some(entry) = self
            .orientations
            .iter()
            .find(|entry| key_code_for(entry.key).is_none())
        {
            return Err(Error::UnmappedKey { key: entry.key });
        }

        let entries = self
            .orientations
            .iter()
            .map(|entry| NamedOrientation::from_wxyz(entry.name.clone(), entry.key, entry.wxyz))
            .collect();
        OrientationTable::new(entries)
    }

    pub fn animation_duration(&self) -> Result<Duration> {
        let secs = self.animation.duration_secs;
        Duration::try_from_secs_f32(secs).map_err(|_| Error::InvalidDuration(secs))
    }

    /// Build the orbit camera, rejecting a projection that cannot be drawn.
    pub fn sphere_camera(&self) -> Result<SphereCamera> {
        let camera = &self.camera;
        let finite = camera.target.iter().all(|v| v.is_finite())
            && [camera.azimuth_deg, camera.elevation_deg, camera.radius]
                .iter()
                .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidCamera(
                "target, angles and radius must be finite".to_string(),
            ));
        }
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err(Error::InvalidCamera(format!(
                "fov must be between 0 and 180 degrees, got {}",
                camera.fov_deg
            )));
        }
        if !(camera.near > 0.0 && camera.near.is_finite()) {
            return Err(Error::InvalidCamera(format!(
                "near plane must be positive, got {}",
                camera.near
            )));
        }
        if !(camera.far > camera.near && camera.far.is_finite()) {
            return Err(Error::InvalidCamera(format!(
                "far plane must lie beyond near ({}), got {}",
                camera.near, camera.far
            )));
        }

        Ok(SphereCamera::new()
            .target(camera.target)
            .azimuth(camera.azimuth_deg)
            .elevation(camera.elevation_deg)
            .radius(camera.radius)
            .fov(camera.fov_deg)
            .clip(camera.near, camera.far))
    }
}
