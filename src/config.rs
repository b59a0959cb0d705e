use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Scene configuration, loaded from an optional TOML file.
/// Every section falls back to the tuned defaults when absent.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub sprites: SpriteConfig,
    pub reflection: ReflectionConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Happy Birthday".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye position; the camera orbits the origin at this distance.
    pub position: [f32; 3],
    pub fov_degrees: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Degrees of orbit per pixel of mouse drag.
    pub orbit_sensitivity: f32,
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 2.7],
            fov_degrees: 60.0,
            near_clip: 0.05,
            far_clip: 100.0,
            orbit_sensitivity: 0.3,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    /// Multiplier on frame time before it reaches the slice ramp.
    pub time_scale: f32,
    /// Slice ramp frequency in Hz of scaled time.
    pub slice_frequency: f32,
    /// Peak height the slice and knife rise to.
    pub slice_lift: f32,
    /// Flame wobble frequency in Hz of real time.
    pub wobble_frequency: f32,
    pub wobble_amplitude: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_scale: 0.1,
            slice_frequency: 1.0,
            slice_lift: 1.0,
            // 0.1 rad per frame at 40 fps
            wobble_frequency: 4.0 / std::f32::consts::TAU,
            wobble_amplitude: 0.012,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpriteConfig {
    pub radius: f32,
    /// Blend weight between vertex color (0) and noise texture (1).
    pub texturing: f32,
    /// Radial attenuation width; must be positive.
    pub attenuation_width: f32,
    pub flame_count: usize,
    pub flame_spread: f32,
    pub sparkle_count: usize,
    pub sparkle_extent: f32,
    /// Seed for particle placement; `None` picks a fresh one each run.
    pub seed: Option<u64>,
    pub noise_size: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            texturing: 0.4,
            attenuation_width: 0.5,
            flame_count: 10,
            flame_spread: 0.05,
            sparkle_count: 100,
            sparkle_extent: 3.0,
            seed: None,
            noise_size: 512,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReflectionConfig {
    pub reflectivity: f32,
    pub knife_color: [f32; 3],
    pub knife_shininess: f32,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            reflectivity: 0.7,
            knife_color: [0.2, 0.4, 0.7],
            knife_shininess: 200.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssetConfig {
    pub directory: PathBuf,
    pub icing: String,
    pub chocolate_icing: String,
    pub sponge: String,
    pub chocolate_sponge: String,
    pub plate: String,
    pub paper: String,
    pub environment: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
            icing: "icing.jpg".to_string(),
            chocolate_icing: "icing2.jpg".to_string(),
            sponge: "spongeCake.jpg".to_string(),
            chocolate_sponge: "chocolateSponge.jpeg".to_string(),
            plate: "polkaDot.jpg".to_string(),
            paper: "paperTexture.jpg".to_string(),
            environment: "background.jpg".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.directory.join(file)
    }
}

impl SceneConfig {
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&src)
    }
}
