use std::path::{Path, PathBuf};

use crate::anim::Ease;
use crate::scene::geometry::TorusKnotParams;
use crate::scene::material::Color;

pub const CONFIG_ENV: &str = "KNOT3D_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Torus Knot".to_string(),
            width: 1600,
            height: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialConfig {
    pub color: Color,
    pub wireframe_color: Color,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: Color::from_rgb(217, 134, 26),
            wireframe_color: Color::from_rgb(77, 46, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: [25.0, 25.0, 3.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 1.0,
            max_distance: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinConfig {
    /// Radians added to the Y rotation per spin.
    pub amount: f32,
    /// Seconds.
    pub duration: f32,
    pub ease: Ease,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            amount: 10.0,
            duration: 1.0,
            ease: Ease::Power1Out,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub window: WindowConfig,
    pub torus_knot: TorusKnotParams,
    pub materials: MaterialConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub spin: SpinConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config path from the first CLI argument, falling back to `KNOT3D_CONFIG`.
    /// Without either, the built-in defaults are used.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
