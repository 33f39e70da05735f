use anyhow::{Context, Result, bail};
use flyview_common::ClearColor;
use flyview_render::CameraSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewer settings. Every field is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub camera_origin: [f32; 3],
    pub camera_target: [f32; 3],
    pub fov_degrees: f32,
    pub camera: CameraSettings,
    /// Radians per second while rotation is on.
    pub spin_speed: f32,
    pub clear_color: ClearColor,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            camera_origin: [0.0, 0.0, -50.0],
            camera_target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            camera: CameraSettings::default(),
            spin_speed: 1.0,
            clear_color: ClearColor::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply command-line overrides.
    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        if let Some(width) = width {
            self.width = width;
        }
        if let Some(height) = height {
            self.height = height;
        }
        self
    }

    /// Reject values the camera and window cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size {}x{} must be non-zero", self.width, self.height);
        }
        self.camera.validate().context("invalid camera settings")?;
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
