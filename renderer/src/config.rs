//! Renderer configuration.
//!
//! Every field has a default, so an empty (or missing) `renderer.toml` yields
//! the stock setup: double buffering, feature level 11_0, shader model 6.0 and
//! vsync on every vertical blank.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Largest swap chain DXGI will create.
pub const MAX_SWAP_BUFFER_COUNT: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Minimum Direct3D feature level a device must be created at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum FeatureLevel {
    #[serde(rename = "11_0")]
    Level11_0,
    #[serde(rename = "11_1")]
    Level11_1,
    #[serde(rename = "12_0")]
    Level12_0,
    #[serde(rename = "12_1")]
    Level12_1,
}

impl std::fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeatureLevel::Level11_0 => "11_0",
            FeatureLevel::Level11_1 => "11_1",
            FeatureLevel::Level12_0 => "12_0",
            FeatureLevel::Level12_1 => "12_1",
        };
        f.write_str(name)
    }
}

/// HLSL shader model, ordered by version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct ShaderModel {
    pub major: u8,
    pub minor: u8,
}

impl ShaderModel {
    pub const SM_5_1: ShaderModel = ShaderModel::new(5, 1);
    pub const SM_6_0: ShaderModel = ShaderModel::new(6, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Number of back buffers, and therefore the maximum number of frames in flight.
    pub swap_buffer_count: u32,
    pub feature_level: FeatureLevel,
    pub shader_model: ShaderModel,
    /// Enable the D3D12/DXGI debug layers and break on warnings, errors and corruption.
    pub debug_layer: bool,
    /// Use the WARP software rasterizer instead of a hardware adapter.
    pub use_warp_device: bool,
    pub vsync_interval: u32,
    pub clear_color: [f32; 4],
    pub vertex_shader: PathBuf,
    pub pixel_shader: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            swap_buffer_count: 2,
            feature_level: FeatureLevel::Level11_0,
            shader_model: ShaderModel::SM_6_0,
            debug_layer: cfg!(debug_assertions),
            use_warp_device: false,
            vsync_interval: 1,
            // MediumSeaGreen.
            clear_color: [0.235_294, 0.701_961, 0.443_137, 1.0],
            vertex_shader: PathBuf::from("shaders").join("VertexShader.cso"),
            pixel_shader: PathBuf::from("shaders").join("PixelShader.cso"),
        }
    }
}

impl RendererConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: RendererConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Loads `path` if it exists, falling back to the defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("loading renderer config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SWAP_BUFFER_COUNT).contains(&self.swap_buffer_count) {
            return Err(ConfigError::Invalid(format!(
                "swap_buffer_count must be between 2 and {MAX_SWAP_BUFFER_COUNT}, got {}",
                self.swap_buffer_count
            )));
        }

        if self.vsync_interval > 4 {
            return Err(ConfigError::Invalid(format!(
                "vsync_interval must be between 0 and 4, got {}",
                self.vsync_interval
            )));
        }

        Ok(())
    }
}
