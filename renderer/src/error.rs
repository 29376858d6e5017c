use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, FeatureLevel, ShaderModel};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why the swap chain reported the device as gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceLossReason {
    Removed,
    Reset,
}

impl std::fmt::Display for DeviceLossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceLossReason::Removed => f.write_str("device removed"),
            DeviceLossReason::Reset => f.write_str("device reset"),
        }
    }
}

/// Errors produced by the renderer core.
///
/// Everything except [`Error::DeviceLost`] is fatal: the caller is expected to
/// log it and terminate. Device loss is recovered inside
/// [`Renderer::render_frame`](crate::Renderer::render_frame) and
/// [`Renderer::resize`](crate::Renderer::resize) and never reaches the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no hardware adapter supports Direct3D feature level {0}")]
    NoSuitableAdapter(FeatureLevel),

    #[error("shader model {required} is required but the device only supports {available}")]
    UnsupportedShaderModel {
        required: ShaderModel,
        available: ShaderModel,
    },

    #[error("the CPU does not support the SIMD instructions required for vector math")]
    MissingSimdSupport,

    #[error("GPU device lost: {0}")]
    DeviceLost(DeviceLossReason),

    #[error("the GPU context could not be rebuilt after a device loss")]
    DeviceUnavailable,

    #[error("{call} failed with HRESULT {code:#010X}: {message}")]
    Api {
        call: &'static str,
        code: i32,
        message: String,
    },

    #[error("failed to read shader binary `{}`", path.display())]
    Shader {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload layout needs {required} bytes but the staging buffer maps {mapped}")]
    UploadLayout { required: u64, mapped: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Error::DeviceLost(_))
    }

    /// The raw HRESULT for API failures.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
