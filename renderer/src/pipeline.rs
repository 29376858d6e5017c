//! Shader binaries and the graphics pipeline built from them.

use std::path::Path;

use log::debug;

use crate::backend::{Backend, Device, PipelineDesc};
use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::geometry::VERTEX_LAYOUT;
use crate::targets::{BACK_BUFFER_FORMAT, DEPTH_BUFFER_FORMAT};

/// One 4x4 matrix of 32-bit root constants for the vertex shader.
pub const ROOT_CONSTANT_COUNT: u32 = 16;

/// Compiled shader bytecode, read once at startup and kept for rebuilding the
/// pipeline after a device loss.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderBinaries {
    pub vertex: Vec<u8>,
    pub pixel: Vec<u8>,
}

impl ShaderBinaries {
    pub fn load(config: &RendererConfig) -> Result<Self> {
        Ok(Self {
            vertex: read_shader(&config.vertex_shader)?,
            pixel: read_shader(&config.pixel_shader)?,
        })
    }
}

fn read_shader(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|source| Error::Shader {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes of bytecode from {}", bytes.len(), path.display());
    Ok(bytes)
}

pub fn create_pipeline<B: Backend>(device: &B::Device, shaders: &ShaderBinaries) -> Result<B::Pipeline> {
    device.create_pipeline(&PipelineDesc {
        vertex_shader: &shaders.vertex,
        pixel_shader: &shaders.pixel,
        input_layout: &VERTEX_LAYOUT,
        render_target_format: BACK_BUFFER_FORMAT,
        depth_format: DEPTH_BUFFER_FORMAT,
        root_constants: ROOT_CONSTANT_COUNT,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("renderer-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_both_binaries() {
        let dir = scratch_dir("shaders");
        let config = RendererConfig {
            vertex_shader: dir.join("vs.cso"),
            pixel_shader: dir.join("ps.cso"),
            ..Default::default()
        };
        std::fs::write(&config.vertex_shader, [0x44, 0x58, 0x42, 0x43]).unwrap();
        std::fs::write(&config.pixel_shader, [1, 2, 3]).unwrap();

        let shaders = ShaderBinaries::load(&config).unwrap();

        assert_eq!(shaders.vertex, b"DXBC");
        assert_eq!(shaders.pixel, vec![1, 2, 3]);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_binary_names_its_path() {
        let dir = scratch_dir("missing");
        let config = RendererConfig {
            vertex_shader: dir.join("vs.cso"),
            pixel_shader: dir.join("absent.cso"),
            ..Default::default()
        };
        std::fs::write(&config.vertex_shader, [0]).unwrap();

        let error = ShaderBinaries::load(&config).unwrap_err();

        match &error {
            Error::Shader { path, source } => {
                assert_eq!(path, &config.pixel_shader);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected a shader error, got {other:?}"),
        }
        assert!(error.to_string().contains("absent.cso"));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
