//! Adapter selection and logical device creation.

use log::{debug, info, warn};

use crate::backend::{Adapter, AdapterInfo, Backend, Device, Factory, MessageSeverity};
use crate::config::RendererConfig;
use crate::error::{Error, Result};

/// Severities the validation layer breaks on when the debug layer is enabled.
pub const BREAK_ON_SEVERITIES: [MessageSeverity; 3] = [
    MessageSeverity::Warning,
    MessageSeverity::Error,
    MessageSeverity::Corruption,
];

/// A freshly created device together with the factory and adapter it came from.
pub struct DeviceBundle<B: Backend> {
    pub adapter: AdapterInfo,
    pub device: B::Device,
    pub factory: B::Factory,
}

pub fn create_device<B: Backend>(backend: &B, config: &RendererConfig) -> Result<DeviceBundle<B>> {
    if config.debug_layer {
        backend.enable_debug_layer(&BREAK_ON_SEVERITIES)?;
    }

    let factory = backend.create_factory(config.debug_layer)?;

    let (adapter, device) = if config.use_warp_device {
        let warp = factory.warp_adapter()?;
        let device = warp.create_device(config.feature_level)?;
        (warp.info()?, device)
    } else {
        select_hardware_adapter::<B>(&factory, config)?
    };
    info!("picked {}", adapter.description);

    if config.debug_layer {
        device.configure_info_queue(&BREAK_ON_SEVERITIES)?;
    }

    let available = device.highest_shader_model(config.shader_model)?;
    if available < config.shader_model {
        return Err(Error::UnsupportedShaderModel {
            required: config.shader_model,
            available,
        });
    }

    if !backend.supports_simd_math() {
        return Err(Error::MissingSimdSupport);
    }

    Ok(DeviceBundle {
        adapter,
        device,
        factory,
    })
}

/// Picks the first non-software adapter that can create a device at the
/// configured feature level.
fn select_hardware_adapter<B: Backend>(
    factory: &B::Factory,
    config: &RendererConfig,
) -> Result<(AdapterInfo, B::Device)> {
    for adapter in factory.adapters()? {
        let info = adapter.info()?;
        if info.software {
            // Don't select the Basic Render Driver adapter.
            debug!("skipping software adapter {}", info.description);
            continue;
        }

        match adapter.create_device(config.feature_level) {
            Ok(device) => return Ok((info, device)),
            Err(e) => warn!("{} cannot create a device: {e}", info.description),
        }
    }

    Err(Error::NoSuitableAdapter(config.feature_level))
}
