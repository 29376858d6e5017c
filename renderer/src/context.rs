//! Everything that lives on one logical device. Rebuilt wholesale after a
//! device loss.

use log::{debug, info};

use crate::backend::{AdapterInfo, Backend, QueueKind, Resource};
use crate::channel::CommandChannel;
use crate::config::RendererConfig;
use crate::device::{create_device, DeviceBundle};
use crate::error::Result;
use crate::geometry::{CUBE_INDICES, CUBE_VERTICES};
use crate::pipeline::{create_pipeline, ShaderBinaries};
use crate::targets::{Extent, TargetSet};
use crate::upload::upload_to_device_local;

/// Device-local cube buffers and the pipeline that draws them.
pub struct StaticScene<B: Backend> {
    pub vertex_buffer: B::Resource,
    pub index_buffer: B::Resource,
    pub pipeline: B::Pipeline,
}

pub struct GpuContext<B: Backend> {
    // Fields drop in declaration order: users of the device before the device.
    pub(crate) scene: StaticScene<B>,
    pub(crate) targets: TargetSet<B>,
    pub(crate) copy: CommandChannel<B>,
    pub(crate) direct: CommandChannel<B>,
    pub(crate) device: B::Device,
    pub(crate) factory: B::Factory,
    pub(crate) adapter: AdapterInfo,
}

impl<B: Backend> GpuContext<B> {
    pub fn create(
        backend: &B,
        config: &RendererConfig,
        window: B::Window,
        extent: Extent,
        shaders: &ShaderBinaries,
    ) -> Result<Self> {
        let DeviceBundle {
            adapter,
            device,
            factory,
        } = create_device(backend, config)?;

        let slots = config.swap_buffer_count;
        let direct = CommandChannel::new(backend, &device, QueueKind::Direct, slots)?;
        let mut copy = CommandChannel::new(backend, &device, QueueKind::Copy, slots)?;

        let mut targets = TargetSet::new(&device, slots)?;
        targets.create_or_resize(&device, &factory, direct.queue(), window, extent)?;

        let scene = load_static_scene(&device, &mut copy, shaders)?;
        info!(
            "GPU context ready on {}: {}x{}, {slots} back buffers",
            adapter.description, extent.width, extent.height
        );

        Ok(Self {
            scene,
            targets,
            copy,
            direct,
            device,
            factory,
            adapter,
        })
    }

    /// Blocks until both queues are idle.
    pub fn drain(&mut self) -> Result<()> {
        self.direct.flush()?;
        self.copy.flush()
    }

    pub fn resize(&mut self, window: B::Window, extent: Extent) -> Result<()> {
        self.targets
            .create_or_resize(&self.device, &self.factory, self.direct.queue(), window, extent)
    }

    pub fn adapter(&self) -> &AdapterInfo {
        &self.adapter
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn direct(&self) -> &CommandChannel<B> {
        &self.direct
    }

    pub fn copy(&self) -> &CommandChannel<B> {
        &self.copy
    }

    pub fn targets(&self) -> &TargetSet<B> {
        &self.targets
    }

    pub fn scene(&self) -> &StaticScene<B> {
        &self.scene
    }
}

fn load_static_scene<B: Backend>(
    device: &B::Device,
    copy: &mut CommandChannel<B>,
    shaders: &ShaderBinaries,
) -> Result<StaticScene<B>> {
    copy.begin_recording(0, None)?;
    let vertices = upload_to_device_local(device, copy, bytemuck::cast_slice(CUBE_VERTICES.as_slice()))?;
    let indices = upload_to_device_local(device, copy, bytemuck::cast_slice(CUBE_INDICES.as_slice()))?;
    copy.submit_and_signal(0, copy.next_fence_value())?;
    copy.wait_for_slot(0)?;
    debug!("static geometry uploaded");

    // The copy has completed, so the staging buffers can go.
    let vertex_buffer = vertices.buffer;
    vertex_buffer.set_name("Vertex buffer");
    let index_buffer = indices.buffer;
    index_buffer.set_name("Index buffer");

    let pipeline = create_pipeline::<B>(device, shaders)?;

    Ok(StaticScene {
        vertex_buffer,
        index_buffer,
        pipeline,
    })
}
