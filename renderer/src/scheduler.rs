//! The frame loop: recording, submission, presentation and pacing over the
//! in-flight back buffers, plus recovery when the device goes away.

use log::{debug, error, info, trace, warn};

use crate::backend::{Backend, CommandList, ResourceState, ScissorRect, Viewport};
use crate::config::RendererConfig;
use crate::context::GpuContext;
use crate::error::{Error, Result};
use crate::pipeline::ShaderBinaries;
use crate::simulation::Simulation;
use crate::targets::Extent;

/// Where the current frame is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    Recording,
    Submitted,
    Presented,
}

pub struct Renderer<B: Backend> {
    context: Option<GpuContext<B>>,
    simulation: Option<Box<dyn Simulation>>,
    shaders: ShaderBinaries,
    config: RendererConfig,
    window: B::Window,
    extent: Extent,
    phase: FramePhase,
    backend: B,
}

impl<B: Backend> Renderer<B> {
    /// Reads the shader binaries named in `config` and builds the GPU context
    /// for `window`.
    pub fn initialize(
        backend: B,
        config: RendererConfig,
        window: B::Window,
        width: u32,
        height: u32,
        simulation: Option<Box<dyn Simulation>>,
    ) -> Result<Self> {
        config.validate()?;
        let shaders = ShaderBinaries::load(&config)?;
        Self::build(backend, config, shaders, window, width, height, simulation)
    }

    pub fn with_shaders(
        backend: B,
        config: RendererConfig,
        shaders: ShaderBinaries,
        window: B::Window,
        width: u32,
        height: u32,
        simulation: Option<Box<dyn Simulation>>,
    ) -> Result<Self> {
        config.validate()?;
        Self::build(backend, config, shaders, window, width, height, simulation)
    }

    fn build(
        backend: B,
        config: RendererConfig,
        shaders: ShaderBinaries,
        window: B::Window,
        width: u32,
        height: u32,
        simulation: Option<Box<dyn Simulation>>,
    ) -> Result<Self> {
        let extent = Extent::clamped(width, height);
        let context = GpuContext::create(&backend, &config, window, extent, &shaders)?;

        Ok(Self {
            context: Some(context),
            simulation,
            shaders,
            config,
            window,
            extent,
            phase: FramePhase::Idle,
            backend,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn context(&self) -> Option<&GpuContext<B>> {
        self.context.as_ref()
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Forwards to the simulation. Zero ticks is a no-op.
    pub fn advance_ticks(&mut self, ticks: u64) {
        if ticks == 0 {
            return;
        }
        if let Some(simulation) = &mut self.simulation {
            simulation.process_ticks(ticks);
        }
    }

    /// Drains the GPU and resizes the swap chain and depth buffer. Sizes are
    /// clamped to at least 1x1.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.extent = Extent::clamped(width, height);
        let window = self.window;
        let extent = self.extent;

        let context = self.context.as_mut().ok_or(Error::DeviceUnavailable)?;
        let resized = context.drain().and_then(|()| context.resize(window, extent));
        match resized {
            Err(e) if e.is_device_lost() => {
                warn!("{e} while resizing to {}x{}", extent.width, extent.height);
                self.recover()
            }
            other => other,
        }
    }

    /// Records, submits and presents one frame, then moves on to the next
    /// back buffer. A lost device is rebuilt and the frame dropped.
    pub fn render_frame(&mut self) -> Result<()> {
        let context = self.context.as_mut().ok_or(Error::DeviceUnavailable)?;
        match draw_frame(context, &self.config, &mut self.phase) {
            Err(e) if e.is_device_lost() => {
                warn!("{e} during present");
                self.recover()
            }
            other => other,
        }
    }

    fn recover(&mut self) -> Result<()> {
        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.drain() {
                warn!("failed to drain the lost device: {e}");
            }
        }
        self.phase = FramePhase::Idle;

        info!("rebuilding the GPU context");
        let context = GpuContext::create(
            &self.backend,
            &self.config,
            self.window,
            self.extent,
            &self.shaders,
        )
        .inspect_err(|e| error!("failed to rebuild the GPU context: {e}"))?;
        debug!("resuming at back buffer {}", context.targets.back_buffer_index());
        self.context = Some(context);
        Ok(())
    }
}

impl<B: Backend> Drop for Renderer<B> {
    fn drop(&mut self) {
        if let Some(context) = &mut self.context {
            if let Err(e) = context.drain() {
                warn!("failed to drain the GPU on shutdown: {e}");
            }
        }
    }
}

fn draw_frame<B: Backend>(
    context: &mut GpuContext<B>,
    config: &RendererConfig,
    phase: &mut FramePhase,
) -> Result<()> {
    let slot = context.targets.back_buffer_index();

    *phase = FramePhase::Recording;
    context
        .direct
        .begin_recording(slot, Some(&context.scene.pipeline))?;
    record_clear(context, slot, config.clear_color);
    context.direct.submit()?;
    *phase = FramePhase::Submitted;

    context.targets.present(config.vsync_interval)?;
    *phase = FramePhase::Presented;

    let value = context.direct.next_fence_value();
    context.direct.signal(slot, value)?;

    // Present advanced the swap chain; wait until the buffer it now points
    // at is no longer in use.
    let next = context.targets.back_buffer_index();
    context.direct.wait_for_slot(next)?;
    trace!("frame {value} done, next back buffer {next}");

    *phase = FramePhase::Idle;
    Ok(())
}

fn record_clear<B: Backend>(context: &GpuContext<B>, slot: u32, color: [f32; 4]) {
    let list = context.direct.command_list();
    let targets = &context.targets;
    let render_target = targets.render_target(slot);
    let extent = targets.extent();

    list.transition(render_target, ResourceState::Present, ResourceState::RenderTarget);

    list.set_render_target(targets.rtv_heap(), slot, targets.dsv_heap());
    list.clear_render_target(targets.rtv_heap(), slot, color);
    list.clear_depth(targets.dsv_heap(), 1.0);
    list.set_viewport(&Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width as f32,
        height: extent.height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    });
    list.set_scissor_rect(&ScissorRect {
        left: 0,
        top: 0,
        right: extent.width as i32,
        bottom: extent.height as i32,
    });

    list.transition(render_target, ResourceState::RenderTarget, ResourceState::Present);
}
