//! Swap chain, back-buffer render targets and the depth buffer.

use log::debug;

use crate::backend::{
    Backend, DescriptorKind, Device, Factory, Format, Resource, SwapChain, SwapChainDesc,
};
use crate::error::{Error, Result};

pub const BACK_BUFFER_FORMAT: Format = Format::Rgba8Unorm;
pub const DEPTH_BUFFER_FORMAT: Format = Format::D32Float;

/// Output size in pixels, never smaller than 1x1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

pub struct TargetSet<B: Backend> {
    // Fields drop in declaration order.
    render_targets: Vec<B::Resource>,
    depth_stencil: Option<B::Resource>,
    swap_chain: Option<B::SwapChain>,
    rtv_heap: B::DescriptorHeap,
    dsv_heap: B::DescriptorHeap,
    buffer_count: u32,
    extent: Extent,
}

impl<B: Backend> TargetSet<B> {
    /// Allocates the descriptor heaps. No swap chain exists until the first
    /// [`TargetSet::create_or_resize`].
    pub fn new(device: &B::Device, buffer_count: u32) -> Result<Self> {
        let rtv_heap = device.create_descriptor_heap(DescriptorKind::RenderTarget, buffer_count)?;
        let dsv_heap = device.create_descriptor_heap(DescriptorKind::DepthStencil, 1)?;

        Ok(Self {
            render_targets: Vec::with_capacity(buffer_count as usize),
            depth_stencil: None,
            swap_chain: None,
            rtv_heap,
            dsv_heap,
            buffer_count,
            extent: Extent::clamped(0, 0),
        })
    }

    /// Creates the swap chain on first use, resizes it in place afterwards,
    /// then rebuilds every view and the depth buffer for `extent`.
    ///
    /// Device loss during the resize surfaces as
    /// [`Error::DeviceLost`](crate::Error::DeviceLost); the caller owns recovery.
    pub fn create_or_resize(
        &mut self,
        device: &B::Device,
        factory: &B::Factory,
        queue: &B::Queue,
        window: B::Window,
        extent: Extent,
    ) -> Result<()> {
        let desc = SwapChainDesc {
            width: extent.width,
            height: extent.height,
            format: BACK_BUFFER_FORMAT,
            buffer_count: self.buffer_count,
        };

        // The swap chain refuses to resize while back buffers are referenced.
        self.render_targets.clear();
        self.depth_stencil = None;

        match &self.swap_chain {
            Some(swap_chain) => {
                debug!("resizing swap chain to {}x{}", extent.width, extent.height);
                swap_chain.resize_buffers(&desc)?;
            }
            None => {
                debug!("creating swap chain {}x{}", extent.width, extent.height);
                let swap_chain = factory.create_swap_chain(queue, window, &desc)?;
                factory.disable_alt_enter(window)?;
                self.swap_chain = Some(swap_chain);
            }
        }
        self.extent = extent;

        let swap_chain = self.swap_chain.as_ref().ok_or(Error::DeviceUnavailable)?;
        for index in 0..self.buffer_count {
            let render_target = swap_chain.buffer(index)?;
            render_target.set_name(&format!("Render target {index}"));
            device.create_render_target_view(&render_target, &self.rtv_heap, index);
            self.render_targets.push(render_target);
        }

        let depth_stencil =
            device.create_depth_stencil(extent.width, extent.height, DEPTH_BUFFER_FORMAT)?;
        depth_stencil.set_name("Depth stencil");
        device.create_depth_stencil_view(&depth_stencil, DEPTH_BUFFER_FORMAT, &self.dsv_heap);
        self.depth_stencil = Some(depth_stencil);

        Ok(())
    }

    /// Fails with [`Error::DeviceUnavailable`] before the first
    /// [`TargetSet::create_or_resize`].
    pub fn present(&self, sync_interval: u32) -> Result<()> {
        self.swap_chain
            .as_ref()
            .ok_or(Error::DeviceUnavailable)?
            .present(sync_interval)
    }

    /// Always asks the swap chain; the index is never cached.
    pub fn back_buffer_index(&self) -> u32 {
        self.swap_chain
            .as_ref()
            .map_or(0, |swap_chain| swap_chain.current_back_buffer_index())
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn render_target(&self, index: u32) -> &B::Resource {
        &self.render_targets[index as usize]
    }

    pub fn render_targets(&self) -> &[B::Resource] {
        &self.render_targets
    }

    pub fn depth_stencil(&self) -> Option<&B::Resource> {
        self.depth_stencil.as_ref()
    }

    pub fn rtv_heap(&self) -> &B::DescriptorHeap {
        &self.rtv_heap
    }

    pub fn dsv_heap(&self) -> &B::DescriptorHeap {
        &self.dsv_heap
    }
}
