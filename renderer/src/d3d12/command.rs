use common::gfx::{rect, transition_barrier, viewport};
use windows::{
    core::Interface,
    Win32::Graphics::Direct3D12::{
        ID3D12CommandAllocator, ID3D12CommandList, ID3D12CommandQueue, ID3D12Fence,
        ID3D12GraphicsCommandList, ID3D12Resource, D3D12_CLEAR_FLAG_DEPTH,
    },
};

use super::{resource_state, ApiResultExt, DescriptorHeap, Event, Pipeline, D3D12};
use crate::backend::{self, ResourceState, ScissorRect, Viewport};
use crate::error::Result;

impl backend::Queue<D3D12> for ID3D12CommandQueue {
    fn execute(&self, list: &ID3D12GraphicsCommandList) -> Result<()> {
        let list: ID3D12CommandList = list.cast().context("ID3D12CommandList")?;
        unsafe { self.ExecuteCommandLists(&[Some(list)]) };
        Ok(())
    }

    fn signal(&self, fence: &ID3D12Fence, value: u64) -> Result<()> {
        unsafe { self.Signal(fence, value) }.context("ID3D12CommandQueue::Signal")
    }
}

impl backend::CommandAllocator for ID3D12CommandAllocator {
    fn reset(&self) -> Result<()> {
        unsafe { self.Reset() }.context("ID3D12CommandAllocator::Reset")
    }
}

impl backend::CommandList<D3D12> for ID3D12GraphicsCommandList {
    fn reset(&self, allocator: &ID3D12CommandAllocator, pipeline: Option<&Pipeline>) -> Result<()> {
        match pipeline {
            Some(pipeline) => unsafe { self.Reset(allocator, &pipeline.pipeline_state) },
            None => unsafe { self.Reset(allocator, None) },
        }
        .context("ID3D12GraphicsCommandList::Reset")
    }

    fn close(&self) -> Result<()> {
        unsafe { self.Close() }.context("ID3D12GraphicsCommandList::Close")
    }

    fn transition(&self, resource: &ID3D12Resource, before: ResourceState, after: ResourceState) {
        let barrier = transition_barrier(resource, resource_state(before), resource_state(after));
        unsafe { self.ResourceBarrier(&[barrier]) };
    }

    fn set_render_target(&self, rtv_heap: &DescriptorHeap, index: u32, dsv_heap: &DescriptorHeap) {
        let rtv = rtv_heap.handle(index);
        let dsv = dsv_heap.handle(0);
        unsafe { self.OMSetRenderTargets(1, Some(&rtv), false, Some(&dsv)) };
    }

    fn clear_render_target(&self, rtv_heap: &DescriptorHeap, index: u32, color: [f32; 4]) {
        unsafe { self.ClearRenderTargetView(rtv_heap.handle(index), &color, None) };
    }

    fn clear_depth(&self, dsv_heap: &DescriptorHeap, depth: f32) {
        unsafe {
            self.ClearDepthStencilView(dsv_heap.handle(0), D3D12_CLEAR_FLAG_DEPTH, depth, 0, None)
        };
    }

    fn set_viewport(&self, vp: &Viewport) {
        let viewport = viewport(vp.x, vp.y, vp.width, vp.height, vp.min_depth, vp.max_depth);
        unsafe { self.RSSetViewports(&[viewport]) };
    }

    fn set_scissor_rect(&self, r: &ScissorRect) {
        unsafe { self.RSSetScissorRects(&[rect(r.left, r.top, r.right, r.bottom)]) };
    }

    fn copy_buffer_region(
        &self,
        dst: &ID3D12Resource,
        dst_offset: u64,
        src: &ID3D12Resource,
        src_offset: u64,
        bytes: u64,
    ) {
        unsafe { self.CopyBufferRegion(dst, dst_offset, src, src_offset, bytes) };
    }
}

impl backend::Fence<D3D12> for ID3D12Fence {
    fn completed_value(&self) -> u64 {
        unsafe { self.GetCompletedValue() }
    }

    fn set_event_on_completion(&self, value: u64, event: &Event) -> Result<()> {
        unsafe { self.SetEventOnCompletion(value, event.0) }
            .context("ID3D12Fence::SetEventOnCompletion")
    }
}
