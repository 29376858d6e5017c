//! Graphics API abstraction the frame core is written against.
//!
//! The traits mirror the handful of Direct3D 12 / DXGI objects the core
//! touches. Each backend picks concrete types for them through [`Backend`].
//! Methods map one-to-one onto API calls; sequencing and synchronization live
//! in the core, never in a backend.

use std::fmt::Debug;

use crate::config::{FeatureLevel, ShaderModel};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueKind {
    Direct,
    Copy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorKind {
    RenderTarget,
    DepthStencil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapType {
    /// GPU-local memory, not CPU visible.
    DeviceLocal,
    /// CPU-writable staging memory, GPU readable.
    Upload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceState {
    Common,
    Present,
    RenderTarget,
    DepthWrite,
    CopyDest,
    GenericRead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Rgba8Unorm,
    D32Float,
    Rgb32Float,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageSeverity {
    Corruption,
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterInfo {
    pub description: String,
    pub software: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub buffer_count: u32,
}

/// Placement of a buffer's single subresource inside an upload heap, as
/// reported by the device's copyable-footprint query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub offset: u64,
    pub width: u64,
    pub row_pitch: u64,
    pub row_size: u64,
    pub num_rows: u32,
    pub depth: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScissorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: &'static str,
    pub format: Format,
    pub offset: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PipelineDesc<'a> {
    pub vertex_shader: &'a [u8],
    pub pixel_shader: &'a [u8],
    pub input_layout: &'a [VertexAttribute],
    pub render_target_format: Format,
    pub depth_format: Format,
    /// Number of 32-bit root constants visible to the vertex shader.
    pub root_constants: u32,
}

pub trait Backend: Sized {
    type Window: Copy + Debug;
    type Factory: Factory<Self>;
    type Adapter: Adapter<Self>;
    type Device: Device<Self>;
    type Queue: Queue<Self>;
    type Allocator: CommandAllocator;
    type CommandList: CommandList<Self>;
    type Fence: Fence<Self>;
    type Event: FenceEvent;
    type SwapChain: SwapChain<Self>;
    type Resource: Resource;
    type DescriptorHeap;
    type Pipeline;

    /// Enables API validation, breaking into the debugger on the given severities.
    fn enable_debug_layer(&self, break_on: &[MessageSeverity]) -> Result<()>;

    fn create_factory(&self, debug: bool) -> Result<Self::Factory>;

    fn create_event(&self) -> Result<Self::Event>;

    /// Whether the CPU has the vector instructions the math code relies on.
    fn supports_simd_math(&self) -> bool;
}

pub trait Factory<B: Backend> {
    /// All adapters in enumeration order.
    fn adapters(&self) -> Result<Vec<B::Adapter>>;

    fn warp_adapter(&self) -> Result<B::Adapter>;

    fn create_swap_chain(
        &self,
        queue: &B::Queue,
        window: B::Window,
        desc: &SwapChainDesc,
    ) -> Result<B::SwapChain>;

    fn disable_alt_enter(&self, window: B::Window) -> Result<()>;
}

pub trait Adapter<B: Backend> {
    fn info(&self) -> Result<AdapterInfo>;

    fn create_device(&self, feature_level: FeatureLevel) -> Result<B::Device>;
}

pub trait Device<B: Backend> {
    fn configure_info_queue(&self, break_on: &[MessageSeverity]) -> Result<()>;

    /// Highest supported shader model, capped at `requested`.
    fn highest_shader_model(&self, requested: ShaderModel) -> Result<ShaderModel>;

    fn create_queue(&self, kind: QueueKind) -> Result<B::Queue>;

    fn create_allocator(&self, kind: QueueKind) -> Result<B::Allocator>;

    /// Creates a command list in the recording state on `allocator`.
    fn create_command_list(&self, kind: QueueKind, allocator: &B::Allocator)
        -> Result<B::CommandList>;

    fn create_fence(&self, initial_value: u64) -> Result<B::Fence>;

    fn create_descriptor_heap(&self, kind: DescriptorKind, capacity: u32)
        -> Result<B::DescriptorHeap>;

    fn create_render_target_view(&self, resource: &B::Resource, heap: &B::DescriptorHeap, index: u32);

    fn create_depth_stencil(&self, width: u32, height: u32, format: Format) -> Result<B::Resource>;

    fn create_depth_stencil_view(&self, resource: &B::Resource, format: Format, heap: &B::DescriptorHeap);

    fn create_buffer(&self, heap: HeapType, size: u64) -> Result<B::Resource>;

    fn copyable_footprint(&self, resource: &B::Resource) -> Footprint;

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<B::Pipeline>;
}

pub trait Queue<B: Backend> {
    fn execute(&self, list: &B::CommandList) -> Result<()>;

    fn signal(&self, fence: &B::Fence, value: u64) -> Result<()>;
}

pub trait CommandAllocator {
    fn reset(&self) -> Result<()>;
}

pub trait CommandList<B: Backend> {
    fn reset(&self, allocator: &B::Allocator, pipeline: Option<&B::Pipeline>) -> Result<()>;

    fn close(&self) -> Result<()>;

    fn transition(&self, resource: &B::Resource, before: ResourceState, after: ResourceState);

    fn set_render_target(&self, rtv_heap: &B::DescriptorHeap, index: u32, dsv_heap: &B::DescriptorHeap);

    fn clear_render_target(&self, rtv_heap: &B::DescriptorHeap, index: u32, color: [f32; 4]);

    fn clear_depth(&self, dsv_heap: &B::DescriptorHeap, depth: f32);

    fn set_viewport(&self, viewport: &Viewport);

    fn set_scissor_rect(&self, rect: &ScissorRect);

    fn copy_buffer_region(
        &self,
        dst: &B::Resource,
        dst_offset: u64,
        src: &B::Resource,
        src_offset: u64,
        bytes: u64,
    );
}

pub trait Fence<B: Backend> {
    fn completed_value(&self) -> u64;

    /// Arms `event` to fire once the fence reaches `value`.
    fn set_event_on_completion(&self, value: u64, event: &B::Event) -> Result<()>;
}

pub trait FenceEvent {
    /// Blocks until the event fires. There is no timeout.
    fn wait(&self);
}

pub trait SwapChain<B: Backend> {
    /// Fails with [`Error::DeviceLost`](crate::Error::DeviceLost) when the
    /// device was removed or reset.
    fn present(&self, sync_interval: u32) -> Result<()>;

    /// Same device-loss contract as [`SwapChain::present`]. Every reference to
    /// the old back buffers must be released beforehand.
    fn resize_buffers(&self, desc: &SwapChainDesc) -> Result<()>;

    fn buffer(&self, index: u32) -> Result<B::Resource>;

    fn current_back_buffer_index(&self) -> u32;
}

pub trait Resource {
    fn set_name(&self, name: &str);

    fn size_in_bytes(&self) -> u64;

    /// Maps subresource 0 for writing and hands the mapped bytes to `write`.
    fn write_mapped(&self, write: &mut dyn FnMut(&mut [u8])) -> Result<()>;
}
