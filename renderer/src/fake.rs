//! In-process stand-in for the GPU, used by the unit tests.
//!
//! Buffer copies are applied when a command list is executed. Fences complete
//! as soon as they are signaled unless auto completion is switched off, in
//! which case [`Harness::complete_all`] plays the GPU. Allocator resets that
//! happen before their fence value completed are counted, not rejected, so a
//! test can assert the count is zero.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::backend::{
    self, AdapterInfo, Backend, DescriptorKind, Footprint, Format, HeapType, MessageSeverity,
    PipelineDesc, QueueKind, ResourceState, ScissorRect, SwapChainDesc, Viewport,
};
use crate::config::{FeatureLevel, ShaderModel};
use crate::error::{DeviceLossReason, Error, Result};

const DXGI_ERROR_INVALID_CALL: i32 = 0x887A0001_u32 as i32;
const DXGI_ERROR_UNSUPPORTED: i32 = 0x887A0004_u32 as i32;
const E_FAIL: i32 = 0x80004005_u32 as i32;

fn api_error(call: &'static str, code: i32) -> Error {
    Error::Api {
        call,
        code,
        message: "rejected by the fake GPU".to_string(),
    }
}

fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeWindow(pub u64);

/// Commands as they reached a queue, in submission order.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Transition {
        resource: String,
        before: ResourceState,
        after: ResourceState,
    },
    SetRenderTarget(u32),
    ClearRenderTarget { index: u32, color: [f32; 4] },
    ClearDepth(f32),
    SetViewport(Viewport),
    SetScissorRect(ScissorRect),
    CopyBufferRegion { dst: String, bytes: u64 },
}

#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub debug_layer_enabled: bool,
    pub break_on: Vec<MessageSeverity>,
    pub devices_created: usize,
    pub devices_removed: usize,
    pub swap_chains_created: usize,
    pub swap_chain_sizes: Vec<(u32, u32)>,
    pub resize_calls: Vec<(u32, u32)>,
    pub alt_enter_disabled: usize,
    pub render_target_views: usize,
    pub depth_buffers: Vec<(u32, u32)>,
    pub buffers_created: Vec<(HeapType, u64)>,
    pub pipelines_created: usize,
    pub executions: usize,
    pub signals: Vec<(QueueKind, u64)>,
    pub presents: usize,
    pub sync_intervals: Vec<u32>,
    pub allocator_resets: usize,
    pub premature_allocator_resets: usize,
}

struct FenceSlot {
    device: usize,
    signaled: u64,
    completed: u64,
}

#[derive(Default)]
struct AllocatorSlot {
    /// Fence and value the last submission on this allocator was signaled with.
    pending: Option<(usize, u64)>,
}

struct State {
    adapters: Vec<FakeAdapter>,
    shader_model: ShaderModel,
    simd: bool,
    auto_complete: bool,
    lose_on_present: bool,
    lose_on_resize: bool,
    back_buffer_after_resize: Option<u32>,
    footprint_offset: u64,
    removed_devices: Vec<bool>,
    fences: Vec<FenceSlot>,
    allocators: Vec<AllocatorSlot>,
    executed: Vec<Command>,
    stats: Stats,
}

impl State {
    fn completed(&self, fence: usize) -> u64 {
        let slot = &self.fences[fence];
        // A removed device reports every fence as complete.
        if self.removed_devices[slot.device] {
            u64::MAX
        } else {
            slot.completed
        }
    }

    fn remove_device(&mut self, device: usize) {
        if !self.removed_devices[device] {
            self.removed_devices[device] = true;
            self.stats.devices_removed += 1;
        }
    }
}

/// Shared control surface of the fake GPU.
pub struct Harness {
    state: Mutex<State>,
    fence_progress: Condvar,
}

impl Harness {
    fn new(adapters: Vec<FakeAdapter>) -> Self {
        Self {
            state: Mutex::new(State {
                adapters,
                shader_model: ShaderModel::new(6, 6),
                simd: true,
                auto_complete: true,
                lose_on_present: false,
                lose_on_resize: false,
                back_buffer_after_resize: None,
                footprint_offset: 0,
                removed_devices: Vec::new(),
                fences: Vec::new(),
                allocators: Vec::new(),
                executed: Vec::new(),
                stats: Stats::default(),
            }),
            fence_progress: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn stats(&self) -> Stats {
        self.lock().stats.clone()
    }

    pub fn executed_commands(&self) -> Vec<Command> {
        self.lock().executed.clone()
    }

    pub fn set_shader_model(&self, shader_model: ShaderModel) {
        self.lock().shader_model = shader_model;
    }

    pub fn set_simd_support(&self, simd: bool) {
        self.lock().simd = simd;
    }

    /// With auto completion off, signaled fence values only complete on
    /// [`Harness::complete_all`].
    pub fn set_auto_complete(&self, auto_complete: bool) {
        self.lock().auto_complete = auto_complete;
    }

    pub fn complete_all(&self) {
        let mut state = self.lock();
        for fence in &mut state.fences {
            fence.completed = fence.signaled;
        }
        self.fence_progress.notify_all();
    }

    /// The next present removes the device.
    pub fn lose_device_on_next_present(&self) {
        self.lock().lose_on_present = true;
    }

    /// The next buffer resize resets the device.
    pub fn lose_device_on_next_resize(&self) {
        self.lock().lose_on_resize = true;
    }

    pub fn set_back_buffer_index_after_resize(&self, index: u32) {
        self.lock().back_buffer_after_resize = Some(index);
    }

    /// Shifts every reported copyable footprint by `offset` bytes.
    pub fn set_footprint_offset(&self, offset: u64) {
        self.lock().footprint_offset = offset;
    }

    fn register_device(&self) -> usize {
        let mut state = self.lock();
        state.removed_devices.push(false);
        state.stats.devices_created += 1;
        state.removed_devices.len() - 1
    }
}

pub struct FakeGpu {
    harness: Arc<Harness>,
}

impl Default for FakeGpu {
    fn default() -> Self {
        Self::with_adapters(vec![
            FakeAdapter::hardware("Fake GPU", FeatureLevel::Level12_1),
            FakeAdapter::software("Microsoft Basic Render Driver"),
        ])
    }
}

impl FakeGpu {
    pub fn with_adapters(adapters: Vec<FakeAdapter>) -> Self {
        Self {
            harness: Arc::new(Harness::new(adapters)),
        }
    }

    pub fn harness(&self) -> &Arc<Harness> {
        &self.harness
    }

    /// A device that skips adapter selection.
    pub fn test_device(&self) -> FakeDevice {
        FakeDevice {
            id: self.harness.register_device(),
            harness: self.harness.clone(),
        }
    }
}

impl Backend for FakeGpu {
    type Window = FakeWindow;
    type Factory = FakeFactory;
    type Adapter = FakeAdapter;
    type Device = FakeDevice;
    type Queue = FakeQueue;
    type Allocator = FakeAllocator;
    type CommandList = FakeCommandList;
    type Fence = FakeFence;
    type Event = FakeEvent;
    type SwapChain = FakeSwapChain;
    type Resource = FakeResource;
    type DescriptorHeap = FakeDescriptorHeap;
    type Pipeline = FakePipeline;

    fn enable_debug_layer(&self, break_on: &[MessageSeverity]) -> Result<()> {
        let mut state = self.harness.lock();
        state.stats.debug_layer_enabled = true;
        state.stats.break_on = break_on.to_vec();
        Ok(())
    }

    fn create_factory(&self, _debug: bool) -> Result<FakeFactory> {
        Ok(FakeFactory {
            harness: self.harness.clone(),
        })
    }

    fn create_event(&self) -> Result<FakeEvent> {
        Ok(FakeEvent {
            harness: self.harness.clone(),
            target: Mutex::new(None),
        })
    }

    fn supports_simd_math(&self) -> bool {
        self.harness.lock().simd
    }
}

pub struct FakeFactory {
    harness: Arc<Harness>,
}

impl backend::Factory<FakeGpu> for FakeFactory {
    fn adapters(&self) -> Result<Vec<FakeAdapter>> {
        let adapters = self.harness.lock().adapters.clone();
        Ok(adapters
            .into_iter()
            .map(|adapter| FakeAdapter {
                harness: Some(self.harness.clone()),
                ..adapter
            })
            .collect())
    }

    fn warp_adapter(&self) -> Result<FakeAdapter> {
        Ok(FakeAdapter {
            harness: Some(self.harness.clone()),
            ..FakeAdapter::software("Microsoft Basic Render Driver")
        })
    }

    fn create_swap_chain(
        &self,
        queue: &FakeQueue,
        _window: FakeWindow,
        desc: &SwapChainDesc,
    ) -> Result<FakeSwapChain> {
        assert_eq!(queue.kind, QueueKind::Direct, "swap chains present from the direct queue");
        {
            let mut state = self.harness.lock();
            state.stats.swap_chains_created += 1;
            state.stats.swap_chain_sizes.push((desc.width, desc.height));
        }

        Ok(FakeSwapChain {
            device: queue.device,
            harness: self.harness.clone(),
            state: Mutex::new(SwapState {
                index: 0,
                buffers: back_buffers(desc),
            }),
        })
    }

    fn disable_alt_enter(&self, _window: FakeWindow) -> Result<()> {
        self.harness.lock().stats.alt_enter_disabled += 1;
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeAdapter {
    description: String,
    software: bool,
    max_level: FeatureLevel,
    harness: Option<Arc<Harness>>,
}

impl FakeAdapter {
    pub fn hardware(description: &str, max_level: FeatureLevel) -> Self {
        Self {
            description: description.to_string(),
            software: false,
            max_level,
            harness: None,
        }
    }

    pub fn software(description: &str) -> Self {
        Self {
            description: description.to_string(),
            software: true,
            max_level: FeatureLevel::Level12_1,
            harness: None,
        }
    }
}

impl backend::Adapter<FakeGpu> for FakeAdapter {
    fn info(&self) -> Result<AdapterInfo> {
        Ok(AdapterInfo {
            description: self.description.clone(),
            software: self.software,
        })
    }

    fn create_device(&self, feature_level: FeatureLevel) -> Result<FakeDevice> {
        if feature_level > self.max_level {
            return Err(api_error("D3D12CreateDevice", DXGI_ERROR_UNSUPPORTED));
        }
        let harness = self
            .harness
            .clone()
            .expect("adapters are handed out by a factory");
        Ok(FakeDevice {
            id: harness.register_device(),
            harness,
        })
    }
}

pub struct FakeDevice {
    id: usize,
    harness: Arc<Harness>,
}

impl FakeDevice {
    fn new_resource(&self, heap: Option<HeapType>, size: u64) -> FakeResource {
        let data = match heap {
            Some(_) => vec![0; size as usize],
            None => Vec::new(),
        };
        FakeResource::new(heap, size, data)
    }
}

impl backend::Device<FakeGpu> for FakeDevice {
    fn configure_info_queue(&self, break_on: &[MessageSeverity]) -> Result<()> {
        self.harness.lock().stats.break_on = break_on.to_vec();
        Ok(())
    }

    fn highest_shader_model(&self, requested: ShaderModel) -> Result<ShaderModel> {
        Ok(requested.min(self.harness.lock().shader_model))
    }

    fn create_queue(&self, kind: QueueKind) -> Result<FakeQueue> {
        Ok(FakeQueue {
            kind,
            device: self.id,
            harness: self.harness.clone(),
            unsignaled: Mutex::new(Vec::new()),
        })
    }

    fn create_allocator(&self, _kind: QueueKind) -> Result<FakeAllocator> {
        let mut state = self.harness.lock();
        state.allocators.push(AllocatorSlot::default());
        Ok(FakeAllocator {
            id: state.allocators.len() - 1,
            harness: self.harness.clone(),
        })
    }

    fn create_command_list(&self, _kind: QueueKind, allocator: &FakeAllocator) -> Result<FakeCommandList> {
        Ok(FakeCommandList {
            state: Mutex::new(ListState {
                closed: false,
                allocator: allocator.id,
                commands: Vec::new(),
                copies: Vec::new(),
            }),
        })
    }

    fn create_fence(&self, initial_value: u64) -> Result<FakeFence> {
        let mut state = self.harness.lock();
        state.fences.push(FenceSlot {
            device: self.id,
            signaled: initial_value,
            completed: initial_value,
        });
        Ok(FakeFence {
            id: state.fences.len() - 1,
            harness: self.harness.clone(),
        })
    }

    fn create_descriptor_heap(&self, kind: DescriptorKind, capacity: u32) -> Result<FakeDescriptorHeap> {
        Ok(FakeDescriptorHeap { kind, capacity })
    }

    fn create_render_target_view(&self, _resource: &FakeResource, heap: &FakeDescriptorHeap, index: u32) {
        assert_eq!(heap.kind, DescriptorKind::RenderTarget);
        assert!(index < heap.capacity, "RTV index {index} out of range");
        self.harness.lock().stats.render_target_views += 1;
    }

    fn create_depth_stencil(&self, width: u32, height: u32, format: Format) -> Result<FakeResource> {
        assert_eq!(format, Format::D32Float);
        self.harness.lock().stats.depth_buffers.push((width, height));
        Ok(self.new_resource(None, u64::from(width) * u64::from(height) * 4))
    }

    fn create_depth_stencil_view(&self, _resource: &FakeResource, format: Format, heap: &FakeDescriptorHeap) {
        assert_eq!(format, Format::D32Float);
        assert_eq!(heap.kind, DescriptorKind::DepthStencil);
    }

    fn create_buffer(&self, heap: HeapType, size: u64) -> Result<FakeResource> {
        self.harness.lock().stats.buffers_created.push((heap, size));
        Ok(self.new_resource(Some(heap), size))
    }

    fn copyable_footprint(&self, resource: &FakeResource) -> Footprint {
        let offset = self.harness.lock().footprint_offset;
        let size = resource.inner.size;
        Footprint {
            offset,
            width: size,
            row_pitch: align_up(size, 256),
            row_size: size,
            num_rows: 1,
            depth: 1,
        }
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<FakePipeline> {
        if desc.vertex_shader.is_empty() || desc.pixel_shader.is_empty() {
            return Err(api_error("ID3D12Device::CreateGraphicsPipelineState", E_FAIL));
        }
        let mut state = self.harness.lock();
        state.stats.pipelines_created += 1;
        Ok(FakePipeline {
            id: state.stats.pipelines_created,
        })
    }
}

pub struct FakeQueue {
    kind: QueueKind,
    device: usize,
    harness: Arc<Harness>,
    /// Allocators executed since the last signal.
    unsignaled: Mutex<Vec<usize>>,
}

impl backend::Queue<FakeGpu> for FakeQueue {
    fn execute(&self, list: &FakeCommandList) -> Result<()> {
        let mut list = list.state.lock().unwrap();
        if !list.closed {
            return Err(api_error("ID3D12CommandQueue::ExecuteCommandLists", E_FAIL));
        }

        for copy in list.copies.drain(..) {
            let src = copy.src.data.lock().unwrap();
            let mut dst = copy.dst.data.lock().unwrap();
            let (src_start, dst_start) = (copy.src_offset as usize, copy.dst_offset as usize);
            let len = copy.bytes as usize;
            dst[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
        }

        self.unsignaled.lock().unwrap().push(list.allocator);

        let mut state = self.harness.lock();
        state.stats.executions += 1;
        state.executed.append(&mut list.commands);
        Ok(())
    }

    fn signal(&self, fence: &FakeFence, value: u64) -> Result<()> {
        let allocators = std::mem::take(&mut *self.unsignaled.lock().unwrap());

        let mut state = self.harness.lock();
        for allocator in allocators {
            state.allocators[allocator].pending = Some((fence.id, value));
        }

        let auto_complete = state.auto_complete;
        let slot = &mut state.fences[fence.id];
        slot.signaled = value;
        if auto_complete {
            slot.completed = value;
        }
        state.stats.signals.push((self.kind, value));
        self.harness.fence_progress.notify_all();
        Ok(())
    }
}

pub struct FakeAllocator {
    id: usize,
    harness: Arc<Harness>,
}

impl backend::CommandAllocator for FakeAllocator {
    fn reset(&self) -> Result<()> {
        let mut state = self.harness.lock();
        if let Some((fence, value)) = state.allocators[self.id].pending.take() {
            if state.completed(fence) < value {
                state.stats.premature_allocator_resets += 1;
            }
        }
        state.stats.allocator_resets += 1;
        Ok(())
    }
}

struct PendingCopy {
    dst: Arc<ResourceInner>,
    dst_offset: u64,
    src: Arc<ResourceInner>,
    src_offset: u64,
    bytes: u64,
}

struct ListState {
    closed: bool,
    allocator: usize,
    commands: Vec<Command>,
    copies: Vec<PendingCopy>,
}

pub struct FakeCommandList {
    state: Mutex<ListState>,
}

impl FakeCommandList {
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn record(&self, command: Command) {
        let mut state = self.state.lock().unwrap();
        assert!(!state.closed, "recording {command:?} into a closed command list");
        state.commands.push(command);
    }
}

impl backend::CommandList<FakeGpu> for FakeCommandList {
    fn reset(&self, allocator: &FakeAllocator, _pipeline: Option<&FakePipeline>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.closed {
            return Err(api_error("ID3D12GraphicsCommandList::Reset", E_FAIL));
        }
        state.closed = false;
        state.allocator = allocator.id;
        state.commands.clear();
        state.copies.clear();
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(api_error("ID3D12GraphicsCommandList::Close", E_FAIL));
        }
        state.closed = true;
        Ok(())
    }

    fn transition(&self, resource: &FakeResource, before: ResourceState, after: ResourceState) {
        self.record(Command::Transition {
            resource: resource.name(),
            before,
            after,
        });
    }

    fn set_render_target(&self, _rtv_heap: &FakeDescriptorHeap, index: u32, _dsv_heap: &FakeDescriptorHeap) {
        self.record(Command::SetRenderTarget(index));
    }

    fn clear_render_target(&self, _rtv_heap: &FakeDescriptorHeap, index: u32, color: [f32; 4]) {
        self.record(Command::ClearRenderTarget { index, color });
    }

    fn clear_depth(&self, _dsv_heap: &FakeDescriptorHeap, depth: f32) {
        self.record(Command::ClearDepth(depth));
    }

    fn set_viewport(&self, viewport: &Viewport) {
        self.record(Command::SetViewport(*viewport));
    }

    fn set_scissor_rect(&self, rect: &ScissorRect) {
        self.record(Command::SetScissorRect(*rect));
    }

    fn copy_buffer_region(
        &self,
        dst: &FakeResource,
        dst_offset: u64,
        src: &FakeResource,
        src_offset: u64,
        bytes: u64,
    ) {
        assert!(dst_offset + bytes <= dst.inner.size, "copy overruns the destination");
        assert!(src_offset + bytes <= src.inner.size, "copy overruns the source");
        self.record(Command::CopyBufferRegion {
            dst: dst.name(),
            bytes,
        });
        self.state.lock().unwrap().copies.push(PendingCopy {
            dst: dst.inner.clone(),
            dst_offset,
            src: src.inner.clone(),
            src_offset,
            bytes,
        });
    }
}

pub struct FakeFence {
    id: usize,
    harness: Arc<Harness>,
}

impl backend::Fence<FakeGpu> for FakeFence {
    fn completed_value(&self) -> u64 {
        self.harness.lock().completed(self.id)
    }

    fn set_event_on_completion(&self, value: u64, event: &FakeEvent) -> Result<()> {
        *event.target.lock().unwrap() = Some((self.id, value));
        Ok(())
    }
}

pub struct FakeEvent {
    harness: Arc<Harness>,
    target: Mutex<Option<(usize, u64)>>,
}

impl backend::FenceEvent for FakeEvent {
    fn wait(&self) {
        let Some((fence, value)) = self.target.lock().unwrap().take() else {
            return;
        };
        let mut state = self.harness.lock();
        while state.completed(fence) < value {
            state = self.harness.fence_progress.wait(state).unwrap();
        }
    }
}

struct SwapState {
    index: u32,
    buffers: Vec<FakeResource>,
}

pub struct FakeSwapChain {
    device: usize,
    harness: Arc<Harness>,
    state: Mutex<SwapState>,
}

fn back_buffers(desc: &SwapChainDesc) -> Vec<FakeResource> {
    let size = u64::from(desc.width) * u64::from(desc.height) * 4;
    (0..desc.buffer_count)
        .map(|_| FakeResource::new(None, size, Vec::new()))
        .collect()
}

impl backend::SwapChain<FakeGpu> for FakeSwapChain {
    fn present(&self, sync_interval: u32) -> Result<()> {
        let mut state = self.harness.lock();
        if std::mem::take(&mut state.lose_on_present) {
            state.remove_device(self.device);
            self.harness.fence_progress.notify_all();
        }
        if state.removed_devices[self.device] {
            return Err(Error::DeviceLost(DeviceLossReason::Removed));
        }
        state.stats.presents += 1;
        state.stats.sync_intervals.push(sync_interval);
        drop(state);

        let mut swap = self.state.lock().unwrap();
        swap.index = (swap.index + 1) % swap.buffers.len() as u32;
        Ok(())
    }

    fn resize_buffers(&self, desc: &SwapChainDesc) -> Result<()> {
        let mut state = self.harness.lock();
        if std::mem::take(&mut state.lose_on_resize) {
            state.remove_device(self.device);
            self.harness.fence_progress.notify_all();
        }
        if state.removed_devices[self.device] {
            return Err(Error::DeviceLost(DeviceLossReason::Reset));
        }

        let mut swap = self.state.lock().unwrap();
        if swap.buffers.iter().any(|buffer| Arc::strong_count(&buffer.inner) > 1) {
            return Err(api_error("IDXGISwapChain::ResizeBuffers", DXGI_ERROR_INVALID_CALL));
        }
        state.stats.resize_calls.push((desc.width, desc.height));
        swap.buffers = back_buffers(desc);
        swap.index = state.back_buffer_after_resize.unwrap_or(0) % desc.buffer_count;
        Ok(())
    }

    fn buffer(&self, index: u32) -> Result<FakeResource> {
        let swap = self.state.lock().unwrap();
        swap.buffers
            .get(index as usize)
            .cloned()
            .ok_or_else(|| api_error("IDXGISwapChain::GetBuffer", DXGI_ERROR_INVALID_CALL))
    }

    fn current_back_buffer_index(&self) -> u32 {
        self.state.lock().unwrap().index
    }
}

struct ResourceInner {
    name: Mutex<String>,
    heap: Option<HeapType>,
    size: u64,
    data: Mutex<Vec<u8>>,
}

#[derive(Clone)]
pub struct FakeResource {
    inner: Arc<ResourceInner>,
}

impl FakeResource {
    fn new(heap: Option<HeapType>, size: u64, data: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(ResourceInner {
                name: Mutex::new(String::new()),
                heap,
                size,
                data: Mutex::new(data),
            }),
        }
    }

    pub fn name(&self) -> String {
        self.inner.name.lock().unwrap().clone()
    }

    pub fn heap(&self) -> Option<HeapType> {
        self.inner.heap
    }

    /// Reads the buffer back as the GPU last left it.
    pub fn contents(&self) -> Vec<u8> {
        self.inner.data.lock().unwrap().clone()
    }
}

impl backend::Resource for FakeResource {
    fn set_name(&self, name: &str) {
        *self.inner.name.lock().unwrap() = name.to_string();
    }

    fn size_in_bytes(&self) -> u64 {
        self.inner.size
    }

    fn write_mapped(&self, write: &mut dyn FnMut(&mut [u8])) -> Result<()> {
        if self.inner.heap != Some(HeapType::Upload) {
            return Err(api_error("ID3D12Resource::Map", E_FAIL));
        }
        write(self.inner.data.lock().unwrap().as_mut_slice());
        Ok(())
    }
}

pub struct FakeDescriptorHeap {
    kind: DescriptorKind,
    capacity: u32,
}

#[derive(Debug)]
pub struct FakePipeline {
    pub id: usize,
}
