//! Direct3D 12 / DXGI implementation of the backend traits.

mod command;
mod device;
mod swap_chain;

use common::gfx::offset_descriptor;
use windows::Win32::{
    Foundation::{CloseHandle, HANDLE, HWND},
    Graphics::{
        Direct3D::{
            D3D_FEATURE_LEVEL, D3D_FEATURE_LEVEL_11_0, D3D_FEATURE_LEVEL_11_1,
            D3D_FEATURE_LEVEL_12_0, D3D_FEATURE_LEVEL_12_1,
        },
        Direct3D12::{
            D3D12GetDebugInterface, ID3D12CommandAllocator, ID3D12CommandQueue, ID3D12Debug,
            ID3D12DescriptorHeap, ID3D12Device, ID3D12Fence, ID3D12GraphicsCommandList,
            ID3D12PipelineState, ID3D12Resource, ID3D12RootSignature,
            D3D12_COMMAND_LIST_TYPE, D3D12_COMMAND_LIST_TYPE_COPY, D3D12_COMMAND_LIST_TYPE_DIRECT,
            D3D12_CPU_DESCRIPTOR_HANDLE, D3D12_MESSAGE_SEVERITY, D3D12_MESSAGE_SEVERITY_CORRUPTION,
            D3D12_MESSAGE_SEVERITY_ERROR, D3D12_MESSAGE_SEVERITY_INFO,
            D3D12_MESSAGE_SEVERITY_WARNING, D3D12_RESOURCE_STATES, D3D12_RESOURCE_STATE_COMMON,
            D3D12_RESOURCE_STATE_COPY_DEST, D3D12_RESOURCE_STATE_DEPTH_WRITE,
            D3D12_RESOURCE_STATE_GENERIC_READ, D3D12_RESOURCE_STATE_PRESENT,
            D3D12_RESOURCE_STATE_RENDER_TARGET,
        },
        Dxgi::{
            Common::{
                DXGI_FORMAT, DXGI_FORMAT_D32_FLOAT, DXGI_FORMAT_R32G32B32_FLOAT,
                DXGI_FORMAT_R8G8B8A8_UNORM,
            },
            CreateDXGIFactory2, DXGIGetDebugInterface1, IDXGIAdapter1, IDXGIDebug1, IDXGIFactory4,
            IDXGIInfoQueue, IDXGISwapChain3, DXGI_CREATE_FACTORY_DEBUG, DXGI_CREATE_FACTORY_FLAGS,
            DXGI_DEBUG_ALL, DXGI_DEBUG_RLO_DETAIL, DXGI_DEBUG_RLO_IGNORE_INTERNAL,
            DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET, DXGI_INFO_QUEUE_MESSAGE_SEVERITY,
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION, DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR,
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_INFO, DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING,
        },
    },
    System::Threading::{CreateEventA, WaitForSingleObject, INFINITE},
};

use crate::backend::{self, Backend, Format, MessageSeverity, QueueKind, ResourceState};
use crate::config::FeatureLevel;
use crate::error::{DeviceLossReason, Error, Result};

/// Attaches the name of the failing API call to a `windows` error.
///
/// Device removal and reset become [`Error::DeviceLost`] wherever they show
/// up; everything else is an [`Error::Api`] carrying the HRESULT and its
/// system description.
pub(crate) trait ApiResultExt<T> {
    fn context(self, call: &'static str) -> Result<T>;
}

impl<T> ApiResultExt<T> for windows::core::Result<T> {
    fn context(self, call: &'static str) -> Result<T> {
        self.map_err(|e| api_error(call, e))
    }
}

fn api_error(call: &'static str, error: windows::core::Error) -> Error {
    let code = error.code();
    if code == DXGI_ERROR_DEVICE_REMOVED {
        Error::DeviceLost(DeviceLossReason::Removed)
    } else if code == DXGI_ERROR_DEVICE_RESET {
        Error::DeviceLost(DeviceLossReason::Reset)
    } else {
        Error::Api {
            call,
            code: code.0,
            message: error.message(),
        }
    }
}

/// Error for calls that succeeded but did not hand back an object.
fn missing_object(call: &'static str) -> Error {
    Error::Api {
        call,
        code: windows::Win32::Foundation::E_POINTER.0,
        message: "no object was returned".to_string(),
    }
}

pub(crate) fn feature_level(level: FeatureLevel) -> D3D_FEATURE_LEVEL {
    match level {
        FeatureLevel::Level11_0 => D3D_FEATURE_LEVEL_11_0,
        FeatureLevel::Level11_1 => D3D_FEATURE_LEVEL_11_1,
        FeatureLevel::Level12_0 => D3D_FEATURE_LEVEL_12_0,
        FeatureLevel::Level12_1 => D3D_FEATURE_LEVEL_12_1,
    }
}

pub(crate) fn dxgi_format(format: Format) -> DXGI_FORMAT {
    match format {
        Format::Rgba8Unorm => DXGI_FORMAT_R8G8B8A8_UNORM,
        Format::D32Float => DXGI_FORMAT_D32_FLOAT,
        Format::Rgb32Float => DXGI_FORMAT_R32G32B32_FLOAT,
    }
}

pub(crate) fn resource_state(state: ResourceState) -> D3D12_RESOURCE_STATES {
    match state {
        ResourceState::Common => D3D12_RESOURCE_STATE_COMMON,
        ResourceState::Present => D3D12_RESOURCE_STATE_PRESENT,
        ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
        ResourceState::DepthWrite => D3D12_RESOURCE_STATE_DEPTH_WRITE,
        ResourceState::CopyDest => D3D12_RESOURCE_STATE_COPY_DEST,
        ResourceState::GenericRead => D3D12_RESOURCE_STATE_GENERIC_READ,
    }
}

pub(crate) fn command_list_type(kind: QueueKind) -> D3D12_COMMAND_LIST_TYPE {
    match kind {
        QueueKind::Direct => D3D12_COMMAND_LIST_TYPE_DIRECT,
        QueueKind::Copy => D3D12_COMMAND_LIST_TYPE_COPY,
    }
}

pub(crate) fn d3d12_severity(severity: MessageSeverity) -> D3D12_MESSAGE_SEVERITY {
    match severity {
        MessageSeverity::Corruption => D3D12_MESSAGE_SEVERITY_CORRUPTION,
        MessageSeverity::Error => D3D12_MESSAGE_SEVERITY_ERROR,
        MessageSeverity::Warning => D3D12_MESSAGE_SEVERITY_WARNING,
        MessageSeverity::Info => D3D12_MESSAGE_SEVERITY_INFO,
    }
}

fn dxgi_severity(severity: MessageSeverity) -> DXGI_INFO_QUEUE_MESSAGE_SEVERITY {
    match severity {
        MessageSeverity::Corruption => DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION,
        MessageSeverity::Error => DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR,
        MessageSeverity::Warning => DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING,
        MessageSeverity::Info => DXGI_INFO_QUEUE_MESSAGE_SEVERITY_INFO,
    }
}

/// RTV or DSV heap with its descriptor stride.
pub struct DescriptorHeap {
    pub(crate) heap: ID3D12DescriptorHeap,
    pub(crate) increment: usize,
}

impl DescriptorHeap {
    pub fn handle(&self, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        let start = unsafe { self.heap.GetCPUDescriptorHandleForHeapStart() };
        offset_descriptor(start, index, self.increment)
    }
}

pub struct Pipeline {
    pub root_signature: ID3D12RootSignature,
    pub pipeline_state: ID3D12PipelineState,
}

/// Auto-reset Win32 event used to wait on fences.
pub struct Event(HANDLE);

impl backend::FenceEvent for Event {
    fn wait(&self) {
        unsafe { WaitForSingleObject(self.0, INFINITE) };
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.0) } {
            log::warn!("failed to close fence event: {e}");
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct D3D12;

impl D3D12 {
    /// Dumps every DXGI object still alive. Debug builds only.
    pub fn report_live_objects() {
        if cfg!(debug_assertions) {
            unsafe {
                if let Ok(dxgi_debug) = DXGIGetDebugInterface1::<IDXGIDebug1>(0) {
                    let _ = dxgi_debug.ReportLiveObjects(
                        DXGI_DEBUG_ALL,
                        DXGI_DEBUG_RLO_DETAIL | DXGI_DEBUG_RLO_IGNORE_INTERNAL,
                    );
                }
            }
        }
    }
}

impl Backend for D3D12 {
    type Window = HWND;
    type Factory = IDXGIFactory4;
    type Adapter = IDXGIAdapter1;
    type Device = ID3D12Device;
    type Queue = ID3D12CommandQueue;
    type Allocator = ID3D12CommandAllocator;
    type CommandList = ID3D12GraphicsCommandList;
    type Fence = ID3D12Fence;
    type Event = Event;
    type SwapChain = IDXGISwapChain3;
    type Resource = ID3D12Resource;
    type DescriptorHeap = DescriptorHeap;
    type Pipeline = Pipeline;

    fn enable_debug_layer(&self, break_on: &[MessageSeverity]) -> Result<()> {
        unsafe {
            let mut debug: Option<ID3D12Debug> = None;
            if let Some(debug) = D3D12GetDebugInterface(&mut debug).ok().and(debug) {
                debug.EnableDebugLayer();
            } else {
                log::warn!("D3D12 debug layer is not installed");
            }

            if let Ok(dxgi_debug) = DXGIGetDebugInterface1::<IDXGIDebug1>(0) {
                dxgi_debug.EnableLeakTrackingForThread();
            }

            if let Ok(info_queue) = DXGIGetDebugInterface1::<IDXGIInfoQueue>(0) {
                for &severity in break_on {
                    info_queue
                        .SetBreakOnSeverity(DXGI_DEBUG_ALL, dxgi_severity(severity), true)
                        .context("IDXGIInfoQueue::SetBreakOnSeverity")?;
                }
            }
        }

        Ok(())
    }

    fn create_factory(&self, debug: bool) -> Result<IDXGIFactory4> {
        let flags = if debug {
            DXGI_CREATE_FACTORY_DEBUG
        } else {
            DXGI_CREATE_FACTORY_FLAGS(0)
        };

        unsafe { CreateDXGIFactory2(flags) }.context("CreateDXGIFactory2")
    }

    fn create_event(&self) -> Result<Event> {
        let handle = unsafe { CreateEventA(None, false, false, None) }.context("CreateEventA")?;
        Ok(Event(handle))
    }

    fn supports_simd_math(&self) -> bool {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            is_x86_feature_detected!("sse2")
        }
        #[cfg(target_arch = "aarch64")]
        {
            std::arch::is_aarch64_feature_detected!("neon")
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        {
            false
        }
    }
}
