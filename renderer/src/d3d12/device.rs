use std::ffi::{c_void, CString};

use common::util::AsCString;
use log::{debug, warn};
use windows::{
    core::{Interface, PCSTR},
    Win32::{
        Foundation::HWND,
        Graphics::{
            Direct3D::ID3DBlob,
            Direct3D12::{
                D3D12CreateDevice, D3D12SerializeRootSignature, ID3D12CommandAllocator,
                ID3D12CommandQueue, ID3D12Device, ID3D12Fence, ID3D12GraphicsCommandList,
                ID3D12InfoQueue, ID3D12Resource, ID3D12RootSignature,
                D3D12_BLEND_DESC, D3D12_BLEND_OP_ADD, D3D12_BLEND_ONE, D3D12_BLEND_ZERO,
                D3D12_CLEAR_VALUE, D3D12_CLEAR_VALUE_0, D3D12_COLOR_WRITE_ENABLE_ALL,
                D3D12_COMMAND_QUEUE_DESC, D3D12_COMPARISON_FUNC_LESS, D3D12_CULL_MODE_BACK,
                D3D12_DEPTH_STENCIL_DESC, D3D12_DEPTH_STENCIL_VALUE,
                D3D12_DEPTH_STENCIL_VIEW_DESC, D3D12_DEPTH_WRITE_MASK_ALL,
                D3D12_DESCRIPTOR_HEAP_DESC, D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
                D3D12_DESCRIPTOR_HEAP_TYPE_RTV, D3D12_DSV_DIMENSION_TEXTURE2D,
                D3D12_FEATURE_DATA_SHADER_MODEL, D3D12_FEATURE_SHADER_MODEL,
                D3D12_FENCE_FLAG_NONE, D3D12_FILL_MODE_SOLID, D3D12_GRAPHICS_PIPELINE_STATE_DESC,
                D3D12_HEAP_FLAG_NONE, D3D12_HEAP_PROPERTIES, D3D12_HEAP_TYPE_DEFAULT,
                D3D12_HEAP_TYPE_UPLOAD, D3D12_INFO_QUEUE_FILTER, D3D12_INFO_QUEUE_FILTER_DESC,
                D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA, D3D12_INPUT_ELEMENT_DESC,
                D3D12_INPUT_LAYOUT_DESC, D3D12_LOGIC_OP_NOOP,
                D3D12_MESSAGE_ID_CLEARRENDERTARGETVIEW_MISMATCHINGCLEARVALUE,
                D3D12_MESSAGE_ID_MAP_INVALID_NULLRANGE, D3D12_MESSAGE_ID_UNMAP_INVALID_NULLRANGE,
                D3D12_MESSAGE_SEVERITY_INFO, D3D12_PLACED_SUBRESOURCE_FOOTPRINT,
                D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE, D3D12_RASTERIZER_DESC,
                D3D12_RENDER_TARGET_BLEND_DESC, D3D12_RESOURCE_DESC,
                D3D12_RESOURCE_DIMENSION_BUFFER, D3D12_RESOURCE_DIMENSION_TEXTURE2D,
                D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL, D3D12_RESOURCE_FLAG_NONE,
                D3D12_RESOURCE_STATE_COMMON, D3D12_RESOURCE_STATE_DEPTH_WRITE,
                D3D12_RESOURCE_STATE_GENERIC_READ, D3D12_ROOT_CONSTANTS, D3D12_ROOT_PARAMETER,
                D3D12_ROOT_PARAMETER_0, D3D12_ROOT_PARAMETER_TYPE_32BIT_CONSTANTS,
                D3D12_ROOT_SIGNATURE_DESC,
                D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
                D3D12_ROOT_SIGNATURE_FLAG_DENY_DOMAIN_SHADER_ROOT_ACCESS,
                D3D12_ROOT_SIGNATURE_FLAG_DENY_GEOMETRY_SHADER_ROOT_ACCESS,
                D3D12_ROOT_SIGNATURE_FLAG_DENY_HULL_SHADER_ROOT_ACCESS,
                D3D12_ROOT_SIGNATURE_FLAG_DENY_PIXEL_SHADER_ROOT_ACCESS, D3D12_SHADER_BYTECODE,
                D3D12_SHADER_VISIBILITY_VERTEX, D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
                D3D12_TEXTURE_LAYOUT_UNKNOWN, D3D_ROOT_SIGNATURE_VERSION_1, D3D_SHADER_MODEL,
            },
            Dxgi::{
                Common::{DXGI_FORMAT_UNKNOWN, DXGI_SAMPLE_DESC},
                IDXGIAdapter1, IDXGIFactory4, IDXGISwapChain1, IDXGISwapChain3,
                DXGI_ADAPTER_FLAG, DXGI_ADAPTER_FLAG_NONE, DXGI_ADAPTER_FLAG_SOFTWARE,
                DXGI_ERROR_NOT_FOUND, DXGI_MWA_NO_ALT_ENTER, DXGI_SWAP_CHAIN_DESC1,
                DXGI_SWAP_EFFECT_FLIP_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT,
            },
        },
    },
};

use super::{
    api_error, command_list_type, d3d12_severity, dxgi_format, feature_level, missing_object,
    ApiResultExt, DescriptorHeap, Pipeline, D3D12,
};
use crate::backend::{
    self, AdapterInfo, DescriptorKind, Footprint, Format, HeapType, MessageSeverity, PipelineDesc,
    QueueKind, SwapChainDesc,
};
use crate::config::{FeatureLevel, ShaderModel};
use crate::error::Result;

impl backend::Factory<D3D12> for IDXGIFactory4 {
    fn adapters(&self) -> Result<Vec<IDXGIAdapter1>> {
        let mut adapters = Vec::new();
        for i in 0.. {
            match unsafe { self.EnumAdapters1(i) } {
                Ok(adapter) => adapters.push(adapter),
                Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break,
                Err(e) => return Err(api_error("IDXGIFactory1::EnumAdapters1", e)),
            }
        }
        Ok(adapters)
    }

    fn warp_adapter(&self) -> Result<IDXGIAdapter1> {
        unsafe { self.EnumWarpAdapter() }.context("IDXGIFactory4::EnumWarpAdapter")
    }

    fn create_swap_chain(
        &self,
        queue: &ID3D12CommandQueue,
        window: HWND,
        desc: &SwapChainDesc,
    ) -> Result<IDXGISwapChain3> {
        let swapchain_desc = DXGI_SWAP_CHAIN_DESC1 {
            BufferCount: desc.buffer_count,
            Width: desc.width,
            Height: desc.height,
            Format: dxgi_format(desc.format),
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let swapchain: IDXGISwapChain1 =
            unsafe { self.CreateSwapChainForHwnd(queue, window, &swapchain_desc, None, None) }
                .context("IDXGIFactory2::CreateSwapChainForHwnd")?;
        swapchain.cast().context("IDXGISwapChain3")
    }

    fn disable_alt_enter(&self, window: HWND) -> Result<()> {
        unsafe { self.MakeWindowAssociation(window, DXGI_MWA_NO_ALT_ENTER) }
            .context("IDXGIFactory::MakeWindowAssociation")
    }
}

impl backend::Adapter<D3D12> for IDXGIAdapter1 {
    fn info(&self) -> Result<AdapterInfo> {
        let desc = unsafe { self.GetDesc1() }.context("IDXGIAdapter1::GetDesc1")?;
        let len = desc
            .Description
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(desc.Description.len());

        Ok(AdapterInfo {
            description: String::from_utf16_lossy(&desc.Description[..len]),
            software: (DXGI_ADAPTER_FLAG(desc.Flags as _) & DXGI_ADAPTER_FLAG_SOFTWARE)
                != DXGI_ADAPTER_FLAG_NONE,
        })
    }

    fn create_device(&self, level: FeatureLevel) -> Result<ID3D12Device> {
        let mut device: Option<ID3D12Device> = None;
        unsafe { D3D12CreateDevice(self, feature_level(level), &mut device) }
            .context("D3D12CreateDevice")?;
        device.ok_or_else(|| missing_object("D3D12CreateDevice"))
    }
}

fn heap_properties(heap: HeapType) -> D3D12_HEAP_PROPERTIES {
    D3D12_HEAP_PROPERTIES {
        Type: match heap {
            HeapType::DeviceLocal => D3D12_HEAP_TYPE_DEFAULT,
            HeapType::Upload => D3D12_HEAP_TYPE_UPLOAD,
        },
        CreationNodeMask: 1,
        VisibleNodeMask: 1,
        ..Default::default()
    }
}

impl backend::Device<D3D12> for ID3D12Device {
    fn configure_info_queue(&self, break_on: &[MessageSeverity]) -> Result<()> {
        let info_queue = self.cast::<ID3D12InfoQueue>().context("ID3D12InfoQueue")?;

        unsafe {
            for &severity in break_on {
                info_queue
                    .SetBreakOnSeverity(d3d12_severity(severity), true)
                    .context("ID3D12InfoQueue::SetBreakOnSeverity")?;
            }

            let mut severities = [D3D12_MESSAGE_SEVERITY_INFO];
            let mut deny_ids = [
                D3D12_MESSAGE_ID_CLEARRENDERTARGETVIEW_MISMATCHINGCLEARVALUE,
                D3D12_MESSAGE_ID_MAP_INVALID_NULLRANGE,
                D3D12_MESSAGE_ID_UNMAP_INVALID_NULLRANGE,
            ];

            let filter = D3D12_INFO_QUEUE_FILTER {
                DenyList: D3D12_INFO_QUEUE_FILTER_DESC {
                    NumSeverities: severities.len() as u32,
                    pSeverityList: severities.as_mut_ptr(),
                    NumIDs: deny_ids.len() as u32,
                    pIDList: deny_ids.as_mut_ptr(),
                    ..Default::default()
                },
                ..Default::default()
            };

            info_queue
                .PushStorageFilter(&filter)
                .context("ID3D12InfoQueue::PushStorageFilter")
        }
    }

    fn highest_shader_model(&self, requested: ShaderModel) -> Result<ShaderModel> {
        // The runtime lowers the requested model to the highest it supports.
        let mut data = D3D12_FEATURE_DATA_SHADER_MODEL {
            HighestShaderModel: D3D_SHADER_MODEL(
                (i32::from(requested.major) << 4) | i32::from(requested.minor),
            ),
        };

        unsafe {
            self.CheckFeatureSupport(
                D3D12_FEATURE_SHADER_MODEL,
                &mut data as *mut _ as *mut c_void,
                std::mem::size_of::<D3D12_FEATURE_DATA_SHADER_MODEL>() as u32,
            )
        }
        .context("ID3D12Device::CheckFeatureSupport")?;

        let model = data.HighestShaderModel.0;
        Ok(ShaderModel::new((model >> 4) as u8, (model & 0xF) as u8))
    }

    fn create_queue(&self, kind: QueueKind) -> Result<ID3D12CommandQueue> {
        unsafe {
            self.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
                Type: command_list_type(kind),
                ..Default::default()
            })
        }
        .context("ID3D12Device::CreateCommandQueue")
    }

    fn create_allocator(&self, kind: QueueKind) -> Result<ID3D12CommandAllocator> {
        unsafe { self.CreateCommandAllocator(command_list_type(kind)) }
            .context("ID3D12Device::CreateCommandAllocator")
    }

    fn create_command_list(
        &self,
        kind: QueueKind,
        allocator: &ID3D12CommandAllocator,
    ) -> Result<ID3D12GraphicsCommandList> {
        unsafe { self.CreateCommandList(0, command_list_type(kind), allocator, None) }
            .context("ID3D12Device::CreateCommandList")
    }

    fn create_fence(&self, initial_value: u64) -> Result<ID3D12Fence> {
        unsafe { self.CreateFence(initial_value, D3D12_FENCE_FLAG_NONE) }
            .context("ID3D12Device::CreateFence")
    }

    fn create_descriptor_heap(&self, kind: DescriptorKind, capacity: u32) -> Result<DescriptorHeap> {
        let heap_type = match kind {
            DescriptorKind::RenderTarget => D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
            DescriptorKind::DepthStencil => D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
        };

        let heap = unsafe {
            self.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
                NumDescriptors: capacity,
                Type: heap_type,
                ..Default::default()
            })
        }
        .context("ID3D12Device::CreateDescriptorHeap")?;
        let increment = unsafe { self.GetDescriptorHandleIncrementSize(heap_type) } as usize;

        Ok(DescriptorHeap { heap, increment })
    }

    fn create_render_target_view(&self, resource: &ID3D12Resource, heap: &DescriptorHeap, index: u32) {
        unsafe { self.CreateRenderTargetView(resource, None, heap.handle(index)) };
    }

    fn create_depth_stencil(&self, width: u32, height: u32, format: Format) -> Result<ID3D12Resource> {
        let desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
            Width: u64::from(width),
            Height: height,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: dxgi_format(format),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
            Flags: D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL,
            ..Default::default()
        };

        let clear = D3D12_CLEAR_VALUE {
            Format: dxgi_format(format),
            Anonymous: D3D12_CLEAR_VALUE_0 {
                DepthStencil: D3D12_DEPTH_STENCIL_VALUE {
                    Depth: 1.0,
                    Stencil: 0,
                },
            },
        };

        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.CreateCommittedResource(
                &heap_properties(HeapType::DeviceLocal),
                D3D12_HEAP_FLAG_NONE,
                &desc,
                D3D12_RESOURCE_STATE_DEPTH_WRITE,
                Some(&clear),
                &mut resource,
            )
        }
        .context("ID3D12Device::CreateCommittedResource")?;
        resource.ok_or_else(|| missing_object("ID3D12Device::CreateCommittedResource"))
    }

    fn create_depth_stencil_view(&self, resource: &ID3D12Resource, format: Format, heap: &DescriptorHeap) {
        let desc = D3D12_DEPTH_STENCIL_VIEW_DESC {
            Format: dxgi_format(format),
            ViewDimension: D3D12_DSV_DIMENSION_TEXTURE2D,
            ..Default::default()
        };
        unsafe { self.CreateDepthStencilView(resource, Some(&desc), heap.handle(0)) };
    }

    fn create_buffer(&self, heap: HeapType, size: u64) -> Result<ID3D12Resource> {
        let desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
            Alignment: 0,
            Width: size,
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: DXGI_FORMAT_UNKNOWN,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            Flags: D3D12_RESOURCE_FLAG_NONE,
        };
        let initial_state = match heap {
            HeapType::DeviceLocal => D3D12_RESOURCE_STATE_COMMON,
            HeapType::Upload => D3D12_RESOURCE_STATE_GENERIC_READ,
        };

        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.CreateCommittedResource(
                &heap_properties(heap),
                D3D12_HEAP_FLAG_NONE,
                &desc,
                initial_state,
                None,
                &mut resource,
            )
        }
        .context("ID3D12Device::CreateCommittedResource")?;
        resource.ok_or_else(|| missing_object("ID3D12Device::CreateCommittedResource"))
    }

    fn copyable_footprint(&self, resource: &ID3D12Resource) -> Footprint {
        let desc = unsafe { resource.GetDesc() };
        let mut layout = D3D12_PLACED_SUBRESOURCE_FOOTPRINT::default();
        let mut num_rows = 0u32;
        let mut row_size = 0u64;
        let mut total_bytes = 0u64;

        unsafe {
            self.GetCopyableFootprints(
                &desc,
                0,
                1,
                0,
                Some(&mut layout as *mut _),
                Some(&mut num_rows as *mut _),
                Some(&mut row_size as *mut _),
                Some(&mut total_bytes as *mut _),
            )
        };
        debug!("copyable footprint: {total_bytes} bytes in {num_rows} rows");

        Footprint {
            offset: layout.Offset,
            width: u64::from(layout.Footprint.Width),
            row_pitch: u64::from(layout.Footprint.RowPitch),
            row_size,
            num_rows,
            depth: layout.Footprint.Depth,
        }
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<Pipeline> {
        let root_signature = create_root_signature(self, desc.root_constants)?;

        let semantics: Vec<CString> = desc
            .input_layout
            .iter()
            .map(|attribute| attribute.semantic.as_c_string())
            .collect();
        let input_elements: Vec<D3D12_INPUT_ELEMENT_DESC> = desc
            .input_layout
            .iter()
            .zip(&semantics)
            .map(|(attribute, semantic)| D3D12_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(semantic.as_ptr() as _),
                SemanticIndex: 0,
                Format: dxgi_format(attribute.format),
                InputSlot: 0,
                AlignedByteOffset: attribute.offset,
                InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();

        let mut rtv_formats = [Default::default(); 8];
        rtv_formats[0] = dxgi_format(desc.render_target_format);

        let pso_desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
            pRootSignature: unsafe { std::mem::transmute_copy(&root_signature) },
            VS: D3D12_SHADER_BYTECODE {
                pShaderBytecode: desc.vertex_shader.as_ptr() as _,
                BytecodeLength: desc.vertex_shader.len(),
            },
            PS: D3D12_SHADER_BYTECODE {
                pShaderBytecode: desc.pixel_shader.as_ptr() as _,
                BytecodeLength: desc.pixel_shader.len(),
            },
            BlendState: D3D12_BLEND_DESC {
                RenderTarget: [D3D12_RENDER_TARGET_BLEND_DESC {
                    BlendEnable: false.into(),
                    LogicOpEnable: false.into(),
                    SrcBlend: D3D12_BLEND_ONE,
                    DestBlend: D3D12_BLEND_ZERO,
                    BlendOp: D3D12_BLEND_OP_ADD,
                    SrcBlendAlpha: D3D12_BLEND_ONE,
                    DestBlendAlpha: D3D12_BLEND_ZERO,
                    BlendOpAlpha: D3D12_BLEND_OP_ADD,
                    LogicOp: D3D12_LOGIC_OP_NOOP,
                    RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
                }; 8],
                ..Default::default()
            },
            SampleMask: u32::MAX,
            RasterizerState: D3D12_RASTERIZER_DESC {
                FillMode: D3D12_FILL_MODE_SOLID,
                CullMode: D3D12_CULL_MODE_BACK,
                DepthClipEnable: true.into(),
                ..Default::default()
            },
            DepthStencilState: D3D12_DEPTH_STENCIL_DESC {
                DepthEnable: true.into(),
                DepthWriteMask: D3D12_DEPTH_WRITE_MASK_ALL,
                DepthFunc: D3D12_COMPARISON_FUNC_LESS,
                ..Default::default()
            },
            InputLayout: D3D12_INPUT_LAYOUT_DESC {
                pInputElementDescs: input_elements.as_ptr(),
                NumElements: input_elements.len() as u32,
            },
            PrimitiveTopologyType: D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
            NumRenderTargets: 1,
            RTVFormats: rtv_formats,
            DSVFormat: dxgi_format(desc.depth_format),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            ..Default::default()
        };

        let pipeline_state = unsafe { self.CreateGraphicsPipelineState(&pso_desc) }
            .context("ID3D12Device::CreateGraphicsPipelineState")?;

        Ok(Pipeline {
            root_signature,
            pipeline_state,
        })
    }
}

/// Root signature with `constants` 32-bit values visible to the vertex shader
/// and every other stage denied.
fn create_root_signature(
    device: &ID3D12Device,
    constants: u32,
) -> Result<ID3D12RootSignature> {
    let parameters = [D3D12_ROOT_PARAMETER {
        ParameterType: D3D12_ROOT_PARAMETER_TYPE_32BIT_CONSTANTS,
        Anonymous: D3D12_ROOT_PARAMETER_0 {
            Constants: D3D12_ROOT_CONSTANTS {
                ShaderRegister: 0,
                RegisterSpace: 0,
                Num32BitValues: constants,
            },
        },
        ShaderVisibility: D3D12_SHADER_VISIBILITY_VERTEX,
    }];

    let desc = D3D12_ROOT_SIGNATURE_DESC {
        NumParameters: parameters.len() as u32,
        pParameters: parameters.as_ptr(),
        NumStaticSamplers: 0,
        pStaticSamplers: std::ptr::null(),
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT
            | D3D12_ROOT_SIGNATURE_FLAG_DENY_HULL_SHADER_ROOT_ACCESS
            | D3D12_ROOT_SIGNATURE_FLAG_DENY_DOMAIN_SHADER_ROOT_ACCESS
            | D3D12_ROOT_SIGNATURE_FLAG_DENY_GEOMETRY_SHADER_ROOT_ACCESS
            | D3D12_ROOT_SIGNATURE_FLAG_DENY_PIXEL_SHADER_ROOT_ACCESS,
    };

    let mut signature: Option<ID3DBlob> = None;
    let mut error: Option<ID3DBlob> = None;
    let serialized = unsafe {
        D3D12SerializeRootSignature(
            &desc,
            D3D_ROOT_SIGNATURE_VERSION_1,
            &mut signature,
            Some(&mut error),
        )
    };

    if let Err(e) = serialized {
        if let Some(error) = &error {
            let message = unsafe {
                std::slice::from_raw_parts(
                    error.GetBufferPointer() as *const u8,
                    error.GetBufferSize(),
                )
            };
            warn!("root signature: {}", String::from_utf8_lossy(message).trim_end());
        }
        return Err(api_error("D3D12SerializeRootSignature", e));
    }

    let signature = signature.ok_or_else(|| missing_object("D3D12SerializeRootSignature"))?;
    unsafe {
        device.CreateRootSignature(
            0,
            std::slice::from_raw_parts(
                signature.GetBufferPointer() as *const u8,
                signature.GetBufferSize(),
            ),
        )
    }
    .context("ID3D12Device::CreateRootSignature")
}
