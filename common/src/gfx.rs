//! Small builders for D3D12 structs that are awkward to spell out inline.

use windows::Win32::{
    Foundation::RECT,
    Graphics::Direct3D12::{
        ID3D12Resource, D3D12_CPU_DESCRIPTOR_HANDLE, D3D12_RESOURCE_BARRIER,
        D3D12_RESOURCE_BARRIER_0, D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
        D3D12_RESOURCE_BARRIER_FLAG_NONE, D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        D3D12_RESOURCE_STATES, D3D12_RESOURCE_TRANSITION_BARRIER, D3D12_VIEWPORT,
    },
};

/// Transition barrier covering every subresource of `resource`.
///
/// The barrier borrows `resource` without adding a reference, so it must be
/// recorded while `resource` is still alive.
pub fn transition_barrier(
    resource: &ID3D12Resource,
    state_before: D3D12_RESOURCE_STATES,
    state_after: D3D12_RESOURCE_STATES,
) -> D3D12_RESOURCE_BARRIER {
    D3D12_RESOURCE_BARRIER {
        Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
        Anonymous: D3D12_RESOURCE_BARRIER_0 {
            Transition: std::mem::ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                pResource: unsafe { std::mem::transmute_copy(resource) },
                StateBefore: state_before,
                StateAfter: state_after,
                Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
            }),
        },
    }
}

/// Handle `index` descriptors past `start`.
pub fn offset_descriptor(
    start: D3D12_CPU_DESCRIPTOR_HANDLE,
    index: u32,
    increment: usize,
) -> D3D12_CPU_DESCRIPTOR_HANDLE {
    D3D12_CPU_DESCRIPTOR_HANDLE {
        ptr: start.ptr + index as usize * increment,
    }
}

pub fn viewport(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    min_depth: f32,
    max_depth: f32,
) -> D3D12_VIEWPORT {
    D3D12_VIEWPORT {
        TopLeftX: x,
        TopLeftY: y,
        Width: width,
        Height: height,
        MinDepth: min_depth,
        MaxDepth: max_depth,
    }
}

pub fn rect(left: i32, top: i32, right: i32, bottom: i32) -> RECT {
    RECT {
        left,
        top,
        right,
        bottom,
    }
}
