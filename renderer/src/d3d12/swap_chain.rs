use std::ffi::c_void;

use windows::{
    core::PCWSTR,
    Win32::Graphics::{
        Direct3D12::ID3D12Resource,
        Dxgi::{IDXGISwapChain3, DXGI_PRESENT, DXGI_SWAP_CHAIN_FLAG},
    },
};

use super::{dxgi_format, missing_object, ApiResultExt, D3D12};
use crate::backend::{self, SwapChainDesc};
use crate::error::Result;

impl backend::SwapChain<D3D12> for IDXGISwapChain3 {
    fn present(&self, sync_interval: u32) -> Result<()> {
        unsafe { self.Present(sync_interval, DXGI_PRESENT(0)) }
            .ok()
            .context("IDXGISwapChain::Present")
    }

    fn resize_buffers(&self, desc: &SwapChainDesc) -> Result<()> {
        unsafe {
            self.ResizeBuffers(
                desc.buffer_count,
                desc.width,
                desc.height,
                dxgi_format(desc.format),
                DXGI_SWAP_CHAIN_FLAG(0),
            )
        }
        .context("IDXGISwapChain::ResizeBuffers")
    }

    fn buffer(&self, index: u32) -> Result<ID3D12Resource> {
        unsafe { self.GetBuffer(index) }.context("IDXGISwapChain::GetBuffer")
    }

    fn current_back_buffer_index(&self) -> u32 {
        unsafe { self.GetCurrentBackBufferIndex() }
    }
}

impl backend::Resource for ID3D12Resource {
    fn set_name(&self, name: &str) {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        if let Err(e) = unsafe { self.SetName(PCWSTR(wide.as_ptr())) } {
            log::warn!("failed to name resource {name:?}: {e}");
        }
    }

    fn size_in_bytes(&self) -> u64 {
        unsafe { self.GetDesc() }.Width
    }

    fn write_mapped(&self, write: &mut dyn FnMut(&mut [u8])) -> Result<()> {
        let len = self.size_in_bytes() as usize;

        let mut data: *mut c_void = std::ptr::null_mut();
        unsafe { self.Map(0, None, Some(&mut data)) }.context("ID3D12Resource::Map")?;
        if data.is_null() {
            return Err(missing_object("ID3D12Resource::Map"));
        }

        let mapped = unsafe { std::slice::from_raw_parts_mut(data as *mut u8, len) };
        write(mapped);

        unsafe { self.Unmap(0, None) };
        Ok(())
    }
}
