//! One-shot copies of static data into device-local buffers.

use log::debug;

use crate::backend::{Backend, CommandList, Device, Footprint, HeapType, Resource};
use crate::channel::CommandChannel;
use crate::error::{Error, Result};

/// A device-local buffer and the staging buffer it is being filled from.
///
/// `staging` must stay alive until the copy queue's fence has passed the
/// submission that carries the copy.
pub struct StagedBuffer<B: Backend> {
    pub buffer: B::Resource,
    pub staging: B::Resource,
}

/// Records a copy of `bytes` into a new device-local buffer on the copy
/// channel's open command list. Submitting and waiting is up to the caller.
pub fn upload_to_device_local<B: Backend>(
    device: &B::Device,
    copy: &CommandChannel<B>,
    bytes: &[u8],
) -> Result<StagedBuffer<B>> {
    let size = bytes.len() as u64;
    let buffer = device.create_buffer(HeapType::DeviceLocal, size)?;
    let staging = device.create_buffer(HeapType::Upload, size)?;

    let footprint = device.copyable_footprint(&buffer);
    debug!("uploading {size} bytes, footprint {footprint:?}");

    let mut copied = Ok(());
    staging.write_mapped(&mut |mapped| copied = copy_rows(mapped, bytes, &footprint))?;
    copied?;

    copy.command_list()
        .copy_buffer_region(&buffer, 0, &staging, footprint.offset, footprint.width);

    Ok(StagedBuffer { buffer, staging })
}

/// Lays `src` out in `mapped` the way `footprint` describes. The source is a
/// single tightly packed row per slice.
fn copy_rows(mapped: &mut [u8], src: &[u8], footprint: &Footprint) -> Result<()> {
    let src_row_pitch = src.len() as u64;
    let src_slice_pitch = src_row_pitch;
    let dst_slice_pitch = footprint.row_pitch * u64::from(footprint.num_rows);

    let rows = u64::from(footprint.num_rows);
    let slices = u64::from(footprint.depth);
    if rows == 0 || slices == 0 {
        return Ok(());
    }

    let required = footprint.offset
        + (slices - 1) * dst_slice_pitch
        + (rows - 1) * footprint.row_pitch
        + footprint.row_size;
    if required > mapped.len() as u64 {
        return Err(Error::UploadLayout {
            required,
            mapped: mapped.len() as u64,
        });
    }

    let row_size = footprint.row_size.min(src_row_pitch) as usize;
    for z in 0..slices {
        for y in 0..rows {
            let dst = (footprint.offset + z * dst_slice_pitch + y * footprint.row_pitch) as usize;
            let src_start = (z * src_slice_pitch + y * src_row_pitch) as usize;
            let Some(src_row) = src.get(src_start..src_start + row_size) else {
                continue;
            };
            mapped[dst..dst + row_size].copy_from_slice(src_row);
        }
    }

    Ok(())
}
