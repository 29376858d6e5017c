//! Command submission channel: one queue, one fence, and a command list that
//! is recycled over one allocator per in-flight frame slot.

use log::trace;

use crate::backend::{
    Backend, CommandAllocator, CommandList, Device, Fence, FenceEvent, Queue, QueueKind,
};
use crate::error::Result;

pub struct CommandChannel<B: Backend> {
    kind: QueueKind,
    // Fields drop in declaration order.
    allocators: Vec<B::Allocator>,
    command_list: B::CommandList,
    fence: B::Fence,
    fence_event: B::Event,
    queue: B::Queue,
    /// Fence value each slot's allocator was last submitted with.
    fence_values: Vec<u64>,
    last_signaled: u64,
}

impl<B: Backend> CommandChannel<B> {
    pub fn new(backend: &B, device: &B::Device, kind: QueueKind, slots: u32) -> Result<Self> {
        let queue = device.create_queue(kind)?;

        let allocators = (0..slots)
            .map(|_| device.create_allocator(kind))
            .collect::<Result<Vec<_>>>()?;

        let command_list = device.create_command_list(kind, &allocators[0])?;
        // A command list must be closed before its first reset.
        command_list.close()?;

        let fence = device.create_fence(0)?;
        let fence_event = backend.create_event()?;

        Ok(Self {
            kind,
            allocators,
            command_list,
            fence,
            fence_event,
            queue,
            fence_values: vec![0; slots as usize],
            last_signaled: 0,
        })
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn queue(&self) -> &B::Queue {
        &self.queue
    }

    pub fn command_list(&self) -> &B::CommandList {
        &self.command_list
    }

    pub fn fence_values(&self) -> &[u64] {
        &self.fence_values
    }

    pub fn last_signaled(&self) -> u64 {
        self.last_signaled
    }

    pub fn next_fence_value(&self) -> u64 {
        self.last_signaled + 1
    }

    pub fn completed_value(&self) -> u64 {
        self.fence.completed_value()
    }

    /// Waits for `slot`'s previous submission, then resets its allocator and
    /// reopens the command list on it.
    pub fn begin_recording(&mut self, slot: u32, pipeline: Option<&B::Pipeline>) -> Result<()> {
        self.wait_for_slot(slot)?;

        let allocator = &self.allocators[slot as usize];
        allocator.reset()?;
        self.command_list.reset(allocator, pipeline)
    }

    /// Closes the command list and hands it to the queue.
    pub fn submit(&mut self) -> Result<()> {
        self.command_list.close()?;
        self.queue.execute(&self.command_list)
    }

    /// Signals `value` on the queue and associates it with `slot`'s allocator.
    pub fn signal(&mut self, slot: u32, value: u64) -> Result<()> {
        debug_assert!(
            value > self.last_signaled,
            "fence values must increase: {value} after {}",
            self.last_signaled
        );
        self.queue.signal(&self.fence, value)?;
        self.fence_values[slot as usize] = value;
        self.last_signaled = value;
        trace!("{:?} queue: slot {slot} signaled {value}", self.kind);
        Ok(())
    }

    pub fn submit_and_signal(&mut self, slot: u32, value: u64) -> Result<()> {
        self.submit()?;
        self.signal(slot, value)
    }

    pub fn wait_for_slot(&self, slot: u32) -> Result<()> {
        self.wait_for_value(self.fence_values[slot as usize])
    }

    /// Blocks until the fence reaches `value`. There is no timeout.
    pub fn wait_for_value(&self, value: u64) -> Result<()> {
        if self.fence.completed_value() < value {
            self.fence.set_event_on_completion(value, &self.fence_event)?;
            self.fence_event.wait();
        }
        Ok(())
    }

    /// Waits for everything submitted so far to finish.
    pub fn flush(&mut self) -> Result<()> {
        let value = self.next_fence_value();
        self.queue.signal(&self.fence, value)?;
        self.last_signaled = value;
        self.wait_for_value(value)?;

        for slot_value in &mut self.fence_values {
            *slot_value = value;
        }
        Ok(())
    }
}
