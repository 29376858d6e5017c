//! Frame lifecycle and CPU/GPU synchronization for a Direct3D 12 swap chain.
//!
//! [`Renderer`] owns one GPU context (device, queues, swap chain, static
//! scene) and drives it through [`Renderer::render_frame`] and
//! [`Renderer::resize`], rebuilding it when the device is lost. The core is
//! written against the [`backend`] traits; [`d3d12`] implements them on
//! Windows.

pub mod backend;
pub mod channel;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod scheduler;
pub mod simulation;
pub mod targets;
pub mod upload;

#[cfg(windows)]
pub mod d3d12;

#[cfg(test)]
mod fake;

pub use config::{ConfigError, FeatureLevel, RendererConfig, ShaderModel};
pub use error::{DeviceLossReason, Error, Result};
pub use scheduler::{FramePhase, Renderer};
pub use simulation::{Game, Simulation};
pub use targets::Extent;
