//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - owning the depth attachment that tracks the surface size

mod depth;
mod gpu;

pub use depth::{DepthTarget, DEPTH_FORMAT};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};

#[cfg(test)]
pub(crate) use gpu::headless_device;
