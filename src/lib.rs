//! Deferred-rendering support pipeline built on wgpu.
//!
//! Marquee's storefront scene renders through a multi-pass pipeline:
//! geometry → SSAO → blur → lighting/composite. This crate owns the
//! deferred half of that pipeline — the G-buffer geometry targets and the
//! screen-space ambient-occlusion passes — and exposes everything an
//! external lighting stage needs as read-only bind groups and texture
//! views.
//!
//! # Key entry points
//!
//! - [`renderer::pipeline::RenderPipeline`] - pipeline orchestrator owning
//!   the G-buffer and the forward/deferred toggle
//! - [`renderer::gbuffer::GBuffer`] - geometry-pass normal/depth targets
//! - [`renderer::ssao::SsaoPass`] - hemisphere-sampled SSAO with a
//!   separable depth-aware blur
//! - [`options::SsaoOptions`] - runtime-tunable SSAO configuration
//!
//! # Architecture
//!
//! Per-frame scheduling is owned by the caller. A frame encodes the
//! geometry pass into the G-buffer, then the SSAO pass reading it, then the
//! two blur passes, and finally hands the AO texture view plus the G-buffer
//! read bind group to its own lighting pass. All pass setup here is
//! synchronous; pixel work runs on the GPU timeline after submit.

pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;

pub use error::RenderError;
pub use options::SsaoOptions;
pub use renderer::gbuffer::GBuffer;
pub use renderer::pipeline::{RenderPipeline, RenderStage};
pub use renderer::ssao::SsaoPass;
