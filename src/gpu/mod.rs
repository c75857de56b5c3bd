//! GPU resource management utilities.
//!
//! Provides the wgpu device/queue container, shared bind-group-layout and
//! fullscreen-pipeline boilerplate, and shader composition.

/// Shared wgpu boilerplate helpers for screen-space pipelines.
pub mod pipeline_helpers;
/// wgpu device, queue, and target-size container.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
