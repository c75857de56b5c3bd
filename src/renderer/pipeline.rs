//! Pipeline orchestrator: owns the G-buffer and the forward/deferred
//! toggle, and names the extension points future passes slot into.

use std::fmt;

use crate::error::RenderError;
use crate::gpu::render_context::RenderContext;
use crate::renderer::gbuffer::GBuffer;

/// Stages of the per-frame pipeline.
///
/// `Shadow` and `PostProcess` are declared extension points; requesting
/// them returns [`RenderError::StageUnimplemented`] so callers get a
/// detectable signal rather than a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// G-buffer geometry pass.
    Geometry,
    /// Shadow-map pass (not implemented).
    Shadow,
    /// External lighting/compositing pass.
    Lighting,
    /// Post-process pass (not implemented).
    PostProcess,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Geometry => "geometry",
            Self::Shadow => "shadow",
            Self::Lighting => "lighting",
            Self::PostProcess => "post-process",
        };
        f.write_str(name)
    }
}

/// Single coordination point for the deferred pipeline.
///
/// Owns the [`GBuffer`] and the forward/deferred mode flag. Whether the
/// geometry and SSAO passes execute at all each frame is decided by the
/// external render loop reading
/// [`is_deferred_rendering_enabled`](RenderPipeline::is_deferred_rendering_enabled).
pub struct RenderPipeline {
    gbuffer: GBuffer,
    format: wgpu::TextureFormat,
    deferred: bool,
}

impl RenderPipeline {
    /// Create the pipeline and its G-buffer at the context's current size.
    ///
    /// Deferred rendering starts enabled.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let gbuffer =
            GBuffer::new(context, context.width(), context.height());
        Self {
            gbuffer,
            format: context.format(),
            deferred: true,
        }
    }

    /// Toggle between forward and deferred rendering.
    ///
    /// Flips the flag and logs; has no other side effect.
    pub fn set_deferred_rendering(&mut self, enabled: bool) {
        if self.deferred != enabled {
            log::info!(
                "deferred rendering {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.deferred = enabled;
    }

    /// Whether the deferred path (geometry + SSAO passes) is active.
    pub fn is_deferred_rendering_enabled(&self) -> bool {
        self.deferred
    }

    /// Forward a resize to the owned G-buffer.
    pub fn resize(&mut self, context: &RenderContext, width: u32, height: u32) {
        self.gbuffer.resize(context, width, height);
    }

    /// The owned G-buffer.
    pub fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    /// Begin the geometry pass writing into the G-buffer.
    pub fn begin_geometry_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        self.gbuffer.begin_geometry_pass(encoder)
    }

    /// G-buffer read bind group for the external lighting pass.
    pub fn gbuffer_read_bind_group(&self) -> &wgpu::BindGroup {
        self.gbuffer.read_bind_group()
    }

    /// Layout of the G-buffer read bind group.
    pub fn gbuffer_read_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.gbuffer.read_bind_group_layout()
    }

    /// The surface/target color format this pipeline was created for.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Shadow-pass extension point.
    ///
    /// # Errors
    ///
    /// Always returns [`RenderError::StageUnimplemented`] — shadow mapping
    /// is part of the public contract but has no implementation yet.
    pub fn begin_shadow_pass(&self) -> Result<(), RenderError> {
        log::debug!("shadow pass requested but not implemented");
        Err(RenderError::StageUnimplemented(RenderStage::Shadow))
    }

    /// Post-process-pass extension point.
    ///
    /// # Errors
    ///
    /// Always returns [`RenderError::StageUnimplemented`] — compositing
    /// stays with the external lighting stage for now.
    pub fn begin_post_process_pass(&self) -> Result<(), RenderError> {
        log::debug!("post-process pass requested but not implemented");
        Err(RenderError::StageUnimplemented(RenderStage::PostProcess))
    }

    /// Release the owned G-buffer's GPU resources.
    pub fn destroy(&self) {
        self.gbuffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unimplemented_stages_format_by_name() {
        let err = RenderError::StageUnimplemented(RenderStage::Shadow);
        assert_eq!(
            err.to_string(),
            "render stage shadow is not implemented"
        );
        let err = RenderError::StageUnimplemented(RenderStage::PostProcess);
        assert_eq!(
            err.to_string(),
            "render stage post-process is not implemented"
        );
    }
}
