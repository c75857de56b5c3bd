//! Geometry-pass render targets (view-space normals + depth).

use crate::gpu::pipeline_helpers::{depth_texture_2d, texture_2d};
use crate::gpu::render_context::RenderContext;

/// Color format of the normal target (view-space encoded normals).
pub const NORMAL_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba16Float;

/// Depth format of the geometry pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Depth32Float;

/// Off-screen render targets written by the geometry pass and read by the
/// SSAO and lighting passes.
///
/// Texture dimensions always equal the configured resolution; [`resize`]
/// destroys and recreates both targets atomically. Only read-only views and
/// bind groups cross this component's boundary.
///
/// [`resize`]: GBuffer::resize
pub struct GBuffer {
    normal_texture: wgpu::Texture,
    normal_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    read_layout: wgpu::BindGroupLayout,
    read_bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl GBuffer {
    /// Allocate geometry targets at the given resolution (clamped to >= 1).
    #[must_use]
    pub fn new(context: &RenderContext, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let (normal_texture, normal_view) =
            Self::create_normal_texture(context, width, height);
        let (depth_texture, depth_view) =
            Self::create_depth_texture(context, width, height);

        let read_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("GBuffer Read Layout"),
                entries: &[texture_2d(0), depth_texture_2d(1)],
            },
        );
        let read_bind_group = Self::create_read_bind_group(
            context,
            &read_layout,
            &normal_view,
            &depth_view,
        );

        Self {
            normal_texture,
            normal_view,
            depth_texture,
            depth_view,
            read_layout,
            read_bind_group,
            width,
            height,
        }
    }

    fn create_normal_texture(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture =
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("GBuffer Normal"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: NORMAL_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn create_depth_texture(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture =
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("GBuffer Depth"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn create_read_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        normal_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("GBuffer Read Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            normal_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            depth_view,
                        ),
                    },
                ],
            })
    }

    /// Recreate both targets at the new resolution (clamped to >= 1).
    ///
    /// No-op when the clamped dimensions match the current ones. Old
    /// textures are destroyed immediately; bind groups created against
    /// them must not still be in flight on the GPU — resize between
    /// frames, before any new bind group is created.
    pub fn resize(&mut self, context: &RenderContext, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        self.normal_texture.destroy();
        self.depth_texture.destroy();

        let (normal_texture, normal_view) =
            Self::create_normal_texture(context, width, height);
        let (depth_texture, depth_view) =
            Self::create_depth_texture(context, width, height);
        self.read_bind_group = Self::create_read_bind_group(
            context,
            &self.read_layout,
            &normal_view,
            &depth_view,
        );
        self.normal_texture = normal_texture;
        self.normal_view = normal_view;
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Begin the geometry pass writing into this buffer.
    ///
    /// The normal target is cleared to zero and depth to 1.0. The caller
    /// binds its geometry pipelines, draws, and ends the pass.
    pub fn begin_geometry_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Geometry Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.normal_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        })
    }

    /// Bind group exposing normal + depth as sampled textures.
    pub fn read_bind_group(&self) -> &wgpu::BindGroup {
        &self.read_bind_group
    }

    /// Layout of [`read_bind_group`](GBuffer::read_bind_group).
    pub fn read_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.read_layout
    }

    /// View of the normal target.
    pub fn normal_view(&self) -> &wgpu::TextureView {
        &self.normal_view
    }

    /// View of the depth target.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Current target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Release both GPU textures.
    ///
    /// Call once, after all GPU work referencing them has completed.
    pub fn destroy(&self) {
        self.normal_texture.destroy();
        self.depth_texture.destroy();
    }
}
