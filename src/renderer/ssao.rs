//! Hemisphere-sampled SSAO with a separable depth-aware blur.

use glam::Mat4;
use rand::Rng;
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, depth_texture_2d, filtering_sampler,
    linear_sampler, nearest_repeat_sampler, non_filtering_sampler,
    read_only_storage_buffer, texture_2d, texture_2d_unfilterable,
    uniform_buffer, ScreenSpacePipelineDef,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::options::SsaoOptions;

/// Format of the AO and blur-temp targets (single-channel occlusion).
pub const AO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

/// Format of the rotation noise tile.
pub const NOISE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba32Float;

/// Depth delta beyond which the blur treats a tap as a different surface.
const DEPTH_DISCONTINUITY_THRESHOLD: f32 = 0.002;

/// SSAO parameters uniform - must match the WGSL `SsaoParams` struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SsaoParams {
    /// Projection matrix.
    pub proj: [[f32; 4]; 4],
    /// Inverse projection matrix.
    pub inv_proj: [[f32; 4]; 4],
    /// AO target resolution divided by the noise tile size.
    pub noise_scale: [f32; 2],
    /// Sampling radius in view space.
    pub radius: f32,
    /// Depth bias to prevent self-occlusion.
    pub bias: f32,
    /// Hemisphere sample count.
    pub kernel_size: u32,
    /// Exponent applied to the AO factor.
    pub intensity: f32,
    /// Padding for GPU alignment.
    pub _pad: [f32; 2],
}

/// Blur parameters uniform - must match the WGSL `BlurParams` struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurParams {
    /// Blur axis: (1,0) horizontal, (0,1) vertical.
    pub direction: [f32; 2],
    /// Reciprocal AO target size.
    pub texel_size: [f32; 2],
    /// Depth delta beyond which taps are skipped.
    pub depth_threshold: f32,
    /// Padding for GPU alignment.
    pub _pad: [f32; 3],
}

/// Kernel scale curve: early samples cluster near the origin, later ones
/// reach the full radius, biasing density toward the surface for sharper
/// contact occlusion.
fn sample_scale(index: u32, kernel_size: u32) -> f32 {
    let t = index as f32 / kernel_size as f32;
    0.1 + t * t * 0.9
}

/// Generate `kernel_size` hemisphere sample vectors (positive Z), stored as
/// vec4 with zero padding for GPU alignment.
fn generate_kernel(kernel_size: u32) -> Vec<[f32; 4]> {
    let mut rng = rand::rng();
    let mut kernel = Vec::with_capacity(kernel_size as usize);

    for i in 0..kernel_size {
        let mut sample = [
            rng.random::<f32>() * 2.0 - 1.0,
            rng.random::<f32>() * 2.0 - 1.0,
            rng.random::<f32>(),
        ];

        let len = (sample[0] * sample[0]
            + sample[1] * sample[1]
            + sample[2] * sample[2])
            .sqrt();
        if len > 0.0 {
            sample[0] /= len;
            sample[1] /= len;
            sample[2] /= len;
        }

        let scale = sample_scale(i, kernel_size);
        kernel.push([
            sample[0] * scale,
            sample[1] * scale,
            sample[2] * scale,
            0.0,
        ]);
    }

    kernel
}

/// Generate `noise_size²` random unit 2D tangent-space rotation vectors
/// (z = 0), as Rgba32Float texel data.
fn generate_noise(noise_size: u32) -> Vec<f32> {
    let mut rng = rand::rng();
    let mut data = Vec::with_capacity((noise_size * noise_size * 4) as usize);

    for _ in 0..noise_size * noise_size {
        let x = rng.random::<f32>() * 2.0 - 1.0;
        let y = rng.random::<f32>() * 2.0 - 1.0;
        let len = x.hypot(y);
        let (nx, ny) = if len > 0.0 { (x / len, y / len) } else { (1.0, 0.0) };
        data.extend_from_slice(&[nx, ny, 0.0, 0.0]);
    }

    data
}

/// Which GPU resources a new option set invalidates.
///
/// Everything else (radius, bias, intensity, noise scale) flows through
/// the per-frame uniform write and invalidates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfigDelta {
    /// `kernel_size` changed: regenerate the kernel storage buffer.
    kernel: bool,
    /// `noise_size` changed: regenerate the rotation noise tile.
    noise: bool,
    /// `half_resolution` changed: recreate the AO/blur targets.
    targets: bool,
}

fn config_delta(old: &SsaoOptions, new: &SsaoOptions) -> ConfigDelta {
    ConfigDelta {
        kernel: new.kernel_size != old.kernel_size,
        noise: new.noise_size != old.noise_size,
        targets: new.half_resolution != old.half_resolution,
    }
}

/// AO target size for the given full resolution and half-resolution flag,
/// clamped to >= 1 per axis.
fn target_size(width: u32, height: u32, half_resolution: bool) -> (u32, u32) {
    let width = width.max(1);
    let height = height.max(1);
    if half_resolution {
        ((width / 2).max(1), (height / 2).max(1))
    } else {
        (width, height)
    }
}

/// Computes a per-pixel ambient-occlusion factor from the G-buffer and
/// denoises it with a two-pass separable depth-aware blur.
///
/// The AO and blur-temp targets are ping-ponged: the SSAO pass writes the
/// AO texture, the horizontal blur writes the temp texture, the vertical
/// blur writes the final result back into the AO texture.
///
/// Bind groups are created per frame (camera matrices change every frame);
/// [`resize`](SsaoPass::resize) must happen between frames, before any new
/// bind group is created, since old textures are destroyed immediately.
pub struct SsaoPass {
    options: SsaoOptions,

    full_width: u32,
    full_height: u32,
    width: u32,
    height: u32,

    ao_texture: wgpu::Texture,
    ao_view: wgpu::TextureView,
    blur_texture: wgpu::Texture,
    blur_view: wgpu::TextureView,
    noise_texture: wgpu::Texture,
    noise_view: wgpu::TextureView,

    kernel_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
    blur_h_buffer: wgpu::Buffer,
    blur_v_buffer: wgpu::Buffer,

    linear_sampler: wgpu::Sampler,
    noise_sampler: wgpu::Sampler,

    ssao_layout: wgpu::BindGroupLayout,
    ssao_pipeline: wgpu::RenderPipeline,
    blur_layout: wgpu::BindGroupLayout,
    blur_pipeline: wgpu::RenderPipeline,
}

impl SsaoPass {
    /// Create the SSAO pass for the given full-resolution target size.
    ///
    /// Degenerate option values are clamped; see
    /// [`SsaoOptions::sanitized`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ShaderCompose`] if a shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        width: u32,
        height: u32,
        options: SsaoOptions,
    ) -> Result<Self, RenderError> {
        let options = options.sanitized();
        let full_width = width.max(1);
        let full_height = height.max(1);
        let (width, height) =
            target_size(full_width, full_height, options.half_resolution);

        let (ao_texture, ao_view) =
            Self::create_ao_texture(context, width, height, "SSAO AO");
        let (blur_texture, blur_view) =
            Self::create_ao_texture(context, width, height, "SSAO Blur Temp");
        let (noise_texture, noise_view) =
            Self::create_noise_texture(context, options.noise_size);

        let kernel_buffer =
            Self::create_kernel_buffer(context, options.kernel_size);
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("SSAO Params"),
                contents: bytemuck::cast_slice(&[Self::params_for(
                    &options,
                    width,
                    height,
                    Mat4::IDENTITY,
                    Mat4::IDENTITY,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let blur_h_buffer = Self::create_blur_buffer(
            context,
            "SSAO Blur H Params",
            [1.0, 0.0],
            width,
            height,
        );
        let blur_v_buffer = Self::create_blur_buffer(
            context,
            "SSAO Blur V Params",
            [0.0, 1.0],
            width,
            height,
        );

        let linear_sampler =
            linear_sampler(&context.device, "SSAO Sampler");
        let noise_sampler =
            nearest_repeat_sampler(&context.device, "SSAO Noise Sampler");

        let ssao_layout = Self::create_ssao_bind_group_layout(context);
        let ssao_pipeline =
            Self::create_ssao_pipeline(context, composer, &ssao_layout)?;
        let blur_layout = Self::create_blur_bind_group_layout(context);
        let blur_pipeline =
            Self::create_blur_pipeline(context, composer, &blur_layout)?;

        Ok(Self {
            options,
            full_width,
            full_height,
            width,
            height,
            ao_texture,
            ao_view,
            blur_texture,
            blur_view,
            noise_texture,
            noise_view,
            kernel_buffer,
            params_buffer,
            blur_h_buffer,
            blur_v_buffer,
            linear_sampler,
            noise_sampler,
            ssao_layout,
            ssao_pipeline,
            blur_layout,
            blur_pipeline,
        })
    }

    fn params_for(
        options: &SsaoOptions,
        width: u32,
        height: u32,
        proj: Mat4,
        inv_proj: Mat4,
    ) -> SsaoParams {
        SsaoParams {
            proj: proj.to_cols_array_2d(),
            inv_proj: inv_proj.to_cols_array_2d(),
            noise_scale: [
                width as f32 / options.noise_size as f32,
                height as f32 / options.noise_size as f32,
            ],
            radius: options.radius,
            bias: options.bias,
            kernel_size: options.kernel_size,
            intensity: options.intensity,
            _pad: [0.0; 2],
        }
    }

    fn create_ao_texture(
        context: &RenderContext,
        width: u32,
        height: u32,
        label: &str,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture =
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: AO_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn create_noise_texture(
        context: &RenderContext,
        noise_size: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let data = generate_noise(noise_size);
        let texture =
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("SSAO Noise"),
                size: wgpu::Extent3d {
                    width: noise_size,
                    height: noise_size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: NOISE_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });

        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&data),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(noise_size * 16),
                rows_per_image: Some(noise_size),
            },
            wgpu::Extent3d {
                width: noise_size,
                height: noise_size,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn create_kernel_buffer(
        context: &RenderContext,
        kernel_size: u32,
    ) -> wgpu::Buffer {
        let kernel = generate_kernel(kernel_size);
        context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("SSAO Kernel"),
                contents: bytemuck::cast_slice(&kernel),
                usage: wgpu::BufferUsages::STORAGE,
            },
        )
    }

    fn create_blur_buffer(
        context: &RenderContext,
        label: &str,
        direction: [f32; 2],
        width: u32,
        height: u32,
    ) -> wgpu::Buffer {
        let params = BlurParams {
            direction,
            texel_size: [1.0 / width as f32, 1.0 / height as f32],
            depth_threshold: DEPTH_DISCONTINUITY_THRESHOLD,
            _pad: [0.0; 3],
        };
        context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        )
    }

    fn create_ssao_bind_group_layout(
        context: &RenderContext,
    ) -> wgpu::BindGroupLayout {
        context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    depth_texture_2d(1),
                    texture_2d_unfilterable(2),
                    filtering_sampler(3),
                    non_filtering_sampler(4),
                    read_only_storage_buffer(5),
                    uniform_buffer(6),
                ],
            },
        )
    }

    fn create_ssao_pipeline(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let shader = composer.compose(&context.device, Shader::Ssao)?;
        Ok(create_screen_space_pipeline(
            &context.device,
            &ScreenSpacePipelineDef {
                label: "SSAO",
                shader: &shader,
                format: AO_FORMAT,
                blend: None,
                bind_group_layouts: &[bind_group_layout],
            },
        ))
    }

    fn create_blur_bind_group_layout(
        context: &RenderContext,
    ) -> wgpu::BindGroupLayout {
        context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Blur Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    depth_texture_2d(2),
                    uniform_buffer(3),
                ],
            },
        )
    }

    fn create_blur_pipeline(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let shader = composer.compose(&context.device, Shader::SsaoBlur)?;
        Ok(create_screen_space_pipeline(
            &context.device,
            &ScreenSpacePipelineDef {
                label: "SSAO Blur",
                shader: &shader,
                format: AO_FORMAT,
                blend: None,
                bind_group_layouts: &[bind_group_layout],
            },
        ))
    }

    /// Recompute the AO target size for a new full resolution.
    ///
    /// No-op when the computed target size is unchanged; otherwise the AO
    /// and blur-temp textures are destroyed and recreated, and the blur
    /// texel sizes rewritten. The noise texture and all buffers survive.
    /// Must happen between frames (no in-flight bind groups).
    pub fn resize(&mut self, context: &RenderContext, width: u32, height: u32) {
        self.full_width = width.max(1);
        self.full_height = height.max(1);
        let (width, height) = target_size(
            self.full_width,
            self.full_height,
            self.options.half_resolution,
        );
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        self.ao_texture.destroy();
        self.blur_texture.destroy();
        let (ao_texture, ao_view) =
            Self::create_ao_texture(context, width, height, "SSAO AO");
        let (blur_texture, blur_view) =
            Self::create_ao_texture(context, width, height, "SSAO Blur Temp");
        self.ao_texture = ao_texture;
        self.ao_view = ao_view;
        self.blur_texture = blur_texture;
        self.blur_view = blur_view;

        self.write_blur_params(context);
    }

    /// Rewrite both blur uniform buffers for the current target size.
    fn write_blur_params(&self, context: &RenderContext) {
        let texel_size =
            [1.0 / self.width as f32, 1.0 / self.height as f32];
        for (buffer, direction) in [
            (&self.blur_h_buffer, [1.0, 0.0]),
            (&self.blur_v_buffer, [0.0, 1.0]),
        ] {
            let params = BlurParams {
                direction,
                texel_size,
                depth_threshold: DEPTH_DISCONTINUITY_THRESHOLD,
                _pad: [0.0; 3],
            };
            context.queue.write_buffer(
                buffer,
                0,
                bytemuck::cast_slice(&[params]),
            );
        }
    }

    /// Merge a new option set into the pass.
    ///
    /// Regenerates the kernel buffer iff `kernel_size` changed, and
    /// recreates the AO targets iff `half_resolution` changed. Everything
    /// else (radius, bias, intensity, noise scale) flows through the
    /// per-frame uniform write in [`create_bind_group`].
    ///
    /// A changed `noise_size` regenerates the noise tile as well.
    ///
    /// [`create_bind_group`]: SsaoPass::create_bind_group
    pub fn update_config(
        &mut self,
        context: &RenderContext,
        options: SsaoOptions,
    ) {
        let options = options.sanitized();
        let delta = config_delta(&self.options, &options);
        self.options = options;

        if delta.kernel {
            self.kernel_buffer.destroy();
            self.kernel_buffer =
                Self::create_kernel_buffer(context, self.options.kernel_size);
        }
        if delta.noise {
            self.noise_texture.destroy();
            let (noise_texture, noise_view) =
                Self::create_noise_texture(context, self.options.noise_size);
            self.noise_texture = noise_texture;
            self.noise_view = noise_view;
        }
        if delta.targets {
            self.resize(context, self.full_width, self.full_height);
        }
    }

    /// Write this frame's camera matrices into the params buffer and build
    /// the SSAO bind group against the current G-buffer views.
    pub fn create_bind_group(
        &self,
        context: &RenderContext,
        normal_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        proj: Mat4,
        inv_proj: Mat4,
    ) -> wgpu::BindGroup {
        let params = Self::params_for(
            &self.options,
            self.width,
            self.height,
            proj,
            inv_proj,
        );
        context.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[params]),
        );

        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("SSAO Bind Group"),
                layout: &self.ssao_layout,
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
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            &self.noise_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(
                            &self.linear_sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::Sampler(
                            &self.noise_sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: self.kernel_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 6,
                        resource: self.params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    fn create_blur_bind_group(
        &self,
        context: &RenderContext,
        label: &str,
        input_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.blur_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            input_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(
                            &self.linear_sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            depth_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Bind group for the horizontal blur (reads the raw AO texture).
    pub fn create_horizontal_blur_bind_group(
        &self,
        context: &RenderContext,
        depth_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        self.create_blur_bind_group(
            context,
            "SSAO Blur H Bind Group",
            &self.ao_view,
            depth_view,
            &self.blur_h_buffer,
        )
    }

    /// Bind group for the vertical blur (reads the blur temp texture).
    pub fn create_vertical_blur_bind_group(
        &self,
        context: &RenderContext,
        depth_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        self.create_blur_bind_group(
            context,
            "SSAO Blur V Bind Group",
            &self.blur_view,
            depth_view,
            &self.blur_v_buffer,
        )
    }

    fn begin_ao_pass<'a>(
        encoder: &'a mut wgpu::CommandEncoder,
        label: &str,
        view: &'a wgpu::TextureView,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // Untouched pixels default to fully lit.
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        })
    }

    /// Begin the SSAO pass writing into the AO texture.
    ///
    /// The caller sets [`pipeline`](SsaoPass::pipeline) and the bind group
    /// from [`create_bind_group`](SsaoPass::create_bind_group), draws a
    /// fullscreen triangle, and ends the pass.
    pub fn begin_ssao_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        Self::begin_ao_pass(encoder, "SSAO Pass", &self.ao_view)
    }

    /// Begin the horizontal blur pass writing into the blur temp texture.
    pub fn begin_horizontal_blur_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        Self::begin_ao_pass(encoder, "SSAO Blur H Pass", &self.blur_view)
    }

    /// Begin the vertical blur pass writing the final result back into the
    /// AO texture.
    pub fn begin_vertical_blur_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        Self::begin_ao_pass(encoder, "SSAO Blur V Pass", &self.ao_view)
    }

    /// Pipeline for the SSAO pass.
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.ssao_pipeline
    }

    /// Pipeline for both blur passes.
    pub fn blur_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.blur_pipeline
    }

    /// View of the final AO texture (valid after the vertical blur pass).
    pub fn ao_texture_view(&self) -> &wgpu::TextureView {
        &self.ao_view
    }

    /// AO target width in pixels (half of full width when
    /// `half_resolution` is set).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// AO target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full-resolution target width this pass was last sized for.
    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    /// Full-resolution target height this pass was last sized for.
    pub fn full_height(&self) -> u32 {
        self.full_height
    }

    /// Current (sanitized) option set.
    pub fn options(&self) -> &SsaoOptions {
        &self.options
    }

    /// Byte length of the kernel storage buffer
    /// (`kernel_size * 16`).
    pub fn kernel_buffer_size(&self) -> u64 {
        self.kernel_buffer.size()
    }

    /// Release every GPU resource owned by this pass.
    ///
    /// Call once, after all GPU work referencing them has completed.
    pub fn destroy(&self) {
        self.ao_texture.destroy();
        self.blur_texture.destroy();
        self.noise_texture.destroy();
        self.kernel_buffer.destroy();
        self.params_buffer.destroy();
        self.blur_h_buffer.destroy();
        self.blur_v_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_has_requested_length_and_positive_z() {
        for size in [1_u32, 4, 16, 64] {
            let kernel = generate_kernel(size);
            assert_eq!(kernel.len(), size as usize);
            for sample in &kernel {
                assert!(sample[2] >= 0.0, "hemisphere sample with z < 0");
                assert_eq!(sample[3], 0.0, "padding component must be zero");
            }
        }
    }

    #[test]
    fn kernel_samples_stay_within_scaled_radius() {
        let kernel = generate_kernel(32);
        for (i, sample) in kernel.iter().enumerate() {
            let len = (sample[0] * sample[0]
                + sample[1] * sample[1]
                + sample[2] * sample[2])
                .sqrt();
            let scale = sample_scale(i as u32, 32);
            assert!(
                len <= scale + 1e-5,
                "sample {i} length {len} exceeds scale {scale}"
            );
        }
    }

    #[test]
    fn sample_scale_is_non_decreasing() {
        let n = 16;
        for i in 1..n {
            assert!(sample_scale(i, n) >= sample_scale(i - 1, n));
        }
    }

    #[test]
    fn sample_scale_matches_curve() {
        assert_eq!(sample_scale(0, 16), 0.1);
        let t = 8.0_f32 / 16.0;
        assert!((sample_scale(8, 16) - (0.1 + t * t * 0.9)).abs() < 1e-6);
    }

    #[test]
    fn kernel_byte_length_is_sixteen_per_sample() {
        let kernel = generate_kernel(32);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&kernel).len(), 512);
    }

    #[test]
    fn noise_vectors_are_unit_length_tangent_rotations() {
        let noise = generate_noise(4);
        assert_eq!(noise.len(), 4 * 4 * 4);
        for texel in noise.chunks_exact(4) {
            let len = texel[0].hypot(texel[1]);
            assert!((len - 1.0).abs() < 1e-5, "rotation not unit length");
            assert_eq!(texel[2], 0.0, "rotation must lie in the XY plane");
        }
    }

    #[test]
    fn target_size_halves_and_floors() {
        assert_eq!(target_size(1920, 1080, true), (960, 540));
        assert_eq!(target_size(3840, 2160, true), (1920, 1080));
        assert_eq!(target_size(1921, 1081, true), (960, 540));
        assert_eq!(target_size(1920, 1080, false), (1920, 1080));
    }

    #[test]
    fn target_size_clamps_to_one() {
        assert_eq!(target_size(1, 1, true), (1, 1));
        assert_eq!(target_size(0, 0, false), (1, 1));
    }

    #[test]
    fn intensity_change_invalidates_nothing() {
        let old = SsaoOptions::default();
        let new = SsaoOptions {
            intensity: 2.0,
            radius: 0.8,
            bias: 0.05,
            ..old.clone()
        };
        let delta = config_delta(&old, &new);
        assert!(!delta.kernel);
        assert!(!delta.noise);
        assert!(!delta.targets);
    }

    #[test]
    fn kernel_size_change_invalidates_only_the_kernel() {
        let old = SsaoOptions::default();
        let new = SsaoOptions {
            kernel_size: 32,
            ..old.clone()
        };
        let delta = config_delta(&old, &new);
        assert!(delta.kernel);
        assert!(!delta.noise);
        assert!(!delta.targets);
    }

    #[test]
    fn noise_size_change_invalidates_only_the_noise_tile() {
        let old = SsaoOptions::default();
        let new = SsaoOptions {
            noise_size: 8,
            ..old.clone()
        };
        let delta = config_delta(&old, &new);
        assert!(!delta.kernel);
        assert!(delta.noise);
        assert!(!delta.targets);
    }

    #[test]
    fn half_resolution_change_invalidates_only_the_targets() {
        let old = SsaoOptions::default();
        let new = SsaoOptions {
            half_resolution: false,
            ..old.clone()
        };
        let delta = config_delta(&old, &new);
        assert!(!delta.kernel);
        assert!(!delta.noise);
        assert!(delta.targets);
    }

    #[test]
    fn uniform_structs_are_sixteen_byte_aligned() {
        assert_eq!(size_of::<SsaoParams>(), 160);
        assert_eq!(size_of::<BlurParams>(), 32);
        assert_eq!(size_of::<SsaoParams>() % 16, 0);
        assert_eq!(size_of::<BlurParams>() % 16, 0);
    }
}
