//! wgpu device, queue, and target-size container.

/// Owns the core wgpu handles plus the current target format and size.
///
/// The containing application owns adapter/device acquisition and the
/// presentation surface; this crate only ever renders into off-screen
/// targets sized to the values held here.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl RenderContext {
    /// Create a render context from an externally-owned device and queue.
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            device,
            queue,
            format,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// The surface/target color format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Current target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Record the new target size. Ignores zero-sized dimensions.
    ///
    /// Resolution-dependent resources (G-buffer, SSAO targets) must be
    /// resized separately; see their own `resize` methods.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}
