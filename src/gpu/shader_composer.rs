//! WGSL shader composition with `#import` support via naga-oil.

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::RenderError;

/// Shaders shipped with this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Hemisphere-sampled ambient occlusion pass.
    Ssao,
    /// Separable depth-aware AO blur pass.
    SsaoBlur,
}

impl Shader {
    /// Human-readable label used for the wgpu shader module.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ssao => "SSAO",
            Self::SsaoBlur => "SSAO Blur",
        }
    }

    /// Embedded WGSL source.
    pub fn source(self) -> &'static str {
        match self {
            Self::Ssao => {
                include_str!("../../assets/shaders/screen/ssao.wgsl")
            }
            Self::SsaoBlur => {
                include_str!("../../assets/shaders/screen/ssao_blur.wgsl")
            }
        }
    }

    /// Source path, used in composer diagnostics.
    pub fn file_path(self) -> &'static str {
        match self {
            Self::Ssao => "screen/ssao.wgsl",
            Self::SsaoBlur => "screen/ssao_blur.wgsl",
        }
    }
}

/// Wraps [`Composer`] to provide shader composition with `#import` support.
///
/// Pre-loads the shared fullscreen-triangle module at construction time.
/// Consuming shaders pull it in with `#import marquee::fullscreen`. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Create a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ShaderCompose`] if a shared module fails to
    /// parse (a build defect, not a runtime condition).
    pub fn new() -> Result<Self, RenderError> {
        let mut composer = Composer::default();

        let file_path = "modules/fullscreen.wgsl";
        let _ = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: include_str!(
                    "../../assets/shaders/modules/fullscreen.wgsl"
                ),
                file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map_err(|e| RenderError::ShaderCompose {
                shader: file_path,
                message: format!("{e:?}"),
            })?;

        Ok(Self { composer })
    }

    /// Compose a shader (resolving `#import` directives) into a
    /// `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ShaderCompose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, RenderError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ShaderCompose`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, RenderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| RenderError::ShaderCompose {
                shader: shader.file_path(),
                message: format!("{e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = match ShaderComposer::new() {
            Ok(c) => c,
            Err(e) => panic!("failed to build composer: {e}"),
        };
        for shader in [Shader::Ssao, Shader::SsaoBlur] {
            if let Err(e) = composer.compose_naga(shader) {
                panic!("shader '{}' failed to compose: {e}", shader.file_path());
            }
        }
    }
}
