//! Runtime-tunable SSAO options with TOML preset support.
//!
//! Options serialize to/from TOML; `#[serde(default)]` means partial files
//! (e.g. only overriding `radius`) work correctly.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Configuration surface for the SSAO passes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ambient Occlusion", inline)]
#[serde(default)]
pub struct SsaoOptions {
    /// Occlusion sample distance in world units.
    #[schemars(title = "AO Radius", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub radius: f32,
    /// Depth bias preventing self-occlusion.
    #[schemars(skip)]
    pub bias: f32,
    /// Hemisphere sample count (quality/cost tradeoff).
    #[schemars(title = "Sample Count", range(min = 1, max = 64))]
    pub kernel_size: u32,
    /// Rotation noise tile edge length in texels.
    #[schemars(skip)]
    pub noise_size: u32,
    /// Occlusion strength multiplier (exponent on the AO factor).
    #[schemars(title = "AO Strength", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub intensity: f32,
    /// Render AO at half target size for throughput.
    #[schemars(title = "Half Resolution")]
    pub half_resolution: bool,
}

impl Default for SsaoOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            bias: 0.025,
            kernel_size: 16,
            noise_size: 4,
            intensity: 1.0,
            half_resolution: true,
        }
    }
}

impl SsaoOptions {
    /// Clamp degenerate values to valid ranges, warning once per field.
    ///
    /// Zero/negative `radius` or `bias` and zero `kernel_size` or
    /// `noise_size` would produce NaN or zero-length sample vectors in
    /// kernel/noise generation; they are rejected here at the config
    /// boundary.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.radius <= 0.0 {
            log::warn!(
                "SSAO radius {} is not positive, clamping to 0.01",
                self.radius
            );
            self.radius = 0.01;
        }
        if self.bias <= 0.0 {
            log::warn!(
                "SSAO bias {} is not positive, clamping to 0.001",
                self.bias
            );
            self.bias = 0.001;
        }
        if self.kernel_size == 0 {
            log::warn!("SSAO kernel size 0 is invalid, clamping to 1");
            self.kernel_size = 1;
        }
        if self.noise_size == 0 {
            log::warn!("SSAO noise size 0 is invalid, clamping to 1");
            self.noise_size = 1;
        }
        self
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the file cannot be read and
    /// [`RenderError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RenderError::OptionsParse(format!(
                "failed to parse {}: {e}",
                path.display()
            ))
        })
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OptionsParse`] on serialization failure and
    /// [`RenderError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            RenderError::OptionsParse(format!(
                "failed to serialize options: {e}"
            ))
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = SsaoOptions::default();
        assert_eq!(opts.radius, 0.5);
        assert_eq!(opts.bias, 0.025);
        assert_eq!(opts.kernel_size, 16);
        assert_eq!(opts.noise_size, 4);
        assert_eq!(opts.intensity, 1.0);
        assert!(opts.half_resolution);
    }

    #[test]
    fn sanitize_clamps_degenerate_values() {
        let opts = SsaoOptions {
            radius: -1.0,
            bias: 0.0,
            kernel_size: 0,
            noise_size: 0,
            intensity: 1.0,
            half_resolution: false,
        }
        .sanitized();
        assert!(opts.radius > 0.0);
        assert!(opts.bias > 0.0);
        assert_eq!(opts.kernel_size, 1);
        assert_eq!(opts.noise_size, 1);
    }

    #[test]
    fn sanitize_leaves_valid_options_untouched() {
        let opts = SsaoOptions::default();
        assert_eq!(opts.clone().sanitized(), opts);
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_fields() {
        let opts: SsaoOptions =
            toml::from_str("radius = 0.75\nkernel_size = 32\n").unwrap();
        assert_eq!(opts.radius, 0.75);
        assert_eq!(opts.kernel_size, 32);
        assert_eq!(opts.bias, SsaoOptions::default().bias);
        assert!(opts.half_resolution);
    }

    #[test]
    fn toml_round_trip() {
        let opts = SsaoOptions {
            radius: 0.8,
            bias: 0.05,
            kernel_size: 24,
            noise_size: 8,
            intensity: 1.5,
            half_resolution: false,
        };
        let text = toml::to_string_pretty(&opts).unwrap();
        let parsed: SsaoOptions = toml::from_str(&text).unwrap();
        assert_eq!(parsed, opts);
    }
}
