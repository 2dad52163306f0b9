//! Page rendering options.

use image::codecs::png::CompressionType;

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// Options for rasterizing pages and writing them out.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Rendering resolution in dots per inch
    pub dpi: u16,

    /// Spend extra time on smaller PNG files
    pub optimize_png: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering resolution.
    pub fn with_dpi(mut self, dpi: u16) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    /// Enable or disable PNG size optimization.
    pub fn with_optimize_png(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Scale factor from PDF points to device pixels.
    pub fn scale(&self) -> f32 {
        f32::from(self.dpi) / POINTS_PER_INCH
    }

    pub(crate) fn compression(&self) -> CompressionType {
        if self.optimize_png {
            CompressionType::Best
        } else {
            CompressionType::Default
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 200,
            optimize_png: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new().with_dpi(144).with_optimize_png(false);
        assert_eq!(options.dpi, 144);
        assert!((options.scale() - 2.0).abs() < f32::EPSILON);
        assert!(!options.optimize_png);
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.dpi, 200);
        assert!(options.optimize_png);
    }

    #[test]
    fn test_zero_dpi_is_clamped() {
        assert_eq!(RenderOptions::new().with_dpi(0).dpi, 1);
    }
}
