//! Thumbnail compositor.
//!
//! Stretches a base image over a fixed-size canvas, overlays the title as
//! stroked white text wrapped near the bottom edge, and encodes the result as
//! JPEG.

pub mod layout;
pub mod text_layer;

pub use layout::{layout_text, wrap_greedy, TextBlock, TextMeasure};
pub use text_layer::SvgTextRenderer;

use cf_protocol::config_models::ThumbnailSettings;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Failed to decode base image: {0}")]
    Decode(String),
    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),
    #[error("Failed to build text layer: {0}")]
    Svg(String),
    #[error("Failed to rasterize text layer: {0}")]
    Raster(String),
}

#[derive(Clone)]
pub struct Compositor {
    settings: ThumbnailSettings,
    text: SvgTextRenderer,
}

impl Compositor {
    /// Create a compositor using the system fonts plus `settings.font_dir`.
    pub fn new(settings: ThumbnailSettings) -> Self {
        let text = SvgTextRenderer::new(
            settings.font_family.clone(),
            settings.font_dir.as_deref().map(Path::new),
        );
        Self { settings, text }
    }

    /// Create a compositor with an explicit text renderer.
    pub fn with_renderer(settings: ThumbnailSettings, text: SvgTextRenderer) -> Self {
        Self { settings, text }
    }

    /// Lay out `text` for this compositor's canvas.
    pub fn layout(&self, text: &str) -> TextBlock {
        layout_text(text, self.settings.width, self.settings.height, &self.text)
    }

    /// Compose a thumbnail from an encoded base image and overlay text.
    ///
    /// The output always has the configured canvas size regardless of the
    /// input's dimensions; the aspect ratio is not preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Decode`] when `base_image` is not a supported
    /// image, and [`ComposeError::Encode`] when the JPEG cannot be written.
    pub fn compose(&self, base_image: &[u8], text: &str) -> Result<Vec<u8>, ComposeError> {
        let (width, height) = (self.settings.width, self.settings.height);

        let decoded =
            image::load_from_memory(base_image).map_err(|e| ComposeError::Decode(e.to_string()))?;
        let mut canvas = decoded
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();

        let block = self.layout(text);
        let layer = self.text.render(&block, width, height)?;
        blend_premultiplied(&mut canvas, &layer);

        let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.settings.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| ComposeError::Encode(e.to_string()))?;

        tracing::debug!(lines = block.lines.len(), bytes = out.len(), "thumbnail composed");
        Ok(out)
    }
}

/// Source-over blend of a premultiplied RGBA layer onto an opaque canvas.
fn blend_premultiplied(canvas: &mut RgbaImage, layer: &[u8]) {
    for (dst, src) in canvas.pixels_mut().zip(layer.chunks_exact(4)) {
        let inv_alpha = 255 - u16::from(src[3]);
        for c in 0..3 {
            let blended = u16::from(src[c]) + (u16::from(dst.0[c]) * inv_alpha + 127) / 255;
            dst.0[c] = blended.min(255) as u8;
        }
        dst.0[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::mock::sample_png;
    use std::sync::Arc;
    use usvg::fontdb;

    fn compositor() -> Compositor {
        let renderer =
            SvgTextRenderer::with_fontdb("sans-serif", Arc::new(fontdb::Database::new()));
        Compositor::with_renderer(ThumbnailSettings::default(), renderer)
    }

    #[test]
    fn test_compose_outputs_fixed_canvas() {
        let base = sample_png(300, 500).unwrap();
        let out = compositor().compose(&base, "A title that is long enough").unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1280, 720));
    }

    #[test]
    fn test_compose_is_dimension_stable() {
        let compositor = compositor();
        let base = sample_png(64, 64).unwrap();
        let first = compositor.compose(&base, "Same").unwrap();
        let second = compositor.compose(&base, "Same").unwrap();
        let first = image::load_from_memory(&first).unwrap();
        let second = image::load_from_memory(&second).unwrap();
        assert_eq!(
            (first.width(), first.height()),
            (second.width(), second.height())
        );
    }

    #[test]
    fn test_compose_rejects_undecodable_input() {
        let result = compositor().compose(b"definitely not an image", "Title");
        assert!(matches!(result, Err(ComposeError::Decode(_))));
    }

    #[test]
    fn test_system_fonts_wrap_and_paint_title() {
        let renderer = SvgTextRenderer::new("sans-serif", None);
        if renderer.face_count() == 0 {
            // No fonts installed on this machine
            return;
        }
        assert!(renderer.measure("Hello", 60.0) > 0.0);

        let compositor = Compositor::with_renderer(ThumbnailSettings::default(), renderer.clone());
        let title = "Ten surprising habits of people who always wake up a few minutes \
                     before their alarm goes off";
        let block = compositor.layout(title);
        assert!(block.lines.len() > 1, "expected a wrap, got {:?}", block.lines);
        for line in &block.lines {
            let width = renderer.measure(line, block.font_size);
            assert!(width > 0.0 && width <= 1152.0, "{line:?} is {width}px wide");
        }

        let base = sample_png(160, 90).unwrap();
        let out = compositor.compose(&base, title).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();

        let band = (block.top.max(0.0) as u32)..648;
        let (mut white, mut black) = (0usize, 0usize);
        for y in band {
            for x in 0..decoded.width() {
                let [r, g, b] = decoded.get_pixel(x, y).0;
                if r > 230 && g > 230 && b > 230 {
                    white += 1;
                } else if r < 30 && g < 30 && b < 30 {
                    black += 1;
                }
            }
        }
        assert!(white > 1000, "only {white} white pixels in the text band");
        assert!(black > 1000, "only {black} black pixels in the text band");

        // The band above the block keeps the base color
        let above = decoded.get_pixel(640, 40).0;
        assert!(above[2] > above[0], "unexpected pixel {above:?} above the text");
    }

    #[test]
    fn test_blend_premultiplied() {
        let mut canvas = RgbaImage::from_pixel(2, 1, image::Rgba([100, 100, 100, 255]));
        // Opaque white, then transparent
        let layer = [255, 255, 255, 255, 0, 0, 0, 0];
        blend_premultiplied(&mut canvas, &layer);
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(1, 0).0, [100, 100, 100, 255]);
    }
}
