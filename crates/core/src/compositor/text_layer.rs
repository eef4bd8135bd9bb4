//! Overlay text rendered through SVG.
//!
//! Each line becomes an SVG `<text>` element with a black stroke painted
//! under a white fill. `usvg` shapes the text against a font database and
//! `resvg` rasterizes it into a transparent premultiplied RGBA layer.

use super::layout::{TextBlock, TextMeasure};
use super::ComposeError;
use quick_xml::escape::escape;
use std::path::Path;
use std::sync::Arc;
use usvg::fontdb;
use walkdir::WalkDir;

/// Canvas size used when measuring a single line; large enough that nothing
/// is culled.
const MEASURE_CANVAS: u32 = 8192;

#[derive(Clone)]
pub struct SvgTextRenderer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl SvgTextRenderer {
    /// Build a renderer backed by the system fonts plus any fonts under `font_dir`.
    pub fn new(font_family: impl Into<String>, font_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self::with_fontdb(font_family, Arc::new(db))
    }

    pub fn with_fontdb(font_family: impl Into<String>, fontdb: Arc<fontdb::Database>) -> Self {
        Self {
            fontdb,
            font_family: font_family.into(),
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: font_resolver(),
            ..Default::default()
        }
    }

    fn text_element(
        &self,
        x: f32,
        y: f32,
        font_size: f32,
        stroke_width: f32,
        content: &str,
    ) -> String {
        format!(
            r#"<text x="{x}" y="{y}" font-family="{family}" font-weight="bold" font-size="{font_size}" text-anchor="middle" dominant-baseline="middle" fill="white" stroke="black" stroke-width="{stroke_width}" stroke-linejoin="round" paint-order="stroke">{content}</text>"#,
            family = escape(&self.font_family),
            content = escape(content),
        )
    }

    /// Render the block into a `width` x `height` premultiplied RGBA layer.
    pub fn render(
        &self,
        block: &TextBlock,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ComposeError> {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for (index, line) in block.lines.iter().enumerate() {
            svg.push_str(&self.text_element(
                block.center_x,
                block.line_center_y(index),
                block.font_size,
                block.stroke_width,
                line,
            ));
        }
        svg.push_str("</svg>");

        let tree = usvg::Tree::from_str(&svg, &self.options())
            .map_err(|e| ComposeError::Svg(e.to_string()))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ComposeError::Raster(format!("cannot allocate {width}x{height} layer"))
        })?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap.take())
    }
}

impl TextMeasure for SvgTextRenderer {
    /// Width of the shaped fill outline. Text no font can render measures 0.
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        let element = format!(
            r#"<text x="0" y="{font_size}" font-family="{family}" font-weight="bold" font-size="{font_size}">{content}</text>"#,
            family = escape(&self.font_family),
            content = escape(text),
        );
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{MEASURE_CANVAS}" height="{MEASURE_CANVAS}">{element}</svg>"#
        );

        match usvg::Tree::from_str(&svg, &self.options()) {
            Ok(tree) => tree.root().bounding_box().width().max(0.0),
            Err(e) => {
                tracing::warn!(error = %e, "failed to measure overlay text");
                0.0
            }
        }
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    for entry in WalkDir::new(dir).into_iter().flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            continue;
        }
        if let Err(e) = db.load_font_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Resolve the requested families, then generic families, then any face at all.
fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families: Vec<fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(name) => fontdb::Family::Name(name),
                })
                .collect();
            families.push(fontdb::Family::SansSerif);

            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            };

            db.query(&query).or_else(|| db.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}
