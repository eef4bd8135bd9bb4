//! Greedy word wrap and vertical placement of the overlay text.

/// Measures the rendered width of a string at a font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

/// Fraction of the canvas width a line may occupy.
pub const MAX_LINE_WIDTH_RATIO: f32 = 0.9;
/// Gap between the text block and the bottom edge, as a fraction of height.
pub const BOTTOM_MARGIN_RATIO: f32 = 0.1;
pub const LINE_HEIGHT_RATIO: f32 = 1.1;

/// Positioned overlay text for one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub font_size: f32,
    pub stroke_width: f32,
    pub line_height: f32,
    /// Horizontal center every line is anchored to.
    pub center_x: f32,
    /// Top edge of the block.
    pub top: f32,
    pub lines: Vec<String>,
}

impl TextBlock {
    pub fn total_height(&self) -> f32 {
        self.line_height * self.lines.len() as f32
    }

    /// Vertical center of line `index`. Lines fill the block from `top`, so the
    /// last line's lower edge lands exactly on the bottom margin.
    pub fn line_center_y(&self, index: usize) -> f32 {
        self.top + (index as f32 + 0.5) * self.line_height
    }
}

/// Single left-to-right greedy pass.
///
/// A word joins the current line while the measured width of
/// `line + " " + word` stays within `max_width`; otherwise the line is closed
/// and the word starts a new one. A word wider than `max_width` ends up alone
/// on its line.
pub fn wrap_greedy(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure.measure(&candidate, font_size) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lay out `text` for a `width` x `height` canvas.
///
/// Font size is `floor(height / 12)`, stroke width a eighth of that. The
/// block is centered horizontally and sits with its bottom edge 10% of the
/// height above the canvas bottom.
pub fn layout_text(text: &str, width: u32, height: u32, measure: &dyn TextMeasure) -> TextBlock {
    let width = width as f32;
    let height = height as f32;

    let font_size = (height / 12.0).floor();
    let lines = wrap_greedy(text, width * MAX_LINE_WIDTH_RATIO, font_size, measure);
    let line_height = font_size * LINE_HEIGHT_RATIO;
    let total_height = line_height * lines.len() as f32;

    TextBlock {
        font_size,
        stroke_width: font_size / 8.0,
        line_height,
        center_x: width / 2.0,
        top: height - total_height - height * BOTTOM_MARGIN_RATIO,
        lines,
    }
}
