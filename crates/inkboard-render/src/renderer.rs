//! Drawing surface abstraction.

use kurbo::{BezPath, Point, Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Failed to load font: {0}")]
    Font(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Unsupported on this surface: {0}")]
    Unsupported(&'static str),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A 2D raster target the shape renderer draws onto.
///
/// Coordinates are in pixels with the origin at the top-left.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> Size;

    /// Resize, discarding the current content.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Make `rect` fully transparent.
    fn clear(&mut self, rect: Rect);

    /// Fill a path using the non-zero winding rule.
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Stroke a path with round caps and joins.
    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Advance width and line height of `text`.
    fn measure_text(&self, text: &str, font_size: f64) -> Size;

    /// Encode the content as PNG with `background` composited behind it.
    fn encode_png(&self, background: Color) -> RenderResult<Vec<u8>>;

    /// Clear the whole surface.
    fn clear_all(&mut self) {
        let rect = self.size().to_rect();
        self.clear(rect);
    }
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_rgba_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}
