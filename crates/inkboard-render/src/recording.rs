//! A surface that records draw calls instead of rasterizing them.

use crate::renderer::{RenderResult, RendererError, Surface};
use inkboard_core::shapes::SerializableColor;
use kurbo::{BezPath, Point, Rect, Size};
use peniko::Color;

/// Average glyph advance as a fraction of the font size.
const ADVANCE_RATIO: f64 = 0.6;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Fill {
        path: BezPath,
        color: SerializableColor,
    },
    Stroke {
        path: BezPath,
        width: f64,
        color: SerializableColor,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        color: SerializableColor,
    },
}

/// Records every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width as f64, height as f64),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands recorded since the most recent full clear.
    pub fn since_last_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.size = Size::new(width as f64, height as f64);
        Ok(())
    }

    fn clear(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color: color.into(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            width,
            color: color.into(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color: color.into(),
        });
    }

    fn measure_text(&self, text: &str, font_size: f64) -> Size {
        Size::new(text.chars().count() as f64 * font_size * ADVANCE_RATIO, font_size)
    }

    fn encode_png(&self, _background: Color) -> RenderResult<Vec<u8>> {
        Err(RendererError::Unsupported("png encoding"))
    }
}
