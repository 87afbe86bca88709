//! Headless replay of recorded input.
//!
//! A script is a JSON object with an optional surface size, board config and
//! font file, plus a list of events fed to a [`Whiteboard`] in order.

use crate::error::{AppError, AppResult};
use crate::session::{KeyResponse, Whiteboard};
use inkboard_core::BoardConfig;
use inkboard_core::input::{KeyEvent, PointerEvent};
use inkboard_core::tools::{StyleUpdate, ToolKind};
use inkboard_render::{PixmapSurface, Surface};
use kurbo::Point;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// One input event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Tool { tool: ToolKind },
    Style(StyleUpdate),
    /// `{"type": "pointer", "phase": "down", "position": {"x": .., "y": ..}}`
    Pointer(PointerEvent),
    /// Type into the open text entry and commit it.
    Text { text: String },
    Key(KeyEvent),
    Erase { x: f64, y: f64 },
    Undo,
    Redo,
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub config: BoardConfig,
    /// TrueType/OpenType font for text; text is skipped without one.
    #[serde(default)]
    pub font: Option<PathBuf>,
    pub events: Vec<ScriptEvent>,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build a pixmap-backed board and replay every event on it.
    pub fn run(&self) -> AppResult<Whiteboard<PixmapSurface>> {
        let mut surface = PixmapSurface::new(self.width, self.height)?;
        if let Some(path) = &self.font {
            let bytes = std::fs::read(path).map_err(|source| AppError::Io {
                path: path.clone(),
                source,
            })?;
            surface.load_font(bytes)?;
        }
        let mut board = Whiteboard::with_config(surface, &self.config);
        let exports = replay(&mut board, &self.events)?;
        log::info!(
            "replayed {} events: {} elements, {} exports",
            self.events.len(),
            board.document().len(),
            exports.len()
        );
        Ok(board)
    }
}

/// Feed events to a board; returns the PNGs produced by export shortcuts.
pub fn replay<S: Surface>(
    board: &mut Whiteboard<S>,
    events: &[ScriptEvent],
) -> AppResult<Vec<Vec<u8>>> {
    let mut exports = Vec::new();
    for event in events {
        match event {
            ScriptEvent::Tool { tool } => board.set_tool(*tool),
            ScriptEvent::Style(update) => board.update_style(update),
            ScriptEvent::Pointer(pointer) => {
                board.handle_pointer(*pointer);
            }
            ScriptEvent::Text { text } => {
                board.set_text(text);
                board.commit_text();
            }
            ScriptEvent::Key(key) => {
                if let KeyResponse::Exported(png) = board.handle_key(key)? {
                    exports.push(png);
                }
            }
            ScriptEvent::Erase { x, y } => {
                board.erase_at(Point::new(*x, *y));
            }
            ScriptEvent::Undo => board.undo(),
            ScriptEvent::Redo => board.redo(),
            ScriptEvent::Resize { width, height } => board.resize(*width, *height)?,
        }
    }
    Ok(exports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_to_file;

    const SCRIPT: &str = r##"{
        "width": 120,
        "height": 80,
        "events": [
            {"type": "tool", "tool": "rectangle"},
            {"type": "style", "fill_color": "#ff0000", "roughness": 0.0},
            {"type": "pointer", "phase": "down", "position": {"x": 10, "y": 10}},
            {"type": "pointer", "phase": "move", "position": {"x": 30, "y": 30}},
            {"type": "pointer", "phase": "up", "position": {"x": 50, "y": 50}},
            {"type": "tool", "tool": "pencil"},
            {"type": "pointer", "phase": "down", "position": {"x": 60, "y": 20}},
            {"type": "pointer", "phase": "move", "position": {"x": 80, "y": 30}},
            {"type": "pointer", "phase": "up", "position": {"x": 80, "y": 30}},
            {"type": "tool", "tool": "eraser"},
            {"type": "pointer", "phase": "down", "position": {"x": 60, "y": 20}},
            {"type": "pointer", "phase": "up", "position": {"x": 60, "y": 20}},
            {"type": "undo"},
            {"type": "key", "key": "e", "modifiers": {"ctrl": true}}
        ]
    }"##;

    #[test]
    fn test_parse_events() {
        let script = Script::from_json(SCRIPT).unwrap();
        assert_eq!((script.width, script.height), (120, 80));
        assert_eq!(script.events.len(), 14);
        assert_eq!(
            script.events[0],
            ScriptEvent::Tool {
                tool: ToolKind::Rectangle
            }
        );
        assert!(script.font.is_none());
        assert_eq!(
            script.events[2],
            ScriptEvent::Pointer(PointerEvent::Down {
                position: Point::new(10.0, 10.0)
            })
        );
    }

    #[test]
    fn test_replay_builds_document() {
        let script = Script::from_json(SCRIPT).unwrap();
        let mut board = Whiteboard::with_size(script.width, script.height).unwrap();
        let exports = replay(&mut board, &script.events).unwrap();

        assert_eq!(board.document().len(), 2);
        assert_eq!(exports.len(), 1);
        assert_eq!(board.surface().pixel(30, 30), [255, 0, 0, 255]);
    }

    #[test]
    fn test_run_and_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("script.json");
        let out_path = dir.path().join("out.png");
        std::fs::write(&script_path, SCRIPT).unwrap();

        let script = Script::load(&script_path).unwrap();
        let mut board = script.run().unwrap();
        let written = export_to_file(&mut board, &out_path).unwrap();
        assert!(written > 0);

        let image = image::open(&out_path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (120, 80));
        assert_eq!(image.get_pixel(30, 30).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(110, 70).0, [0x12, 0x12, 0x12, 255]);
    }

    #[test]
    fn test_non_ascii_color_is_rejected() {
        let json = r##"{"events": [{"type": "style", "stroke_color": "#aéaaa"}]}"##;
        assert!(matches!(Script::from_json(json), Err(AppError::Script(_))));
    }

    #[test]
    fn test_invalid_scripts() {
        assert!(matches!(
            Script::from_json(r#"{"events": [{"type": "fly"}]}"#),
            Err(AppError::Script(_))
        ));
        assert!(matches!(
            Script::from_json(r#"{"config": {"segment_tolerance": -1}, "events": []}"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Script::load(Path::new("/nonexistent/inkboard.json")),
            Err(AppError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_font_file() {
        let script =
            Script::from_json(r#"{"font": "/nonexistent/font.ttf", "events": []}"#).unwrap();
        assert!(matches!(script.run(), Err(AppError::Io { .. })));
    }
}
