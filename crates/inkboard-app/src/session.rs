//! The interactive whiteboard session.
//!
//! [`Whiteboard`] owns the document, history, tool state and drawing surface,
//! and turns pointer, text and keyboard input into document edits. Every
//! edit is followed by a full redraw.

use inkboard_core::history::{HistoryAction, HistoryManager};
use inkboard_core::input::{Command, KeyEvent, PointerEvent, shortcut_for};
use inkboard_core::shapes::{Element, ElementId, ElementRef, Text};
use inkboard_core::tools::{StyleUpdate, ToolKind, ToolManager, ToolStyles};
use inkboard_core::{BoardConfig, Document, HitTester};
use inkboard_render::{PixmapSurface, RenderResult, ShapeRenderer, Surface};
use kurbo::Point;
use peniko::Color;

/// Text being typed at a position, not yet committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEntry {
    pub position: Point,
    pub text: String,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResponse {
    /// Not a shortcut, or text is being written.
    Ignored,
    Undone,
    Redone,
    /// PNG bytes of the exported drawing.
    Exported(Vec<u8>),
}

/// A whiteboard bound to a drawing surface.
pub struct Whiteboard<S: Surface = PixmapSurface> {
    surface: S,
    document: Document,
    history: HistoryManager,
    renderer: ShapeRenderer,
    hit_tester: HitTester,
    tools: ToolStyles,
    gesture: ToolManager,
    /// Pointer is held down with a drawing or erasing tool.
    drawing: bool,
    text_entry: Option<TextEntry>,
    export_background: Color,
}

impl Whiteboard<PixmapSurface> {
    /// A session on a fresh transparent pixmap.
    pub fn with_size(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self::new(PixmapSurface::new(width, height)?))
    }
}

impl<S: Surface> Whiteboard<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, &BoardConfig::default())
    }

    pub fn with_config(surface: S, config: &BoardConfig) -> Self {
        Self {
            surface,
            document: Document::new(),
            history: HistoryManager::new(),
            renderer: ShapeRenderer::from_config(config),
            hit_tester: config.hit_tester(),
            tools: ToolStyles::with_default_style(&config.default_style),
            gesture: ToolManager::new(),
            drawing: false,
            text_entry: None,
            export_background: config.export_background.into(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn tools(&self) -> &ToolStyles {
        &self.tools
    }

    pub fn renderer(&self) -> &ShapeRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a text entry is open.
    pub fn is_writing(&self) -> bool {
        self.text_entry.is_some()
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.text_entry.as_ref()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    pub fn update_style(&mut self, update: &StyleUpdate) {
        self.tools.update_style(update);
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.is_writing() {
            return;
        }
        self.drawing = true;
        match self.tools.current_tool() {
            ToolKind::Eraser => {
                self.erase_at(point);
            }
            ToolKind::Text => {
                self.drawing = false;
                self.text_entry = Some(TextEntry {
                    position: point,
                    text: String::new(),
                });
            }
            tool => self.gesture.begin(tool, point),
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        match self.tools.current_tool() {
            ToolKind::Eraser => {
                self.erase_at(point);
            }
            // The growing stroke is painted over the current frame.
            ToolKind::Pencil => {
                self.gesture.update(point);
                self.draw_preview();
            }
            _ => {
                self.gesture.update(point);
                self.redraw();
                self.draw_preview();
            }
        }
    }

    /// Finish the gesture; returns the id of the element it created.
    pub fn pointer_up(&mut self, point: Point) -> Option<ElementId> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        if self.tools.current_tool() == ToolKind::Eraser {
            return None;
        }
        let element = self.gesture.end(point, self.tools.current_style())?;
        Some(self.commit(element))
    }

    /// Route a pointer event to the matching gesture step.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<ElementId> {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => return self.pointer_up(position),
        }
        None
    }

    /// Replace the content of the open text entry.
    pub fn set_text(&mut self, text: &str) {
        if let Some(entry) = &mut self.text_entry {
            entry.text = text.to_string();
        }
    }

    /// Close the text entry, adding a text element unless it is blank.
    pub fn commit_text(&mut self) -> Option<ElementId> {
        let entry = self.text_entry.take()?;
        let created = if entry.text.trim().is_empty() {
            None
        } else {
            let style = self.tools.current_style().clone();
            let font_size = style.font_size();
            let measured = self.surface.measure_text(&entry.text, font_size);
            let text = Text::new(entry.position, entry.text, measured.width, font_size)
                .with_style(style);
            Some(self.commit(text.into()))
        };
        self.redraw();
        created
    }

    /// Remove the topmost element under `point`.
    pub fn erase_at(&mut self, point: Point) -> Option<ElementRef> {
        let index = self.hit_tester.topmost_hit(self.document.elements(), point)?;
        let element = self.document.remove_at(index);
        log::debug!("erased {} at index {index}", element.kind_name());
        self.history.track(HistoryAction::Remove {
            element: element.clone(),
            index,
        });
        self.redraw();
        Some(element)
    }

    pub fn undo(&mut self) {
        let next = self.history.undo(self.document.elements());
        self.document.replace(next);
        self.redraw();
    }

    pub fn redo(&mut self) {
        let next = self.history.redo(self.document.elements());
        self.document.replace(next);
        self.redraw();
    }

    /// Dispatch a keyboard shortcut. Ignored while text is being written.
    pub fn handle_key(&mut self, event: &KeyEvent) -> RenderResult<KeyResponse> {
        if self.is_writing() {
            return Ok(KeyResponse::Ignored);
        }
        let response = match shortcut_for(&event.key, event.modifiers) {
            None => KeyResponse::Ignored,
            Some(Command::Undo) => {
                self.undo();
                KeyResponse::Undone
            }
            Some(Command::Redo) => {
                self.redo();
                KeyResponse::Redone
            }
            Some(Command::Export) => KeyResponse::Exported(self.export_png()?),
        };
        Ok(response)
    }

    /// Clear the surface and draw every element in order.
    pub fn redraw(&mut self) {
        self.renderer.redraw(&mut self.surface, self.document.elements());
    }

    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.surface.resize(width, height)?;
        self.redraw();
        Ok(())
    }

    /// Encode the drawing over the export background, then redraw.
    pub fn export_png(&mut self) -> RenderResult<Vec<u8>> {
        let result = self.surface.encode_png(self.export_background);
        if let Ok(bytes) = &result {
            log::info!(
                "exported {} elements ({} bytes)",
                self.document.len(),
                bytes.len()
            );
        }
        self.redraw();
        result
    }

    fn commit(&mut self, element: Element) -> ElementId {
        let element = element.into_ref();
        let id = element.id();
        self.document.add(element.clone());
        self.history.track(HistoryAction::Add(element));
        self.redraw();
        id
    }

    fn draw_preview(&mut self) {
        if let Some(preview) = self.gesture.preview(self.tools.current_style()) {
            self.renderer.draw_uncached(&mut self.surface, &preview);
        }
    }
}
