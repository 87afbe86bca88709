//! Tool system for the whiteboard.
//!
//! [`ToolStyles`] remembers the selected tool and one style per tool;
//! [`ToolManager`] turns a pointer gesture into an element.

use crate::shapes::{
    Arrow, Circle, Element, FillPattern, Freehand, Line, Rectangle, SerializableColor, ShapeStyle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

const TOOL_COUNT: usize = 7;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Line,
    Rectangle,
    Circle,
    Text,
    Eraser,
    Arrow,
    Pencil,
}

impl ToolKind {
    /// Every tool, in declaration order.
    pub const ALL: [ToolKind; TOOL_COUNT] = [
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Text,
        ToolKind::Eraser,
        ToolKind::Arrow,
        ToolKind::Pencil,
    ];

    /// Tools whose gesture is a drag from one corner/end to another.
    pub fn is_drag_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Arrow
        )
    }
}

/// A partial style change; unset fields keep their current value.
///
/// A fully transparent `fill_color` clears the fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleUpdate {
    pub stroke_color: Option<SerializableColor>,
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub fill_pattern: Option<FillPattern>,
    pub seed: Option<u32>,
    pub roughness: Option<f64>,
}

impl StyleUpdate {
    /// Merge this update over `base`, producing a new style.
    pub fn apply_to(&self, base: &ShapeStyle) -> ShapeStyle {
        let mut style = base.clone();
        if let Some(color) = self.stroke_color {
            style.stroke_color = color;
        }
        if let Some(color) = self.fill_color {
            style.fill_color = (color.a > 0).then_some(color);
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
        if let Some(pattern) = self.fill_pattern {
            style.fill_pattern = pattern;
        }
        if let Some(seed) = self.seed {
            style.seed = seed;
        }
        if let Some(roughness) = self.roughness {
            style.roughness = roughness;
        }
        style
    }
}

/// The selected tool and a remembered style for every tool.
#[derive(Debug, Clone)]
pub struct ToolStyles {
    current: ToolKind,
    styles: [ShapeStyle; TOOL_COUNT],
}

impl Default for ToolStyles {
    fn default() -> Self {
        Self::with_default_style(&ShapeStyle::fallback())
    }
}

impl ToolStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tool starts from `base`; the text tool uses width 1.
    pub fn with_default_style(base: &ShapeStyle) -> Self {
        let styles = ToolKind::ALL.map(|tool| {
            let mut style = base.clone();
            if tool == ToolKind::Text {
                style.stroke_width = 1.0;
            }
            style
        });
        Self {
            current: ToolKind::default(),
            styles,
        }
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current
    }

    /// Style of the current tool.
    pub fn current_style(&self) -> &ShapeStyle {
        self.style_for(self.current)
    }

    pub fn style_for(&self, tool: ToolKind) -> &ShapeStyle {
        &self.styles[tool as usize]
    }

    /// Switch tools; the tool's remembered style becomes current.
    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("tool -> {tool:?}");
        self.current = tool;
    }

    /// Merge a partial update into the current tool's style.
    ///
    /// The stored style is replaced by a new value, so elements holding a
    /// copy of the old one are unaffected.
    pub fn update_style(&mut self, update: &StyleUpdate) -> &ShapeStyle {
        let next = update.apply_to(self.current_style());
        self.styles[self.current as usize] = next;
        self.current_style()
    }
}

/// State of a pointer gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for interaction.
    #[default]
    Idle,
    /// Dragging out a line, rectangle, circle or arrow.
    Dragging {
        tool: ToolKind,
        start: Point,
        current: Point,
    },
    /// Collecting pencil samples.
    Stroking { points: Vec<Point> },
}

/// Tracks a gesture from pointer-down to pointer-up.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture. Tools without a drag gesture leave the manager idle.
    pub fn begin(&mut self, tool: ToolKind, point: Point) {
        self.state = match tool {
            ToolKind::Pencil => ToolState::Stroking {
                points: vec![point],
            },
            t if t.is_drag_shape() => ToolState::Dragging {
                tool,
                start: point,
                current: point,
            },
            _ => ToolState::Idle,
        };
    }

    /// Update the current gesture.
    pub fn update(&mut self, point: Point) {
        match &mut self.state {
            ToolState::Dragging { current, .. } => *current = point,
            ToolState::Stroking { points } => points.push(point),
            ToolState::Idle => {}
        }
    }

    /// Element the gesture would produce right now.
    pub fn preview(&self, style: &ShapeStyle) -> Option<Element> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::Dragging {
                tool,
                start,
                current,
            } => shape_between(*tool, *start, *current, style),
            ToolState::Stroking { points } => {
                Some(Freehand::from_points(points.clone()).with_style(style.clone()).into())
            }
        }
    }

    /// End the gesture and return the created element, if any.
    ///
    /// A pencil stroke keeps the samples gathered so far; a drag ends at
    /// `point`.
    pub fn end(&mut self, point: Point, style: &ShapeStyle) -> Option<Element> {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => None,
            ToolState::Dragging { tool, start, .. } => shape_between(tool, start, point, style),
            ToolState::Stroking { points } if points.is_empty() => None,
            ToolState::Stroking { points } => {
                Some(Freehand::from_points(points).with_style(style.clone()).into())
            }
        }
    }

    /// Check if a gesture is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Pencil samples collected so far.
    pub fn stroke_points(&self) -> &[Point] {
        match &self.state {
            ToolState::Stroking { points } => points,
            _ => &[],
        }
    }
}

/// Build the element a drag from `start` to `end` produces.
pub fn shape_between(
    tool: ToolKind,
    start: Point,
    end: Point,
    style: &ShapeStyle,
) -> Option<Element> {
    let (width, height) = (end.x - start.x, end.y - start.y);
    let style = style.clone();
    let element = match tool {
        ToolKind::Line => Line::new(start, end).with_style(style).into(),
        ToolKind::Rectangle => Rectangle::new(start, width, height).with_style(style).into(),
        ToolKind::Circle => Circle::new(start, width, height).with_style(style).into(),
        ToolKind::Arrow => Arrow::new(start, end).with_style(style).into(),
        ToolKind::Text | ToolKind::Eraser | ToolKind::Pencil => return None,
    };
    Some(element)
}
