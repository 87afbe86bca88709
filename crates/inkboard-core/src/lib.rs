//! Inkboard Core Library
//!
//! Element model, geometry, hit testing and undo history for the Inkboard
//! whiteboard. Rendering lives in `inkboard-render`.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod hit_test;
pub mod history;
pub mod input;
pub mod shapes;
pub mod tools;

pub use canvas::Document;
pub use config::{BoardConfig, ConfigError};
pub use hit_test::HitTester;
pub use history::{HistoryAction, HistoryManager};
pub use input::{Command, KeyEvent, Modifiers, PointerEvent, shortcut_for};
pub use shapes::{Element, ElementId, ElementRef, ShapeStyle};
pub use tools::{StyleUpdate, ToolKind, ToolManager, ToolStyles};
