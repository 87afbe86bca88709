//! Inkboard Application
//!
//! The whiteboard session that ties the document, history, tools and
//! renderer together, plus a headless script runner.

mod error;
mod export;
mod script;
mod session;
mod shortcuts;

pub use error::{AppError, AppResult};
pub use export::{export_to_file, write_png};
pub use script::{Script, ScriptEvent, replay};
pub use session::{KeyResponse, TextEntry, Whiteboard};
pub use shortcuts::{Shortcut, ShortcutRegistry};
