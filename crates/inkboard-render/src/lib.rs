//! Inkboard Render Library
//!
//! Draws Inkboard elements onto a [`Surface`]. [`PixmapSurface`] rasterizes
//! on the CPU and exports PNG; [`RecordingSurface`] keeps the draw calls.

mod pixmap;
mod recording;
mod renderer;
mod shape_renderer;

pub use pixmap::PixmapSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{RenderResult, RendererError, Surface, encode_rgba_png};
pub use shape_renderer::{Generated, RenderCache, ShapeRenderer};
