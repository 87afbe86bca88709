//! Writing exported drawings to disk.

use crate::error::{AppError, AppResult};
use crate::session::Whiteboard;
use inkboard_render::Surface;
use std::path::Path;

/// Write PNG bytes to `path`.
pub fn write_png(path: &Path, png_data: &[u8]) -> AppResult<()> {
    std::fs::write(path, png_data).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported PNG to: {}", path.display());
    Ok(())
}

/// Export the board and write it to `path`, returning the byte count.
pub fn export_to_file<S: Surface>(board: &mut Whiteboard<S>, path: &Path) -> AppResult<usize> {
    let png_data = board.export_png()?;
    write_png(path, &png_data)?;
    Ok(png_data.len())
}
