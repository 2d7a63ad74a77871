use crate::error::LoadError;
use log::info;
use std::fs;
use std::path::Path;

/// Reads a ROM image from disk. An empty file is `LoadError::Empty`.
pub fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    let rom = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if rom.is_empty() {
        return Err(LoadError::Empty);
    }
    info!("Read ROM {} [size: {}]", path.display(), rom.len());
    Ok(rom)
}
