//! I/O helpers for rasters and JSON.
//!
//! - `save_raster`: write a [`Raster`] to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageView, Raster};
use crate::error::{Error, Result};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Save a raster to a grayscale PNG, creating parent directories.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let image: GrayImage = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
        raster.width() as u32,
        raster.height() as u32,
        raster.data().to_vec(),
    )
    .ok_or_else(|| Error::Io(invalid_data("Failed to create image buffer".into())))?;
    image.save(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn invalid_data(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}
