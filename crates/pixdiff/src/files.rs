//! Decode and encode collaborators around the comparator.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::{Comparison, DiffError, Palette, PixelBuffer, compare_with};

fn decode_as(bytes: &[u8], origin: impl FnOnce() -> String) -> Result<PixelBuffer, DiffError> {
    let img = image::load_from_memory(bytes).map_err(|source| DiffError::Decode {
        origin: origin(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Decode an in-memory image (format sniffed from the bytes) to RGBA8.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, DiffError> {
    decode_as(bytes, || "image data".to_string())
}

/// Read and decode an image file.
pub fn open(path: impl AsRef<Path>) -> Result<PixelBuffer, DiffError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DiffError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let img = decode_as(&bytes, || path.display().to_string())?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "decoded");
    Ok(img)
}

pub fn encode_png(img: &PixelBuffer) -> Result<Vec<u8>, DiffError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(DiffError::Encode)?;
    debug!(bytes = buf.len(), "encoded diff png");
    Ok(buf)
}

pub fn save_png(img: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), DiffError> {
    let path = path.as_ref();
    let png = encode_png(img)?;
    std::fs::write(path, png).map_err(|source| DiffError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Open both files and compare them with the default palette.
pub fn compare_files(
    reference: impl AsRef<Path>,
    current: impl AsRef<Path>,
) -> Result<Comparison, DiffError> {
    compare_files_with(reference, current, &Palette::default())
}

/// Open both files and compare them. The reference is opened first, so its
/// error wins when both are unreadable.
pub fn compare_files_with(
    reference: impl AsRef<Path>,
    current: impl AsRef<Path>,
    palette: &Palette,
) -> Result<Comparison, DiffError> {
    let left = open(reference)?;
    let right = open(current)?;
    compare_with(&left, &right, palette)
}
