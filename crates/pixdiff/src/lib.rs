//! Exact pixel-by-pixel image comparison.
//!
//! [`compare`] walks two equally sized RGBA buffers, counts coordinates whose
//! pixels differ in any channel, and renders a diff image where mismatches are
//! highlighted and matching pixels are neutralized. The comparator itself is
//! pure; reading, decoding and encoding files lives in [`files`].

use std::path::PathBuf;

use thiserror::Error;

pub mod buffer;
pub mod compare;
pub mod files;
pub mod palette;

pub use self::buffer::{Pixel, PixelBuffer};
pub use self::compare::{
    Comparison, MismatchCount, compare, compare_with, count_mismatches, dissimilarity_percent,
    is_equal_color,
};
pub use self::files::{compare_files, compare_files_with, decode, encode_png, open, save_png};
pub use self::palette::{Neutral, Palette};

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("dimension mismatch: {left_w}x{left_h} vs {right_w}x{right_h}")]
    DimensionMismatch {
        left_w: u32,
        left_h: u32,
        right_w: u32,
        right_h: u32,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {origin}")]
    Decode {
        origin: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode diff image")]
    Encode(#[source] image::ImageError),
}
