use image::{Rgba, RgbaImage};

/// One RGBA sample, 8 bits per channel.
pub type Pixel = Rgba<u8>;

/// A decoded `width x height` grid of [`Pixel`]s.
///
/// Row length and row count are guaranteed by `image::ImageBuffer`.
pub type PixelBuffer = RgbaImage;

/// `width * height`, widened to `u64`.
pub(crate) fn pixel_count(buf: &PixelBuffer) -> u64 {
    let (w, h) = buf.dimensions();
    (w as u64) * (h as u64)
}
