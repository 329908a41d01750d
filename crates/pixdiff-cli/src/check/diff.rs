use anyhow::{Context, Result};
use pixdiff::{DiffError, Palette, PixelBuffer};

pub enum PairResult {
    /// Byte-identical files or pixel-identical images.
    Identical,
    Changed {
        diff_pixels: u64,
        percent: f64,
        diff_image: PixelBuffer,
    },
    Resized {
        reference: (u32, u32),
        current: (u32, u32),
    },
}

/// Two-phase check:
/// 1. Byte-identical check (memcmp)
/// 2. Decode, count mismatches, and only render the diff image when needed
///
/// Runs synchronously — call via `spawn_blocking`.
pub fn check_pair(reference_png: &[u8], current_png: &[u8], palette: &Palette) -> Result<PairResult> {
    // Phase 1: byte-identical
    if reference_png == current_png {
        return Ok(PairResult::Identical);
    }

    // Phase 2: decode and diff
    let left = pixdiff::decode(reference_png).context("Failed to decode reference PNG")?;
    let right = pixdiff::decode(current_png).context("Failed to decode current PNG")?;

    let count = match pixdiff::count_mismatches(&left, &right) {
        Ok(count) => count,
        Err(DiffError::DimensionMismatch {
            left_w,
            left_h,
            right_w,
            right_h,
        }) => {
            return Ok(PairResult::Resized {
                reference: (left_w, left_h),
                current: (right_w, right_h),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if count.is_match() {
        return Ok(PairResult::Identical);
    }

    let comparison = pixdiff::compare_with(&left, &right, palette)?;
    Ok(PairResult::Changed {
        diff_pixels: count.mismatched,
        percent: comparison.percent,
        diff_image: comparison.diff,
    })
}
