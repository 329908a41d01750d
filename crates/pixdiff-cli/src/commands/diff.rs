use std::path::Path;

use anyhow::{Context, Result};
use pixdiff::Palette;
use tracing::info;

use crate::report::{json, terminal};

/// `pixdiff diff` — compare two image files.
/// Returns exit code: 0 = pixel-identical, 1 = any pixel differs.
pub fn diff(
    reference: &Path,
    current: &Path,
    output: Option<&Path>,
    as_json: bool,
    palette: &Palette,
) -> Result<i32> {
    let left = pixdiff::open(reference)?;
    let right = pixdiff::open(current)?;

    // Only render the diff image when someone will look at it.
    let count = pixdiff::count_mismatches(&left, &right)?;
    if let Some(out) = output {
        let comparison = pixdiff::compare_with(&left, &right, palette)?;
        pixdiff::save_png(&comparison.diff, out)
            .with_context(|| format!("Failed to save diff image to {}", out.display()))?;
        info!(path = %out.display(), "diff image written");
    }

    let percent = count.percent();
    if as_json {
        json::print(&json::DiffReport {
            reference,
            current,
            width: left.width(),
            height: left.height(),
            diff_pixels: count.mismatched,
            total_pixels: count.total,
            percent,
            diff_image: output,
        })?;
    } else {
        println!(
            "{} ({} of {} pixels differ)",
            terminal::format_percent(percent),
            count.mismatched,
            count.total
        );
    }

    Ok(if count.is_match() { 0 } else { 1 })
}
