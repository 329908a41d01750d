use crate::buffer::pixel_count;
use crate::{DiffError, Palette, Pixel, PixelBuffer};

/// Outcome of [`compare`]: the diff visualization and the rounded percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Same size as the inputs. Mismatches carry the palette highlight.
    pub diff: PixelBuffer,
    /// Share of mismatched pixels in `[0, 100]`, rounded to two decimals.
    pub percent: f64,
}

/// Outcome of [`count_mismatches`]. No diff image is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchCount {
    pub mismatched: u64,
    pub total: u64,
}

impl MismatchCount {
    pub fn percent(&self) -> f64 {
        dissimilarity_percent(self.mismatched, self.total)
    }

    pub fn is_match(&self) -> bool {
        self.mismatched == 0
    }
}

/// Exact channel equality. A one-bit difference in any channel is a mismatch.
pub fn is_equal_color(p1: &Pixel, p2: &Pixel) -> bool {
    p1.0 == p2.0
}

/// `mismatched / total * 100`, rounded half-up to two decimals.
///
/// An empty grid is 0% by convention. Rounding happens on integer
/// hundredths so that exact halves always round up. 100.00 is reserved for
/// grids where every pixel differs.
pub fn dissimilarity_percent(mismatched: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let num = mismatched as u128 * 10_000 * 2 + total as u128;
    let mut hundredths = num / (2 * total as u128);
    if mismatched < total {
        hundredths = hundredths.min(9_999);
    }
    hundredths as f64 / 100.0
}

fn check_dimensions(a: &PixelBuffer, b: &PixelBuffer) -> Result<(), DiffError> {
    if a.dimensions() != b.dimensions() {
        return Err(DiffError::DimensionMismatch {
            left_w: a.width(),
            left_h: a.height(),
            right_w: b.width(),
            right_h: b.height(),
        });
    }
    Ok(())
}

/// Compare with the default palette. See [`compare_with`].
pub fn compare(a: &PixelBuffer, b: &PixelBuffer) -> Result<Comparison, DiffError> {
    compare_with(a, b, &Palette::default())
}

/// Walk both buffers and render mismatches with `palette`.
///
/// Fails with [`DiffError::DimensionMismatch`] before allocating anything
/// if the sizes differ.
pub fn compare_with(
    a: &PixelBuffer,
    b: &PixelBuffer,
    palette: &Palette,
) -> Result<Comparison, DiffError> {
    check_dimensions(a, b)?;

    let (w, h) = a.dimensions();
    let mut diff = PixelBuffer::new(w, h);
    let mut mismatched: u64 = 0;

    for y in 0..h {
        for x in 0..w {
            let pa = a.get_pixel(x, y);
            let pb = b.get_pixel(x, y);

            if is_equal_color(pa, pb) {
                diff.put_pixel(x, y, palette.neutral_for(pa));
            } else {
                mismatched += 1;
                diff.put_pixel(x, y, palette.highlight);
            }
        }
    }

    Ok(Comparison {
        diff,
        percent: dissimilarity_percent(mismatched, pixel_count(a)),
    })
}

/// Count mismatched pixels without rendering a diff image.
pub fn count_mismatches(a: &PixelBuffer, b: &PixelBuffer) -> Result<MismatchCount, DiffError> {
    check_dimensions(a, b)?;

    let mismatched = a
        .pixels()
        .zip(b.pixels())
        .filter(|(pa, pb)| !is_equal_color(pa, pb))
        .count() as u64;

    Ok(MismatchCount {
        mismatched,
        total: pixel_count(a),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Pixel = Rgba([255, 255, 255, 255]);
    const BLACK: Pixel = Rgba([0, 0, 0, 255]);

    fn solid(w: u32, h: u32, color: Pixel) -> PixelBuffer {
        PixelBuffer::from_pixel(w, h, color)
    }

    /// White canvas with a black square covering `[x0, x1) x [y0, y1)`.
    fn with_square(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> PixelBuffer {
        let mut img = solid(w, h, WHITE);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, BLACK);
            }
        }
        img
    }

    /// Scatter a few distinct colors so dimming is observable.
    fn gradient(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            Rgba([(x * 37 % 256) as u8, (y * 91 % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    // -- equality predicate --

    #[test]
    fn white_and_black_are_not_equal() {
        assert!(!is_equal_color(&WHITE, &BLACK));
        assert!(is_equal_color(&WHITE, &WHITE));
    }

    #[test]
    fn single_bit_in_any_channel_is_a_mismatch() {
        let base = Rgba([10, 20, 30, 40]);
        for ch in 0..4 {
            let mut other = base;
            other.0[ch] ^= 1;
            assert!(!is_equal_color(&base, &other), "channel {ch}");
        }
    }

    // -- scenarios --

    #[test]
    fn black_square_on_white_is_6_25_percent() {
        let white = solid(200, 200, WHITE);
        let black = with_square(200, 200, 50, 50, 100, 100);
        let r = compare(&white, &black).unwrap();
        assert_eq!(r.percent, 6.25);
        assert_eq!(r.diff.dimensions(), (200, 200));
        assert_eq!(*r.diff.get_pixel(75, 75), Rgba([255, 0, 0, 255]));
        assert_eq!(*r.diff.get_pixel(10, 10), Rgba([63, 63, 63, 255]));
        // Square is half-open: (100, 100) is outside.
        assert_eq!(*r.diff.get_pixel(100, 100), Rgba([63, 63, 63, 255]));
    }

    #[test]
    fn different_sizes_fail() {
        let white = solid(200, 200, WHITE);
        let black = with_square(100, 100, 50, 50, 100, 100);
        let err = compare(&white, &black).unwrap_err();
        assert!(matches!(
            err,
            DiffError::DimensionMismatch {
                left_w: 200,
                left_h: 200,
                right_w: 100,
                right_h: 100,
            }
        ));
        assert_eq!(err.to_string(), "dimension mismatch: 200x200 vs 100x100");
    }

    #[test]
    fn width_only_or_height_only_mismatch_fails() {
        let a = solid(10, 10, WHITE);
        assert!(compare(&a, &solid(11, 10, WHITE)).is_err());
        assert!(compare(&a, &solid(10, 11, WHITE)).is_err());
        assert!(count_mismatches(&a, &solid(10, 9, WHITE)).is_err());
        // Transposed sizes have the same area but are still different.
        assert!(compare(&solid(4, 9, WHITE), &solid(9, 4, WHITE)).is_err());
    }

    #[test]
    fn alpha_only_difference_is_full_mismatch() {
        let a = solid(1, 1, Rgba([12, 34, 56, 255]));
        let b = solid(1, 1, Rgba([12, 34, 56, 254]));
        assert!(!is_equal_color(a.get_pixel(0, 0), b.get_pixel(0, 0)));
        assert_eq!(compare(&a, &b).unwrap().percent, 100.0);
    }

    #[test]
    fn empty_buffers_are_zero_percent() {
        let a = PixelBuffer::new(0, 0);
        let b = PixelBuffer::new(0, 0);
        let r = compare(&a, &b).unwrap();
        assert_eq!(r.percent, 0.0);
        assert_eq!(r.diff.dimensions(), (0, 0));

        // Zero-area but non-zero width.
        let r = compare(&PixelBuffer::new(7, 0), &PixelBuffer::new(7, 0)).unwrap();
        assert_eq!(r.percent, 0.0);
    }

    // -- properties --

    #[test]
    fn identity_is_zero_and_all_neutral() {
        let a = gradient(31, 17);
        let palette = Palette::default();
        let r = compare_with(&a, &a, &palette).unwrap();
        assert_eq!(r.percent, 0.0);
        for (x, y, px) in r.diff.enumerate_pixels() {
            assert_eq!(*px, palette.neutral_for(a.get_pixel(x, y)));
            assert_ne!(*px, palette.highlight);
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = gradient(40, 30);
        let b = with_square(40, 30, 3, 4, 20, 9);
        let first = compare(&a, &b).unwrap();
        let second = compare(&a, &b).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.diff.as_raw(), second.diff.as_raw());
    }

    #[test]
    fn mismatch_count_is_symmetric() {
        let a = gradient(64, 48);
        let b = with_square(64, 48, 10, 5, 33, 40);
        let ab = count_mismatches(&a, &b).unwrap();
        let ba = count_mismatches(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(
            compare(&a, &b).unwrap().percent,
            compare(&b, &a).unwrap().percent
        );
    }

    #[test]
    fn every_pixel_different_is_exactly_100() {
        let a = solid(13, 7, WHITE);
        let b = solid(13, 7, BLACK);
        let r = compare(&a, &b).unwrap();
        assert_eq!(r.percent, 100.0);
        assert!(r.diff.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn one_matching_pixel_stays_below_100() {
        // 9999 of 10000 differ: 99.99, never rounded up to 100.
        let a = solid(100, 100, WHITE);
        let mut b = solid(100, 100, BLACK);
        b.put_pixel(0, 0, WHITE);
        let r = compare(&a, &b).unwrap();
        assert_eq!(r.percent, 99.99);

        // 199999 of 200000 differ: 99.9995 rounds half-up to 100.00,
        // but a pixel still matches.
        let a = solid(500, 400, WHITE);
        let mut b = solid(500, 400, BLACK);
        b.put_pixel(0, 0, WHITE);
        let count = count_mismatches(&a, &b).unwrap();
        assert_eq!(count.mismatched, 199_999);
        assert_eq!(count.percent(), 99.99);
    }

    #[test]
    fn lazy_count_agrees_with_full_compare() {
        let a = gradient(50, 20);
        let b = with_square(50, 20, 0, 0, 7, 3);
        let count = count_mismatches(&a, &b).unwrap();
        assert_eq!(count.total, 1000);
        assert_eq!(count.percent(), compare(&a, &b).unwrap().percent);
        assert!(!count.is_match());
        assert!(count_mismatches(&a, &a).unwrap().is_match());
    }

    #[test]
    fn custom_palette_is_applied() {
        let grey = Rgba([200, 200, 200, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let palette = Palette {
            highlight: blue,
            neutral: crate::Neutral::Fixed(grey),
        };
        let a = solid(2, 1, WHITE);
        let mut b = a.clone();
        b.put_pixel(1, 0, BLACK);
        let r = compare_with(&a, &b, &palette).unwrap();
        assert_eq!(*r.diff.get_pixel(0, 0), grey);
        assert_eq!(*r.diff.get_pixel(1, 0), blue);
        assert_eq!(r.percent, 50.0);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let a = gradient(8, 8);
        let b = with_square(8, 8, 1, 1, 4, 4);
        let (a0, b0) = (a.clone(), b.clone());
        let _ = compare(&a, &b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    // -- rounding --

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(dissimilarity_percent(1, 3), 33.33);
        assert_eq!(dissimilarity_percent(2, 3), 66.67);
        assert_eq!(dissimilarity_percent(2500, 40_000), 6.25);
        assert_eq!(dissimilarity_percent(0, 5), 0.0);
        assert_eq!(dissimilarity_percent(5, 5), 100.0);
        assert_eq!(dissimilarity_percent(0, 0), 0.0);
    }

    #[test]
    fn exact_halves_round_up() {
        // 0.125% -> 0.13, 0.0625% -> 0.06, 0.005% -> 0.01
        assert_eq!(dissimilarity_percent(1, 800), 0.13);
        assert_eq!(dissimilarity_percent(1, 1600), 0.06);
        assert_eq!(dissimilarity_percent(1, 20_000), 0.01);
    }

    #[test]
    fn huge_grids_do_not_overflow() {
        let total = u32::MAX as u64 * u32::MAX as u64;
        assert_eq!(dissimilarity_percent(total, total), 100.0);
        assert_eq!(dissimilarity_percent(total / 2, total), 50.0);
    }
}
