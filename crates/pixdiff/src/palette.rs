use std::num::NonZeroU8;

use image::Rgba;

use crate::Pixel;

const DEFAULT_DIM: NonZeroU8 = NonZeroU8::new(4).unwrap();

/// How matching pixels are rendered in the diff image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neutral {
    /// Original color with RGB divided by the factor; alpha is kept.
    Dim(NonZeroU8),
    /// A fixed placeholder color.
    Fixed(Pixel),
}

/// Marker colors for the diff visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub highlight: Pixel,
    pub neutral: Neutral,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            highlight: Rgba([255, 0, 0, 255]),
            neutral: Neutral::Dim(DEFAULT_DIM),
        }
    }
}

impl Palette {
    pub fn neutral_for(&self, pixel: &Pixel) -> Pixel {
        match self.neutral {
            Neutral::Dim(factor) => {
                let f = factor.get();
                let Rgba([r, g, b, a]) = *pixel;
                Rgba([r / f, g / f, b / f, a])
            }
            Neutral::Fixed(color) => color,
        }
    }

    /// True when no neutral rendering can ever equal the highlight color.
    pub fn is_distinguishable(&self) -> bool {
        match self.neutral {
            Neutral::Fixed(color) => color != self.highlight,
            Neutral::Dim(factor) => {
                let f = factor.get();
                f >= 2 && self.highlight.0[..3].iter().any(|&c| c > 255 / f)
            }
        }
    }
}
