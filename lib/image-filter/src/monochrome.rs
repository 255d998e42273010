use crate::{Filter, FilterKind, ImageFilterResult, ensure_processable};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// ITU-R 601-2 luma in 16-bit fixed point. The weights sum to 65536, so a
/// pixel with equal channels maps to itself.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

pub fn luminance_of_rgb(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

pub fn luminance(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        _ => luminance_of_rgb(&image.to_rgb8()),
    }
}

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct GrayConfig;

impl GrayConfig {
    pub fn new() -> Self {
        Self
    }
}

impl Filter for GrayConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Gray
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;
        Ok(DynamicImage::ImageLuma8(luminance(image)))
    }
}

/// Luminance followed by a hard threshold: below `threshold` is black,
/// everything else white.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BlackWhiteConfig {
    #[derivative(Default(value = "128"))]
    threshold: u8,
}

impl BlackWhiteConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for BlackWhiteConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::BlackWhite
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;

        let mut gray = luminance(image);
        for pixel in gray.pixels_mut() {
            pixel[0] = if pixel[0] < self.threshold { 0 } else { 255 };
        }

        Ok(DynamicImage::ImageLuma8(gray))
    }
}
