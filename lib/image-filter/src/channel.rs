use crate::{Filter, FilterKind, ImageFilterError, ImageFilterResult, ensure_processable};
use image::{DynamicImage, RgbaImage};
use photon_rs::{PhotonImage, channels};

/// Per-channel inversion on a 3-channel copy of the image. Alpha is dropped.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct NegativeConfig;

impl NegativeConfig {
    pub fn new() -> Self {
        Self
    }
}

impl Filter for NegativeConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Negative
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;

        // photon works on opaque RGBA buffers
        let opaque = DynamicImage::ImageRgb8(image.to_rgb8()).to_rgba8();
        let (width, height) = (opaque.width(), opaque.height());

        let mut photon_img = PhotonImage::new(opaque.into_raw(), width, height);
        channels::invert(&mut photon_img);

        let inverted = RgbaImage::from_raw(width, height, photon_img.get_raw_pixels())
            .ok_or_else(|| {
                ImageFilterError::Decode(format!("inverted buffer does not fit {width}x{height}"))
            })?;

        Ok(DynamicImage::ImageRgb8(
            DynamicImage::ImageRgba8(inverted).to_rgb8(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    #[test]
    fn test_negative_inverts_channels() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 100, 255])));
        let out = NegativeConfig::new().process(&img).unwrap();

        assert_eq!(out.color(), image::ColorType::Rgb8);
        assert_eq!(out.as_rgb8().unwrap().get_pixel(1, 1), &Rgb([255, 155, 0]));
    }

    #[test]
    fn test_negative_of_gray_is_rgb() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 2, Luma([40])));
        let out = NegativeConfig::new().process(&img).unwrap();

        assert_eq!(out.color(), image::ColorType::Rgb8);
        assert_eq!(out.as_rgb8().unwrap().get_pixel(2, 1), &Rgb([215, 215, 215]));
    }

    #[test]
    fn test_negative_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0])));
        let out = NegativeConfig::new().process(&img).unwrap();

        assert_eq!(out.as_rgb8().unwrap().get_pixel(0, 0), &Rgb([245, 235, 225]));
    }
}
