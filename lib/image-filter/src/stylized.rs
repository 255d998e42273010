use crate::{
    Filter, FilterKind, ImageFilterError, ImageFilterResult, ensure_processable,
    monochrome::{luminance, luminance_of_rgb},
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, imageops};
use imageproc::{edges::canny, filter::median_filter};

/// Dark-on-light line drawing: smoothed luminance, Canny edges, inverted.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContourConfig {
    // sigma of a 5x5 kernel when none is given
    #[derivative(Default(value = "1.1"))]
    blur_sigma: f32,

    #[derivative(Default(value = "50.0"))]
    low_threshold: f32,

    #[derivative(Default(value = "150.0"))]
    high_threshold: f32,
}

impl ContourConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for ContourConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Contour
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;

        if !(self.blur_sigma > 0.0) {
            return Err(ImageFilterError::InvalidParameter(format!(
                "contour blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }

        if self.low_threshold > self.high_threshold {
            return Err(ImageFilterError::InvalidParameter(format!(
                "contour low threshold {} exceeds high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }

        let gray = luminance(image);
        let blurred = imageops::blur(&gray, self.blur_sigma);
        let mut edges = canny(&blurred, self.low_threshold, self.high_threshold);
        imageops::invert(&mut edges);

        Ok(DynamicImage::ImageLuma8(edges))
    }
}

/// Flat colour regions with dark outlines.
///
/// The colour layer is an edge-preserving bilateral smoothing of the input.
/// The outline mask is an adaptive mean threshold of the median-filtered
/// luminance. Smoothed colour survives only where the mask is set.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CartoonConfig {
    #[derivative(Default(value = "9"))]
    diameter: u32,

    #[derivative(Default(value = "300.0"))]
    sigma_color: f32,

    #[derivative(Default(value = "300.0"))]
    sigma_space: f32,

    #[derivative(Default(value = "7"))]
    median_aperture: u32,

    #[derivative(Default(value = "9"))]
    block_size: u32,

    #[derivative(Default(value = "9"))]
    offset: i32,
}

impl CartoonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self) -> ImageFilterResult<()> {
        if self.diameter == 0 {
            return Err(ImageFilterError::InvalidParameter(
                "cartoon diameter must be at least 1".to_string(),
            ));
        }

        if !(self.sigma_color > 0.0 && self.sigma_space > 0.0) {
            return Err(ImageFilterError::InvalidParameter(format!(
                "cartoon sigmas must be positive, got {}/{}",
                self.sigma_color, self.sigma_space
            )));
        }

        if self.median_aperture % 2 == 0 {
            return Err(ImageFilterError::InvalidParameter(format!(
                "median aperture must be odd, got {}",
                self.median_aperture
            )));
        }

        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(ImageFilterError::InvalidParameter(format!(
                "threshold block size must be odd and at least 3, got {}",
                self.block_size
            )));
        }

        Ok(())
    }
}

impl Filter for CartoonConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Cartoon
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;
        self.validate()?;

        let rgb = image.to_rgb8();
        let color = bilateral_filter(&rgb, self.diameter, self.sigma_color, self.sigma_space);

        let radius = self.median_aperture / 2;
        let gray = median_filter(&luminance_of_rgb(&rgb), radius, radius);
        let mask = adaptive_mean_threshold(&gray, self.block_size, self.offset);

        let cartoon = RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            if mask.get_pixel(x, y)[0] == 255 {
                *color.get_pixel(x, y)
            } else {
                Rgb([0, 0, 0])
            }
        });

        Ok(DynamicImage::ImageRgb8(cartoon))
    }
}

/// Bilateral smoothing over a circular window of `diameter` pixels.
///
/// Colour distance is the L1 distance over the three channels. Borders are
/// replicated.
pub fn bilateral_filter(
    image: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let radius = (diameter / 2) as i32;
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let color_weights: Vec<f32> = (0..=255 * 3)
        .map(|d: usize| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut window = vec![];
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist2 = dx * dx + dy * dy;
            if dist2 <= radius * radius {
                window.push((dx, dy, (dist2 as f32 * space_coeff).exp()));
            }
        }
    }

    let (width, height) = image.dimensions();
    let (max_x, max_y) = (width as i32 - 1, height as i32 - 1);

    RgbImage::from_fn(width, height, |x, y| {
        let center = image.get_pixel(x, y).0;
        let mut sum = [0.0f32; 3];
        let mut weight_sum = 0.0f32;

        for &(dx, dy, space_weight) in &window {
            let nx = (x as i32 + dx).clamp(0, max_x) as u32;
            let ny = (y as i32 + dy).clamp(0, max_y) as u32;
            let neighbour = image.get_pixel(nx, ny).0;

            let distance: usize = center
                .iter()
                .zip(neighbour.iter())
                .map(|(a, b)| a.abs_diff(*b) as usize)
                .sum();

            let weight = space_weight * color_weights[distance];
            for c in 0..3 {
                sum[c] += neighbour[c] as f32 * weight;
            }
            weight_sum += weight;
        }

        Rgb(sum.map(|s| (s / weight_sum).round().clamp(0.0, 255.0) as u8))
    })
}

/// Binary mask: 255 where a pixel is brighter than the rounded mean of its
/// `block_size` neighbourhood minus `offset`, else 0. Borders are replicated.
pub fn adaptive_mean_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let radius = (block_size / 2) as i32;
    let area = (block_size * block_size) as f32;

    let (width, height) = image.dimensions();
    let (max_x, max_y) = (width as i32 - 1, height as i32 - 1);

    GrayImage::from_fn(width, height, |x, y| {
        let mut sum = 0u32;
        for dy in -radius..=radius {
            let ny = (y as i32 + dy).clamp(0, max_y) as u32;
            for dx in -radius..=radius {
                let nx = (x as i32 + dx).clamp(0, max_x) as u32;
                sum += image.get_pixel(nx, ny)[0] as u32;
            }
        }

        let mean = (sum as f32 / area).round() as i32;
        let value = image.get_pixel(x, y)[0] as i32;

        Luma([if value - mean > -offset { 255 } else { 0 }])
    })
}
