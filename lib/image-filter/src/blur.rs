use crate::{Filter, FilterKind, ImageFilterError, ImageFilterResult, ensure_processable};
use derivative::Derivative;
use derive_setters::Setters;
use image::DynamicImage;

/// Isotropic gaussian smoothing. `radius` is the standard deviation of the
/// kernel in pixels. The colour layout of the input is kept.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BlurConfig {
    #[derivative(Default(value = "5.0"))]
    radius: f32,
}

impl BlurConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for BlurConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Blur
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        ensure_processable(image)?;

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ImageFilterError::InvalidParameter(format!(
                "blur radius must be positive, got {}",
                self.radius
            )));
        }

        Ok(image.blur(self.radius))
    }
}
