pub mod blur;
pub mod channel;
pub mod monochrome;
pub mod naming;
pub mod registry;
pub mod save;
pub mod stylized;

pub use registry::FilterRegistry;

use image::DynamicImage;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use strum_macros::{Display, EnumString, IntoStaticStr, VariantArray};

pub type ImageFilterResult<T> = Result<T, ImageFilterError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageFilterError {
    #[error("Cannot process image: {0}")]
    Decode(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to save image to {path}. Error: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A pure image-to-image transformation.
///
/// `process` never touches the filesystem and never mutates its input.
/// `apply_and_save` is the only operation allowed to write, and it writes
/// next to `original_path` using [`naming::output_path`].
pub trait Filter {
    fn kind(&self) -> FilterKind;

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage>;

    fn apply_and_save(
        &self,
        image: &DynamicImage,
        original_path: &Path,
    ) -> ImageFilterResult<PathBuf> {
        let processed = self.process(image)?;
        let output = naming::output_path(original_path, self.kind().tag());

        save::save_image(&processed, &output, save::DEFAULT_JPEG_QUALITY)?;
        log::info!("{} result saved to {}", self.kind(), output.display());

        Ok(output)
    }
}

/// The filter families. The lowercase variant name is the kind tag used
/// both to pick a filter and to suffix output file names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray, EnumString, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FilterKind {
    Gray,
    BlackWhite,
    Negative,
    Blur,
    Contour,
    Cartoon,
}

impl FilterKind {
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::Gray => "Gray Scale",
            FilterKind::BlackWhite => "Black and White",
            FilterKind::Negative => "Negative",
            FilterKind::Blur => "Blur",
            FilterKind::Contour => "Contour",
            FilterKind::Cartoon => "Cartoon",
        }
    }

    pub fn tag(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone)]
pub enum ImageFilter {
    Gray(monochrome::GrayConfig),
    BlackWhite(monochrome::BlackWhiteConfig),
    Negative(channel::NegativeConfig),
    Blur(blur::BlurConfig),
    Contour(stylized::ContourConfig),
    Cartoon(stylized::CartoonConfig),
}

impl From<FilterKind> for ImageFilter {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Gray => ImageFilter::Gray(monochrome::GrayConfig::new()),
            FilterKind::BlackWhite => ImageFilter::BlackWhite(monochrome::BlackWhiteConfig::new()),
            FilterKind::Negative => ImageFilter::Negative(channel::NegativeConfig::new()),
            FilterKind::Blur => ImageFilter::Blur(blur::BlurConfig::new()),
            FilterKind::Contour => ImageFilter::Contour(stylized::ContourConfig::new()),
            FilterKind::Cartoon => ImageFilter::Cartoon(stylized::CartoonConfig::new()),
        }
    }
}

impl Filter for ImageFilter {
    fn kind(&self) -> FilterKind {
        match self {
            ImageFilter::Gray(config) => config.kind(),
            ImageFilter::BlackWhite(config) => config.kind(),
            ImageFilter::Negative(config) => config.kind(),
            ImageFilter::Blur(config) => config.kind(),
            ImageFilter::Contour(config) => config.kind(),
            ImageFilter::Cartoon(config) => config.kind(),
        }
    }

    fn process(&self, image: &DynamicImage) -> ImageFilterResult<DynamicImage> {
        let start = Instant::now();
        let output = match self {
            ImageFilter::Gray(config) => config.process(image),
            ImageFilter::BlackWhite(config) => config.process(image),
            ImageFilter::Negative(config) => config.process(image),
            ImageFilter::Blur(config) => config.process(image),
            ImageFilter::Contour(config) => config.process(image),
            ImageFilter::Cartoon(config) => config.process(image),
        }?;

        log::debug!(
            "{} filter on {}x{} took {:.2?}",
            self.kind(),
            image.width(),
            image.height(),
            start.elapsed()
        );

        Ok(output)
    }
}

pub(crate) fn ensure_processable(image: &DynamicImage) -> ImageFilterResult<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageFilterError::Decode(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::VariantArray as _;

    #[test]
    fn test_kind_tags() {
        let tags: Vec<_> = FilterKind::VARIANTS.iter().map(|k| k.tag()).collect();
        assert_eq!(
            tags,
            ["gray", "blackwhite", "negative", "blur", "contour", "cartoon"]
        );
        assert_eq!(FilterKind::BlackWhite.to_string(), "blackwhite");
    }

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(FilterKind::from_str("gray").unwrap(), FilterKind::Gray);
        assert_eq!(FilterKind::from_str("Cartoon").unwrap(), FilterKind::Cartoon);
        assert!(FilterKind::from_str("sepia").is_err());
    }

    #[test]
    fn test_filter_kind_roundtrip() {
        for kind in FilterKind::VARIANTS {
            assert_eq!(ImageFilter::from(*kind).kind(), *kind);
        }
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let img = DynamicImage::new_rgb8(0, 0);
        for kind in FilterKind::VARIANTS {
            let result = ImageFilter::from(*kind).process(&img);
            assert!(matches!(result, Err(ImageFilterError::Decode(_))), "{kind}");
        }
    }
}
