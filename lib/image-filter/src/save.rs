use crate::{ImageFilterError, ImageFilterResult};
use image::{ColorType, DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder};
use std::{borrow::Cow, fs, io::Cursor, path::Path};

pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Write `image` to `path`, picking the format from the extension.
///
/// JPEG has no alpha channel and only 8-bit layouts, so those images are
/// reduced to `L8` or `Rgb8` before encoding. The file is only created once
/// encoding has succeeded.
pub fn save_image(
    image: &DynamicImage,
    path: impl AsRef<Path>,
    jpeg_quality: u8,
) -> ImageFilterResult<()> {
    let path = path.as_ref();
    let save_error = |source| ImageFilterError::Save {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(save_error)?;
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100));
            jpeg_compatible(image).write_with_encoder(encoder)
        }
        _ => image.write_to(&mut buffer, format),
    }
    .map_err(save_error)?;

    fs::write(path, buffer.into_inner())?;

    log::debug!(
        "saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );

    Ok(())
}

fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
        ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
        }
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_save_png_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 4])));

        save_image(&img, &path, DEFAULT_JPEG_QUALITY).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_jpeg_flattens_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([200, 0, 0, 90])));

        save_image(&img, &path, 90).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 6));
        assert!(!loaded.color().has_alpha());
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jpg");
        let img = DynamicImage::new_rgb8(2, 2);

        assert!(matches!(
            save_image(&img, &path, DEFAULT_JPEG_QUALITY),
            Err(ImageFilterError::Io(_))
        ));
    }

    #[test]
    fn test_save_unknown_extension_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.unknown");
        let img = DynamicImage::new_rgb8(2, 2);

        assert!(matches!(
            save_image(&img, &path, DEFAULT_JPEG_QUALITY),
            Err(ImageFilterError::Save { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_jpeg_encode_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.jpg");
        // wider than a JPEG frame can describe
        let img = DynamicImage::new_rgb8(70_000, 1);

        assert!(matches!(
            save_image(&img, &path, DEFAULT_JPEG_QUALITY),
            Err(ImageFilterError::Save { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_encode_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keep.jpg");
        fs::write(&path, b"previous").unwrap();

        assert!(save_image(&DynamicImage::new_rgb8(70_000, 1), &path, 80).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
    }
}
