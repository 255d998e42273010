// cargo test -p image-filter --test filters_test

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use image_filter::{Filter, FilterKind, FilterRegistry, ImageFilter, channel::NegativeConfig};
use strum::VariantArray as _;
use tempfile::tempdir;

fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    }))
}

fn samples() -> Vec<DynamicImage> {
    vec![
        gradient_rgb(37, 23),
        gradient_rgb(1, 1),
        DynamicImage::ImageLuma8(GrayImage::from_fn(17, 40, |x, y| Luma([(x * y) as u8]))),
        DynamicImage::ImageRgba8(RgbaImage::from_fn(12, 9, |x, y| {
            Rgba([x as u8 * 20, y as u8 * 20, 99, 200])
        })),
    ]
}

#[test]
fn test_filters_preserve_dimensions() {
    for kind in FilterKind::VARIANTS {
        let filter = ImageFilter::from(*kind);
        for img in samples() {
            let out = filter.process(&img).unwrap();
            assert_eq!(
                (out.width(), out.height()),
                (img.width(), img.height()),
                "{kind} changed the image size"
            );
        }
    }
}

#[test]
fn test_filters_do_not_mutate_input() {
    let img = gradient_rgb(20, 20);
    let copy = img.clone();

    for (_, filter) in FilterRegistry::new().list() {
        _ = filter.process(&img).unwrap();
        assert_eq!(img, copy);
    }
}

#[test]
fn test_negative_is_involution() {
    let img = gradient_rgb(31, 17);
    let negative = NegativeConfig::new();

    let twice = negative.process(&negative.process(&img).unwrap()).unwrap();
    assert_eq!(twice, img);
}

#[test]
fn test_black_white_is_binary() {
    let img = gradient_rgb(50, 50);
    let registry = FilterRegistry::new();
    let out = registry
        .lookup("Black and White")
        .unwrap()
        .process(&img)
        .unwrap();

    let gray = out.as_luma8().expect("black and white output is single channel");
    assert!(gray.pixels().all(|p| p[0] == 0 || p[0] == 255));
    assert!(gray.pixels().any(|p| p[0] == 0));
    assert!(gray.pixels().any(|p| p[0] == 255));
}

#[test]
fn test_apply_and_save_naming() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("photo.jpg");
    let img = gradient_rgb(16, 16);

    let registry = FilterRegistry::new();
    let output = registry
        .lookup("gray")
        .unwrap()
        .apply_and_save(&img, &original)
        .unwrap();

    assert_eq!(output, dir.path().join("photo_gray.jpg"));

    let saved = image::open(&output).unwrap();
    assert_eq!((saved.width(), saved.height()), (16, 16));
}

#[test]
fn test_apply_and_save_overwrites() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("cat.png");
    let filter = ImageFilter::from(FilterKind::Negative);

    let first = filter.apply_and_save(&gradient_rgb(8, 8), &original).unwrap();
    let second = filter.apply_and_save(&gradient_rgb(4, 4), &original).unwrap();

    assert_eq!(first, second);
    assert_eq!(image::open(&second).unwrap().width(), 4);
}

#[test]
fn test_every_filter_saves_as_jpeg() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original = dir.path().join("input.jpg");
    let img = gradient_rgb(24, 24);

    for (_, filter) in FilterRegistry::new().list() {
        let output = filter.apply_and_save(&img, &original)?;
        let name = output.file_name().unwrap().to_string_lossy().to_string();

        assert_eq!(name, format!("input_{}.jpg", filter.kind().tag()));
        assert!(output.exists());
    }

    Ok(())
}
